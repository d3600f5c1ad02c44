use chunkwise_core::OutputKind;
use clap::ValueEnum;

/// Kind of emitted file for `chunkwise name`
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum KindArg {
    /// Chunk of an entry point
    #[value(name = "entry")]
    Entry,

    /// Split or dynamically imported chunk
    #[value(name = "chunk")]
    Chunk,

    /// Static asset (image, font, stylesheet, ...)
    #[value(name = "asset")]
    Asset,
}

impl From<KindArg> for OutputKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Entry => OutputKind::Entry,
            KindArg::Chunk => OutputKind::Chunk,
            KindArg::Asset => OutputKind::Asset,
        }
    }
}
