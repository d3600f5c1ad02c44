//! Content-hashed output file names for chunks and assets.
//!
//! | output                         | default template                                   |
//! |--------------------------------|----------------------------------------------------|
//! | entry chunk                    | `js/{logicalName}-{contentHash}.js`                |
//! | dynamic chunk with a facade    | `js/{logicalName}-{sourceStem}-{contentHash}.js`   |
//! | asset                          | `{dir}/{logicalName}-{contentHash}.{ext}`          |
//!
//! A dynamic chunk without a facade module, or whose facade yields an empty
//! stem, is named with the entry template instead.

mod hash;
mod template;

use serde::{Deserialize, Serialize};

use crate::assets::{AssetRoute, last_segment, split_file_name};
use crate::error::Result;
pub use hash::{ContentHash, DEFAULT_HASH_LENGTH, MAX_HASH_LENGTH, MIN_HASH_LENGTH};
use hash::check_hash_length;
pub use template::{OutputPathTemplate, TemplateKind};
use template::TemplateValues;

pub const DEFAULT_ENTRY_TEMPLATE: &str = "js/{logicalName}-{contentHash}.js";
pub const DEFAULT_CHUNK_TEMPLATE: &str = "js/{logicalName}-{sourceStem}-{contentHash}.js";
pub const DEFAULT_ASSET_TEMPLATE: &str = "{dir}/{logicalName}-{contentHash}.{ext}";

/// Kind of file the bundler emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Chunk for an entry point.
    Entry,
    /// Dynamically imported or split chunk.
    Chunk,
    /// Static asset (image, font, stylesheet, ...).
    Asset,
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OutputKind::Entry => "entry",
            OutputKind::Chunk => "chunk",
            OutputKind::Asset => "asset",
        })
    }
}

/// A file the bundler is about to write.
#[derive(Debug, Clone, Copy)]
pub struct EmittedFile<'a> {
    pub kind: OutputKind,
    /// Chunk name (e.g. `dashboard-app`) or asset file name (e.g. `logo.png`).
    pub name: &'a str,
    /// Module the chunk was created for, if the bundler knows it.
    pub facade_module_id: Option<&'a str>,
    pub content: &'a [u8],
}

/// Template strings and hash length for a [`ChunkNamer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingOptions {
    pub entry_template: String,
    pub chunk_template: String,
    pub asset_template: String,
    pub hash_length: usize,
}

impl Default for NamingOptions {
    fn default() -> Self {
        Self {
            entry_template: DEFAULT_ENTRY_TEMPLATE.to_string(),
            chunk_template: DEFAULT_CHUNK_TEMPLATE.to_string(),
            asset_template: DEFAULT_ASSET_TEMPLATE.to_string(),
            hash_length: DEFAULT_HASH_LENGTH,
        }
    }
}

/// Produces deterministic output paths for emitted files.
#[derive(Debug, Clone)]
pub struct ChunkNamer {
    entry: OutputPathTemplate,
    chunk: OutputPathTemplate,
    asset: OutputPathTemplate,
    hash_length: usize,
}

impl Default for ChunkNamer {
    fn default() -> Self {
        Self {
            entry: parse_default(DEFAULT_ENTRY_TEMPLATE, TemplateKind::Entry),
            chunk: parse_default(DEFAULT_CHUNK_TEMPLATE, TemplateKind::Chunk),
            asset: parse_default(DEFAULT_ASSET_TEMPLATE, TemplateKind::Asset),
            hash_length: DEFAULT_HASH_LENGTH,
        }
    }
}

fn parse_default(template: &str, kind: TemplateKind) -> OutputPathTemplate {
    OutputPathTemplate::parse(template, kind).expect("built-in templates are valid")
}

impl ChunkNamer {
    /// # Errors
    ///
    /// Returns an error if a template is invalid or the hash length is out of range.
    pub fn new(options: &NamingOptions) -> Result<Self> {
        check_hash_length(options.hash_length)?;
        Ok(Self {
            entry: OutputPathTemplate::parse(&options.entry_template, TemplateKind::Entry)?,
            chunk: OutputPathTemplate::parse(&options.chunk_template, TemplateKind::Chunk)?,
            asset: OutputPathTemplate::parse(&options.asset_template, TemplateKind::Asset)?,
            hash_length: options.hash_length,
        })
    }

    /// Output path for any emitted file.
    pub fn file_name(&self, file: &EmittedFile<'_>) -> String {
        match file.kind {
            OutputKind::Entry => self.entry_file_name(file.name, file.content),
            OutputKind::Chunk => {
                self.chunk_file_name(file.name, file.facade_module_id, file.content)
            }
            OutputKind::Asset => self.asset_file_name(file.name, file.content),
        }
    }

    pub fn entry_file_name(&self, logical_name: &str, content: &[u8]) -> String {
        let hash = self.hash(content);
        self.entry.render(&TemplateValues {
            logical_name,
            content_hash: hash.as_str(),
            ..TemplateValues::default()
        })
    }

    /// Name a non-entry chunk, falling back to the entry pattern when the
    /// facade module is unknown or has no usable stem.
    pub fn chunk_file_name(
        &self,
        logical_name: &str,
        facade_module_id: Option<&str>,
        content: &[u8],
    ) -> String {
        let Some(stem) = facade_module_id.and_then(source_stem) else {
            tracing::debug!(chunk = logical_name, "no source stem, using entry pattern");
            return self.entry_file_name(logical_name, content);
        };

        let hash = self.hash(content);
        self.chunk.render(&TemplateValues {
            logical_name,
            source_stem: stem,
            content_hash: hash.as_str(),
            ..TemplateValues::default()
        })
    }

    /// Name an asset. The logical name is the file stem of `asset_name`.
    pub fn asset_file_name(&self, asset_name: &str, content: &[u8]) -> String {
        let (stem, ext) = split_file_name(asset_name);
        let route = AssetRoute::for_file_name(asset_name);
        let hash = self.hash(content);
        self.asset.render(&TemplateValues {
            logical_name: stem,
            content_hash: hash.as_str(),
            dir: route.dir,
            ext,
            ..TemplateValues::default()
        })
    }

    pub fn hash(&self, content: &[u8]) -> ContentHash {
        // hash_length is range-checked on construction
        ContentHash::compute_truncated(content, self.hash_length)
    }

    pub fn hash_length(&self) -> usize {
        self.hash_length
    }
}

/// File stem of a module identifier: last path segment without its extension.
///
/// Returns `None` when nothing usable is left (empty identifier, trailing
/// separator, or a dotfile-only name like `.env`).
pub fn source_stem(module_id: &str) -> Option<&str> {
    let path = module_id.split('?').next().unwrap_or(module_id);
    let segment = last_segment(path);
    if segment.starts_with('.') && !segment[1..].contains('.') {
        return None;
    }
    let (stem, _) = split_file_name(segment);
    // A trailing dot is an empty extension.
    let stem = stem.strip_suffix('.').unwrap_or(stem);
    let stem = stem.trim_start_matches('\0');
    (!stem.is_empty()).then_some(stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_stem_strips_directories_and_extension() {
        assert_eq!(source_stem("/repo/src/apps/dashboard/Home.jsx"), Some("Home"));
        assert_eq!(source_stem("src\\pages\\Settings.tsx"), Some("Settings"));
        assert_eq!(source_stem("src/Home.test.jsx"), Some("Home.test"));
        assert_eq!(source_stem("src/routes/index"), Some("index"));
        assert_eq!(source_stem("src/Home.jsx?worker"), Some("Home"));
    }

    #[test]
    fn source_stem_missing() {
        assert_eq!(source_stem(""), None);
        assert_eq!(source_stem("src/pages/"), None);
        assert_eq!(source_stem("config/.env"), None);
    }

    #[test]
    fn source_stem_drops_an_empty_extension() {
        assert_eq!(source_stem("src/weird."), Some("weird"));
        assert_eq!(source_stem("src/double.."), Some("double."));
        assert_eq!(source_stem("src/."), None);

        let namer = ChunkNamer::default();
        let content = b"export default 1;";
        assert_eq!(
            namer.chunk_file_name("x", Some("src/weird."), content),
            format!("js/x-weird-{}.js", namer.hash(content))
        );
    }

    #[test]
    fn entry_name_has_no_stem() {
        let namer = ChunkNamer::default();
        let name = namer.entry_file_name("main", b"console.log(1)");
        let hash = namer.hash(b"console.log(1)");
        assert_eq!(name, format!("js/main-{}.js", hash));
    }

    #[test]
    fn chunk_name_includes_stem() {
        let namer = ChunkNamer::default();
        let content = b"export const Home = () => null;";
        let name =
            namer.chunk_file_name("dashboard-app", Some("/src/apps/dashboard/Home.jsx"), content);
        assert_eq!(name, format!("js/dashboard-app-Home-{}.js", namer.hash(content)));
    }

    #[test]
    fn chunk_without_facade_degrades_to_entry_pattern() {
        let namer = ChunkNamer::default();
        let content = b"shared stuff";
        let expected = format!("js/vendor-{}.js", namer.hash(content));
        assert_eq!(namer.chunk_file_name("vendor", None, content), expected);
        assert_eq!(namer.chunk_file_name("vendor", Some("lib/"), content), expected);
    }

    #[test]
    fn asset_name_uses_category_dir_and_original_ext() {
        let namer = ChunkNamer::default();
        let content = b"\x89PNG";
        let hash = namer.hash(content);
        assert_eq!(
            namer.asset_file_name("Logo.PNG", content),
            format!("images/Logo-{}.PNG", hash)
        );
        assert_eq!(
            namer.asset_file_name("index.css", content),
            format!("css/index-{}.css", hash)
        );
        assert_eq!(
            namer.asset_file_name("LICENSE", content),
            format!("assets/LICENSE-{}", hash)
        );
    }

    #[test]
    fn file_name_dispatches_on_kind() {
        let namer = ChunkNamer::default();
        let file = EmittedFile {
            kind: OutputKind::Asset,
            name: "inter.woff2",
            facade_module_id: None,
            content: b"font",
        };
        assert!(namer.file_name(&file).starts_with("fonts/inter-"));
    }

    #[test]
    fn custom_options_are_validated() {
        let options = NamingOptions {
            entry_template: "[name]-[hash].js".to_string(),
            ..NamingOptions::default()
        };
        assert!(ChunkNamer::new(&options).is_err());

        let options = NamingOptions {
            hash_length: 2,
            ..NamingOptions::default()
        };
        assert!(ChunkNamer::new(&options).is_err());

        let options = NamingOptions {
            entry_template: "{logicalName}.{contentHash}.mjs".to_string(),
            hash_length: 16,
            ..NamingOptions::default()
        };
        let namer = ChunkNamer::new(&options).unwrap();
        assert_eq!(namer.entry_file_name("app", b"x").len(), "app.".len() + 16 + ".mjs".len());
    }
}
