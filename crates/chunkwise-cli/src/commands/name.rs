//! `chunkwise name`: output path of a single emitted file.

use std::path::Path;

use chunkwise_core::{ChunkNamer, EmittedFile, OutputKind};
use serde::Serialize;

use crate::cli::{GlobalOptions, NameArgs};
use crate::commands::utils;
use crate::error::{CliError, Result, ResultExt};

#[derive(Debug, Serialize)]
struct NamedFile {
    kind: OutputKind,
    name: String,
    path: String,
    url: String,
    hash: String,
}

pub fn execute(args: NameArgs, global: &GlobalOptions) -> Result<()> {
    let project = utils::load_project(global, utils::PRODUCTION_MODE)?;
    let namer = project.config.output.namer()?;

    let file = utils::resolve_path(&args.file, &project.root);
    let content = std::fs::read(&file).with_path(&file)?;

    let kind = OutputKind::from(args.kind);
    let name = match args.name {
        Some(name) => name,
        None => logical_name(&file, kind)?,
    };

    let named = name_file(
        &namer,
        &project.config.output.base,
        EmittedFile {
            kind,
            name: &name,
            facade_module_id: args.facade.as_deref(),
            content: &content,
        },
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&named)?);
    } else {
        println!("{}", named.path);
    }
    Ok(())
}

/// Default logical name: the stem for chunks, the file name for assets.
fn logical_name(file: &Path, kind: OutputKind) -> Result<String> {
    let name = match kind {
        OutputKind::Asset => file.file_name(),
        OutputKind::Entry | OutputKind::Chunk => file.file_stem(),
    };
    name.and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            CliError::InvalidArgument(format!(
                "cannot derive a name from {}; pass --name",
                file.display()
            ))
        })
}

fn name_file(namer: &ChunkNamer, base: &str, file: EmittedFile<'_>) -> NamedFile {
    let path = namer.file_name(&file);
    NamedFile {
        kind: file.kind,
        name: file.name.to_string(),
        url: public_url(base, &path),
        hash: namer.hash(file.content).to_string(),
        path,
    }
}

fn public_url(base: &str, path: &str) -> String {
    if base.ends_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}
