//! Shared helpers for command implementations.

use std::path::{Path, PathBuf};

use chunkwise_config::{ChunkwiseConfig, ConfigLoader, ConfigSource};

use crate::cli::GlobalOptions;
use crate::error::Result;

pub(crate) const PRODUCTION_MODE: &str = "production";

/// Configuration resolved for one command run.
#[derive(Debug)]
pub(crate) struct Project {
    pub root: PathBuf,
    pub mode: String,
    pub config: ChunkwiseConfig,
    pub source: Option<ConfigSource>,
}

/// The project root: `--cwd`, or the current directory.
pub(crate) fn project_root(global: &GlobalOptions) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(match &global.cwd {
        Some(dir) => resolve_path(dir, &cwd),
        None => cwd,
    })
}

/// Resolve `path` against `cwd` unless it is absolute.
pub(crate) fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Load and validate configuration for `--mode`, or `default_mode`.
pub(crate) fn load_project(global: &GlobalOptions, default_mode: &str) -> Result<Project> {
    let root = project_root(global)?;
    let mode = global
        .mode
        .clone()
        .unwrap_or_else(|| default_mode.to_string());

    let mut loader = ConfigLoader::new(&root).mode(mode.as_str());
    if let Some(file) = &global.config {
        loader = loader.file(file);
    }
    let loaded = loader.load()?;
    loaded.config.validate()?;

    match &loaded.source {
        Some(source) => tracing::debug!(path = %source.path().display(), %mode, "configuration loaded"),
        None => tracing::debug!(%mode, "no configuration file, using defaults"),
    }

    Ok(Project {
        root,
        mode,
        config: loaded.config,
        source: loaded.source,
    })
}
