//! `[output]` section: where build output goes and how files are named.

use std::path::PathBuf;

use chunkwise_core::naming::{
    DEFAULT_ASSET_TEMPLATE, DEFAULT_CHUNK_TEMPLATE, DEFAULT_ENTRY_TEMPLATE, DEFAULT_HASH_LENGTH,
};
use chunkwise_core::plan::DEFAULT_BASE;
use chunkwise_core::{ChunkNamer, NamingOptions};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default size above which `plan` warns about a chunk, in KiB.
pub const DEFAULT_CHUNK_SIZE_WARNING_KIB: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub out_dir: PathBuf,
    /// Public path the output directory is served under.
    pub base: String,
    pub hash_length: usize,
    pub entry_template: String,
    pub chunk_template: String,
    pub asset_template: String,
    pub chunk_size_warning_kib: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("dist"),
            base: DEFAULT_BASE.to_string(),
            hash_length: DEFAULT_HASH_LENGTH,
            entry_template: DEFAULT_ENTRY_TEMPLATE.to_string(),
            chunk_template: DEFAULT_CHUNK_TEMPLATE.to_string(),
            asset_template: DEFAULT_ASSET_TEMPLATE.to_string(),
            chunk_size_warning_kib: DEFAULT_CHUNK_SIZE_WARNING_KIB,
        }
    }
}

impl OutputConfig {
    pub fn naming_options(&self) -> NamingOptions {
        NamingOptions {
            entry_template: self.entry_template.clone(),
            chunk_template: self.chunk_template.clone(),
            asset_template: self.asset_template.clone(),
            hash_length: self.hash_length,
        }
    }

    pub fn namer(&self) -> Result<ChunkNamer> {
        ChunkNamer::new(&self.naming_options()).map_err(|err| ConfigError::validation("output", err))
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.out_dir.as_os_str().is_empty() {
            return Err(ConfigError::validation("output.out_dir", "must not be empty"));
        }
        let base_ok = self.base.starts_with('/')
            || self.base.starts_with("http://")
            || self.base.starts_with("https://")
            || self.base.starts_with("./");
        if !base_ok {
            return Err(ConfigError::validation(
                "output.base",
                format!(
                    "'{}' must be an absolute path ('/static/dist/'), a relative path ('./') or a URL",
                    self.base
                ),
            ));
        }
        self.namer()?;
        Ok(())
    }

    pub fn chunk_size_warning_bytes(&self) -> u64 {
        self.chunk_size_warning_kib.saturating_mul(1024)
    }
}
