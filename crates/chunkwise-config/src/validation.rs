//! Pluggable config validation strategies
//!
//! Schema validation checks the configuration on its own; filesystem
//! validation also looks at the project it is applied to.

use std::path::{Path, PathBuf};

use crate::config::ChunkwiseConfig;
use crate::error::{ConfigError, Result};

pub trait ConfigValidator {
    fn validate(&self, config: &ChunkwiseConfig) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// # Example
///
/// ```
/// use chunkwise_config::{ChunkwiseConfig, ConfigValidator, SchemaValidator};
///
/// let mut config = ChunkwiseConfig::default();
/// SchemaValidator.validate(&config).unwrap();
///
/// config.output.hash_length = 100;
/// assert!(SchemaValidator.validate(&config).is_err());
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &ChunkwiseConfig) -> Result<()> {
        config.partition.classifier()?;
        config.output.validate()?;
        config.dev.validate()
    }
}

/// Filesystem validator (for CLI use)
pub struct FsValidator {
    root: PathBuf,
}

impl FsValidator {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Configured application subtrees that do not exist under the root.
    ///
    /// Not an error: a project may not have every app yet.
    pub fn missing_subtrees<'a>(&self, config: &'a ChunkwiseConfig) -> Vec<&'a str> {
        [
            config.partition.dashboard_dir.as_str(),
            config.partition.liff_dir.as_str(),
            config.partition.shared_dir.as_str(),
        ]
        .into_iter()
        .filter(|dir| !self.root.join(dir.trim_start_matches('/')).is_dir())
        .collect()
    }
}

impl ConfigValidator for FsValidator {
    fn validate(&self, config: &ChunkwiseConfig) -> Result<()> {
        SchemaValidator.validate(config)?;

        let out_dir = self.root.join(&config.output.out_dir);
        if out_dir.exists() && !out_dir.is_dir() {
            return Err(ConfigError::Validation {
                field: "output.out_dir".to_string(),
                message: format!("{} exists and is not a directory", out_dir.display()),
            });
        }

        Ok(())
    }
}

pub fn validate_schema(config: &ChunkwiseConfig) -> Result<()> {
    SchemaValidator.validate(config)
}

pub fn validate_fs(config: &ChunkwiseConfig, root: impl AsRef<Path>) -> Result<()> {
    FsValidator::new(root).validate(config)
}
