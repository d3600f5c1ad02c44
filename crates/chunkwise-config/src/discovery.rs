//! File-based config discovery for CLI use.

use std::fs;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Format, Json, Serialized, Toml};
use serde_json::Value;

use crate::error::{ConfigError, Result};

pub const CONFIG_FILE_NAME: &str = "chunkwise.toml";
pub const PACKAGE_JSON_FIELD: &str = "chunkwise";

/// A configuration file and how to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Toml(PathBuf),
    Json(PathBuf),
    /// The `chunkwise` field of a `package.json`.
    PackageJson(PathBuf),
}

impl ConfigSource {
    /// Pick the format of an explicitly named config file.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.file_name().is_some_and(|name| name == "package.json") {
            return Ok(ConfigSource::PackageJson(path));
        }
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(ConfigSource::Toml(path)),
            Some("json") => Ok(ConfigSource::Json(path)),
            _ => Err(ConfigError::UnsupportedFormat { path }),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ConfigSource::Toml(path) | ConfigSource::Json(path) | ConfigSource::PackageJson(path) => {
                path
            }
        }
    }

    /// Layer this file on top of `figment`.
    pub fn merge_into(&self, figment: Figment) -> Result<Figment> {
        match self {
            ConfigSource::Toml(path) => Ok(figment.merge(Toml::file_exact(path))),
            ConfigSource::Json(path) => Ok(figment.merge(Json::file_exact(path))),
            ConfigSource::PackageJson(path) => {
                let value = read_package_json_field(path)?;
                Ok(figment.merge(Serialized::defaults(value)))
            }
        }
    }
}

/// Searches a project root for a chunkwise configuration.
///
/// # Example
///
/// ```no_run
/// use chunkwise_config::ConfigDiscovery;
///
/// if let Some(source) = ConfigDiscovery::new(".").find() {
///     println!("using {}", source.path().display());
/// }
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. `chunkwise.toml`
    /// 2. `package.json` with a non-null `chunkwise` field
    pub fn find(&self) -> Option<ConfigSource> {
        let toml_path = self.root.join(CONFIG_FILE_NAME);
        if toml_path.is_file() {
            return Some(ConfigSource::Toml(toml_path));
        }

        let pkg_path = self.root.join("package.json");
        let content = fs::read_to_string(&pkg_path).ok()?;
        let parsed = serde_json::from_str::<Value>(&content).ok()?;
        parsed
            .get(PACKAGE_JSON_FIELD)
            .is_some_and(|field| !field.is_null())
            .then_some(ConfigSource::PackageJson(pkg_path))
    }
}

fn read_package_json_field(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    let mut parsed: Value = serde_json::from_str(&content)
        .map_err(|e| ConfigError::invalid_value("package.json", format!("Invalid JSON: {e}")))?;

    match parsed.get_mut(PACKAGE_JSON_FIELD).map(Value::take) {
        Some(Value::Object(map)) => Ok(Value::Object(map)),
        Some(Value::Null) | None => Err(ConfigError::InvalidValue {
            field: PACKAGE_JSON_FIELD.to_string(),
            hint: Some(format!(
                "Add a '{PACKAGE_JSON_FIELD}' object to {}",
                path.display()
            )),
        }),
        Some(_) => Err(ConfigError::InvalidValue {
            field: PACKAGE_JSON_FIELD.to_string(),
            hint: Some(format!("The '{PACKAGE_JSON_FIELD}' field must be an object")),
        }),
    }
}
