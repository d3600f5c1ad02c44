//! Layered configuration loading.
//!
//! Priority, lowest first:
//!
//! 1. built-in defaults
//! 2. `VITE_PORT` / `VITE_API_BASE_URL` fallbacks from the environment
//!    (`PORT` / `API_BASE_URL` are read when those are unset)
//! 3. the config file
//! 4. the `[profiles.<mode>]` overrides of that file
//! 5. `CHUNKWISE_*` environment variables (`__` separates nested keys)
//!
//! Command-line flags are applied on top by the caller.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Serialized};

use crate::config::ChunkwiseConfig;
use crate::dev::{DEFAULT_API_PREFIX, DEFAULT_API_TARGET};
use crate::discovery::{ConfigDiscovery, ConfigSource};
use crate::error::{ConfigError, Result};

pub const ENV_PREFIX: &str = "CHUNKWISE_";
/// Upstream for the stock `/api` rule, most specific name first.
pub const API_BASE_URL_ENV: [&str; 2] = ["VITE_API_BASE_URL", "API_BASE_URL"];
/// Dev server port, most specific name first.
pub const PORT_ENV: [&str; 2] = ["VITE_PORT", "PORT"];

/// Loads a [`ChunkwiseConfig`] for a project root.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    root: PathBuf,
    file: Option<PathBuf>,
    mode: Option<String>,
}

/// A loaded configuration and where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ChunkwiseConfig,
    /// `None` when no config file was found and defaults were used.
    pub source: Option<ConfigSource>,
    pub mode: Option<String>,
}

impl ConfigLoader {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            file: None,
            mode: None,
        }
    }

    /// Use this file instead of discovering one. Relative paths are resolved
    /// against the root.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Build mode whose profile is applied.
    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    pub fn load(&self) -> Result<LoadedConfig> {
        let source = self.source()?;
        match &source {
            Some(source) => tracing::debug!(path = %source.path().display(), "loading config file"),
            None => tracing::debug!(root = %self.root.display(), "no config file, using defaults"),
        }

        // File tables merge into the defaults key by key, so a file that only
        // sets `[dev.proxy."/api"] target` keeps the stock rewrite.
        let mut figment = Figment::from(Serialized::defaults(ChunkwiseConfig::default()));
        if let Some(port) = env_port() {
            figment = figment.merge(Serialized::default("dev.port", port));
        }
        if let Some(source) = &source {
            figment = source.merge_into(figment)?;
        }

        let mut config: ChunkwiseConfig = figment.extract()?;
        apply_api_base_url(&mut config);

        let mut config = config.materialize_profile(self.mode.as_deref())?;
        let profiles = std::mem::take(&mut config.profiles);

        let mut config: ChunkwiseConfig = Figment::from(Serialized::defaults(&config))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.profiles = profiles;

        Ok(LoadedConfig {
            config,
            source,
            mode: self.mode.clone(),
        })
    }

    fn source(&self) -> Result<Option<ConfigSource>> {
        let Some(file) = &self.file else {
            return Ok(ConfigDiscovery::new(&self.root).find());
        };

        let path = self.root.join(file);
        if !path.is_file() {
            return Err(ConfigError::NotFound { path });
        }
        ConfigSource::from_path(path).map(Some)
    }
}

/// First non-blank variable of `names`, with the name it came from.
fn first_env(names: &[&'static str]) -> Option<(&'static str, String)> {
    names.iter().find_map(|&name| {
        let value = std::env::var(name).ok()?;
        let value = value.trim();
        (!value.is_empty()).then(|| (name, value.to_string()))
    })
}

fn env_port() -> Option<u16> {
    let (name, raw) = first_env(&PORT_ENV)?;
    match raw.parse() {
        Ok(port) => Some(port),
        Err(_) => {
            tracing::warn!(value = %raw, "ignoring {name}: not a port number");
            None
        }
    }
}

/// Point the stock `/api` rule at `VITE_API_BASE_URL` when the config file
/// left its target at the default.
fn apply_api_base_url(config: &mut ChunkwiseConfig) {
    let Some((name, url)) = first_env(&API_BASE_URL_ENV) else {
        return;
    };

    if let Some(rule) = config.dev.proxy.get_mut(DEFAULT_API_PREFIX)
        && rule.target == DEFAULT_API_TARGET
    {
        tracing::debug!(upstream = %url, "using {name} for {DEFAULT_API_PREFIX}");
        rule.target = url;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_without_a_file() {
        Jail::expect_with(|jail| {
            let loaded = ConfigLoader::new(jail.directory()).load().unwrap();
            assert!(loaded.source.is_none());
            assert_eq!(loaded.config.dev.port, 3000);
            assert_eq!(loaded.config.output.base, "/static/dist/");
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file_and_profile() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "chunkwise.toml",
                r#"
[dev]
port = 4000
host = "127.0.0.1"

[profiles.development.dev]
port = 4100
"#,
            )?;
            jail.set_env("CHUNKWISE_DEV__PORT", "4200");

            let loaded = ConfigLoader::new(jail.directory())
                .mode("development")
                .load()
                .unwrap();
            assert_eq!(loaded.config.dev.port, 4200);
            assert_eq!(loaded.config.dev.host, "127.0.0.1");
            Ok(())
        });
    }

    #[test]
    fn port_fallback_sits_below_the_file() {
        Jail::expect_with(|jail| {
            jail.set_env("VITE_PORT", "4321");
            jail.set_env("PORT", "8080");
            let loaded = ConfigLoader::new(jail.directory()).load().unwrap();
            assert_eq!(loaded.config.dev.port, 4321);

            jail.create_file("chunkwise.toml", "[dev]\nport = 4000\n")?;
            let loaded = ConfigLoader::new(jail.directory()).load().unwrap();
            assert_eq!(loaded.config.dev.port, 4000);
            Ok(())
        });
    }

    #[test]
    fn plain_port_is_read_when_vite_port_is_unset() {
        Jail::expect_with(|jail| {
            jail.set_env("PORT", "8080");
            let loaded = ConfigLoader::new(jail.directory()).load().unwrap();
            assert_eq!(loaded.config.dev.port, 8080);
            Ok(())
        });
    }

    #[test]
    fn api_base_url_replaces_only_the_default_target() {
        Jail::expect_with(|jail| {
            jail.set_env("VITE_API_BASE_URL", "http://backend:8000");
            let loaded = ConfigLoader::new(jail.directory()).load().unwrap();
            let api = &loaded.config.dev.proxy["/api"];
            assert_eq!(api.target, "http://backend:8000");
            assert_eq!(api.rewrite.as_deref(), Some("/api/v1"));

            jail.create_file(
                "chunkwise.toml",
                r#"
[dev.proxy."/api"]
target = "http://staging.internal"
"#,
            )?;
            let loaded = ConfigLoader::new(jail.directory()).load().unwrap();
            let api = &loaded.config.dev.proxy["/api"];
            assert_eq!(api.target, "http://staging.internal");
            assert_eq!(api.rewrite.as_deref(), Some("/api/v1"));
            Ok(())
        });
    }

    #[test]
    fn plain_api_base_url_is_read_when_vite_name_is_unset() {
        Jail::expect_with(|jail| {
            jail.set_env("API_BASE_URL", "http://backend:9000");
            let loaded = ConfigLoader::new(jail.directory()).load().unwrap();
            assert_eq!(loaded.config.dev.proxy["/api"].target, "http://backend:9000");
            Ok(())
        });
    }

    #[test]
    fn file_target_keeps_the_stock_api_rule() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "chunkwise.toml",
                r#"
[dev.proxy."/api"]
target = "http://backend:8000"

[dev.proxy."/uploads"]
target = "http://storage:9000"
"#,
            )?;
            let loaded = ConfigLoader::new(jail.directory()).load().unwrap();

            let api = &loaded.config.dev.proxy["/api"];
            assert_eq!(api.target, "http://backend:8000");
            assert_eq!(api.rewrite.as_deref(), Some("/api/v1"));
            assert!(api.change_origin);
            assert!(!api.secure);

            let uploads = &loaded.config.dev.proxy["/uploads"];
            assert_eq!(uploads.rewrite, None);
            assert!(uploads.secure);
            Ok(())
        });
    }

    #[test]
    fn file_can_override_stock_api_fields() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "chunkwise.toml",
                r#"
[dev.proxy."/api"]
target = "http://backend:8000"
rewrite = "/v2"
change_origin = false
"#,
            )?;
            let loaded = ConfigLoader::new(jail.directory()).load().unwrap();
            let api = &loaded.config.dev.proxy["/api"];
            assert_eq!(api.rewrite.as_deref(), Some("/v2"));
            assert!(!api.change_origin);
            Ok(())
        });
    }

    #[test]
    fn explicit_file_must_exist() {
        Jail::expect_with(|jail| {
            let err = ConfigLoader::new(jail.directory())
                .file("missing.toml")
                .load()
                .unwrap_err();
            assert!(matches!(err, ConfigError::NotFound { .. }));
            Ok(())
        });
    }

    #[test]
    fn type_errors_are_invalid_values() {
        Jail::expect_with(|jail| {
            jail.create_file("chunkwise.toml", "[output]\nhash_length = \"long\"\n")?;
            let err = ConfigLoader::new(jail.directory()).load().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { .. }));
            Ok(())
        });
    }
}
