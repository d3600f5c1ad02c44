//! Development server configuration types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ConfigError, Result};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_API_PREFIX: &str = "/api";
pub const DEFAULT_API_TARGET: &str = "http://localhost:5000";
pub const DEFAULT_API_REWRITE: &str = "/api/v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Open a browser once the server is listening.
    #[serde(default = "default_true")]
    pub open: bool,

    #[serde(default = "default_true")]
    pub cors: bool,

    /// Proxy rules keyed by the path prefix they match.
    #[serde(default = "default_proxy")]
    pub proxy: IndexMap<String, ProxyConfig>,
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            open: true,
            cors: true,
            proxy: default_proxy(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Upstream base URL.
    pub target: String,

    /// Rewrite `Host` to the upstream's authority.
    #[serde(default)]
    pub change_origin: bool,

    /// Verify the upstream's TLS certificate.
    #[serde(default = "default_true")]
    pub secure: bool,

    /// Replacement for the matched prefix. `None` keeps the path as is.
    #[serde(default)]
    pub rewrite: Option<String>,

    /// Forward all end-to-end request headers. When off, only
    /// `content-type` and `accept` are sent upstream.
    #[serde(default = "default_true")]
    pub forward_headers: bool,

    /// Extra headers added to every forwarded request.
    #[serde(default)]
    pub headers: IndexMap<String, String>,

    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl ProxyConfig {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            change_origin: false,
            secure: true,
            rewrite: None,
            forward_headers: true,
            headers: IndexMap::new(),
            timeout_ms: None,
        }
    }

    /// The `/api` rule of a stock project.
    pub fn api_default() -> Self {
        Self {
            change_origin: true,
            secure: false,
            rewrite: Some(DEFAULT_API_REWRITE.to_string()),
            ..Self::new(DEFAULT_API_TARGET)
        }
    }

    pub fn target_url(&self) -> Result<Url> {
        let url = Url::parse(&self.target)
            .map_err(|err| ConfigError::validation("dev.proxy.target", format!("'{}': {err}", self.target)))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(ConfigError::validation(
                "dev.proxy.target",
                format!("'{}' must be an http or https URL with a host", self.target),
            ));
        }
        Ok(url)
    }
}

impl DevConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::validation("dev.host", "must not be empty"));
        }

        for (prefix, rule) in &self.proxy {
            let field = format!("dev.proxy.\"{prefix}\"");
            if !prefix.starts_with('/') {
                return Err(ConfigError::validation(field, "prefix must start with '/'"));
            }
            rule.target_url()
                .map_err(|err| ConfigError::validation(format!("{field}.target"), err))?;
            if let Some(rewrite) = &rule.rewrite
                && !rewrite.is_empty()
                && !rewrite.starts_with('/')
            {
                return Err(ConfigError::validation(
                    format!("{field}.rewrite"),
                    "replacement prefix must start with '/'",
                ));
            }
            if rule.timeout_ms == Some(0) {
                return Err(ConfigError::validation(
                    format!("{field}.timeout_ms"),
                    "timeout must be greater than zero",
                ));
            }
        }

        Ok(())
    }

    /// Rules that turn certificate checks off.
    pub fn insecure_rules(&self) -> impl Iterator<Item = &str> {
        self.proxy
            .iter()
            .filter(|(_, rule)| !rule.secure)
            .map(|(prefix, _)| prefix.as_str())
    }
}

fn default_host() -> String {
    DEFAULT_HOST.into()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_true() -> bool {
    true
}

fn default_proxy() -> IndexMap<String, ProxyConfig> {
    IndexMap::from([(DEFAULT_API_PREFIX.to_string(), ProxyConfig::api_default())])
}
