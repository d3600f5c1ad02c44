//! Configuration for chunkwise.
//!
//! A project is configured by a `chunkwise.toml` in its root, or by a
//! `chunkwise` object in its `package.json`:
//!
//! ```toml
//! [partition]
//! charting = ["recharts", "d3", "d3-*"]
//!
//! [output]
//! base = "/static/dist/"
//!
//! [dev]
//! port = 3000
//!
//! [dev.proxy."/api"]
//! target = "http://localhost:5000"
//! rewrite = "/api/v1"
//! change_origin = true
//!
//! [profiles.production.output]
//! hash_length = 12
//! ```
//!
//! [`ConfigLoader`] layers that file between the built-in defaults and the
//! `CHUNKWISE_*` environment.

pub mod config;
pub mod dev;
pub mod discovery;
pub mod error;
pub mod loading;
pub mod output;
pub mod partition;
pub mod validation;

pub use config::{ChunkwiseConfig, ProfileConfig};
pub use dev::{DevConfig, ProxyConfig};
pub use discovery::{ConfigDiscovery, ConfigSource};
pub use error::{ConfigError, Result};
pub use loading::{ConfigLoader, LoadedConfig};
pub use output::OutputConfig;
pub use partition::PartitionConfig;
pub use validation::{ConfigValidator, FsValidator, SchemaValidator, validate_fs, validate_schema};
