//! Error handling for the chunkwise CLI.
//!
//! [`CliError`] is what every command returns. Errors from the library crates
//! convert into it with `?`; [`InputError`] covers bad command-line input and
//! carries a hint on how to fix it. `main` turns the final error into a
//! `miette` report.
//!
//! # Example
//!
//! ```rust,no_run
//! use chunkwise_cli::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read_build(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_path(path)
//!         .with_hint("Pass the build description written by your bundler plugin")
//! }
//! ```

mod diagnostic;

pub use diagnostic::cli_error_to_miette;

use std::path::PathBuf;

use chunkwise_config::ConfigError;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A classifier or namer could not be built.
    #[error("{0}")]
    Core(#[from] chunkwise_core::Error),

    /// Bad command-line input.
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The dev server could not bind or stopped unexpectedly.
    #[error("Server error: {0}")]
    Server(String),

    /// A proxy rule could not be set up.
    #[error("Proxy error: {0}")]
    Proxy(String),

    #[error("{0}")]
    Custom(String),
}

/// Problems with what the user handed to a command.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("No module ids given\n\nHint: Pass ids as arguments or pipe them in with --stdin")]
    NoModuleIds,

    #[error("Invalid build description {}: {message}\n\nHint: Expected {{ \"modules\": [...], \"files\": [...] }}", .path.display())]
    InvalidBuildDescription { path: PathBuf, message: String },

    #[error("Output file '{name}' has neither 'content' nor 'path'\n\nHint: Give each file its content inline or a path to read it from")]
    MissingContent { name: String },

    #[error("Invalid upstream URL '{url}': {message}\n\nHint: Use an absolute http:// or https:// URL")]
    InvalidUpstream { url: String, message: String },
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Adds context to any error that converts into [`CliError`].
pub trait ResultExt<T> {
    /// Turn a not-found I/O error into [`CliError::FileNotFound`] for `path`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;

    /// Append a hint to the error message.
    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T>;

    /// Prefix the error message.
    ///
    /// ```rust,no_run
    /// # use chunkwise_cli::error::{CliError, Result, ResultExt};
    /// # fn run() -> Result<()> {
    /// fn bind() -> Result<()> {
    ///     Err(CliError::Server("address in use".into()))
    /// }
    /// bind().context("Failed to start the dev server")?;
    /// # Ok(())
    /// # }
    /// ```
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| match e.into() {
            CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                CliError::FileNotFound(path.as_ref().to_path_buf())
            }
            other => other,
        })
    }

    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{err}\n\nHint: {hint}"))
        })
    }

    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{msg}: {err}"))
        })
    }
}
