//! Chunkwise CLI - bundle partitioning and the development API proxy.
//!
//! The binary exposes `chunkwise-core` and `chunkwise-config` on the command
//! line and runs the development proxy that routes API calls to a backend.
//!
//! # Architecture
//!
//! - [`cli`] - argument definitions
//! - [`commands`] - one module per subcommand
//! - [`dev`] - the development proxy (rules, forwarding, observers, server)
//! - [`error`] - error types with actionable messages
//! - [`logger`] - tracing setup
//! - [`ui`] - terminal status lines and formatting
//!
//! # Example
//!
//! ```rust
//! use chunkwise_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod dev;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result, ResultExt};
