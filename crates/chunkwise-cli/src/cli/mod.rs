//! Command-line interface definition.
//!
//! - `chunkwise classify` - assign module ids to output bundles
//! - `chunkwise name` - content-hashed output path of one file
//! - `chunkwise plan` - classify and name a whole build
//! - `chunkwise dev` - development API proxy
//! - `chunkwise check` - validate configuration

mod commands;
pub mod enums;

use std::path::PathBuf;

use clap::Parser;

pub use commands::{CheckArgs, ClassifyArgs, Command, DevArgs, NameArgs, PlanArgs};
pub use enums::*;

/// Chunkwise - output partitioning and dev proxy for front-end builds
#[derive(Parser, Debug)]
#[command(
    name = "chunkwise",
    version,
    about = "Output partitioning, content-hashed naming and a dev API proxy",
    long_about = "Chunkwise decides which output bundle every module of a front-end build\n\
                  belongs to, names chunks and assets with content hashes, and runs the\n\
                  development proxy that forwards API calls to your backend."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file to use instead of discovering one
    ///
    /// Accepts chunkwise.toml-style TOML, plain JSON, or a package.json with
    /// a "chunkwise" field. Relative paths are resolved against --cwd.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Build mode whose [profiles.<mode>] overrides are applied
    ///
    /// Defaults to "development" for `dev` and "production" otherwise.
    #[arg(short, long, global = true, value_name = "MODE")]
    pub mode: Option<String>,

    /// Project root (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags shared by every command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub mode: Option<String>,
    pub cwd: Option<PathBuf>,
}

impl Cli {
    pub fn global(&self) -> GlobalOptions {
        GlobalOptions {
            config: self.config.clone(),
            mode: self.mode.clone(),
            cwd: self.cwd.clone(),
        }
    }
}
