//! Command implementations.
//!
//! Each module provides an `execute` function taking the parsed arguments of
//! its subcommand and the global options.

pub mod check;
pub mod classify;
pub mod dev;
pub mod name;
pub mod plan;
pub(crate) mod utils;

pub use check::execute as check_execute;
pub use classify::execute as classify_execute;
pub use dev::execute as dev_execute;
pub use name::execute as name_execute;
pub use plan::execute as plan_execute;
