//! Chunkwise CLI entry point.
//!
//! Parses arguments, sets up logging and dispatches to a command.

use chunkwise_cli::{cli, commands, error, logger, ui};
use clap::Parser;
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let colors = ui::should_use_color(args.no_color);
    logger::init_logger(args.verbose, args.quiet, !colors);
    ui::init_colors(colors);

    let global = args.global();
    let result = match args.command {
        cli::Command::Classify(classify_args) => commands::classify_execute(classify_args, &global),
        cli::Command::Name(name_args) => commands::name_execute(name_args, &global),
        cli::Command::Plan(plan_args) => commands::plan_execute(plan_args, &global),
        cli::Command::Dev(dev_args) => commands::dev_execute(dev_args, &global).await,
        cli::Command::Check(check_args) => commands::check_execute(check_args, &global),
    };

    result.map_err(error::cli_error_to_miette)
}
