//! Conversion of CLI errors into `miette` reports.

use chunkwise_config::ConfigError;
use miette::Report;

use crate::error::CliError;

pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => config_error_to_miette(e),
        CliError::Core(e) => miette::miette!(
            help = "Templates need a {contentHash} placeholder; run `chunkwise check` for details",
            "{}",
            e
        ),
        CliError::Proxy(msg) => miette::miette!(
            help = "Check the [dev.proxy] tables of your configuration",
            "Proxy error: {}",
            msg
        ),
        other => miette::miette!("{}", other),
    }
}

fn config_error_to_miette(err: ConfigError) -> Report {
    match &err {
        ConfigError::NotFound { .. } => miette::miette!(
            help = "Create a chunkwise.toml, add a \"chunkwise\" field to package.json, or pass --config <path>",
            "{}",
            err
        ),
        ConfigError::UnsupportedFormat { .. } => miette::miette!(
            help = "Use a .toml or .json file, or package.json",
            "{}",
            err
        ),
        ConfigError::InvalidProfileOverride { .. } => miette::miette!(
            help = "Profile tables take the same keys as the sections they override",
            "{}",
            err
        ),
        _ => match err.field() {
            Some(field) => miette::miette!(
                help = format!("Fix '{field}' in your configuration or the matching CHUNKWISE_ variable"),
                "Configuration error: {}",
                err
            ),
            None => miette::miette!("Configuration error: {}", err),
        },
    }
}
