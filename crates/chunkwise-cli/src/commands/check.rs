//! `chunkwise check`: validate configuration against the project.

use chunkwise_config::{ChunkwiseConfig, ConfigValidator, DevConfig, FsValidator, OutputConfig, PartitionConfig};
use serde::Serialize;

use crate::cli::{CheckArgs, GlobalOptions};
use crate::commands::utils;
use crate::error::{CliError, Result};
use crate::ui;

/// The sections that take effect, without the profile tables.
#[derive(Serialize)]
struct EffectiveConfig<'a> {
    partition: &'a PartitionConfig,
    output: &'a OutputConfig,
    dev: &'a DevConfig,
}

/// Execute the check command.
///
/// # Validation Steps
///
/// 1. Load configuration for the requested mode (default `production`)
/// 2. Build the classifier and namer, and check every proxy rule
/// 3. Check the output directory against the filesystem
/// 4. Warn about missing application subtrees and insecure proxy rules
pub fn execute(args: CheckArgs, global: &GlobalOptions) -> Result<()> {
    ui::info("Checking configuration...");

    let project = utils::load_project(global, utils::PRODUCTION_MODE)?;
    match &project.source {
        Some(source) => ui::info(&format!("Using {}", source.path().display())),
        None => ui::warning("No chunkwise.toml or package.json \"chunkwise\" field found, using defaults"),
    }

    let validator = FsValidator::new(&project.root);
    validator.validate(&project.config)?;
    ui::success(&format!("Configuration is valid ({} mode)", project.mode));

    for subtree in validator.missing_subtrees(&project.config) {
        ui::warning(&format!("Subtree {subtree} does not exist; its bundle will stay empty"));
    }
    for prefix in project.config.dev.insecure_rules() {
        ui::warning(&format!(
            "Proxy rule {prefix} skips certificate checks (honored in development mode only)"
        ));
    }

    for line in summary(&project.config) {
        ui::info(&line);
    }

    if args.print {
        println!("{}", render_toml(&project.config)?);
    }
    Ok(())
}

fn summary(config: &ChunkwiseConfig) -> Vec<String> {
    let output = &config.output;
    let mut lines = vec![
        format!("Output: {} served under {}", output.out_dir.display(), output.base),
        format!(
            "Hashes: {} characters, chunk size warning at {} KiB",
            output.hash_length, output.chunk_size_warning_kib
        ),
        format!("Dev server: {}:{}", config.dev.host, config.dev.port),
    ];
    for (prefix, rule) in &config.dev.proxy {
        let rewrite = rule.rewrite.as_deref().unwrap_or(prefix);
        lines.push(format!("  {prefix} → {}{rewrite}", rule.target.trim_end_matches('/')));
    }
    lines
}

fn render_toml(config: &ChunkwiseConfig) -> Result<String> {
    let effective = EffectiveConfig {
        partition: &config.partition,
        output: &config.output,
        dev: &config.dev,
    };
    toml::to_string_pretty(&effective)
        .map_err(|err| CliError::Custom(format!("failed to render configuration: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_proxy_rules() {
        let lines = summary(&ChunkwiseConfig::default());
        assert!(lines.iter().any(|line| line.contains("/static/dist/")));
        assert!(lines.contains(&"  /api → http://localhost:5000/api/v1".to_string()));
    }

    #[test]
    fn effective_config_renders_as_toml() {
        let rendered = render_toml(&ChunkwiseConfig::default()).unwrap();
        assert!(rendered.contains("[partition]"));
        assert!(rendered.contains("base = \"/static/dist/\""));
        assert!(rendered.contains("target = \"http://localhost:5000\""));
    }
}
