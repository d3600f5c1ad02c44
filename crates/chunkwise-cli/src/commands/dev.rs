//! `chunkwise dev`: run the development API proxy until Ctrl+C.

use std::sync::Arc;

use chunkwise_config::dev::DEFAULT_API_PREFIX;
use chunkwise_config::{DevConfig, ProxyConfig};
use url::Url;

use crate::cli::{DevArgs, GlobalOptions};
use crate::commands::utils;
use crate::dev::proxy::DEVELOPMENT_MODE;
use crate::dev::{DevServer, DevelopmentOnly, Forwarder, ProxyRules, TracingObserver};
use crate::error::{InputError, Result};
use crate::ui;

pub async fn execute(args: DevArgs, global: &GlobalOptions) -> Result<()> {
    ui::info("Starting development proxy...");

    let mut project = utils::load_project(global, DEVELOPMENT_MODE)?;
    apply_args(&mut project.config.dev, &args)?;
    project.config.validate()?;
    let dev = &project.config.dev;

    let development = DevelopmentOnly::for_mode(&project.mode);
    if development.is_none() {
        for prefix in dev.insecure_rules() {
            ui::warning(&format!(
                "{prefix}: secure = false is ignored in {} mode; certificates are verified",
                project.mode
            ));
        }
    }

    let rules = ProxyRules::from_config(dev)?;
    for rule in rules.iter() {
        let target = rule.upstream_url(&rule.rewrite_path(rule.prefix()), None);
        ui::info(&format!("  {} → {}", rule.prefix(), target));
    }

    let forwarder = Forwarder::new(development)?.with_observer(Arc::new(TracingObserver));
    let mut handle = DevServer::new(dev.host.as_str(), dev.port, rules, forwarder)
        .cors(dev.cors)
        .start()
        .await?;

    let url = handle.url();
    ui::success(&format!("Development proxy running at {url}"));
    if dev.open {
        open_browser(&url);
    }
    ui::info("Press Ctrl+C to stop");

    let stopped = tokio::select! {
        _ = tokio::signal::ctrl_c() => None,
        result = handle.stopped() => Some(result),
    };

    match stopped {
        None => {
            ui::info("Shutting down development proxy...");
            handle.shutdown().await?;
        }
        Some(result) => {
            ui::warning("Server stopped unexpectedly");
            result?;
        }
    }

    ui::success("Development proxy stopped");
    Ok(())
}

/// Command-line flags override the loaded configuration.
fn apply_args(dev: &mut DevConfig, args: &DevArgs) -> Result<()> {
    if let Some(host) = &args.host {
        dev.host = host.clone();
    }
    if let Some(port) = args.port {
        dev.port = port;
    }
    if let Some(upstream) = &args.upstream {
        check_upstream(upstream)?;
        dev.proxy
            .entry(DEFAULT_API_PREFIX.to_string())
            .or_insert_with(ProxyConfig::api_default)
            .target = upstream.clone();
    }
    if args.open {
        dev.open = true;
    }
    if args.no_open {
        dev.open = false;
    }
    if args.insecure_upstream {
        for rule in dev.proxy.values_mut() {
            rule.secure = false;
        }
    }
    Ok(())
}

fn check_upstream(upstream: &str) -> Result<()> {
    let invalid = |message: String| InputError::InvalidUpstream {
        url: upstream.to_string(),
        message,
    };
    let url = Url::parse(upstream).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())).into());
    }
    Ok(())
}

/// Open `url` in the default browser.
fn open_browser(url: &str) {
    use std::process::Command;

    let result = if cfg!(target_os = "macos") {
        Command::new("open").arg(url).spawn()
    } else if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", "start", url]).spawn()
    } else {
        Command::new("xdg-open").arg(url).spawn()
    };

    match result {
        Ok(_) => ui::info(&format!("Opened browser at {url}")),
        Err(e) => ui::warning(&format!("Failed to open browser: {e}")),
    }
}
