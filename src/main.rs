// src/main.rs
use anyhow::Context;
use clap::Parser;
use ct_submit::cli::Cli;
use ct_submit::config::Config;
use ct_submit::ct_log::{LogListFetcher, LogRegistry, OutputTarget, SubmissionCoordinator};
use ct_submit::progress::ProgressIndicator;
use is_terminal::IsTerminal;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Validate arguments
    cli.validate()?;

    // Load config file, all sections are optional
    let config = match cli.config {
        Some(ref path) => Config::from_file(path)?,
        None => Config::default(),
    };

    // Initialize logging
    let log_level = cli.log_level_override().unwrap_or(config.logging.level.as_str());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // Resolve the log registry
    // Precedence: log list URL (CLI, then config) > [[logs]] > built-in
    let log_list_url = cli
        .log_list_url
        .clone()
        .or_else(|| config.submission.log_list_url.clone());

    let registry = if let Some(url) = log_list_url {
        LogListFetcher::new()?
            .fetch_providers(&url, config.submission.include_readonly)
            .await?
    } else if !config.logs.is_empty() {
        LogRegistry::new(config.logs.clone()).context("Invalid [[logs]] in config")?
    } else {
        LogRegistry::builtin()
    };

    if cli.list_logs {
        for provider in registry.providers() {
            println!("{:<28} {}", provider.name, provider.url);
        }
        if registry.providers().iter().any(|p| p.name.starts_with("comodo_")) {
            eprintln!("note: Comodo logs were named commodo_* by earlier releases; their .sct files are now comodo_*.sct");
        }
        return Ok(());
    }

    // Both are required by clap unless --list-logs is set
    let (Some(input), Some(output)) = (cli.input.as_ref(), cli.output.as_ref()) else {
        anyhow::bail!("please specify --input and --output");
    };

    let target = OutputTarget::new(output, cli.filename.clone())?;

    let timeout = cli
        .timeout
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.submission.timeout());

    let progress = ProgressIndicator::new(
        cli.should_show_progress() && std::io::stderr().is_terminal(),
        registry.len(),
    );

    let coordinator = SubmissionCoordinator::new(Arc::new(registry))
        .with_timeout(timeout)
        .with_progress(progress);

    let report = coordinator.submit_pem_file(input, &target).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.format_human(std::io::stdout().is_terminal()));
    }

    if report.succeeded() > 0 {
        tracing::info!(
            "Include {} in your nginx config using 'ssl_ct_static_scts'",
            output.display()
        );
    }

    Ok(())
}
