use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use altsource_sync::cli::Cli;
use altsource_sync::github::GitHubReleases;
use altsource_sync::{run_sync, ReconcileOutcome};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .without_time()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.into_config().context("invalid configuration")?;
    let source = GitHubReleases::from_config(&config)?;

    let report = run_sync(&config, &source)
        .await
        .with_context(|| format!("sync of {} failed", config.project_id))?;

    match &report.outcome {
        ReconcileOutcome::AlreadyUpToDate => {
            println!("Already up to date ({}).", report.release.version);
        }
        ReconcileOutcome::Updated(entry) if report.catalog_written => {
            println!(
                "Added version {} to {}.",
                entry.version,
                config.catalog_path.display()
            );
        }
        ReconcileOutcome::Updated(entry) => {
            println!("Would add version {} (dry run).", entry.version);
            println!("{}", serde_json::to_string_pretty(&entry.to_value())?);
        }
    }

    Ok(())
}
