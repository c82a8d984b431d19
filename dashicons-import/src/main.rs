//! dashicons-import - submission import CLI
//!
//! Imports one approved submission into the icon collection. Exits 0 on
//! success (including dry runs) and 1 on any failure.

use anyhow::{Context, Result};
use clap::Parser;
use dashicons_common::config::{load_toml_config, TomlConfig};
use dashicons_common::logging::init_tracing;
use dashicons_import::config::{CliOverrides, ImportConfig};
use dashicons_import::services::{MaterializeOutcome, PocketBaseClient};
use dashicons_import::{ImportPipeline, PipelineConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[clap(name = "dashicons-import", version)]
#[clap(about = "Import an approved icon submission into the collection")]
struct Args {
    /// Submission record id to import
    #[clap(long, value_name = "ID")]
    submission_id: Option<String>,

    /// Log intended actions without downloading, writing or updating status
    #[clap(long)]
    dry_run: bool,

    /// Append step outputs to this file (defaults to $GITHUB_OUTPUT)
    #[clap(long, value_name = "FILE")]
    gha_output: Option<PathBuf>,

    /// Collection root containing svg/, png/ and webp/
    #[clap(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// metadata.json location (defaults to <root>/metadata.json)
    #[clap(long, value_name = "FILE")]
    metadata: Option<PathBuf>,

    /// TOML config file
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level or filter directive (RUST_LOG takes precedence)
    #[clap(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let toml_config = load_toml_config(args.config.as_deref());
    let log_level = args.log_level.clone().or_else(|| {
        toml_config
            .as_ref()
            .ok()
            .and_then(|c| c.logging.level.clone())
    });
    if let Err(e) = init_tracing(log_level.as_deref()) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::from(1);
    }

    info!(
        "dashicons-import {} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match run(args, toml_config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Import failed: {:#}", e);
            ExitCode::from(1)
        }
    }
}

async fn run(args: Args, toml_config: dashicons_common::Result<TomlConfig>) -> Result<()> {
    let toml_config = toml_config.context("Failed to load configuration file")?;

    let cli = CliOverrides {
        submission_id: args.submission_id,
        dry_run: args.dry_run,
        gha_output: args.gha_output,
        root: args.root,
        metadata: args.metadata,
    };
    let config = ImportConfig::resolve(cli, &toml_config)?;

    let client = PocketBaseClient::new(&config.pb_url, &config.pb_admin_token, config.http_timeout)
        .context("Failed to build backend client")?;

    let pipeline = ImportPipeline::new(&client, PipelineConfig::from(&config));
    let report = pipeline
        .run(&config.submission_id)
        .await
        .with_context(|| format!("Submission {}", config.submission_id))?;

    if config.dry_run {
        let would_download = report
            .outcomes
            .iter()
            .filter(|(_, o)| matches!(o, MaterializeOutcome::SkippedDryRun { .. }))
            .count();
        info!(icon = %report.submission.name, would_download, "Dry run finished");
    }

    Ok(())
}
