//! Smart-mute command line interface.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use smute_cli::{process_directory, PipelineConfig, SmartMutePipeline};
use smute_client::{config::DEFAULT_BASE_URL, ClientConfig, JobClient};

/// Detect and remove music from audio files.
#[derive(Debug, Parser)]
#[command(name = "smute", version)]
struct Cli {
    /// Input audio file, or a directory of audio files
    input: PathBuf,

    /// API token; falls back to the TOKEN environment variable
    token: Option<String>,

    /// Override the job service base URL
    #[arg(long, alias = "base_url", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Seconds between remote job status polls
    #[arg(long, default_value_t = 5)]
    poll_interval: u64,

    /// Wall-clock budget per remote job, in seconds
    #[arg(long, default_value_t = 600)]
    timeout: u64,

    /// Maximum files processed concurrently in directory mode
    #[arg(long, default_value_t = 5)]
    jobs: usize,

    /// Parent directory for temporary workspaces
    #[arg(long)]
    work_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Colored output for dev, JSON when requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("smute=info,smute_client=info,smute_media=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(true).with_target(false))
            .with(env_filter)
            .init();
    }

    let cli = Cli::parse();

    let token = cli
        .token
        .or_else(|| std::env::var("TOKEN").ok())
        .context("no API token given (pass it as an argument or set TOKEN)")?;

    let client_config = ClientConfig::new(token).with_base_url(cli.base_url);
    let client = JobClient::new(client_config).context("failed to build service client")?;

    let mut pipeline_config = PipelineConfig {
        poll_interval: Duration::from_secs(cli.poll_interval),
        job_timeout: Duration::from_secs(cli.timeout),
        max_concurrent_files: cli.jobs,
        ..PipelineConfig::from_env()
    };
    if let Some(work_dir) = cli.work_dir {
        pipeline_config.work_dir = work_dir;
    }

    let pipeline = SmartMutePipeline::new(client, pipeline_config);

    if cli.input.is_dir() {
        let summary = process_directory(&pipeline, &cli.input).await?;
        info!(
            succeeded = summary.succeeded.len(),
            failed = summary.failed.len(),
            "Batch run finished"
        );
        for (input, reason) in &summary.failed {
            error!(input = %input.display(), reason = %reason, "Failed");
        }
        if !summary.all_succeeded() {
            std::process::exit(1);
        }
    } else {
        match pipeline.process(&cli.input).await {
            Ok(output) => {
                println!("Process complete. Output written to: {}", output.display());
            }
            Err(e) => {
                error!(input = %cli.input.display(), error = %e, "Processing failed");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
