//! NormControl command-line client
//!
//! Uploads a PDF drawing to the normcontrol service, waits for the
//! analysis, prints the verdict with every violation and saves the
//! "red pencil" text report next to it.
//!
//! Settings come from (lowest to highest priority) built-in defaults, a
//! TOML file given with `--config`, `NORMCONTROL_*` environment variables
//! (a `.env` file is honoured) and command-line flags.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use normcontrol_client::{ClientConfig, Controller, HttpApi, Pacing, SelectedFile, TokioTimer};
use tracing::{debug, info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod terminal;

use terminal::TerminalFrontend;

/// Command-line arguments for the normcontrol client
#[derive(Parser, Debug)]
#[command(name = "normcontrol")]
#[command(about = "Check a PDF drawing against normcontrol rules")]
struct Args {
    /// PDF file to check
    file: Option<PathBuf>,

    /// Base URL of the normcontrol service
    #[arg(short, long)]
    server: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the text report is saved into
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Skip downloading the text report
    #[arg(long)]
    no_report: bool,

    /// Also write the results as an HTML fragment
    #[arg(long)]
    html: Option<PathBuf>,

    /// Per-request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Skip the cosmetic progress pauses
    #[arg(long)]
    no_delay: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn load_config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => ClientConfig::default(),
        };
        config.apply_env();

        if let Some(server) = &self.server {
            config.server.base_url = server.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output.report_dir = dir.clone();
        }
        if let Some(ms) = self.timeout_ms {
            config.server.request_timeout_ms = Some(ms);
        }

        Ok(config)
    }

    fn pacing(&self, config: &ClientConfig) -> Pacing {
        if self.no_delay {
            Pacing::immediate()
        } else {
            config.pacing.pacing()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = args.load_config()?;
    debug!("Configuration: {:?}", config);
    info!("Using normcontrol service at {}", config.server.base_url);

    // No path is the CLI equivalent of submitting an empty form
    let file = args
        .file
        .as_deref()
        .map(SelectedFile::from_path)
        .transpose()
        .context("Failed to read input file")?;

    let api = HttpApi::new(&config.server).context("Failed to create HTTP client")?;
    let frontend = TerminalFrontend::stdio(config.output.report_dir.clone());
    let mut controller = Controller::new(api, TokioTimer, frontend, args.pacing(&config));

    if controller.submit(file).await.is_err() {
        // Already shown through the Error panel
        return Ok(ExitCode::FAILURE);
    }

    if let Some(path) = &args.html {
        if let Some(results) = controller.frontend().last_results() {
            std::fs::write(path, results.to_html())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Results written to {}", path.display());
        }
    }

    if !args.no_report && controller.download_report().await.is_err() {
        return Ok(ExitCode::from(2));
    }

    Ok(ExitCode::SUCCESS)
}
