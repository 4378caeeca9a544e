// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Luotain - Public-Signals Suppression Screen
 * Serves the screen as an HTTP function or runs one-shot scans
 *
 * (c) 2026 Bountyy Oy
 */

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use luotain_screen::artifacts::Baseline;
use luotain_screen::config::ScreenConfig;
use luotain_screen::report::ScreenResponse;
use luotain_screen::scan::ScreenEngine;
use luotain_screen::service::{create_router, ServiceState};

/// Luotain - public-signals suppression screen
#[derive(Parser)]
#[command(name = "luotain")]
#[command(author = "Bountyy Oy <info@bountyy.fi>")]
#[command(version = "1.0.0")]
#[command(about = "Screens a domain's public signals for de-indexation risk", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Quiet mode - only show errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the screen as an HTTP service
    Serve {
        /// Bind host (overrides SCREEN_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides SCREEN_PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Scan a single domain and print the report JSON
    Scan {
        /// Domain or URL to screen
        url: String,

        /// Path to a prior scan summary for trajectory computation
        #[arg(long)]
        baseline_file: Option<PathBuf>,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    match cli.command {
        Commands::Serve { host, port } => serve(host, port).await,
        Commands::Scan {
            url,
            baseline_file,
            output,
        } => scan_once(&url, baseline_file, output).await,
    }
}

fn init_tracing(cli: &Cli) {
    let level = if cli.quiet {
        "error"
    } else if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = ScreenConfig::default();
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    let engine = ScreenEngine::new(&config)?;
    let state = Arc::new(ServiceState::new(engine));
    let router = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("[Service] Listening on {}", address);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("[Service] Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("[Service] Shutdown signal received");
}

async fn scan_once(
    url: &str,
    baseline_file: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let baseline = baseline_file
        .map(|path| -> Result<Baseline> {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read baseline file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Invalid baseline JSON in {}", path.display()))
        })
        .transpose()?;

    let config = ScreenConfig::default();
    let engine = ScreenEngine::new(&config)?;
    let response = engine.scan(url, baseline).await;

    let json = serde_json::to_string_pretty(&response).context("Failed to serialize report")?;
    match output {
        Some(path) => std::fs::write(&path, &json)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", json),
    }

    // Scriptable gating: errors exit 1, RED exits 2.
    match &response {
        ScreenResponse::Error(_) => std::process::exit(1),
        ScreenResponse::Success(report) => {
            if report.result.risk_level == luotain_screen::artifacts::RiskLevel::Red {
                std::process::exit(2);
            }
        }
    }

    Ok(())
}
