//! tether host simulator
//!
//! Stands in for the instrumented application: starts a session, polls it
//! once per simulated frame, and sends the shutdown notification when the
//! frame budget runs out or the session says to stop.
//!
//! Usage:
//!   tether-tester --base-url http://localhost:8080 --frames 300

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tether_session::{ClientVersion, Security, SecurityConfig, SimulatedHost};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tether-tester")]
#[command(about = "Simulated host loop for a tether licensing session")]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the authority base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Override the license file location
    #[arg(long)]
    license: Option<PathBuf>,

    /// Override the heartbeat interval in seconds
    #[arg(long)]
    pulse_interval: Option<u64>,

    /// Number of frames to run
    #[arg(long, default_value = "300")]
    frames: u64,

    /// Frame period in milliseconds
    #[arg(long, default_value = "50")]
    frame_ms: u64,

    /// Runtime version the simulated host reports (defaults to a compatible one)
    #[arg(long)]
    runtime_version: Option<u64>,

    /// Simulate the subject being in an unsafe state
    #[arg(long)]
    unsafe_state: bool,

    /// How long to keep the process alive after sending shutdown
    #[arg(long, default_value = "500")]
    shutdown_grace_ms: u64,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .compact()
        .init();

    let config = build_config(&args)?;
    let host = Arc::new(SimulatedHost::new(
        args.runtime_version
            .unwrap_or(ClientVersion::current().minor),
    ));
    host.set_unsafe(args.unsafe_state);

    info!("Starting session against {}", config.authority.base_url);
    let mut security = match Security::start(config, host).await {
        Ok(security) => security,
        Err(e) => {
            error!("Startup failed: {}", e);
            return Err(e.into());
        }
    };

    let mut ticker = tokio::time::interval(Duration::from_millis(args.frame_ms.max(1)));
    let mut frame = 0;
    while frame < args.frames {
        ticker.tick().await;
        frame += 1;
        if !security.poll() {
            warn!("Frame {}: liveness check failed, stopping", frame);
            break;
        }
        if frame % 100 == 0 {
            debug!("Frame {}: {:?}", frame, security.heartbeat_state());
        }
    }

    security.shutdown();
    tokio::time::sleep(Duration::from_millis(args.shutdown_grace_ms)).await;
    info!("Finished after {} frames", frame);
    Ok(())
}

fn build_config(args: &Args) -> Result<SecurityConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SecurityConfig::default(),
    };
    if let Some(url) = &args.base_url {
        config.authority.base_url = url.clone();
    }
    if let Some(path) = &args.license {
        config.license_path = Some(path.clone());
    }
    if let Some(secs) = args.pulse_interval {
        config.pulse_interval_secs = secs;
    }
    Ok(config)
}

fn load_config(path: &Path) -> Result<SecurityConfig> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    serde_json::from_slice(&bytes).context("Failed to parse config file")
}
