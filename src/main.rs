mod app;
mod config;
mod display;
mod error;
mod export;
mod features;
mod input;
mod messages;
mod replay;
mod sample;
mod services;

use app::App;
use config::Config;
use features::FeatureLayer;
use replay::{Replay, ReplayOutcome};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about = "Record pointer coordinates into replayable JSON logs")]
struct Args {
    /// Config file (defaults to ~/.config/trail-recorder/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Mode>,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Read key and pointer events from stdin and record them
    Record,
    /// Walk a feature through an exported log
    Replay {
        file: PathBuf,

        /// Feature to move (defaults to `feature_name` from the config)
        #[arg(short, long)]
        feature: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("Starting trail-recorder");

    let config = Config::load(args.config.as_deref())?;
    config.validate()?;

    match args.command.unwrap_or(Mode::Record) {
        Mode::Record => {
            let app = App::new(&config).run().await?;
            tracing::info!("Session ended with {} samples in the log", app.recorder().log().len());
        }
        Mode::Replay { file, feature } => {
            let feature = feature.unwrap_or_else(|| config.feature_name.clone());
            run_replay(&config, &file, &feature).await?;
        }
    }

    tracing::info!("trail-recorder shutdown complete");
    Ok(())
}

async fn run_replay(config: &Config, file: &std::path::Path, feature: &str) -> Result<()> {
    let samples = export::load_log(file)?;
    let replay = Replay::from_log(&samples, config.replay_interval())
        .with_context(|| format!("Cannot replay {:?}", file))?;
    if replay.is_empty() {
        tracing::warn!("{:?} holds no samples, nothing to replay", file);
        return Ok(());
    }
    tracing::info!("Replaying {} samples from {:?}", replay.len(), file);

    let mut layer = FeatureLayer::new();
    layer.add(feature, 0.0, 0.0);

    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received Ctrl+C, cancelling replay");
            let _ = cancel_tx.send(true);
        } else {
            // Keep the sender alive; a dropped sender reads as a cancel.
            std::future::pending::<()>().await;
        }
    });

    match replay.run(feature, &mut layer, cancel_rx).await? {
        ReplayOutcome::Completed(n) => tracing::info!("Replay finished after {} steps", n),
        ReplayOutcome::Cancelled(n) => tracing::info!("Replay cancelled after {} steps", n),
    }

    if let Some((lon, lat)) = layer.position(feature) {
        tracing::info!("{} final position: lon={} lat={}", feature, lon, lat);
    }

    Ok(())
}
