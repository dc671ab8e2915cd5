//! TrackColor GW - Rust implementation
//!
//! Mirrors the selected DAW track's color to an external MIDI device as a
//! six-message CC nibble sequence plus a fixed-format SysEx frame.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod config;
mod encoder;
mod eventlog;
mod midi;
mod selection;
mod transmitter;

use crate::cli::ReplCommand;
use crate::config::AppConfig;
use crate::eventlog::EventLog;
use crate::midi::MidiPortSink;
use crate::selection::SelectionEvent;
use crate::transmitter::ColorTransmitter;

/// TrackColor Gateway - send the selected track color to a MIDI device
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// List available MIDI ports
    #[arg(long)]
    list_ports: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level)?;

    if args.list_ports {
        midi::list_ports_formatted();
        return Ok(());
    }

    info!("Starting TrackColor GW...");
    info!("Configuration file: {}", args.config);

    let config = AppConfig::load(&args.config)?;

    run_app(config, shutdown_signal()).await?;

    info!("TrackColor GW shutdown complete");
    Ok(())
}

async fn run_app(config: AppConfig, shutdown: impl std::future::Future<Output = ()>) -> Result<()> {
    let sink = MidiPortSink::open(&config.midi.output_port)?;
    info!("MIDI output connected: {}", sink.port_name());

    let log = EventLog::new(config.log_file.as_ref().map(PathBuf::from));
    let mut transmitter =
        ColorTransmitter::new(config.protocol.clone(), sink, log.clone(), config.enabled);

    log.info("--- TrackColor GW initialized ---");

    // The REPL stands in for the host's selection notifications
    let (event_tx, mut event_rx) = mpsc::channel::<ReplCommand>(64);
    let repl_handle = tokio::task::spawn_blocking(move || cli::run_repl(event_tx));

    info!("Ready, type 'help' for commands");

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            Some(command) = event_rx.recv() => {
                match command {
                    ReplCommand::Selection(SelectionEvent::Changed(selection)) => {
                        transmitter.on_selection_changed(Some(&selection));
                    }
                    ReplCommand::Selection(SelectionEvent::Cleared) => {
                        transmitter.on_selection_changed(None);
                    }
                    ReplCommand::SetEnabled(enabled) => {
                        transmitter.set_enabled(enabled);
                    }
                    ReplCommand::ListPorts => {
                        midi::list_ports_formatted();
                    }
                    ReplCommand::Quit => break,
                }
            }

            _ = &mut shutdown => {
                info!("Shutdown signal received, stopping event loop");
                break;
            }
        }
    }

    if let Err(e) = repl_handle.await {
        warn!("REPL task ended abnormally: {}", e);
    }

    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    info!("Shutdown signal received");
}
