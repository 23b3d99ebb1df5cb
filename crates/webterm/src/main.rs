//! # webterm
//!
//! Replays a recorded terminal byte stream through the emulator and prints
//! the resulting screen.
//!
//! ## Architecture
//!
//! This is Layer 2 - the binary that ties together:
//! - webterm-core: Geometry, cells, preferences, errors
//! - webterm-emulator: Interpreter, screen model, IO routing

use clap::Parser;
use webterm::{render, replay_input, snapshot_schema, ReplayOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let options = ReplayOptions::parse();

    if options.schema {
        println!("{}", snapshot_schema()?);
        return Ok(());
    }

    let prefs = options.preferences()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&prefs.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        columns = prefs.columns,
        rows = prefs.rows,
        "webterm v{} replaying {}",
        env!("CARGO_PKG_VERSION"),
        options
            .input
            .as_ref()
            .map_or_else(|| "stdin".to_string(), |p| p.display().to_string())
    );

    let terminal = replay_input(&options, prefs).await.map_err(|e| {
        tracing::error!("Replay failed: {}", e);
        e
    })?;

    println!("{}", render(&terminal, options.json)?);
    Ok(())
}
