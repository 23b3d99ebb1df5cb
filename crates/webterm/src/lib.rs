//! Replay support for the `webterm` binary.
//!
//! Reads a recorded terminal byte stream, feeds it through a
//! [`Terminal`] in fixed-size chunks and renders the final screen either as
//! plain text or as a JSON [`ScreenSnapshot`].

use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, info};

use webterm_core::{Size, TerminalPreferences};
use webterm_emulator::{ScreenSnapshot, Terminal};

/// Bytes read from the input per chunk.
pub const CHUNK_SIZE: usize = 4096;

const LONG_ABOUT: &str = r#"Replays a recorded terminal byte stream through the emulator and prints
the final screen.

The stream is read from FILE, or from stdin when FILE is omitted. Escape
sequences are interpreted exactly as a terminal would; only the resulting
screen is printed.

EXAMPLES:
    webterm session.log
    webterm --cols 120 --rows 40 --json session.log
    script -q /dev/null top | webterm"#;

#[derive(Debug, Clone, Default, PartialEq, Eq, Parser)]
#[command(name = "webterm")]
#[command(author, version)]
#[command(about = "Replay a terminal byte stream and print the resulting screen")]
#[command(long_about = LONG_ABOUT)]
pub struct ReplayOptions {
    /// Load terminal preferences from a YAML file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Screen width in columns
    #[arg(long = "cols", value_parser = clap::value_parser!(u16).range(1..))]
    pub columns: Option<u16>,

    /// Screen height in rows
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub rows: Option<u16>,

    /// Print the screen snapshot as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the JSON schema of the snapshot and exit
    #[arg(long)]
    pub schema: bool,

    /// Input file; stdin when omitted
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,
}

impl ReplayOptions {
    /// Preferences from the config file (or defaults) with size overrides.
    pub fn preferences(&self) -> webterm_core::Result<TerminalPreferences> {
        let prefs = match &self.config {
            Some(path) => TerminalPreferences::from_file(path)?,
            None => TerminalPreferences::default(),
        };
        let size = Size::new(
            self.columns.unwrap_or(prefs.columns),
            self.rows.unwrap_or(prefs.rows),
        );
        let prefs = prefs.with_size(size);
        prefs.validate()?;
        Ok(prefs)
    }
}

/// Feed everything `reader` yields into a new terminal.
pub async fn replay<R>(mut reader: R, prefs: TerminalPreferences) -> anyhow::Result<Terminal>
where
    R: AsyncRead + Unpin,
{
    let mut terminal = Terminal::new(prefs)?;
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total = 0usize;

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        total += n;
        terminal.consume_bytes(&buf[..n]);
    }

    let stats = terminal.stats();
    info!(bytes = total, "replay finished");
    debug!(
        dropped_string_sequences = stats.dropped_string_sequences,
        unknown_sequences = stats.unknown_sequences,
        "interpreter statistics"
    );
    Ok(terminal)
}

/// Replay the input named by `options` (or stdin).
pub async fn replay_input(
    options: &ReplayOptions,
    prefs: TerminalPreferences,
) -> anyhow::Result<Terminal> {
    match &options.input {
        Some(path) => {
            debug!(path = %path.display(), "replaying file");
            let file = tokio::fs::File::open(path).await?;
            replay(file, prefs).await
        }
        None => replay(tokio::io::stdin(), prefs).await,
    }
}

/// Render the final screen as text or pretty JSON.
pub fn render(terminal: &Terminal, json: bool) -> anyhow::Result<String> {
    let snapshot = terminal.snapshot();
    if json {
        return Ok(snapshot.to_json()?);
    }
    Ok(snapshot.text())
}

/// JSON schema of [`ScreenSnapshot`].
pub fn snapshot_schema() -> anyhow::Result<String> {
    let schema = schemars::schema_for!(ScreenSnapshot);
    Ok(serde_json::to_string_pretty(&schema)?)
}
