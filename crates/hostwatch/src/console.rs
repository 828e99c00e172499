//! Interactive command loop
//!
//! Reads one command per line: an address to track, an empty line to
//! refresh, or `q` to quit. Every command except quit ends with a refresh
//! and a freshly rendered table.

use std::io::Write;

use anyhow::Result;
use hostwatch_core::HostRegistry;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::render::render_table;

/// Prompt shown before every command
pub const PROMPT: &str = "Type an IP address to track, press 'enter' to update all tracked hosts or type 'q' to quit: ";

/// A parsed console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Leave the loop
    Quit,
    /// Probe every tracked host
    Refresh,
    /// Track an address, then refresh
    Track(String),
}

impl Command {
    /// Parse one input line (trimmed, case-insensitive)
    pub fn parse(line: &str) -> Self {
        let line = line.trim().to_lowercase();
        match line.as_str() {
            "q" => Command::Quit,
            "" => Command::Refresh,
            _ => Command::Track(line),
        }
    }
}

/// Why the loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The user typed `q`
    Quit,
    /// Input closed
    EndOfInput,
}

/// Run the command loop until `q` or end of input
pub async fn run<R, W>(registry: &HostRegistry, input: R, out: &mut W) -> Result<ExitReason>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            return Ok(ExitReason::EndOfInput);
        };

        let command = Command::parse(&line);
        debug!(?command, "Command received");

        match command {
            Command::Quit => return Ok(ExitReason::Quit),
            Command::Refresh => {}
            Command::Track(addr) => {
                if let Err(e) = registry.add_host(&addr).await {
                    writeln!(out, "{}", e)?;
                }
            }
        }

        refresh_and_render(registry, out).await?;
    }
}

/// Refresh every host and print the resulting table
pub async fn refresh_and_render<W: Write>(registry: &HostRegistry, out: &mut W) -> Result<()> {
    writeln!(out, "\nChecking hosts...")?;
    out.flush()?;

    registry.refresh_all().await;

    let snapshot = registry.snapshot().await;
    write!(out, "{}", render_table(&snapshot))?;
    out.flush()?;
    Ok(())
}
