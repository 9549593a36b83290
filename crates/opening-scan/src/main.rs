//! Opening line scanner.
//!
//! Scans PGN files for games that follow the configured checklist of moves and
//! appends every matching game to a PGN file.
//!
//! Usage:
//!   opening-scan                                 scan the built-in demo inputs
//!   opening-scan <input.pgn>                     -> <input>.out.pgn, <input>.log
//!   opening-scan <input.pgn> <matches.pgn>
//!   opening-scan <input.pgn> <matches.pgn> <log>
//!
//! The one-argument form names the matches file `<stem>.out.pgn`, not the
//! `.out.png` some older scripts look for.
//!
//! The pattern comes from SCAN_PATTERN_FILE, SCAN_PATTERN or the built-in
//! c2-c4, c4-c5, c5-c6, c6xd7 line.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use opening_scan::config::RunConfig;
use opening_scan::report::{ScanLog, Tee};
use opening_scan::{ScanError, ScanSummary, Scanner};
use tracing::{info, warn};

fn open_append(path: &Path) -> Result<File, ScanError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ScanError::io(path, e))
}

/// Open both outputs, then scan every input in order.
fn run(config: RunConfig, cancel: Arc<AtomicBool>) -> Result<ScanSummary, ScanError> {
    let log_file = open_append(&config.log_path)?;
    let matches_file = open_append(&config.matches_path)?;

    let mut matches = BufWriter::new(matches_file);
    let mut log = ScanLog::new(Tee::new(io::stdout(), BufWriter::new(log_file)));
    let scanner = Scanner::new(&config.pattern).with_cancel(cancel);

    let mut total = ScanSummary::default();
    for input in &config.inputs {
        if scanner.is_cancelled() {
            break;
        }
        total += scanner.scan_path(input, &mut matches, &mut log);
    }

    log.line(format!("Summary {total}"));
    log.flush();
    Ok(total)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the scan log, so diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Load .env file for local runs
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = RunConfig::load(&args)?;
    info!(
        inputs = config.inputs.len(),
        matches = %config.matches_path.display(),
        log = %config.log_path.display(),
        pattern = %config.pattern,
        demo = config.demo,
        "Scan config loaded"
    );

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, stopping after the current game");
                cancel.store(true, Ordering::Relaxed);
            }
        });
    }

    let summary = tokio::task::spawn_blocking(move || run(config, cancel)).await??;
    info!(
        total = summary.total,
        matched = summary.matched,
        "Scan finished"
    );

    Ok(())
}
