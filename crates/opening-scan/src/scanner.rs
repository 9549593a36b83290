//! Batch scanner: runs the matcher over a collection and writes the matches.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::ops::AddAssign;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pgn_core::{diagram, pgn, GameRecord};
use tracing::{debug, info, warn};

use crate::matcher::{MatchEvent, MatchReport, Matcher, Verdict};
use crate::pattern::Pattern;
use crate::report::ScanLog;

/// Games scanned and games matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub total: usize,
    pub matched: usize,
}

impl AddAssign for ScanSummary {
    fn add_assign(&mut self, other: Self) {
        self.total += other.total;
        self.matched += other.matched;
    }
}

impl fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}:", self.total, self.matched)
    }
}

pub struct Scanner<'p> {
    matcher: Matcher<'p>,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'p> Scanner<'p> {
    pub fn new(pattern: &'p Pattern) -> Self {
        Self {
            matcher: Matcher::new(pattern),
            cancel: None,
        }
    }

    /// Stop between games once `flag` is set.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Scan one PGN file. A missing or unreadable input is logged and scanned
    /// as an empty collection.
    pub fn scan_path<M: Write, L: Write>(
        &self,
        path: &Path,
        matches: &mut M,
        log: &mut ScanLog<L>,
    ) -> ScanSummary {
        log.line(format!("Process PGN = {}", path.display()));

        let summary = match File::open(path) {
            Ok(file) => self.scan_reader(BufReader::new(file), matches, log),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot open PGN input");
                log.line(format!("Cannot open {}: {}", path.display(), e));
                ScanSummary::default()
            }
        };

        log.line(format!("PreSummary {summary}"));
        summary
    }

    /// Parse a PGN stream and scan whatever games it yields. Parse issues are
    /// logged; recovered games are still scanned. Cancellation is also checked
    /// between games while parsing.
    pub fn scan_reader<R: Read, M: Write, L: Write>(
        &self,
        input: R,
        matches: &mut M,
        log: &mut ScanLog<L>,
    ) -> ScanSummary {
        let collection = pgn::read_collection_until(input, || self.is_cancelled());
        for issue in &collection.issues {
            warn!(error = %issue, "PGN parse issue");
            log.line(format!("GamesFromPGN with err = {issue}"));
        }
        self.scan(&collection.games, matches, log)
    }

    /// Scan games in order, appending every match to `matches`.
    pub fn scan<M: Write, L: Write>(
        &self,
        games: &[GameRecord],
        matches: &mut M,
        log: &mut ScanLog<L>,
    ) -> ScanSummary {
        let mut summary = ScanSummary::default();

        for (index, game) in games.iter().enumerate() {
            if self.is_cancelled() {
                info!(scanned = summary.total, "Scan cancelled");
                log.line(format!("Cancelled after {} games", summary.total));
                break;
            }

            summary.total += 1;
            let report = self.matcher.evaluate(game);
            debug!(game = index, verdict = ?report.verdict, "Game scanned");
            self.log_diagnostics(&report, log);

            if report.is_match() {
                summary.matched += 1;
                self.record_match(summary.total, index, game, matches, log);
            }
        }

        if let Err(e) = matches.flush() {
            warn!(error = %e, "Failed to flush matches output");
        }
        log.flush();
        summary
    }

    fn log_diagnostics<L: Write>(&self, report: &MatchReport, log: &mut ScanLog<L>) {
        let last_step = self.matcher.pattern().len() - 1;

        for event in &report.events {
            match *event {
                MatchEvent::StepSatisfied { ply, step } if step == last_step => {
                    log.line(format!("{ply}: {step}"));
                }
                MatchEvent::StepSatisfied { .. } => {}
            }
        }

        match report.verdict {
            Verdict::DisqualifyingCapture { ply, step } => {
                let piece = self.matcher.pattern().disqualifier();
                log.line(format!("{ply}: {piece} captured at step {step}"));
            }
            Verdict::PieceLost { ply, step } => {
                log.line(format!("{ply}: tracked piece captured at step {step}"));
            }
            Verdict::Matched { .. } | Verdict::Incomplete { .. } => {}
        }
    }

    fn record_match<M: Write, L: Write>(
        &self,
        count: usize,
        index: usize,
        game: &GameRecord,
        matches: &mut M,
        log: &mut ScanLog<L>,
    ) {
        let text = pgn::write_pgn(game);

        if let Err(e) = write!(matches, "{text}\n\n") {
            warn!(game = index, error = %e, "Failed to write matched game");
            log.line(format!("Cannot write game {index}: {e}"));
        }

        log.line(format!("FIND!! {count}: {index}:"));
        log.blank();
        log.line(&text);
        log.blank();
        log.line(diagram::render_board(game.final_board()).trim_end());
        log.blank();
    }
}
