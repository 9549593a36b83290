//! Opening line scanner.
//!
//! Walks PGN collections looking for games whose tracked side plays an ordered
//! checklist of move transitions, and reports the games that do.

pub mod config;
pub mod error;
pub mod matcher;
pub mod pattern;
pub mod report;
pub mod scanner;

pub use error::ScanError;
pub use matcher::{MatchEvent, MatchReport, Matcher, Verdict};
pub use pattern::{Disqualifier, Pattern, Transition};
pub use scanner::{ScanSummary, Scanner};
