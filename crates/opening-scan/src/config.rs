//! Run configuration from positional arguments and environment variables.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::ScanError;
use crate::pattern::{Disqualifier, Pattern};

/// Inputs scanned when no arguments are given. Glob patterns are allowed.
pub const DEMO_INPUTS: &[&str] = &["Databases/test.pgn"];
pub const DEMO_MATCHES_PATH: &str = "pgnfind.pgn";
pub const DEMO_LOG_PATH: &str = "log.txt";

/// Compact pattern string, e.g. `c2-c4,c4-c5,c5-c6,c6xd7`.
pub const PATTERN_VAR: &str = "SCAN_PATTERN";
/// JSON pattern file; takes precedence over `SCAN_PATTERN`.
pub const PATTERN_FILE_VAR: &str = "SCAN_PATTERN_FILE";
/// Disqualifier override, e.g. `black:queen`.
pub const DISQUALIFY_VAR: &str = "SCAN_DISQUALIFY";

#[derive(Clone, Debug)]
pub struct RunConfig {
    pub inputs: Vec<PathBuf>,
    pub matches_path: PathBuf,
    pub log_path: PathBuf,
    pub pattern: Pattern,
    /// No arguments were given; the built-in input list is scanned.
    pub demo: bool,
}

impl RunConfig {
    /// Build from the process environment. `args` excludes the program name.
    pub fn load(args: &[String]) -> Result<Self, ScanError> {
        Self::from_parts(args, |key| env::var(key).ok())
    }

    /// Build from positional arguments and an environment lookup.
    pub fn from_parts<F>(args: &[String], lookup: F) -> Result<Self, ScanError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pattern = load_pattern(&lookup)?;

        if args.len() > 3 {
            warn!(extra = args.len() - 3, "Ignoring extra arguments");
        }

        let Some(input) = args.first() else {
            return Ok(Self {
                inputs: expand_inputs(DEMO_INPUTS)?,
                matches_path: PathBuf::from(DEMO_MATCHES_PATH),
                log_path: PathBuf::from(DEMO_LOG_PATH),
                pattern,
                demo: true,
            });
        };

        let input = PathBuf::from(input);
        let matches_path = args
            .get(1)
            .map(PathBuf::from)
            .unwrap_or_else(|| derive_matches_path(&input));
        let log_path = args
            .get(2)
            .map(PathBuf::from)
            .unwrap_or_else(|| derive_log_path(&input));

        Ok(Self {
            inputs: vec![input],
            matches_path,
            log_path,
            pattern,
            demo: false,
        })
    }
}

/// `games/blitz.pgn` -> `games/blitz.out.pgn`
pub fn derive_matches_path(input: &Path) -> PathBuf {
    input.with_extension("out.pgn")
}

/// `games/blitz.pgn` -> `games/blitz.log`
pub fn derive_log_path(input: &Path) -> PathBuf {
    input.with_extension("log")
}

/// Expand glob patterns. A pattern that matches nothing is kept verbatim so the
/// scanner can report the missing input.
fn expand_inputs(entries: &[&str]) -> Result<Vec<PathBuf>, ScanError> {
    let mut inputs = Vec::new();
    for entry in entries {
        let found: Vec<PathBuf> = glob::glob(entry)?.filter_map(|p| p.ok()).collect();
        if found.is_empty() {
            inputs.push(PathBuf::from(entry));
        } else {
            inputs.extend(found);
        }
    }
    Ok(inputs)
}

fn load_pattern<F>(lookup: &F) -> Result<Pattern, ScanError>
where
    F: Fn(&str) -> Option<String>,
{
    let pattern = if let Some(path) = lookup(PATTERN_FILE_VAR) {
        info!(path = %path, "Loading pattern file");
        let text = fs::read_to_string(&path).map_err(|e| ScanError::io(&path, e))?;
        Pattern::from_json(&text)?
    } else if let Some(text) = lookup(PATTERN_VAR) {
        Pattern::parse(&text)?
    } else {
        Pattern::default_line()
    };

    match lookup(DISQUALIFY_VAR) {
        Some(text) => {
            let disqualifier: Disqualifier = text
                .parse()
                .map_err(|e| ScanError::Config(format!("{DISQUALIFY_VAR}: {e}")))?;
            Ok(pattern.with_disqualifier(disqualifier))
        }
        None => Ok(pattern),
    }
}
