//! Per-game checklist matcher.
//!
//! The tracked side owns the even plies (white from the standard start). Its
//! moves are compared against the checklist in order; the opponent's moves are
//! only checked for captures on the square the next expected move starts from.

use pgn_core::GameRecord;
use shakmaty::Position;

use crate::pattern::Pattern;

/// Why a game did or did not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The last transition was satisfied at `ply`.
    Matched { ply: usize },
    /// The tracked side captured the disqualifying piece at `ply`.
    DisqualifyingCapture { ply: usize, step: usize },
    /// The opponent captured on the origin of transition `step` at `ply`.
    PieceLost { ply: usize, step: usize },
    /// Moves ran out after `satisfied` transitions.
    Incomplete { satisfied: usize },
}

/// Diagnostic trail of one evaluation. Never affects the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEvent {
    StepSatisfied { ply: usize, step: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchReport {
    pub verdict: Verdict,
    pub events: Vec<MatchEvent>,
}

impl MatchReport {
    pub fn is_match(&self) -> bool {
        matches!(self.verdict, Verdict::Matched { .. })
    }
}

/// Matches games against one pattern. Holds no per-game state, so one matcher
/// can be shared across threads.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'p> {
    pattern: &'p Pattern,
}

impl<'p> Matcher<'p> {
    pub fn new(pattern: &'p Pattern) -> Self {
        Self { pattern }
    }

    pub fn pattern(&self) -> &'p Pattern {
        self.pattern
    }

    pub fn matches(&self, game: &GameRecord) -> bool {
        self.evaluate(game).is_match()
    }

    pub fn evaluate(&self, game: &GameRecord) -> MatchReport {
        let checklist = self.pattern.transitions();
        let forbidden = self.pattern.disqualifier().piece();
        let mut events = Vec::new();
        let mut current = 0;

        for (ply, played) in game.moves.iter().enumerate() {
            let expected = &checklist[current];

            if ply % 2 == 0 {
                if expected.accepts(played) {
                    events.push(MatchEvent::StepSatisfied { ply, step: current });
                    current += 1;
                    if current == checklist.len() {
                        return MatchReport {
                            verdict: Verdict::Matched { ply },
                            events,
                        };
                    }
                } else if played.is_capture() {
                    let victim = game
                        .position_before(ply)
                        .and_then(|pos| pos.board().piece_at(played.to()));
                    if victim == Some(forbidden) {
                        return MatchReport {
                            verdict: Verdict::DisqualifyingCapture { ply, step: current },
                            events,
                        };
                    }
                }
            } else if played.is_capture() && played.to() == expected.from {
                return MatchReport {
                    verdict: Verdict::PieceLost { ply, step: current },
                    events,
                };
            }
        }

        MatchReport {
            verdict: Verdict::Incomplete { satisfied: current },
            events,
        }
    }
}
