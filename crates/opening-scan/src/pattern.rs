//! Search patterns: an ordered checklist of transitions plus the capture that
//! disqualifies a game.
//!
//! Transitions are written in a compact square notation:
//!
//! * `c2-c4`   from c2 to c4, capture status not checked
//! * `c6xd7`   from c6 to d7, must be a capture
//! * `e7-e8=Q` promotion to a queen (`e7e8=Q` is accepted too)

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use pgn_core::PlayedMove;
use regex::Regex;
use serde::Deserialize;
use shakmaty::{Color, Piece, Role, Square};

use crate::error::ScanError;

static TRANSITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-h][1-8])([-x]?)([a-h][1-8])(?:=?([QRBNqrbn]))?$")
        .expect("transition regex is valid")
});

/// One expected move of the tracked side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Role>,
    /// `false` leaves capture status unchecked; it does not forbid a capture.
    pub requires_capture: bool,
}

impl Transition {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
            requires_capture: false,
        }
    }

    pub fn capturing(mut self) -> Self {
        self.requires_capture = true;
        self
    }

    pub fn promoting(mut self, role: Role) -> Self {
        self.promotion = Some(role);
        self
    }

    /// Squares and promotion must be equal; a capture is only checked when required.
    pub fn accepts(&self, played: &PlayedMove) -> bool {
        played.from() == Some(self.from)
            && played.to() == self.to
            && played.promotion() == self.promotion
            && (!self.requires_capture || played.is_capture())
    }
}

impl FromStr for Transition {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let caps = TRANSITION_RE
            .captures(text)
            .ok_or_else(|| ScanError::Pattern(format!("cannot parse transition '{text}'")))?;

        let square = |i: usize| {
            caps[i]
                .parse::<Square>()
                .map_err(|_| ScanError::Pattern(format!("bad square in '{text}'")))
        };

        let mut transition = Transition::new(square(1)?, square(3)?);
        if &caps[2] == "x" {
            transition = transition.capturing();
        }
        if let Some(promo) = caps.get(4) {
            transition = transition.promoting(parse_role(promo.as_str())?);
        }
        Ok(transition)
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.requires_capture { 'x' } else { '-' };
        write!(f, "{}{}{}", self.from, sep, self.to)?;
        if let Some(role) = self.promotion {
            write!(f, "={}", role.char().to_ascii_uppercase())?;
        }
        Ok(())
    }
}

/// The opponent piece whose capture by the tracked side rejects a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disqualifier {
    pub color: Color,
    pub role: Role,
}

impl Disqualifier {
    pub fn piece(&self) -> Piece {
        Piece {
            color: self.color,
            role: self.role,
        }
    }
}

impl Default for Disqualifier {
    fn default() -> Self {
        Self {
            color: Color::Black,
            role: Role::Queen,
        }
    }
}

impl FromStr for Disqualifier {
    type Err = ScanError;

    /// `black:queen`, `white:rook`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (side, piece) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| ScanError::Pattern(format!("expected <side>:<piece>, got '{s}'")))?;
        Ok(Self {
            color: parse_color(side)?,
            role: parse_role(piece)?,
        })
    }
}

impl fmt::Display for Disqualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.color {
            Color::White => "white",
            Color::Black => "black",
        };
        write!(f, "{} {}", side, role_name(self.role))
    }
}

fn parse_color(s: &str) -> Result<Color, ScanError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "white" | "w" => Ok(Color::White),
        "black" | "b" => Ok(Color::Black),
        other => Err(ScanError::Pattern(format!("unknown side '{other}'"))),
    }
}

fn parse_role(s: &str) -> Result<Role, ScanError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "pawn" | "p" => Ok(Role::Pawn),
        "knight" | "n" => Ok(Role::Knight),
        "bishop" | "b" => Ok(Role::Bishop),
        "rook" | "r" => Ok(Role::Rook),
        "queen" | "q" => Ok(Role::Queen),
        "king" | "k" => Ok(Role::King),
        other => Err(ScanError::Pattern(format!("unknown piece '{other}'"))),
    }
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::Pawn => "pawn",
        Role::Knight => "knight",
        Role::Bishop => "bishop",
        Role::Rook => "rook",
        Role::Queen => "queen",
        Role::King => "king",
    }
}

/// JSON pattern file layout.
#[derive(Debug, Deserialize)]
struct PatternFile {
    transitions: Vec<String>,
    #[serde(default)]
    disqualify: Option<DisqualifyEntry>,
}

#[derive(Debug, Deserialize)]
struct DisqualifyEntry {
    side: String,
    piece: String,
}

/// Checklist of transitions matched in order, with the disqualifying capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    transitions: Vec<Transition>,
    disqualifier: Disqualifier,
}

impl Pattern {
    pub fn new(transitions: Vec<Transition>, disqualifier: Disqualifier) -> Result<Self, ScanError> {
        if transitions.is_empty() {
            return Err(ScanError::Pattern("checklist has no transitions".into()));
        }
        Ok(Self {
            transitions,
            disqualifier,
        })
    }

    /// c2-c4, c4-c5, c5-c6, c6xd7; the black queen disqualifies.
    pub fn default_line() -> Self {
        Self {
            transitions: vec![
                Transition::new(Square::C2, Square::C4),
                Transition::new(Square::C4, Square::C5),
                Transition::new(Square::C5, Square::C6),
                Transition::new(Square::C6, Square::D7).capturing(),
            ],
            disqualifier: Disqualifier::default(),
        }
    }

    /// Comma- or whitespace-separated transitions, default disqualifier.
    pub fn parse(s: &str) -> Result<Self, ScanError> {
        let transitions = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Transition>, _>>()?;
        Self::new(transitions, Disqualifier::default())
    }

    pub fn from_json(text: &str) -> Result<Self, ScanError> {
        let file: PatternFile = serde_json::from_str(text)?;
        let transitions = file
            .transitions
            .iter()
            .map(|t| t.parse())
            .collect::<Result<Vec<Transition>, _>>()?;
        let disqualifier = match file.disqualify {
            Some(entry) => Disqualifier {
                color: parse_color(&entry.side)?,
                role: parse_role(&entry.piece)?,
            },
            None => Disqualifier::default(),
        };
        Self::new(transitions, disqualifier)
    }

    pub fn with_disqualifier(mut self, disqualifier: Disqualifier) -> Self {
        self.disqualifier = disqualifier;
        self
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn disqualifier(&self) -> Disqualifier {
        self.disqualifier
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Self::default_line()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, t) in self.transitions.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{t}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transition() {
        let t: Transition = "c6xd7".parse().unwrap();
        assert_eq!(t.from, Square::C6);
        assert_eq!(t.to, Square::D7);
        assert!(t.requires_capture);
        assert_eq!(t.promotion, None);

        let promo: Transition = "e7e8=N".parse().unwrap();
        assert_eq!(promo.promotion, Some(Role::Knight));
        assert!(!promo.requires_capture);
        assert_eq!(promo.to_string(), "e7-e8=N");
    }

    #[test]
    fn test_parse_transition_rejects_garbage() {
        assert!("c9-c4".parse::<Transition>().is_err());
        assert!("Nf3".parse::<Transition>().is_err());
        assert!("e7-e8=K".parse::<Transition>().is_err());
    }

    #[test]
    fn test_default_line_round_trips_through_parse() {
        let parsed = Pattern::parse("c2-c4, c4-c5, c5-c6, c6xd7").unwrap();
        assert_eq!(parsed, Pattern::default_line());
        assert_eq!(parsed.to_string(), "c2-c4,c4-c5,c5-c6,c6xd7");
    }

    #[test]
    fn test_empty_pattern_rejected() {
        assert!(matches!(Pattern::parse(" , "), Err(ScanError::Pattern(_))));
        assert!(Pattern::new(Vec::new(), Disqualifier::default()).is_err());
    }

    #[test]
    fn test_pattern_from_json() {
        let json = r#"{
            "transitions": ["e2-e4", "d2-d4"],
            "disqualify": { "side": "black", "piece": "rook" }
        }"#;
        let pattern = Pattern::from_json(json).unwrap();
        assert_eq!(pattern.len(), 2);
        assert_eq!(pattern.transitions()[1].from, Square::D2);
        assert_eq!(
            pattern.disqualifier(),
            Disqualifier { color: Color::Black, role: Role::Rook }
        );

        let bare = Pattern::from_json(r#"{"transitions": ["g1-f3"]}"#).unwrap();
        assert_eq!(bare.disqualifier(), Disqualifier::default());

        assert!(matches!(Pattern::from_json("{"), Err(ScanError::Json(_))));
    }

    #[test]
    fn test_parse_disqualifier() {
        let d: Disqualifier = "white:Knight".parse().unwrap();
        assert_eq!(d.piece(), Piece { color: Color::White, role: Role::Knight });
        assert_eq!(d.to_string(), "white knight");
        assert!("queen".parse::<Disqualifier>().is_err());
    }
}
