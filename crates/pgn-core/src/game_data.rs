use shakmaty::{san::San, Board, Chess, File, Move, Position, Role, Square};

use crate::error::PgnError;

/// A move as it was played, with the SAN text it was read from.
#[derive(Debug, Clone)]
pub struct PlayedMove {
    pub san: String,
    pub mv: Move,
}

impl PlayedMove {
    pub fn new(san: impl Into<String>, mv: Move) -> Self {
        Self { san: san.into(), mv }
    }

    /// Origin square. Castling reports the king's square.
    pub fn from(&self) -> Option<Square> {
        match self.mv {
            Move::Castle { king, .. } => Some(king),
            _ => self.mv.from(),
        }
    }

    /// Destination square. Castling reports where the king lands (g- or c-file),
    /// not shakmaty's king-takes-rook square.
    pub fn to(&self) -> Square {
        match self.mv {
            Move::Castle { king, rook } => {
                let file = if rook.file() > king.file() { File::G } else { File::C };
                Square::from_coords(file, king.rank())
            }
            _ => self.mv.to(),
        }
    }

    pub fn promotion(&self) -> Option<Role> {
        self.mv.promotion()
    }

    pub fn is_capture(&self) -> bool {
        self.mv.is_capture()
    }
}

/// One parsed game: tags in file order, mainline moves and the position history.
///
/// `positions[i]` is the position before `moves[i]`; the last entry is the
/// position after the final move, so `positions.len() == moves.len() + 1`.
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub tags: Vec<(String, String)>,
    pub moves: Vec<PlayedMove>,
    positions: Vec<Chess>,
    pub result: String,
}

impl GameRecord {
    pub fn new(tags: Vec<(String, String)>) -> Self {
        Self::with_start(tags, Chess::default())
    }

    /// A game set up from a custom position (PGN `FEN` tag).
    pub fn with_start(tags: Vec<(String, String)>, start: Chess) -> Self {
        Self {
            tags,
            moves: Vec::new(),
            positions: vec![start],
            result: "*".to_string(),
        }
    }

    /// Build a game from the standard start position by replaying SAN moves.
    pub fn from_san_moves<S: AsRef<str>>(sans: &[S]) -> Result<Self, PgnError> {
        let mut game = Self::new(Vec::new());
        for (ply, san_str) in sans.iter().enumerate() {
            let san_str = san_str.as_ref();
            let san: San = san_str.parse().map_err(|_| PgnError::IllegalMove {
                game: 1,
                ply,
                san: san_str.to_string(),
            })?;
            game.push_san(1, san_str, &san)?;
        }
        Ok(game)
    }

    /// Resolve `san` against the current position and play it.
    /// `game` is the 1-based index used in the error.
    pub(crate) fn push_san(&mut self, game: usize, text: &str, san: &San) -> Result<(), PgnError> {
        let illegal = || PgnError::IllegalMove {
            game,
            ply: self.moves.len(),
            san: text.to_string(),
        };
        let pos = self.final_position().clone();
        let mv = san.to_move(&pos).map_err(|_| illegal())?;
        let next = pos.play(mv.clone()).map_err(|_| illegal())?;
        self.moves.push(PlayedMove::new(text, mv));
        self.positions.push(next);
        Ok(())
    }

    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Position before the move at `ply`.
    pub fn position_before(&self, ply: usize) -> Option<&Chess> {
        if ply < self.moves.len() {
            self.positions.get(ply)
        } else {
            None
        }
    }

    pub fn start_position(&self) -> &Chess {
        &self.positions[0]
    }

    pub fn final_position(&self) -> &Chess {
        // positions always holds at least the start position
        &self.positions[self.positions.len() - 1]
    }

    pub fn final_board(&self) -> &Board {
        self.final_position().board()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::{Color, Piece};

    #[test]
    fn test_positions_track_moves() {
        let game = GameRecord::from_san_moves(&["e4", "e5", "Nf3"]).unwrap();
        assert_eq!(game.len(), 3);

        let before_reply = game.position_before(1).unwrap();
        assert_eq!(
            before_reply.board().piece_at(Square::E4),
            Some(Piece { color: Color::White, role: Role::Pawn })
        );
        assert_eq!(before_reply.board().piece_at(Square::E7).map(|p| p.role), Some(Role::Pawn));
        assert!(game.position_before(3).is_none());
        assert_eq!(game.final_board().piece_at(Square::F3).map(|p| p.role), Some(Role::Knight));
    }

    #[test]
    fn test_castling_reports_king_destination() {
        let game =
            GameRecord::from_san_moves(&["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5", "O-O"]).unwrap();
        let castle = &game.moves[6];
        assert_eq!(castle.from(), Some(Square::E1));
        assert_eq!(castle.to(), Square::G1);
        assert!(!castle.is_capture());
    }

    #[test]
    fn test_capture_and_promotion_accessors() {
        let game = GameRecord::from_san_moves(&["c4", "d5", "cxd5"]).unwrap();
        let capture = &game.moves[2];
        assert!(capture.is_capture());
        assert_eq!(capture.from(), Some(Square::C4));
        assert_eq!(capture.to(), Square::D5);
        assert_eq!(capture.promotion(), None);
    }

    #[test]
    fn test_custom_start_position() {
        let start: Chess = "4k3/8/8/8/8/8/2P5/4K3 w - - 0 1"
            .parse::<shakmaty::fen::Fen>()
            .unwrap()
            .into_position(shakmaty::CastlingMode::Standard)
            .unwrap();
        let mut game = GameRecord::with_start(Vec::new(), start);
        game.push_san(1, "Kd2", &"Kd2".parse().unwrap()).unwrap();

        assert_eq!(game.start_position().board().piece_at(Square::E1).map(|p| p.role), Some(Role::King));
        assert_eq!(game.final_board().piece_at(Square::D2).map(|p| p.role), Some(Role::King));
        assert_eq!(game.final_board().piece_at(Square::E1), None);
    }

    #[test]
    fn test_illegal_move_is_rejected() {
        let err = GameRecord::from_san_moves(&["e4", "e4"]).unwrap_err();
        match err {
            PgnError::IllegalMove { ply, san, .. } => {
                assert_eq!(ply, 1);
                assert_eq!(san, "e4");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
