use thiserror::Error;

#[derive(Error, Debug)]
pub enum PgnError {
    #[error("PGN read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Illegal move '{san}' in game {game} at ply {ply}")]
    IllegalMove { game: usize, ply: usize, san: String },

    #[error("Invalid FEN '{fen}' in game {game}")]
    InvalidFen { game: usize, fen: String },
}
