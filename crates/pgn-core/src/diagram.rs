//! Text diagrams of board positions.

use shakmaty::{Board, File, Rank, Square};

const BORDER: &str = "  +-----------------+";

/// Render `board` from white's side: rank 8 on top, empty squares as `.`.
pub fn render_board(board: &Board) -> String {
    let mut out = String::with_capacity(256);
    out.push_str(BORDER);
    out.push('\n');

    for rank in (0..8u32).rev() {
        out.push(char::from(b'1' + rank as u8));
        out.push_str(" |");
        for file in 0..8u32 {
            let sq = Square::from_coords(File::new(file), Rank::new(rank));
            out.push(' ');
            out.push(board.piece_at(sq).map_or('.', |piece| piece.char()));
        }
        out.push_str(" |\n");
    }

    out.push_str(BORDER);
    out.push_str("\n   ");
    for file in b'a'..=b'h' {
        out.push(' ');
        out.push(char::from(file));
    }
    out.push('\n');
    out
}
