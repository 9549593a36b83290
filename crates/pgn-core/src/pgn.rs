//! PGN collection reader and writer built on `pgn-reader`.
//!
//! Reading is best effort: a record whose movetext cannot be replayed is
//! reported as an issue and skipped, and an I/O error stops reading but keeps
//! every game recovered before it. Games set up with a `FEN` tag are replayed
//! from that position.

use pgn_reader::{Outcome, RawTag, Reader, SanPlus, Skip, Visitor};
use shakmaty::{fen::Fen, CastlingMode, Chess, Color, Position};
use std::io::Read;
use std::ops::ControlFlow;

use crate::error::PgnError;
use crate::game_data::GameRecord;

/// Wrap movetext lines at this width, as PGN export format recommends.
const LINE_WIDTH: usize = 80;

/// Games recovered from one input plus whatever went wrong along the way.
#[derive(Debug, Default)]
pub struct Collection {
    pub games: Vec<GameRecord>,
    pub issues: Vec<PgnError>,
}

/// Movetext state for the game being read.
struct GameState {
    game: GameRecord,
    failed: bool,
}

/// Visitor that replays each mainline and collects finished records.
struct CollectionBuilder {
    collection: Collection,
    /// 1-based index of the game being read.
    current: usize,
}

impl CollectionBuilder {
    fn new() -> Self {
        Self {
            collection: Collection::default(),
            current: 0,
        }
    }
}

impl Visitor for CollectionBuilder {
    type Tags = Vec<(String, String)>;
    type Movetext = GameState;
    type Output = ();

    fn begin_tags(&mut self) -> ControlFlow<(), Self::Tags> {
        self.current += 1;
        ControlFlow::Continue(Vec::new())
    }

    fn tag(&mut self, tags: &mut Self::Tags, name: &[u8], value: RawTag<'_>) -> ControlFlow<()> {
        tags.push((
            String::from_utf8_lossy(name).into_owned(),
            value.decode_utf8_lossy().into_owned(),
        ));
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: Self::Tags) -> ControlFlow<(), GameState> {
        let (start, failed) = match start_position(self.current, &tags) {
            Ok(pos) => (pos, false),
            Err(e) => {
                tracing::debug!(game = self.current, error = %e, "Bad setup, dropping record");
                self.collection.issues.push(e);
                (Chess::default(), true)
            }
        };

        let mut game = GameRecord::with_start(tags, start);
        if let Some(result) = game.tag("Result") {
            game.result = result.to_string();
        }
        ControlFlow::Continue(GameState { game, failed })
    }

    fn san(&mut self, state: &mut GameState, san_plus: SanPlus) -> ControlFlow<()> {
        if state.failed {
            return ControlFlow::Continue(());
        }

        let text = san_plus.to_string();
        if let Err(e) = state.game.push_san(self.current, &text, &san_plus.san) {
            tracing::debug!(game = self.current, san = %text, "Unplayable move, dropping record");
            self.collection.issues.push(e);
            state.failed = true;
        }
        ControlFlow::Continue(())
    }

    fn begin_variation(&mut self, _state: &mut GameState) -> ControlFlow<(), Skip> {
        ControlFlow::Continue(Skip(true)) // mainline only
    }

    /// The movetext termination marker wins over the `Result` tag.
    fn outcome(&mut self, state: &mut GameState, outcome: Outcome) -> ControlFlow<()> {
        state.game.result = outcome.to_string();
        ControlFlow::Continue(())
    }

    fn end_game(&mut self, state: GameState) {
        if !state.failed {
            self.collection.games.push(state.game);
        }
    }
}

/// Start position from the `FEN` tag, or the standard one without it.
fn start_position(game: usize, tags: &[(String, String)]) -> Result<Chess, PgnError> {
    let Some((_, fen)) = tags.iter().find(|(name, _)| name == "FEN") else {
        return Ok(Chess::default());
    };
    let invalid = || PgnError::InvalidFen {
        game,
        fen: fen.clone(),
    };
    let fen_parsed: Fen = fen.parse().map_err(|_| invalid())?;
    fen_parsed
        .into_position(CastlingMode::Standard)
        .map_err(|_| invalid())
}

/// Read every game of a PGN stream.
pub fn read_collection<R: Read>(input: R) -> Collection {
    read_collection_until(input, || false)
}

/// Like [`read_collection`], but `stop` is asked before each game and ends
/// reading early once it returns `true`.
pub fn read_collection_until<R, F>(input: R, mut stop: F) -> Collection
where
    R: Read,
    F: FnMut() -> bool,
{
    let mut reader = Reader::new(input);
    let mut builder = CollectionBuilder::new();

    loop {
        if stop() {
            tracing::info!(read = builder.current, "PGN read stopped");
            break;
        }
        match reader.read_game(&mut builder) {
            Ok(Some(())) => {}
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(game = builder.current, error = %e, "PGN read aborted");
                builder.collection.issues.push(PgnError::Io(e));
                break;
            }
        }
    }

    builder.collection
}

/// Serialize a game as PGN: tag pairs, a blank line, then numbered movetext
/// ending with the result token.
pub fn write_pgn(game: &GameRecord) -> String {
    let mut out = String::new();

    for (name, value) in &game.tags {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        out.push_str(&format!("[{} \"{}\"]\n", name, escaped));
    }
    if !game.tags.is_empty() {
        out.push('\n');
    }

    // numbering continues from the setup position
    let start = game.start_position();
    let mut number = start.fullmoves().get();
    let mut turn = start.turn();

    let mut tokens: Vec<String> = Vec::with_capacity(game.moves.len() * 3 / 2 + 2);
    for (ply, played) in game.moves.iter().enumerate() {
        match turn {
            Color::White => tokens.push(format!("{number}.")),
            Color::Black if ply == 0 => tokens.push(format!("{number}...")),
            Color::Black => {}
        }
        tokens.push(played.san.clone());
        if turn == Color::Black {
            number += 1;
        }
        turn = turn.other();
    }
    tokens.push(game.result.clone());

    let mut line_len = 0;
    for token in tokens {
        if line_len > 0 && line_len + 1 + token.len() > LINE_WIDTH {
            out.push('\n');
            line_len = 0;
        } else if line_len > 0 {
            out.push(' ');
            line_len += 1;
        }
        line_len += token.len();
        out.push_str(&token);
    }

    out
}
