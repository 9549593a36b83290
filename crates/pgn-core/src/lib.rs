//! PGN collection reading, re-serialization and board diagrams.
//!
//! Thin layer over `pgn-reader` and `shakmaty`: games are replayed once while
//! reading, so every record carries its full position history.

pub mod diagram;
pub mod error;
pub mod game_data;
pub mod pgn;

pub use error::PgnError;
pub use game_data::{GameRecord, PlayedMove};
pub use pgn::{read_collection, read_collection_until, write_pgn, Collection};
