#![allow(dead_code)]

use opening_scan::report::ScanLog;

/// Plays c2-c4, c4-c5, c5-c6, c6xd7 with harmless replies.
pub const MATCHING_GAME: &str = r#"[Event "Club match"]
[White "Tracked"]
[Black "Opponent"]
[Result "1-0"]

1. c4 Nf6 2. c5 e6 3. c6 a6 4. cxd7+ Bxd7 5. Nc3 Bc6 1-0
"#;

/// Same idea with a knight move in between and a comment and variation.
pub const MATCHING_WITH_DETOUR: &str = r#"[Event "Club match"]
[White "Tracked"]
[Black "Opponent"]
[Result "*"]

1. c4 Nf6 2. Nc3 {quiet} e6 (2... g6 3. g3) 3. c5 a6 4. c6 b5 5. cxd7+ Bxd7 *
"#;

/// Black takes the c5 pawn before it can advance to c6.
pub const PAWN_LOST_GAME: &str = r#"[Event "Club match"]
[White "Tracked"]
[Black "Opponent"]
[Result "0-1"]

1. c4 b6 2. c5 bxc5 3. d3 Nc6 0-1
"#;

/// White wins the black queen on move 4.
pub const QUEEN_CAPTURE_GAME: &str = r#"[Event "Club match"]
[White "Tracked"]
[Black "Opponent"]
[Result "1-0"]

1. c4 d5 2. cxd5 Qxd5 3. Nc3 Bf5 4. Nxd5 1-0
"#;

/// Stops after the second transition.
pub const SHORT_GAME: &str = r#"[Event "Club match"]
[White "Tracked"]
[Black "Opponent"]
[Result "1/2-1/2"]

1. c4 e5 2. c5 1/2-1/2
"#;

/// Contains an illegal king move.
pub const BROKEN_GAME: &str = r#"[Event "Club match"]
[White "Broken"]
[Black "Opponent"]
[Result "*"]

1. e4 e5 2. Ke3 *
"#;

/// Pawn race to a promotion on a8.
pub const PROMOTION_GAME: &str = r#"[Event "Club match"]
[White "Tracked"]
[Black "Opponent"]
[Result "1-0"]

1. e4 d5 2. exd5 c6 3. dxc6 Nf6 4. cxb7 Nbd7 5. bxa8=Q 1-0
"#;

/// Same line from a set-up position with only the kings and two pawns.
pub const FEN_START_GAME: &str = r#"[Event "Study"]
[White "Tracked"]
[Black "Opponent"]
[SetUp "1"]
[FEN "4k3/3p4/8/8/8/8/2P5/4K3 w - - 0 1"]
[Result "1-0"]

1. c4 Kf8 2. c5 Kg8 3. c6 Kh8 4. cxd7 1-0
"#;

/// No Result tag; only the movetext says how it ended.
pub const UNTAGGED_RESULT_GAME: &str = r#"[Event "Club match"]
[White "Tracked"]
[Black "Opponent"]

1. c4 Nf6 2. c5 e6 3. c6 a6 4. cxd7+ Bxd7 0-1
"#;

/// Join PGN records into one collection.
pub fn collection(games: &[&str]) -> String {
    games.join("\n")
}

pub fn log_text(log: ScanLog<Vec<u8>>) -> String {
    String::from_utf8(log.into_inner()).unwrap()
}
