//! Reading and writing moves in short algebraic notation (SAN) and coordinate notation
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use lazy_static::lazy_static;
use regex::Regex;
use super::*;

lazy_static! {
    static ref SAN: Regex = Regex::new(
        r"^([RNBQK])?([a-h]|[1-8]|[a-h][1-8])?(x)?([a-h][1-8])(?:=?([RNBQrnbq]))?(ep)?[+#]?$"
    ).expect("INFALLIBLE");
    static ref CASTLE: Regex = Regex::new(r"^[0O]-[0O](-[0O])?[+#]?$").expect("INFALLIBLE");
}

/// What a partial origin in a SAN token says about the moving piece
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Origin {
    Any,
    File(File),
    Rank(Rank),
    Square(Square),
}

impl Origin {
    fn parse(s: Option<&str>) -> Result<Origin> {
        let s = match s {
            Some(s) => s,
            None => return Ok(Origin::Any),
        };
        let c = s.chars().next().ok_or_else(|| Error::BadNotation(s.to_owned()))?;

        if s.len() == 2 {
            Ok(Origin::Square(s.parse()?))
        } else if let Some(file) = File::from_char(c) {
            Ok(Origin::File(file))
        } else if let Some(rank) = Rank::from_char(c) {
            Ok(Origin::Rank(rank))
        } else {
            Err(Error::BadNotation(s.to_owned()))
        }
    }

    fn matches(self, sq: Square) -> bool {
        match self {
            Origin::Any => true,
            Origin::File(f) => sq.file() == f,
            Origin::Rank(r) => sq.rank() == r,
            Origin::Square(s) => sq == s,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Finds the legal move on `board` that `token` describes.
///
/// `token` may be SAN (`Nf3`, `exd6ep`, `e8=Q+`, `O-O`), or coordinate notation (`e2e4`,
/// `e7e8q`). Coordinate notation always means the literal squares given, so `e1g1` is never
/// read as castling; only `O-O`, `O-O-O` and their zero-digit forms castle. Capture, check and
/// en-passant markers are accepted but not required to match.
///
/// # Errors
///
/// - `Error::BadNotation` if the token does not parse, if more than one piece fits it, or if
///   pieces of the right kind can reach the destination but none matches the given file or
///   rank.
/// - `Error::IllegalMove` if no legal move of that kind reaches the destination.
pub fn resolve(board: &Board, token: &str) -> Result<Move> {
    let illegal = || Error::IllegalMove(IllegalMove::new(token, Status::InProgress, board));
    let legal = movegen::legal_moves(board);

    if let Some(caps) = CASTLE.captures(token) {
        let queen_side = caps.get(1).is_some();
        return legal.into_iter()
            .find(|mv| if queen_side { mv.is_castle_queen_side() } else { mv.is_castle_king_side() })
            .ok_or_else(illegal);
    }

    let caps = SAN.captures(token).ok_or_else(|| Error::BadNotation(token.to_owned()))?;
    let piece = match caps.get(1) {
        Some(m) => m.as_str().parse()?,
        None => Piece::Pawn,
    };
    let origin = Origin::parse(caps.get(2).map(|m| m.as_str()))?;
    let to: Square = caps[4].parse()?;
    let promotion = match caps.get(5) {
        Some(m) => Some(m.as_str().parse::<Piece>()?),
        None => None,
    };

    if let Origin::Square(from) = origin {
        let mv = legal.into_iter()
            .find(|mv| !mv.is_castle() && mv.same_squares(from, to, promotion))
            .ok_or_else(illegal)?;
        if caps.get(1).is_some() && board.piece_at(from).map(|(_, p)| p) != Some(piece) {
            return Err(illegal());
        }
        return Ok(mv);
    }

    let candidates: Vec<Move> = legal.into_iter()
        .filter(|mv| !mv.is_castle() && mv.to() == to && mv.promotion() == promotion)
        .filter(|mv| board.piece_at(mv.from()).map(|(_, p)| p) == Some(piece))
        .collect();
    if candidates.is_empty() {
        return Err(illegal());
    }

    let mut matching = candidates.into_iter().filter(|mv| origin.matches(mv.from()));
    match (matching.next(), matching.next()) {
        (Some(mv), None) => Ok(mv),
        _ => Err(Error::BadNotation(token.to_owned())),
    }
}

/// Writes `mv`, a legal move on `board`, in SAN.
///
/// The origin is added only when another piece of the same kind could also reach the
/// destination: its file if that is enough, otherwise its rank, otherwise both. The check or
/// mate suffix comes from the position after the move.
pub fn to_san(board: &Board, mv: &Move) -> String {
    let mut san = String::new();

    if mv.is_castle() {
        san.push_str(if mv.is_castle_king_side() { "O-O" } else { "O-O-O" });
    } else {
        let piece = board.piece_at(mv.from()).map(|(_, p)| p).unwrap_or(Piece::Pawn);

        if piece == Piece::Pawn {
            if mv.is_capture() {
                san.push(mv.from().file().to_char());
            }
        } else {
            san.push(piece.to_char(Color::White));
            san += &disambiguation(board, mv, piece);
        }
        if mv.is_capture() {
            san.push('x');
        }
        san += &mv.to().to_string();
        if mv.is_en_passant() {
            san.push_str("ep");
        }
        if let Some(promotion) = mv.promotion() {
            san.push('=');
            san.push(promotion.to_char(Color::White));
        }
    }

    let after = board.apply_move(mv);
    if after.in_check() {
        san.push(if movegen::legal_moves(&after).is_empty() { '#' } else { '+' });
    }

    san
}

fn disambiguation(board: &Board, mv: &Move, piece: Piece) -> String {
    let others: Vec<Square> = movegen::legal_moves(board)
        .into_iter()
        .filter(|m| m.to() == mv.to() && m.from() != mv.from() && !m.is_castle())
        .filter(|m| board.piece_at(m.from()).map(|(_, p)| p) == Some(piece))
        .map(|m| m.from())
        .collect();

    let from = mv.from();
    if others.is_empty() {
        String::new()
    } else if others.iter().all(|sq| sq.file() != from.file()) {
        from.file().to_string()
    } else if others.iter().all(|sq| sq.rank() != from.rank()) {
        from.rank().to_string()
    } else {
        from.to_string()
    }
}

/// Replaces the piece letters in `s` with Unicode chess figurines, white for uppercase and
/// black for lowercase, so `Qf7#` becomes `♕f7#`.
///
/// Every piece letter is replaced, which suits FEN placements; in SAN a lowercase `b` is a
/// file and will be replaced too.
pub fn to_figurine(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'P' => '♙', 'R' => '♖', 'N' => '♘', 'B' => '♗', 'Q' => '♕', 'K' => '♔',
            'p' => '♟', 'r' => '♜', 'n' => '♞', 'b' => '♝', 'q' => '♛', 'k' => '♚',
            _ => c,
        })
        .collect()
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).unwrap()
    }

    fn is_bad_notation(r: Result<Move>) -> bool {
        matches!(r, Err(Error::BadNotation(_)))
    }

    fn is_illegal(r: Result<Move>) -> bool {
        matches!(r, Err(Error::IllegalMove(_)))
    }

    /// Tests for resolve()
    mod resolve {
        use super::*;

        // 1. tokens that do not parse are bad notation
        #[test]
        fn malformed_tokens() {
            let b = Board::new();
            for token in &["gg", "", "e9", "Xe4", "e2-e4", "O-O-O-O", "Nf3!!", "i1"] {
                assert!(is_bad_notation(resolve(&b, token)), "{}", token);
            }
        }

        // 2. SAN for pawns and pieces
        #[test]
        fn simple_san() {
            let b = Board::new();
            assert_eq!(resolve(&b, "e4").unwrap(), Move::quiet(sq("e2"), sq("e4")));
            assert_eq!(resolve(&b, "Nf3").unwrap(), Move::quiet(sq("g1"), sq("f3")));
            assert!(is_illegal(resolve(&b, "e5")));
            assert!(is_illegal(resolve(&b, "Qf6")));
            assert!(is_illegal(resolve(&b, "Ke2")));
        }

        // 3. coordinate notation is taken literally
        #[test]
        fn coordinates() {
            let b = Board::new();
            assert_eq!(resolve(&b, "g1f3").unwrap(), Move::quiet(sq("g1"), sq("f3")));
            assert!(is_illegal(resolve(&b, "e7e5")));
            assert!(is_illegal(resolve(&b, "e2e5")));

            // the queen slides along the eighth rank
            let b = board("4Q3/8/8/8/8/8/4K3/7k w - - 0 1");
            let mv = resolve(&b, "e8a8").unwrap();
            assert_eq!(mv, Move::quiet(sq("e8"), sq("a8")));
            assert_eq!(b.apply_move(&mv).piece_at(sq("a8")), Some((Color::White, Piece::Queen)));
        }

        // 4. a king move in coordinates never becomes castling
        #[test]
        fn coordinates_never_castle() {
            let b = board("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
            assert!(is_illegal(resolve(&b, "e1g1")));
            assert!(is_illegal(resolve(&b, "e1c1")));
            assert!(resolve(&b, "O-O").unwrap().is_castle_king_side());
            assert!(resolve(&b, "0-0-0").unwrap().is_castle_queen_side());
        }

        // 5. castling follows the side to move
        #[test]
        fn castling_is_color_aware() {
            let b = board("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1");
            assert_eq!(resolve(&b, "O-O").unwrap(), Move::castle(sq("e8"), sq("g8"), true));
            assert_eq!(resolve(&b, "O-O-O+").unwrap(), Move::castle(sq("e8"), sq("c8"), false));
            let b = board("r3k2r/8/8/8/8/8/8/R3K2R b KQ - 0 1");
            assert!(is_illegal(resolve(&b, "O-O")));
        }

        // 6. two pieces reaching the same square need an origin
        #[test]
        fn ambiguity() {
            let b = board("4k3/8/8/8/8/8/4K3/R6R w - - 0 1");
            assert!(is_bad_notation(resolve(&b, "Rf1")));
            assert_eq!(resolve(&b, "Rhf1").unwrap(), Move::quiet(sq("h1"), sq("f1")));
            assert_eq!(resolve(&b, "Raf1").unwrap(), Move::quiet(sq("a1"), sq("f1")));
            assert!(is_bad_notation(resolve(&b, "Rbf1")));
        }

        // 7. rank disambiguation
        #[test]
        fn rank_disambiguation() {
            let b = board("4k3/8/8/8/R7/8/8/R3K3 w - - 0 1");
            assert!(is_bad_notation(resolve(&b, "Ra3")));
            assert_eq!(resolve(&b, "R4a3").unwrap(), Move::quiet(sq("a4"), sq("a3")));
            assert_eq!(resolve(&b, "R1a3").unwrap(), Move::quiet(sq("a1"), sq("a3")));
        }

        // 8. promotion must be named
        #[test]
        fn promotion() {
            let b = board("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
            assert_eq!(resolve(&b, "a8=Q").unwrap(), Move::quiet(sq("a7"), sq("a8")).promote(Piece::Queen));
            assert_eq!(resolve(&b, "axb8N").unwrap(),
                Move::capture(sq("a7"), sq("b8")).promote(Piece::Knight));
            assert_eq!(resolve(&b, "a7a8r").unwrap(), Move::quiet(sq("a7"), sq("a8")).promote(Piece::Rook));
            assert!(is_illegal(resolve(&b, "a8")));
        }

        // 9. en passant with or without the marker
        #[test]
        fn en_passant() {
            let b = board("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
            let expected = Move::en_passant(sq("e5"), sq("d6"));
            assert_eq!(resolve(&b, "exd6ep").unwrap(), expected);
            assert_eq!(resolve(&b, "exd6").unwrap(), expected);
            assert_eq!(resolve(&b, "e5d6").unwrap(), expected);
        }

        // 10. moving into check is illegal
        #[test]
        fn pinned_piece() {
            let b = board("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1");
            assert!(is_illegal(resolve(&b, "Nd4")));
            assert!(is_illegal(resolve(&b, "e2d4")));
        }
    }

    /// Tests for to_san()
    mod to_san {
        use super::*;

        fn san(fen: &str, token: &str) -> String {
            let b = board(fen);
            to_san(&b, &resolve(&b, token).unwrap())
        }

        // 1. check and mate suffixes
        #[test]
        fn check_and_mate() {
            let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5Q2/PPPP1PPP/RNB1K1NR w KQkq - 2 3";
            assert_eq!(san(fen, "Qxf7"), "Qxf7#");
            assert_eq!(san("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1", "Ra8"), "Ra8+");
            assert_eq!(san("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1", "O-O-O"), "O-O-O");
        }

        // 2. pawn captures name the file they came from
        #[test]
        fn pawn_captures() {
            let fen = "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2";
            assert_eq!(san(fen, "e4d5"), "exd5");
        }

        // 3. the canonical form differs from sloppy input
        #[test]
        fn canonical_form() {
            assert_eq!(san(&Board::new().to_fen(), "g1f3"), "Nf3");
            assert_eq!(san("4k3/8/8/8/8/8/4K3/R6R w - - 0 1", "h1f1"), "Rhf1");
            assert_eq!(san("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1", "exd6"), "exd6ep");
        }
    }

    #[test]
    fn figurines() {
        assert_eq!(to_figurine("Qf7#"), "♕f7#");
        assert_eq!(to_figurine("O-O"), "O-O");
        assert_eq!(to_figurine("4k3/8/8/8/8/8/8/4K3"), "4♚3/8/8/8/8/8/8/4♔3");
    }
}
