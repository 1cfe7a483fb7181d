//! Contains the `Board`, the arrangement of the pieces together with castling rights, en passant
//! and the move counters.
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::str::FromStr;
use super::*;
use bitboard::*;

use Color::*;
use Piece::*;

mod fen;
pub use fen::START_FEN;

pub(crate) const CASTLE_KING_SIDE: u8 = 0x1;
pub(crate) const CASTLE_QUEEN_SIDE: u8 = 0x2;
const CASTLE_BOTH_SIDES: u8 = CASTLE_KING_SIDE | CASTLE_QUEEN_SIDE;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A representation of the arrangement of pieces on the board at a given point in the game, as well
/// as whose turn it is, castling availability, en passant legality and the move counters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<(Color, Piece)>; Square::COUNT],
    turn: Color,
    castling_rights: [u8; Color::COUNT],
    ep_square: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Board {
    /// Returns the standard starting position
    pub fn new() -> Board {
        let mut board = Board::empty();
        let back_rank = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        for (&file, &piece) in File::ALL.iter().zip(back_rank.iter()) {
            for &color in &[White, Black] {
                board.put(Square::from_coord(file, color.back_rank()), Some((color, piece)));
                board.put(Square::from_coord(file, color.pawn_rank()), Some((color, Pawn)));
            }
        }
        board.castling_rights = [CASTLE_BOTH_SIDES, CASTLE_BOTH_SIDES];

        board
    }

    /// Returns a board with no pieces, white to move and no castling rights
    fn empty() -> Board {
        Board {
            squares: [None; Square::COUNT],
            turn: White,
            castling_rights: [0, 0],
            ep_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    fn put(&mut self, sq: Square, piece: Option<(Color, Piece)>) {
        self.squares[sq.index()] = piece;
    }

    /// Returns the piece on `sq`, if any
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.squares[sq.index()]
    }

    /// Returns the color whose turn it is
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Returns the en-passant target square: the square a pawn skipped over on the previous
    /// move, if it was a double push.
    pub fn en_passant(&self) -> Option<Square> {
        self.ep_square
    }

    /// Number of plies since the last capture or pawn move
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// The move number, starting at 1 and incremented after each of black's moves
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Returns `true` if `color` may still castle on the king's side
    pub fn can_castle_king_side(&self, color: Color) -> bool {
        self.castling_rights[color as usize] & CASTLE_KING_SIDE != 0
    }

    /// Returns `true` if `color` may still castle on the queen's side
    pub fn can_castle_queen_side(&self, color: Color) -> bool {
        self.castling_rights[color as usize] & CASTLE_QUEEN_SIDE != 0
    }

    /// Returns the castling rights in FEN form, such as `KQkq` or `-`
    pub fn castling_rights(&self) -> String {
        let mut s = String::new();
        for &(color, side, c) in &[
            (White, CASTLE_KING_SIDE, 'K'), (White, CASTLE_QUEEN_SIDE, 'Q'),
            (Black, CASTLE_KING_SIDE, 'k'), (Black, CASTLE_QUEEN_SIDE, 'q'),
        ] {
            if self.castling_rights[color as usize] & side != 0 {
                s.push(c);
            }
        }
        if s.is_empty() {
            s.push('-');
        }

        s
    }

    /// Returns all squares holding a piece of `color`
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        Square::all()
            .filter(|&sq| matches!(self.piece_at(sq), Some((c, _)) if c == color))
            .collect()
    }

    /// Returns all occupied squares
    pub fn occupied(&self) -> Bitboard {
        Square::all().filter(|&sq| self.piece_at(sq).is_some()).collect()
    }

    /// Returns all squares holding `piece` of `color`
    pub fn occupied_by_piece(&self, color: Color, piece: Piece) -> Bitboard {
        Square::all().filter(|&sq| self.piece_at(sq) == Some((color, piece))).collect()
    }

    /// Returns the square of `color`'s king
    pub fn king_location(&self, color: Color) -> Option<Square> {
        Square::all().find(|&sq| self.piece_at(sq) == Some((color, King)))
    }

    /// Returns `true` if any piece of `by` attacks `sq`. Pawns attack diagonally only, and the
    /// piece on `sq` itself (if any) does not block.
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        let has = |squares: Bitboard, pieces: &[Piece]| {
            squares.into_iter().any(|s| match self.piece_at(s) {
                Some((c, p)) => c == by && pieces.contains(&p),
                None => false,
            })
        };
        let occupied = self.occupied();

        has(knight_attacks(sq), &[Knight])
            || has(king_attacks(sq), &[King])
            || has(pawn_attacks(!by, sq), &[Pawn])
            || has(bishop_attacks(sq, occupied), &[Bishop, Queen])
            || has(rook_attacks(sq, occupied), &[Rook, Queen])
    }

    /// Returns `true` if the king of the side to move is attacked
    pub fn in_check(&self) -> bool {
        match self.king_location(self.turn) {
            Some(king) => self.is_square_attacked(king, !self.turn),
            None => false,
        }
    }

    /// Returns the board that results from making `mv`. `mv` should come from the move generator
    /// for this board; no legality checking is done here.
    pub fn apply_move(&self, mv: &Move) -> Board {
        let mut board = self.clone();
        let (color, piece) = match self.piece_at(mv.from()) {
            Some(p) => p,
            None => return board,
        };

        if mv.is_en_passant() {
            if let Some(passed) = mv.to().offset(0, -color.forward()) {
                board.put(passed, None);
            }
        }

        let placed = mv.promotion().unwrap_or(piece);
        board.put(mv.from(), None);
        board.put(mv.to(), Some((color, placed)));

        if mv.is_castle() {
            let rank = color.back_rank();
            let (rook_from, rook_to) = if mv.is_castle_king_side() {
                (File::H, File::F)
            } else {
                (File::A, File::D)
            };
            board.put(Square::from_coord(rook_from, rank), None);
            board.put(Square::from_coord(rook_to, rank), Some((color, Rook)));
        }

        if piece == King {
            board.castling_rights[color as usize] = 0;
        }
        for &sq in &[mv.from(), mv.to()] {
            board.clear_corner_rights(sq);
        }

        board.ep_square = None;
        if piece == Pawn && (mv.to().rank() as i8 - mv.from().rank() as i8).abs() == 2 {
            board.ep_square = mv.from().offset(0, color.forward());
        }

        let capture = self.piece_at(mv.to()).is_some() || mv.is_en_passant();
        if piece == Pawn || capture {
            board.halfmove_clock = 0;
        } else {
            board.halfmove_clock = board.halfmove_clock.saturating_add(1);
        }
        if color == Black {
            board.fullmove_number = board.fullmove_number.saturating_add(1);
        }
        board.turn = !color;

        board
    }

    /// A rook leaving or being captured on its original corner loses that castling right.
    fn clear_corner_rights(&mut self, sq: Square) {
        for &color in &[White, Black] {
            if sq.rank() == color.back_rank() {
                match sq.file() {
                    File::A => self.castling_rights[color as usize] &= !CASTLE_QUEEN_SIDE,
                    File::H => self.castling_rights[color as usize] &= !CASTLE_KING_SIDE,
                    _ => {},
                }
            }
        }
    }

    /// Returns `true` if neither side has enough material left to ever checkmate.
    ///
    /// That is the case with bare kings, with a single knight and nothing else, or with only
    /// bishops that all stand on squares of the same color.
    pub fn insufficient_material(&self) -> bool {
        let mut knights = 0;
        let mut bishops_on = [0; 2];

        for sq in Square::all() {
            match self.piece_at(sq) {
                Some((_, Pawn)) | Some((_, Rook)) | Some((_, Queen)) => return false,
                Some((_, Knight)) => knights += 1,
                Some((_, Bishop)) => bishops_on[sq.is_light() as usize] += 1,
                _ => {},
            }
        }

        match (knights, bishops_on) {
            (0, [0, _]) | (0, [_, 0]) => true,
            (1, [0, 0]) => true,
            _ => false,
        }
    }

    /// Returns `true` once 100 plies have passed without a capture or pawn move
    pub fn fifty_move_rule(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// The part of the position that decides whether two positions are repetitions: placement,
    /// side to move, castling rights and en-passant target.
    pub fn position_key(&self) -> String {
        let fen = self.to_fen();
        fen.split(' ').take(4).collect::<Vec<_>>().join(" ")
    }

    /// Draws the board as text, rank 8 at the top, with `.` for empty squares.
    pub fn render(&self) -> String {
        let mut s = String::new();

        for &rank in Rank::ALL.iter().rev() {
            s.push(rank.to_char());
            for &file in File::ALL.iter() {
                s.push(' ');
                s.push(match self.piece_at(Square::from_coord(file, rank)) {
                    Some((c, p)) => p.to_char(c),
                    None => '.',
                });
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");

        s
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl fmt::Display for Board {
    /// Writes out the board using FEN
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_fen().fmt(f)
    }
}

impl FromStr for Board {
    type Err = Error;

    /// Parse a board from a FEN string
    fn from_str(s: &str) -> Result<Self> {
        Board::from_fen(s)
    }
}
