//! Contains the `Move` value type
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use super::*;

const CAPTURE: u8 = 0x1;
const EN_PASSANT: u8 = 0x2;
const CASTLE_KING_SIDE: u8 = 0x4;
const CASTLE_QUEEN_SIDE: u8 = 0x8;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A move from one square to another.
///
/// A `Move` does not refer to any position. It is produced by the move generator for a given
/// `Board`, and only has meaning when applied to that board.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<Piece>,
    flags: u8,
}

impl Move {
    /// A move that captures nothing
    pub fn quiet(from: Square, to: Square) -> Move {
        Move { from, to, promotion: None, flags: 0 }
    }

    /// A move that captures the piece on `to`
    pub fn capture(from: Square, to: Square) -> Move {
        Move { from, to, promotion: None, flags: CAPTURE }
    }

    /// A pawn capturing en passant; the captured pawn is not on `to`
    pub fn en_passant(from: Square, to: Square) -> Move {
        Move { from, to, promotion: None, flags: CAPTURE | EN_PASSANT }
    }

    /// The king's half of a castling move. `from` and `to` are the king's squares.
    pub fn castle(from: Square, to: Square, king_side: bool) -> Move {
        let flags = if king_side { CASTLE_KING_SIDE } else { CASTLE_QUEEN_SIDE };
        Move { from, to, promotion: None, flags }
    }

    /// Returns a copy of the move which promotes to `piece`
    pub fn promote(self, piece: Piece) -> Move {
        Move { promotion: Some(piece), ..self }
    }

    /// The square the piece moves from
    pub fn from(&self) -> Square {
        self.from
    }

    /// The square the piece moves to
    pub fn to(&self) -> Square {
        self.to
    }

    /// The piece a pawn promotes to, if any
    pub fn promotion(&self) -> Option<Piece> {
        self.promotion
    }

    /// Returns `true` if the move captures a piece, including en passant
    pub fn is_capture(&self) -> bool {
        self.flags & CAPTURE != 0
    }

    /// Returns `true` for en-passant captures
    pub fn is_en_passant(&self) -> bool {
        self.flags & EN_PASSANT != 0
    }

    /// Returns `true` for castling on the king's side
    pub fn is_castle_king_side(&self) -> bool {
        self.flags & CASTLE_KING_SIDE != 0
    }

    /// Returns `true` for castling on the queen's side
    pub fn is_castle_queen_side(&self) -> bool {
        self.flags & CASTLE_QUEEN_SIDE != 0
    }

    /// Returns `true` for either castling move
    pub fn is_castle(&self) -> bool {
        self.flags & (CASTLE_KING_SIDE | CASTLE_QUEEN_SIDE) != 0
    }

    /// Returns `true` if the move goes between the same squares with the same promotion,
    /// ignoring flags.
    pub fn same_squares(&self, from: Square, to: Square, promotion: Option<Piece>) -> bool {
        self.from == from && self.to == to && self.promotion == promotion
    }
}

impl fmt::Display for Move {
    /// Writes the move in coordinate notation, such as `e2e4` or `e7e8q`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(piece) = self.promotion {
            write!(f, "{}", piece.to_char(Color::Black))?;
        }

        Ok(())
    }
}
