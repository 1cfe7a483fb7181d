//! Forsyth-Edwards Notation for `Board`
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use lazy_static::lazy_static;
use regex::Regex;
use super::*;

/// FEN of the standard starting position
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

lazy_static! {
    static ref FEN: Regex = Regex::new(concat!(
        r"^((?:[PRNBQKprnbqk1-8]{1,8}/){7}[PRNBQKprnbqk1-8]{1,8})",
        r"\s(w|b)\s(-|K?Q?k?q?)\s(-|[a-h][1-8])\s(\d+)\s(\d+)$"
    )).expect("INFALLIBLE");
}

impl Board {
    /// Parse a board from a FEN string.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidFenFormat` carrying `fen` if the string does not follow the FEN
    /// grammar, a rank does not add up to eight squares, a counter is out of range (a full-move
    /// number of 0, or a counter too large to advance), or the position could not arise in a
    /// game (wrong number of kings, pawns on the first or last rank, or the side not on move in
    /// check). Castling rights whose king or rook is not at home are dropped.
    pub fn from_fen(fen: &str) -> Result<Board> {
        let invalid = || Error::InvalidFenFormat(fen.to_owned());
        let caps = FEN.captures(fen.trim()).ok_or_else(invalid)?;

        let mut board = Board::empty();

        // the placement, from rank 8 down to rank 1
        for (row, text) in caps[1].split('/').enumerate() {
            let rank = Rank::from_index(7 - row).ok_or_else(invalid)?;
            let mut file = 0;
            for c in text.chars() {
                if let Some(n) = c.to_digit(10) {
                    file += n as usize;
                } else {
                    let (color, piece) = Piece::from_char(c).ok_or_else(invalid)?;
                    let f = File::from_index(file).ok_or_else(invalid)?;
                    board.put(Square::from_coord(f, rank), Some((color, piece)));
                    file += 1;
                }
                if file > File::COUNT {
                    return Err(invalid());
                }
            }
            if file != File::COUNT {
                return Err(invalid());
            }
        }

        board.turn = if &caps[2] == "w" { White } else { Black };

        for c in caps[3].chars() {
            match c {
                'K' => board.castling_rights[White as usize] |= CASTLE_KING_SIDE,
                'Q' => board.castling_rights[White as usize] |= CASTLE_QUEEN_SIDE,
                'k' => board.castling_rights[Black as usize] |= CASTLE_KING_SIDE,
                'q' => board.castling_rights[Black as usize] |= CASTLE_QUEEN_SIDE,
                _ => {},
            }
        }

        if &caps[4] != "-" {
            board.ep_square = Some(caps[4].parse().map_err(|_| invalid())?);
        }

        board.halfmove_clock = caps[5].parse().map_err(|_| invalid())?;
        board.fullmove_number = caps[6].parse().map_err(|_| invalid())?;
        // both counters must have room to advance
        if board.fullmove_number == 0
            || board.fullmove_number == u32::MAX
            || board.halfmove_clock == u32::MAX {
            return Err(invalid());
        }

        board.drop_unsupported_castling();
        if board.is_consistent() {
            Ok(board)
        } else {
            Err(invalid())
        }
    }

    /// Clears any castling right whose king or rook is not on its home square.
    fn drop_unsupported_castling(&mut self) {
        for &color in &[White, Black] {
            let rank = color.back_rank();
            let home = |file, piece| self.piece_at(Square::from_coord(file, rank)) == Some((color, piece));
            let mut rights = self.castling_rights[color as usize];
            if !home(File::E, King) {
                rights = 0;
            }
            if !home(File::H, Rook) {
                rights &= !CASTLE_KING_SIDE;
            }
            if !home(File::A, Rook) {
                rights &= !CASTLE_QUEEN_SIDE;
            }
            self.castling_rights[color as usize] = rights;
        }
    }

    /// Checks that the position could have come from a legal game
    fn is_consistent(&self) -> bool {
        for &color in &[White, Black] {
            // Step 1: exactly one king per side
            if self.occupied_by_piece(color, King).len() != 1 {
                return false;
            }
            // Step 2: no pawns on ranks 1 and 8
            let edges = Bitboard::from(Rank::R1) | Rank::R8.into();
            if self.occupied_by_piece(color, Pawn).intersects(edges) {
                return false;
            }
        }

        // Step 3: the en-passant square is behind a pawn that just moved
        if let Some(ep) = self.ep_square {
            let expected = if self.turn == White { Rank::R6 } else { Rank::R3 };
            if ep.rank() != expected || self.piece_at(ep).is_some() {
                return false;
            }
        }

        // Step 4: the player who just moved did not leave their king capturable
        match self.king_location(!self.turn) {
            Some(king) => !self.is_square_attacked(king, self.turn),
            None => false,
        }
    }

    /// Converts the board to a FEN string
    pub fn to_fen(&self) -> String {
        let mut placement = String::new();

        for &rank in Rank::ALL.iter().rev() {
            let mut empty = 0;
            for &file in File::ALL.iter() {
                match self.piece_at(Square::from_coord(file, rank)) {
                    Some((color, piece)) => {
                        if empty > 0 {
                            placement += &empty.to_string();
                            empty = 0;
                        }
                        placement.push(piece.to_char(color));
                    },
                    None => empty += 1,
                }
            }
            if empty > 0 {
                placement += &empty.to_string();
            }
            if rank != Rank::R1 {
                placement.push('/');
            }
        }

        let ep_square = match self.ep_square {
            Some(sq) => sq.to_string(),
            None => "-".to_string(),
        };

        format!("{} {} {} {} {} {}", placement, self.turn, self.castling_rights(), ep_square,
                                     self.halfmove_clock, self.fullmove_number)
    }
}
