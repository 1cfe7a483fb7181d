//! The `chess` module implements the FIDE Laws of Chess: positions, move generation, game
//! termination and the notations used to talk about them.
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::ops;
use std::fmt;
use std::str::FromStr;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Which side a piece or player is on, based on the color of the pieces for that side.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    /// The number of colors
    pub const COUNT: usize = 2;

    /// Returns the lowercase name of the color, as used in status messages.
    pub fn name(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }

    /// The rank pawns of this color start on.
    pub fn pawn_rank(self) -> Rank {
        match self {
            Color::White => Rank::R2,
            Color::Black => Rank::R7,
        }
    }

    /// The rank pawns of this color promote on.
    pub fn promotion_rank(self) -> Rank {
        match self {
            Color::White => Rank::R8,
            Color::Black => Rank::R1,
        }
    }

    /// The rank the king and rooks of this color start on.
    pub fn back_rank(self) -> Rank {
        match self {
            Color::White => Rank::R1,
            Color::Black => Rank::R8,
        }
    }

    /// Direction pawns of this color move in, as a rank offset.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

impl ops::Not for Color {
    type Output = Color;

    /// Returns the opposite color
    ///
    /// # Example
    /// ```
    /// use chess_rules::chess::Color;
    /// assert_eq!(!Color::White, Color::Black);
    /// assert_eq!(!Color::Black, Color::White);
    /// ```
    fn not(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => 'w'.fmt(f),
            Color::Black => 'b'.fmt(f),
        }
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "w" | "white" => Ok(Color::White),
            "b" | "black" => Ok(Color::Black),
            _ => Err(Error::BadNotation(s.to_owned())),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The kind of a chess piece. Pieces on the board are `(Color, Piece)` pairs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Piece {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl Piece {
    /// The number of piece types
    pub const COUNT: usize = Piece::King as usize + 1;

    /// Pieces a pawn may promote to, strongest first.
    pub const PROMOTIONS: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

    /// Returns the letter used for the piece in FEN, uppercase for white and lowercase for black.
    pub fn to_char(self, color: Color) -> char {
        let c = match self {
            Piece::Pawn => 'P',
            Piece::Knight => 'N',
            Piece::Bishop => 'B',
            Piece::Rook => 'R',
            Piece::Queen => 'Q',
            Piece::King => 'K',
        };

        match color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    /// Reads a FEN piece letter, using its case to decide the color.
    pub fn from_char(c: char) -> Option<(Color, Piece)> {
        let piece = match c.to_ascii_uppercase() {
            'P' => Piece::Pawn,
            'N' => Piece::Knight,
            'B' => Piece::Bishop,
            'R' => Piece::Rook,
            'Q' => Piece::Queen,
            'K' => Piece::King,
            _ => return None,
        };
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };

        Some((color, piece))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_char(Color::White).fmt(f)
    }
}

impl FromStr for Piece {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next().and_then(Piece::from_char), chars.next()) {
            (Some((_, piece)), None) => Ok(piece),
            _ => Err(Error::BadNotation(s.to_owned())),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Vertical column of the board, labeled from left to right from `White`'s perspective as
/// `A` through `H`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum File {
    A = 0, B = 1, C = 2, D = 3, E = 4, F = 5, G = 6, H = 7,
}

impl File {
    /// The number of files
    pub const COUNT: usize = 8;

    /// All files, from `A` to `H`
    pub const ALL: [File; 8] = [
        File::A, File::B, File::C, File::D, File::E, File::F, File::G, File::H,
    ];

    /// Returns the file with the given zero-based index, if there is one.
    pub fn from_index(i: usize) -> Option<File> {
        File::ALL.get(i).copied()
    }

    /// Reads a lowercase or uppercase file letter.
    pub fn from_char(c: char) -> Option<File> {
        match c {
            'a'..='h' => File::from_index(c as usize - 'a' as usize),
            'A'..='H' => File::from_index(c as usize - 'A' as usize),
            _ => None,
        }
    }

    /// Returns the file's letter.
    pub fn to_char(self) -> char {
        (b'a' + self as u8) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_char().fmt(f)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Horizontal row of the board, labeled from nearest to farthest from `White`'s perspective
/// as `R1` through `R8`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Rank {
    R1 = 0, R2 = 1, R3 = 2, R4 = 3, R5 = 4, R6 = 5, R7 = 6, R8 = 7,
}

impl Rank {
    /// The number of ranks
    pub const COUNT: usize = 8;

    /// All ranks, from `R1` to `R8`
    pub const ALL: [Rank; 8] = [
        Rank::R1, Rank::R2, Rank::R3, Rank::R4, Rank::R5, Rank::R6, Rank::R7, Rank::R8,
    ];

    /// Returns the rank with the given zero-based index, if there is one.
    pub fn from_index(i: usize) -> Option<Rank> {
        Rank::ALL.get(i).copied()
    }

    /// Reads a rank digit.
    pub fn from_char(c: char) -> Option<Rank> {
        match c {
            '1'..='8' => Rank::from_index(c as usize - '1' as usize),
            _ => None,
        }
    }

    /// Returns the rank's digit.
    pub fn to_char(self) -> char {
        (b'1' + self as u8) as char
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_char().fmt(f)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A specific square on the board, labeled using the `File` and `Rank` as coordinates.
///
/// Squares are numbered file by file, so `a1` is 0, `a2` is 1 and `h8` is 63. A `Square` is
/// always on the board; stepping off the edge with `offset` gives `None`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    /// The number of squares
    pub const COUNT: usize = 64;

    /// Returns a square from its file and rank
    pub fn from_coord(file: File, rank: Rank) -> Square {
        Square(((file as u8) << 3) | rank as u8)
    }

    /// Returns the square with the given index, or `None` if the index is off the board.
    pub fn from_index(i: usize) -> Option<Square> {
        if i < Square::COUNT {
            Some(Square(i as u8))
        } else {
            None
        }
    }

    /// Returns an iterator over all 64 squares, `a1` first.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..Square::COUNT as u8).map(Square)
    }

    /// Returns the square's index into a 64-entry board.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the square's file
    pub fn file(self) -> File {
        File::ALL[(self.0 >> 3) as usize]
    }

    /// Returns the square's rank
    pub fn rank(self) -> Rank {
        Rank::ALL[(self.0 & 7) as usize]
    }

    /// Returns the square `files` to the right and `ranks` up from this one, or `None` if that
    /// would leave the board.
    pub fn offset(self, files: i8, ranks: i8) -> Option<Square> {
        let f = self.file() as i8 + files;
        let r = self.rank() as i8 + ranks;

        if (0..8).contains(&f) && (0..8).contains(&r) {
            Some(Square(((f as u8) << 3) | r as u8))
        } else {
            None
        }
    }

    /// Returns `true` for light squares such as `h1`, `false` for dark squares such as `a1`.
    pub fn is_light(self) -> bool {
        (self.file() as u8 + self.rank() as u8) % 2 == 1
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl FromStr for Square {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next().and_then(File::from_char),
               chars.next().and_then(Rank::from_char),
               chars.next()) {
            (Some(file), Some(rank), None) => Ok(Square::from_coord(file, rank)),
            _ => Err(Error::BadNotation(s.to_owned())),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
pub mod error;
pub mod bitboard;
pub mod board;
pub mod moves;
pub mod movegen;
pub mod notation;
pub mod game;

pub use error::{Error, IllegalMove, Result};
pub use board::Board;
pub use moves::Move;
pub use game::{GameState, GameResult, WinReason, DrawReason, Status};



#[cfg(test)]
mod square_tests {
    use super::{File, Rank, Square};

    #[test]
    fn file_and_rank_methods_match_from_coord() {
        for &f in File::ALL.iter() {
            for &r in Rank::ALL.iter() {
                let s = Square::from_coord(f, r);
                assert_eq!(f, s.file());
                assert_eq!(r, s.rank());
                assert_eq!(Square::from_index(s.index()), Some(s));
            }
        }
    }

    #[test]
    fn display_and_fromstr_agree() {
        for s in Square::all() {
            assert_eq!(s.to_string().parse::<Square>().unwrap(), s);
        }
        assert_eq!("e4".parse::<Square>().unwrap(), Square::from_coord(File::E, Rank::R4));
    }

    #[test]
    fn fromstr_produces_errors_when_it_should() {
        assert!("a".parse::<Square>().is_err());
        assert!("1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("i1".parse::<Square>().is_err());
        assert!("a1x".parse::<Square>().is_err());
    }

    #[test]
    fn offset_stays_on_the_board() {
        let a1: Square = "a1".parse().unwrap();
        let h8: Square = "h8".parse().unwrap();
        assert_eq!(a1.offset(1, 2), Some("b3".parse().unwrap()));
        assert_eq!(a1.offset(-1, 0), None);
        assert_eq!(a1.offset(0, -1), None);
        assert_eq!(h8.offset(1, 0), None);
        assert_eq!(h8.offset(0, 1), None);
        assert_eq!(Square::from_index(64), None);
    }

    #[test]
    fn square_colors() {
        assert!(!"a1".parse::<Square>().unwrap().is_light());
        assert!("h1".parse::<Square>().unwrap().is_light());
        assert!(!"h8".parse::<Square>().unwrap().is_light());
    }
}
