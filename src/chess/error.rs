//! Defines the error types needed by the chess module
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use super::{Board, Color, Status};

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Error type used by methods in the `chess` module
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The token does not parse as a move, or names no single piece
    BadNotation(String),
    /// The move parses but is not legal in the current position
    IllegalMove(IllegalMove),
    /// Malformed FEN string
    InvalidFenFormat(String),
    /// Malformed PGN text; carries the file name, or the text itself if there is no file
    InvalidPgnFormat(String),
    /// The game has already ended
    GameOver(Status),
    /// Reading a file failed
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Error::*;

        match self {
            BadNotation(s) => write!(f, "The notation '{}' is invalid", s),
            IllegalMove(context) => context.fmt(f),
            InvalidFenFormat(s) => write!(f, "Invalid FEN string: '{}'", s),
            InvalidPgnFormat(s) => write!(f, "Invalid PGN file: '{}'", s),
            GameOver(status) => write!(f, "the game is over ({})", status),
            Io(s) => s.fmt(f),
        }
    }
}

impl std::error::Error for Error { }

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// What was being attempted when an illegal move was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IllegalMove {
    /// The move as it was given
    pub notation: String,
    /// Status of the game at the time
    pub status: Status,
    /// The player whose turn it was
    pub turn: Color,
    /// Text rendering of the board
    pub board: String,
}

impl IllegalMove {
    /// Records `notation` being rejected on `board` while the game had `status`.
    pub fn new(notation: &str, status: Status, board: &Board) -> IllegalMove {
        IllegalMove {
            notation: notation.to_owned(),
            status,
            turn: board.turn(),
            board: board.render(),
        }
    }
}

impl fmt::Display for IllegalMove {
    /// "{}" gives a one line message. "{:#}" adds the status, player and board.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Illegal move '{}'", self.notation)?;
        if f.alternate() {
            write!(f, "\nStatus: {}\nPlayer turn {}\n{}", self.status, self.turn.name(), self.board)?;
        }

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Result type used by methods in the `chess` module
pub type Result<T> = std::result::Result<T, Error>;
