//! Talking to external chess engines
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::sync::mpsc;
use crate::chess::{GameResult, Move};

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Possible responses when an engine is asked for a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineResponse {
    /// The engine plays the given move, which is legal in the current position.
    NextMove(Move),
    /// The engine refused one of the moves it was sent.
    InvalidMove,
    /// The engine says the game is over.
    GameEnded(GameResult),
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The engine could not be used. This is never an illegal move on the game's part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The engine program could not be found
    NotFound(String),
    /// The engine closed its output
    Closed,
    /// The engine did not answer in time
    Timeout,
    /// Reading from or writing to the engine failed
    Io(String),
    /// The engine answered with a move that is not legal
    Protocol(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use EngineError::*;

        match self {
            NotFound(cmd) => write!(f, "engine '{}' not found", cmd),
            Closed => "lost communication with engine".fmt(f),
            Timeout => "engine did not respond in time".fmt(f),
            Io(s) => write!(f, "engine io error: {}", s),
            Protocol(line) => write!(f, "engine sent an illegal move: '{}'", line),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<std::io::Error> for EngineError {
    fn from(error: std::io::Error) -> EngineError {
        match error.kind() {
            std::io::ErrorKind::BrokenPipe => EngineError::Closed,
            _ => EngineError::Io(error.to_string()),
        }
    }
}

impl From<mpsc::RecvTimeoutError> for EngineError {
    fn from(error: mpsc::RecvTimeoutError) -> EngineError {
        use mpsc::RecvTimeoutError::*;

        match error {
            Disconnected => EngineError::Closed,
            Timeout => EngineError::Timeout,
        }
    }
}

pub mod io;
pub mod gnuchess;

pub use gnuchess::Gnuchess;
