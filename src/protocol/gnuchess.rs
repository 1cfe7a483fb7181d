//! Asks GNU Chess for moves, using its xboard mode (`gnuchess -x`)
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::time::{Duration, Instant};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use crate::chess::{movegen, Board, DrawReason, GameResult, GameState, Piece, Square, WinReason};
use crate::chess::Color::*;
use crate::config::EngineConfig;
use super::{io, EngineError, EngineResponse};

lazy_static! {
    static ref NEXT_MOVE: Regex = Regex::new(
        r"My move is\s*:\s*([a-h][1-8])([a-h][1-8])([qrbnQRBN])?"
    ).expect("INFALLIBLE");
    static ref RESULT: Regex = Regex::new(r"^(1-0|0-1|1/2-1/2)\s*\{(.*)\}").expect("INFALLIBLE");
    static ref RESIGN: Regex = Regex::new(r"^(?:My move is\s*:\s*)?resign\s*$").expect("INFALLIBLE");
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A connection to GNU Chess.
///
/// Each request replays the whole game, so one connection can serve any number of games.
#[derive(Debug)]
pub struct Gnuchess {
    engine: io::Engine,
    depth: u32,
    timeout: Duration,
    ping: usize,
}

impl Gnuchess {
    /// Starts the engine described by `config`.
    pub fn spawn(config: &EngineConfig) -> Result<Gnuchess, EngineError> {
        Ok(Gnuchess {
            engine: io::Engine::launch(&config.command, &config.args[..], "engine")?,
            depth: config.depth,
            timeout: Duration::from_millis(config.timeout_ms),
            ping: 0,
        })
    }

    /// Asks for the side to move's next move in `game`.
    ///
    /// Sends `new`, `force` and a `ping`, and discards everything up to the matching `pong`, which
    /// includes any late answer to an earlier request. Then sends `depth`, the starting position
    /// if it is not the standard one, each move in coordinate notation and `go`, and waits for a
    /// line it understands. Lines it does not understand are skipped.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Timeout` if no answer comes within the configured timeout, and
    /// `EngineError::Closed` if the engine exits.
    pub fn next_move(&mut self, game: &GameState) -> Result<EngineResponse, EngineError> {
        let deadline = Instant::now() + self.timeout;

        self.engine.send("new")?;
        self.engine.send("force")?;
        self.sync(deadline)?;
        self.engine.send(&format!("depth {}", self.depth))?;
        if let Some(start) = game.board_at(0) {
            if *start != Board::new() {
                self.engine.send(&format!("setboard {}", start.to_fen()))?;
            }
        }
        for mv in game.coordinate_moves() {
            self.engine.send(&mv)?;
        }
        self.engine.send("go")?;

        loop {
            let line = self.engine.recv_until(deadline)?;
            if let Some(response) = parse_response(&line, game.board())? {
                return Ok(response);
            }
        }
    }

    /// Sends `ping N` and drops every line until `pong N`.
    fn sync(&mut self, deadline: Instant) -> Result<(), EngineError> {
        self.ping += 1;
        let pong = format!("pong {}", self.ping);
        self.engine.send(&format!("ping {}", self.ping))?;

        loop {
            let line = self.engine.recv_until(deadline)?;
            if line.trim() == pong {
                return Ok(());
            }
            debug!("discarding engine output: {}", line);
        }
    }
}

/// Reads one line of engine output against the board the engine is moving on.
///
/// Returns `None` for lines that carry no answer.
///
/// # Errors
///
/// Returns `EngineError::Protocol` if the engine plays a move that is not legal on `board`.
pub fn parse_response(line: &str, board: &Board) -> Result<Option<EngineResponse>, EngineError> {
    let line = line.trim();

    if let Some(caps) = RESULT.captures(line) {
        return Ok(Some(EngineResponse::GameEnded(game_result(&caps[1], &caps[2]))));
    }
    if RESIGN.is_match(line) {
        let winner = !board.turn();
        return Ok(Some(EngineResponse::GameEnded(GameResult::Win(winner, WinReason::Resignation))));
    }
    if let Some(caps) = NEXT_MOVE.captures(line) {
        let protocol = || EngineError::Protocol(line.to_owned());
        let from: Square = caps[1].parse().map_err(|_| protocol())?;
        let to: Square = caps[2].parse().map_err(|_| protocol())?;
        let promotion = match caps.get(3) {
            Some(m) => Some(m.as_str().parse::<Piece>().map_err(|_| protocol())?),
            None => None,
        };

        return movegen::legal_moves(board)
            .into_iter()
            .find(|mv| mv.same_squares(from, to, promotion))
            .map(|mv| Some(EngineResponse::NextMove(mv)))
            .ok_or_else(protocol);
    }
    if line.contains("Invalid move") {
        return Ok(Some(EngineResponse::InvalidMove));
    }

    debug!("ignoring engine output: {}", line);
    Ok(None)
}

/// Turns a result line such as `1-0 {White mates}` into a result
fn game_result(token: &str, comment: &str) -> GameResult {
    let comment = comment.to_lowercase();
    let win = |color| {
        if comment.contains("resign") {
            GameResult::Win(color, WinReason::Resignation)
        } else {
            GameResult::Win(color, WinReason::Checkmate)
        }
    };

    match token {
        "1-0" => win(White),
        "0-1" => win(Black),
        _ => {
            let reason = if comment.contains("stalemate") {
                DrawReason::Stalemate
            } else if comment.contains("material") {
                DrawReason::InsufficientMaterial
            } else if comment.contains("50") || comment.contains("fifty") {
                DrawReason::FiftyMoves
            } else if comment.contains("repetition") {
                DrawReason::Repetition
            } else {
                DrawReason::Agreement
            };
            GameResult::Draw(reason)
        },
    }
}

impl GameState {
    /// Asks `engine` for the next move and plays it if there is one. If the game is already over,
    /// the engine is not asked and its result is returned as `GameEnded`.
    pub fn engine_move(&mut self, engine: &mut Gnuchess) -> Result<EngineResponse, EngineError> {
        if let Some(result) = self.result() {
            return Ok(EngineResponse::GameEnded(result));
        }

        let response = engine.next_move(self)?;
        if let EngineResponse::NextMove(mv) = &response {
            self.apply(mv).map_err(|err| EngineError::Protocol(err.to_string()))?;
        }

        Ok(response)
    }
}
