//! Module to implement a chess game: the storyboard of positions and how a game ends
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::iter::FusedIterator;
use log::{debug, info};
use super::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Why a game was won
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum WinReason {
    Checkmate,
    Resignation,
}

/// Why a game was drawn
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DrawReason {
    /// The side to move has no legal move and is not in check
    Stalemate,
    /// Neither side can ever checkmate
    InsufficientMaterial,
    /// 100 plies without a capture or pawn move, claimed by a player
    FiftyMoves,
    /// The same position occurred three times, claimed by a player
    Repetition,
    /// The players agreed to a draw with no rule forcing it
    Agreement,
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The result of a game
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GameResult {
    /// The given color won.
    Win(Color, WinReason),
    /// The game ended in a draw.
    Draw(DrawReason),
}

impl GameResult {
    /// Returns the winner, or `None` for a draw
    pub fn winner(self) -> Option<Color> {
        match self {
            GameResult::Win(color, _) => Some(color),
            GameResult::Draw(_) => None,
        }
    }

    /// Returns the PGN result token: `1-0`, `0-1` or `1/2-1/2`
    pub fn token(self) -> &'static str {
        match self {
            GameResult::Win(Color::White, _) => "1-0",
            GameResult::Win(Color::Black, _) => "0-1",
            GameResult::Draw(_) => "1/2-1/2",
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.token().fmt(f)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The status of a game as reported to players
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Status {
    InProgress,
    WhiteWon,
    BlackWon,
    WhiteWonResign,
    BlackWonResign,
    Stalemate,
    InsufficientMaterial,
    FiftyMoveRule,
    ThreefoldRepetition,
    DrawAgreement,
}

impl Status {
    /// Returns the status name, such as `in_progress` or `white_won_resign`
    pub fn name(self) -> &'static str {
        use Status::*;

        match self {
            InProgress => "in_progress",
            WhiteWon => "white_won",
            BlackWon => "black_won",
            WhiteWonResign => "white_won_resign",
            BlackWonResign => "black_won_resign",
            Stalemate => "stalemate",
            InsufficientMaterial => "insufficient_material",
            FiftyMoveRule => "fifty_rule_move",
            ThreefoldRepetition => "threefold_repetition",
            DrawAgreement => "draw_agreement",
        }
    }
}

impl From<Option<GameResult>> for Status {
    fn from(result: Option<GameResult>) -> Status {
        use GameResult::*;

        match result {
            None => Status::InProgress,
            Some(Win(Color::White, WinReason::Checkmate)) => Status::WhiteWon,
            Some(Win(Color::Black, WinReason::Checkmate)) => Status::BlackWon,
            Some(Win(Color::White, WinReason::Resignation)) => Status::WhiteWonResign,
            Some(Win(Color::Black, WinReason::Resignation)) => Status::BlackWonResign,
            Some(Draw(DrawReason::Stalemate)) => Status::Stalemate,
            Some(Draw(DrawReason::InsufficientMaterial)) => Status::InsufficientMaterial,
            Some(Draw(DrawReason::FiftyMoves)) => Status::FiftyMoveRule,
            Some(Draw(DrawReason::Repetition)) => Status::ThreefoldRepetition,
            Some(Draw(DrawReason::Agreement)) => Status::DrawAgreement,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// One move of the storyboard: the move, its SAN and the board it produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    mv: Move,
    san: String,
    board: Board,
}

impl Entry {
    /// The move that was made
    pub fn mv(&self) -> &Move {
        &self.mv
    }

    /// The move in SAN, as computed when it was made
    pub fn san(&self) -> &str {
        &self.san
    }

    /// The board after the move
    pub fn board(&self) -> &Board {
        &self.board
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A chess game: the starting board, every move since, and the result once there is one.
///
/// Checkmate, stalemate and insufficient material end the game as soon as they arise. The
/// fifty-move rule and threefold repetition only end it when a player claims the draw with
/// `draw()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    start: Board,
    entries: Vec<Entry>,
    result: Option<GameResult>,
}

impl GameState {
    /// Creates a new game from the standard starting position
    pub fn new() -> GameState {
        GameState::starting_at(Board::new())
    }

    /// Creates a new game using `board` as the starting position. The game may already be over
    /// if the side to move is mated or stalemated.
    pub fn starting_at(board: Board) -> GameState {
        let result = evaluate(&board);
        GameState { start: board, entries: Vec::new(), result }
    }

    /// Creates a new game from a FEN string. The game has no history before that position.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidFenFormat` if `fen` cannot be parsed.
    pub fn from_fen(fen: &str) -> Result<GameState> {
        Ok(GameState::starting_at(Board::from_fen(fen)?))
    }

    /// Creates a new game from the standard position and plays each token in `moves`.
    ///
    /// # Errors
    ///
    /// Returns the first error from `play`.
    pub fn with_moves<S: AsRef<str>>(moves: &[S]) -> Result<GameState> {
        let mut game = GameState::new();
        for mv in moves {
            game.play(mv.as_ref())?;
        }

        Ok(game)
    }

    /// Makes `mv`, which must be one of the legal moves of the current board, and returns it in
    /// SAN.
    ///
    /// # Errors
    ///
    /// Returns `Error::IllegalMove` if the game is over or the move is not legal.
    pub fn apply(&mut self, mv: &Move) -> Result<String> {
        let board = self.board();
        let legal = movegen::legal_moves(board)
            .into_iter()
            .find(|m| m.same_squares(mv.from(), mv.to(), mv.promotion()) && m.is_castle() == mv.is_castle());

        let mv = match legal {
            Some(m) if !self.is_over() => m,
            _ => {
                debug!("rejected move {} ({})", mv, self.status());
                return Err(self.illegal(&mv.to_string()));
            },
        };

        let san = notation::to_san(board, &mv);
        let next = board.apply_move(&mv);
        self.result = evaluate(&next);
        self.entries.push(Entry { mv, san: san.clone(), board: next });

        if self.result.is_some() {
            info!("game over after {}: {}", san, self.status());
        }

        Ok(san)
    }

    /// Makes the move described by `token`, in SAN or coordinate notation, and returns the
    /// canonical SAN of the move, which may differ from `token`.
    ///
    /// # Errors
    ///
    /// - `Error::BadNotation` if the token is malformed or ambiguous
    /// - `Error::IllegalMove` if the game is over or the move is not legal
    pub fn play(&mut self, token: &str) -> Result<String> {
        if self.is_over() {
            debug!("rejected move {} ({})", token, self.status());
            return Err(self.illegal(token));
        }

        match notation::resolve(self.board(), token) {
            Ok(mv) => self.apply(&mv),
            Err(Error::IllegalMove(_)) => {
                debug!("rejected move {}", token);
                Err(self.illegal(token))
            },
            Err(err) => Err(err),
        }
    }

    /// `color` resigns and the other color wins.
    ///
    /// # Errors
    ///
    /// Returns `Error::GameOver` if the game has already ended.
    pub fn resign(&mut self, color: Color) -> Result<()> {
        self.ensure_in_progress()?;
        self.result = Some(GameResult::Win(!color, WinReason::Resignation));
        info!("{} resigns", color.name());

        Ok(())
    }

    /// Ends the game in a draw. The reason is the first of insufficient material, the fifty-move
    /// rule and threefold repetition that holds, or agreement if none does.
    ///
    /// # Errors
    ///
    /// Returns `Error::GameOver` if the game has already ended.
    pub fn draw(&mut self) -> Result<()> {
        self.ensure_in_progress()?;

        let reason = if self.board().insufficient_material() {
            DrawReason::InsufficientMaterial
        } else {
            self.claimable_draw().unwrap_or(DrawReason::Agreement)
        };
        self.result = Some(GameResult::Draw(reason));
        info!("game drawn: {}", self.status());

        Ok(())
    }

    /// Takes back the last move, along with any result it or a later resignation or draw caused.
    /// With no moves made, takes back a resignation or draw instead. Returns `false` if there is
    /// nothing to take back.
    pub fn undo(&mut self) -> bool {
        if self.entries.pop().is_some() {
            self.result = evaluate(self.board());
            return true;
        }

        let restored = evaluate(self.board());
        if self.result == restored {
            false
        } else {
            self.result = restored;
            true
        }
    }

    fn ensure_in_progress(&self) -> Result<()> {
        if self.is_over() {
            Err(Error::GameOver(self.status()))
        } else {
            Ok(())
        }
    }

    fn illegal(&self, notation: &str) -> Error {
        Error::IllegalMove(IllegalMove::new(notation, self.status(), self.board()))
    }

    /// Returns the current board
    pub fn board(&self) -> &Board {
        self.entries.last().map(|e| &e.board).unwrap_or(&self.start)
    }

    /// Returns the board after `index` moves, where 0 is the starting board, or `None` if fewer
    /// moves have been made.
    pub fn board_at(&self, index: usize) -> Option<&Board> {
        match index {
            0 => Some(&self.start),
            i => self.entries.get(i - 1).map(|e| &e.board),
        }
    }

    /// Returns the number of moves made
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no moves have been made
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the moves made, excluding the starting board
    pub fn storyboard(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns an iterator over the boards from the starting board up to and including the
    /// current one.
    pub fn positions(&self) -> Positions<'_> {
        Positions { start: Some(&self.start), entries: self.entries.iter() }
    }

    /// Returns the moves made in SAN
    pub fn moves(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.san.as_str()).collect()
    }

    /// Returns the moves made in coordinate notation, such as `e2e4` or `e1g1` for castling
    pub fn coordinate_moves(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.mv.to_string()).collect()
    }

    /// Returns the result, or `None` while the game is in progress
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    /// Returns the PGN result token: `1-0`, `0-1`, `1/2-1/2` or `*` while in progress
    pub fn result_token(&self) -> &'static str {
        self.result.map(GameResult::token).unwrap_or("*")
    }

    /// Returns the status of the game
    pub fn status(&self) -> Status {
        self.result.into()
    }

    /// Returns `true` once the game has a result
    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    /// Returns the color whose turn it is
    pub fn active_player(&self) -> Color {
        self.board().turn()
    }

    /// Returns `true` if the current position has occurred at least three times, counting the
    /// starting board.
    pub fn threefold_repetition(&self) -> bool {
        let key = self.board().position_key();
        self.positions().filter(|b| b.position_key() == key).count() >= 3
    }

    /// Returns `true` if 100 plies have passed without a capture or pawn move
    pub fn fifty_move_rule(&self) -> bool {
        self.board().fifty_move_rule()
    }

    /// Returns the draw the side to move could claim: the fifty-move rule first, then threefold
    /// repetition.
    pub fn claimable_draw(&self) -> Option<DrawReason> {
        if self.fifty_move_rule() {
            Some(DrawReason::FiftyMoves)
        } else if self.threefold_repetition() {
            Some(DrawReason::Repetition)
        } else {
            None
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}

impl fmt::Display for GameState {
    /// The game is formatted as follows:
    ///
    /// "{}" -- numbered SAN, as in PGN movetext (eg 1. e4 e5 2. Nf3)
    ///
    /// "{:#}" -- a space delimited sequence in coordinate notation (eg e2e4 e7e5 g1f3)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tokens = Vec::new();

        if f.alternate() {
            tokens = self.coordinate_moves();
        } else {
            let mut board = &self.start;
            for (i, e) in self.entries.iter().enumerate() {
                if board.turn() == Color::White {
                    tokens.push(format!("{}.", board.fullmove_number()));
                } else if i == 0 {
                    tokens.push(format!("{}...", board.fullmove_number()));
                }
                tokens.push(e.san.clone());
                board = &e.board;
            }
        }

        tokens.join(" ").fmt(f)
    }
}

/// Evaluates the endings that happen without anyone claiming them
fn evaluate(board: &Board) -> Option<GameResult> {
    if movegen::legal_moves(board).is_empty() {
        if board.in_check() {
            Some(GameResult::Win(!board.turn(), WinReason::Checkmate))
        } else {
            Some(GameResult::Draw(DrawReason::Stalemate))
        }
    } else if board.insufficient_material() {
        Some(GameResult::Draw(DrawReason::InsufficientMaterial))
    } else {
        None
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// An iterator over the boards of a game, from the starting board up to and including the
/// current one.
#[derive(Debug, Clone)]
pub struct Positions<'a> {
    start: Option<&'a Board>,
    entries: std::slice::Iter<'a, Entry>,
}

impl<'a> Iterator for Positions<'a> {
    type Item = &'a Board;

    fn next(&mut self) -> Option<Self::Item> {
        match self.start.take() {
            Some(board) => Some(board),
            None => self.entries.next().map(|e| &e.board),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.entries.len() + self.start.is_some() as usize;

        (size, Some(size))
    }
}

impl ExactSizeIterator for Positions<'_> { }
impl FusedIterator for Positions<'_> { }
