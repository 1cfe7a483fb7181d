//! Tools for reading, parsing and writing PGN files.
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::fs;
use std::io::{Read, BufRead, BufReader};
use std::path::Path;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use crate::chess::{self, Board, Color, Error, GameState};

/// The seven tags every PGN game carries, in the order they are written.
pub const SEVEN_TAG_ROSTER: [&str; 7] = ["Event", "Site", "Date", "Round", "White", "Black", "Result"];

const LINE_WIDTH: usize = 78;

lazy_static! {
    static ref COMMENT: Regex = Regex::new(r"\{[^}]*\}").expect("INFALLIBLE");
    static ref TAG: Regex = Regex::new(r#"(?m)^\s*\[(\w+)\s+"(.*)"\]\s*$"#).expect("INFALLIBLE");
    static ref MOVETEXT: Regex = Regex::new(r"(?m)^\s*\d+\.").expect("INFALLIBLE");
    static ref MOVE_NUMBER: Regex = Regex::new(r"^\d+\.+").expect("INFALLIBLE");
    static ref RESULT: Regex = Regex::new(r"^(1-0|0-1|1/2-1/2|1/2|\*)$").expect("INFALLIBLE");
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A game in Portable Game Notation: tag pairs, a flat list of SAN moves and a result token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pgn {
    source: String,
    tags: Vec<(String, String)>,
    moves: Vec<String>,
    result: String,
}

impl Pgn {
    /// Creates an empty PGN with no tags and no moves
    pub fn new() -> Pgn {
        Pgn {
            source: String::new(),
            tags: Vec::new(),
            moves: Vec::new(),
            result: "*".to_owned(),
        }
    }

    /// Parses a single game. `name` identifies the text in errors, usually the file it came
    /// from.
    ///
    /// Comments in braces are dropped. The movetext starts at the first line beginning with a
    /// move number; move numbers and annotation glyphs are dropped from it, and a trailing
    /// result token is taken off the moves. `1/2` is read as `1/2-1/2`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPgnFormat(name)` if there is no movetext.
    pub fn parse(text: &str, name: &str) -> chess::Result<Pgn> {
        let text = COMMENT.replace_all(text, "");
        let mut pgn = Pgn::new();
        pgn.source = name.to_owned();

        let start = MOVETEXT.find(&text).ok_or_else(|| Error::InvalidPgnFormat(name.to_owned()))?;

        for caps in TAG.captures_iter(&text[..start.start()]) {
            pgn.set_tag(&caps[1], &caps[2]);
        }

        for token in text[start.start()..].split_whitespace() {
            let token = MOVE_NUMBER.replace(token, "");
            if token.is_empty() || token.starts_with('$') {
                continue;
            }
            pgn.moves.push(token.into_owned());
        }

        let trailing = pgn.moves.last().filter(|t| RESULT.is_match(t)).cloned();
        if let Some(token) = trailing {
            pgn.moves.pop();
            pgn.result = normalize_result(&token);
        }
        if let Some(tag) = pgn.tag("Result").map(normalize_result) {
            pgn.set_tag("Result", &tag);
            pgn.result = tag;
        }

        debug!("read {} moves from {}", pgn.moves.len(), name);

        Ok(pgn)
    }

    /// Reads a single game from the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read, or `Error::InvalidPgnFormat` if it is not
    /// a PGN game.
    pub fn load<P: AsRef<Path>>(path: P) -> chess::Result<Pgn> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;

        Pgn::parse(&text, &path.display().to_string())
    }

    /// Writes the game to the file at `path`
    pub fn write<P: AsRef<Path>>(&self, path: P) -> chess::Result<()> {
        Ok(fs::write(path, self.to_string())?)
    }

    /// Builds a PGN from the moves and result of `game`. A game that did not start from the
    /// standard position gets `SetUp` and `FEN` tags.
    pub fn from_game(game: &GameState) -> Pgn {
        let mut pgn = Pgn::new();

        if let Some(start) = game.board_at(0) {
            if *start != Board::new() {
                pgn.set_tag("SetUp", "1");
                pgn.set_tag("FEN", &start.to_fen());
            }
        }
        pgn.moves = game.moves().into_iter().map(str::to_owned).collect();
        pgn.result = game.result_token().to_owned();
        pgn.set_tag("Result", game.result_token());

        pgn
    }

    /// Replays the game. If the game is not over after the last move, the result token is
    /// applied as a resignation or a draw.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidFenFormat` if the `FEN` tag is malformed
    /// - the error from the first move that cannot be played, if `check_moves` is `true`
    /// - `Error::InvalidPgnFormat` naming the source, if `check_moves` is `false` and a move
    ///   cannot be played
    pub fn to_game(&self, check_moves: bool) -> chess::Result<GameState> {
        let mut game = match self.tag("FEN") {
            Some(fen) => GameState::from_fen(fen)?,
            None => GameState::new(),
        };

        for token in &self.moves {
            if let Err(err) = game.play(token) {
                debug!("{}: {}", self.source, err);
                return Err(if check_moves { err } else { Error::InvalidPgnFormat(self.source.clone()) });
            }
        }

        if !game.is_over() {
            match self.result.as_str() {
                "1-0" => game.resign(Color::Black)?,
                "0-1" => game.resign(Color::White)?,
                "1/2-1/2" => game.draw()?,
                _ => {},
            }
        }

        Ok(game)
    }

    /// Returns the value of the tag `name`, if present
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    /// Sets the tag `name` to `value`, replacing any earlier value
    pub fn set_tag(&mut self, name: &str, value: &str) {
        match self.tags.iter_mut().find(|(n, _)| n == name) {
            Some(tag) => tag.1 = value.to_owned(),
            None => self.tags.push((name.to_owned(), value.to_owned())),
        }
    }

    /// Returns every tag pair in the order read
    pub fn tags(&self) -> &[(String, String)] {
        &self.tags
    }

    /// Returns the moves, without move numbers
    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    /// Returns the result token
    pub fn result(&self) -> &str {
        &self.result
    }

    /// Sets the result token. `1/2` is stored as `1/2-1/2`.
    pub fn set_result(&mut self, result: &str) {
        self.result = normalize_result(result);
        self.set_tag("Result", &self.result.clone());
    }

    /// The movetext: numbered moves followed by the result
    fn movetext(&self) -> String {
        let start = self.tag("FEN").and_then(|fen| Board::from_fen(fen).ok());
        let (mut number, mut turn) = match &start {
            Some(board) => (board.fullmove_number(), board.turn()),
            None => (1, Color::White),
        };

        let mut tokens = Vec::new();
        for (i, mv) in self.moves.iter().enumerate() {
            if turn == Color::White {
                tokens.push(format!("{}.", number));
            } else if i == 0 {
                tokens.push(format!("{}...", number));
            }
            tokens.push(mv.clone());

            if turn == Color::Black {
                number += 1;
            }
            turn = !turn;
        }
        tokens.push(self.result.clone());

        wrap(&tokens, LINE_WIDTH)
    }
}

impl Default for Pgn {
    fn default() -> Self {
        Pgn::new()
    }
}

impl fmt::Display for Pgn {
    /// Writes the seven tag roster, any other tags, a blank line and the movetext wrapped at 78
    /// columns.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &name in SEVEN_TAG_ROSTER.iter() {
            let value = match (name, self.tag(name)) {
                ("Result", _) => self.result.as_str(),
                (_, Some(value)) => value,
                ("Date", None) => "????.??.??",
                (_, None) => "?",
            };
            writeln!(f, "[{} \"{}\"]", name, value)?;
        }
        for (name, value) in &self.tags {
            if !SEVEN_TAG_ROSTER.contains(&name.as_str()) {
                writeln!(f, "[{} \"{}\"]", name, value)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "{}", self.movetext())
    }
}

fn normalize_result(token: &str) -> String {
    if token == "1/2" {
        "1/2-1/2".to_owned()
    } else {
        token.to_owned()
    }
}

fn wrap(tokens: &[String], width: usize) -> String {
    let mut lines = Vec::new();
    let mut line = String::new();

    for token in tokens {
        if !line.is_empty() && line.len() + 1 + token.len() > width {
            lines.push(std::mem::replace(&mut line, String::new()));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line += token;
    }
    lines.push(line);

    lines.join("\n")
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Returns an iterator over the games in a file holding any number of them. A new game begins at
/// the first tag line after some movetext.
pub fn read_pgn_games<R: Read>(reader: R, name: &str) -> ReadPgnGames<R> {
    ReadPgnGames { reader: BufReader::new(reader), buffer: String::new(), name: name.to_owned() }
}

/// Iterator returned by `read_pgn_games`
#[derive(Debug)]
pub struct ReadPgnGames<R: Read> {
    reader: BufReader<R>,
    buffer: String,
    name: String,
}

impl<R: Read> Iterator for ReadPgnGames<R> {
    type Item = chess::Result<Pgn>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut text = String::new();
        let mut in_movetext = false;

        loop {
            let line = self.buffer.trim();

            if line.starts_with('[') && in_movetext {
                // keep the tag line in the buffer for the next game
                return Some(Pgn::parse(&text, &self.name));
            } else if !line.is_empty() {
                in_movetext |= !line.starts_with('[');
                text += line;
                text.push('\n');
            }

            self.buffer.clear();
            match self.reader.read_line(&mut self.buffer) {
                Ok(0) => {
                    if text.is_empty() {
                        return None;
                    } else {
                        return Some(Pgn::parse(&text, &self.name));
                    }
                },
                Err(error) => return Some(Err(error.into())),
                _ => {},
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::Status;

    const RUY_LOPEZ: &str = "\
[Event \"Casual\"]
[White \"Anderssen\"]
[Black \"Kieseritzky\"]
[ECO \"C60\"]

1. e4 e5 2. Nf3 Nc6 {the knight} 3. Bb5 a6
4. Ba4 Nf6 1/2
";

    /// Tests for Pgn::parse()
    mod parse {
        use super::*;

        // 1. tags, moves and result
        #[test]
        fn reads_tags_and_moves() {
            let pgn = Pgn::parse(RUY_LOPEZ, "ruy.pgn").unwrap();
            assert_eq!(pgn.tag("Event"), Some("Casual"));
            assert_eq!(pgn.tag("ECO"), Some("C60"));
            assert_eq!(pgn.tag("Site"), None);
            assert_eq!(pgn.moves(), &["e4", "e5", "Nf3", "Nc6", "Bb5", "a6", "Ba4", "Nf6"]);
            assert_eq!(pgn.result(), "1/2-1/2");
        }

        // 2. numbers glued to moves and annotation glyphs
        #[test]
        fn glued_numbers() {
            let pgn = Pgn::parse("1.d4 d5 2.c4 $1 dxc4 3...e5 *", "-").unwrap();
            assert_eq!(pgn.moves(), &["d4", "d5", "c4", "dxc4", "e5"]);
            assert_eq!(pgn.result(), "*");
        }

        // 3. no movetext
        #[test]
        fn missing_movetext() {
            assert_eq!(Pgn::parse("[Event \"x\"]\n\n", "empty.pgn"),
                Err(Error::InvalidPgnFormat("empty.pgn".to_owned())));
            assert_eq!(Pgn::parse("", "blank.pgn"),
                Err(Error::InvalidPgnFormat("blank.pgn".to_owned())));
        }

        // 4. the result tag wins over the trailing token
        #[test]
        fn result_tag() {
            let pgn = Pgn::parse("[Result \"1/2\"]\n1. e4 e5", "-").unwrap();
            assert_eq!(pgn.result(), "1/2-1/2");
            assert_eq!(pgn.tag("Result"), Some("1/2-1/2"));
            assert_eq!(pgn.moves().len(), 2);
        }
    }

    /// Tests for Pgn::to_game()
    mod to_game {
        use super::*;

        // 1. the result is applied when the moves leave the game open
        #[test]
        fn applies_result() {
            let game = Pgn::parse(RUY_LOPEZ, "ruy.pgn").unwrap().to_game(true).unwrap();
            assert_eq!(game.len(), 8);
            assert_eq!(game.status(), Status::DrawAgreement);

            let game = Pgn::parse("1. e4 e5 0-1", "-").unwrap().to_game(true).unwrap();
            assert_eq!(game.status(), Status::BlackWonResign);
        }

        // 2. checkmate stands regardless of the token
        #[test]
        fn checkmate_is_kept() {
            let game = Pgn::parse("1. f3 e5 2. g4 Qh4# 0-1", "-").unwrap().to_game(true).unwrap();
            assert_eq!(game.status(), Status::BlackWon);
        }

        // 3. an illegal move is reported according to check_moves
        #[test]
        fn illegal_move() {
            let pgn = Pgn::parse("1. e4 e5 2. Ke3 *", "bad.pgn").unwrap();
            assert!(matches!(pgn.to_game(true), Err(Error::IllegalMove(_))));
            assert_eq!(pgn.to_game(false), Err(Error::InvalidPgnFormat("bad.pgn".to_owned())));
        }

        // 4. the FEN tag sets the starting position
        #[test]
        fn fen_tag() {
            let text = "[SetUp \"1\"]\n[FEN \"4k3/8/8/8/8/8/8/R3K3 b - - 0 7\"]\n\n7... Kd7 8. Ra7+ *";
            let game = Pgn::parse(text, "-").unwrap().to_game(true).unwrap();
            assert_eq!(game.moves(), vec!["Kd7", "Ra7+"]);
        }
    }

    /// Tests for Display
    mod display {
        use super::*;

        // 1. seven tag roster first, then the others
        #[test]
        fn tag_order() {
            let text = Pgn::parse(RUY_LOPEZ, "ruy.pgn").unwrap().to_string();
            let lines: Vec<_> = text.lines().collect();
            assert_eq!(&lines[..9], &[
                "[Event \"Casual\"]",
                "[Site \"?\"]",
                "[Date \"????.??.??\"]",
                "[Round \"?\"]",
                "[White \"Anderssen\"]",
                "[Black \"Kieseritzky\"]",
                "[Result \"1/2-1/2\"]",
                "[ECO \"C60\"]",
                "",
            ]);
            assert_eq!(lines[9], "1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 4. Ba4 Nf6 1/2-1/2");
        }

        // 2. long movetext is wrapped
        #[test]
        fn wraps_at_78_columns() {
            let mut game = GameState::new();
            for _ in 0..10 {
                for mv in &["Nf3", "Nf6", "Ng1", "Ng8"] {
                    game.play(mv).unwrap();
                }
            }
            let text = Pgn::from_game(&game).to_string();
            let movetext: Vec<_> = text.lines().skip(8).collect();
            assert!(movetext.len() > 1);
            assert!(movetext.iter().all(|l| l.len() <= 78));
            assert!(movetext[movetext.len() - 1].ends_with(" *"));
        }

        // 3. a game written out reads back the same
        #[test]
        fn from_game_reads_back() {
            let game = GameState::with_moves(&["e4", "c5", "Nf3", "d6", "d4", "cxd4"]).unwrap();
            let pgn = Pgn::from_game(&game);
            let back = Pgn::parse(&pgn.to_string(), "-").unwrap();
            assert_eq!(back.moves(), pgn.moves());
            assert_eq!(back.to_game(true).unwrap().board(), game.board());
        }
    }

    #[test]
    fn reads_several_games() {
        let text = format!("{}\n{}\n[Event \"second\"]\n1. d4 d5 *\n", RUY_LOPEZ, RUY_LOPEZ);
        let games: Vec<_> = read_pgn_games(text.as_bytes(), "many.pgn")
            .collect::<chess::Result<_>>()
            .unwrap();
        assert_eq!(games.len(), 3);
        assert_eq!(games[2].tag("Event"), Some("second"));
        assert_eq!(games[2].moves(), &["d4", "d5"]);
    }
}
