//! Command line front end for the chess rules library.
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
#![warn(missing_docs, missing_debug_implementations, unused_extern_crates)]
#![warn(clippy::unimplemented, clippy::todo)]
#![warn(clippy::option_unwrap_used, clippy::result_unwrap_used)]

use std::fs::File;
use std::path::PathBuf;
use clap::{App, Arg, ArgMatches, SubCommand, AppSettings, crate_version};
use chrono::Local;
use log::info;
use rand::seq::SliceRandom;
use simplelog::{WriteLogger, LevelFilter};
use chess_rules::chess::{movegen, notation, Board, GameState, Square};
use chess_rules::chess::board::START_FEN;
use chess_rules::config::{Config, ConfigError};
use chess_rules::pgn::{read_pgn_games, Pgn};
use chess_rules::protocol::{EngineError, EngineResponse, Gnuchess};

fn main() -> Result<(), Error> {
    let fen_arg = || Arg::with_name("fen")
        .long("fen")
        .short("f")
        .value_name("FEN_STRING")
        .takes_value(true)
        .help("Starting position in Forsyth-Edwards Notation (defaults to the standard position)");

    let matches =
        App::new("chess-rules")
            .version(crate_version!())
            .author("Mike Leany")
            .about("Plays and checks chess games by the rules.")
            .setting(AppSettings::SubcommandRequired)
            .arg(Arg::with_name("config")
                .long("config")
                .short("c")
                .global(true)
                .takes_value(true)
                .value_name("CONFIG_FILE")
                .help("Configuration file (defaults to ~/.chess-rules/config.yaml)"))
            .arg(Arg::with_name("log")
                .long("log")
                .short("l")
                .global(true)
                .help("Turns on logging"))
            .arg(Arg::with_name("log-file")
                .long("log-file")
                .global(true)
                .value_name("LOG_FILE")
                .takes_value(true)
                .default_value("chess-rules.log")
                .help("Sets the log file if logging is turned on"))
            .arg(Arg::with_name("log-level")
                .long("log-level")
                .global(true)
                .value_name("LEVEL")
                .takes_value(true)
                .help("Sets the log level if logging is turned on (defaults to the configured level)"))
            .subcommand(SubCommand::with_name("moves")
                .about("Lists the legal moves in a position")
                .arg(Arg::with_name("figurine")
                    .long("figurine")
                    .help("Writes pieces as figurines"))
                .arg(Arg::with_name("fen")
                    .value_name("FEN_STRING")
                    .required(true)
                    .help("The position in Forsyth-Edwards Notation"))
                .arg(Arg::with_name("square")
                    .value_name("SQUARE")
                    .help("Only lists moves of the piece on this square")))
            .subcommand(SubCommand::with_name("play")
                .about("Plays a sequence of moves and reports the outcome")
                .arg(fen_arg())
                .arg(Arg::with_name("pgn")
                    .long("pgn")
                    .help("Writes the game as PGN"))
                .arg(Arg::with_name("moves")
                    .value_name("MOVES")
                    .multiple(true)
                    .help("Moves in SAN or coordinate notation")))
            .subcommand(SubCommand::with_name("pgn")
                .about("Replays the games in PGN files")
                .arg(Arg::with_name("lenient")
                    .long("lenient")
                    .help("Reports illegal moves as bad files rather than naming the move"))
                .arg(Arg::with_name("files")
                    .value_name("FILES")
                    .required(true)
                    .multiple(true)
                    .help("PGN files")))
            .subcommand(SubCommand::with_name("perft")
                .about("Counts the move paths from a position to a given depth")
                .arg(Arg::with_name("depth")
                    .long("depth")
                    .short("d")
                    .value_name("DEPTH")
                    .takes_value(true)
                    .required(true)
                    .help("Depth to count to"))
                .arg(Arg::with_name("fen")
                    .value_name("FEN_STRING")
                    .default_value(START_FEN)
                    .hide_default_value(true)
                    .multiple(true)
                    .help("Positions in Forsyth-Edwards Notation (defaults to the standard position)")))
            .subcommand(SubCommand::with_name("random")
                .about("Plays random legal moves until the game ends or a draw can be claimed")
                .arg(fen_arg())
                .arg(Arg::with_name("max-moves")
                    .long("max-moves")
                    .short("m")
                    .value_name("COUNT")
                    .takes_value(true)
                    .default_value("500")
                    .help("Stops after this many half moves")))
            .subcommand(SubCommand::with_name("engine")
                .about("Asks the configured engine for the next move")
                .arg(fen_arg())
                .arg(Arg::with_name("moves")
                    .value_name("MOVES")
                    .multiple(true)
                    .help("Moves played before asking")))
            .subcommand(SubCommand::with_name("config")
                .about("Prints the configuration")
                .arg(Arg::with_name("init")
                    .long("init")
                    .help("Writes the default configuration file")))
            .get_matches();

    let config_path = match matches.value_of_os("config") {
        Some(path) => PathBuf::from(path),
        None => Config::default_path().ok_or_else(|| Error("no home directory".to_owned()))?,
    };
    let config = Config::load(&config_path)?;

    let log_file = PathBuf::from(matches.value_of_os("log-file").expect("INFALLIBLE"));
    let log_level = match matches.value_of("log-level").unwrap_or(&config.log_level) {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        level => return Err(Error(format!("{}: invalid log level", level))),
    };

    let _logger = if matches.is_present("log") {
        WriteLogger::init(
            log_level,
            simplelog::Config::default(),
            File::create(&log_file).map_err(|err| {
                Error(format!("{}: {}", log_file.display(), err))
            })?)
    } else {
        WriteLogger::init(LevelFilter::Off, simplelog::Config::default(), std::io::sink())
    };
    info!("using configuration {}", config_path.display());

    match matches.subcommand() {
        ("moves", Some(matches)) => list_moves(matches)?,
        ("play", Some(matches)) => play(matches, &config)?,
        ("pgn", Some(matches)) => replay_pgn(matches)?,
        ("perft", Some(matches)) => {
            let depth = matches
                .value_of("depth")
                .expect("INFALLIBLE")
                .parse()
                .map_err(|_| Error("depth must be numeric".to_owned()))?;

            for fen in matches.values_of("fen").expect("INFALLIBLE") {
                let board = Board::from_fen(fen)?;
                println!("{}", fen);
                println!("Depth {} total:\t{:12}\n", depth, movegen::perft(&board, depth));
            }
        },
        ("random", Some(matches)) => random_game(matches, &config)?,
        ("engine", Some(matches)) => ask_engine(matches, &config)?,
        ("config", Some(matches)) => {
            if matches.is_present("init") {
                Config::default().save(&config_path)?;
                println!("wrote {}", config_path.display());
            } else {
                print!("{}", serde_yaml::to_string(&config)?);
            }
        },
        _ => unreachable!(),
    }

    Ok(())
}

/// The game to play on from, given the optional `--fen` argument
fn starting_game(matches: &ArgMatches<'_>) -> Result<GameState, Error> {
    Ok(match matches.value_of("fen") {
        Some(fen) => GameState::from_fen(fen)?,
        None => GameState::new(),
    })
}

/// Builds a PGN of `game` with the configured tags
fn to_pgn(game: &GameState, config: &Config, white: &str, black: &str) -> Pgn {
    let mut pgn = Pgn::from_game(game);

    pgn.set_tag("Event", &config.event);
    let site = config.site.clone()
        .or_else(|| hostname::get().ok().and_then(|name| name.into_string().ok()));
    if let Some(site) = site {
        pgn.set_tag("Site", &site);
    }
    pgn.set_tag("Date", &Local::today().format("%Y.%m.%d").to_string());
    pgn.set_tag("Round", &config.round);
    pgn.set_tag("White", white);
    pgn.set_tag("Black", black);

    pgn
}

fn list_moves(matches: &ArgMatches<'_>) -> Result<(), Error> {
    let board = Board::from_fen(matches.value_of("fen").expect("INFALLIBLE"))?;
    let moves = match matches.value_of("square") {
        Some(square) => {
            let square: Square = square.parse()?;
            movegen::generate_moves(&board, square)
        },
        None => movegen::generate_all_moves(&board),
    };

    let line = moves.join(" ");
    if matches.is_present("figurine") {
        println!("{}", notation::to_figurine(&line));
    } else {
        println!("{}", line);
    }

    Ok(())
}

fn play(matches: &ArgMatches<'_>, config: &Config) -> Result<(), Error> {
    let mut game = starting_game(matches)?;
    for token in matches.values_of("moves").into_iter().flatten() {
        game.play(token)?;
    }

    if matches.is_present("pgn") {
        print!("{}", to_pgn(&game, config, "?", "?"));
    } else {
        println!("{}", game);
        println!("{}", game.board().to_fen());
        println!("{}", game.status());
    }

    Ok(())
}

fn replay_pgn(matches: &ArgMatches<'_>) -> Result<(), Error> {
    let check_moves = !matches.is_present("lenient");

    for path in matches.values_of("files").expect("INFALLIBLE") {
        let file = File::open(path).map_err(|err| Error(format!("{}: {}", path, err)))?;
        for (i, pgn) in read_pgn_games(file, path).enumerate() {
            let game = pgn?.to_game(check_moves)?;
            println!("{} #{}: {}", path, i + 1, game.status());
            println!("{}", game.board().to_fen());
        }
    }

    Ok(())
}

fn random_game(matches: &ArgMatches<'_>, config: &Config) -> Result<(), Error> {
    let max_moves: usize = matches
        .value_of("max-moves")
        .expect("INFALLIBLE")
        .parse()
        .map_err(|_| Error("max-moves must be numeric".to_owned()))?;

    let mut game = starting_game(matches)?;
    let mut rng = rand::thread_rng();

    while !game.is_over() && game.len() < max_moves {
        if game.claimable_draw().is_some() {
            game.draw()?;
            break;
        }
        let moves = movegen::legal_moves(game.board());
        match moves.choose(&mut rng) {
            Some(mv) => { game.apply(mv)?; },
            None => break,
        }
    }

    print!("{}", to_pgn(&game, config, "Random", "Random"));

    Ok(())
}

fn ask_engine(matches: &ArgMatches<'_>, config: &Config) -> Result<(), Error> {
    let mut game = starting_game(matches)?;
    for token in matches.values_of("moves").into_iter().flatten() {
        game.play(token)?;
    }

    let mut engine = Gnuchess::spawn(&config.engine)?;
    match game.engine_move(&mut engine)? {
        EngineResponse::NextMove(mv) => {
            let san = game.moves().last().map(|s| s.to_string()).unwrap_or_default();
            println!("{} ({})", san, mv);
            println!("{}", game.board().to_fen());
        },
        EngineResponse::InvalidMove => println!("the engine refused the position"),
        EngineResponse::GameEnded(result) => println!("{}", result),
    }

    Ok(())
}

struct Error(String);

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        self.0.fmt(f)
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for Error { }

impl From<chess_rules::chess::Error> for Error {
    fn from(err: chess_rules::chess::Error) -> Self {
        Error(format!("{:#}", err))
    }
}

impl From<EngineError> for Error {
    fn from(err: EngineError) -> Self {
        Error(err.to_string())
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error(err.to_string())
    }
}
