//! Loads complete games from PGN
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use chess_rules::chess::{Error, Status};
use chess_rules::pgn::{read_pgn_games, Pgn};

const CARUANA_GODENA: &str = r#"[Event "70th ch-ITA"]
[Site "Siena ITA"]
[Round "10"]
[Date "2010.12.3"]
[White "Caruana, Fabiano"]
[Black "Godena, Michele"]
[Result "1-0"]
1.d4 d5 2.c4 dxc4 3.e4 e5 4.Nf3 Bb4+ 5.Nc3 exd4 6.Nxd4 Ne7 7.Bf4 Bxc3+ 8.bxc3 Ng6 9.Bg3 Qe7
10.Bxc4 Qxe4+ 11.Qe2 Qxe2+ 12.Bxe2 Na6 13.Rb1 O-O 14.O-O Re8 15.Rfe1 Nc5 16.Bxc7 Bd7 17.Bf3
Rxe1+ 18.Rxe1 Rc8 19.Bg3 b6 20.h4 Ne6 21.h5 Ne7 22.Be5 Nc6 23.Nxc6 Bxc6 24.Bg4 Re8 25.Bg3 g6
26.h6 f5 27.Bd1 f4 28.Bh4 Kf8 29.Re5 g5 30.Bh5 Rc8 31.Bxg5 Nxg5 32.Rxg5 Bd7 33.Rg7 Rc5 34.Bf3
Bf5 35.Rxa7 Rxc3 36.Bd5 Bg6 37.Ra4 Rc1+ 38.Kh2 Rc5 39.Rxf4+ Ke7 40.Bf3 Ra5 41.Rb4 b5 42.Bd5
Kf6 43.f4 Bf5 44.Bc6 Bd3 45.Rd4 Ra3 46.Bd5 Bb1 47.Rd1 Bd3 48.Bb3 Bc4 49.Bc2 Ke7 50.Bf5 Rxa2
51.Rd7+ Kf8 52.Rxh7 Bd5 53.Rd7 1-0
"#;

const RUY_LOPEZ: &str = "\
1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 {This opening is called the Ruy Lopez.}
4. Ba4 Nf6 5. O-O Be7 6. Re1 b5 7. Bb3 d6 8. c3 O-O 9. h3 Nb8 10. d4 Nbd7
11. c4 c6 12. cxb5 axb5 13. Nc3 Bb7 14. Bg5 b4 15. Nb1 h6 16. Bh4 c5 17. dxe5
Nxe4 18. Bxe7 Qxe7 19. exd6 Qf6 20. Nbd2 Nxd6 21. Nc4 Nxc4 22. Bxc4 Nb6
23. Ne5 Rae8 24. Bxf7+ Rxf7 25. Nxf7 Rxe1+ 26. Qxe1 Kxf7 27. Qe3 Qg5 28. Qxg5
hxg5 29. b3 Ke6 30. a3 Kd6 31. axb4 cxb4 32. Ra5 Nd5 33. f3 Bc8 34. Kf2 Bf5
35. Ra7 g6 36. Ra6+ Kc5 37. Ke1 Nf4 38. g3 Nxh3 39. Kd2 Kb5 40. Rd6 Kc5 41. Ra6
Nf2 42. g4 Bd3 43. Re6 1/2-1/2
";

#[test]
fn tagged_game() {
    let pgn = Pgn::parse(CARUANA_GODENA, "caruana-godena.pgn").unwrap();
    assert_eq!(pgn.tag("Event"), Some("70th ch-ITA"));
    assert_eq!(pgn.tag("Site"), Some("Siena ITA"));
    assert_eq!(pgn.tag("Round"), Some("10"));
    assert_eq!(pgn.tag("Date"), Some("2010.12.3"));
    assert_eq!(pgn.tag("White"), Some("Caruana, Fabiano"));
    assert_eq!(pgn.tag("Black"), Some("Godena, Michele"));
    assert_eq!(pgn.result(), "1-0");
    assert_eq!(pgn.moves().len(), 105);
    assert_eq!(pgn.moves().last().map(String::as_str), Some("Rd7"));

    let game = pgn.to_game(true).unwrap();
    assert_eq!(game.moves().last(), Some(&"Rd7"));
    assert_eq!(game.status(), Status::WhiteWonResign);
    assert_eq!(game.result_token(), "1-0");
}

#[test]
fn untagged_game() {
    let pgn = Pgn::parse(RUY_LOPEZ, "ruy-lopez.pgn").unwrap();
    for tag in &["Event", "Site", "Round", "Date", "White", "Black", "Result"] {
        assert_eq!(pgn.tag(tag), None);
    }
    assert_eq!(pgn.moves().last().map(String::as_str), Some("Re6"));
    assert_eq!(pgn.result(), "1/2-1/2");

    let game = pgn.to_game(true).unwrap();
    assert_eq!(game.len(), 85);
    assert_eq!(game.result_token(), "1/2-1/2");
}

#[test]
fn written_game_reads_back() {
    let game = Pgn::parse(CARUANA_GODENA, "caruana-godena.pgn").unwrap().to_game(true).unwrap();
    let text = Pgn::from_game(&game).to_string();

    let back = Pgn::parse(&text, "written.pgn").unwrap().to_game(true).unwrap();
    assert_eq!(back.board(), game.board());
    assert_eq!(back.status(), Status::WhiteWonResign);
}

#[test]
fn illegal_game() {
    let text = "[Event \"bad\"]\n\n1. e4 e5 2. Bc4 Bc5 3. Qh5 Nf6 4. Qxf7# Ke7 1-0\n";
    let pgn = Pgn::parse(text, "illegal.pgn").unwrap();
    assert!(matches!(pgn.to_game(true), Err(Error::IllegalMove(_))));
    assert_eq!(pgn.to_game(false), Err(Error::InvalidPgnFormat("illegal.pgn".to_owned())));
}

#[test]
fn several_games() {
    let text = format!("{}\n[Event \"Casual\"]\n\n{}", CARUANA_GODENA, RUY_LOPEZ);
    let games: Vec<Pgn> = read_pgn_games(text.as_bytes(), "both.pgn")
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(games.len(), 2);
    assert_eq!(games[0].moves().last().map(String::as_str), Some("Rd7"));
    assert_eq!(games[1].tag("Event"), Some("Casual"));
    assert_eq!(games[1].moves().last().map(String::as_str), Some("Re6"));
}
