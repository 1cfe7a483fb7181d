//! Plays whole positions and games through the public interface
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use chess_rules::chess::{movegen, Board, Error, GameState, Status};

fn game(fen: &str) -> GameState {
    GameState::from_fen(fen).unwrap()
}

mod fen {
    use super::*;

    #[test]
    fn sicilian_loads_and_writes_back() {
        let fen = "rnbqkbnr/pp1ppppp/8/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2";
        assert_eq!(Board::from_fen(fen).unwrap().to_fen(), fen);
    }

    #[test]
    fn double_step_sets_en_passant_target() {
        let mut g = GameState::new();
        g.play("e4").unwrap();
        assert_eq!(g.board().to_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
    }

    #[test]
    fn capturing_a_rook_takes_its_castling_right() {
        let mut g = game("2b1kbnr/rpq1pp1p/2n3p1/8/3Q4/2P5/PP3PPP/RN2KBNR w KQk - 0 9");
        assert_eq!(g.play("Qh8").unwrap(), "Qxh8");
        assert_eq!(g.board().to_fen(), "2b1kbnQ/rpq1pp1p/2n3p1/8/8/2P5/PP3PPP/RN2KBNR b KQ - 0 9");
    }

    #[test]
    fn every_position_of_a_game_writes_back() {
        let g = GameState::with_moves(&["d4", "e5", "dxe5", "f5", "exf6", "Nc6", "fxg7", "Bd6", "gxh8=N"])
            .unwrap();
        for board in g.positions() {
            let fen = board.to_fen();
            assert_eq!(Board::from_fen(&fen).unwrap().to_fen(), fen);
        }
    }
}

mod legality {
    use super::*;

    #[test]
    fn no_legal_move_leaves_the_king_attacked() {
        let mut board = Board::new();
        for ply in 0..120 {
            let moves = movegen::legal_moves(&board);
            if moves.is_empty() {
                break;
            }
            for mv in &moves {
                let next = board.apply_move(mv);
                let king = next.king_location(board.turn()).unwrap();
                assert!(!next.is_square_attacked(king, next.turn()), "{} after {}", mv, board.to_fen());
            }
            board = board.apply_move(&moves[(ply * 7) % moves.len()]);
        }
    }

    #[test]
    fn castling_through_an_attacked_square() {
        let mut g = game("4kr2/8/8/8/8/8/8/4K2R w K - 0 1");
        assert!(matches!(g.play("O-O"), Err(Error::IllegalMove(_))));

        let mut g = game("4k3/8/8/8/8/8/8/4K2R w K - 0 1");
        assert_eq!(g.play("O-O").unwrap(), "O-O");
        assert_eq!(g.board().to_fen(), "4k3/8/8/8/8/8/8/5RK1 b - - 1 1");
    }

    #[test]
    fn coordinates_never_castle() {
        let mut g = game("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert!(matches!(g.play("e1g1"), Err(Error::IllegalMove(_))));
        assert!(matches!(g.play("e1c1"), Err(Error::IllegalMove(_))));
        assert_eq!(g.play("0-0-0").unwrap(), "O-O-O");
        assert_eq!(g.play("O-O").unwrap(), "O-O");
    }

    // github issue 31: a queen moving from e8 to a8 is just a queen move
    #[test]
    fn queen_on_a_kings_square() {
        let mut g = game("4Q3/8/8/8/8/8/4K3/7k w - - 0 1");
        assert_eq!(g.status(), Status::InProgress);
        assert_eq!(g.play("e8a8").unwrap(), "Qa8+");
        assert_eq!(g.board().to_fen(), "Q7/8/8/8/8/8/4K3/7k b - - 1 1");
    }

    #[test]
    fn coordinate_promotion() {
        let mut g = game("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(g.play("b7b8q").unwrap(), "b8=Q+");
    }
}

mod termination {
    use super::*;

    #[test]
    fn scholars_mate() {
        let mut g = GameState::with_moves(&["e4", "e5", "Bc4", "Nc6", "Qh5", "Nf6", "Qxf7#"]).unwrap();
        assert_eq!(g.status(), Status::WhiteWon);
        assert_eq!(g.result_token(), "1-0");
        assert!(matches!(g.play("Ke7"), Err(Error::IllegalMove(_))));
        assert_eq!(g.len(), 7);
    }

    #[test]
    fn stalemate() {
        let mut g = game("7k/8/6K1/8/8/8/8/5Q2 w - - 0 1");
        g.play("Qf7").unwrap();
        assert_eq!(g.status(), Status::Stalemate);
        assert_eq!(g.result_token(), "1/2-1/2");
    }

    #[test]
    fn king_and_bishop_against_king() {
        assert_eq!(game("8/8/8/4k3/8/8/8/4KB2 w - - 0 1").status(), Status::InsufficientMaterial);

        let mut g = game("4k3/8/8/8/8/8/3r4/4KB2 w - - 0 1");
        assert_eq!(g.status(), Status::InProgress);
        g.play("Kxd2").unwrap();
        assert_eq!(g.status(), Status::InsufficientMaterial);
    }

    #[test]
    fn repetition_is_only_claimed() {
        let mut g = GameState::with_moves(&["Nf3", "Nf6", "Ng1", "Ng8", "Nf3", "Nf6", "Ng1", "Ng8"])
            .unwrap();
        assert!(g.threefold_repetition());
        assert_eq!(g.status(), Status::InProgress);

        g.draw().unwrap();
        assert_eq!(g.status(), Status::ThreefoldRepetition);
        assert!(matches!(g.draw(), Err(Error::GameOver(Status::ThreefoldRepetition))));
    }

    #[test]
    fn fifty_moves_are_only_claimed() {
        let mut g = game("4k3/8/8/8/8/8/8/R3K3 w - - 99 60");
        assert!(!g.fifty_move_rule());
        g.play("Ra2").unwrap();
        assert!(g.fifty_move_rule());
        assert!(!g.is_over());

        g.draw().unwrap();
        assert_eq!(g.status(), Status::FiftyMoveRule);
    }

    #[test]
    fn exactly_one_status() {
        let g = GameState::with_moves(&["f3", "e5", "g4", "Qh4#"]).unwrap();
        assert_eq!(g.status(), Status::BlackWon);
        assert!(g.board().in_check());
        assert!(movegen::legal_moves(g.board()).is_empty());
        assert!(!g.board().insufficient_material());
    }
}
