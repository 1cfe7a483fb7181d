//! Pseudo-legal and legal move generation
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use super::*;
use bitboard::*;

use Piece::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Returns every move the side to move could make if check were ignored. Castling is included
/// when the right is held and the squares between king and rook are empty, but attacks on the
/// king's path are not considered.
pub fn pseudo_legal_moves(board: &Board) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);

    for from in board.occupied_by(board.turn()) {
        piece_moves(board, from, &mut moves);
    }
    castling_moves(board, &mut moves);

    moves
}

/// Returns every legal move for the side to move.
pub fn legal_moves(board: &Board) -> Vec<Move> {
    pseudo_legal_moves(board)
        .into_iter()
        .filter(|mv| is_legal(board, mv))
        .collect()
}

/// Returns the legal moves of the piece on `from`, which must belong to the side to move.
pub fn legal_moves_from(board: &Board, from: Square) -> Vec<Move> {
    let mut moves = Vec::new();

    if let Some((color, piece)) = board.piece_at(from) {
        if color == board.turn() {
            piece_moves(board, from, &mut moves);
            if piece == King {
                castling_moves(board, &mut moves);
            }
        }
    }
    moves.retain(|mv| is_legal(board, mv));

    moves
}

/// Returns the legal moves of the piece on `from` as SAN tokens, in generation order.
pub fn generate_moves(board: &Board, from: Square) -> Vec<String> {
    legal_moves_from(board, from)
        .iter()
        .map(|mv| notation::to_san(board, mv))
        .collect()
}

/// Returns all legal moves for the side to move as SAN tokens, sorted.
pub fn generate_all_moves(board: &Board) -> Vec<String> {
    let mut moves: Vec<_> = legal_moves(board)
        .iter()
        .map(|mv| notation::to_san(board, mv))
        .collect();
    moves.sort();

    moves
}

/// Counts the leaf nodes of the legal move tree `depth` plies deep.
pub fn perft(board: &Board, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves(board);
    if depth == 1 {
        moves.len() as u64
    } else {
        moves.iter().map(|mv| perft(&board.apply_move(mv), depth - 1)).sum()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A move is legal if it does not leave the mover's king attacked. A castling king also may not
/// start in check or cross an attacked square.
fn is_legal(board: &Board, mv: &Move) -> bool {
    let color = board.turn();

    if mv.is_castle() {
        let step = if mv.is_castle_king_side() { 1 } else { -1 };
        let crossed = match mv.from().offset(step, 0) {
            Some(sq) => sq,
            None => return false,
        };
        if board.in_check() || board.is_square_attacked(crossed, !color) {
            return false;
        }
    }

    let after = board.apply_move(mv);
    match after.king_location(color) {
        Some(king) => !after.is_square_attacked(king, !color),
        None => false,
    }
}

fn piece_moves(board: &Board, from: Square, moves: &mut Vec<Move>) {
    let (color, piece) = match board.piece_at(from) {
        Some(p) => p,
        None => return,
    };

    if piece == Pawn {
        return pawn_moves(board, color, from, moves);
    }

    let own = board.occupied_by(color);
    let targets = attacks(color, piece, from, board.occupied()) & !own;
    for to in targets {
        if board.piece_at(to).is_some() {
            moves.push(Move::capture(from, to));
        } else {
            moves.push(Move::quiet(from, to));
        }
    }
}

fn pawn_moves(board: &Board, color: Color, from: Square, moves: &mut Vec<Move>) {
    let forward = color.forward();
    let push = |mv: Move, moves: &mut Vec<Move>| {
        if mv.to().rank() == color.promotion_rank() {
            for &piece in Piece::PROMOTIONS.iter() {
                moves.push(mv.promote(piece));
            }
        } else {
            moves.push(mv);
        }
    };

    // pushes
    if let Some(one) = from.offset(0, forward) {
        if board.piece_at(one).is_none() {
            push(Move::quiet(from, one), moves);

            if from.rank() == color.pawn_rank() {
                if let Some(two) = one.offset(0, forward) {
                    if board.piece_at(two).is_none() {
                        moves.push(Move::quiet(from, two));
                    }
                }
            }
        }
    }

    // captures
    for to in pawn_attacks(color, from) {
        match board.piece_at(to) {
            Some((c, _)) if c != color => push(Move::capture(from, to), moves),
            None if board.en_passant() == Some(to) => moves.push(Move::en_passant(from, to)),
            _ => {},
        }
    }
}

fn castling_moves(board: &Board, moves: &mut Vec<Move>) {
    let color = board.turn();
    let rank = color.back_rank();
    let king = Square::from_coord(File::E, rank);

    if board.piece_at(king) != Some((color, King)) {
        return;
    }

    let clear = |files: &[File]| {
        files.iter().all(|&f| board.piece_at(Square::from_coord(f, rank)).is_none())
    };
    let rook_on = |file| board.piece_at(Square::from_coord(file, rank)) == Some((color, Rook));

    if board.can_castle_king_side(color) && rook_on(File::H) && clear(&[File::F, File::G]) {
        moves.push(Move::castle(king, Square::from_coord(File::G, rank), true));
    }
    if board.can_castle_queen_side(color) && rook_on(File::A)
        && clear(&[File::B, File::C, File::D]) {
        moves.push(Move::castle(king, Square::from_coord(File::C, rank), false));
    }
}
