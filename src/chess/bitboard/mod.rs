//! Provides a set-of-squares representation and the attack patterns of each piece
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::iter::{FromIterator, FusedIterator};
use std::ops;
use std::fmt;
use super::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A set of squares with each bit representing one square
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Bitboard(u64);

impl Bitboard {
    /// Creates a new, empty bitboard
    pub fn new() -> Bitboard {
        Default::default()
    }

    /// Returns the number of squares in the bitboard
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns `true` if the bitboard is empty
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the bitboard contains `sq`
    pub fn contains(self, sq: Square) -> bool {
        self.intersects(sq.into())
    }

    /// Returns `true` if `self` intersects `other`
    pub fn intersects(self, other: Bitboard) -> bool {
        !(self & other).is_empty()
    }

    /// Adds a square to the bitboard if it is not already present
    pub fn insert(&mut self, sq: Square) {
        *self |= sq.into();
    }

    /// Removes a square from the bitboard if it is present
    pub fn remove(&mut self, sq: Square) {
        *self &= !Bitboard::from(sq);
    }

    /// Removes the lowest-numbered square from the bitboard and returns it
    pub fn pop(&mut self) -> Option<Square> {
        let sq = Square::from_index(self.0.trailing_zeros() as usize)?;
        self.0 &= self.0 - 1;

        Some(sq)
    }
}

impl ops::Not for Bitboard {
    type Output = Self;

    fn not(self) -> Self::Output {
        Bitboard(!self.0)
    }
}

impl ops::BitAnd for Bitboard {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 & rhs.0)
    }
}

impl ops::BitAndAssign for Bitboard {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0
    }
}

impl ops::BitOr for Bitboard {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 | rhs.0)
    }
}

impl ops::BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

impl fmt::LowerHex for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Square> for Bitboard {
    fn from(sq: Square) -> Bitboard {
        Bitboard(1 << sq.index())
    }
}

impl From<Rank> for Bitboard {
    fn from(r: Rank) -> Bitboard {
        Bitboard(0x0101_0101_0101_0101 << r as u64)
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item=Square>>(iter: I) -> Self {
        let mut bd = Bitboard::new();
        for sq in iter {
            bd.insert(sq);
        }

        bd
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self)
    }
}

/// Iterator over the squares of a `Bitboard`, lowest index first
#[derive(Debug, Copy, Clone)]
pub struct IntoIter(Bitboard);

impl Iterator for IntoIter {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len(), Some(self.0.len()))
    }
}

impl ExactSizeIterator for IntoIter { }
impl FusedIterator for IntoIter { }

////////////////////////////////////////////////////////////////////////////////////////////////////
const KNIGHT_STEPS: [(i8, i8); 8] = [(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)];
const KING_STEPS: [(i8, i8); 8] = [(0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (-1, 1)];

/// Rook directions as (file, rank) steps
pub const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
/// Bishop directions as (file, rank) steps
pub const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

fn steps(sq: Square, offsets: &[(i8, i8)]) -> Bitboard {
    offsets.iter().filter_map(|&(f, r)| sq.offset(f, r)).collect()
}

fn rays(sq: Square, directions: &[(i8, i8)], occupied: Bitboard) -> Bitboard {
    let mut attacks = Bitboard::new();

    for &(f, r) in directions {
        let mut next = sq.offset(f, r);
        while let Some(to) = next {
            attacks.insert(to);
            if occupied.contains(to) {
                break;
            }
            next = to.offset(f, r);
        }
    }

    attacks
}

/// Squares a knight on `sq` attacks
pub fn knight_attacks(sq: Square) -> Bitboard {
    steps(sq, &KNIGHT_STEPS)
}

/// Squares a king on `sq` attacks
pub fn king_attacks(sq: Square) -> Bitboard {
    steps(sq, &KING_STEPS)
}

/// Squares a pawn of `color` on `sq` attacks (its capture squares, not its pushes)
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    let forward = color.forward();
    steps(sq, &[(-1, forward), (1, forward)])
}

/// Squares a bishop on `sq` attacks, stopping at (and including) the first occupied square in
/// each direction
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rays(sq, &DIAGONAL, occupied)
}

/// Squares a rook on `sq` attacks
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rays(sq, &ORTHOGONAL, occupied)
}

/// Squares a queen on `sq` attacks
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

/// Squares a piece of the given kind and color on `sq` attacks
pub fn attacks(color: Color, piece: Piece, sq: Square, occupied: Bitboard) -> Bitboard {
    match piece {
        Piece::Pawn => pawn_attacks(color, sq),
        Piece::Knight => knight_attacks(sq),
        Piece::Bishop => bishop_attacks(sq, occupied),
        Piece::Rook => rook_attacks(sq, occupied),
        Piece::Queen => queen_attacks(sq, occupied),
        Piece::King => king_attacks(sq),
    }
}
