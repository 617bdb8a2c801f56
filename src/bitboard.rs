//! Bitboard primitives and the fixed-offset (leaper) attack tables.
//!
//! A bitboard is a 64-bit integer where each bit represents a square on the chess board.
//! Square indexing: a1 = 0, b1 = 1, ..., h1 = 7, a2 = 8, ..., h8 = 63
//! This corresponds to: square_index = rank * 8 + file where rank/file are 0-indexed.

use crate::types::Direction;

/// Convert a 0-indexed (rank, file) pair to a square index (0-63)
#[inline(always)]
pub const fn sq_from(rank: u8, file: u8) -> u8 {
    rank * 8 + file
}

/// Convert a square index to a bitboard with that single bit set
#[inline(always)]
pub const fn sq_to_bb(sq: u8) -> u64 {
    1u64 << sq
}

/// Get the rank (0-7) from a square index
#[inline(always)]
pub const fn sq_rank(sq: u8) -> u8 {
    sq >> 3
}

/// Get the file (0-7) from a square index
#[inline(always)]
pub const fn sq_file(sq: u8) -> u8 {
    sq & 7
}

#[inline(always)]
pub const fn on_board(rank: i8, file: i8) -> bool {
    rank >= 0 && rank < 8 && file >= 0 && file < 8
}

/// Step one square from `sq` in `dir`, or None when that leaves the board
#[inline]
pub const fn step(sq: u8, dir: Direction) -> Option<u8> {
    let rank = sq_rank(sq) as i8 + dir.0;
    let file = sq_file(sq) as i8 + dir.1;
    if on_board(rank, file) {
        Some(sq_from(rank as u8, file as u8))
    } else {
        None
    }
}

/// Parse algebraic notation ("e4") into a square index
pub fn sq_from_algebraic(s: &str) -> Option<u8> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let file = bytes[0].to_ascii_lowercase().wrapping_sub(b'a');
    let rank = bytes[1].wrapping_sub(b'1');
    if file < 8 && rank < 8 {
        Some(sq_from(rank, file))
    } else {
        None
    }
}

pub fn sq_to_algebraic(sq: u8) -> String {
    assert!(sq < 64, "square index {} out of range", sq);
    format!("{}{}", (b'a' + sq_file(sq)) as char, sq_rank(sq) + 1)
}

/// Iterate over set bits in a bitboard, returning square indices
pub struct BitboardIter(pub u64);

impl Iterator for BitboardIter {
    type Item = u8;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            None
        } else {
            let sq = self.0.trailing_zeros() as u8;
            self.0 &= self.0 - 1; // Clear the lowest set bit
            Some(sq)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for BitboardIter {}

/// Render a bitboard as an 8x8 grid, rank 8 at the top.
pub fn bitboard_to_string(bb: u64) -> String {
    let mut out = String::with_capacity(8 * 18);
    for rank in (0..8u8).rev() {
        out.push((b'1' + rank) as char);
        out.push(' ');
        for file in 0..8u8 {
            let set = bb & sq_to_bb(sq_from(rank, file)) != 0;
            out.push(if set { 'x' } else { '.' });
            if file < 7 {
                out.push(' ');
            }
        }
        out.push('\n');
    }
    out.push_str("  a b c d e f g h\n");
    out
}

/// Knight move deltas: (rank_delta, file_delta)
const KNIGHT_DELTAS: [Direction; 8] = [
    (2, 1), (1, 2), (-1, 2), (-2, 1),
    (-2, -1), (-1, -2), (1, -2), (2, -1),
];

/// King move deltas
const KING_DELTAS: [Direction; 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

/// Precomputed attack tables for the non-sliding pieces
pub struct LeaperTables {
    /// Knight attacks for each square
    pub knight: [u64; 64],
    /// King attacks for each square
    pub king: [u64; 64],
}

impl LeaperTables {
    /// Initialize the leaper tables at compile time
    pub const fn new() -> Self {
        LeaperTables {
            knight: offset_table(&KNIGHT_DELTAS),
            king: offset_table(&KING_DELTAS),
        }
    }
}

impl Default for LeaperTables {
    fn default() -> Self {
        Self::new()
    }
}

const fn offset_table(deltas: &[Direction; 8]) -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq: u8 = 0;
    while sq < 64 {
        let mut i = 0;
        while i < 8 {
            if let Some(target_sq) = step(sq, deltas[i]) {
                table[sq as usize] |= 1u64 << target_sq;
            }
            i += 1;
        }
        sq += 1;
    }
    table
}

/// Global precomputed leaper tables
pub static LEAPER_TABLES: LeaperTables = LeaperTables::new();
