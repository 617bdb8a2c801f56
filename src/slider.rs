//! Occupancy masks and slow ray-cast attacks for sliding pieces.
//!
//! These are the ground-truth functions the magic search hashes. None of them is
//! meant to be fast; they run once per (square, blocker configuration) at
//! generation time.

use crate::bitboard::{sq_to_bb, step};
use crate::types::Slider;

/// Squares whose occupancy can change the slider's attacks from `sq`.
///
/// Each ray is walked from the origin and a square is kept only while the next
/// step in the same direction is still on the board, so the origin and the
/// terminal edge square of every ray are excluded.
pub fn relevance_mask(slider: Slider, sq: u8) -> u64 {
    assert!(sq < 64, "square index {} out of range", sq);
    let mut mask = 0u64;

    for dir in slider.directions() {
        let mut current = sq;
        while let Some(next) = step(current, dir) {
            if step(next, dir).is_none() {
                break;
            }
            mask |= sq_to_bb(next);
            current = next;
        }
    }
    mask
}

/// Attacks of `slider` on `sq` given the full-board `occupied` set.
///
/// Every ray stops at the first occupied square, which is itself included
/// (a potential capture). Bits of `occupied` outside the rays are ignored.
pub fn attack_mask(slider: Slider, sq: u8, occupied: u64) -> u64 {
    assert!(sq < 64, "square index {} out of range", sq);
    let mut attacks = 0u64;

    for dir in slider.directions() {
        let mut current = sq;
        while let Some(next) = step(current, dir) {
            let target = sq_to_bb(next);
            attacks |= target;
            if occupied & target != 0 {
                break;
            }
            current = next;
        }
    }
    attacks
}

/// All subsets of a mask using the Carry-Rippler technique.
///
/// Yields `2^popcount(mask)` distinct bitboards, starting with the empty set.
#[derive(Debug, Clone)]
pub struct BlockerConfigs {
    mask: u64,
    next: u64,
    remaining: usize,
}

impl BlockerConfigs {
    pub fn new(mask: u64) -> Self {
        assert!(
            mask.count_ones() < usize::BITS,
            "mask has too many bits to enumerate"
        );
        BlockerConfigs {
            mask,
            next: 0,
            remaining: 1usize << mask.count_ones(),
        }
    }
}

impl Iterator for BlockerConfigs {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next;
        // Carry-Rippler: next subset
        self.next = self.next.wrapping_sub(self.mask) & self.mask;
        self.remaining -= 1;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for BlockerConfigs {}

/// Spread the low bits of `index` over the set bits of `mask`, lowest first.
pub fn blocker_from_index(mask: u64, index: usize) -> u64 {
    let mut blockers = 0u64;
    let mut remaining = mask;
    let mut bit = 0;
    while remaining != 0 {
        let lowest = remaining & remaining.wrapping_neg();
        if (index >> bit) & 1 == 1 {
            blockers |= lowest;
        }
        remaining ^= lowest;
        bit += 1;
    }
    blockers
}
