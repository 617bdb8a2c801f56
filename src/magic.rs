//! Magic number search for sliding piece attack tables.
//!
//! For each square the relevant occupancy is hashed with
//! `((occupied & mask) * magic) >> (64 - bits)` into a table of `2^bits` attack
//! sets. A magic is usable when no two blocker configurations with different
//! attacks land on the same index. Candidates are drawn at random, biased to
//! sparse bit patterns, until one passes.

use rand::RngCore;

use crate::error::{Result, TableGenError};
use crate::slider::{attack_mask, relevance_mask, BlockerConfigs};
use crate::types::Slider;

/// Per-square attempt budget of the random search
pub const DEFAULT_MAX_ATTEMPTS: u64 = 1_000_000;

/// Hash a masked occupancy into an attack table index.
#[inline(always)]
pub fn magic_index(blockers: u64, magic: u64, relevant_bits: u32) -> usize {
    debug_assert!(relevant_bits > 0 && relevant_bits < 64);
    (blockers.wrapping_mul(magic) >> (64 - relevant_bits)) as usize
}

/// Candidate magic with few bits set: the AND of three random words.
#[inline]
pub fn sparse_random<R: RngCore + ?Sized>(rng: &mut R) -> u64 {
    rng.next_u64() & rng.next_u64() & rng.next_u64()
}

/// Where a square's magic came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagicSource {
    /// A supplied candidate that validated without collisions
    Precomputed,
    /// Found by random search after `attempts` candidates. `rejected` holds a
    /// supplied candidate that collided, if there was one.
    Searched { attempts: u64, rejected: Option<u64> },
}

/// Magic hashing data and attack table for one square
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicEntry {
    pub square: u8,
    /// Relevance mask (the blocker mask applied before hashing)
    pub mask: u64,
    pub magic: u64,
    pub relevant_bits: u32,
    /// `2^relevant_bits` attack sets; unreachable slots are zero
    pub attacks: Vec<u64>,
    pub source: MagicSource,
}

impl MagicEntry {
    #[inline(always)]
    pub fn shift(&self) -> u32 {
        64 - self.relevant_bits
    }

    /// Table index for a full-board occupancy
    #[inline(always)]
    pub fn index(&self, occupied: u64) -> usize {
        ((occupied & self.mask).wrapping_mul(self.magic) >> self.shift()) as usize
    }

    /// Attacks for a full-board occupancy using magic lookup
    #[inline(always)]
    pub fn lookup(&self, occupied: u64) -> u64 {
        self.attacks[self.index(occupied)]
    }

    /// Compare the lookup against ray casting for every blocker configuration,
    /// each also with unrelated pieces added outside the mask.
    pub fn verify(&self, slider: Slider) -> Result<()> {
        let outside = !self.mask;
        let noise = [0, outside, outside & 0xAA55_AA55_AA55_AA55, outside & 0x0F0F_F0F0_3C3C_C3C3];

        for blockers in BlockerConfigs::new(self.mask) {
            for extra in noise {
                let occupied = blockers | extra;
                if self.lookup(occupied) != attack_mask(slider, self.square, occupied) {
                    return Err(TableGenError::Verification {
                        slider,
                        square: self.square,
                        occupancy: occupied,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Reference data and scratch table for testing candidates on one square.
///
/// The blocker configurations and their true attacks are computed once. Table
/// slots are stamped with the attempt that wrote them, so the table never has
/// to be cleared between candidates.
pub struct SquareSearch {
    square: u8,
    mask: u64,
    relevant_bits: u32,
    occupancies: Vec<u64>,
    reference: Vec<u64>,
    table: Vec<u64>,
    epoch: Vec<u64>,
    attempt: u64,
}

impl SquareSearch {
    pub fn new(slider: Slider, square: u8) -> Self {
        let mask = relevance_mask(slider, square);
        let relevant_bits = mask.count_ones();
        let occupancies: Vec<u64> = BlockerConfigs::new(mask).collect();
        let reference = occupancies
            .iter()
            .map(|&occ| attack_mask(slider, square, occ))
            .collect();
        let size = 1usize << relevant_bits;

        SquareSearch {
            square,
            mask,
            relevant_bits,
            occupancies,
            reference,
            table: vec![0; size],
            epoch: vec![0; size],
            attempt: 0,
        }
    }

    /// Hash every configuration with `magic`; false on the first true collision.
    /// After a success the scratch table holds that magic's attack table.
    pub fn try_magic(&mut self, magic: u64) -> bool {
        self.attempt += 1;
        for (&occ, &attacks) in self.occupancies.iter().zip(&self.reference) {
            let idx = magic_index(occ, magic, self.relevant_bits);
            if self.epoch[idx] < self.attempt {
                self.epoch[idx] = self.attempt;
                self.table[idx] = attacks;
            } else if self.table[idx] != attacks {
                return false;
            }
        }
        true
    }

    /// Random search with the shared sparse sampling, at most `max_attempts` candidates.
    pub fn search<R: RngCore + ?Sized>(&mut self, rng: &mut R, max_attempts: u64) -> Option<(u64, u64)> {
        for attempt in 1..=max_attempts {
            let magic = sparse_random(rng);
            if self.try_magic(magic) {
                return Some((magic, attempt));
            }
        }
        None
    }

    /// Package the table of the last successful `try_magic` call.
    fn into_entry(mut self, magic: u64, source: MagicSource) -> MagicEntry {
        for (slot, &stamp) in self.table.iter_mut().zip(&self.epoch) {
            if stamp != self.attempt {
                *slot = 0;
            }
        }
        MagicEntry {
            square: self.square,
            mask: self.mask,
            magic,
            relevant_bits: self.relevant_bits,
            attacks: self.table,
            source,
        }
    }
}

/// Check a single magic for a square, returning its table if it has no collisions.
pub fn validate_magic(slider: Slider, square: u8, magic: u64) -> Option<MagicEntry> {
    let mut search = SquareSearch::new(slider, square);
    if search.try_magic(magic) {
        Some(search.into_entry(magic, MagicSource::Precomputed))
    } else {
        None
    }
}

/// Find a collision-free magic and its attack table for one square.
///
/// A supplied `candidate` is tried first and accepted as is when it validates.
/// Otherwise up to `max_attempts` sparse random candidates are drawn from `rng`.
pub fn find_magic<R: RngCore + ?Sized>(
    slider: Slider,
    square: u8,
    rng: &mut R,
    candidate: Option<u64>,
    max_attempts: u64,
) -> Result<MagicEntry> {
    assert!(square < 64, "square index {} out of range", square);
    let mut search = SquareSearch::new(slider, square);

    if let Some(magic) = candidate {
        if search.try_magic(magic) {
            return Ok(search.into_entry(magic, MagicSource::Precomputed));
        }
    }

    match search.search(rng, max_attempts) {
        Some((magic, attempts)) => {
            let source = MagicSource::Searched {
                attempts,
                rejected: candidate,
            };
            Ok(search.into_entry(magic, source))
        }
        None => Err(TableGenError::SearchExhausted {
            slider,
            square,
            attempts: max_attempts,
        }),
    }
}
