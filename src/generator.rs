//! Runs the magic search over the whole board for both sliders and gathers
//! every table the artifact needs.

use std::time::{Duration, Instant};

use chrono::Local;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

use crate::between::squares_between_table;
use crate::bitboard::{sq_to_algebraic, LEAPER_TABLES};
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::magic::{find_magic, MagicEntry, MagicSource};
use crate::magic_file::PrecomputedMagics;
use crate::types::Slider;

/// Magic entries for the 64 squares of one slider
#[derive(Debug, Clone)]
pub struct SliderTables {
    pub slider: Slider,
    pub entries: Vec<MagicEntry>,
    pub elapsed: Duration,
}

/// Summary of how the magics of one slider were obtained
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    pub precomputed: usize,
    pub searched: usize,
    pub rejected_candidates: usize,
    pub total_attempts: u64,
    pub max_attempts: u64,
}

impl SliderTables {
    pub fn magics(&self) -> [u64; 64] {
        std::array::from_fn(|sq| self.entries[sq].magic)
    }

    pub fn masks(&self) -> [u64; 64] {
        std::array::from_fn(|sq| self.entries[sq].mask)
    }

    pub fn relevant_bits(&self) -> [u32; 64] {
        std::array::from_fn(|sq| self.entries[sq].relevant_bits)
    }

    /// Attack table of `sq` zero-padded to the slider's fixed capacity
    pub fn padded_table(&self, sq: u8) -> Vec<u64> {
        let mut table = self.entries[sq as usize].attacks.clone();
        let capacity = self.slider.table_capacity();
        assert!(table.len() <= capacity, "attack table wider than {}", capacity);
        table.resize(capacity, 0);
        table
    }

    #[inline]
    pub fn attacks(&self, sq: u8, occupied: u64) -> u64 {
        self.entries[sq as usize].lookup(occupied)
    }

    pub fn verify(&self) -> Result<()> {
        self.entries.iter().try_for_each(|e| e.verify(self.slider))
    }

    pub fn stats(&self) -> SearchStats {
        let mut stats = SearchStats::default();
        for entry in &self.entries {
            match entry.source {
                MagicSource::Precomputed => stats.precomputed += 1,
                MagicSource::Searched { attempts, rejected } => {
                    stats.searched += 1;
                    stats.total_attempts += attempts;
                    stats.max_attempts = stats.max_attempts.max(attempts);
                    if rejected.is_some() {
                        stats.rejected_candidates += 1;
                    }
                }
            }
        }
        stats
    }
}

/// Everything written to the output artifact
#[derive(Debug, Clone)]
pub struct GeneratedTables {
    pub rook: SliderTables,
    pub bishop: SliderTables,
    pub knight: [u64; 64],
    pub king: [u64; 64],
    pub squares_between: &'static [[u64; 64]; 64],
}

impl GeneratedTables {
    pub fn slider(&self, slider: Slider) -> &SliderTables {
        match slider {
            Slider::Rook => &self.rook,
            Slider::Bishop => &self.bishop,
        }
    }

    #[inline]
    pub fn rook_attacks(&self, sq: u8, occupied: u64) -> u64 {
        self.rook.attacks(sq, occupied)
    }

    #[inline]
    pub fn bishop_attacks(&self, sq: u8, occupied: u64) -> u64 {
        self.bishop.attacks(sq, occupied)
    }

    #[inline]
    pub fn queen_attacks(&self, sq: u8, occupied: u64) -> u64 {
        self.rook_attacks(sq, occupied) | self.bishop_attacks(sq, occupied)
    }
}

/// Generate all tables, reading candidate magics from `config.magic_dir` if set.
pub fn generate(config: &GeneratorConfig) -> Result<GeneratedTables> {
    let (rook_magics, bishop_magics) = match &config.magic_dir {
        Some(dir) => (
            PrecomputedMagics::load_dir(dir, Slider::Rook)?,
            PrecomputedMagics::load_dir(dir, Slider::Bishop)?,
        ),
        None => (None, None),
    };
    if !config.quiet {
        for (slider, magics) in [(Slider::Rook, &rook_magics), (Slider::Bishop, &bishop_magics)] {
            if magics.is_some() {
                println!("Using precomputed {} magics as candidates", slider);
            }
        }
    }
    generate_with(config, rook_magics.as_ref(), bishop_magics.as_ref())
}

/// Generate all tables with explicitly injected candidate magics.
///
/// Sequential runs draw every candidate from one stream seeded with
/// `config.seed`, rooks first. Parallel runs first derive one seed per
/// (slider, square) from that stream, so the result does not depend on
/// scheduling, but differs from the sequential result for the same seed.
pub fn generate_with(
    config: &GeneratorConfig,
    rook_magics: Option<&PrecomputedMagics>,
    bishop_magics: Option<&PrecomputedMagics>,
) -> Result<GeneratedTables> {
    let started = Local::now();
    let start = Instant::now();
    if !config.quiet {
        println!(
            "Generating magic tables at {} (seed {}, {})",
            started.format("%Y-%m-%d %H:%M:%S"),
            config.seed,
            if config.parallel { "parallel" } else { "sequential" }
        );
    }

    let (rook, bishop) = if config.parallel {
        let (rook_seeds, bishop_seeds) = square_seeds(config.seed);
        (
            generate_slider_parallel(Slider::Rook, &rook_seeds, rook_magics, config)?,
            generate_slider_parallel(Slider::Bishop, &bishop_seeds, bishop_magics, config)?,
        )
    } else {
        let mut rng = StdRng::seed_from_u64(config.seed);
        (
            generate_slider(Slider::Rook, &mut rng, rook_magics, config)?,
            generate_slider(Slider::Bishop, &mut rng, bishop_magics, config)?,
        )
    };

    if config.verify {
        if config.parallel {
            rook.entries.par_iter().try_for_each(|e| e.verify(Slider::Rook))?;
            bishop.entries.par_iter().try_for_each(|e| e.verify(Slider::Bishop))?;
        } else {
            rook.verify()?;
            bishop.verify()?;
        }
        if !config.quiet {
            println!("Verified all {} and {} tables against ray casting", Slider::Rook, Slider::Bishop);
        }
    }

    let tables = GeneratedTables {
        rook,
        bishop,
        knight: LEAPER_TABLES.knight,
        king: LEAPER_TABLES.king,
        squares_between: squares_between_table(),
    };

    if !config.quiet {
        for slider in Slider::ALL {
            log_summary(tables.slider(slider));
        }
        println!("Finished in {:.3} seconds.", start.elapsed().as_secs_f64());
    }
    Ok(tables)
}

/// Per-square seeds of a parallel run: 64 rook seeds, then 64 bishop seeds,
/// drawn from the stream seeded with `seed`.
pub fn square_seeds(seed: u64) -> ([u64; 64], [u64; 64]) {
    let mut rng = StdRng::seed_from_u64(seed);
    let rook: [u64; 64] = std::array::from_fn(|_| rng.next_u64());
    let bishop: [u64; 64] = std::array::from_fn(|_| rng.next_u64());
    (rook, bishop)
}

/// Search all squares of one slider on a single shared stream.
pub fn generate_slider<R: RngCore + ?Sized>(
    slider: Slider,
    rng: &mut R,
    precomputed: Option<&PrecomputedMagics>,
    config: &GeneratorConfig,
) -> Result<SliderTables> {
    let start = Instant::now();
    let mut entries = Vec::with_capacity(64);
    for sq in 0..64u8 {
        let square_start = Instant::now();
        let entry = find_magic(slider, sq, rng, precomputed.map(|m| m.get(sq)), config.max_attempts)?;
        log_square(slider, &entry, square_start.elapsed(), config.quiet);
        entries.push(entry);
    }
    Ok(SliderTables {
        slider,
        entries,
        elapsed: start.elapsed(),
    })
}

/// Search all squares of one slider on the rayon pool, square `sq` using its own
/// stream seeded with `seeds[sq]`.
pub fn generate_slider_parallel(
    slider: Slider,
    seeds: &[u64; 64],
    precomputed: Option<&PrecomputedMagics>,
    config: &GeneratorConfig,
) -> Result<SliderTables> {
    let start = Instant::now();
    let entries = (0..64u8)
        .into_par_iter()
        .map(|sq| {
            let square_start = Instant::now();
            let mut rng = StdRng::seed_from_u64(seeds[sq as usize]);
            let entry = find_magic(slider, sq, &mut rng, precomputed.map(|m| m.get(sq)), config.max_attempts)?;
            log_square(slider, &entry, square_start.elapsed(), config.quiet);
            Ok(entry)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(SliderTables {
        slider,
        entries,
        elapsed: start.elapsed(),
    })
}

fn log_square(slider: Slider, entry: &MagicEntry, elapsed: Duration, quiet: bool) {
    if let MagicSource::Searched { rejected: Some(magic), .. } = entry.source {
        eprintln!(
            "Precomputed magic 0x{:016X} failed for {} square {}, searched instead",
            magic, slider, entry.square
        );
    }
    if quiet {
        return;
    }
    let how = match entry.source {
        MagicSource::Precomputed => "precomputed".to_string(),
        MagicSource::Searched { attempts, .. } => format!("{} attempts", attempts),
    };
    println!(
        "{} {} ({:2}): 0x{:016X}, {:2} bits, {} ({:.3}s)",
        slider,
        sq_to_algebraic(entry.square),
        entry.square,
        entry.magic,
        entry.relevant_bits,
        how,
        elapsed.as_secs_f64()
    );
}

fn log_summary(tables: &SliderTables) {
    let stats = tables.stats();
    println!(
        "{}: {} precomputed, {} searched ({} total attempts, worst square {}), {:.3}s",
        tables.slider,
        stats.precomputed,
        stats.searched,
        stats.total_attempts,
        stats.max_attempts,
        tables.elapsed.as_secs_f64()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::magic::validate_magic;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_generate_slider_sequential() {
        let config = GeneratorConfig::new_silent(5);
        let mut rng = StdRng::seed_from_u64(config.seed);
        let tables = generate_slider(Slider::Bishop, &mut rng, None, &config).unwrap();
        assert_eq!(tables.entries.len(), 64);
        for (sq, entry) in tables.entries.iter().enumerate() {
            assert_eq!(entry.square as usize, sq);
        }
        tables.verify().unwrap();
        let stats = tables.stats();
        assert_eq!(stats.searched, 64);
        assert_eq!(stats.precomputed, 0);
    }

    #[test]
    fn test_precomputed_magics_are_reused() {
        let config = GeneratorConfig::new_silent(11);
        let mut rng = StdRng::seed_from_u64(config.seed);
        let first = generate_slider(Slider::Bishop, &mut rng, None, &config).unwrap();

        let candidates = PrecomputedMagics::new(first.magics());
        let mut other_rng = StdRng::seed_from_u64(12345);
        let second = generate_slider(Slider::Bishop, &mut other_rng, Some(&candidates), &config).unwrap();

        assert_eq!(second.magics(), first.magics());
        assert_eq!(second.stats().precomputed, 64);
    }

    #[test]
    fn test_one_bad_candidate_only_affects_its_square() {
        let config = GeneratorConfig::new_silent(3);
        let mut rng = StdRng::seed_from_u64(config.seed);
        let good = generate_slider(Slider::Bishop, &mut rng, None, &config).unwrap();

        let mut magics = good.magics();
        magics[20] = 0;
        let candidates = PrecomputedMagics::new(magics);
        let mut rng = StdRng::seed_from_u64(99);
        let mixed = generate_slider(Slider::Bishop, &mut rng, Some(&candidates), &config).unwrap();

        let stats = mixed.stats();
        assert_eq!(stats.precomputed, 63);
        assert_eq!(stats.searched, 1);
        assert_eq!(stats.rejected_candidates, 1);
        assert!(validate_magic(Slider::Bishop, 20, mixed.entries[20].magic).is_some());
    }

    #[test]
    fn test_parallel_is_deterministic() {
        let seeds: [u64; 64] = std::array::from_fn(|i| 1000 + i as u64);
        let config = GeneratorConfig::new_silent(0);
        let a = generate_slider_parallel(Slider::Bishop, &seeds, None, &config).unwrap();
        let b = generate_slider_parallel(Slider::Bishop, &seeds, None, &config).unwrap();
        assert_eq!(a.magics(), b.magics());
        for sq in [0u8, 27, 63] {
            let mut rng = StdRng::seed_from_u64(seeds[sq as usize]);
            let single = find_magic(Slider::Bishop, sq, &mut rng, None, config.max_attempts).unwrap();
            assert_eq!(single.magic, a.entries[sq as usize].magic);
        }
    }

    #[test]
    fn test_square_seeds_drive_parallel_run() {
        let (rook_seeds, bishop_seeds) = square_seeds(17);
        assert_eq!(square_seeds(17), (rook_seeds, bishop_seeds));
        assert_ne!(rook_seeds, bishop_seeds);

        let config = GeneratorConfig {
            parallel: true,
            ..GeneratorConfig::new_silent(17)
        };
        let full = generate_with(&config, None, None).unwrap();
        let bishop = generate_slider_parallel(Slider::Bishop, &bishop_seeds, None, &config).unwrap();
        assert_eq!(full.bishop.magics(), bishop.magics());
        let rook = generate_slider_parallel(Slider::Rook, &rook_seeds, None, &config).unwrap();
        assert_eq!(full.rook.magics(), rook.magics());
    }

    #[test]
    fn test_padded_table_width() {
        let config = GeneratorConfig::new_silent(8);
        let mut rng = StdRng::seed_from_u64(config.seed);
        let tables = generate_slider(Slider::Bishop, &mut rng, None, &config).unwrap();
        let padded = tables.padded_table(27);
        assert_eq!(padded.len(), 8192);
        assert!(padded[512..].iter().all(|&a| a == 0));
        assert_eq!(&padded[..512], tables.entries[27].attacks.as_slice());
    }
}
