use std::path::PathBuf;

use crate::magic::DEFAULT_MAX_ATTEMPTS;

/// Seed the checked-in engine tables were generated with
pub const DEFAULT_SEED: u64 = 42;

/// Settings for one generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Seed of the pseudo-random stream used by the magic search
    pub seed: u64,
    /// Random candidates tried per square before the run fails
    pub max_attempts: u64,
    /// Directory holding `rook.txt` / `bishop.txt` candidate magics
    pub magic_dir: Option<PathBuf>,
    /// Search squares on the rayon pool, one derived stream per square
    pub parallel: bool,
    /// Brute-force check every finished table against ray casting
    pub verify: bool,
    /// Suppress per-square progress output
    pub quiet: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            seed: DEFAULT_SEED,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            magic_dir: None,
            parallel: false,
            verify: false,
            quiet: false,
        }
    }
}

impl GeneratorConfig {
    pub fn new_silent(seed: u64) -> Self {
        GeneratorConfig {
            seed,
            quiet: true,
            ..Default::default()
        }
    }
}
