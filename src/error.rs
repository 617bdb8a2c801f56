//! Errors raised while generating or writing the tables.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Slider;

#[derive(Debug, Error)]
pub enum TableGenError {
    /// The random search ran out of attempts. The whole run is unusable.
    #[error("exceeded {attempts} attempts while generating magic number for {slider} square {square}")]
    SearchExhausted {
        slider: Slider,
        square: u8,
        attempts: u64,
    },

    #[error("invalid magic file {}: {reason}", .path.display())]
    MagicFile { path: PathBuf, reason: String },

    /// A finished table disagrees with the ray-cast attacks.
    #[error("{slider} table for square {square} gives wrong attacks for occupancy {occupancy:#018x}")]
    Verification {
        slider: Slider,
        square: u8,
        occupancy: u64,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TableGenError>;
