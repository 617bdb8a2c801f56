//! Per-piece files of precomputed magics: 64 hexadecimal numbers, one per line,
//! in square order. Named `rook.txt` and `bishop.txt` inside a magic directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::error::{Result, TableGenError};
use crate::magic::MagicEntry;
use crate::types::Slider;

/// Candidate magics for the 64 squares of one piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecomputedMagics {
    magics: [u64; 64],
}

impl PrecomputedMagics {
    pub fn new(magics: [u64; 64]) -> Self {
        PrecomputedMagics { magics }
    }

    pub fn path_for(dir: &Path, slider: Slider) -> PathBuf {
        dir.join(format!("{}.txt", slider.name()))
    }

    /// Parse the file contents. `path` is only used in error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let invalid = |reason: String| TableGenError::MagicFile {
            path: path.to_path_buf(),
            reason,
        };

        let mut magics = [0u64; 64];
        let mut count = 0;
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if count == 64 {
                return Err(invalid(format!("more than 64 magics (line {})", line_no + 1)));
            }
            let digits = line
                .strip_prefix("0x")
                .or_else(|| line.strip_prefix("0X"))
                .unwrap_or(line);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid(format!("line {}: `{}` is not a hex number", line_no + 1, line)));
            }
            magics[count] = u64::from_str_radix(digits, 16)
                .map_err(|e| invalid(format!("line {}: `{}`: {}", line_no + 1, line, e)))?;
            count += 1;
        }

        if count != 64 {
            return Err(invalid(format!("expected 64 magics, found {}", count)));
        }
        Ok(PrecomputedMagics { magics })
    }

    /// Load `<dir>/<piece>.txt`. A missing file is not an error.
    pub fn load_dir(dir: &Path, slider: Slider) -> Result<Option<Self>> {
        let path = Self::path_for(dir, slider);
        match fs::read_to_string(&path) {
            Ok(text) => Self::parse(&text, &path).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[inline]
    pub fn get(&self, sq: u8) -> u64 {
        self.magics[sq as usize]
    }

    pub fn magics(&self) -> &[u64; 64] {
        &self.magics
    }
}

/// Format found magics in the file layout `PrecomputedMagics::parse` reads.
pub fn format_magic_file(entries: &[MagicEntry]) -> String {
    assert_eq!(entries.len(), 64, "expected one entry per square");
    let mut text = entries.iter().map(|e| format!("0x{:016X}", e.magic)).join("\n");
    text.push('\n');
    text
}

/// Write `<dir>/<piece>.txt`, creating the directory if needed.
pub fn save_magics(dir: &Path, slider: Slider, entries: &[MagicEntry]) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = PrecomputedMagics::path_for(dir, slider);
    fs::write(&path, format_magic_file(entries))?;
    Ok(path)
}
