//! Serialization of the generated tables into source files the engine compiles in.
//!
//! The C output is a `tables.c` / `tables.h` pair. Every slider gets
//! `<piece>_magic_numbers[64]`, `<piece>_blocker_masks[64]`, `<piece>_rel_bits[64]`
//! and `<piece>_attack_tables[64][N]`, where N is the slider's fixed table
//! capacity. The engine looks attacks up with
//!
//! ```text
//! index = ((occ & blocker_masks[sq]) * magic_numbers[sq]) >> (64 - rel_bits[sq]);
//! attacks = attack_tables[sq][index];
//! ```
//!
//! The Rust output carries the same tables as `pub static` arrays in one module.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use itertools::Itertools;

use crate::error::Result;
use crate::generator::{GeneratedTables, SliderTables};
use crate::types::Slider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// tables.c and tables.h
    C,
    /// tables.rs
    Rust,
}

const GENERATED_BY: &str = "generated by tablegen";

#[inline]
fn format_c_ull(n: u64) -> String {
    format!("0x{:016X}ULL", n)
}

#[inline]
fn format_rust_u64(n: u64) -> String {
    format!("0x{:016X}", n)
}

/// `const <ty> <name>[<len>] = { ... };` with one item per line
fn format_c_array(items: &[String], name: &str, ty: &str) -> String {
    format!(
        "const {} {}[{}] = {{\n    {}\n}};",
        ty,
        name,
        items.len(),
        items.iter().join(",\n    ")
    )
}

/// `const uint64_t <name>[<rows>][<cols>]`, one row per line
fn format_c_2d_array(rows: &[Vec<u64>], name: &str) -> String {
    let cols = rows.first().map_or(0, |r| r.len());
    assert!(rows.iter().all(|r| r.len() == cols), "ragged table {}", name);
    let body = rows
        .iter()
        .map(|row| format!("{{{}}}", row.iter().map(|&n| format_c_ull(n)).join(", ")))
        .join(",\n    ");
    format!(
        "const uint64_t {}[{}][{}] = {{\n    {}\n}};",
        name,
        rows.len(),
        cols,
        body
    )
}

fn format_rust_array(items: &[String], name: &str, ty: &str) -> String {
    format!(
        "pub static {}: [{}; {}] = [\n    {},\n];",
        name,
        ty,
        items.len(),
        items.iter().join(",\n    ")
    )
}

fn format_rust_2d_array(rows: &[Vec<u64>], name: &str) -> String {
    let cols = rows.first().map_or(0, |r| r.len());
    assert!(rows.iter().all(|r| r.len() == cols), "ragged table {}", name);
    let body = rows
        .iter()
        .map(|row| format!("[{}]", row.iter().map(|&n| format_rust_u64(n)).join(", ")))
        .join(",\n    ");
    format!(
        "pub static {}: [[u64; {}]; {}] = [\n    {},\n];",
        name,
        cols,
        rows.len(),
        body
    )
}

fn padded_tables(tables: &SliderTables) -> Vec<Vec<u64>> {
    assert_eq!(tables.entries.len(), 64, "{} tables must cover 64 squares", tables.slider);
    (0..64u8).map(|sq| tables.padded_table(sq)).collect()
}

fn between_rows(tables: &GeneratedTables) -> Vec<Vec<u64>> {
    tables.squares_between.iter().map(|row| row.to_vec()).collect()
}

fn c_slider_tables(tables: &SliderTables) -> String {
    let name = tables.slider.name();
    let magics = tables.magics().map(format_c_ull);
    let masks = tables.masks().map(format_c_ull);
    let bits = tables.relevant_bits().map(|b| b.to_string());

    [
        format_c_array(&magics, &format!("{}_magic_numbers", name), "uint64_t"),
        format_c_array(&masks, &format!("{}_blocker_masks", name), "uint64_t"),
        format_c_array(&bits, &format!("{}_rel_bits", name), "uint64_t"),
        format_c_2d_array(&padded_tables(tables), &format!("{}_attack_tables", name)),
    ]
    .join("\n\n")
}

/// Contents of `tables.c`
pub fn c_source(tables: &GeneratedTables) -> String {
    let knight = tables.knight.map(format_c_ull);
    let king = tables.king.map(format_c_ull);

    format!(
        "// Various precomputed tables {}\n#include \"tables.h\"\n\n{}\n\n{}\n\n{}\n\n{}\n\n{}\n",
        GENERATED_BY,
        format_c_array(&knight, "knight_moves", "uint64_t"),
        format_c_array(&king, "king_moves", "uint64_t"),
        format_c_2d_array(&between_rows(tables), "squares_between"),
        c_slider_tables(&tables.rook),
        c_slider_tables(&tables.bishop),
    )
}

/// Contents of `tables.h`
pub fn c_header() -> String {
    let mut header = format!(
        "// Header of various precomputed tables {}\n\
         #ifndef TABLES_H\n\
         #define TABLES_H\n\n\
         #include <stdint.h>\n\n\
         extern const uint64_t knight_moves[64];\n\
         extern const uint64_t king_moves[64];\n\
         extern const uint64_t squares_between[64][64];\n\n",
        GENERATED_BY
    );
    for slider in Slider::ALL {
        let name = slider.name();
        header.push_str(&format!("extern const uint64_t {}_magic_numbers[64];\n", name));
        header.push_str(&format!("extern const uint64_t {}_rel_bits[64];\n", name));
        header.push_str(&format!("extern const uint64_t {}_blocker_masks[64];\n", name));
        header.push_str(&format!(
            "extern const uint64_t {}_attack_tables[64][{}];\n\n",
            name,
            slider.table_capacity()
        ));
    }
    header.push_str("#endif // TABLES_H\n");
    header
}

fn rust_slider_tables(tables: &SliderTables) -> String {
    let name = tables.slider.name().to_uppercase();
    let magics = tables.magics().map(format_rust_u64);
    let masks = tables.masks().map(format_rust_u64);
    let bits = tables.relevant_bits().map(|b| b.to_string());

    [
        format_rust_array(&magics, &format!("{}_MAGIC_NUMBERS", name), "u64"),
        format_rust_array(&masks, &format!("{}_BLOCKER_MASKS", name), "u64"),
        format_rust_array(&bits, &format!("{}_REL_BITS", name), "u32"),
        format_rust_2d_array(&padded_tables(tables), &format!("{}_ATTACK_TABLES", name)),
    ]
    .join("\n\n")
}

/// Contents of `tables.rs`
pub fn rust_module(tables: &GeneratedTables) -> String {
    let knight = tables.knight.map(format_rust_u64);
    let king = tables.king.map(format_rust_u64);

    format!(
        "// Various precomputed tables {}. Do not edit.\n\n{}\n\n{}\n\n{}\n\n{}\n\n{}\n",
        GENERATED_BY,
        format_rust_array(&knight, "KNIGHT_MOVES", "u64"),
        format_rust_array(&king, "KING_MOVES", "u64"),
        format_rust_2d_array(&between_rows(tables), "SQUARES_BETWEEN"),
        rust_slider_tables(&tables.rook),
        rust_slider_tables(&tables.bishop),
    )
}

/// File names and contents for one output format
pub fn artifact_files(tables: &GeneratedTables, format: OutputFormat) -> Vec<(&'static str, String)> {
    match format {
        OutputFormat::C => vec![("tables.c", c_source(tables)), ("tables.h", c_header())],
        OutputFormat::Rust => vec![("tables.rs", rust_module(tables))],
    }
}

/// Write the artifact into `out_dir`, returning the paths written.
pub fn write_artifacts(tables: &GeneratedTables, out_dir: &Path, format: OutputFormat) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;
    let mut written = Vec::new();
    for (file_name, contents) in artifact_files(tables, format) {
        let path = out_dir.join(file_name);
        fs::write(&path, contents)?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_c_array() {
        let items = vec!["1".to_string(), "2".to_string()];
        assert_eq!(
            format_c_array(&items, "xs", "uint64_t"),
            "const uint64_t xs[2] = {\n    1,\n    2\n};"
        );
    }

    #[test]
    fn test_format_c_2d_array() {
        let rows = vec![vec![1, 2], vec![3, 0]];
        assert_eq!(
            format_c_2d_array(&rows, "t"),
            "const uint64_t t[2][2] = {\n    \
             {0x0000000000000001ULL, 0x0000000000000002ULL},\n    \
             {0x0000000000000003ULL, 0x0000000000000000ULL}\n};"
        );
    }

    #[test]
    fn test_format_rust_array() {
        let items = vec![format_rust_u64(255)];
        assert_eq!(
            format_rust_array(&items, "XS", "u64"),
            "pub static XS: [u64; 1] = [\n    0x00000000000000FF,\n];"
        );
    }

    #[test]
    #[should_panic(expected = "ragged table")]
    fn test_ragged_table_is_a_contract_violation() {
        format_c_2d_array(&[vec![1, 2], vec![3]], "bad");
    }

    #[test]
    fn test_header_declares_every_table() {
        let header = c_header();
        for decl in [
            "extern const uint64_t knight_moves[64];",
            "extern const uint64_t king_moves[64];",
            "extern const uint64_t squares_between[64][64];",
            "extern const uint64_t rook_magic_numbers[64];",
            "extern const uint64_t rook_rel_bits[64];",
            "extern const uint64_t rook_blocker_masks[64];",
            "extern const uint64_t rook_attack_tables[64][4096];",
            "extern const uint64_t bishop_magic_numbers[64];",
            "extern const uint64_t bishop_attack_tables[64][8192];",
        ] {
            assert!(header.contains(decl), "missing {}", decl);
        }
        assert!(header.starts_with("// Header"));
        assert!(header.trim_end().ends_with("#endif // TABLES_H"));
    }
}
