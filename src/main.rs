//! Magic bitboard table generator
//!
//! Usage: cargo run --release --bin tablegen -- \
//!          --out-dir ./engine --format c --seed 42 --magic-dir ./magics --verify

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::WrapErr;

use rust_chess_tables::config::{GeneratorConfig, DEFAULT_SEED};
use rust_chess_tables::emit::{write_artifacts, OutputFormat};
use rust_chess_tables::generator::generate;
use rust_chess_tables::magic::DEFAULT_MAX_ATTEMPTS;
use rust_chess_tables::magic_file::save_magics;
use rust_chess_tables::types::Slider;

#[derive(Parser, Debug)]
#[command(name = "tablegen")]
#[command(about = "Generate magic bitboard, leaper and squares-between tables for a chess engine")]
struct Args {
    /// Directory the table sources are written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Output language
    #[arg(short, long, value_enum, default_value_t = OutputFormat::C)]
    format: OutputFormat,

    /// Seed of the magic search
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Random candidates per square before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u64,

    /// Directory with rook.txt / bishop.txt candidate magics (hex, one per square)
    #[arg(long)]
    magic_dir: Option<PathBuf>,

    /// Write the magics found to rook.txt / bishop.txt in this directory
    #[arg(long)]
    save_magics: Option<PathBuf>,

    /// Search squares in parallel (different magics than a sequential run)
    #[arg(long)]
    parallel: bool,

    /// Check every table against ray-cast attacks before writing
    #[arg(long)]
    verify: bool,

    /// Only print errors and the written file names
    #[arg(short, long)]
    quiet: bool,
}

impl From<&Args> for GeneratorConfig {
    fn from(args: &Args) -> Self {
        GeneratorConfig {
            seed: args.seed,
            max_attempts: args.max_attempts,
            magic_dir: args.magic_dir.clone(),
            parallel: args.parallel,
            verify: args.verify,
            quiet: args.quiet,
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let config = GeneratorConfig::from(&args);

    let tables = generate(&config).wrap_err("table generation failed")?;

    if let Some(dir) = &args.save_magics {
        for slider in Slider::ALL {
            let path = save_magics(dir, slider, &tables.slider(slider).entries)
                .wrap_err_with(|| format!("could not save {} magics to {}", slider, dir.display()))?;
            println!("Saved {}", path.display());
        }
    }

    let written = write_artifacts(&tables, &args.out_dir, args.format)
        .wrap_err_with(|| format!("could not write tables to {}", args.out_dir.display()))?;
    for path in written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
