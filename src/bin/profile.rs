use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_chess_tables::config::GeneratorConfig;
use rust_chess_tables::generator::{generate_slider, generate_slider_parallel, square_seeds};
use rust_chess_tables::types::Slider;
use std::time::Instant;

const SEEDS: [u64; 4] = [42, 1, 0xDEADBEEF, 0x1234567890ABCDEF];

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    println!("=== Magic Search Performance ===\n");

    for seed in SEEDS {
        let config = GeneratorConfig::new_silent(seed);
        println!("Seed {:#x}:", seed);
        let (rook_seeds, bishop_seeds) = square_seeds(seed);

        for slider in Slider::ALL {
            let mut rng = StdRng::seed_from_u64(seed);
            let start = Instant::now();
            let tables = generate_slider(slider, &mut rng, None, &config)?;
            let stats = tables.stats();
            println!("  {:<6} sequential  Time: {:?}", slider, start.elapsed());
            println!(
                "  {:<6} attempts    total {}, mean {:.1}, worst {}",
                slider,
                stats.total_attempts,
                stats.total_attempts as f64 / 64.0,
                stats.max_attempts
            );

            let seeds = match slider {
                Slider::Rook => &rook_seeds,
                Slider::Bishop => &bishop_seeds,
            };
            let start = Instant::now();
            generate_slider_parallel(slider, seeds, None, &config)?;
            println!("  {:<6} parallel    Time: {:?}", slider, start.elapsed());
        }
        println!();
    }

    println!("Done!");
    Ok(())
}
