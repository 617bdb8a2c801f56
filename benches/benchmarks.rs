use criterion::{black_box, criterion_group, criterion_main, Criterion, SamplingMode};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_chess_tables::between::squares_between;
use rust_chess_tables::magic::{find_magic, validate_magic, SquareSearch, DEFAULT_MAX_ATTEMPTS};
use rust_chess_tables::slider::{attack_mask, relevance_mask, BlockerConfigs};
use rust_chess_tables::types::Slider;

// e4
const CENTRE: u8 = 28;
const ROOK_A1_MAGIC: u64 = 0x0080001020400080;

pub fn bench_attack_mask(c: &mut Criterion) {
    let occupied = 0x0000_1024_8100_4200u64;
    c.bench_function("ray-cast rook attacks e4", |b| {
        b.iter(|| attack_mask(Slider::Rook, black_box(CENTRE), black_box(occupied)))
    });
}

pub fn bench_enumerate_blockers(c: &mut Criterion) {
    let mask = relevance_mask(Slider::Rook, 0);
    c.bench_function("enumerate rook a1 blockers", |b| {
        b.iter(|| BlockerConfigs::new(black_box(mask)).fold(0u64, |acc, occ| acc ^ occ))
    });
}

pub fn bench_try_magic(c: &mut Criterion) {
    let mut search = SquareSearch::new(Slider::Rook, 0);
    c.bench_function("try known rook a1 magic", |b| {
        b.iter(|| search.try_magic(black_box(ROOK_A1_MAGIC)))
    });
}

pub fn bench_find_magic(c: &mut Criterion) {
    let mut group = c.benchmark_group("flat-sampling");
    group.sample_size(10);
    group.sampling_mode(SamplingMode::Flat);

    group.bench_function("find rook magic a1", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(42);
            find_magic(Slider::Rook, black_box(0), &mut rng, None, DEFAULT_MAX_ATTEMPTS)
        })
    });
    group.bench_function("find bishop magic e4", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(42);
            find_magic(Slider::Bishop, black_box(CENTRE), &mut rng, None, DEFAULT_MAX_ATTEMPTS)
        })
    });
    group.finish();
}

pub fn bench_lookup(c: &mut Criterion) {
    let entry = validate_magic(Slider::Rook, 0, ROOK_A1_MAGIC).unwrap();
    let occupied = 0x0101_0000_0000_00F0u64;
    c.bench_function("magic lookup rook a1", |b| {
        b.iter(|| entry.lookup(black_box(occupied)))
    });
}

pub fn bench_squares_between(c: &mut Criterion) {
    c.bench_function("squares between a1 h8", |b| {
        b.iter(|| squares_between(black_box(0), black_box(63)))
    });
}

criterion_group!(
    benches,
    bench_attack_mask,
    bench_enumerate_blockers,
    bench_try_magic,
    bench_find_magic,
    bench_lookup,
    bench_squares_between,
);
criterion_main!(benches);
