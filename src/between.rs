use once_cell::sync::Lazy;

use crate::bitboard::{sq_file, sq_rank, sq_to_bb, step};

/// Squares strictly between `a` and `b` on a shared rank, file or diagonal.
///
/// Zero when the squares are not aligned, equal, or adjacent.
pub fn squares_between(a: u8, b: u8) -> u64 {
    assert!(a < 64 && b < 64, "square index out of range: {} {}", a, b);
    let (ra, fa) = (sq_rank(a) as i8, sq_file(a) as i8);
    let (rb, fb) = (sq_rank(b) as i8, sq_file(b) as i8);
    let (dr, df) = (rb - ra, fb - fa);

    let aligned = dr == 0 || df == 0 || dr.abs() == df.abs();
    if a == b || !aligned {
        return 0;
    }

    let dir = (dr.signum(), df.signum());
    let mut between = 0u64;
    let mut current = a;
    while let Some(next) = step(current, dir) {
        if next == b {
            break;
        }
        between |= sq_to_bb(next);
        current = next;
    }
    between
}

/// Full `[from][to]` table, built on first use
pub static SQUARES_BETWEEN: Lazy<Box<[[u64; 64]; 64]>> = Lazy::new(|| {
    let mut table = Box::new([[0u64; 64]; 64]);
    for a in 0..64u8 {
        for b in 0..64u8 {
            table[a as usize][b as usize] = squares_between(a, b);
        }
    }
    table
});

pub fn squares_between_table() -> &'static [[u64; 64]; 64] {
    &SQUARES_BETWEEN
}
