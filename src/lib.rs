pub mod types;
pub mod error;
pub mod bitboard;
pub mod slider;
pub mod between;
pub mod magic;
pub mod magic_file;
pub mod config;
pub mod generator;
pub mod emit;
