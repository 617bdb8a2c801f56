use std::fmt;

/// Board directions as (rank_delta, file_delta)
pub type Direction = (i8, i8);

pub const NORTH: Direction = (1, 0);
pub const SOUTH: Direction = (-1, 0);
pub const EAST: Direction = (0, 1);
pub const WEST: Direction = (0, -1);
pub const NORTH_EAST: Direction = (1, 1);
pub const NORTH_WEST: Direction = (1, -1);
pub const SOUTH_EAST: Direction = (-1, 1);
pub const SOUTH_WEST: Direction = (-1, -1);

/// Attack table width emitted for rooks (2^12, the widest rook relevance mask)
pub const ROOK_TABLE_SIZE: usize = 4096;
/// Attack table width emitted for bishops
pub const BISHOP_TABLE_SIZE: usize = 8192;

/// The two sliding pieces that get magic tables. Queens are rook | bishop.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Slider {
    Rook,
    Bishop,
}

impl Slider {
    pub const ALL: [Slider; 2] = [Slider::Rook, Slider::Bishop];

    /// Lowercase name used for table identifiers and magic file names.
    pub const fn name(&self) -> &'static str {
        match self {
            Slider::Rook => "rook",
            Slider::Bishop => "bishop",
        }
    }

    pub const fn directions(&self) -> [Direction; 4] {
        match self {
            Slider::Rook => [NORTH, SOUTH, EAST, WEST],
            Slider::Bishop => [NORTH_EAST, NORTH_WEST, SOUTH_EAST, SOUTH_WEST],
        }
    }

    /// Fixed per-square slot count of the emitted attack tables.
    pub const fn table_capacity(&self) -> usize {
        match self {
            Slider::Rook => ROOK_TABLE_SIZE,
            Slider::Bishop => BISHOP_TABLE_SIZE,
        }
    }
}

impl fmt::Display for Slider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}
