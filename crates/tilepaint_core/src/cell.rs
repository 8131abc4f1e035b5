//! The value stored at one grid coordinate

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Flip flags (Tiled-compatible bit positions)
/// Bit flag for horizontal flip (mirror on Y axis)
pub const TILE_FLIP_X: u32 = 0x8000_0000;
/// Bit flag for vertical flip (mirror on X axis)
pub const TILE_FLIP_Y: u32 = 0x4000_0000;
/// Bit flag for diagonal flip (for 90° rotations, combined with X/Y)
pub const TILE_FLIP_DIAGONAL: u32 = 0x2000_0000;
/// Mask to extract just the tile index (without flip flags)
pub const TILE_INDEX_MASK: u32 = 0x1FFF_FFFF;

/// A tile reference plus orientation flags.
///
/// `tile` packs the index within the tileset in its low bits and the flip flags
/// in its high bits. An empty cell has no tileset and a zero `tile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub tileset_id: Option<Uuid>,
    pub tile: u32,
}

impl Cell {
    /// The empty cell, also returned for out-of-bounds reads
    pub const EMPTY: Cell = Cell {
        tileset_id: None,
        tile: 0,
    };

    pub fn new(tileset_id: Uuid, index: u32) -> Self {
        Self {
            tileset_id: Some(tileset_id),
            tile: index & TILE_INDEX_MASK,
        }
    }

    pub fn with_flips(mut self, flip_x: bool, flip_y: bool, flip_diagonal: bool) -> Self {
        self.tile &= TILE_INDEX_MASK;
        if flip_x {
            self.tile |= TILE_FLIP_X;
        }
        if flip_y {
            self.tile |= TILE_FLIP_Y;
        }
        if flip_diagonal {
            self.tile |= TILE_FLIP_DIAGONAL;
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tileset_id.is_none()
    }

    #[inline]
    pub fn tile_index(&self) -> u32 {
        self.tile & TILE_INDEX_MASK
    }

    #[inline]
    pub fn flip_x(&self) -> bool {
        self.tile & TILE_FLIP_X != 0
    }

    #[inline]
    pub fn flip_y(&self) -> bool {
        self.tile & TILE_FLIP_Y != 0
    }

    #[inline]
    pub fn flip_diagonal(&self) -> bool {
        self.tile & TILE_FLIP_DIAGONAL != 0
    }
}
