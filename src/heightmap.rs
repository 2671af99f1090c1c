//! Per-tile corner height storage.
//!
//! Heights live on a corner grid: each tile owns four corner values, and
//! each grid vertex is shared by up to four tiles. Layers are sparse
//! override maps over a read-through base (the host terrain, or another
//! layer), so snapshots are explicit merges rather than aliased views.

use std::collections::HashMap;

use crate::selection::TileCoord;

/// Offsets from a tile to the vertex backing each of its four corners,
/// in cyclic corner order (the opposite of corner `c` is `(c + 2) & 3`).
pub const CORNER_OFFSETS: [(i32, i32); 4] = [(1, 1), (1, 0), (0, 0), (0, 1)];

const EPS: f32 = 1e-4;

/// The four corner heights of one tile, in terrain-step units.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct CornerHeights(pub [f32; 4]);

impl CornerHeights {
    pub const ZERO: CornerHeights = CornerHeights([0.0; 4]);

    /// All four corners at the same height.
    pub fn splat(z: f32) -> Self {
        CornerHeights([z; 4])
    }

    pub fn get(&self, corner: usize) -> f32 {
        self.0[corner & 3]
    }

    /// Lowest corner
    pub fn min(&self) -> f32 {
        self.0.iter().copied().fold(f32::MAX, f32::min)
    }

    /// Highest corner
    pub fn max(&self) -> f32 {
        self.0.iter().copied().fold(f32::MIN, f32::max)
    }

    pub fn add(&self, other: &CornerHeights) -> CornerHeights {
        let mut out = self.0;
        for (v, o) in out.iter_mut().zip(other.0) {
            *v += o;
        }
        CornerHeights(out)
    }

    /// Componentwise comparison with a small tolerance; used to drop
    /// no-effect mutations before they reach the host.
    pub fn approx_eq(&self, other: &CornerHeights) -> bool {
        self.0
            .iter()
            .zip(other.0)
            .all(|(a, b)| (a - b).abs() <= EPS)
    }
}

/// A corner-grid point shared by up to four tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VertexCoord {
    pub x: i32,
    pub y: i32,
}

impl VertexCoord {
    /// The vertex backing corner `corner` of `tile`.
    pub fn of_corner(tile: TileCoord, corner: usize) -> Self {
        let (dx, dy) = CORNER_OFFSETS[corner & 3];
        VertexCoord {
            x: tile.x + dx,
            y: tile.y + dy,
        }
    }

    /// The four (tile, corner) pairs meeting at this vertex.
    pub fn adjoining_corners(&self) -> [(TileCoord, usize); 4] {
        [
            (TileCoord::new(self.x - 1, self.y - 1), 0),
            (TileCoord::new(self.x - 1, self.y), 1),
            (TileCoord::new(self.x, self.y), 2),
            (TileCoord::new(self.x, self.y - 1), 3),
        ]
    }
}

/// Sparse override layer of corner heights.
///
/// Only tiles that have been written are stored; reads of unset tiles fall
/// through to whatever base the owner layers this over.
#[derive(Clone, Debug, Default)]
pub struct CornerLayer {
    entries: HashMap<TileCoord, CornerHeights>,
}

impl CornerLayer {
    pub fn new() -> Self {
        CornerLayer {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, tile: TileCoord) -> Option<CornerHeights> {
        self.entries.get(&tile).copied()
    }

    pub fn set(&mut self, tile: TileCoord, heights: CornerHeights) {
        self.entries.insert(tile, heights);
    }

    /// Fold every override of `other` into this layer. Used by the soft
    /// reset to checkpoint working heights into the baseline.
    pub fn absorb(&mut self, other: &CornerLayer) {
        for (&tile, &heights) in &other.entries {
            self.entries.insert(tile, heights);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TileCoord, &CornerHeights)> {
        self.entries.iter()
    }
}
