//! Corner-height codec.
//!
//! The host stores a tile surface as an integer base height (half-step
//! units) plus a 5-bit slope: one raise bit per corner and a diagonal bit
//! marking a two-step corner. Only a constrained subset of four-corner
//! configurations is representable, so encoding is a lossy approximation
//! that always succeeds; decoding is exact.

use crate::heightmap::CornerHeights;
use crate::host::{HeightMutation, SurfaceData};
use crate::selection::TileCoord;

pub const SLOPE_DIAGONAL: u8 = 1 << 4;
pub const BASE_HEIGHT_MIN: i32 = 1;
pub const BASE_HEIGHT_MAX: i32 = 0x7f;

/// Absolute corner heights, in terrain steps, of a stored surface.
pub fn decode_surface(surface: &SurfaceData) -> CornerHeights {
    let base = surface.base_height as f32 / 2.0;
    let slope = surface.slope;
    let mut corners = [0.0f32; 4];
    for (c, out) in corners.iter_mut().enumerate() {
        let raised = (slope >> c) & 1;
        let opposite = (slope >> ((c + 2) & 3)) & 1;
        let diagonal = (slope >> 4) & 1;
        // The diagonal bit only lifts a corner whose opposite is lowered.
        *out = base + raised as f32 + (diagonal * (1 - opposite)) as f32;
    }
    CornerHeights(corners)
}

/// Re-encode target corner heights into the host representation.
///
/// Corners are rounded to whole steps and clamped to within one step of
/// their cyclic neighbors (two of the diagonally-opposite corner) so the
/// result stays representable. `up` picks the clamp direction, keeping
/// both raise and lower gestures faithful.
pub fn encode_surface(tile: TileCoord, target: CornerHeights, up: bool) -> HeightMutation {
    let mut z = [0i32; 4];
    for (c, v) in z.iter_mut().enumerate() {
        *v = target.0[c].round() as i32;
    }

    let z: [i32; 4] = std::array::from_fn(|c| {
        if up {
            z[c].max(z[(c + 1) & 3] - 1)
                .max(z[(c + 2) & 3] - 2)
                .max(z[(c + 3) & 3] - 1)
        } else {
            z[c].min(z[(c + 1) & 3] + 1)
                .min(z[(c + 2) & 3] + 2)
                .min(z[(c + 3) & 3] + 1)
        }
    });

    let base = z
        .iter()
        .copied()
        .min()
        .unwrap_or(0)
        .clamp(BASE_HEIGHT_MIN, BASE_HEIGHT_MAX);

    let mut slope = 0u8;
    for (c, &v) in z.iter().enumerate() {
        let rest = (v.min(BASE_HEIGHT_MAX) - base).max(0);
        if rest > 0 {
            slope |= 1 << c;
        }
        if rest > 1 {
            slope |= SLOPE_DIAGONAL;
        }
    }

    HeightMutation {
        x: tile.x,
        y: tile.y,
        height: (base << 1) as u8,
        slope,
    }
}
