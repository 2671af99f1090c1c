//! Tile selection under the brush.
//!
//! Given a cursor tile and the brush settings, computes the bounded set of
//! affected tiles plus the affine transform from world tiles into
//! brush-local normalized space (half-extent 1). The footprint is the set
//! of tiles whose center lands inside the shape norm.

use crate::config::SculptSettings;

/// A 2D grid cell index on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Affine map from world tile coordinates into brush-local space:
/// translate to the brush center, rotate by the negated brush angle, then
/// scale each axis so the brush half-extent maps to 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrushTransform {
    cx: f32,
    cy: f32,
    sin: f32,
    cos: f32,
    dx: f32,
    dy: f32,
}

impl BrushTransform {
    pub fn new(cx: f32, cy: f32, angle_deg: f32, dx: u32, dy: u32) -> Self {
        let radians = angle_deg.to_radians();
        Self {
            cx,
            cy,
            sin: radians.sin(),
            cos: radians.cos(),
            dx: dx.max(1) as f32,
            dy: dy.max(1) as f32,
        }
    }

    /// Map a world-space point into brush-local coordinates.
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        let x = x - self.cx;
        let y = y - self.cy;
        (
            (x * self.cos - y * self.sin) / self.dx * 2.0,
            (x * self.sin + y * self.cos) / self.dy * 2.0,
        )
    }
}

/// The brush footprint at one cursor position.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    /// Cursor tile this selection was built for.
    pub cursor: TileCoord,
    /// Affected tiles in scan order.
    pub tiles: Vec<TileCoord>,
    pub transform: BrushTransform,
}

impl Selection {
    /// Build the footprint for a cursor tile. Callers are expected to skip
    /// the rebuild while the cursor stays on the same tile.
    pub fn build(cursor: TileCoord, settings: &SculptSettings) -> Selection {
        let dx = settings.width.max(1);
        let dy = settings.length.max(1);
        let d = dx.max(dy) as f32;
        // > sqrt(2) * (d / 2): covers the rectangle under any rotation
        let r = 0.75 * d;

        // Odd-sized brushes center on the cursor tile's center, even-sized
        // ones on its corner, so the footprint stays visually centered.
        let cx = cursor.x as f32 + (dx & 1) as f32 / 2.0;
        let cy = cursor.y as f32 + (dy & 1) as f32 / 2.0;

        let transform = BrushTransform::new(cx, cy, settings.rotation, dx, dy);

        let x0 = (cx - r).floor() as i32;
        let y0 = (cy - r).floor() as i32;
        let x1 = (cx + r).ceil() as i32;
        let y1 = (cy + r).ceil() as i32;

        let mut tiles = Vec::new();
        for x in x0..x1 {
            for y in y0..y1 {
                // Membership is tested at the tile center.
                let (lx, ly) = transform.apply(x as f32 + 0.5, y as f32 + 0.5);
                if settings.shape.contains(lx, ly) {
                    tiles.push(TileCoord::new(x, y));
                }
            }
        }

        Selection {
            cursor,
            tiles,
            transform,
        }
    }
}
