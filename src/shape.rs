//! Brush footprint shapes.
//!
//! Each shape is a distance norm over brush-local coordinates. After the
//! selection transform, the brush half-extent is 1, so a point belongs to
//! the footprint iff `norm(dx, dy) <= 1` (boundary inclusive).

/// Shape of the brush footprint
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BrushShape {
    /// Square footprint (Chebyshev norm)
    Square,
    /// Circular footprint (Euclidean norm)
    #[default]
    Circle,
    /// Diamond footprint (Manhattan norm)
    Diamond,
}

impl BrushShape {
    /// Distance of a brush-local point from the brush center under this
    /// shape's norm. Pure and total over all inputs.
    pub fn norm(&self, dx: f32, dy: f32) -> f32 {
        match self {
            BrushShape::Square => dx.abs().max(dy.abs()),
            BrushShape::Circle => (dx * dx + dy * dy).sqrt(),
            BrushShape::Diamond => dx.abs() + dy.abs(),
        }
    }

    /// Whether a brush-local point lies inside the footprint.
    pub fn contains(&self, dx: f32, dy: f32) -> bool {
        self.norm(dx, dy) <= 1.0
    }
}
