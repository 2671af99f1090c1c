//! Apply-mode strategies.
//!
//! A strategy decides how a scaled profile delta combines with an existing
//! corner height. It is captured once per gesture from the selection's
//! height range and then applied per corner per tile.

/// How the pending delta combines with existing terrain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ApplyMode {
    /// Add the delta to each corner
    #[default]
    Relative,
    /// Clamp toward the selection's initial min/max height
    Absolute,
    /// Step each corner toward the selection's target height
    Plateau,
}

/// A bound strategy: pure function `(existing, delta) -> new height`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Strategy {
    Relative,
    Absolute { min_z: f32, max_z: f32 },
    Plateau { target: f32 },
}

impl Strategy {
    /// Bind a strategy for a gesture from the selection's surface height
    /// range (terrain steps). The plateau target is the range midpoint.
    pub fn for_selection(mode: ApplyMode, min_z: f32, max_z: f32) -> Strategy {
        match mode {
            ApplyMode::Relative => Strategy::Relative,
            ApplyMode::Absolute => Strategy::Absolute { min_z, max_z },
            ApplyMode::Plateau => Strategy::Plateau {
                target: (min_z + max_z) / 2.0,
            },
        }
    }

    /// New corner height from the existing height and the scaled profile
    /// delta.
    pub fn combine(&self, existing: f32, delta: f32) -> f32 {
        match *self {
            Strategy::Relative => existing + delta,
            Strategy::Absolute { min_z, max_z } => {
                if delta < 0.0 {
                    existing.min(max_z + delta)
                } else {
                    existing.max(min_z + delta)
                }
            }
            Strategy::Plateau { target } => {
                // Move at most |delta| toward the target, never past it.
                let step = delta.abs();
                if existing > target {
                    (existing - step).max(target)
                } else {
                    (existing + step).min(target)
                }
            }
        }
    }
}
