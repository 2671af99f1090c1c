//! Brush falloff profiles.
//!
//! A profile maps a normalized radius in `[0, 1]` to a height factor in
//! roughly `[-1, 1]`: `sample(0)` is the peak, `sample(1)` the edge value
//! (usually 0). Base profiles are lifted to 2D through a shape norm and
//! reshaped by modifiers (crater rim, flat top, cap, inversion). All of it
//! is pure math, safe to call any number of times.

use crate::shape::BrushShape;

/// Base falloff curve of a brush.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum BaseProfile {
    /// Constant 1 across the whole footprint
    #[default]
    Flat,
    /// Linear falloff, `1 - r`
    Cone,
    /// Gaussian falloff, `256^(-r²)`
    Bell,
    /// Hemisphere, `sqrt(1 - r²)`
    Sphere,
    /// Parametrized cubic `1 - n·r + (-3+2n+m)·r² + (2-n-m)·r³`.
    /// Always 1 at the peak and 0 at the edge; `n` and `m` shape the
    /// falloff in between (dome vs. peak variants).
    Cubic { n: f32, m: f32 },
}

impl BaseProfile {
    pub const CUBIC_1: BaseProfile = BaseProfile::Cubic { n: 0.0, m: 3.0 };
    pub const CUBIC_2: BaseProfile = BaseProfile::Cubic { n: 0.0, m: 1.5 };
    pub const CUBIC_3: BaseProfile = BaseProfile::Cubic { n: 0.0, m: 0.0 };
    pub const CUBIC_4: BaseProfile = BaseProfile::Cubic { n: 1.5, m: 0.0 };
    pub const CUBIC_5: BaseProfile = BaseProfile::Cubic { n: 3.0, m: 0.0 };

    /// Height factor at normalized radius `r`.
    pub fn sample(&self, r: f32) -> f32 {
        match *self {
            BaseProfile::Flat => 1.0,
            BaseProfile::Cone => 1.0 - r,
            BaseProfile::Bell => 256f32.powf(-(r * r)),
            BaseProfile::Sphere => (1.0 - r * r).max(0.0).sqrt(),
            BaseProfile::Cubic { n, m } => {
                1.0 - n * r + (-3.0 + 2.0 * n + m) * r * r + (2.0 - n - m) * r * r * r
            }
        }
    }
}

/// Reshaping applied on top of a base profile, parameter in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum ProfileModifier {
    #[default]
    None,
    /// Carves a rim: `1 - |f(r)/(1 - p/2) - 1|`
    Crater(f32),
    /// Clamps the top at `1 - p` and renormalizes (flat-topped)
    Mesa(f32),
    /// Flat at 1 for `r < p`, base profile rescaled over the rest
    /// (flat-bottomed variant)
    MesaFloor(f32),
    /// Rescales so the value at `r = 1 - p` maps to 0, zero beyond
    Capped(f32),
}

/// A complete brush profile: base curve, modifier, optional inversion.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct BrushProfile {
    pub base: BaseProfile,
    pub modifier: ProfileModifier,
    /// Negates the profile, turning hills into valleys.
    pub inverted: bool,
}

impl BrushProfile {
    /// The plugin's default brush: a crater-rimmed bell.
    pub const VOLCANO: BrushProfile = BrushProfile {
        base: BaseProfile::Bell,
        modifier: ProfileModifier::Crater(2.0 / 3.0),
        inverted: false,
    };

    pub const fn plain(base: BaseProfile) -> Self {
        BrushProfile {
            base,
            modifier: ProfileModifier::None,
            inverted: false,
        }
    }

    /// Height factor at normalized radius `r`.
    pub fn sample(&self, r: f32) -> f32 {
        let base = self.base;
        let value = match self.modifier {
            ProfileModifier::None => base.sample(r),
            ProfileModifier::Crater(p) => 1.0 - (base.sample(r) / (1.0 - p / 2.0) - 1.0).abs(),
            ProfileModifier::Mesa(p) => {
                if p >= 1.0 {
                    1.0
                } else {
                    base.sample(r).min(1.0 - p) / (1.0 - p)
                }
            }
            ProfileModifier::MesaFloor(p) => {
                if r < p || p >= 1.0 {
                    1.0
                } else {
                    base.sample((r - p) / (1.0 - p))
                }
            }
            ProfileModifier::Capped(p) => {
                let cutoff = 1.0 - p;
                if r >= cutoff {
                    0.0
                } else {
                    let edge = base.sample(cutoff);
                    let peak = base.sample(0.0);
                    if (peak - edge).abs() <= f32::EPSILON {
                        base.sample(r)
                    } else {
                        (base.sample(r) - edge) / (peak - edge)
                    }
                }
            }
        };
        if self.inverted {
            -value
        } else {
            value
        }
    }

    /// 2D lift through a shape norm: 0 outside the footprint, otherwise the
    /// 1D profile at the clipped norm distance.
    pub fn sample_2d(&self, x: f32, y: f32, shape: BrushShape) -> f32 {
        let d = shape.norm(x, y);
        if d > 1.0 {
            0.0
        } else {
            self.sample(d)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_base_profiles_peak_at_one() {
        for base in [
            BaseProfile::Flat,
            BaseProfile::Cone,
            BaseProfile::Bell,
            BaseProfile::Sphere,
        ] {
            assert!((base.sample(0.0) - 1.0).abs() < EPS, "{base:?}");
        }
    }

    #[test]
    fn test_cubic_presets_peak_and_edge() {
        // The cubic family is 1 at r=0 and 0 at r=1 for every (n, m):
        // 1 - n + (-3+2n+m) + (2-n-m) = 0.
        for cubic in [
            BaseProfile::CUBIC_1,
            BaseProfile::CUBIC_2,
            BaseProfile::CUBIC_3,
            BaseProfile::CUBIC_4,
            BaseProfile::CUBIC_5,
        ] {
            assert!((cubic.sample(0.0) - 1.0).abs() < EPS, "{cubic:?}");
            assert!(cubic.sample(1.0).abs() < EPS, "{cubic:?}");
        }
    }

    #[test]
    fn test_cone_is_linear() {
        assert!((BaseProfile::Cone.sample(0.25) - 0.75).abs() < EPS);
        assert!(BaseProfile::Cone.sample(1.0).abs() < EPS);
    }

    #[test]
    fn test_sphere_edge_and_overshoot() {
        assert!(BaseProfile::Sphere.sample(1.0).abs() < EPS);
        // Guarded against r slightly past the edge
        assert_eq!(BaseProfile::Sphere.sample(1.1), 0.0);
    }

    #[test]
    fn test_crater_dips_at_center() {
        // The volcano profile has its rim off-center and a dip at r=0.
        let volcano = BrushProfile::VOLCANO;
        let center = volcano.sample(0.0);
        let rim: f32 = (0..=10)
            .map(|i| volcano.sample(i as f32 / 10.0))
            .fold(f32::MIN, f32::max);
        assert!(center < rim);
    }

    #[test]
    fn test_mesa_flattens_top() {
        let mesa = BrushProfile {
            base: BaseProfile::Cone,
            modifier: ProfileModifier::Mesa(0.5),
            inverted: false,
        };
        // Everything with base value >= 0.5 is clamped to 1 after renorm.
        assert!((mesa.sample(0.0) - 1.0).abs() < EPS);
        assert!((mesa.sample(0.5) - 1.0).abs() < EPS);
        // Below the clamp the profile is rescaled: cone(0.75) = 0.25 -> 0.5
        assert!((mesa.sample(0.75) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_mesa_floor_flat_inside() {
        let m = BrushProfile {
            base: BaseProfile::Cone,
            modifier: ProfileModifier::MesaFloor(0.5),
            inverted: false,
        };
        assert!((m.sample(0.0) - 1.0).abs() < EPS);
        assert!((m.sample(0.49) - 1.0).abs() < EPS);
        // Past p the base profile runs rescaled over the remaining range
        assert!((m.sample(0.75) - 0.5).abs() < EPS);
        assert!(m.sample(1.0).abs() < EPS);
    }

    #[test]
    fn test_capped_zero_past_cutoff() {
        let capped = BrushProfile {
            base: BaseProfile::Cone,
            modifier: ProfileModifier::Capped(0.5),
            inverted: false,
        };
        assert!((capped.sample(0.0) - 1.0).abs() < EPS);
        assert!(capped.sample(0.5).abs() < EPS);
        assert_eq!(capped.sample(0.75), 0.0);
    }

    #[test]
    fn test_inverted_negates() {
        let valley = BrushProfile {
            base: BaseProfile::Cone,
            modifier: ProfileModifier::None,
            inverted: true,
        };
        assert!((valley.sample(0.0) + 1.0).abs() < EPS);
        assert!((valley.sample(0.5) + 0.5).abs() < EPS);
    }

    #[test]
    fn test_sample_2d_outside_is_zero() {
        let flat = BrushProfile::plain(BaseProfile::Flat);
        assert_eq!(flat.sample_2d(0.8, 0.8, BrushShape::Circle), 0.0);
        assert_eq!(flat.sample_2d(0.6, 0.6, BrushShape::Circle), 1.0);
        // Square norm admits the same point
        assert_eq!(flat.sample_2d(0.8, 0.8, BrushShape::Square), 1.0);
    }
}
