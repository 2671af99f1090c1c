//! Sculpting settings.
//!
//! One plain value object carries everything the selection builder, engine
//! and tools read: brush dimensions, shape, profile, apply mode, gesture
//! behavior. The embedding UI owns presentation and writes this struct;
//! the core only reads it.

use crate::profile::BrushProfile;
use crate::shape::BrushShape;
use crate::strategy::ApplyMode;

/// Which tool drives the gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ToolKind {
    /// Timer-driven profile painting
    #[default]
    Brush,
    /// Vertical-drag sculpting
    Sculpt,
    /// Non-profile transforms (smooth / flatten / roughen)
    Special,
}

/// Transform applied by the special tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SpecialMode {
    #[default]
    Smooth,
    Flatten,
    Roughen,
}

/// What dragging with the button held does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DragMode {
    /// Selection freezes while the button is down
    ClickToApply,
    /// Dragging keeps painting under the moving selection
    #[default]
    DragToApply,
    /// Dragging moves the selection
    DragToMove,
}

/// Signed direction of the brush effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Raise,
    Lower,
}

/// All user-facing sculpting settings, passed by reference into the core.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SculptSettings {
    pub tool: ToolKind,
    /// Brush width in tiles, >= 1.
    pub width: u32,
    /// Brush length in tiles, >= 1.
    pub length: u32,
    /// Brush rotation in degrees.
    pub rotation: f32,
    pub shape: BrushShape,
    pub profile: BrushProfile,
    pub apply_mode: ApplyMode,
    pub drag_mode: DragMode,
    /// 0..=10; drives both the repeat rate and the per-tick step.
    pub sensitivity: u32,
    pub direction: Direction,
    pub special_mode: SpecialMode,
}

impl Default for SculptSettings {
    fn default() -> Self {
        Self {
            tool: ToolKind::Brush,
            width: 8,
            length: 8,
            rotation: 0.0,
            shape: BrushShape::Circle,
            profile: BrushProfile::VOLCANO,
            apply_mode: ApplyMode::Relative,
            drag_mode: DragMode::DragToApply,
            sensitivity: 3,
            direction: Direction::Raise,
            special_mode: SpecialMode::Smooth,
        }
    }
}

impl SculptSettings {
    /// Repeat-timer period: high sensitivity ticks faster, capped at
    /// 32 ms (`2^(10 - min(5, sensitivity))`).
    pub fn tick_period_ms(&self) -> u32 {
        1 << (10 - self.sensitivity.min(5))
    }

    /// Signed height delta applied per tick: one step up to sensitivity 5,
    /// doubling beyond (`2^max(0, sensitivity - 5)`).
    pub fn tick_delta(&self) -> f32 {
        let magnitude = (1u32 << self.sensitivity.saturating_sub(5).min(10)) as f32;
        match self.direction {
            Direction::Raise => magnitude,
            Direction::Lower => -magnitude,
        }
    }
}
