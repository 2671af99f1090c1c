//! Interactive tile-terrain sculpting engine.
//!
//! The crate turns pointer gestures into batched, validated terrain
//! mutations against an embedding simulation. A [`tools::ToolController`]
//! interprets the gesture lifecycle, a [`engine::SculptEngine`] maintains
//! the layered height model and pushes committed batches through the
//! [`host::TerrainHost`] seam, and the remaining modules supply the brush
//! geometry, height profiles and the corner-height codec.

pub mod commit;
pub mod config;
pub mod encoding;
pub mod engine;
pub mod heightmap;
pub mod host;
pub mod profile;
pub mod selection;
pub mod shape;
pub mod strategy;
pub mod tools;

pub use config::{Direction, DragMode, SculptSettings, SpecialMode, ToolKind};
pub use engine::SculptEngine;
pub use host::TerrainHost;
pub use profile::{BaseProfile, BrushProfile, ProfileModifier};
pub use selection::{Selection, TileCoord};
pub use shape::BrushShape;
pub use strategy::ApplyMode;
pub use tools::{PointerEvent, ToolController};
