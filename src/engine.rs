//! Layered height-field model and apply pipeline.
//!
//! Three sparse layers back an active gesture:
//! - `original`: baseline heights at gesture start (or the last soft
//!   reset), filled from the host on first read;
//! - `current`: working heights last pushed through the commit protocol,
//!   layered over `original`;
//! - `delta`: the stroke's pending per-vertex profile offsets.
//!
//! Layers are explicit copies merged on reset, never read-through views of
//! a still-mutating source, so mid-gesture reads cannot alias writes.

use std::collections::HashMap;

use log::debug;
use rand::Rng;

use crate::commit::{commit_batch, CommitError};
use crate::config::SculptSettings;
use crate::encoding::decode_surface;
use crate::heightmap::{CornerHeights, CornerLayer, VertexCoord};
use crate::host::TerrainHost;
use crate::selection::{Selection, TileCoord};
use crate::strategy::{ApplyMode, Strategy};

/// The sculpting engine: selection, height layers and host handle for one
/// active gesture at a time.
pub struct SculptEngine<H: TerrainHost> {
    host: H,
    original: CornerLayer,
    current: CornerLayer,
    delta: HashMap<VertexCoord, f32>,
    selection: Option<Selection>,
    strategy: Strategy,
}

impl<H: TerrainHost> SculptEngine<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            original: CornerLayer::new(),
            current: CornerLayer::new(),
            delta: HashMap::new(),
            selection: None,
            strategy: Strategy::Relative,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Bind a selection and apply mode for the coming stroke. Pending
    /// stroke offsets are tied to one selection and reset here.
    pub fn set_selection(&mut self, selection: Selection, mode: ApplyMode) {
        let (min_z, max_z) = self.selection_range(&selection);
        self.strategy = Strategy::for_selection(mode, min_z, max_z);
        self.delta.clear();
        self.selection = Some(selection);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.delta.clear();
    }

    /// Surface height range over the selection's sculptable tiles, in
    /// terrain steps.
    fn selection_range(&mut self, selection: &Selection) -> (f32, f32) {
        let mut min_z = f32::MAX;
        let mut max_z = f32::MIN;
        for &tile in &selection.tiles {
            if let Some(h) = self.original_heights(tile) {
                min_z = min_z.min(h.min());
                max_z = max_z.max(h.max());
            }
        }
        if min_z > max_z {
            (0.0, 0.0)
        } else {
            (min_z, max_z)
        }
    }

    /// Baseline heights of a tile, read from the host on first touch.
    /// Border tiles and tiles without a surface are not sculptable.
    fn original_heights(&mut self, tile: TileCoord) -> Option<CornerHeights> {
        if !self.host.is_mutable_tile(tile) {
            return None;
        }
        if let Some(h) = self.original.get(tile) {
            return Some(h);
        }
        let surface = self.host.surface(tile.x, tile.y)?;
        let h = decode_surface(&surface);
        self.original.set(tile, h);
        Some(h)
    }

    /// Working heights: `current` override if present, else the baseline.
    fn current_heights(&mut self, tile: TileCoord) -> Option<CornerHeights> {
        if let Some(h) = self.current.get(tile) {
            return Some(h);
        }
        self.original_heights(tile)
    }

    /// Re-evaluate the stroke at `total_delta` and push the resulting
    /// targets through the commit protocol.
    ///
    /// The profile is sampled at each selected tile's four vertices through
    /// the selection transform; the pending offsets are *set* (not
    /// accumulated) so a vertical-drag gesture can re-apply its absolute
    /// total. Tiles whose target already matches the working height are
    /// dropped before the batch, so a no-effect apply issues no host calls.
    pub fn apply(
        &mut self,
        total_delta: f32,
        settings: &SculptSettings,
    ) -> Result<(), CommitError> {
        let Some(selection) = self.selection.clone() else {
            return Ok(());
        };

        for &tile in &selection.tiles {
            for corner in 0..4 {
                let v = VertexCoord::of_corner(tile, corner);
                let (lx, ly) = selection.transform.apply(v.x as f32, v.y as f32);
                let factor = settings.profile.sample_2d(lx, ly, settings.shape);
                self.delta.insert(v, factor * total_delta);
            }
        }

        let mut targets = Vec::new();
        for &tile in &selection.tiles {
            let Some(base) = self.original_heights(tile) else {
                continue;
            };
            let mut corners = [0.0f32; 4];
            for (corner, out) in corners.iter_mut().enumerate() {
                let v = VertexCoord::of_corner(tile, corner);
                let d = self.delta.get(&v).copied().unwrap_or(0.0);
                *out = self.strategy.combine(base.get(corner), d).max(0.0);
            }
            self.push_target(&mut targets, tile, CornerHeights(corners));
        }

        self.commit_targets(targets, total_delta >= 0.0)
    }

    /// Checkpoint the working heights as the new baseline without touching
    /// host state. Idempotent.
    pub fn soft_reset(&mut self) {
        self.original.absorb(&self.current);
        self.current.clear();
        self.delta.clear();
    }

    /// Discard every cached layer; the next read comes from the host.
    pub fn hard_reset(&mut self) {
        debug!("hard reset: dropping {} cached tiles", self.original.len());
        self.original.clear();
        self.current.clear();
        self.delta.clear();
    }

    /// Remove vertical discontinuities under the selection: every corner is
    /// clamped toward the max (raising) or min (lowering) of the baseline
    /// corner heights meeting at its vertex.
    pub fn smooth(&mut self, up: bool) -> Result<(), CommitError> {
        let Some(selection) = self.selection.clone() else {
            return Ok(());
        };

        // Vertex extremes come from the frozen baseline, including corners
        // contributed by unselected neighbor tiles.
        let mut vertex_extent: HashMap<VertexCoord, f32> = HashMap::new();
        for &tile in &selection.tiles {
            for corner in 0..4 {
                let v = VertexCoord::of_corner(tile, corner);
                if vertex_extent.contains_key(&v) {
                    continue;
                }
                let mut extent: Option<f32> = None;
                for (neighbor, c) in v.adjoining_corners() {
                    if let Some(h) = self.original_heights(neighbor) {
                        let z = h.get(c);
                        extent = Some(match extent {
                            None => z,
                            Some(e) if up => e.max(z),
                            Some(e) => e.min(z),
                        });
                    }
                }
                if let Some(e) = extent {
                    vertex_extent.insert(v, e);
                }
            }
        }

        let mut targets = Vec::new();
        for &tile in &selection.tiles {
            let Some(base) = self.original_heights(tile) else {
                continue;
            };
            let mut corners = base.0;
            for (corner, out) in corners.iter_mut().enumerate() {
                let v = VertexCoord::of_corner(tile, corner);
                if let Some(&e) = vertex_extent.get(&v) {
                    *out = if up { out.max(e) } else { out.min(e) };
                }
            }
            self.push_target(&mut targets, tile, CornerHeights(corners));
        }

        self.commit_targets(targets, up)
    }

    /// Level each selected tile at its highest (raising) or lowest
    /// (lowering) baseline corner, removing its slope.
    pub fn flatten(&mut self, up: bool) -> Result<(), CommitError> {
        let Some(selection) = self.selection.clone() else {
            return Ok(());
        };

        let mut targets = Vec::new();
        for &tile in &selection.tiles {
            let Some(base) = self.original_heights(tile) else {
                continue;
            };
            let level = if up { base.max() } else { base.min() };
            self.push_target(&mut targets, tile, CornerHeights::splat(level));
        }

        self.commit_targets(targets, up)
    }

    /// Give each selected tile a random slope around its baseline floor.
    pub fn roughen<R: Rng>(&mut self, rng: &mut R) -> Result<(), CommitError> {
        let Some(selection) = self.selection.clone() else {
            return Ok(());
        };

        let mut targets = Vec::new();
        for &tile in &selection.tiles {
            let Some(base) = self.original_heights(tile) else {
                continue;
            };
            let floor = base.min();
            let corners: [f32; 4] =
                std::array::from_fn(|_| floor + rng.gen_range(0..=1) as f32);
            self.push_target(&mut targets, tile, CornerHeights(corners));
        }

        self.commit_targets(targets, true)
    }

    /// Queue a target unless it matches the working height already.
    fn push_target(
        &mut self,
        targets: &mut Vec<(TileCoord, CornerHeights)>,
        tile: TileCoord,
        target: CornerHeights,
    ) {
        if let Some(current) = self.current_heights(tile) {
            if target.approx_eq(&current) {
                return;
            }
        }
        targets.push((tile, target));
    }

    /// Commit a batch and fold executed tiles into the working layer.
    fn commit_targets(
        &mut self,
        targets: Vec<(TileCoord, CornerHeights)>,
        up: bool,
    ) -> Result<(), CommitError> {
        let outcome = commit_batch(&mut self.host, &targets, up)?;
        if !outcome.executed.is_empty() {
            let by_tile: HashMap<TileCoord, CornerHeights> = targets.into_iter().collect();
            for tile in &outcome.executed {
                if let Some(&target) = by_tile.get(tile) {
                    self.current.set(*tile, target);
                }
            }
        }
        Ok(())
    }
}
