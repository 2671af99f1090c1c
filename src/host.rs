//! Host-side seam.
//!
//! Everything the sculpting core needs from the embedding simulation goes
//! through [`TerrainHost`]: terrain reads, the query/execute action pair,
//! permission and funds lookups, the cosmetic viewport toggles, and the
//! repeat-timer service. The host delivers pointer and timer callbacks on a
//! single thread; every call here is synchronous.

use crate::selection::TileCoord;

/// Stored surface state of one tile: base height in half-step units plus
/// the 5-bit slope encoding (one raise bit per corner, bit 4 diagonal).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceData {
    pub base_height: u8,
    pub slope: u8,
}

/// Height-mutation request understood by the host action system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeightMutation {
    pub x: i32,
    pub y: i32,
    /// New base height in half-step units.
    pub height: u8,
    pub slope: u8,
}

/// Outcome class of a speculative mutation query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionStatus {
    Ok,
    /// Accepted but changes nothing (still part of the batch).
    NoOp,
    /// Rejected with a user-facing message.
    Err(String),
}

/// Result of a speculative mutation query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionResult {
    pub status: ActionStatus,
    /// Cost charged on execution, in the host's money units.
    pub cost: i64,
}

/// Handle for a repeating host timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerId(pub u32);

/// The embedding host, as seen by the sculpting core.
pub trait TerrainHost {
    /// Side length of the map in tiles.
    fn map_size(&self) -> i32;

    /// Stored surface of a tile, or `None` if the tile has no surface.
    fn surface(&self, x: i32, y: i32) -> Option<SurfaceData>;

    /// Speculatively validate a height mutation. The engine never executes
    /// a mutation whose query did not succeed with identical arguments.
    fn query_set_height(&mut self, mutation: &HeightMutation) -> ActionResult;

    /// Commit a previously queried height mutation.
    fn execute_set_height(&mut self, mutation: &HeightMutation);

    fn is_network_client(&self) -> bool;

    /// Whether the local player's group may terraform.
    fn has_terraform_permission(&self) -> bool;

    /// Available park cash.
    fn cash(&self) -> i64;

    /// Sandbox flag: terraforming is free when set.
    fn free_money(&self) -> bool;

    /// Main viewport zoom level; vertical drag uses `1 << (4 - zoom)`
    /// pixels per height step.
    fn zoom(&self) -> i32;

    /// Toggle the sub-surface view so the selection stays visible while
    /// sculpting. Purely cosmetic.
    fn set_underground_view(&mut self, on: bool);

    /// Replace the highlighted footprint. Purely cosmetic.
    fn set_tile_highlight(&mut self, tiles: &[TileCoord]);

    /// Start a repeating timer; the host calls back into the active tool
    /// every `period_ms` until the handle is cleared.
    fn set_interval(&mut self, period_ms: u32) -> TimerId;
    fn clear_interval(&mut self, timer: TimerId);

    /// Whether a tile may be sculpted. The outermost border ring belongs to
    /// the host and is never mutated.
    fn is_mutable_tile(&self, tile: TileCoord) -> bool {
        let size = self.map_size();
        tile.x >= 1 && tile.y >= 1 && tile.x < size - 1 && tile.y < size - 1
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Scripted host for engine, commit and tool tests.

    use std::collections::HashMap;

    use super::*;

    pub(crate) struct MockHost {
        pub size: i32,
        pub surfaces: HashMap<(i32, i32), SurfaceData>,
        pub network_client: bool,
        pub permission: bool,
        pub cash: i64,
        pub free_money: bool,
        pub zoom: i32,
        /// Cost returned by every accepted query.
        pub tile_cost: i64,
        /// When set, every query is rejected with this message.
        pub reject_all: Option<String>,
        /// Tiles whose queries are rejected individually.
        pub reject_tiles: Vec<(i32, i32)>,
        pub queries: Vec<HeightMutation>,
        pub executes: Vec<HeightMutation>,
        pub underground: bool,
        pub highlights: Vec<Vec<TileCoord>>,
        pub started_timers: Vec<(TimerId, u32)>,
        pub cancelled_timers: Vec<TimerId>,
        next_timer: u32,
    }

    impl MockHost {
        /// A `size` x `size` map of flat surfaces at `base_height`
        /// half-steps, slope 0, with permissive defaults.
        pub fn flat(size: i32, base_height: u8) -> Self {
            let mut surfaces = HashMap::new();
            for x in 0..size {
                for y in 0..size {
                    surfaces.insert(
                        (x, y),
                        SurfaceData {
                            base_height,
                            slope: 0,
                        },
                    );
                }
            }
            Self {
                size,
                surfaces,
                network_client: false,
                permission: true,
                cash: 1_000_000,
                free_money: false,
                zoom: 0,
                tile_cost: 0,
                reject_all: None,
                reject_tiles: Vec::new(),
                queries: Vec::new(),
                executes: Vec::new(),
                underground: false,
                highlights: Vec::new(),
                started_timers: Vec::new(),
                cancelled_timers: Vec::new(),
                next_timer: 0,
            }
        }

        pub fn surface_at(&self, x: i32, y: i32) -> SurfaceData {
            self.surfaces[&(x, y)]
        }
    }

    impl TerrainHost for MockHost {
        fn map_size(&self) -> i32 {
            self.size
        }

        fn surface(&self, x: i32, y: i32) -> Option<SurfaceData> {
            self.surfaces.get(&(x, y)).copied()
        }

        fn query_set_height(&mut self, mutation: &HeightMutation) -> ActionResult {
            self.queries.push(*mutation);
            let status = if let Some(message) = &self.reject_all {
                ActionStatus::Err(message.clone())
            } else if self.reject_tiles.contains(&(mutation.x, mutation.y)) {
                ActionStatus::Err("land not owned by park".into())
            } else {
                ActionStatus::Ok
            };
            let cost = match status {
                ActionStatus::Err(_) => 0,
                _ => self.tile_cost,
            };
            ActionResult { status, cost }
        }

        fn execute_set_height(&mut self, mutation: &HeightMutation) {
            self.executes.push(*mutation);
            self.surfaces.insert(
                (mutation.x, mutation.y),
                SurfaceData {
                    base_height: mutation.height,
                    slope: mutation.slope,
                },
            );
        }

        fn is_network_client(&self) -> bool {
            self.network_client
        }

        fn has_terraform_permission(&self) -> bool {
            self.permission
        }

        fn cash(&self) -> i64 {
            self.cash
        }

        fn free_money(&self) -> bool {
            self.free_money
        }

        fn zoom(&self) -> i32 {
            self.zoom
        }

        fn set_underground_view(&mut self, on: bool) {
            self.underground = on;
        }

        fn set_tile_highlight(&mut self, tiles: &[TileCoord]) {
            self.highlights.push(tiles.to_vec());
        }

        fn set_interval(&mut self, period_ms: u32) -> TimerId {
            self.next_timer += 1;
            let id = TimerId(self.next_timer);
            self.started_timers.push((id, period_ms));
            id
        }

        fn clear_interval(&mut self, timer: TimerId) {
            self.cancelled_timers.push(timer);
        }
    }

    #[test]
    fn test_border_tiles_are_immutable() {
        let host = MockHost::flat(10, 10);
        assert!(!host.is_mutable_tile(TileCoord::new(0, 5)));
        assert!(!host.is_mutable_tile(TileCoord::new(9, 5)));
        assert!(!host.is_mutable_tile(TileCoord::new(5, 0)));
        assert!(host.is_mutable_tile(TileCoord::new(1, 1)));
        assert!(host.is_mutable_tile(TileCoord::new(8, 8)));
    }
}
