//! Gesture state machines for the three sculpting tools.
//!
//! One controller drives the host-delivered pointer/timer callbacks:
//! `start -> down -> move* -> up -> ... -> finish`. `start`/`finish`
//! bracket tool activation and toggle the sub-surface view; `down`/`up`
//! may repeat within one activation. The repeating apply timer is the only
//! source of re-entrant scheduling and is cancelled on every exit path,
//! including a forced finish while the button is still held.

use log::{debug, warn};
use rand::Rng;

use crate::config::{DragMode, SculptSettings, SpecialMode, ToolKind};
use crate::engine::SculptEngine;
use crate::host::{TerrainHost, TimerId};
use crate::selection::{Selection, TileCoord};

/// Pointer event delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerEvent {
    /// Tile under the cursor, `None` when off the map.
    pub tile: Option<TileCoord>,
    /// Vertical screen position in pixels.
    pub screen_y: i32,
}

/// Per-tool gesture state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ToolState {
    Brush {
        down: bool,
        timer: Option<TimerId>,
    },
    Sculpt {
        down: bool,
        anchor_y: i32,
        last_delta: i32,
    },
    Special {
        timer: Option<TimerId>,
    },
}

/// Drives one tool's gesture lifecycle against the engine.
pub struct ToolController {
    state: ToolState,
    /// Last cursor tile a selection was built for; moves within the same
    /// tile do not rebuild the selection.
    cursor: Option<TileCoord>,
    active: bool,
}

impl ToolController {
    pub fn new(kind: ToolKind) -> Self {
        let state = match kind {
            ToolKind::Brush => ToolState::Brush {
                down: false,
                timer: None,
            },
            ToolKind::Sculpt => ToolState::Sculpt {
                down: false,
                anchor_y: 0,
                last_delta: 0,
            },
            ToolKind::Special => ToolState::Special { timer: None },
        };
        Self {
            state,
            cursor: None,
            active: false,
        }
    }

    pub fn kind(&self) -> ToolKind {
        match self.state {
            ToolState::Brush { .. } => ToolKind::Brush,
            ToolState::Sculpt { .. } => ToolKind::Sculpt,
            ToolState::Special { .. } => ToolKind::Special,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Tool activation: drop stale caches and expose the sub-surface view.
    pub fn on_start<H: TerrainHost>(&mut self, engine: &mut SculptEngine<H>) {
        engine.hard_reset();
        engine.host_mut().set_underground_view(true);
        self.active = true;
        debug!("{:?} tool activated", self.kind());
    }

    /// Button press: snapshot the selection into the stroke and, for the
    /// timer-driven tools, apply once and start the repeat timer.
    ///
    /// `rng` feeds the special tool's roughen mode.
    pub fn on_down<H: TerrainHost, R: Rng>(
        &mut self,
        engine: &mut SculptEngine<H>,
        settings: &SculptSettings,
        rng: &mut R,
        event: PointerEvent,
    ) {
        match self.state {
            ToolState::Brush { .. } => {
                if let Some(selection) = engine.selection().cloned() {
                    engine.set_selection(selection, settings.apply_mode);
                }
                Self::brush_tick(engine, settings);
                let timer = engine.host_mut().set_interval(settings.tick_period_ms());
                self.state = ToolState::Brush {
                    down: true,
                    timer: Some(timer),
                };
            }
            ToolState::Sculpt { .. } => {
                if let Some(selection) = engine.selection().cloned() {
                    engine.set_selection(selection, settings.apply_mode);
                }
                self.state = ToolState::Sculpt {
                    down: true,
                    anchor_y: event.screen_y,
                    last_delta: 0,
                };
            }
            ToolState::Special { .. } => {
                Self::special_tick(engine, settings, rng);
                let timer = engine.host_mut().set_interval(settings.tick_period_ms());
                self.state = ToolState::Special { timer: Some(timer) };
            }
        }
    }

    /// Pointer motion: retarget the selection, or for a held vertical-drag
    /// gesture convert pixel motion into a quantized height delta.
    pub fn on_move<H: TerrainHost>(
        &mut self,
        engine: &mut SculptEngine<H>,
        settings: &SculptSettings,
        event: PointerEvent,
    ) {
        match self.state {
            ToolState::Brush { down, .. } => {
                // With click-to-apply the selection freezes while held.
                if down && settings.drag_mode == DragMode::ClickToApply {
                    return;
                }
                let moved = self.update_selection(engine, settings, event);
                if down && moved {
                    // Rebind the stroke to the moved selection.
                    if let Some(selection) = engine.selection().cloned() {
                        engine.set_selection(selection, settings.apply_mode);
                    }
                }
            }
            ToolState::Sculpt {
                down: true,
                anchor_y,
                last_delta,
            } => {
                let diff = anchor_y - event.screen_y;
                let shift = (4 - engine.host().zoom()).clamp(0, 10);
                let pixel_per_step = (1 << shift) as f32;
                let delta = (diff as f32 / pixel_per_step).round() as i32;
                // Sub-step motion re-quantizes to the same delta: skip.
                if delta != last_delta {
                    if let Err(err) = engine.apply(delta as f32, settings) {
                        warn!("sculpt apply failed: {err}");
                    }
                    self.state = ToolState::Sculpt {
                        down: true,
                        anchor_y,
                        last_delta: delta,
                    };
                }
            }
            ToolState::Sculpt { down: false, .. } | ToolState::Special { .. } => {
                self.update_selection(engine, settings, event);
            }
        }
    }

    /// Timer callback from the host. Ticks from a stale handle (already
    /// cleared, or another tool's) are ignored.
    pub fn on_tick<H: TerrainHost, R: Rng>(
        &mut self,
        engine: &mut SculptEngine<H>,
        settings: &SculptSettings,
        rng: &mut R,
        timer: TimerId,
    ) {
        match self.state {
            ToolState::Brush {
                down: true,
                timer: Some(t),
            } if t == timer => Self::brush_tick(engine, settings),
            ToolState::Special { timer: Some(t) } if t == timer => {
                Self::special_tick(engine, settings, rng)
            }
            _ => {}
        }
    }

    /// Button release: stop the repeat timer and checkpoint the gesture.
    pub fn on_up<H: TerrainHost>(&mut self, engine: &mut SculptEngine<H>) {
        match self.state {
            ToolState::Brush { timer, .. } => {
                if let Some(t) = timer {
                    engine.host_mut().clear_interval(t);
                }
                self.state = ToolState::Brush {
                    down: false,
                    timer: None,
                };
            }
            ToolState::Sculpt { down, .. } => {
                if down {
                    engine.soft_reset();
                }
                self.state = ToolState::Sculpt {
                    down: false,
                    anchor_y: 0,
                    last_delta: 0,
                };
            }
            ToolState::Special { timer } => {
                if let Some(t) = timer {
                    engine.host_mut().clear_interval(t);
                }
                self.state = ToolState::Special { timer: None };
            }
        }
    }

    /// Tool deactivation, possibly forced while the button is held.
    pub fn on_finish<H: TerrainHost>(&mut self, engine: &mut SculptEngine<H>) {
        // The timer must die on every exit path.
        self.on_up(engine);
        engine.host_mut().set_underground_view(false);
        engine.host_mut().set_tile_highlight(&[]);
        match self.state {
            // Special-mode mutations bypass the delta model; their caches
            // cannot be checkpointed, only discarded.
            ToolState::Special { .. } => engine.hard_reset(),
            _ => engine.soft_reset(),
        }
        engine.clear_selection();
        self.cursor = None;
        self.active = false;
        debug!("{:?} tool finished", self.kind());
    }

    /// Rebuild the tile selection if the cursor moved to a different tile.
    /// Returns whether the selection changed.
    fn update_selection<H: TerrainHost>(
        &mut self,
        engine: &mut SculptEngine<H>,
        settings: &SculptSettings,
        event: PointerEvent,
    ) -> bool {
        let Some(tile) = event.tile else {
            let had_selection = self.cursor.take().is_some();
            if had_selection {
                engine.clear_selection();
                engine.host_mut().set_tile_highlight(&[]);
            }
            return had_selection;
        };
        if self.cursor == Some(tile) {
            return false;
        }
        self.cursor = Some(tile);
        let selection = Selection::build(tile, settings);
        engine.host_mut().set_tile_highlight(&selection.tiles);
        engine.set_selection(selection, settings.apply_mode);
        true
    }

    fn brush_tick<H: TerrainHost>(engine: &mut SculptEngine<H>, settings: &SculptSettings) {
        if let Err(err) = engine.apply(settings.tick_delta(), settings) {
            warn!("brush apply failed: {err}");
        }
        // Checkpoint so the next tick builds on what was just committed.
        engine.soft_reset();
    }

    fn special_tick<H: TerrainHost, R: Rng>(
        engine: &mut SculptEngine<H>,
        settings: &SculptSettings,
        rng: &mut R,
    ) {
        let up = settings.tick_delta() >= 0.0;
        let result = match settings.special_mode {
            SpecialMode::Smooth => engine.smooth(up),
            SpecialMode::Flatten => engine.flatten(up),
            SpecialMode::Roughen => engine.roughen(rng),
        };
        if let Err(err) = result {
            warn!("{:?} failed: {err}", settings.special_mode);
        }
    }
}
