//! Animated decoration state for the resident tile set.

use hashbrown::HashMap;
use zion_chunk::{SwayState, advance_sway, sway_states};
use zion_runtime::{StreamEvent, StreamingManager};
use zion_world::TileCoord;

/// Sway records per loaded tile, kept in step with stream events.
#[derive(Default)]
pub struct SwayBook {
    tiles: HashMap<TileCoord, Vec<SwayState>>,
}

impl SwayBook {
    pub fn apply(&mut self, event: &StreamEvent, manager: &StreamingManager) {
        match event {
            StreamEvent::Loaded { coord, .. } => {
                if let Some(decorations) = manager.decorations(*coord) {
                    self.tiles.insert(*coord, sway_states(decorations));
                }
            }
            StreamEvent::Unloaded { coord } => {
                self.tiles.remove(coord);
            }
            StreamEvent::BuildFailed { .. } => {}
        }
    }

    pub fn advance(&mut self, dt: f32) {
        for states in self.tiles.values_mut() {
            advance_sway(states, dt);
        }
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn record_count(&self) -> usize {
        self.tiles.values().map(Vec::len).sum()
    }
}
