//! Tile streaming around a moving reference point.
#![forbid(unsafe_code)]

mod events;

use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::Receiver;
use hashbrown::HashMap;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use zion_chunk::{Decoration, DecorationGenerator, ScatterGenerator, Tile, TileBuildError, build_tile};
use zion_world::{TileCoord, World};

pub use events::{StreamEvent, StreamStats};

use crate::events::EventBus;

/// What one [`StreamingManager::update`] call changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub center: TileCoord,
    pub loaded: Vec<TileCoord>,
    pub unloaded: Vec<TileCoord>,
    pub failed: Vec<TileCoord>,
}

impl UpdateReport {
    pub fn is_noop(&self) -> bool {
        self.loaded.is_empty() && self.unloaded.is_empty() && self.failed.is_empty()
    }
}

/// Owns every loaded tile and keeps the set equal to the square neighbourhood
/// of the reference tile.
pub struct StreamingManager {
    world: Arc<World>,
    tiles: HashMap<TileCoord, Tile>,
    generators: Vec<Box<dyn DecorationGenerator>>,
    pool: Option<ThreadPool>,
    center: Option<TileCoord>,
    stats: StreamStats,
    bus: EventBus,
}

impl StreamingManager {
    /// Manager with the default scatter generator.
    pub fn new(world: Arc<World>) -> Self {
        Self::with_generators(world, vec![Box::new(ScatterGenerator)])
    }

    pub fn with_generators(world: Arc<World>, generators: Vec<Box<dyn DecorationGenerator>>) -> Self {
        let pool = build_pool(world.streaming().worker_threads);
        Self {
            world,
            tiles: HashMap::new(),
            generators,
            pool,
            center: None,
            stats: StreamStats::default(),
            bus: EventBus::default(),
        }
    }

    #[inline]
    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    /// Reference tile of the last update, if any.
    #[inline]
    pub fn center(&self) -> Option<TileCoord> {
        self.center
    }

    #[inline]
    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[inline]
    pub fn is_loaded(&self, coord: TileCoord) -> bool {
        self.tiles.contains_key(&coord)
    }

    #[inline]
    pub fn tile(&self, coord: TileCoord) -> Option<&Tile> {
        self.tiles.get(&coord)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// Loaded coordinates in sorted order.
    pub fn loaded_coords(&self) -> Vec<TileCoord> {
        let mut coords: Vec<TileCoord> = self.tiles.keys().copied().collect();
        coords.sort_unstable();
        coords
    }

    pub fn decorations(&self, coord: TileCoord) -> Option<&[Decoration]> {
        self.tiles.get(&coord).map(|t| t.decorations())
    }

    /// Receiver for every subsequent [`StreamEvent`].
    pub fn subscribe(&mut self) -> Receiver<StreamEvent> {
        self.bus.subscribe()
    }

    /// Brings the loaded set to exactly the tiles within `load_radius` of the
    /// tile containing `position`.
    ///
    /// Evictions run before builds. A tile whose build fails is not
    /// registered, so the next call tries it again.
    pub fn update(&mut self, position: (f32, f32)) -> UpdateReport {
        let t0 = Instant::now();
        let center = self.world.tile_coord_at(position.0, position.1);
        let radius = self.world.streaming().load_radius;
        let moved = self.center != Some(center);
        self.center = Some(center);

        let mut unloaded: Vec<TileCoord> = self
            .tiles
            .keys()
            .copied()
            .filter(|c| c.chebyshev(center) > radius)
            .collect();
        unloaded.sort_unstable();
        for coord in &unloaded {
            self.release(*coord);
        }

        let mut missing: Vec<TileCoord> = center
            .square_neighborhood(radius)
            .filter(|c| !self.tiles.contains_key(c))
            .collect();
        missing.sort_unstable();

        let built = self.build_all(&missing);
        let mut loaded = Vec::with_capacity(built.len());
        let mut failed = Vec::new();
        for (coord, result) in built {
            match result {
                Ok(tile) => {
                    let decorations = tile.decorations.len();
                    self.stats.resident_decorations += decorations;
                    self.stats.resident_bytes += tile.footprint_bytes();
                    self.stats.loaded_total += 1;
                    self.tiles.insert(coord, tile);
                    self.bus.publish(StreamEvent::Loaded { coord, decorations });
                    loaded.push(coord);
                }
                Err(error) => {
                    log::warn!(target: "stream", "{}; will retry", error);
                    self.stats.failed_total += 1;
                    self.bus.publish(StreamEvent::BuildFailed { coord, error });
                    failed.push(coord);
                }
            }
        }

        self.stats.updates += 1;
        self.stats.resident_tiles = self.tiles.len();
        self.stats.last_update_ms = t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;
        if moved || !loaded.is_empty() || !unloaded.is_empty() {
            log::debug!(
                target: "stream",
                "center=({}, {}) +{} -{} failed={} resident={} in {}ms",
                center.cx,
                center.cz,
                loaded.len(),
                unloaded.len(),
                failed.len(),
                self.tiles.len(),
                self.stats.last_update_ms
            );
        }
        UpdateReport {
            center,
            loaded,
            unloaded,
            failed,
        }
    }

    /// Swaps in a new world. Every tile is dropped; the next [`update`]
    /// rebuilds the neighbourhood from the new configuration.
    ///
    /// [`update`]: StreamingManager::update
    pub fn replace_world(&mut self, world: Arc<World>) {
        for coord in self.loaded_coords() {
            self.release(coord);
        }
        if world.streaming().worker_threads != self.world.streaming().worker_threads {
            self.pool = build_pool(world.streaming().worker_threads);
        }
        log::info!(
            target: "stream",
            "world replaced: seed={:#x} tile_size={} load_radius={}",
            world.seed(),
            world.tile_size(),
            world.streaming().load_radius
        );
        self.world = world;
        self.center = None;
        self.stats.resident_tiles = 0;
    }

    fn release(&mut self, coord: TileCoord) {
        if let Some(tile) = self.tiles.remove(&coord) {
            self.stats.resident_decorations = self
                .stats
                .resident_decorations
                .saturating_sub(tile.decorations.len());
            self.stats.resident_bytes = self.stats.resident_bytes.saturating_sub(tile.footprint_bytes());
            self.stats.unloaded_total += 1;
            self.bus.publish(StreamEvent::Unloaded { coord });
        }
    }

    fn build_all(&self, coords: &[TileCoord]) -> Vec<(TileCoord, Result<Tile, TileBuildError>)> {
        let world = self.world.as_ref();
        let generators = self.generators.as_slice();
        match &self.pool {
            Some(pool) if coords.len() > 1 => pool.install(|| {
                coords
                    .par_iter()
                    .map(|&c| (c, build_tile(world, c, generators)))
                    .collect()
            }),
            _ => coords
                .iter()
                .map(|&c| (c, build_tile(world, c, generators)))
                .collect(),
        }
    }
}

fn build_pool(threads: usize) -> Option<ThreadPool> {
    if threads <= 1 {
        return None;
    }
    match ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("zion-tile-{i}"))
        .build()
    {
        Ok(pool) => Some(pool),
        Err(e) => {
            log::warn!(target: "stream", "tile pool unavailable ({}); building serially", e);
            None
        }
    }
}
