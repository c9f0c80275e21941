use zion_geom::Vec2;

use crate::detail::seeded_value_with_seed;
use crate::tile_coord::TileCoord;
use crate::worldgen::{ConfigError, StreamingConfig, WorldConfig};
use crate::zone::{Zone, ZoneId, ZoneTable};

/// Queries farther out than this are clamped; f32 lattice math degrades beyond it.
pub const COORD_LIMIT: f32 = 8_000_000.0;

/// A validated, immutable world: configuration plus the frozen zone table.
///
/// All queries take `&self` and are pure, so a `World` can be shared across
/// threads behind an `Arc`. Reconfiguring means building a new `World`.
#[derive(Clone, Debug)]
pub struct World {
    config: WorldConfig,
    zones: ZoneTable,
}

impl World {
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let zones = config.zone_table()?;
        log::debug!(
            "world ready: seed={:#x} zones={} octaves={} tile_size={}",
            config.seed,
            zones.len(),
            config.noise.octaves.len(),
            config.streaming.tile_size
        );
        Ok(Self { config, zones })
    }

    #[inline]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    #[inline]
    pub fn streaming(&self) -> &StreamingConfig {
        &self.config.streaming
    }

    #[inline]
    pub fn seed(&self) -> u32 {
        self.config.seed
    }

    #[inline]
    pub fn zones(&self) -> &ZoneTable {
        &self.zones
    }

    #[inline]
    pub fn zone(&self, id: ZoneId) -> &Zone {
        self.zones.get(id)
    }

    #[inline]
    pub fn zone_center(&self, id: ZoneId) -> (f32, f32) {
        self.zones.get(id).center.into()
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.config.streaming.tile_size
    }

    #[inline]
    pub fn tile_coord_at(&self, x: f32, z: f32) -> TileCoord {
        let p = sanitize(x, z);
        TileCoord::from_world(p.x, p.z, self.tile_size())
    }

    /// Seeded detail value mixed with the world seed.
    #[inline]
    pub fn seeded_value(&self, a: i32, b: i32, c: i32) -> f32 {
        seeded_value_with_seed(a, b, c, self.config.seed)
    }
}

/// Query-boundary guard: non-finite coordinates collapse to the origin, huge ones clamp.
#[inline]
pub(crate) fn sanitize(x: f32, z: f32) -> Vec2 {
    Vec2::new(sanitize_axis(x), sanitize_axis(z))
}

#[inline]
fn sanitize_axis(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(-COORD_LIMIT, COORD_LIMIT)
    } else {
        log::debug!("non-finite terrain query coordinate {}; using 0", v);
        0.0
    }
}
