//! Zone table, noise, and the terrain height field.
#![forbid(unsafe_code)]

pub mod noise;
pub mod overview;
pub mod terrain;
pub mod worldgen;
pub mod zone;

mod detail;
mod tile_coord;
mod world;

pub use detail::{seeded_value, seeded_value_with_seed};
pub use terrain::PathSample;
pub use tile_coord::TileCoord;
pub use world::World;
pub use worldgen::{
    ConfigError, NoiseConfig, Octave, PathConfig, StreamingConfig, WorldConfig, ZoneConfig,
    load_config_from_path,
};
pub use zone::{GroundClass, ZONE_COUNT, Zone, ZoneId, ZoneTable};
