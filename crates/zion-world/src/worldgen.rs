use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

use zion_geom::Vec2;

use crate::zone::{GroundClass, ZONE_COUNT, Zone, ZoneId, ZoneTable};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldConfig {
    #[serde(default = "default_seed")]
    pub seed: u32,
    #[serde(default)]
    pub noise: NoiseConfig,
    #[serde(default)]
    pub paths: PathConfig,
    #[serde(default)]
    pub streaming: StreamingConfig,
    #[serde(default = "default_zones")]
    pub zones: Vec<ZoneConfig>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            noise: NoiseConfig::default(),
            paths: PathConfig::default(),
            streaming: StreamingConfig::default(),
            zones: default_zones(),
        }
    }
}

fn default_seed() -> u32 {
    0x5A10_4E00
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoiseConfig {
    #[serde(default = "default_baseline")]
    pub baseline: f32,
    #[serde(default = "default_octaves")]
    pub octaves: Vec<Octave>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Octave {
    pub frequency: f32,
    pub amplitude: f32,
}

fn default_octaves() -> Vec<Octave> {
    vec![
        Octave { frequency: 0.01, amplitude: 16.0 },
        Octave { frequency: 0.02, amplitude: 8.0 },
        Octave { frequency: 0.04, amplitude: 4.0 },
        Octave { frequency: 0.08, amplitude: 2.0 },
    ]
}
fn default_baseline() -> f32 {
    15.0
}
impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            baseline: default_baseline(),
            octaves: default_octaves(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_half_width")]
    pub half_width: f32,
    #[serde(default = "default_dominance")]
    pub dominance: f32,
    /// Distance from a path center line that classifies as dirt path.
    #[serde(default = "default_ground_width")]
    pub ground_width: f32,
}
fn default_half_width() -> f32 {
    8.0
}
fn default_dominance() -> f32 {
    1.0
}
fn default_ground_width() -> f32 {
    4.0
}
impl Default for PathConfig {
    fn default() -> Self {
        Self {
            half_width: default_half_width(),
            dominance: default_dominance(),
            ground_width: default_ground_width(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StreamingConfig {
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    #[serde(default = "default_load_radius")]
    pub load_radius: i32,
    /// Height samples per tile edge, shared edges included.
    #[serde(default = "default_tile_resolution")]
    pub tile_resolution: usize,
    /// Candidate decoration slots rolled per tile.
    #[serde(default = "default_decoration_slots")]
    pub decoration_slots: u32,
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,
}
const MAX_LOAD_RADIUS: i32 = 64;
const MAX_DECORATION_SLOTS: u32 = 4096;
/// Keeps every tile index within `COORD_LIMIT` of the origin, plus the load
/// radius, inside `i32`.
const MIN_TILE_SIZE: f32 = 0.5;
const MAX_TILE_RESOLUTION: usize = 1025;

fn default_tile_size() -> f32 {
    64.0
}
fn default_load_radius() -> i32 {
    3
}
fn default_tile_resolution() -> usize {
    17
}
fn default_decoration_slots() -> u32 {
    24
}
fn default_worker_threads() -> usize {
    1
}
impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            tile_size: default_tile_size(),
            load_radius: default_load_radius(),
            tile_resolution: default_tile_resolution(),
            decoration_slots: default_decoration_slots(),
            worker_threads: default_worker_threads(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ZoneConfig {
    pub id: ZoneId,
    pub center: [f32; 2],
    pub radius: f32,
    #[serde(default)]
    pub base_elevation: f32,
    pub ground: GroundClass,
}

impl ZoneConfig {
    fn new(id: ZoneId, center: [f32; 2], radius: f32, base_elevation: f32, ground: GroundClass) -> Self {
        Self {
            id,
            center,
            radius,
            base_elevation,
            ground,
        }
    }

    fn to_zone(&self) -> Zone {
        Zone {
            id: self.id,
            center: Vec2::new(self.center[0], self.center[1]),
            radius: self.radius,
            base_elevation: self.base_elevation,
            ground: self.ground,
        }
    }
}

// Nexus plaza at the origin, the other seven zones on a ring around it.
fn default_zones() -> Vec<ZoneConfig> {
    use GroundClass as G;
    use ZoneId as Z;
    vec![
        ZoneConfig::new(Z::Nexus, [0.0, 0.0], 60.0, 0.0, G::Stone),
        ZoneConfig::new(Z::Gardens, [220.0, 0.0], 55.0, 1.5, G::Flowers),
        ZoneConfig::new(Z::Athenaeum, [140.0, 170.0], 50.0, 6.0, G::FrostGrass),
        ZoneConfig::new(Z::Studio, [-50.0, 215.0], 45.0, 2.0, G::Wood),
        ZoneConfig::new(Z::Wilds, [-200.0, 95.0], 65.0, 3.5, G::ForestFloor),
        ZoneConfig::new(Z::Agora, [-195.0, -105.0], 50.0, 0.5, G::Cobblestone),
        ZoneConfig::new(Z::Commons, [-45.0, -215.0], 55.0, 1.0, G::Grass),
        ZoneConfig::new(Z::Arena, [150.0, -160.0], 55.0, -2.0, G::Sand),
    ]
}

impl WorldConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: WorldConfig = toml::from_str(s)?;
        Ok(cfg)
    }

    /// Effective configuration as TOML, in the shape `from_toml_str` reads.
    pub fn to_toml_string(&self) -> Result<String, Box<dyn Error>> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Places every configured zone in its canonical slot.
    pub fn zone_array(&self) -> Result<[Zone; ZONE_COUNT], ConfigError> {
        let mut slots: [Option<Zone>; ZONE_COUNT] = [None; ZONE_COUNT];
        for zc in &self.zones {
            let slot = &mut slots[zc.id.index()];
            if slot.is_some() {
                return Err(ConfigError::DuplicateZone(zc.id));
            }
            *slot = Some(zc.to_zone());
        }
        let mut zones = [Zone {
            id: ZoneId::HUB,
            center: Vec2::ZERO,
            radius: 1.0,
            base_elevation: 0.0,
            ground: GroundClass::Stone,
        }; ZONE_COUNT];
        for (id, (dst, src)) in ZoneId::ALL.iter().zip(zones.iter_mut().zip(slots)) {
            *dst = src.ok_or(ConfigError::MissingZone(*id))?;
        }
        Ok(zones)
    }

    pub fn zone_table(&self) -> Result<ZoneTable, ConfigError> {
        ZoneTable::new(self.zone_array()?)
    }

    /// Checks everything except the zone table, which [`ZoneTable::new`] validates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.noise.octaves.is_empty() {
            return Err(ConfigError::InvalidNoise("at least one octave is required"));
        }
        for o in &self.noise.octaves {
            if !o.frequency.is_finite() || o.frequency <= 0.0 {
                return Err(ConfigError::InvalidNoise("octave frequency must be finite and positive"));
            }
            if !o.amplitude.is_finite() || o.amplitude < 0.0 {
                return Err(ConfigError::InvalidNoise("octave amplitude must be finite and non-negative"));
            }
        }
        if !self.noise.baseline.is_finite() {
            return Err(ConfigError::InvalidNoise("baseline must be finite"));
        }

        let p = &self.paths;
        if !p.half_width.is_finite() || p.half_width <= 0.0 {
            return Err(ConfigError::InvalidPaths("half_width must be finite and positive"));
        }
        if !(0.0..=1.0).contains(&p.dominance) {
            return Err(ConfigError::InvalidPaths("dominance must lie in [0, 1]"));
        }
        if !(0.0..=p.half_width).contains(&p.ground_width) {
            return Err(ConfigError::InvalidPaths("ground_width must lie in [0, half_width]"));
        }

        let s = &self.streaming;
        if !s.tile_size.is_finite() || s.tile_size < MIN_TILE_SIZE {
            return Err(ConfigError::InvalidStreaming("tile_size must be finite and at least 0.5"));
        }
        if !(0..=MAX_LOAD_RADIUS).contains(&s.load_radius) {
            return Err(ConfigError::InvalidStreaming("load_radius must lie in [0, 64]"));
        }
        if !(2..=MAX_TILE_RESOLUTION).contains(&s.tile_resolution) {
            return Err(ConfigError::InvalidStreaming("tile_resolution must lie in [2, 1025]"));
        }
        if s.decoration_slots > MAX_DECORATION_SLOTS {
            return Err(ConfigError::InvalidStreaming("decoration_slots must not exceed 4096"));
        }
        if s.worker_threads == 0 {
            return Err(ConfigError::InvalidStreaming("worker_threads must be at least 1"));
        }
        Ok(())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<WorldConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    WorldConfig::from_toml_str(&s)
}

/// Startup-time configuration failure. Any of these aborts world construction.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    MissingZone(ZoneId),
    DuplicateZone(ZoneId),
    MisplacedZone { expected: ZoneId, found: ZoneId },
    UnknownZone(String),
    InvalidZone { id: ZoneId, reason: &'static str },
    ZoneOverlap { inner: ZoneId, outer: ZoneId },
    DegenerateHub(ZoneId),
    InvalidNoise(&'static str),
    InvalidPaths(&'static str),
    InvalidStreaming(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingZone(id) => write!(f, "zone table is missing {}", id),
            ConfigError::DuplicateZone(id) => write!(f, "zone {} is defined more than once", id),
            ConfigError::MisplacedZone { expected, found } => {
                write!(f, "zone slot for {} holds {}", expected, found)
            }
            ConfigError::UnknownZone(name) => write!(f, "unknown zone id: {}", name),
            ConfigError::InvalidZone { id, reason } => write!(f, "zone {}: {}", id, reason),
            ConfigError::ZoneOverlap { inner, outer } => write!(
                f,
                "flat interior of {} reaches into the blend band of {}",
                inner, outer
            ),
            ConfigError::DegenerateHub(id) => {
                write!(f, "zone {} sits on the hub center; its path has no length", id)
            }
            ConfigError::InvalidNoise(msg) => write!(f, "invalid noise config: {}", msg),
            ConfigError::InvalidPaths(msg) => write!(f, "invalid path config: {}", msg),
            ConfigError::InvalidStreaming(msg) => write!(f, "invalid streaming config: {}", msg),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let cfg = WorldConfig::default();
        cfg.validate().unwrap();
        cfg.zone_table().unwrap();
        assert_eq!(cfg.noise.octaves.len(), 4);
        assert_eq!(cfg.paths.half_width, 8.0);
    }

    #[test]
    fn dumped_config_reads_back() {
        let mut cfg = WorldConfig::default();
        cfg.seed = 99;
        cfg.streaming.load_radius = 2;
        let text = cfg.to_toml_string().unwrap();
        let back = WorldConfig::from_toml_str(&text).unwrap();
        assert_eq!(back.seed, 99);
        assert_eq!(back.streaming.load_radius, 2);
        assert_eq!(back.zones.len(), ZONE_COUNT);
        assert_eq!(back.zones[4].id, ZoneId::Wilds);
        assert_eq!(back.noise.octaves, cfg.noise.octaves);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg = WorldConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.zones.len(), ZONE_COUNT);
        assert_eq!(cfg.streaming.tile_size, 64.0);
        assert_eq!(cfg.streaming.load_radius, 3);
    }

    #[test]
    fn toml_overrides_sections() {
        let src = r#"
            seed = 7

            [streaming]
            tile_size = 32.0
            load_radius = 1

            [paths]
            dominance = 0.75
        "#;
        let cfg = WorldConfig::from_toml_str(src).unwrap();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.streaming.tile_size, 32.0);
        assert_eq!(cfg.streaming.load_radius, 1);
        assert_eq!(cfg.streaming.tile_resolution, 17);
        assert_eq!(cfg.paths.dominance, 0.75);
        assert_eq!(cfg.paths.half_width, 8.0);
        cfg.validate().unwrap();
    }

    #[test]
    fn toml_zone_list_replaces_whole_table() {
        let src = r#"
            [[zones]]
            id = "nexus"
            center = [0.0, 0.0]
            radius = 60.0
            ground = "stone"
        "#;
        let cfg = WorldConfig::from_toml_str(src).unwrap();
        assert_eq!(cfg.zones.len(), 1);
        assert_eq!(
            cfg.zone_table().unwrap_err(),
            ConfigError::MissingZone(ZoneId::Gardens)
        );
    }

    #[test]
    fn duplicate_zone_is_rejected() {
        let mut cfg = WorldConfig::default();
        let dup = cfg.zones[3].clone();
        cfg.zones.push(dup);
        assert_eq!(
            cfg.zone_array().unwrap_err(),
            ConfigError::DuplicateZone(ZoneId::Studio)
        );
    }

    #[test]
    fn unknown_zone_name_fails_to_parse() {
        let src = r#"
            [[zones]]
            id = "atlantis"
            center = [0.0, 0.0]
            radius = 10.0
            ground = "sand"
        "#;
        assert!(WorldConfig::from_toml_str(src).is_err());
    }

    #[test]
    fn invalid_constants_are_rejected() {
        let mut cfg = WorldConfig::default();
        cfg.noise.octaves.clear();
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidNoise(_))));

        let mut cfg = WorldConfig::default();
        cfg.paths.dominance = 1.5;
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidPaths(_))));

        let mut cfg = WorldConfig::default();
        cfg.streaming.tile_size = 0.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidStreaming(_))));

        let mut cfg = WorldConfig::default();
        cfg.streaming.load_radius = -1;
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidStreaming(_))));

        let mut cfg = WorldConfig::default();
        cfg.streaming.decoration_slots = 5000;
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidStreaming(_))));

        let mut cfg = WorldConfig::default();
        cfg.streaming.tile_resolution = 1;
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidStreaming(_))));
    }

    #[test]
    fn streaming_extremes_are_bounded() {
        let mut cfg = WorldConfig::default();
        cfg.streaming.tile_size = 0.001;
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidStreaming(_))));
        cfg.streaming.tile_size = MIN_TILE_SIZE;
        assert!(cfg.validate().is_ok());

        let mut cfg = WorldConfig::default();
        cfg.streaming.tile_resolution = 5000;
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidStreaming(_))));
        cfg.streaming.tile_resolution = MAX_TILE_RESOLUTION;
        assert!(cfg.validate().is_ok());

        let widest = f64::from(crate::world::COORD_LIMIT / MIN_TILE_SIZE) + f64::from(MAX_LOAD_RADIUS) + 1.0;
        assert!(widest < f64::from(i32::MAX));
    }
}
