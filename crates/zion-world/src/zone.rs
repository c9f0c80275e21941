//! Static zone registry.
//!
//! Zones live in a fixed array indexed by [`ZoneId`]. The array order is the
//! blend order of the height field and the tie-break order of the classifier,
//! with the hub always at index zero.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zion_geom::{SEGMENT_EPSILON, Segment, Vec2};

use crate::noise::smoothstep_between;
use crate::worldgen::ConfigError;

pub const ZONE_COUNT: usize = 8;

/// Fraction of the radius that is perfectly flat.
pub const FLAT_RADIUS_RATIO: f32 = 0.5;
/// Fraction of the radius where the flattening blend reaches zero.
pub const BLEND_RADIUS_RATIO: f32 = 0.9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneId {
    Nexus,
    Gardens,
    Athenaeum,
    Studio,
    Wilds,
    Agora,
    Commons,
    Arena,
}

impl ZoneId {
    /// Canonical iteration order. Index 0 is the hub.
    pub const ALL: [ZoneId; ZONE_COUNT] = [
        ZoneId::Nexus,
        ZoneId::Gardens,
        ZoneId::Athenaeum,
        ZoneId::Studio,
        ZoneId::Wilds,
        ZoneId::Agora,
        ZoneId::Commons,
        ZoneId::Arena,
    ];

    pub const HUB: ZoneId = ZoneId::Nexus;

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn is_hub(self) -> bool {
        self == Self::HUB
    }

    pub const fn name(self) -> &'static str {
        match self {
            ZoneId::Nexus => "nexus",
            ZoneId::Gardens => "gardens",
            ZoneId::Athenaeum => "athenaeum",
            ZoneId::Studio => "studio",
            ZoneId::Wilds => "wilds",
            ZoneId::Agora => "agora",
            ZoneId::Commons => "commons",
            ZoneId::Arena => "arena",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            ZoneId::Nexus => "The Nexus",
            ZoneId::Gardens => "The Gardens",
            ZoneId::Athenaeum => "The Athenaeum",
            ZoneId::Studio => "The Studio",
            ZoneId::Wilds => "The Wilds",
            ZoneId::Agora => "The Agora",
            ZoneId::Commons => "The Commons",
            ZoneId::Arena => "The Arena",
        }
    }

    pub fn from_name(name: &str) -> Option<ZoneId> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ZoneId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ZoneId::from_name(s).ok_or_else(|| ConfigError::UnknownZone(s.to_string()))
    }
}

/// Ground material classification, consumed by texturing and footstep audio.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroundClass {
    Stone,
    Flowers,
    FrostGrass,
    Wood,
    ForestFloor,
    Cobblestone,
    Grass,
    Sand,
    DirtPath,
}

impl GroundClass {
    pub const fn name(self) -> &'static str {
        match self {
            GroundClass::Stone => "stone",
            GroundClass::Flowers => "flowers",
            GroundClass::FrostGrass => "frost_grass",
            GroundClass::Wood => "wood",
            GroundClass::ForestFloor => "forest_floor",
            GroundClass::Cobblestone => "cobblestone",
            GroundClass::Grass => "grass",
            GroundClass::Sand => "sand",
            GroundClass::DirtPath => "dirt_path",
        }
    }
}

impl fmt::Display for GroundClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Zone {
    pub id: ZoneId,
    pub center: Vec2,
    pub radius: f32,
    pub base_elevation: f32,
    pub ground: GroundClass,
}

impl Zone {
    #[inline]
    pub fn flat_radius(&self) -> f32 {
        self.radius * FLAT_RADIUS_RATIO
    }

    #[inline]
    pub fn blend_radius(&self) -> f32 {
        self.radius * BLEND_RADIUS_RATIO
    }

    #[inline]
    pub fn distance(&self, p: Vec2) -> f32 {
        p.distance(self.center)
    }

    /// Distance in units of the zone radius.
    #[inline]
    pub fn normalized_distance(&self, p: Vec2) -> f32 {
        self.distance(p) / self.radius
    }

    /// Flattening weight: 1 inside the flat radius, smoothstep down to 0 at the blend radius.
    #[inline]
    pub fn flatten_weight(&self, p: Vec2) -> f32 {
        let d = self.distance(p);
        let flat = self.flat_radius();
        let blend = self.blend_radius();
        if d <= flat {
            1.0
        } else if d >= blend {
            0.0
        } else {
            1.0 - smoothstep_between(flat, blend, d)
        }
    }

    fn check(&self) -> Result<(), ConfigError> {
        let invalid = |reason| ConfigError::InvalidZone { id: self.id, reason };
        if !self.center.is_finite() {
            return Err(invalid("center must be finite"));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(invalid("radius must be finite and positive"));
        }
        if !self.base_elevation.is_finite() {
            return Err(invalid("base elevation must be finite"));
        }
        Ok(())
    }
}

/// Immutable zone table plus the precomputed hub paths.
#[derive(Clone, Debug)]
pub struct ZoneTable {
    zones: [Zone; ZONE_COUNT],
    paths: [Segment; ZONE_COUNT],
}

impl ZoneTable {
    /// Validates and freezes a table. `zones[i].id` must equal `ZoneId::ALL[i]`.
    pub fn new(zones: [Zone; ZONE_COUNT]) -> Result<Self, ConfigError> {
        for (slot, zone) in ZoneId::ALL.iter().zip(zones.iter()) {
            if zone.id != *slot {
                return Err(ConfigError::MisplacedZone {
                    expected: *slot,
                    found: zone.id,
                });
            }
            zone.check()?;
        }

        let hub = zones[ZoneId::HUB.index()];
        for zone in zones.iter().filter(|z| !z.id.is_hub()) {
            if zone.center.distance(hub.center) < SEGMENT_EPSILON.sqrt() {
                return Err(ConfigError::DegenerateHub(zone.id));
            }
        }

        // A flat interior must stay outside every other zone's blend band,
        // otherwise the later zone in blend order would tilt it.
        for inner in zones.iter() {
            for outer in zones.iter().filter(|z| z.id != inner.id) {
                let gap = inner.center.distance(outer.center);
                if gap < inner.flat_radius() + outer.blend_radius() {
                    return Err(ConfigError::ZoneOverlap {
                        inner: inner.id,
                        outer: outer.id,
                    });
                }
            }
        }

        let paths = zones.map(|z| Segment::new(hub.center, z.center));
        Ok(Self { zones, paths })
    }

    #[inline]
    pub fn get(&self, id: ZoneId) -> &Zone {
        &self.zones[id.index()]
    }

    #[inline]
    pub fn hub(&self) -> &Zone {
        self.get(ZoneId::HUB)
    }

    /// All zones in blend order, hub first.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    #[inline]
    pub fn non_hub(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter().filter(|z| !z.id.is_hub())
    }

    /// Path from the hub center to the zone center; `None` for the hub itself.
    #[inline]
    pub fn path(&self, id: ZoneId) -> Option<Segment> {
        if id.is_hub() {
            None
        } else {
            Some(self.paths[id.index()])
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        ZONE_COUNT
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }
}
