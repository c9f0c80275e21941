//! Deterministic per-tile decoration scatter.

use std::f32::consts::TAU;
use std::fmt;

use zion_world::{GroundClass, TileCoord, World};

use crate::TileBuildError;

/// Seeded-value channels consumed per decoration slot.
const SLOT_CHANNELS: i32 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DecorationKind {
    Oak,
    Pine,
    Bush,
    Rock,
    FlowerPatch,
    Reeds,
    Crate,
    Lantern,
}

impl DecorationKind {
    pub const fn name(self) -> &'static str {
        match self {
            DecorationKind::Oak => "oak",
            DecorationKind::Pine => "pine",
            DecorationKind::Bush => "bush",
            DecorationKind::Rock => "rock",
            DecorationKind::FlowerPatch => "flower_patch",
            DecorationKind::Reeds => "reeds",
            DecorationKind::Crate => "crate",
            DecorationKind::Lantern => "lantern",
        }
    }

    /// Plants move in the wind; props and rocks do not.
    pub const fn sways(self) -> bool {
        matches!(
            self,
            DecorationKind::Oak
                | DecorationKind::Pine
                | DecorationKind::Bush
                | DecorationKind::FlowerPatch
                | DecorationKind::Reeds
        )
    }

    pub const fn base_scale(self) -> f32 {
        match self {
            DecorationKind::Oak => 4.0,
            DecorationKind::Pine => 5.0,
            DecorationKind::Bush => 1.2,
            DecorationKind::Rock => 1.0,
            DecorationKind::FlowerPatch => 0.6,
            DecorationKind::Reeds => 0.9,
            DecorationKind::Crate => 0.8,
            DecorationKind::Lantern => 1.6,
        }
    }
}

impl fmt::Display for DecorationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One placed decoration. `slot` is the scatter slot that produced it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub position: [f32; 3],
    pub rotation: f32,
    pub scale: f32,
    pub slot: u32,
}

/// Fills a tile's decoration list. Implementations must be pure functions of
/// `(world, coord)` so evicted tiles rebuild identically.
pub trait DecorationGenerator: Send + Sync {
    fn name(&self) -> &str;

    fn generate(
        &self,
        world: &World,
        coord: TileCoord,
        out: &mut Vec<Decoration>,
    ) -> Result<(), TileBuildError>;
}

/// Acceptance density and weighted kinds for one ground class.
struct Palette {
    density: f32,
    kinds: &'static [(DecorationKind, u32)],
}

impl Palette {
    fn pick(&self, r: f32) -> DecorationKind {
        let total: u32 = self.kinds.iter().map(|(_, w)| *w).sum();
        let mut target = (r * total as f32) as u32;
        for (kind, w) in self.kinds {
            if target < *w {
                return *kind;
            }
            target -= *w;
        }
        self.kinds[self.kinds.len() - 1].0
    }
}

fn palette_for(ground: GroundClass) -> Option<Palette> {
    use DecorationKind::*;
    let palette = match ground {
        GroundClass::Stone | GroundClass::DirtPath => return None,
        GroundClass::Flowers => Palette {
            density: 0.55,
            kinds: &[(FlowerPatch, 5), (Bush, 2), (Oak, 1)],
        },
        GroundClass::FrostGrass => Palette {
            density: 0.35,
            kinds: &[(Pine, 4), (Rock, 2)],
        },
        GroundClass::Wood => Palette {
            density: 0.3,
            kinds: &[(Crate, 2), (Lantern, 1), (Oak, 1)],
        },
        GroundClass::ForestFloor => Palette {
            density: 0.8,
            kinds: &[(Oak, 4), (Pine, 3), (Bush, 2), (Rock, 1)],
        },
        GroundClass::Cobblestone => Palette {
            density: 0.25,
            kinds: &[(Crate, 2), (Lantern, 2)],
        },
        GroundClass::Grass => Palette {
            density: 0.45,
            kinds: &[(Oak, 2), (Bush, 2), (FlowerPatch, 1), (Rock, 1)],
        },
        GroundClass::Sand => Palette {
            density: 0.2,
            kinds: &[(Rock, 3), (Reeds, 1)],
        },
    };
    Some(palette)
}

/// Jittered-grid scatter driven by the world's seeded detail values.
///
/// The tile is split into a square grid of cells, one per slot; each slot
/// rolls its own position, acceptance, kind, rotation and scale.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScatterGenerator;

impl ScatterGenerator {
    fn cells_per_side(slots: u32) -> u32 {
        let mut n = 1;
        while n * n < slots {
            n += 1;
        }
        n
    }
}

impl DecorationGenerator for ScatterGenerator {
    fn name(&self) -> &str {
        "scatter"
    }

    fn generate(
        &self,
        world: &World,
        coord: TileCoord,
        out: &mut Vec<Decoration>,
    ) -> Result<(), TileBuildError> {
        let slots = world.streaming().decoration_slots;
        if slots == 0 {
            return Ok(());
        }
        let tile_size = world.tile_size();
        let origin = coord.origin(tile_size);
        let side = Self::cells_per_side(slots);
        let cell = tile_size / side as f32;
        for slot in 0..slots {
            let base = slot as i32 * SLOT_CHANNELS;
            let roll = |ch: i32| world.seeded_value(coord.cx, coord.cz, base + ch);
            let x = origin.x + ((slot % side) as f32 + roll(0)) * cell;
            let z = origin.z + ((slot / side) as f32 + roll(1)) * cell;
            let Some(palette) = palette_for(world.ground_at(x, z)) else {
                continue;
            };
            if roll(2) >= palette.density {
                continue;
            }
            let kind = palette.pick(roll(3));
            let y = world.height(x, z);
            if !y.is_finite() {
                return Err(TileBuildError::NonFiniteSample { coord, x, z });
            }
            out.push(Decoration {
                kind,
                position: [x, y, z],
                rotation: roll(4) * TAU,
                scale: kind.base_scale() * (0.75 + 0.5 * roll(5)),
                slot,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zion_world::{WorldConfig, ZoneId};

    fn world() -> World {
        World::new(WorldConfig::default()).unwrap()
    }

    fn scatter(w: &World, coord: TileCoord) -> Vec<Decoration> {
        let mut out = Vec::new();
        ScatterGenerator.generate(w, coord, &mut out).unwrap();
        out
    }

    #[test]
    fn cells_cover_all_slots() {
        assert_eq!(ScatterGenerator::cells_per_side(1), 1);
        assert_eq!(ScatterGenerator::cells_per_side(24), 5);
        assert_eq!(ScatterGenerator::cells_per_side(25), 5);
        assert_eq!(ScatterGenerator::cells_per_side(26), 6);
    }

    #[test]
    fn palette_pick_covers_weights() {
        let p = palette_for(GroundClass::Sand).unwrap();
        assert_eq!(p.pick(0.0), DecorationKind::Rock);
        assert_eq!(p.pick(0.74), DecorationKind::Rock);
        assert_eq!(p.pick(0.76), DecorationKind::Reeds);
        assert_eq!(p.pick(0.999_999), DecorationKind::Reeds);
    }

    #[test]
    fn plaza_and_paths_have_no_palette() {
        assert!(palette_for(GroundClass::Stone).is_none());
        assert!(palette_for(GroundClass::DirtPath).is_none());
    }

    #[test]
    fn scatter_is_reproducible() {
        let w = world();
        let coord = TileCoord::new(-3, 1);
        assert_eq!(scatter(&w, coord), scatter(&w, coord));
        assert_ne!(scatter(&w, coord), scatter(&w, coord.offset(1, 0)));
    }

    #[test]
    fn decorations_stay_inside_their_tile() {
        let w = world();
        let ts = w.tile_size();
        for coord in TileCoord::new(0, 0).square_neighborhood(4) {
            let o = coord.origin(ts);
            for d in scatter(&w, coord) {
                let [x, y, z] = d.position;
                assert!(x >= o.x && x <= o.x + ts);
                assert!(z >= o.z && z <= o.z + ts);
                assert_eq!(y, w.height(x, z));
                assert!(d.rotation >= 0.0 && d.rotation < TAU);
            }
        }
    }

    #[test]
    fn nothing_grows_on_paths_or_the_plaza() {
        let w = world();
        for coord in TileCoord::new(0, 0).square_neighborhood(4) {
            for d in scatter(&w, coord) {
                let [x, _, z] = d.position;
                assert_ne!(w.ground_at(x, z), GroundClass::DirtPath);
                assert_ne!(w.ground_at(x, z), GroundClass::Stone);
            }
        }
    }

    #[test]
    fn forest_tiles_are_decorated() {
        let w = world();
        let (x, z) = w.zone_center(ZoneId::Wilds);
        let coord = w.tile_coord_at(x, z);
        let decorations = scatter(&w, coord);
        assert!(!decorations.is_empty());
    }
}
