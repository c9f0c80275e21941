//! Terrain tile buffers and per-tile decoration generation.
#![forbid(unsafe_code)]

pub mod decor;
mod error;
pub mod sway;

pub use decor::{Decoration, DecorationGenerator, DecorationKind, ScatterGenerator};
pub use error::TileBuildError;
pub use sway::{SwayState, advance_sway, sway_states};

use zion_geom::Vec2;
use zion_world::{GroundClass, TileCoord, World, ZoneId};

/// Sampled surface of one tile: a `resolution x resolution` grid spanning the
/// tile including its far edges, so neighbours share identical edge samples.
#[derive(Clone, Debug)]
pub struct TileBuf {
    pub coord: TileCoord,
    pub resolution: usize,
    pub tile_size: f32,
    pub heights: Vec<f32>,
    pub zones: Vec<ZoneId>,
    pub ground: Vec<GroundClass>,
    pub normals: Vec<[f32; 3]>,
    pub min_height: f32,
    pub max_height: f32,
}

impl TileBuf {
    #[inline]
    pub fn idx(&self, i: usize, j: usize) -> usize {
        j * self.resolution + i
    }

    #[inline]
    pub fn spacing(&self) -> f32 {
        self.tile_size / (self.resolution - 1) as f32
    }

    #[inline]
    pub fn height_local(&self, i: usize, j: usize) -> f32 {
        self.heights[self.idx(i, j)]
    }

    #[inline]
    pub fn world_position(&self, i: usize, j: usize) -> Vec2 {
        sample_position(self.coord, self.resolution, self.tile_size, i, j)
    }

    #[inline]
    pub fn origin(&self) -> Vec2 {
        self.coord.origin(self.tile_size)
    }

    #[inline]
    pub fn contains_world(&self, x: f32, z: f32) -> bool {
        let o = self.origin();
        x >= o.x && x <= o.x + self.tile_size && z >= o.z && z <= o.z + self.tile_size
    }

    /// Bilinear height from the sampled grid; `None` outside the tile.
    pub fn height_at_world(&self, x: f32, z: f32) -> Option<f32> {
        if !self.contains_world(x, z) {
            return None;
        }
        let o = self.origin();
        let last = (self.resolution - 1) as f32;
        let fx = ((x - o.x) / self.spacing()).clamp(0.0, last);
        let fz = ((z - o.z) / self.spacing()).clamp(0.0, last);
        let i0 = (fx.floor() as usize).min(self.resolution - 2);
        let j0 = (fz.floor() as usize).min(self.resolution - 2);
        let u = fx - i0 as f32;
        let v = fz - j0 as f32;
        let h00 = self.height_local(i0, j0);
        let h10 = self.height_local(i0 + 1, j0);
        let h01 = self.height_local(i0, j0 + 1);
        let h11 = self.height_local(i0 + 1, j0 + 1);
        let a = h00 + (h10 - h00) * u;
        let b = h01 + (h11 - h01) * u;
        Some(a + (b - a) * v)
    }

    /// Samples the world over the tile grid.
    pub fn sample(world: &World, coord: TileCoord) -> Result<Self, TileBuildError> {
        let resolution = world.streaming().tile_resolution;
        let tile_size = world.tile_size();
        let normal_step = tile_size / (resolution - 1) as f32 * 0.5;
        let count = resolution * resolution;
        let mut heights = Vec::with_capacity(count);
        let mut zones = Vec::with_capacity(count);
        let mut ground = Vec::with_capacity(count);
        let mut normals = Vec::with_capacity(count);
        let mut min_height = f32::INFINITY;
        let mut max_height = f32::NEG_INFINITY;
        for j in 0..resolution {
            for i in 0..resolution {
                let p = sample_position(coord, resolution, tile_size, i, j);
                let h = world.height(p.x, p.z);
                if !h.is_finite() {
                    return Err(TileBuildError::NonFiniteSample {
                        coord,
                        x: p.x,
                        z: p.z,
                    });
                }
                min_height = min_height.min(h);
                max_height = max_height.max(h);
                heights.push(h);
                zones.push(world.zone_at(p.x, p.z));
                ground.push(world.ground_at(p.x, p.z));
                normals.push(world.normal(p.x, p.z, normal_step));
            }
        }
        Ok(Self {
            coord,
            resolution,
            tile_size,
            heights,
            zones,
            ground,
            normals,
            min_height,
            max_height,
        })
    }

    /// Zone covering most of the tile's samples; ties go to the earlier zone id.
    pub fn dominant_zone(&self) -> ZoneId {
        let mut counts = [0usize; zion_world::ZONE_COUNT];
        for z in &self.zones {
            counts[z.index()] += 1;
        }
        let mut best = ZoneId::HUB;
        for id in ZoneId::ALL {
            if counts[id.index()] > counts[best.index()] {
                best = id;
            }
        }
        best
    }
}

/// World position of grid sample `(i, j)`.
///
/// Positions come from the global lattice index, so the last column of one
/// tile and the first column of its neighbour evaluate to the same coordinate.
#[inline]
pub fn sample_position(coord: TileCoord, resolution: usize, tile_size: f32, i: usize, j: usize) -> Vec2 {
    let cells = (resolution - 1) as i64;
    let spacing = f64::from(tile_size) / cells as f64;
    let gx = i64::from(coord.cx) * cells + i as i64;
    let gz = i64::from(coord.cz) * cells + j as i64;
    Vec2::new((gx as f64 * spacing) as f32, (gz as f64 * spacing) as f32)
}

/// A fully built tile: sampled geometry plus every decoration.
#[derive(Clone, Debug)]
pub struct Tile {
    pub coord: TileCoord,
    pub geometry: TileBuf,
    pub decorations: Vec<Decoration>,
}

impl Tile {
    #[inline]
    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    /// Approximate heap footprint, for stream statistics.
    pub fn footprint_bytes(&self) -> usize {
        let g = &self.geometry;
        g.heights.len() * std::mem::size_of::<f32>()
            + g.zones.len() * std::mem::size_of::<ZoneId>()
            + g.ground.len() * std::mem::size_of::<GroundClass>()
            + g.normals.len() * std::mem::size_of::<[f32; 3]>()
            + self.decorations.len() * std::mem::size_of::<Decoration>()
    }
}

/// Builds a tile from pure functions of its coordinate.
///
/// Either every stage succeeds and a complete [`Tile`] comes back, or the
/// first failure is returned and nothing partial escapes.
pub fn build_tile(
    world: &World,
    coord: TileCoord,
    generators: &[Box<dyn DecorationGenerator>],
) -> Result<Tile, TileBuildError> {
    let geometry = TileBuf::sample(world, coord)?;
    let mut decorations = Vec::new();
    for generator in generators {
        generator.generate(world, coord, &mut decorations)?;
    }
    log::trace!(
        target: "stream",
        "built tile ({}, {}) decorations={} h=[{:.2}, {:.2}]",
        coord.cx,
        coord.cz,
        decorations.len(),
        geometry.min_height,
        geometry.max_height
    );
    Ok(Tile {
        coord,
        geometry,
        decorations,
    })
}
