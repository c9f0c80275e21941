use serde::{Deserialize, Serialize};
use zion_geom::Vec2;

/// Integer address of a square terrain tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub cx: i32,
    pub cz: i32,
}

impl TileCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    /// Tile containing world position `(x, z)`: floor division by `tile_size`.
    #[inline]
    pub fn from_world(x: f32, z: f32, tile_size: f32) -> Self {
        Self {
            cx: (x / tile_size).floor() as i32,
            cz: (z / tile_size).floor() as i32,
        }
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            cx: self.cx.saturating_add(dx),
            cz: self.cz.saturating_add(dz),
        }
    }

    /// World position of the tile's minimum corner.
    #[inline]
    pub fn origin(self, tile_size: f32) -> Vec2 {
        Vec2::new(self.cx as f32 * tile_size, self.cz as f32 * tile_size)
    }

    /// Tile distance in the max norm, saturating at `i32::MAX`.
    #[inline]
    pub fn chebyshev(self, other: TileCoord) -> i32 {
        let dx = (i64::from(self.cx) - i64::from(other.cx)).abs();
        let dz = (i64::from(self.cz) - i64::from(other.cz)).abs();
        dx.max(dz).min(i64::from(i32::MAX)) as i32
    }

    /// Every coordinate within `radius` (max norm), row-major by `cz` then `cx`.
    pub fn square_neighborhood(self, radius: i32) -> impl Iterator<Item = TileCoord> {
        let r = radius.max(0);
        (-r..=r).flat_map(move |dz| (-r..=r).map(move |dx| self.offset(dx, dz)))
    }
}

impl From<(i32, i32)> for TileCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<TileCoord> for (i32, i32) {
    fn from(value: TileCoord) -> Self {
        (value.cx, value.cz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_division_handles_negatives() {
        assert_eq!(TileCoord::from_world(0.0, 0.0, 64.0), TileCoord::new(0, 0));
        assert_eq!(TileCoord::from_world(63.9, 64.0, 64.0), TileCoord::new(0, 1));
        assert_eq!(TileCoord::from_world(-0.1, -64.0, 64.0), TileCoord::new(-1, -1));
        assert_eq!(TileCoord::from_world(-64.1, 200.0, 64.0), TileCoord::new(-2, 3));
    }

    #[test]
    fn neighborhood_is_square_and_complete() {
        let c = TileCoord::new(5, -2);
        let all: Vec<_> = c.square_neighborhood(3).collect();
        assert_eq!(all.len(), 49);
        assert!(all.iter().all(|t| t.chebyshev(c) <= 3));
        assert!(all.contains(&TileCoord::new(8, 1)));
        assert!(all.contains(&TileCoord::new(2, -5)));
        assert_eq!(c.square_neighborhood(0).collect::<Vec<_>>(), vec![c]);
    }

    #[test]
    fn arithmetic_saturates_at_the_lattice_edge() {
        let edge = TileCoord::new(i32::MAX, i32::MIN);
        assert_eq!(edge.offset(1, -1), edge);
        assert_eq!(edge.offset(-1, 1), TileCoord::new(i32::MAX - 1, i32::MIN + 1));
        assert_eq!(edge.chebyshev(TileCoord::new(i32::MIN, i32::MAX)), i32::MAX);
        assert_eq!(edge.chebyshev(edge.offset(-3, 2)), 3);
        assert_eq!(edge.square_neighborhood(2).count(), 25);
    }
}
