//! Character-cell overview of zones, paths and relief for operator logs.

use zion_geom::Vec2;

use crate::World;
use crate::zone::GroundClass;

/// Sampling window for [`render_ascii`].
#[derive(Clone, Copy, Debug)]
pub struct OverviewRegion {
    pub center: Vec2,
    pub half_extent: f32,
    pub cols: usize,
    pub rows: usize,
}

impl Default for OverviewRegion {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            half_extent: 300.0,
            cols: 72,
            rows: 36,
        }
    }
}

/// One character per cell: `#` on paths, the zone initial (uppercase inside the
/// flat interior) near zones, and a relief glyph elsewhere.
pub fn render_ascii(world: &World, region: &OverviewRegion) -> String {
    let cols = region.cols.max(1);
    let rows = region.rows.max(1);
    let span = region.half_extent.max(1.0) * 2.0;
    let mut out = String::with_capacity((cols + 1) * rows);
    for row in 0..rows {
        let z = region.center.z - region.half_extent + span * (row as f32 + 0.5) / rows as f32;
        for col in 0..cols {
            let x = region.center.x - region.half_extent + span * (col as f32 + 0.5) / cols as f32;
            out.push(cell_glyph(world, x, z));
        }
        out.push('\n');
    }
    out
}

fn cell_glyph(world: &World, x: f32, z: f32) -> char {
    if world.ground_at(x, z) == GroundClass::DirtPath {
        return '#';
    }
    let id = world.zone_at(x, z);
    let zone = world.zone(id);
    let d = zone.distance(Vec2::new(x, z));
    let initial = id.name().chars().next().unwrap_or('?');
    if d <= zone.flat_radius() {
        return initial.to_ascii_uppercase();
    }
    if d <= zone.blend_radius() {
        return initial;
    }
    relief_glyph(world.height(x, z))
}

fn relief_glyph(h: f32) -> char {
    const RAMP: [char; 6] = ['~', '-', ' ', '.', ':', '^'];
    let t = ((h + 15.0) / 30.0).clamp(0.0, 0.999);
    RAMP[(t * RAMP.len() as f32) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worldgen::WorldConfig;

    #[test]
    fn renders_requested_grid() {
        let world = World::new(WorldConfig::default()).unwrap();
        let region = OverviewRegion {
            cols: 21,
            rows: 11,
            ..OverviewRegion::default()
        };
        let map = render_ascii(&world, &region);
        let lines: Vec<&str> = map.lines().collect();
        assert_eq!(lines.len(), 11);
        assert!(lines.iter().all(|l| l.chars().count() == 21));
        // center cell sits on the hub plaza
        assert_eq!(lines[5].chars().nth(10), Some('N'));
    }
}
