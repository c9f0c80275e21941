use crate::world::{World, sanitize};
use crate::zone::{GroundClass, ZoneId};

/// Nearest hub path to a query point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathSample {
    /// Zone the path leads to from the hub.
    pub zone: ZoneId,
    pub distance: f32,
    /// Position along the path, 0 at the hub center and 1 at the zone center.
    pub t: f32,
}

impl World {
    /// Zone with the smallest radius-normalized distance; the first minimum wins ties.
    pub fn zone_at(&self, x: f32, z: f32) -> ZoneId {
        let p = sanitize(x, z);
        let mut best = ZoneId::HUB;
        let mut best_d = f32::INFINITY;
        for zone in self.zones().iter() {
            let d = zone.normalized_distance(p);
            if d < best_d {
                best_d = d;
                best = zone.id;
            }
        }
        best
    }

    /// Flattening weight of one zone at `(x, z)`.
    pub fn zone_weight(&self, id: ZoneId, x: f32, z: f32) -> f32 {
        self.zone(id).flatten_weight(sanitize(x, z))
    }

    /// Closest hub path within the path half-width, if any.
    pub fn path_at(&self, x: f32, z: f32) -> Option<PathSample> {
        let p = sanitize(x, z);
        let half_width = self.config().paths.half_width;
        let mut best: Option<PathSample> = None;
        for zone in self.zones().non_hub() {
            let Some(seg) = self.zones().path(zone.id) else {
                continue;
            };
            let distance = seg.distance(p);
            if distance >= half_width {
                continue;
            }
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(PathSample {
                    zone: zone.id,
                    distance,
                    t: seg.project(p),
                });
            }
        }
        best
    }

    /// Ground material at `(x, z)`: dirt on a path outside flat interiors,
    /// otherwise the ground of the classified zone.
    pub fn ground_at(&self, x: f32, z: f32) -> GroundClass {
        let p = sanitize(x, z);
        let in_flat = self
            .zones()
            .iter()
            .any(|zone| zone.distance(p) <= zone.flat_radius());
        if !in_flat {
            if let Some(path) = self.path_at(p.x, p.z) {
                if path.distance <= self.config().paths.ground_width {
                    return GroundClass::DirtPath;
                }
            }
        }
        self.zone(self.zone_at(p.x, p.z)).ground
    }
}
