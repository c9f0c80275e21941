use zion_geom::Vec2;

use crate::noise::{lerp, octave_seed, smoothstep, value_noise_2d_seeded};
use crate::world::{World, sanitize};

/// Moves `h` toward `target` by `w`. `w == 1` yields `target` exactly, `w == 0` yields `h`.
#[inline]
fn blend(h: f32, target: f32, w: f32) -> f32 {
    h * (1.0 - w) + target * w
}

impl World {
    /// Terrain elevation at `(x, z)`.
    ///
    /// Noise octaves first, then every zone's flattening, then every hub path,
    /// each pass walking the zone table in `ZoneId::ALL` order. Path strength is
    /// scaled by `1 - max zone weight`, so flat interiors stay exactly at their
    /// base elevation.
    pub fn height(&self, x: f32, z: f32) -> f32 {
        let p = sanitize(x, z);
        let mut h = self.noise_height_at(p);

        let mut zone_mask = 0.0f32;
        for zone in self.zones().iter() {
            let w = zone.flatten_weight(p);
            if w > 0.0 {
                h = blend(h, zone.base_elevation, w);
                zone_mask = zone_mask.max(w);
            }
        }

        let open = 1.0 - zone_mask;
        if open <= 0.0 {
            return h;
        }
        let paths = &self.config().paths;
        let hub = self.zones().hub();
        for zone in self.zones().non_hub() {
            let Some(seg) = self.zones().path(zone.id) else {
                continue;
            };
            let d = seg.distance(p);
            if d >= paths.half_width {
                continue;
            }
            let t = seg.project(p);
            let target = lerp(hub.base_elevation, zone.base_elevation, t);
            let strength = (1.0 - smoothstep(d / paths.half_width)) * paths.dominance * open;
            h = blend(h, target, strength);
        }
        h
    }

    /// Unflattened octave sum minus the baseline.
    pub fn noise_height(&self, x: f32, z: f32) -> f32 {
        self.noise_height_at(sanitize(x, z))
    }

    fn noise_height_at(&self, p: Vec2) -> f32 {
        let noise = &self.config().noise;
        let seed = self.seed();
        let mut sum = 0.0f32;
        for (i, octave) in noise.octaves.iter().enumerate() {
            let n = value_noise_2d_seeded(
                p.x * octave.frequency,
                p.z * octave.frequency,
                octave_seed(seed, i),
            );
            sum += n * octave.amplitude;
        }
        sum - noise.baseline
    }

    /// Surface normal from central differences of [`World::height`].
    pub fn normal(&self, x: f32, z: f32, step: f32) -> [f32; 3] {
        let step = if step.is_finite() && step > 0.0 { step } else { 1.0 };
        let dx = self.height(x + step, z) - self.height(x - step, z);
        let dz = self.height(x, z + step) - self.height(x, z - step);
        let n = [-dx, 2.0 * step, -dz];
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        [n[0] / len, n[1] / len, n[2] / len]
    }
}
