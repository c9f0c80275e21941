//! Integer hashing and lattice value noise.
//!
//! Everything here is a pure function of its arguments. The hash is a
//! multiply/xor/shift mix, so results are identical on every platform.

/// Scale mapping the low 24 hash bits onto `[0, 1)`.
const UNIT_SCALE: f32 = 1.0 / 16_777_216.0;

/// Mixes a lattice point and a seed into 32 well-avalanched bits.
#[inline]
pub fn hash_u32(ix: i32, iz: i32, seed: u32) -> u32 {
    let mut h = (ix as u32).wrapping_mul(0x85eb_ca6b)
        ^ (iz as u32).wrapping_mul(0xc2b2_ae35)
        ^ seed.wrapping_mul(0x27d4_eb2d);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846c_a68b);
    h ^= h >> 16;
    h
}

/// Maps hash bits onto `[0, 1)`.
#[inline]
pub fn unit_from_bits(h: u32) -> f32 {
    ((h & 0x00FF_FFFF) as f32) * UNIT_SCALE
}

/// Unseeded lattice hash in `[0, 1)`.
#[inline]
pub fn hash2d(ix: i32, iz: i32) -> f32 {
    hash2d_seeded(ix, iz, 0)
}

#[inline]
pub fn hash2d_seeded(ix: i32, iz: i32, seed: u32) -> f32 {
    unit_from_bits(hash_u32(ix, iz, seed.wrapping_add(0x9E37_79B9)))
}

/// Cubic ease `3t^2 - 2t^3`, with `t` clamped to `[0, 1]`.
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Smoothstep of `x` between `edge0` and `edge1`.
#[inline]
pub fn smoothstep_between(edge0: f32, edge1: f32, x: f32) -> f32 {
    let span = edge1 - edge0;
    if span.abs() <= f32::EPSILON {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    smoothstep((x - edge0) / span)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Unseeded value noise in `[0, 1)`.
#[inline]
pub fn value_noise_2d(x: f32, z: f32) -> f32 {
    value_noise_2d_seeded(x, z, 0)
}

/// Bilinear value noise over the hash lattice with smoothstep-shaped weights.
///
/// The interpolation weights have zero slope at every lattice line, so the
/// field is C1 across cell boundaries.
pub fn value_noise_2d_seeded(x: f32, z: f32, seed: u32) -> f32 {
    let x0 = x.floor();
    let z0 = z.floor();
    let ix = x0 as i32;
    let iz = z0 as i32;
    let u = smoothstep(x - x0);
    let v = smoothstep(z - z0);

    let h00 = hash2d_seeded(ix, iz, seed);
    let h10 = hash2d_seeded(ix.wrapping_add(1), iz, seed);
    let h01 = hash2d_seeded(ix, iz.wrapping_add(1), seed);
    let h11 = hash2d_seeded(ix.wrapping_add(1), iz.wrapping_add(1), seed);

    lerp(lerp(h00, h10, u), lerp(h01, h11, u), v)
}

/// Per-octave seed so octaves do not share a lattice.
#[inline]
pub fn octave_seed(world_seed: u32, octave: usize) -> u32 {
    world_seed ^ (octave as u32).wrapping_add(1).wrapping_mul(0x9E37_79B9)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_and_in_unit_range() {
        for ix in -50..50 {
            for iz in -50..50 {
                let a = hash2d(ix, iz);
                assert_eq!(a.to_bits(), hash2d(ix, iz).to_bits());
                assert!((0.0..1.0).contains(&a));
            }
        }
    }

    #[test]
    fn hash_depends_on_seed() {
        let differing = (0..64)
            .filter(|&i| hash2d_seeded(i, -i, 1) != hash2d_seeded(i, -i, 2))
            .count();
        assert!(differing > 60);
    }

    #[test]
    fn hash_spreads_across_buckets() {
        let mut buckets = [0u32; 10];
        for ix in 0..100 {
            for iz in 0..100 {
                let b = (hash2d(ix, iz) * 10.0) as usize;
                buckets[b.min(9)] += 1;
            }
        }
        for count in buckets {
            assert!(count > 800 && count < 1200, "bucket count {count}");
        }
    }

    #[test]
    fn noise_hits_lattice_values() {
        for ix in -3..3 {
            for iz in -3..3 {
                let n = value_noise_2d(ix as f32, iz as f32);
                assert_eq!(n, hash2d(ix, iz));
            }
        }
    }

    #[test]
    fn noise_is_continuous_across_cell_edges() {
        let step = 1e-3;
        let mut x = -2.0f32;
        let mut prev = value_noise_2d(x, 0.37);
        while x < 2.0 {
            x += step;
            let cur = value_noise_2d(x, 0.37);
            // max slope of a smoothstep-weighted cell is 1.5 per unit
            assert!((cur - prev).abs() <= 1.5 * step + 1e-5);
            prev = cur;
        }
    }

    #[test]
    fn smoothstep_endpoints_and_midpoint() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert_eq!(smoothstep(-4.0), 0.0);
        assert_eq!(smoothstep(7.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(smoothstep_between(2.0, 2.0, 1.0), 0.0);
        assert_eq!(smoothstep_between(2.0, 2.0, 3.0), 1.0);
    }
}
