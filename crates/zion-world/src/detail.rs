use crate::noise::{hash_u32, unit_from_bits};

/// Reproducible value in `[0, 1)` for a `(a, b, c)` triple, typically
/// `(tile cx, tile cz, slot index)`.
#[inline]
pub fn seeded_value(a: i32, b: i32, c: i32) -> f32 {
    seeded_value_with_seed(a, b, c, 0)
}

#[inline]
pub fn seeded_value_with_seed(a: i32, b: i32, c: i32, seed: u32) -> f32 {
    let inner = hash_u32(c, 0x5bd1_e995, seed ^ 0xA511_E9B3);
    unit_from_bits(hash_u32(a, b, inner))
}
