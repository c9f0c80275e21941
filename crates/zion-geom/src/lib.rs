//! Planar geometry for terrain crates: a 2D vector on the XZ plane and segment helpers.
#![forbid(unsafe_code)]

use core::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};

/// Denominator guard for degenerate segments.
pub const SEGMENT_EPSILON: f32 = 1e-6;

/// A point or direction on the horizontal (XZ) plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Vec2 {
    pub x: f32,
    pub z: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, z: 0.0 };

    #[inline]
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    #[inline]
    pub fn dot(self, rhs: Vec2) -> f32 {
        self.x * rhs.x + self.z * rhs.z
    }

    #[inline]
    pub fn length_sq(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_sq().sqrt()
    }

    #[inline]
    pub fn distance(self, other: Vec2) -> f32 {
        (self - other).length()
    }

    #[inline]
    pub fn lerp(self, other: Vec2, t: f32) -> Vec2 {
        self + (other - self) * t
    }

    #[inline]
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        if len > 0.0 { self / len } else { self }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.z.is_finite()
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from(value: (f32, f32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<Vec2> for (f32, f32) {
    fn from(value: Vec2) -> Self {
        (value.x, value.z)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.z + rhs.z)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.z += rhs.z;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.z - rhs.z)
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.z -= rhs.z;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn div(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x / rhs, self.z / rhs)
    }
}

/// Parameter `t` in `[0, 1]` of the point on segment `a..b` closest to `p`.
///
/// A degenerate segment (`a == b`) projects everything onto `a` (`t == 0`).
#[inline]
pub fn project_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq < SEGMENT_EPSILON {
        return 0.0;
    }
    ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
}

/// Point on segment `a..b` closest to `p`.
#[inline]
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    a.lerp(b, project_point_on_segment(p, a, b))
}

/// Euclidean distance from `p` to the segment `a..b`.
#[inline]
pub fn distance_point_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    p.distance(closest_point_on_segment(p, a, b))
}

/// A straight segment between two planar points.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

impl Segment {
    #[inline]
    pub const fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.a.distance(self.b)
    }

    #[inline]
    pub fn project(&self, p: Vec2) -> f32 {
        project_point_on_segment(p, self.a, self.b)
    }

    #[inline]
    pub fn distance(&self, p: Vec2) -> f32 {
        distance_point_to_segment(p, self.a, self.b)
    }

    #[inline]
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.a.lerp(self.b, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_clamps_to_endpoints() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert_eq!(project_point_on_segment(Vec2::new(-5.0, 3.0), a, b), 0.0);
        assert_eq!(project_point_on_segment(Vec2::new(15.0, -3.0), a, b), 1.0);
        assert!((project_point_on_segment(Vec2::new(2.5, 7.0), a, b) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn degenerate_segment_measures_to_endpoint() {
        let a = Vec2::new(3.0, 4.0);
        let p = Vec2::new(0.0, 0.0);
        assert_eq!(project_point_on_segment(p, a, a), 0.0);
        assert!((distance_point_to_segment(p, a, a) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn perpendicular_distance_to_interior() {
        let seg = Segment::new(Vec2::new(-4.0, 1.0), Vec2::new(4.0, 1.0));
        assert!((seg.distance(Vec2::new(1.5, -2.0)) - 3.0).abs() < 1e-6);
        assert_eq!(seg.point_at(0.5), Vec2::new(0.0, 1.0));
    }
}
