use crate::Vec3;

/// A ray in 3D space with an origin and a direction.
///
/// Represents the half-line `origin + t * direction` for `t >= 0`. The
/// direction does not have to be normalized; hit distances are reported in
/// units of its length. A zero direction never hits anything.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
