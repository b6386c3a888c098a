//! Spatial bins for SAH split evaluation.

use beam_math::{Aabb, Axis, Vec3};

use crate::primitive::Primitive;

/// A bounded slab along one axis that accumulates geometry for SAH
/// binning.
///
/// Two separate accumulators are kept: `aabb` grows from centroid
/// membership (object binning), while `clipped` grows from geometry
/// actually clipped to the slab (spatial binning). The clipped box is
/// never wider than the slab along the bin axis, but it is at least as
/// wide as the centroid box there.
#[derive(Debug, Clone)]
pub struct SpatialBin {
    axis: Axis,
    start: f32,
    end: f32,

    /// Centroid-membership accumulator
    pub aabb: Aabb,
    /// Accumulator of geometry clipped to the slab
    pub clipped: Aabb,
    /// Number of centroid members
    pub count: u32,
    /// References whose extent begins in this bin
    pub entry: u32,
    /// References whose extent ends in this bin
    pub exit: u32,
}

impl SpatialBin {
    /// Create an empty bin covering `[start, end]` along `axis`.
    pub fn new(axis: Axis, start: f32, end: f32) -> Self {
        debug_assert!(start < end, "bin slab must have positive extent");
        Self {
            axis,
            start,
            end,
            aabb: Aabb::EMPTY,
            clipped: Aabb::EMPTY,
            count: 0,
            entry: 0,
            exit: 0,
        }
    }

    /// The bin's axis.
    #[inline]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Slab start position along the axis.
    #[inline]
    pub fn start(&self) -> f32 {
        self.start
    }

    /// Slab end position along the axis.
    #[inline]
    pub fn end(&self) -> f32 {
        self.end
    }

    /// Add a centroid point to the membership accumulator.
    pub fn add_point(&mut self, p: Vec3) {
        self.aabb.grow(p);
        self.count += 1;
    }

    /// Add a member primitive's bounds to the membership accumulator.
    pub fn add_bounds(&mut self, bounds: &Aabb) {
        self.aabb.grow_aabb(bounds);
        self.count += 1;
    }

    /// Clip a primitive to the slab and grow the clipped accumulator by
    /// the result. Primitives that do not reach the slab contribute
    /// nothing.
    pub fn clip_and_add(&mut self, primitive: &Primitive) {
        let fragment = primitive.clip_to_slab(self.axis, self.start, self.end);
        if !fragment.is_empty() {
            self.clipped.grow_aabb(&fragment);
        }
    }

    /// Grow the clipped accumulator by an already-clipped fragment box.
    pub fn add_clipped(&mut self, fragment: &Aabb) {
        if !fragment.is_empty() {
            self.clipped.grow_aabb(fragment);
        }
    }

    /// Left split plane as a (position, normal) pair. The normal points
    /// into the slab.
    pub fn split_plane_left(&self) -> (Vec3, Vec3) {
        let direction = self.axis.unit();
        (direction * self.start, direction)
    }

    /// Right split plane as a (position, normal) pair. The normal points
    /// into the slab.
    pub fn split_plane_right(&self) -> (Vec3, Vec3) {
        let direction = self.axis.unit();
        (direction * self.end, -direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sphere::Sphere;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_split_planes() {
        let bin = SpatialBin::new(Axis::X, 2.0, 5.0);

        let (left_pos, left_normal) = bin.split_plane_left();
        assert_eq!(left_pos, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(left_normal, Vec3::X);

        let (right_pos, right_normal) = bin.split_plane_right();
        assert_eq!(right_pos, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(right_normal, -Vec3::X);
    }

    #[test]
    fn test_split_planes_other_axis() {
        let bin = SpatialBin::new(Axis::Y, -3.0, -1.0);

        let (left_pos, left_normal) = bin.split_plane_left();
        assert_eq!(left_pos, Vec3::new(0.0, -3.0, 0.0));
        assert_eq!(left_normal, Vec3::Y);

        let (right_pos, right_normal) = bin.split_plane_right();
        assert_eq!(right_pos, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(right_normal, -Vec3::Y);
    }

    #[test]
    fn test_centroid_accumulator() {
        let mut bin = SpatialBin::new(Axis::X, 0.0, 1.0);
        bin.add_point(Vec3::new(0.25, 1.0, -1.0));
        bin.add_point(Vec3::new(0.75, 2.0, 0.0));

        assert_eq!(bin.count, 2);
        assert_eq!(bin.aabb.min, Vec3::new(0.25, 1.0, -1.0));
        assert_eq!(bin.aabb.max, Vec3::new(0.75, 2.0, 0.0));
        assert!(bin.clipped.is_empty());
    }

    #[test]
    fn test_clipped_extent_is_exactly_the_slab() {
        // Accumulate random points inside the unit sphere, then clip-add
        // random spheres that straddle both bin planes. The clipped
        // accumulator must end up spanning exactly the slab on the bin
        // axis, no matter how large the primitives are.
        let mut rng = StdRng::seed_from_u64(42);
        let mut bin = SpatialBin::new(Axis::X, -1.0, 1.0);

        for _ in 0..1000 {
            let p = loop {
                let candidate = Vec3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                );
                if candidate.length_squared() < 1.0 {
                    break candidate;
                }
            };
            bin.add_point(p);
        }

        for _ in 0..1000 {
            let center = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            let radius = rng.gen_range(2.0..3.0);
            let sphere = Primitive::Sphere(Sphere::new(center, radius, 0));
            bin.clip_and_add(&sphere);
        }

        // Clipped contributions cannot exceed the slab
        assert_eq!(bin.clipped.min.x, -1.0);
        assert_eq!(bin.clipped.max.x, 1.0);

        // The centroid accumulator stays inside the unit sphere
        assert!(bin.aabb.min.x >= -1.0 && bin.aabb.max.x <= 1.0);
        assert_eq!(bin.count, 1000);
    }
}
