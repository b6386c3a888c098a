//! SAH split search over binned references.

use beam_math::{Aabb, Axis};

use super::bin::SpatialBin;
use crate::primitive::Primitive;

/// A reference to a primitive with its (possibly clipped) bounds.
///
/// Spatial splits duplicate references into both children with bounds
/// clipped at the split plane, so several references can point at the
/// same primitive.
#[derive(Debug, Clone, Copy)]
pub(super) struct Reference {
    pub prim: u32,
    pub bounds: Aabb,
}

impl Reference {
    pub fn new(prim: u32, bounds: Aabb) -> Self {
        Self { prim, bounds }
    }
}

/// How a candidate split partitions references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SplitKind {
    /// Partition by centroid bin. References keep their bounds.
    Object,
    /// Partition by plane position. Straddlers are clipped into both sides.
    Spatial,
}

/// A candidate split plane with the partition it would produce.
#[derive(Debug, Clone, Copy)]
pub(super) struct Split {
    pub axis: Axis,
    pub position: f32,
    /// Index of the last bin on the left side of the plane.
    pub bin: usize,
    pub left: Aabb,
    pub right: Aabb,
    pub left_count: u32,
    pub right_count: u32,
    pub kind: SplitKind,
}

impl Split {
    /// SAH cost of this partition. Recomputed from the stored boxes each
    /// time so that the value always reflects the current fields.
    pub fn cost(&self) -> f32 {
        self.left_count as f32 * self.left.surface_area()
            + self.right_count as f32 * self.right.surface_area()
    }

    /// Surface area of the overlap between the two child boxes.
    pub fn overlap_area(&self) -> f32 {
        Aabb::intersection(&self.left, &self.right).surface_area()
    }
}

/// Bin index for a coordinate, clamped into `0..bin_count`.
///
/// `scale` is `bin_count / extent`. Values below `start` land in bin 0
/// because the float-to-int cast saturates.
#[inline]
pub(super) fn bin_index(value: f32, start: f32, scale: f32, bin_count: usize) -> usize {
    (((value - start) * scale) as usize).min(bin_count - 1)
}

/// Search all three axes for the cheapest object split.
///
/// References are binned by the centroid of their bounds over the
/// centroid extent of the node. Returns None when every axis is
/// degenerate (all centroids coincide) or no boundary separates the
/// references.
pub(super) fn find_object_split(
    refs: &[Reference],
    centroid_bounds: &Aabb,
    bin_count: usize,
) -> Option<Split> {
    let mut best: Option<Split> = None;
    let mut best_cost = f32::INFINITY;

    for axis in Axis::ALL {
        let i = axis.index();
        let start = centroid_bounds.min[i];
        let extent = centroid_bounds.extent()[i];
        if extent <= 0.0 {
            continue;
        }
        let scale = bin_count as f32 / extent;
        let width = extent / bin_count as f32;

        // Adjacent bins share the exact same boundary value
        let mut bins: Vec<SpatialBin> = (0..bin_count)
            .map(|b| {
                SpatialBin::new(
                    axis,
                    start + b as f32 * width,
                    start + (b + 1) as f32 * width,
                )
            })
            .collect();

        for reference in refs {
            let bin = bin_index(reference.bounds.centroid()[i], start, scale, bin_count);
            bins[bin].add_bounds(&reference.bounds);
        }

        // Accumulate suffix boxes and counts right to left
        let mut right_boxes = vec![Aabb::EMPTY; bin_count];
        let mut right_counts = vec![0u32; bin_count];
        let mut accum = Aabb::EMPTY;
        let mut count = 0u32;
        for b in (1..bin_count).rev() {
            accum.grow_aabb(&bins[b].aabb);
            count += bins[b].count;
            right_boxes[b] = accum;
            right_counts[b] = count;
        }

        // Sweep boundaries left to right
        let mut left_box = Aabb::EMPTY;
        let mut left_count = 0u32;
        for b in 0..bin_count - 1 {
            left_box.grow_aabb(&bins[b].aabb);
            left_count += bins[b].count;
            let right_count = right_counts[b + 1];
            if left_count == 0 || right_count == 0 {
                continue;
            }
            let cost = left_count as f32 * left_box.surface_area()
                + right_count as f32 * right_boxes[b + 1].surface_area();
            if cost < best_cost {
                best_cost = cost;
                best = Some(Split {
                    axis,
                    position: bins[b].end(),
                    bin: b,
                    left: left_box,
                    right: right_boxes[b + 1],
                    left_count,
                    right_count,
                    kind: SplitKind::Object,
                });
            }
        }
    }

    best
}

/// Search all three axes for the cheapest spatial split.
///
/// References are binned by extent over the full node bounds. A
/// reference straddling several bins contributes clipped geometry to
/// each one and is counted on both sides of any boundary it crosses.
pub(super) fn find_spatial_split(
    primitives: &[Primitive],
    refs: &[Reference],
    node_bounds: &Aabb,
    bin_count: usize,
) -> Option<Split> {
    let mut best: Option<Split> = None;
    let mut best_cost = f32::INFINITY;

    for axis in Axis::ALL {
        let i = axis.index();
        let start = node_bounds.min[i];
        let extent = node_bounds.extent()[i];
        if extent <= 0.0 {
            continue;
        }
        let scale = bin_count as f32 / extent;
        let width = extent / bin_count as f32;

        let mut bins: Vec<SpatialBin> = (0..bin_count)
            .map(|b| {
                SpatialBin::new(
                    axis,
                    start + b as f32 * width,
                    start + (b + 1) as f32 * width,
                )
            })
            .collect();

        for reference in refs {
            let first = bin_index(reference.bounds.min[i], start, scale, bin_count);
            let last = bin_index(reference.bounds.max[i], start, scale, bin_count).max(first);
            bins[first].entry += 1;
            bins[last].exit += 1;

            let primitive = &primitives[reference.prim as usize];
            for bin in &mut bins[first..=last] {
                let fragment = primitive.clip_to_slab(axis, bin.start(), bin.end());
                // A parent spatial split may already have clipped this
                // reference, so constrain to its bounds.
                bin.add_clipped(&Aabb::intersection(&fragment, &reference.bounds));
            }
        }

        let mut right_boxes = vec![Aabb::EMPTY; bin_count];
        let mut accum = Aabb::EMPTY;
        for b in (1..bin_count).rev() {
            accum.grow_aabb(&bins[b].clipped);
            right_boxes[b] = accum;
        }

        let mut left_box = Aabb::EMPTY;
        let mut left_count = 0u32;
        let mut right_count = refs.len() as u32;
        for b in 0..bin_count - 1 {
            left_box.grow_aabb(&bins[b].clipped);
            left_count += bins[b].entry;
            right_count -= bins[b].exit;
            if left_count == 0 || right_count == 0 {
                continue;
            }
            let cost = left_count as f32 * left_box.surface_area()
                + right_count as f32 * right_boxes[b + 1].surface_area();
            if cost < best_cost {
                best_cost = cost;
                best = Some(Split {
                    axis,
                    position: bins[b].end(),
                    bin: b,
                    left: left_box,
                    right: right_boxes[b + 1],
                    left_count,
                    right_count,
                    kind: SplitKind::Spatial,
                });
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sphere::Sphere;
    use beam_math::Vec3;

    fn sphere_refs(spheres: &[(Vec3, f32)]) -> (Vec<Primitive>, Vec<Reference>) {
        let primitives: Vec<Primitive> = spheres
            .iter()
            .map(|&(center, radius)| Primitive::Sphere(Sphere::new(center, radius, 0)))
            .collect();
        let refs = primitives
            .iter()
            .enumerate()
            .map(|(i, p)| Reference::new(i as u32, p.bounds()))
            .collect();
        (primitives, refs)
    }

    fn centroid_bounds(refs: &[Reference]) -> Aabb {
        let mut bounds = Aabb::EMPTY;
        for r in refs {
            bounds.grow(r.bounds.centroid());
        }
        bounds
    }

    #[test]
    fn test_bin_index_clamps() {
        // 16 bins over [0, 16], scale 1
        assert_eq!(bin_index(-5.0, 0.0, 1.0, 16), 0);
        assert_eq!(bin_index(0.5, 0.0, 1.0, 16), 0);
        assert_eq!(bin_index(7.5, 0.0, 1.0, 16), 7);
        assert_eq!(bin_index(16.0, 0.0, 1.0, 16), 15);
        assert_eq!(bin_index(100.0, 0.0, 1.0, 16), 15);
    }

    #[test]
    fn test_object_split_separates_clusters() {
        let (_, refs) = sphere_refs(&[
            (Vec3::new(0.0, 0.0, 0.0), 0.5),
            (Vec3::new(0.0, 1.0, 0.0), 0.5),
            (Vec3::new(0.0, 0.0, 1.0), 0.5),
            (Vec3::new(0.0, 1.0, 1.0), 0.5),
            (Vec3::new(10.0, 0.0, 0.0), 0.5),
            (Vec3::new(10.0, 1.0, 0.0), 0.5),
            (Vec3::new(10.0, 0.0, 1.0), 0.5),
            (Vec3::new(10.0, 1.0, 1.0), 0.5),
        ]);
        let centroids = centroid_bounds(&refs);

        let split = find_object_split(&refs, &centroids, 16).unwrap();
        assert_eq!(split.axis, Axis::X);
        assert_eq!(split.left_count, 4);
        assert_eq!(split.right_count, 4);
        assert!(split.position > 0.5 && split.position < 9.5);
        assert!(split.left.max.x < split.right.min.x);
        assert_eq!(split.kind, SplitKind::Object);
    }

    #[test]
    fn test_object_split_none_for_coincident_centroids() {
        // Same center, different radii. The centroid extent is zero on
        // every axis, so no boundary can separate anything.
        let (_, refs) = sphere_refs(&[
            (Vec3::ZERO, 1.0),
            (Vec3::ZERO, 2.0),
            (Vec3::ZERO, 3.0),
        ]);
        let centroids = centroid_bounds(&refs);

        assert!(find_object_split(&refs, &centroids, 16).is_none());
    }

    #[test]
    fn test_object_split_is_deterministic() {
        let (_, refs) = sphere_refs(&[
            (Vec3::new(-3.0, 0.0, 0.0), 1.0),
            (Vec3::new(-1.0, 2.0, 0.5), 0.5),
            (Vec3::new(2.0, -1.0, 1.0), 0.75),
            (Vec3::new(4.0, 1.0, -2.0), 1.25),
        ]);
        let centroids = centroid_bounds(&refs);

        let a = find_object_split(&refs, &centroids, 16).unwrap();
        let b = find_object_split(&refs, &centroids, 16).unwrap();
        assert_eq!(a.axis, b.axis);
        assert_eq!(a.position, b.position);
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.cost(), b.cost());
    }

    #[test]
    fn test_spatial_split_counts_straddler_on_both_sides() {
        // Two small spheres at the ends plus one wide sphere covering
        // the whole node. The wide sphere crosses every boundary, so the
        // winning split must count it on both sides.
        let (primitives, refs) = sphere_refs(&[
            (Vec3::new(-4.0, 0.0, 0.0), 0.5),
            (Vec3::new(4.0, 0.0, 0.0), 0.5),
            (Vec3::new(0.0, 0.0, 0.0), 4.5),
        ]);
        let mut node_bounds = Aabb::EMPTY;
        for r in &refs {
            node_bounds.grow_aabb(&r.bounds);
        }

        let split = find_spatial_split(&primitives, &refs, &node_bounds, 16).unwrap();
        assert_eq!(split.kind, SplitKind::Spatial);
        assert!(split.left_count + split.right_count > refs.len() as u32);
    }

    #[test]
    fn test_spatial_split_boxes_respect_the_plane() {
        let (primitives, refs) = sphere_refs(&[
            (Vec3::new(-2.0, 0.0, 0.0), 1.0),
            (Vec3::new(0.0, 0.5, 0.0), 2.0),
            (Vec3::new(3.0, -0.5, 0.0), 1.5),
        ]);
        let mut node_bounds = Aabb::EMPTY;
        for r in &refs {
            node_bounds.grow_aabb(&r.bounds);
        }

        let split = find_spatial_split(&primitives, &refs, &node_bounds, 16).unwrap();
        let i = split.axis.index();
        // Clipping is exact at the plane, so neither side leaks past it.
        assert!(split.left.max[i] <= split.position);
        assert!(split.right.min[i] >= split.position);
    }
}
