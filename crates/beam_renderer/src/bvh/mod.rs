//! Spatial-split bounding volume hierarchy.
//!
//! The tree is built once over a primitive list and stored as a flat
//! arena of nodes indexed by `u32`. Interior nodes reference their two
//! children by arena index; leaves reference a contiguous run in a
//! primitive index table. Spatial splits may store the same primitive in
//! more than one leaf, each copy bounded by a box clipped at the split
//! plane, which keeps boxes tight around long thin geometry.
//!
//! Unbounded primitives (planes) never enter the tree. They are kept in
//! a side list and tested linearly on every query.

mod bin;
mod build;
mod split;

pub use bin::SpatialBin;

use beam_math::{Aabb, Interval, Ray};
use thiserror::Error;

use crate::primitive::Primitive;

/// Errors from tree construction. Traversal itself cannot fail.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid build options: {message}")]
    InvalidOptions { message: String },
    #[error("primitive {index} has non-finite geometry")]
    NonFiniteGeometry { index: usize },
    #[error("primitive {index} has an inverted bounding box")]
    EmptyBounds { index: usize },
}

/// Result alias for tree construction.
pub type BuildResult<T> = Result<T, BuildError>;

/// Tuning knobs for tree construction. The defaults suit scenes from a
/// handful up to millions of primitives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildOptions {
    /// Number of SAH bins per axis
    pub bin_count: usize,
    /// References per leaf before a split is considered
    pub max_leaf_size: usize,
    /// Recursion limit; deeper subtrees become forced leaves
    pub max_depth: u32,
    /// Relative cost of visiting an interior node versus a primitive test
    pub traversal_cost: f32,
    /// Fraction of the root surface area the object split's children must
    /// overlap before a spatial split is evaluated
    pub spatial_alpha: f32,
    /// Allowed reference duplication as a fraction of the primitive count
    pub split_factor: f32,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            bin_count: 16,
            max_leaf_size: 4,
            max_depth: 64,
            traversal_cost: 1.0,
            spatial_alpha: 1e-5,
            split_factor: 0.5,
        }
    }
}

impl BuildOptions {
    pub fn with_bin_count(mut self, bin_count: usize) -> Self {
        self.bin_count = bin_count;
        self
    }

    pub fn with_max_leaf_size(mut self, max_leaf_size: usize) -> Self {
        self.max_leaf_size = max_leaf_size;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_traversal_cost(mut self, traversal_cost: f32) -> Self {
        self.traversal_cost = traversal_cost;
        self
    }

    pub fn with_spatial_alpha(mut self, spatial_alpha: f32) -> Self {
        self.spatial_alpha = spatial_alpha;
        self
    }

    pub fn with_split_factor(mut self, split_factor: f32) -> Self {
        self.split_factor = split_factor;
        self
    }
}

/// Counters collected during construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub nodes: u32,
    pub leaves: u32,
    /// Total leaf entries; exceeds the primitive count when spatial
    /// splits duplicated references
    pub references: u32,
    pub object_splits: u32,
    pub spatial_splits: u32,
    pub max_depth: u32,
}

/// One node of the flat arena.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub bounds: Aabb,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Two children by arena index
    Interior { left: u32, right: u32 },
    /// A run of `count` entries in the primitive index table
    Leaf { first: u32, count: u32 },
}

/// A primitive hit returned by traversal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimHit {
    /// Index into the primitive list the tree was built over
    pub prim: u32,
    /// Ray parameter of the hit
    pub t: f32,
}

/// An immutable acceleration structure over a primitive list.
///
/// The tree stores indices only; queries take the primitive slice it was
/// built from. Passing a different or reordered slice returns garbage.
#[derive(Debug, Clone)]
pub struct Sbvh {
    nodes: Vec<Node>,
    prim_indices: Vec<u32>,
    unbounded: Vec<u32>,
    bounds: Aabb,
    stats: BuildStats,
}

impl Sbvh {
    /// Build a tree with default options.
    pub fn build(primitives: &[Primitive]) -> BuildResult<Sbvh> {
        Self::build_with(primitives, BuildOptions::default())
    }

    /// Build a tree with explicit options.
    pub fn build_with(primitives: &[Primitive], options: BuildOptions) -> BuildResult<Sbvh> {
        build::build(primitives, options)
    }

    /// Bounds of all bounded primitives. Empty for a scene of nothing
    /// but planes.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Counters collected while the tree was built.
    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// Find the nearest hit along `ray` within `ray_t`.
    ///
    /// Children are visited nearer-first and subtrees whose entry
    /// distance lies beyond the current best hit are pruned, so leaves
    /// are only opened when they could still improve the result.
    pub fn intersect(
        &self,
        primitives: &[Primitive],
        ray: &Ray,
        ray_t: Interval,
    ) -> Option<PrimHit> {
        let mut closest = ray_t.max;
        let mut hit = None;

        for &prim in &self.unbounded {
            if let Some(t) =
                primitives[prim as usize].intersect(ray, Interval::new(ray_t.min, closest))
            {
                closest = t;
                hit = Some(PrimHit { prim, t });
            }
        }

        if self.nodes.is_empty() {
            return hit;
        }

        let mut stack: Vec<(u32, f32)> = Vec::with_capacity(64);
        if let Some((entry, _)) = self.nodes[0]
            .bounds
            .intersect(ray, Interval::new(ray_t.min, closest))
        {
            stack.push((0, entry));
        }

        while let Some((index, entry)) = stack.pop() {
            // A closer hit may have turned up since this node was pushed
            if entry > closest {
                continue;
            }
            match self.nodes[index as usize].kind {
                NodeKind::Leaf { first, count } => {
                    for &prim in &self.prim_indices[first as usize..(first + count) as usize] {
                        if let Some(t) = primitives[prim as usize]
                            .intersect(ray, Interval::new(ray_t.min, closest))
                        {
                            closest = t;
                            hit = Some(PrimHit { prim, t });
                        }
                    }
                }
                NodeKind::Interior { left, right } => {
                    let limit = Interval::new(ray_t.min, closest);
                    let hit_left = self.nodes[left as usize].bounds.intersect(ray, limit);
                    let hit_right = self.nodes[right as usize].bounds.intersect(ray, limit);
                    match (hit_left, hit_right) {
                        (Some((l, _)), Some((r, _))) => {
                            // Push the farther child first so the nearer
                            // one is popped next; ties visit left first
                            if r < l {
                                stack.push((left, l));
                                stack.push((right, r));
                            } else {
                                stack.push((right, r));
                                stack.push((left, l));
                            }
                        }
                        (Some((l, _)), None) => stack.push((left, l)),
                        (None, Some((r, _))) => stack.push((right, r)),
                        (None, None) => {}
                    }
                }
            }
        }

        hit
    }

    /// Report whether anything is hit along `ray` within `ray_t`.
    ///
    /// Visits children in arbitrary order and returns on the first hit,
    /// which makes it cheaper than [`Sbvh::intersect`] for shadow rays.
    pub fn intersect_any(&self, primitives: &[Primitive], ray: &Ray, ray_t: Interval) -> bool {
        for &prim in &self.unbounded {
            if primitives[prim as usize].intersect(ray, ray_t).is_some() {
                return true;
            }
        }

        if self.nodes.is_empty() {
            return false;
        }

        let mut stack: Vec<u32> = Vec::with_capacity(64);
        if self.nodes[0].bounds.hit(ray, ray_t) {
            stack.push(0);
        }

        while let Some(index) = stack.pop() {
            match self.nodes[index as usize].kind {
                NodeKind::Leaf { first, count } => {
                    for &prim in &self.prim_indices[first as usize..(first + count) as usize] {
                        if primitives[prim as usize].intersect(ray, ray_t).is_some() {
                            return true;
                        }
                    }
                }
                NodeKind::Interior { left, right } => {
                    if self.nodes[left as usize].bounds.hit(ray, ray_t) {
                        stack.push(left);
                    }
                    if self.nodes[right as usize].bounds.hit(ray, ray_t) {
                        stack.push(right);
                    }
                }
            }
        }

        false
    }
}
