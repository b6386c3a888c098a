//! Recursive tree construction.
//!
//! Bounded primitives enter the recursion as references that spatial
//! splits may clip and duplicate; unbounded primitives are set aside for
//! linear testing at query time. Builds are fully deterministic: axes
//! are swept in X, Y, Z order, bins left to right, and a candidate only
//! replaces the incumbent when its cost is strictly lower.

use beam_math::Aabb;

use super::split::{
    bin_index, find_object_split, find_spatial_split, Reference, Split, SplitKind,
};
use super::{BuildError, BuildOptions, BuildResult, BuildStats, Node, NodeKind, Sbvh};
use crate::primitive::Primitive;

pub(super) fn build(primitives: &[Primitive], options: BuildOptions) -> BuildResult<Sbvh> {
    validate_options(&options)?;
    validate_primitives(primitives)?;

    let mut unbounded = Vec::new();
    let mut refs = Vec::new();
    let mut bounds = Aabb::EMPTY;
    for (index, primitive) in primitives.iter().enumerate() {
        if primitive.is_bounded() {
            let prim_bounds = primitive.bounds();
            bounds.grow_aabb(&prim_bounds);
            refs.push(Reference::new(index as u32, prim_bounds));
        } else {
            unbounded.push(index as u32);
        }
    }

    let bounded = refs.len();
    let mut builder = Builder {
        primitives,
        options: &options,
        nodes: Vec::new(),
        prim_indices: Vec::with_capacity(bounded),
        root_area: bounds.surface_area(),
        duplicate_budget: (bounded as f32 * options.split_factor).ceil() as u32,
        stats: BuildStats::default(),
    };

    if !refs.is_empty() {
        builder.build_node(refs, 1);
    }
    builder.stats.nodes = builder.nodes.len() as u32;

    log::info!(
        "bvh built: {} nodes, {} leaves, {} references over {} primitives ({} unbounded), {} object / {} spatial splits, depth {}",
        builder.stats.nodes,
        builder.stats.leaves,
        builder.stats.references,
        primitives.len(),
        unbounded.len(),
        builder.stats.object_splits,
        builder.stats.spatial_splits,
        builder.stats.max_depth,
    );

    Ok(Sbvh {
        nodes: builder.nodes,
        prim_indices: builder.prim_indices,
        unbounded,
        bounds,
        stats: builder.stats,
    })
}

fn validate_options(options: &BuildOptions) -> BuildResult<()> {
    fn invalid(message: impl Into<String>) -> BuildError {
        BuildError::InvalidOptions {
            message: message.into(),
        }
    }

    if options.bin_count < 2 {
        return Err(invalid(format!(
            "bin_count must be at least 2, got {}",
            options.bin_count
        )));
    }
    if options.max_leaf_size == 0 {
        return Err(invalid("max_leaf_size must be at least 1"));
    }
    if options.max_depth == 0 {
        return Err(invalid("max_depth must be at least 1"));
    }
    if !options.traversal_cost.is_finite() || options.traversal_cost < 0.0 {
        return Err(invalid(format!(
            "traversal_cost must be finite and non-negative, got {}",
            options.traversal_cost
        )));
    }
    if !options.spatial_alpha.is_finite() || options.spatial_alpha < 0.0 {
        return Err(invalid(format!(
            "spatial_alpha must be finite and non-negative, got {}",
            options.spatial_alpha
        )));
    }
    if !options.split_factor.is_finite() || options.split_factor < 0.0 {
        return Err(invalid(format!(
            "split_factor must be finite and non-negative, got {}",
            options.split_factor
        )));
    }
    Ok(())
}

/// Reject geometry the tree cannot represent before any node is built.
fn validate_primitives(primitives: &[Primitive]) -> BuildResult<()> {
    for (index, primitive) in primitives.iter().enumerate() {
        if primitive.is_bounded() {
            let bounds = primitive.bounds();
            // Corner min/max folding masks a NaN vertex toward the
            // finite operands, so the centroid sum is checked as well.
            if !bounds.is_finite() || !primitive.centroid().is_finite() {
                return Err(BuildError::NonFiniteGeometry { index });
            }
            if bounds.is_empty() {
                return Err(BuildError::EmptyBounds { index });
            }
        } else {
            let normal = primitive.normal_at(primitive.centroid());
            if !primitive.centroid().is_finite() || !normal.is_finite() {
                return Err(BuildError::NonFiniteGeometry { index });
            }
        }
    }
    Ok(())
}

struct Builder<'a> {
    primitives: &'a [Primitive],
    options: &'a BuildOptions,
    nodes: Vec<Node>,
    prim_indices: Vec<u32>,
    root_area: f32,
    /// Remaining reference duplications allowed by the split factor
    duplicate_budget: u32,
    stats: BuildStats,
}

impl Builder<'_> {
    /// Build the subtree for `refs` and return its node index.
    fn build_node(&mut self, refs: Vec<Reference>, depth: u32) -> u32 {
        let mut bounds = Aabb::EMPTY;
        let mut centroid_bounds = Aabb::EMPTY;
        for reference in &refs {
            bounds.grow_aabb(&reference.bounds);
            centroid_bounds.grow(reference.bounds.centroid());
        }
        self.stats.max_depth = self.stats.max_depth.max(depth);

        let count = refs.len();
        if count <= self.options.max_leaf_size || depth >= self.options.max_depth {
            return self.push_leaf(bounds, &refs);
        }

        let Some(object) = find_object_split(&refs, &centroid_bounds, self.options.bin_count)
        else {
            // All centroids coincide; no plane can separate these refs
            return self.push_leaf(bounds, &refs);
        };

        // A spatial split is only worth evaluating when the object
        // split's children overlap enough relative to the whole scene
        // and duplication is still allowed.
        let mut chosen = object;
        if self.duplicate_budget > 0
            && object.overlap_area() > self.options.spatial_alpha * self.root_area
        {
            if let Some(spatial) =
                find_spatial_split(self.primitives, &refs, &bounds, self.options.bin_count)
            {
                if spatial.cost() < chosen.cost() {
                    chosen = spatial;
                }
            }
        }

        let leaf_cost = bounds.surface_area() * (count as f32 - self.options.traversal_cost);
        if chosen.cost() >= leaf_cost {
            return self.push_leaf(bounds, &refs);
        }

        let (left_refs, right_refs) = match chosen.kind {
            SplitKind::Object => {
                self.stats.object_splits += 1;
                partition_object(refs, &centroid_bounds, &chosen, self.options.bin_count)
            }
            SplitKind::Spatial => {
                let budget_before = self.duplicate_budget;
                let (left, right) = self.partition_spatial(&refs, &chosen);
                if left.is_empty() || right.is_empty() {
                    // The plane sat exactly on every reference boundary
                    // and one side came up empty. Partition by centroid
                    // bin instead.
                    self.duplicate_budget = budget_before;
                    self.stats.object_splits += 1;
                    partition_object(refs, &centroid_bounds, &object, self.options.bin_count)
                } else {
                    self.stats.spatial_splits += 1;
                    (left, right)
                }
            }
        };

        let index = self.nodes.len() as u32;
        self.nodes.push(Node {
            bounds,
            kind: NodeKind::Interior { left: 0, right: 0 },
        });
        let left = self.build_node(left_refs, depth + 1);
        let right = self.build_node(right_refs, depth + 1);
        self.nodes[index as usize].kind = NodeKind::Interior { left, right };
        index
    }

    fn push_leaf(&mut self, bounds: Aabb, refs: &[Reference]) -> u32 {
        let first = self.prim_indices.len() as u32;
        for reference in refs {
            self.prim_indices.push(reference.prim);
        }
        let index = self.nodes.len() as u32;
        self.nodes.push(Node {
            bounds,
            kind: NodeKind::Leaf {
                first,
                count: refs.len() as u32,
            },
        });
        self.stats.leaves += 1;
        self.stats.references += refs.len() as u32;
        index
    }

    /// Distribute references across a spatial split plane.
    ///
    /// Straddlers are clipped into both sides while the duplicate budget
    /// lasts; once it runs out they go whole to whichever side currently
    /// holds fewer references.
    fn partition_spatial(
        &mut self,
        refs: &[Reference],
        split: &Split,
    ) -> (Vec<Reference>, Vec<Reference>) {
        let i = split.axis.index();
        let position = split.position;
        let mut left = Vec::new();
        let mut right = Vec::new();

        for reference in refs {
            if reference.bounds.max[i] <= position {
                left.push(*reference);
            } else if reference.bounds.min[i] >= position {
                right.push(*reference);
            } else {
                let primitive = &self.primitives[reference.prim as usize];
                let left_clip = Aabb::intersection(
                    &primitive.clip_to_slab(split.axis, f32::NEG_INFINITY, position),
                    &reference.bounds,
                );
                let right_clip = Aabb::intersection(
                    &primitive.clip_to_slab(split.axis, position, f32::INFINITY),
                    &reference.bounds,
                );

                match (left_clip.is_empty(), right_clip.is_empty()) {
                    (false, false) if self.duplicate_budget > 0 => {
                        self.duplicate_budget -= 1;
                        left.push(Reference::new(reference.prim, left_clip));
                        right.push(Reference::new(reference.prim, right_clip));
                    }
                    (false, true) => left.push(Reference::new(reference.prim, left_clip)),
                    (true, false) => right.push(Reference::new(reference.prim, right_clip)),
                    _ => {
                        if left.len() <= right.len() {
                            left.push(*reference);
                        } else {
                            right.push(*reference);
                        }
                    }
                }
            }
        }

        (left, right)
    }
}

/// Partition references by centroid bin, exactly mirroring the sweep
/// that selected the split. Neither side can come up empty.
fn partition_object(
    refs: Vec<Reference>,
    centroid_bounds: &Aabb,
    split: &Split,
    bin_count: usize,
) -> (Vec<Reference>, Vec<Reference>) {
    let i = split.axis.index();
    let start = centroid_bounds.min[i];
    let scale = bin_count as f32 / centroid_bounds.extent()[i];

    let (left, right): (Vec<Reference>, Vec<Reference>) = refs
        .into_iter()
        .partition(|r| bin_index(r.bounds.centroid()[i], start, scale, bin_count) <= split.bin);
    debug_assert!(!left.is_empty() && !right.is_empty());
    (left, right)
}
