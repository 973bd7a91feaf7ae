// The recursive builder: drives an explicit work stack over subproblems,
// emits nodes into a pre-sized array in a deterministic order, and hands
// each subproblem's refs[] slice to the split evaluator before pushing its
// children. See split.rs for the per-slice partitioning decision.

use glam::Vec3A;

use crate::aabb::Aabb;
use crate::error::Result;
use crate::mesh::MeshHandle;
use crate::node::Node;
use crate::scratch::{self, PrimitiveSet};
use crate::split::{self, SplitPlan};

/// Build-time configuration for [`Bvh2::build`].
///
/// No field here is read from a file or an environment variable; a caller
/// that wants file/env-driven configuration is expected to parse it
/// themselves and construct this struct in memory.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bvh2Config {
    /// Relative cost of descending one more level of the tree, used by the
    /// binned-SAH cost model. Has no effect when `use_sah` is `false`.
    pub traversal_cost: f32,
    /// Number of SAH bins per axis.
    pub num_bins: usize,
    /// Use binned SAH (subject to a minimum primitive count below which a
    /// median split is used regardless) instead of a plain equal-count
    /// median split.
    pub use_sah: bool,
}

impl Default for Bvh2Config {
    fn default() -> Self {
        Self {
            traversal_cost: 1.0,
            num_bins: 64,
            use_sah: false,
        }
    }
}

/// A subproblem awaiting emission: a contiguous `refs[]` slice, its tight
/// and centroid bounds, and the node-array slot it will be written to.
struct Subproblem {
    start: usize,
    end: usize,
    centroid_bounds: Aabb,
    node_index: usize,
}

/// Binary BVH builder over triangle meshes.
///
/// Owns the node array produced by the most recent successful [`build`],
/// and nothing else survives across calls: the per-primitive scratch is
/// local to `build` and dropped on every exit path, including failure.
///
/// [`build`]: Bvh2::build
pub struct Bvh2 {
    config: Bvh2Config,
    nodes: Vec<Node>,
}

impl Bvh2 {
    pub fn new(config: Bvh2Config) -> Self {
        Self {
            config,
            nodes: Vec::new(),
        }
    }

    pub fn config(&self) -> &Bvh2Config {
        &self.config
    }

    /// The current tree, or an empty slice if no successful `build` has
    /// happened yet (or the builder was [`clear`](Self::clear)ed).
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Releases the built tree. Idempotent.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Builds a tree over every triangle in `meshes`, in mesh order then
    /// face order within each mesh.
    ///
    /// On success, replaces any previously built tree. On failure, the
    /// builder is left exactly as it was before the call: the new tree is
    /// assembled entirely in local scratch and only swapped into `self`
    /// once extraction and construction have both succeeded.
    pub fn build(&mut self, meshes: &[MeshHandle]) -> Result<()> {
        let mut set = scratch::extract(meshes)?;
        let nodes = build_nodes(&mut set, &self.config)?;
        log::debug!(
            "bvh2 build: {} triangles, {} nodes ({} leaves, {} internal)",
            set.len(),
            nodes.len(),
            (nodes.len() + 1) / 2,
            nodes.len() / 2,
        );
        self.nodes = nodes;
        Ok(())
    }
}

impl Default for Bvh2 {
    fn default() -> Self {
        Self::new(Bvh2Config::default())
    }
}

fn build_nodes(set: &mut PrimitiveSet, config: &Bvh2Config) -> Result<Vec<Node>> {
    let count = set.len();
    let total_nodes = 2 * count - 1;
    let mut nodes = Vec::new();
    nodes
        .try_reserve_exact(total_nodes)
        .map_err(|_| crate::error::Bvh2Error::OutOfMemory)?;
    nodes.resize(total_nodes, Node::EMPTY);

    // Node index 0 is always the root; the counter hands out every index
    // after it in allocation order, not in array-position order.
    let mut next_index = 1usize;

    let mut stack = Vec::with_capacity(total_nodes.min(64));
    stack.push(Subproblem {
        start: 0,
        end: count,
        centroid_bounds: set.centroid_bounds,
        node_index: 0,
    });

    while let Some(job) = stack.pop() {
        let n = job.end - job.start;
        if n == 1 {
            nodes[job.node_index] = emit_leaf(set, job.start);
            continue;
        }

        let plan = split::plan_split(
            set,
            job.start,
            job.end,
            &job.centroid_bounds,
            config.use_sah,
            config.num_bins,
            config.traversal_cost,
        )
        .unwrap_or_else(|| {
            log::warn!(
                "bvh2 build: {n} primitives share a degenerate centroid bound, forcing an \
                 equal-count split by position"
            );
            SplitPlan {
                axis: job.centroid_bounds.largest_axis(),
                mid: job.start + n / 2,
            }
        });

        let (left_bounds, left_centroid) = scratch::slice_bounds(set, job.start, plan.mid);
        let (right_bounds, right_centroid) = scratch::slice_bounds(set, plan.mid, job.end);

        let left_index = next_index;
        let right_index = next_index + 1;
        next_index += 2;

        nodes[job.node_index] = Node::internal(
            left_bounds.lo,
            left_bounds.hi,
            left_index as u32,
            right_bounds.lo,
            right_bounds.hi,
            right_index as u32,
        );

        log::trace!(
            "bvh2 build: node {} splits axis {} at {} -> left [{},{}) node {}, right [{},{}) node {}",
            job.node_index,
            plan.axis,
            plan.mid,
            job.start,
            plan.mid,
            left_index,
            plan.mid,
            job.end,
            right_index,
        );

        // Push right first so left is popped (and its whole subtree's
        // indices allocated) before right: left-before-right, depth-first.
        stack.push(Subproblem {
            start: plan.mid,
            end: job.end,
            centroid_bounds: right_centroid,
            node_index: right_index,
        });
        stack.push(Subproblem {
            start: job.start,
            end: plan.mid,
            centroid_bounds: left_centroid,
            node_index: left_index,
        });
    }

    debug_assert_eq!(next_index, total_nodes, "node counter must exhaust the array exactly");
    Ok(nodes)
}

fn emit_leaf(set: &PrimitiveSet, start: usize) -> Node {
    let r = set.refs[start] as usize;
    let (shape_id, face_index) = set.metadata[r];
    let v0: Vec3A = set.v0[r];
    let v1: Vec3A = set.v1[r];
    let v2: Vec3A = set.v2[r];
    Node::leaf(v0, v1, v2, shape_id, face_index)
}
