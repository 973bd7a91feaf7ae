// Split evaluation: binned SAH when the subset is large enough to be worth
// it, median split (via order_stat's kth_by, an nth_element-style
// selection) everywhere else, falling back to median whenever SAH finds no
// partition cheaper than keeping a leaf.

use crate::aabb::Aabb;
use crate::scratch::PrimitiveSet;

/// Below this primitive count, binned SAH isn't worth its own overhead and
/// a plain median split is used instead.
pub const MIN_SAH_PRIMITIVES: usize = 32;

pub struct SplitPlan {
    pub axis: usize,
    /// `refs[start..mid]` becomes the left child, `refs[mid..end]` the right.
    pub mid: usize,
}

struct Bin {
    bounds: Aabb,
    count: usize,
}

impl Bin {
    fn empty() -> Self {
        Self { bounds: Aabb::EMPTY, count: 0 }
    }
}

/// Chooses and applies a split over `refs[start..end]`, partitioning that
/// slice in place. Returns `None` when the subset can't be split further
/// (fewer than 2 primitives, or all primitives share one centroid point on
/// every axis).
pub fn plan_split(
    set: &mut PrimitiveSet,
    start: usize,
    end: usize,
    centroid_bounds: &Aabb,
    use_sah: bool,
    num_bins: usize,
    traversal_cost: f32,
) -> Option<SplitPlan> {
    let count = end - start;
    if count < 2 {
        return None;
    }

    if use_sah && count >= MIN_SAH_PRIMITIVES {
        if let Some(plan) = binned_sah_split(set, start, end, centroid_bounds, num_bins, traversal_cost) {
            return Some(plan);
        }
    }

    median_split(set, start, end, centroid_bounds)
}

fn median_split(set: &mut PrimitiveSet, start: usize, end: usize, centroid_bounds: &Aabb) -> Option<SplitPlan> {
    let axis = centroid_bounds.largest_axis();
    if centroid_bounds.extent()[axis] <= 0.0 {
        return None;
    }

    let mid = start + (end - start) / 2;
    let refs = &mut set.refs[start..end];
    let centroid = &set.centroid;
    order_stat::kth_by(refs, mid - start, |&a, &b| {
        centroid[a as usize][axis]
            .partial_cmp(&centroid[b as usize][axis])
            .unwrap()
    });

    Some(SplitPlan { axis, mid })
}

fn binned_sah_split(
    set: &mut PrimitiveSet,
    start: usize,
    end: usize,
    centroid_bounds: &Aabb,
    num_bins: usize,
    traversal_cost: f32,
) -> Option<SplitPlan> {
    let count = end - start;
    let leaf_cost = count as f32;

    let mut parent_bounds = Aabb::EMPTY;
    for &r in &set.refs[start..end] {
        parent_bounds = parent_bounds.union(Aabb {
            lo: set.aabb_min[r as usize],
            hi: set.aabb_max[r as usize],
        });
    }
    let parent_sa = parent_bounds.surface_area();
    if parent_sa <= 0.0 {
        return None;
    }

    let mut best_axis = None;
    let mut best_split_bin = 0usize;
    let mut best_cost = f32::INFINITY;

    for axis in 0..3 {
        let extent = centroid_bounds.extent()[axis];
        if extent <= 0.0 {
            continue;
        }
        let lo = centroid_bounds.lo[axis];
        let scale = num_bins as f32 / extent;

        let mut bins: Vec<Bin> = (0..num_bins).map(|_| Bin::empty()).collect();
        let bin_of = |c: f32| -> usize {
            let b = ((c - lo) * scale) as isize;
            b.clamp(0, num_bins as isize - 1) as usize
        };

        for &r in &set.refs[start..end] {
            let b = bin_of(set.centroid[r as usize][axis]);
            bins[b].bounds = bins[b].bounds.union(Aabb { lo: set.aabb_min[r as usize], hi: set.aabb_max[r as usize] });
            bins[b].count += 1;
        }

        // Prefix sweep left-to-right, suffix sweep right-to-left, combine
        // at each of the num_bins-1 candidate split planes.
        let mut left_bounds = vec![Aabb::EMPTY; num_bins];
        let mut left_count = vec![0usize; num_bins];
        let mut acc_bounds = Aabb::EMPTY;
        let mut acc_count = 0usize;
        for i in 0..num_bins {
            acc_bounds = acc_bounds.union(bins[i].bounds);
            acc_count += bins[i].count;
            left_bounds[i] = acc_bounds;
            left_count[i] = acc_count;
        }

        let mut right_bounds = vec![Aabb::EMPTY; num_bins];
        let mut right_count = vec![0usize; num_bins];
        let mut acc_bounds = Aabb::EMPTY;
        let mut acc_count = 0usize;
        for i in (0..num_bins).rev() {
            acc_bounds = acc_bounds.union(bins[i].bounds);
            acc_count += bins[i].count;
            right_bounds[i] = acc_bounds;
            right_count[i] = acc_count;
        }

        for split_bin in 0..num_bins - 1 {
            let lc = left_count[split_bin];
            let rc = right_count[split_bin + 1];
            if lc == 0 || rc == 0 {
                continue;
            }
            let cost = traversal_cost
                + (left_bounds[split_bin].surface_area() * lc as f32
                    + right_bounds[split_bin + 1].surface_area() * rc as f32)
                    / parent_sa;
            if cost < best_cost {
                best_cost = cost;
                best_axis = Some(axis);
                best_split_bin = split_bin;
            }
        }
    }

    let axis = best_axis?;
    if best_cost >= leaf_cost {
        return None;
    }

    let extent = centroid_bounds.extent()[axis];
    let lo = centroid_bounds.lo[axis];
    let scale = num_bins as f32 / extent;
    let bin_of = |c: f32| -> usize {
        let b = ((c - lo) * scale) as isize;
        b.clamp(0, num_bins as isize - 1) as usize
    };

    let centroid = &set.centroid;
    let refs = &mut set.refs[start..end];
    let mid_offset = partition::partition(refs, |&r| bin_of(centroid[r as usize][axis]) <= best_split_bin).0;
    let mid = start + mid_offset;

    // A degenerate bin assignment (all primitives landed on one side despite
    // separate counts per bin) falls back to median rather than producing an
    // empty child.
    if mid == start || mid == end {
        return None;
    }

    Some(SplitPlan { axis, mid })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{MeshHandle, TriangleMesh};
    use crate::scratch::extract;
    use glam::{UVec3, Vec3A};

    fn two_triangles_apart() -> TriangleMesh {
        TriangleMesh::new(
            vec![
                Vec3A::new(0.0, 0.0, 0.0),
                Vec3A::new(1.0, 0.0, 0.0),
                Vec3A::new(0.0, 1.0, 0.0),
                Vec3A::new(10.0, 0.0, 0.0),
                Vec3A::new(11.0, 0.0, 0.0),
                Vec3A::new(10.0, 1.0, 0.0),
            ],
            vec![UVec3::new(0, 1, 2), UVec3::new(3, 4, 5)],
        )
    }

    #[test]
    fn median_split_separates_two_distant_triangles() {
        let mesh = two_triangles_apart();
        let handle = MeshHandle::new(0, &mesh);
        let mut set = extract(&[handle]).unwrap();
        let centroid_bounds = set.centroid_bounds;
        let plan = plan_split(&mut set, 0, 2, &centroid_bounds, false, 12, 1.0).unwrap();
        assert_eq!(plan.mid, 1);
    }

    #[test]
    fn coincident_centroids_cannot_be_split() {
        let mesh = TriangleMesh::new(
            vec![
                Vec3A::new(0.0, 0.0, 0.0),
                Vec3A::new(1.0, 0.0, 0.0),
                Vec3A::new(0.0, 1.0, 0.0),
            ],
            vec![UVec3::new(0, 1, 2), UVec3::new(0, 1, 2)],
        );
        let handle = MeshHandle::new(0, &mesh);
        let mut set = extract(&[handle]).unwrap();
        let centroid_bounds = set.centroid_bounds;
        assert!(plan_split(&mut set, 0, 2, &centroid_bounds, false, 12, 1.0).is_none());
    }

    #[test]
    fn single_primitive_cannot_be_split() {
        let mesh = two_triangles_apart();
        let handle = MeshHandle::new(0, &mesh);
        let mut set = extract(&[handle]).unwrap();
        let centroid_bounds = set.centroid_bounds;
        assert!(plan_split(&mut set, 0, 1, &centroid_bounds, false, 12, 1.0).is_none());
    }
}
