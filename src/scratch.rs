// Primitive extraction: walks the input meshes once and flattens them into
// a structure-of-arrays scratch buffer the builder partitions in place.
// Plain owned Vecs give the scoped-release-on-every-exit-path behaviour the
// original's StackAlloc/PopScope pair existed for: they drop on return, on
// `?`, and on panic alike, so there is no separate lifecycle type here.

use glam::Vec3A;

use crate::aabb::Aabb;
use crate::error::{Bvh2Error, Result};
use crate::mesh::MeshHandle;

/// One flattened triangle per entry, indexed in mesh/face-traversal order.
pub struct PrimitiveSet {
    pub aabb_min: Vec<Vec3A>,
    pub aabb_max: Vec<Vec3A>,
    pub centroid: Vec<Vec3A>,
    /// `(shape_id, face_index)` per primitive, in the same order.
    pub metadata: Vec<(u32, u32)>,
    pub v0: Vec<Vec3A>,
    pub v1: Vec<Vec3A>,
    pub v2: Vec<Vec3A>,
    /// Index array the builder partitions; starts as the identity
    /// permutation `0..count`. The SoA arrays above are never reordered.
    pub refs: Vec<u32>,
    pub scene_bounds: Aabb,
    pub centroid_bounds: Aabb,
}

impl PrimitiveSet {
    pub fn len(&self) -> usize {
        self.refs.len()
    }
}

/// Reserves exactly `total` elements up front, surfacing an allocation
/// failure as [`Bvh2Error::OutOfMemory`] instead of aborting the process.
fn try_with_capacity<T>(total: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(total).map_err(|_| Bvh2Error::OutOfMemory)?;
    Ok(v)
}

/// Flattens `meshes` into a [`PrimitiveSet`], in mesh order then face order.
///
/// Fails with [`Bvh2Error::InvalidPrimitive`] on the first mesh that reports
/// `is_pure_triangle() == false`, [`Bvh2Error::EmptyInput`] if the total
/// face count across all meshes is zero, and [`Bvh2Error::OutOfMemory`] if
/// the scratch SoA buffers cannot be allocated.
pub fn extract(meshes: &[MeshHandle]) -> Result<PrimitiveSet> {
    let total: usize = meshes.iter().map(|h| h.mesh.num_faces()).sum();
    if total == 0 {
        return Err(Bvh2Error::EmptyInput);
    }

    let mut set = PrimitiveSet {
        aabb_min: try_with_capacity(total)?,
        aabb_max: try_with_capacity(total)?,
        centroid: try_with_capacity(total)?,
        metadata: try_with_capacity(total)?,
        v0: try_with_capacity(total)?,
        v1: try_with_capacity(total)?,
        v2: try_with_capacity(total)?,
        refs: try_with_capacity(total)?,
        scene_bounds: Aabb::EMPTY,
        centroid_bounds: Aabb::EMPTY,
    };

    for handle in meshes {
        if !handle.mesh.is_pure_triangle() {
            return Err(Bvh2Error::InvalidPrimitive { shape_id: handle.shape_id });
        }

        let vertices = handle.mesh.vertices();
        for (face_index, face) in handle.mesh.faces().iter().enumerate() {
            let v0 = vertices[face.x as usize];
            let v1 = vertices[face.y as usize];
            let v2 = vertices[face.z as usize];
            let bounds = Aabb::from_points(v0, v1, v2);
            let centroid = bounds.centroid();

            set.scene_bounds = set.scene_bounds.union(bounds);
            set.centroid_bounds = set.centroid_bounds.union_point(centroid);

            set.aabb_min.push(bounds.lo);
            set.aabb_max.push(bounds.hi);
            set.centroid.push(centroid);
            set.metadata.push((handle.shape_id, face_index as u32));
            set.v0.push(v0);
            set.v1.push(v1);
            set.v2.push(v2);
            set.refs.push((set.refs.len()) as u32);
        }
    }

    Ok(set)
}

/// Recomputes the tight AABB and the centroid AABB of `set.refs[start..end]`
/// from the (already-extracted) per-primitive data. Used after partitioning
/// a slice, since the binned-SAH candidate boxes are only an approximation
/// over whole bins and must not be reused as the node's stored boxes.
pub fn slice_bounds(set: &PrimitiveSet, start: usize, end: usize) -> (Aabb, Aabb) {
    let mut bounds = Aabb::EMPTY;
    let mut centroid_bounds = Aabb::EMPTY;
    for &r in &set.refs[start..end] {
        bounds = bounds.union(Aabb {
            lo: set.aabb_min[r as usize],
            hi: set.aabb_max[r as usize],
        });
        centroid_bounds = centroid_bounds.union_point(set.centroid[r as usize]);
    }
    (bounds, centroid_bounds)
}
