// The contract the builder requires from a mesh. A mesh is not owned by
// the builder: it just hands over read-only views of its vertex and face
// buffers for the duration of a single `build` call.

use glam::{UVec3, Vec3A};

/// Read-only triangle-mesh view consumed by [`crate::Bvh2::build`].
///
/// Implementors must report `is_pure_triangle() == true`; any mesh that
/// can't make that guarantee (quads, ngons, ...) is a contract violation
/// and the builder reports [`crate::Bvh2Error::InvalidPrimitive`] rather
/// than guessing at a triangulation.
pub trait MeshProvider {
    /// Number of triangular faces in this mesh.
    fn num_faces(&self) -> usize;

    /// Vertex positions, indexed by the values in [`MeshProvider::faces`].
    fn vertices(&self) -> &[Vec3A];

    /// One entry per face: three indices into [`MeshProvider::vertices`].
    fn faces(&self) -> &[UVec3];

    /// Must be `true`. Non-triangular source data (quads, polygons) is
    /// expected to have been triangulated before reaching the builder.
    fn is_pure_triangle(&self) -> bool;
}

/// A mesh paired with the caller-assigned identifier that ends up
/// verbatim in the `shape_id` field of every leaf built from it.
pub struct MeshHandle<'a> {
    pub shape_id: u32,
    pub mesh: &'a dyn MeshProvider,
}

impl<'a> MeshHandle<'a> {
    pub fn new(shape_id: u32, mesh: &'a dyn MeshProvider) -> Self {
        Self { shape_id, mesh }
    }
}

/// A simple owned triangle mesh, useful for tests and for callers that
/// don't already have their own vertex/index buffers to borrow from.
#[derive(Clone, Debug, Default)]
pub struct TriangleMesh {
    vertices: Vec<Vec3A>,
    faces: Vec<UVec3>,
}

impl TriangleMesh {
    pub fn new(vertices: Vec<Vec3A>, faces: Vec<UVec3>) -> Self {
        Self { vertices, faces }
    }
}

impl MeshProvider for TriangleMesh {
    fn num_faces(&self) -> usize {
        self.faces.len()
    }

    fn vertices(&self) -> &[Vec3A] {
        &self.vertices
    }

    fn faces(&self) -> &[UVec3] {
        &self.faces
    }

    fn is_pure_triangle(&self) -> bool {
        true
    }
}
