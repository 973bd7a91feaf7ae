//! `bvh2`: a binary bounding-volume hierarchy builder for triangle meshes.
//!
//! Given an ordered collection of triangle meshes, [`Bvh2::build`] produces
//! a flat, traversal-ready array of 64-byte [`Node`] records: a binary tree
//! in which every leaf carries exactly one triangle and every internal node
//! carries both children's AABBs inline. The layout is meant to be consumed
//! by a ray-traversal kernel living outside this crate — this crate only
//! builds the tree, it does not walk it.
//!
//! ```
//! use bvh2::{Bvh2, Bvh2Config, MeshHandle, TriangleMesh};
//! use glam::{UVec3, Vec3A};
//!
//! let mesh = TriangleMesh::new(
//!     vec![Vec3A::new(0.0, 0.0, 0.0), Vec3A::new(1.0, 0.0, 0.0), Vec3A::new(0.0, 1.0, 0.0)],
//!     vec![UVec3::new(0, 1, 2)],
//! );
//!
//! let mut bvh = Bvh2::new(Bvh2Config::default());
//! bvh.build(&[MeshHandle::new(0, &mesh)]).unwrap();
//! assert_eq!(bvh.nodes().len(), 1);
//! assert!(bvh.nodes()[0].is_leaf());
//! ```

mod aabb;
mod builder;
mod error;
mod mesh;
mod node;
mod scratch;
mod split;

pub use builder::{Bvh2, Bvh2Config};
pub use error::{Bvh2Error, Result};
pub use mesh::{MeshHandle, MeshProvider, TriangleMesh};
pub use node::{Node, INVALID};

// Re-exported so callers can build `Vec3A`/`UVec3` values for `TriangleMesh`
// and `MeshProvider` implementations without pinning their own `glam`
// version against ours.
pub use glam;
