//! Error types for the BVH2 builder.

use thiserror::Error;

/// Failure modes of [`crate::Bvh2::build`].
///
/// Every variant is fatal for the call that raised it: `build` leaves the
/// builder holding whatever tree it held before the call (or empty, if it
/// was empty), never a partially-built one.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bvh2Error {
    /// A mesh reported faces that are not pure triangles.
    #[error("mesh with shape_id {shape_id} is not pure-triangle")]
    InvalidPrimitive { shape_id: u32 },

    /// The input meshes contain zero faces in total.
    #[error("build called with zero total faces")]
    EmptyInput,

    /// A scratch or node-array allocation could not be satisfied.
    #[error("allocation failed while building the BVH")]
    OutOfMemory,
}

pub type Result<T> = std::result::Result<T, Bvh2Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failing_shape() {
        let err = Bvh2Error::InvalidPrimitive { shape_id: 7 };
        assert!(err.to_string().contains('7'));
    }
}
