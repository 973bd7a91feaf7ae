// The encoded tree record: exactly 64 bytes, 16-byte aligned, with the
// leaf/internal distinction folded into the addr_left sentinel instead
// of a separate tag (see Node::is_leaf). `repr(align(16))` is what makes
// a `Vec<Node>` come back from the global allocator 16-byte aligned --
// the safe, idiomatic stand-in for a hand-rolled aligned allocator.

use bytemuck::{Pod, Zeroable};
use glam::Vec3A;

/// Sentinel marking an unused/absent address or id slot.
pub const INVALID: u32 = 0xFFFF_FFFF;

#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Node {
    /// Left child AABB min, or leaf vertex 0.
    pub a_lo: [f32; 3],
    /// Left child index, or `INVALID` for a leaf.
    pub addr_left: u32,
    /// Left child AABB max, or leaf vertex 1.
    pub a_hi: [f32; 3],
    /// `INVALID` for an internal node, mesh shape id for a leaf.
    pub shape_id: u32,
    /// Right child AABB min, or leaf vertex 2.
    pub b_lo: [f32; 3],
    /// Right child index, or `INVALID` for a leaf.
    pub addr_right: u32,
    /// Right child AABB max, or unused (zero) for a leaf.
    pub b_hi: [f32; 3],
    /// `INVALID` for an internal node, face index for a leaf.
    pub prim_id: u32,
}

const _: () = assert!(std::mem::size_of::<Node>() == 64);
const _: () = assert!(std::mem::align_of::<Node>() == 16);

impl Node {
    pub const EMPTY: Self = Self {
        a_lo: [0.0; 3],
        addr_left: INVALID,
        a_hi: [0.0; 3],
        shape_id: INVALID,
        b_lo: [0.0; 3],
        addr_right: INVALID,
        b_hi: [0.0; 3],
        prim_id: INVALID,
    };

    pub fn internal(left_lo: Vec3A, left_hi: Vec3A, addr_left: u32, right_lo: Vec3A, right_hi: Vec3A, addr_right: u32) -> Self {
        Self {
            a_lo: left_lo.into(),
            addr_left,
            a_hi: left_hi.into(),
            shape_id: INVALID,
            b_lo: right_lo.into(),
            addr_right,
            b_hi: right_hi.into(),
            prim_id: INVALID,
        }
    }

    pub fn leaf(v0: Vec3A, v1: Vec3A, v2: Vec3A, shape_id: u32, prim_id: u32) -> Self {
        Self {
            a_lo: v0.into(),
            addr_left: INVALID,
            a_hi: v1.into(),
            shape_id,
            b_lo: v2.into(),
            addr_right: INVALID,
            b_hi: [0.0; 3],
            prim_id,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.addr_left == INVALID
    }

    /// The three leaf vertices. Only meaningful when `is_leaf()`.
    pub fn leaf_vertices(&self) -> [Vec3A; 3] {
        [self.a_lo.into(), self.a_hi.into(), self.b_lo.into()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_record_is_64_bytes() {
        assert_eq!(std::mem::size_of::<Node>(), 64);
    }

    #[test]
    fn leaf_is_distinguished_by_addr_left_sentinel() {
        let leaf = Node::leaf(Vec3A::ZERO, Vec3A::X, Vec3A::Y, 3, 5);
        assert!(leaf.is_leaf());
        assert_eq!(leaf.shape_id, 3);
        assert_eq!(leaf.prim_id, 5);
        assert_eq!(leaf.b_hi, [0.0; 3]);
    }

    #[test]
    fn internal_node_is_not_a_leaf() {
        let node = Node::internal(Vec3A::ZERO, Vec3A::ONE, 1, Vec3A::ZERO, Vec3A::ONE, 2);
        assert!(!node.is_leaf());
        assert_eq!(node.shape_id, INVALID);
        assert_eq!(node.prim_id, INVALID);
    }

    #[test]
    fn bytes_round_trip_through_bytemuck() {
        let node = Node::leaf(Vec3A::new(1.0, 2.0, 3.0), Vec3A::X, Vec3A::Y, 9, 1);
        let bytes: &[u8] = bytemuck::bytes_of(&node);
        assert_eq!(bytes.len(), 64);
        let back: Node = *bytemuck::from_bytes(bytes);
        assert_eq!(back, node);
    }
}
