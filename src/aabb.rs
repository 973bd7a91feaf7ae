// Axis-aligned bounding box over a 4-wide vector. The 4th (w) lane of
// `Vec3A` is always zero by construction, so seeding `min`/`max` at
// +/-infinity on the first three lanes and reducing with plain
// component-wise min/max can never let a garbage w-lane corrupt the
// 3D box -- unlike the raw SIMD registers this type stands in for.

use glam::Vec3A;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub lo: Vec3A,
    pub hi: Vec3A,
}

impl Aabb {
    pub const EMPTY: Self = Self {
        lo: Vec3A::splat(f32::INFINITY),
        hi: Vec3A::splat(f32::NEG_INFINITY),
    };

    pub fn from_point(p: Vec3A) -> Self {
        Self { lo: p, hi: p }
    }

    pub fn from_points(a: Vec3A, b: Vec3A, c: Vec3A) -> Self {
        Self {
            lo: a.min(b).min(c),
            hi: a.max(b).max(c),
        }
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            lo: self.lo.min(other.lo),
            hi: self.hi.max(other.hi),
        }
    }

    pub fn union_point(self, p: Vec3A) -> Self {
        Self {
            lo: self.lo.min(p),
            hi: self.hi.max(p),
        }
    }

    pub fn centroid(&self) -> Vec3A {
        (self.lo + self.hi) * 0.5
    }

    pub fn extent(&self) -> Vec3A {
        self.hi - self.lo
    }

    /// Index of the axis with the largest extent (x=0, y=1, z=2). Ties
    /// break towards the lower axis index.
    pub fn largest_axis(&self) -> usize {
        let e = self.extent();
        let mut axis = 0;
        let mut best = e.x;
        if e.y > best {
            axis = 1;
            best = e.y;
        }
        if e.z > best {
            axis = 2;
        }
        axis
    }

    pub fn surface_area(&self) -> f32 {
        let d = self.extent();
        if d.x < 0.0 || d.y < 0.0 || d.z < 0.0 {
            // Degenerate (empty) box: no surface.
            return 0.0;
        }
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_union_point_yields_degenerate_point_box() {
        let b = Aabb::EMPTY.union_point(Vec3A::new(1.0, 2.0, 3.0));
        assert_eq!(b.lo, Vec3A::new(1.0, 2.0, 3.0));
        assert_eq!(b.hi, Vec3A::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn surface_area_of_unit_cube_is_six() {
        let b = Aabb {
            lo: Vec3A::ZERO,
            hi: Vec3A::ONE,
        };
        assert_relative_eq!(b.surface_area(), 6.0);
    }

    #[test]
    fn largest_axis_picks_lower_index_on_tie() {
        let b = Aabb {
            lo: Vec3A::ZERO,
            hi: Vec3A::new(2.0, 2.0, 1.0),
        };
        assert_eq!(b.largest_axis(), 0);
    }

    #[test]
    fn centroid_is_midpoint() {
        let b = Aabb::from_points(
            Vec3A::new(0.0, 0.0, 0.0),
            Vec3A::new(2.0, 0.0, 0.0),
            Vec3A::new(0.0, 2.0, 0.0),
        );
        assert_relative_eq!(b.centroid().x, 1.0);
        assert_relative_eq!(b.centroid().y, 1.0);
    }
}
