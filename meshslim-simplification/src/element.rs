//! Vertices and triangles of the simplification arena
//!
//! Both are addressed by their slot in the arena. Removal only sets a
//! tombstone flag, so a slot stays a valid lookup key for the whole run.

use crate::quadric::Quadric;
use meshslim_core::{Error, Point3d, Result};
use nalgebra::Vector4;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// A vertex of the arena.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub position: Point3d,
    pub quadric: Quadric,
    /// Live triangles incident on this vertex (triangle slots).
    pub triangles: Vec<usize>,
    /// Vertices this one currently has a candidate pair with (vertex slots).
    pub paired: BTreeSet<usize>,
    removed: bool,
}

impl Vertex {
    pub fn new(position: Point3d) -> Self {
        Self {
            position,
            quadric: Quadric::zeros(),
            triangles: Vec::new(),
            paired: BTreeSet::new(),
            removed: false,
        }
    }

    #[inline]
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub(crate) fn mark_removed(&mut self) {
        self.removed = true;
    }

    /// Detach triangle `t` from this vertex's incidence list.
    pub(crate) fn remove_triangle(&mut self, t: usize) -> Result<()> {
        match self.triangles.iter().position(|&x| x == t) {
            Some(i) => {
                self.triangles.swap_remove(i);
                Ok(())
            }
            None => Err(Error::InvariantViolation(format!(
                "triangle {} is not incident on the vertex it is detached from",
                t
            ))),
        }
    }
}

/// A triangle of the arena.
///
/// At creation the vertex with the smallest slot is stored first and the
/// other two follow in their original cyclic order, so the orientation is
/// kept. Rewiring replaces a corner in place.
#[derive(Debug, Clone)]
pub struct Triangle {
    vertices: [usize; 3],
    /// Unit normal `(a, b, c)` and offset `d` at construction time.
    pub plane: Vector4<f64>,
    removed: bool,
}

impl Triangle {
    pub fn new(vertices: [usize; 3], positions: [&Point3d; 3]) -> Self {
        let plane = plane_through(positions[0], positions[1], positions[2]);
        Self {
            vertices: canonical_rotation(vertices),
            plane,
            removed: false,
        }
    }

    #[inline]
    pub fn vertices(&self) -> [usize; 3] {
        self.vertices
    }

    #[inline]
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub(crate) fn mark_removed(&mut self) {
        self.removed = true;
    }

    #[inline]
    pub fn contains(&self, v: usize) -> bool {
        self.vertices.contains(&v)
    }

    /// Rewire the corner that referenced `old` to `new`. The corner order is
    /// left as is.
    pub(crate) fn replace_vertex(&mut self, old: usize, new: usize) -> Result<()> {
        match self.vertices.iter_mut().find(|v| **v == old) {
            Some(slot) => {
                *slot = new;
                Ok(())
            }
            None => Err(Error::InvariantViolation(format!(
                "vertex {} is not a corner of triangle {:?}",
                old, self.vertices
            ))),
        }
    }
}

impl PartialEq for Triangle {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices
    }
}

impl Eq for Triangle {}

impl PartialOrd for Triangle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Triangle {
    fn cmp(&self, other: &Self) -> Ordering {
        self.vertices.cmp(&other.vertices)
    }
}

/// Rotate `v` so its smallest entry comes first.
pub fn canonical_rotation(v: [usize; 3]) -> [usize; 3] {
    if v[1] < v[0] && v[1] < v[2] {
        [v[1], v[2], v[0]]
    } else if v[2] < v[0] && v[2] < v[1] {
        [v[2], v[0], v[1]]
    } else {
        v
    }
}

/// Plane through three points as `(a, b, c, d)` with a unit normal.
///
/// Zero-area triangles get the zero plane, which adds nothing to a quadric.
pub fn plane_through(p0: &Point3d, p1: &Point3d, p2: &Point3d) -> Vector4<f64> {
    let n = (p1 - p0).cross(&(p2 - p0));
    let norm = n.norm();
    if norm == 0.0 || !norm.is_finite() {
        return Vector4::zeros();
    }
    let n = n / norm;
    let d = -n.dot(&p0.coords);
    Vector4::new(n.x, n.y, n.z, d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_canonical_rotation_keeps_orientation() {
        assert_eq!(canonical_rotation([0, 1, 2]), [0, 1, 2]);
        assert_eq!(canonical_rotation([2, 0, 1]), [0, 1, 2]);
        assert_eq!(canonical_rotation([1, 2, 0]), [0, 1, 2]);
        // Opposite winding stays opposite.
        assert_eq!(canonical_rotation([5, 9, 3]), [3, 5, 9]);
        assert_eq!(canonical_rotation([9, 3, 5]), [3, 5, 9]);
        assert_eq!(canonical_rotation([4, 7, 6]), [4, 7, 6]);
    }

    #[test]
    fn test_plane_through() {
        let p0 = Point3d::new(0.0, 0.0, 2.0);
        let p1 = Point3d::new(1.0, 0.0, 2.0);
        let p2 = Point3d::new(0.0, 1.0, 2.0);
        let plane = plane_through(&p0, &p1, &p2);
        assert_relative_eq!(plane, Vector4::new(0.0, 0.0, 1.0, -2.0));
        for p in [p0, p1, p2] {
            let s = plane[0] * p.x + plane[1] * p.y + plane[2] * p.z + plane[3];
            assert_relative_eq!(s, 0.0);
        }
    }

    #[test]
    fn test_plane_degenerate() {
        let p = Point3d::new(1.0, 1.0, 1.0);
        let q = Point3d::new(2.0, 2.0, 2.0);
        assert_eq!(plane_through(&p, &q, &p), Vector4::zeros());
    }

    #[test]
    fn test_triangle_canonical_and_plane_frozen() {
        let positions = [
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(1.0, 0.0, 0.0),
            Point3d::new(0.0, 1.0, 0.0),
        ];
        // Slots 7, 3, 5 in that cyclic order.
        let t = Triangle::new([7, 3, 5], [&positions[0], &positions[1], &positions[2]]);
        assert_eq!(t.vertices(), [3, 5, 7]);
        assert_relative_eq!(t.plane, Vector4::new(0.0, 0.0, 1.0, 0.0));
        assert!(t.contains(5));
        assert!(!t.contains(0));
    }

    #[test]
    fn test_triangle_replace_vertex() {
        let p = Point3d::origin();
        let mut t = Triangle::new([0, 1, 2], [&p, &p, &p]);
        t.replace_vertex(1, 9).unwrap();
        assert_eq!(t.vertices(), [0, 9, 2]);
        t.replace_vertex(0, 4).unwrap();
        assert_eq!(t.vertices(), [4, 9, 2]);
        assert!(matches!(
            t.replace_vertex(7, 5),
            Err(Error::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_triangle_order() {
        let p = Point3d::origin();
        let a = Triangle::new([2, 0, 1], [&p, &p, &p]);
        let b = Triangle::new([0, 1, 2], [&p, &p, &p]);
        let c = Triangle::new([0, 2, 1], [&p, &p, &p]);
        assert_eq!(a, b);
        assert!(b < c);
    }

    #[test]
    fn test_vertex_remove_triangle() {
        let mut v = Vertex::new(Point3d::origin());
        v.triangles.extend([3, 8, 1]);
        v.remove_triangle(8).unwrap();
        assert_eq!(v.triangles.len(), 2);
        assert!(!v.triangles.contains(&8));
        assert!(v.remove_triangle(8).is_err());
    }
}
