//! Point types and related functionality

use nalgebra::{Point3, Vector3};

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// A 3D vector with double precision components
pub type Vector3d = Vector3<f64>;

/// Euclidean distance between two points.
pub fn distance(a: &Point3d, b: &Point3d) -> f64 {
    (a - b).norm()
}

/// Midpoint of the segment `a`-`b`.
pub fn midpoint(a: &Point3d, b: &Point3d) -> Point3d {
    Point3d::from((a.coords + b.coords) * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance() {
        let a = Point3d::new(0.0, 0.0, 0.0);
        let b = Point3d::new(3.0, 4.0, 0.0);
        assert_relative_eq!(distance(&a, &b), 5.0);
        assert_relative_eq!(distance(&b, &a), 5.0);
    }

    #[test]
    fn test_midpoint() {
        let a = Point3d::new(-1.0, 2.0, 4.0);
        let b = Point3d::new(1.0, 0.0, 8.0);
        let m = midpoint(&a, &b);
        assert_relative_eq!(m, Point3d::new(0.0, 1.0, 6.0));
    }
}
