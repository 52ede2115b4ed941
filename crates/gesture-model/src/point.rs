//! Planar points and path metrics.

use serde::{Deserialize, Serialize};

/// A position on the touch surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Length of a polyline: the sum of its segment lengths.
///
/// Zero for paths with fewer than two points.
pub fn path_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_path_length_short_paths() {
        assert_eq!(path_length(&[]), 0.0);
        assert_eq!(path_length(&[Point::new(5.0, 5.0)]), 0.0);
    }

    #[test]
    fn test_path_length_l_shape() {
        let path = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 5.0),
        ];
        assert!((path_length(&path) - 15.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn path_length_matches_segment_sum(
            coords in prop::collection::vec((-1000.0f64..1000.0, -1000.0f64..1000.0), 0..32)
        ) {
            let points: Vec<Point> = coords.into_iter().map(Point::from).collect();
            let mut expected = 0.0;
            for i in 1..points.len() {
                let dx = points[i].x - points[i - 1].x;
                let dy = points[i].y - points[i - 1].y;
                expected += (dx * dx + dy * dy).sqrt();
            }
            prop_assert!((path_length(&points) - expected).abs() < 1e-6);
        }

        #[test]
        fn path_length_is_at_least_chord(
            coords in prop::collection::vec((-1000.0f64..1000.0, -1000.0f64..1000.0), 2..32)
        ) {
            let points: Vec<Point> = coords.into_iter().map(Point::from).collect();
            let chord = points[0].distance(&points[points.len() - 1]);
            prop_assert!(path_length(&points) + 1e-6 >= chord);
        }
    }
}
