//! A few useful geometric types

use nalgebra::Vector2;

pub type Point2D = Vector2<f64>;

/// Euclidean distance between two points.
///
/// Coordinates are expected to be finite.
pub fn distance(a: Point2D, b: Point2D) -> f64 {
    (a - b).norm()
}

/// Unweighted mean of the given points, or `None` if there are none.
pub fn centroid(points: &[Point2D]) -> Option<Point2D> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(Point2D::zeros(), |acc, p| acc + p);
    Some(sum / points.len() as f64)
}
