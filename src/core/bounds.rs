use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in projected (EPSG:3857) or pixel coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Creates new bounds from two points
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(Point::new(min_x, min_y), Point::new(max_x, max_y))
    }

    /// Creates bounds from a center point and size
    pub fn from_center_and_size(center: Point, width: f64, height: f64) -> Self {
        let half_width = width / 2.0;
        let half_height = height / 2.0;
        Self::new(
            Point::new(center.x - half_width, center.y - half_height),
            Point::new(center.x + half_width, center.y + half_height),
        )
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Formats the box the way WMS `BBOX` parameters expect it
    pub fn to_bbox_string(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min.x, self.min.y, self.max.x, self.max.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_creation() {
        let bounds = Bounds::from_center_and_size(Point::new(0.0, 0.0), 20.0, 10.0);
        assert_eq!(bounds.width(), 20.0);
        assert_eq!(bounds.height(), 10.0);
        assert_eq!(bounds.center(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_bounds_containment() {
        let bounds = Bounds::from_coords(0.0, 0.0, 10.0, 10.0);
        assert!(bounds.contains(&Point::new(5.0, 10.0)));
        assert!(!bounds.contains(&Point::new(15.0, 5.0)));
    }

    #[test]
    fn test_bbox_string() {
        let bounds = Bounds::from_coords(-1.5, 2.0, 3.0, 4.25);
        assert_eq!(bounds.to_bbox_string(), "-1.5,2,3,4.25");
    }
}
