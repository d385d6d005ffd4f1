use serde::{Deserialize, Serialize};

/// Represents a point or a size in screen, container or image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn multiply(&self, scalar: f64) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }

    pub fn divide(&self, scalar: f64) -> Point {
        Point::new(self.x / scalar, self.y / scalar)
    }

    /// Half of this point, used to find the centre of a size
    pub fn half(&self) -> Point {
        self.multiply(0.5)
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Both components are finite and strictly positive
    pub fn is_positive_size(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.x > 0.0 && self.y > 0.0
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let a = Point::new(3.0, 4.0);
        let b = Point::new(1.0, 2.0);

        assert_eq!(a.add(&b), Point::new(4.0, 6.0));
        assert_eq!(a.subtract(&b), Point::new(2.0, 2.0));
        assert_eq!(a.multiply(2.0), Point::new(6.0, 8.0));
        assert_eq!(a.divide(2.0), Point::new(1.5, 2.0));
        assert_eq!(a.half(), Point::new(1.5, 2.0));
        assert_eq!(Point::zero().distance_to(&a), 5.0);
    }

    #[test]
    fn test_positive_size() {
        assert!(Point::new(800.0, 600.0).is_positive_size());
        assert!(!Point::new(0.0, 600.0).is_positive_size());
        assert!(!Point::new(f64::NAN, 1.0).is_positive_size());
    }
}
