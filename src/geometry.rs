//! Fundamental geometric types for crack growth modelling.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Position in the plane of the plate measured in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Distance along the global X axis.
    pub x: f64,
    /// Distance along the global Y axis.
    pub y: f64,
}

impl Point {
    /// Create a [`Point`] with explicit coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert the point into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (other.to_vector() - self.to_vector()).norm()
    }
}

impl From<Vector2<f64>> for Point {
    fn from(value: Vector2<f64>) -> Self {
        Self::new(value.x, value.y)
    }
}

impl From<Point> for Vector2<f64> {
    fn from(value: Point) -> Self {
        value.to_vector()
    }
}

/// Convenience helper for creating [`Point`] instances.
///
/// # Examples
/// ```
/// use crackx::point;
///
/// let tip = point(1.0, 10.0);
/// assert_eq!(tip.y, 10.0);
/// ```
#[must_use]
pub const fn point(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// Rectangular plate that hosts the crack.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plate {
    /// Extent along X.
    pub width: f64,
    /// Extent along Y.
    pub height: f64,
    /// Extrusion depth.
    pub thickness: f64,
}

impl Default for Plate {
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 20.0,
            thickness: 0.1,
        }
    }
}

/// Ordered crack tip history, seed points first.
///
/// The path only grows: points are appended after each successful increment and
/// are never removed or reordered, so it always holds at least two points.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CrackPath {
    /// Tip coordinates in growth order.
    points: Vec<Point>,
}

impl CrackPath {
    /// Start a path from its seed points.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SeedPathTooShort`] when fewer than two points are supplied.
    ///
    /// # Examples
    /// ```
    /// use crackx::{point, CrackPath};
    ///
    /// let path = CrackPath::new(vec![point(0.0, 10.0), point(1.0, 10.0)]).unwrap();
    /// assert_eq!(path.tip(), point(1.0, 10.0));
    /// assert!(CrackPath::new(vec![point(0.0, 10.0)]).is_err());
    /// ```
    pub fn new(seed: Vec<Point>) -> Result<Self, ConfigError> {
        if seed.len() < 2 {
            return Err(ConfigError::SeedPathTooShort(seed.len()));
        }
        Ok(Self { points: seed })
    }

    /// Current crack tip.
    #[must_use]
    pub fn tip(&self) -> Point {
        // never empty
        self.points[self.points.len() - 1]
    }

    /// Append a new tip.
    pub fn push(&mut self, tip: Point) {
        self.points.push(tip);
    }

    /// All points in growth order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of points, seed included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; present for API symmetry with [`CrackPath::len`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
