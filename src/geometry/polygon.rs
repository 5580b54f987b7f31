//! Closed polygon loop and contour types.
//!
//! This module provides the Polygon type representing a closed loop (the
//! last point connects back to the first without being repeated), and the
//! Polygons collection describing one possibly multiply connected contour.

use super::Point;
use crate::CoordF;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, Index};

/// An implicitly closed loop defined by a sequence of points.
///
/// The closing edge from the last point back to the first is implied and
/// never stored. Loops with fewer than 3 points are degenerate: they may be
/// stored, but consumers that draw or measure perimeter-dependent
/// quantities skip them.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    /// Create a new empty loop.
    #[inline]
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Create a loop from a vector of points.
    #[inline]
    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Create a loop with the given capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Get the points of this loop.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Get the number of points in the loop.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the loop has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A loop with fewer than 3 points has no interior and no drawable
    /// boundary.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 3
    }

    /// Add a point to the loop.
    #[inline]
    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Closed-loop perimeter: the sum of consecutive vertex distances,
    /// wrapping from the last point back to the first.
    pub fn perimeter(&self) -> CoordF {
        let n = self.points.len();
        let mut total = 0.0;
        for i in 0..n {
            total += self.points[i].distance(&self.points[(i + 1) % n]);
        }
        total
    }
}

impl fmt::Debug for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Polygon({} points)", self.points.len())
    }
}

impl Deref for Polygon {
    type Target = [Point];

    fn deref(&self) -> &Self::Target {
        &self.points
    }
}

impl Index<usize> for Polygon {
    type Output = Point;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl From<Vec<Point>> for Polygon {
    fn from(points: Vec<Point>) -> Self {
        Self::from_points(points)
    }
}

impl<'a> IntoIterator for &'a Polygon {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Type alias for a contour: a collection of loops describing one planar
/// cross-section. Loop order is not semantically meaningful beyond
/// deterministic serialization.
pub type Polygons = Vec<Polygon>;

/// Winding rule determining a loop-set's interior when rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

impl FillRule {
    /// The SVG attribute value for this rule.
    #[inline]
    pub fn as_svg(&self) -> &'static str {
        match self {
            FillRule::NonZero => "nonzero",
            FillRule::EvenOdd => "evenodd",
        }
    }
}
