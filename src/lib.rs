//! # slice2d
//!
//! Resampling and SVG rendering for planar cross-sections ("slices").
//!
//! A slice is one 2-D cross-section of a solid: a set of closed polygonal
//! loops stored in fixed-point integer coordinates, where the real-world
//! coordinate is the stored integer divided by the slice's scale factor.
//! This library provides the two derived operations on that representation:
//!
//! - Perimeter-proportional equidistant resampling of the loops, with
//!   per-vertex differential direction estimates
//! - Rendering of styled loop-sets to a scalable vector image for visual
//!   inspection
//!
//! Boolean operations on polygons (union, intersection, offsetting) are out
//! of scope; loops are consumed as-is, winding semantics uninterpreted.
//!
//! ## Example
//!
//! ```rust,ignore
//! use slice2d::{Slice, SvgBuilder};
//!
//! let slice = Slice::from_file("contour.txt")?;
//! let mut resampled = Slice::with_scale(slice.scale());
//! resampled.set_contour(slice.resample_contour(1000));
//!
//! let mut svg = SvgBuilder::new();
//! svg.add_paths(resampled.contour());
//! svg.save_to_file("contour.svg", 1.0, 10)?;
//! ```

pub mod geometry;
pub mod slice;
pub mod svg;

// Re-export commonly used types
pub use geometry::{resample_path, FillRule, Point, PointF, Polygon, Polygons};
pub use slice::{Slice, DEFAULT_SCALE};
pub use svg::{Color, PolyInfo, StyleInfo, SvgBuilder};

/// Coordinate type used throughout the library.
/// Coordinates are fixed-point integers; the denominator is carried by the
/// owning [`Slice`] rather than baked in globally.
pub type Coord = i64;

/// Floating-point coordinate type for derived quantities (lengths, normals).
pub type CoordF = f64;

/// Result type used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for slice operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed coordinate line {line}: {content:?}")]
    MalformedLine { line: usize, content: String },

    #[error("invalid geometry: {0}")]
    Geometry(String),
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
