//! Planar cross-section storage, measurement, and resampling.
//!
//! A [`Slice`] owns exactly one contour, a set of implicitly closed integer
//! loops, together with the fixed-point scale used by the text contour
//! format: real-world coordinate = stored integer / scale. The scale is a
//! plain factor applied on load and save only; loops injected through
//! [`Slice::set_contour`] are assumed to already be expressed in the
//! slice's scale, and changing the scale never rewrites stored coordinates.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::geometry::{resample_path, PointF, Polygon, Polygons};
use crate::{Coord, CoordF, Error, Point, Result};

/// Default fixed-point denominator: two decimal places of precision.
pub const DEFAULT_SCALE: Coord = 100;

/// One planar cross-section at a given fixed-point scale.
///
/// Mutation is all-or-nothing: the contour is replaced wholesale via
/// [`Slice::set_contour`] or [`Slice::load_from_file`], and
/// [`Slice::resample_contour`] returns a new contour rather than editing
/// the stored one.
#[derive(Clone, Debug)]
pub struct Slice {
    contour: Polygons,
    scale: Coord,
}

impl Default for Slice {
    fn default() -> Self {
        Self::new()
    }
}

impl Slice {
    /// Create an empty slice at the default scale.
    pub fn new() -> Self {
        Self {
            contour: Polygons::new(),
            scale: DEFAULT_SCALE,
        }
    }

    /// Create an empty slice at the given scale.
    pub fn with_scale(scale: Coord) -> Self {
        Self {
            contour: Polygons::new(),
            scale,
        }
    }

    /// Load a slice from a contour file at the default scale.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut slice = Self::new();
        slice.load_from_file(path)?;
        Ok(slice)
    }

    /// Load a slice from a contour file at the given scale.
    pub fn from_file_with_scale<P: AsRef<Path>>(path: P, scale: Coord) -> Result<Self> {
        let mut slice = Self::with_scale(scale);
        slice.load_from_file(path)?;
        Ok(slice)
    }

    /// Set the fixed-point scale used by load and save. Already-stored
    /// coordinates are not converted.
    pub fn set_scale(&mut self, value: Coord) {
        self.scale = value;
    }

    /// The fixed-point scale.
    pub fn scale(&self) -> Coord {
        self.scale
    }

    /// Replace the owned contour. No validation is performed; the caller
    /// guarantees the loops are expressed in this slice's scale.
    pub fn set_contour(&mut self, contour: Polygons) {
        self.contour = contour;
    }

    /// The owned contour.
    pub fn contour(&self) -> &Polygons {
        &self.contour
    }

    /// The closed-loop perimeter of every loop in the contour.
    pub fn contour_lengths(&self) -> Vec<CoordF> {
        self.contour.iter().map(Polygon::perimeter).collect()
    }

    /// Resample the contour with `n` points distributed across the loops in
    /// proportion to each loop's share of the total perimeter.
    ///
    /// Each loop receives `round(n * share)` samples and is resampled
    /// independently via [`resample_path`] with its already-known
    /// perimeter, so the counts may not sum to exactly `n`. Degenerate
    /// loops (fewer than 3 points) are carried into the result unchanged
    /// and excluded from the allocation.
    ///
    /// Returns a new contour; the stored contour is untouched.
    pub fn resample_contour(&self, n: usize) -> Polygons {
        let lengths = self.contour_lengths();
        let total: CoordF = self
            .contour
            .iter()
            .zip(&lengths)
            .filter(|(pg, _)| !pg.is_degenerate())
            .map(|(_, &len)| len)
            .sum();

        let mut resampled = Polygons::with_capacity(self.contour.len());
        for (pg, &len) in self.contour.iter().zip(&lengths) {
            if pg.is_degenerate() || total <= 0.0 {
                resampled.push(pg.clone());
                continue;
            }
            let samples = (n as CoordF * (len / total)).round() as usize;
            resampled.push(resample_path(pg, samples, Some(len)));
        }
        resampled
    }

    /// First-difference direction estimate at one vertex: the outgoing edge
    /// vector minus the incoming edge vector, scaled to unit length.
    ///
    /// This is not a calculus-correct normal, just the diagonal of the two
    /// adjacent edge directions. Vertex indices wrap around the loop in
    /// both directions. When the two edge vectors are equal (the vertex is
    /// a straight continuation of perfectly colinear edges), the difference
    /// has zero length and the result is NaN; callers own that
    /// precondition.
    ///
    /// # Panics
    ///
    /// Panics if `loop_id` is out of range or the loop is empty.
    pub fn normal_at(&self, vertex_id: usize, loop_id: usize) -> PointF {
        let pg = &self.contour[loop_id];
        let sz = pg.len();
        let v = vertex_id % sz;
        let outgoing = (pg[(v + 1) % sz] - pg[v]).to_f64();
        let incoming = (pg[v] - pg[(v + sz - 1) % sz]).to_f64();
        (outgoing - incoming).normalized()
    }

    /// The [`Slice::normal_at`] estimate for consecutive vertices of one
    /// loop.
    ///
    /// Only `len - 1` estimates are produced: the walk stops before the
    /// last vertex, whose normal is never computed. Use
    /// [`Slice::normal_at`] with the last index to obtain it.
    ///
    /// # Panics
    ///
    /// Panics if `loop_id` is out of range or the loop is empty.
    pub fn loop_normals(&self, loop_id: usize) -> Vec<PointF> {
        let pg = &self.contour[loop_id];
        let sz = pg.len();
        let mut incoming = (pg[0] - pg[sz - 1]).to_f64();

        let mut normals = Vec::with_capacity(sz.saturating_sub(1));
        for i in 0..sz - 1 {
            let outgoing = (pg[i + 1] - pg[i]).to_f64();
            normals.push((outgoing - incoming).normalized());
            incoming = outgoing;
        }
        normals
    }

    /// Per-loop [`Slice::loop_normals`] across the whole contour.
    pub fn all_normals(&self) -> Vec<Vec<PointF>> {
        (0..self.contour.len())
            .map(|i| self.loop_normals(i))
            .collect()
    }

    /// Write the contour in the text format: one `"x, y,"` line per vertex
    /// with both coordinates divided by the slice scale, and one blank line
    /// after each loop. `decimal_places` is clamped to 8.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P, decimal_places: usize) -> Result<()> {
        let file = File::create(path)?;
        let mut out = BufWriter::new(file);

        let places = decimal_places.min(8);
        let scale = self.scale as CoordF;
        for pg in &self.contour {
            for p in pg {
                writeln!(
                    out,
                    "{:.prec$}, {:.prec$},",
                    p.x as CoordF / scale,
                    p.y as CoordF / scale,
                    prec = places
                )?;
            }
            writeln!(out)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Parse a contour file into this slice, replacing the stored contour.
    ///
    /// Each line whose first token parses as a number contributes one
    /// vertex: the two values, separated by an optional comma with optional
    /// surrounding spaces, are multiplied by the slice scale and truncated
    /// to integer coordinates. A blank line, or any line whose first token
    /// is not numeric, closes the current loop and starts the next one.
    ///
    /// A line whose first value parses but whose second does not is
    /// malformed input: loops completed before it are kept, the current
    /// partial loop is dropped, the rest of the file goes unread, and the
    /// error is returned.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.contour.clear();
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let scale = self.scale as CoordF;
        let mut pg = Polygon::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let Some((x, rest)) = scan_number(&line) else {
                // blank or non-numeric line flags the start of the next loop
                if !pg.is_empty() {
                    self.contour.push(std::mem::take(&mut pg));
                }
                continue;
            };
            let rest = rest.trim_start();
            let rest = rest.strip_prefix(',').unwrap_or(rest);
            let Some((y, _)) = scan_number(rest) else {
                return Err(Error::MalformedLine {
                    line: idx + 1,
                    content: line,
                });
            };
            pg.push(Point::new((x * scale) as Coord, (y * scale) as Coord));
        }
        if !pg.is_empty() {
            self.contour.push(pg);
        }
        Ok(())
    }
}

/// Scan the leading float literal of a line after optional whitespace,
/// returning it with the unconsumed remainder. `None` when the line does
/// not start with a number.
fn scan_number(s: &str) -> Option<(CoordF, &str)> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
        end += 1;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        if exp < bytes.len() && bytes[exp].is_ascii_digit() {
            end = exp;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
        }
    }
    s[..end].parse().ok().map(|value| (value, &s[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: Coord) -> Polygon {
        Polygon::from_points(vec![
            Point::new(0, 0),
            Point::new(side, 0),
            Point::new(side, side),
            Point::new(0, side),
        ])
    }

    #[test]
    fn test_default_scale() {
        assert_eq!(Slice::new().scale(), 100);
        assert_eq!(Slice::with_scale(10_000).scale(), 10_000);
    }

    #[test]
    fn test_set_contour_replaces() {
        let mut slice = Slice::new();
        assert!(slice.contour().is_empty());
        slice.set_contour(vec![square(100)]);
        assert_eq!(slice.contour().len(), 1);
        slice.set_contour(Polygons::new());
        assert!(slice.contour().is_empty());
    }

    #[test]
    fn test_contour_lengths() {
        let mut slice = Slice::new();
        slice.set_contour(vec![
            square(100),
            Polygon::from_points(vec![Point::new(0, 0), Point::new(10, 0), Point::new(10, 10)]),
        ]);
        let lengths = slice.contour_lengths();
        assert_eq!(lengths.len(), 2);
        assert!((lengths[0] - 400.0).abs() < 1e-9);
        assert!((lengths[1] - (20.0 + 200.0_f64.sqrt())).abs() < 1e-9);
    }

    #[test]
    fn test_resample_contour_proportional_allocation() {
        // perimeters 400 and 1200: a quarter and three quarters of n
        let mut slice = Slice::new();
        slice.set_contour(vec![square(100), square(300)]);
        let resampled = slice.resample_contour(16);
        assert_eq!(resampled.len(), 2);
        assert_eq!(resampled[0].len(), 4);
        assert_eq!(resampled[1].len(), 12);
        // the stored contour is untouched
        assert_eq!(slice.contour()[0].len(), 4);
        assert_eq!(slice.contour()[1].len(), 4);
    }

    #[test]
    fn test_resample_contour_sum_may_differ_from_n() {
        // three equal loops, n = 4: each rounds to 1 sample
        let mut slice = Slice::new();
        slice.set_contour(vec![square(25), square(25), square(25)]);
        let resampled = slice.resample_contour(4);
        let total: usize = resampled.iter().map(Polygon::len).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_resample_contour_carries_degenerate_loops() {
        let pair = Polygon::from_points(vec![Point::new(500, 500), Point::new(600, 600)]);
        let mut slice = Slice::new();
        slice.set_contour(vec![square(100), pair.clone()]);
        let resampled = slice.resample_contour(4);
        // the degenerate loop takes no share of the allocation
        assert_eq!(resampled[0].points(), square(100).points());
        assert_eq!(resampled[1], pair);
    }

    #[test]
    fn test_resampled_perimeter_approaches_from_below() {
        let mut slice = Slice::new();
        slice.set_contour(vec![square(10_000)]);
        let coarse = slice.resample_contour(16)[0].perimeter();
        let fine = slice.resample_contour(256)[0].perimeter();
        assert!(coarse <= 40_000.0 + 1e-6);
        assert!(fine <= 40_000.0 + 1e-6);
        assert!(fine > 39_500.0);
    }

    #[test]
    fn test_normal_at() {
        let mut slice = Slice::new();
        slice.set_contour(vec![square(100)]);
        let inv_sqrt2 = 1.0 / 2.0_f64.sqrt();

        let n = slice.normal_at(1, 0);
        assert!((n.x + inv_sqrt2).abs() < 1e-12);
        assert!((n.y - inv_sqrt2).abs() < 1e-12);

        // index 0 wraps to the last vertex for the incoming edge
        let n = slice.normal_at(0, 0);
        assert!((n.x - inv_sqrt2).abs() < 1e-12);
        assert!((n.y - inv_sqrt2).abs() < 1e-12);

        // indices past the end wrap as well
        let n4 = slice.normal_at(4, 0);
        let n0 = slice.normal_at(0, 0);
        assert_eq!(n4, n0);
    }

    #[test]
    fn test_loop_normals_skips_last_vertex() {
        let mut slice = Slice::new();
        slice.set_contour(vec![square(100)]);
        let normals = slice.loop_normals(0);
        assert_eq!(normals.len(), 3);
        for (i, n) in normals.iter().enumerate() {
            let expected = slice.normal_at(i, 0);
            assert!((n.x - expected.x).abs() < 1e-12);
            assert!((n.y - expected.y).abs() < 1e-12);
        }
    }

    #[test]
    fn test_all_normals() {
        let mut slice = Slice::new();
        slice.set_contour(vec![square(100), square(300)]);
        let normals = slice.all_normals();
        assert_eq!(normals.len(), 2);
        assert_eq!(normals[0].len(), 3);
        assert_eq!(normals[1].len(), 3);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contour.txt");

        let mut slice = Slice::new();
        slice.set_contour(vec![
            Polygon::from_points(vec![
                Point::new(12_345, 6_789),
                Point::new(-4_567, 890),
                Point::new(0, -10_000),
            ]),
            square(100),
        ]);
        slice.save_to_file(&path, 3).unwrap();

        let loaded = Slice::from_file(&path).unwrap();
        assert_eq!(loaded.contour().len(), 2);
        for (orig, read) in slice.contour().iter().zip(loaded.contour()) {
            assert_eq!(orig.len(), read.len());
            for (a, b) in orig.iter().zip(read) {
                // within truncation error of the written precision
                assert!((a.x - b.x).abs() <= 1, "{:?} vs {:?}", a, b);
                assert!((a.y - b.y).abs() <= 1, "{:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_load_example_contour() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("triangle.txt");
        std::fs::write(&path, "0, 0,\n10, 0,\n10, 10,\n\n").unwrap();

        let slice = Slice::from_file_with_scale(&path, 1).unwrap();
        assert_eq!(slice.contour().len(), 1);
        assert_eq!(
            slice.contour()[0].points(),
            &[Point::new(0, 0), Point::new(10, 0), Point::new(10, 10)]
        );
        let expected = 10.0 + 10.0 + 200.0_f64.sqrt();
        assert!((slice.contour_lengths()[0] - expected).abs() < 1e-9);
    }

    #[test]
    fn test_load_scales_and_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scaled.txt");
        std::fs::write(&path, "1.239, -0.015,\n2 3\n").unwrap();

        let slice = Slice::from_file(&path).unwrap();
        // scale 100, truncated toward zero; the comma is optional
        assert_eq!(
            slice.contour()[0].points(),
            &[Point::new(123, -1), Point::new(200, 300)]
        );
    }

    #[test]
    fn test_load_blank_lines_separate_loops() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loops.txt");
        std::fs::write(&path, "0, 0,\n1, 0,\n1, 1,\n\n\n5, 5,\n6, 5,\n6, 6,\n").unwrap();

        let slice = Slice::from_file_with_scale(&path, 1).unwrap();
        assert_eq!(slice.contour().len(), 2);
        assert_eq!(slice.contour()[0].len(), 3);
        assert_eq!(slice.contour()[1].len(), 3);
    }

    #[test]
    fn test_load_non_numeric_line_closes_loop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("separator.txt");
        std::fs::write(&path, "0, 0,\nnot a number\n1, 1,\n").unwrap();

        let slice = Slice::from_file_with_scale(&path, 1).unwrap();
        assert_eq!(slice.contour().len(), 2);
        assert_eq!(slice.contour()[0].points(), &[Point::new(0, 0)]);
        assert_eq!(slice.contour()[1].points(), &[Point::new(1, 1)]);
    }

    #[test]
    fn test_load_malformed_second_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("malformed.txt");
        std::fs::write(&path, "0, 0,\n1, 0,\n1, 1,\n\n7, oops,\n8, 8,\n").unwrap();

        let mut slice = Slice::with_scale(1);
        let err = slice.load_from_file(&path).unwrap_err();
        assert!(matches!(err, Error::MalformedLine { line: 5, .. }));
        // the completed loop is kept, the partial one is dropped
        assert_eq!(slice.contour().len(), 1);
        assert_eq!(slice.contour()[0].len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Slice::from_file("/nonexistent/contour.txt").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_save_clamps_decimal_places() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clamped.txt");

        let mut slice = Slice::with_scale(1);
        slice.set_contour(vec![Polygon::from_points(vec![Point::new(1, 2)])]);
        slice.save_to_file(&path, 20).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "1.00000000, 2.00000000,\n\n");
    }

    #[test]
    fn test_scan_number() {
        assert_eq!(scan_number("  -1.5, 2"), Some((-1.5, ", 2")));
        assert_eq!(scan_number("3e2 tail"), Some((300.0, " tail")));
        assert_eq!(scan_number(""), None);
        assert_eq!(scan_number("   "), None);
        assert_eq!(scan_number("x 1"), None);
    }
}
