//! SVG rendering of styled loop-sets.
//!
//! [`SvgBuilder`] accumulates registered groups, each an immutable pairing
//! of a contour snapshot with the style current at registration, and
//! serializes them into a single self-contained SVG document. Groups are
//! painted in insertion order, later groups on top; there is no other
//! layering.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geometry::{FillRule, Polygons};
use crate::{Coord, CoordF, Error, Result};

/// A color in 0xAARRGGBB form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    /// The `#rrggbb` hex form, alpha dropped.
    pub fn html(&self) -> String {
        format!("#{:06x}", self.0 & 0x00FF_FFFF)
    }

    /// The alpha channel as a fraction in `[0, 1]`.
    pub fn alpha_frac(&self) -> CoordF {
        (self.0 >> 24) as CoordF / 255.0
    }
}

/// Style applied to a registered group: fill rule, fill and stroke colors
/// with alpha, stroke width, and the vertex-annotation flag.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleInfo {
    pub fill_rule: FillRule,
    pub brush: Color,
    pub pen: Color,
    pub pen_width: CoordF,
    /// Label every vertex with its raw integer coordinates.
    pub show_coords: bool,
}

impl Default for StyleInfo {
    fn default() -> Self {
        Self {
            fill_rule: FillRule::NonZero,
            brush: Color(0xFFFF_FFCC),
            pen: Color(0xFF00_0000),
            pen_width: 0.8,
            show_coords: false,
        }
    }
}

/// A registered group: a contour snapshot paired with the style that was
/// current when it was added.
#[derive(Clone, Debug)]
pub struct PolyInfo {
    pub paths: Polygons,
    pub style: StyleInfo,
}

/// Accumulates styled loop-sets and writes them as one SVG document.
///
/// `style` is the style applied to the next [`SvgBuilder::add_paths`] call.
/// It is copied into the group at registration, so later edits never affect
/// groups already added.
#[derive(Debug, Default)]
pub struct SvgBuilder {
    groups: Vec<PolyInfo>,
    pub style: StyleInfo,
}

impl SvgBuilder {
    /// Create an empty builder with the default style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a contour with a snapshot of the current style. A contour
    /// with no loops is ignored.
    pub fn add_paths(&mut self, paths: &Polygons) {
        if paths.is_empty() {
            return;
        }
        self.groups.push(PolyInfo {
            paths: paths.clone(),
            style: self.style,
        });
    }

    /// The registered groups, in paint order.
    pub fn groups(&self) -> &[PolyInfo] {
        &self.groups
    }

    /// Serialize every registered group into an SVG file.
    ///
    /// The document is sized to the bounding box of all registered points
    /// (loops of every size contribute; only empty loops are skipped),
    /// multiplied by `scale` and padded by `margin` on every side. A
    /// `scale` of 0 is treated as 1; a negative `margin` is clamped to 0.
    ///
    /// Loops with fewer than 3 points draw nothing. Fails when no group
    /// holds a non-empty loop, or the file cannot be created.
    pub fn save_to_file<P: AsRef<Path>>(
        &self,
        path: P,
        scale: CoordF,
        margin: Coord,
    ) -> Result<()> {
        let mut bounds: Option<(Coord, Coord, Coord, Coord)> = None;
        for info in &self.groups {
            for pg in &info.paths {
                for p in pg {
                    bounds = Some(match bounds {
                        None => (p.x, p.y, p.x, p.y),
                        Some((left, top, right, bottom)) => (
                            left.min(p.x),
                            top.min(p.y),
                            right.max(p.x),
                            bottom.max(p.y),
                        ),
                    });
                }
            }
        }
        let Some((left, top, right, bottom)) = bounds else {
            return Err(Error::Geometry("no non-empty loop to render".to_string()));
        };

        let scale = if scale == 0.0 { 1.0 } else { scale };
        let margin = margin.max(0);
        let left = (left as CoordF * scale) as Coord;
        let top = (top as CoordF * scale) as Coord;
        let right = (right as CoordF * scale) as Coord;
        let bottom = (bottom as CoordF * scale) as Coord;
        let offset_x = margin - left;
        let offset_y = margin - top;
        let width = (right - left) + margin * 2;
        let height = (bottom - top) + margin * 2;

        let file = File::create(path)?;
        let mut out = BufWriter::new(file);
        writeln!(out, "<?xml version=\"1.0\" standalone=\"no\"?>")?;
        writeln!(out, "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.0//EN\"")?;
        writeln!(
            out,
            "\"http://www.w3.org/TR/2001/REC-SVG-20010904/DTD/svg10.dtd\">"
        )?;
        writeln!(out)?;
        writeln!(
            out,
            "<svg width=\"{w}px\" height=\"{h}px\" viewBox=\"0 0 {w} {h}\" version=\"1.0\" xmlns=\"http://www.w3.org/2000/svg\">",
            w = width,
            h = height
        )?;
        writeln!(out)?;

        for info in &self.groups {
            write!(out, " <path d=\"")?;
            for pg in &info.paths {
                if pg.len() < 3 {
                    continue;
                }
                let first = pg[0];
                write!(
                    out,
                    " M {:.2} {:.2}",
                    first.x as CoordF * scale + offset_x as CoordF,
                    first.y as CoordF * scale + offset_y as CoordF
                )?;
                for p in pg.iter().skip(1) {
                    write!(
                        out,
                        " L {:.2} {:.2}",
                        p.x as CoordF * scale + offset_x as CoordF,
                        p.y as CoordF * scale + offset_y as CoordF
                    )?;
                }
                write!(out, " z")?;
            }
            writeln!(out, "\"")?;
            writeln!(
                out,
                " style=\"fill:{}; fill-opacity:{:.2}; fill-rule:{}; stroke:{}; stroke-opacity:{:.2}; stroke-width:{:.2};\"/>",
                info.style.brush.html(),
                info.style.brush.alpha_frac(),
                info.style.fill_rule.as_svg(),
                info.style.pen.html(),
                info.style.pen.alpha_frac(),
                info.style.pen_width
            )?;
            writeln!(out)?;

            if info.style.show_coords {
                writeln!(out, "<g font-family=\"Verdana\" font-size=\"11\" fill=\"black\">")?;
                for pg in &info.paths {
                    if pg.len() < 3 {
                        continue;
                    }
                    for p in pg {
                        writeln!(
                            out,
                            "<text x=\"{}\" y=\"{}\">{},{}</text>",
                            (p.x as CoordF * scale) as Coord + offset_x,
                            (p.y as CoordF * scale) as Coord + offset_y,
                            p.x,
                            p.y
                        )?;
                    }
                }
                writeln!(out, "</g>")?;
            }
        }
        writeln!(out, "</svg>")?;
        out.flush()?;
        Ok(())
    }
}
