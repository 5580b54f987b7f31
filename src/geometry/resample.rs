//! Perimeter-proportional equidistant resampling of a closed loop.

use super::{Point, Polygon};
use crate::{Coord, CoordF};

/// Resample a closed loop with up to `n` points spaced `perimeter / n`
/// apart along the boundary.
///
/// The walk starts at the loop's first vertex, which is always the first
/// output point, and steps along the original edges. Each time the step
/// distance is reached partway along an edge, the point is interpolated on
/// that edge (never extrapolated), truncated to integer coordinates,
/// emitted, and spliced into a working copy of the loop so the walk
/// continues from it. Edge lengths vary, so splicing is what lets a single
/// stepping loop handle edges both shorter and longer than the step.
///
/// The walk ends at the last original edge or once the result holds `n`
/// points, whichever comes first; the result can therefore hold fewer than
/// `n` points. Loops with fewer than 2 points come back unchanged, there
/// being no edge to interpolate on.
///
/// `perimeter` passes in an already-computed closed-loop perimeter; `None`
/// computes it here.
pub fn resample_path(path: &Polygon, n: usize, perimeter: Option<CoordF>) -> Polygon {
    if path.len() < 2 {
        return path.clone();
    }
    let pathlength = perimeter.unwrap_or_else(|| path.perimeter());

    // working copy with the loop explicitly closed
    let mut temp = path.points().to_vec();
    temp.push(temp[0]);

    let mut result = Polygon::with_capacity(n);
    result.push(temp[0]);

    let delta = pathlength / n as CoordF;
    let mut current = 0;
    let mut next = 1;
    let mut dist = 0.0;

    while current < temp.len() - 1 && result.len() < n {
        let edgelength = temp[current].distance(&temp[next]);
        if edgelength + dist < delta {
            // next vertex still closer than the sampling step
            dist += edgelength;
        } else {
            // split the edge at the remaining step distance
            let t = (delta - dist) / edgelength;
            let point = Point::new(
                (temp[current].x as CoordF + t * (temp[next].x - temp[current].x) as CoordF)
                    as Coord,
                (temp[current].y as CoordF + t * (temp[next].y - temp[current].y) as CoordF)
                    as Coord,
            );
            result.push(point);
            temp.insert(next, point);
            dist = 0.0;
        }
        current = next;
        next += 1;
    }
    result
}
