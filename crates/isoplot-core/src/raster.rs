//! Point generation for rasterized primitives.
//!
//! These functions only produce ordered cell coordinates; writing them into
//! the grid is the job of [`IsoPlot`](crate::IsoPlot). Segment discovery
//! replays the very same sequences, so the order produced here is part of
//! the contract.

use crate::grid::{Bounds, GridPoint};

/// Integer Bresenham line from `from` to `to`, both ends included.
///
/// Every point produced lies between the two ends, so callers should clip
/// far-off ends with [`clip_line`] first.
pub fn bresenham_line(from: GridPoint, to: GridPoint) -> Vec<GridPoint> {
    let (x1, y1) = (i64::from(to.x), i64::from(to.y));
    let dx = (x1 - i64::from(from.x)).abs();
    let dy = -(y1 - i64::from(from.y)).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx + dy;

    let mut points = Vec::with_capacity(usize::try_from(dx.max(-dy) + 1).unwrap_or(0));
    let (mut x, mut y) = (i64::from(from.x), i64::from(from.y));
    loop {
        points.push(GridPoint::new(x as i32, y as i32));
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    points
}

/// Liang-Barsky clip of the line `from`-`to` to `clip`.
///
/// Ends already inside are kept exactly; ends outside are moved onto the
/// rectangle and rounded. `None` when the line misses the rectangle.
pub fn clip_line(from: GridPoint, to: GridPoint, clip: &Bounds) -> Option<(GridPoint, GridPoint)> {
    let inside = |p: GridPoint| clip.contains(i64::from(p.x), i64::from(p.y));
    if inside(from) && inside(to) {
        return Some((from, to));
    }

    let (x0, y0) = (f64::from(from.x), f64::from(from.y));
    let dx = f64::from(to.x) - x0;
    let dy = f64::from(to.y) - y0;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    let edges = [
        (-dx, x0 - f64::from(clip.min_x)),
        (dx, f64::from(clip.max_x) - x0),
        (-dy, y0 - f64::from(clip.min_y)),
        (dy, f64::from(clip.max_y) - y0),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let at = |p: GridPoint, t: f64| {
        if inside(p) {
            return p;
        }
        let x = (x0 + t * dx).round() as i64;
        let y = (y0 + t * dy).round() as i64;
        GridPoint::new(
            x.clamp(i64::from(clip.min_x), i64::from(clip.max_x)) as i32,
            y.clamp(i64::from(clip.min_y), i64::from(clip.max_y)) as i32,
        )
    };
    Some((at(from, t0), at(to, t1)))
}

/// Cut a walk into the stretches lying inside `clip`. Points outside are
/// dropped and split the walk, just as an interior cell would.
pub fn clip_walk<I>(points: I, clip: &Bounds) -> Vec<Vec<GridPoint>>
where
    I: IntoIterator<Item = (i64, i64)>,
{
    let mut walks = Vec::new();
    let mut current = Vec::new();
    for (x, y) in points {
        if clip.contains(x, y) {
            current.push(GridPoint::new(x as i32, y as i32));
        } else if !current.is_empty() {
            walks.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        walks.push(current);
    }
    walks
}

/// One octant of a midpoint circle, from (0, r) towards the 45 degree point.
fn circle_octant(radius: i64) -> Vec<(i64, i64)> {
    let mut octant = Vec::new();
    let mut x = 0;
    let mut y = radius;
    let mut d = 1 - radius;
    while x <= y {
        octant.push((x, y));
        x += 1;
        if d < 0 {
            d += 2 * x + 1;
        } else {
            y -= 1;
            d += 2 * (x - y) + 1;
        }
    }
    octant
}

/// Ordered perimeter of a midpoint circle in wide coordinates, so centres
/// and radii anywhere in the `i32` range are safe.
pub fn circle_points(center: GridPoint, radius: i32) -> Vec<(i64, i64)> {
    if radius <= 0 {
        return Vec::new();
    }
    let octant = circle_octant(i64::from(radius));
    let (cx, cy) = (i64::from(center.x), i64::from(center.y));

    let mut points: Vec<(i64, i64)> = Vec::with_capacity(octant.len() * 8);
    let mut push = |x: i64, y: i64| {
        if points.last() != Some(&(x, y)) {
            points.push((x, y));
        }
    };

    for &(x, y) in octant.iter() {
        push(cx + x, cy + y); // 90 -> 45
    }
    for &(x, y) in octant.iter().rev() {
        push(cx + y, cy + x); // 45 -> 0
    }
    for &(x, y) in octant.iter() {
        push(cx + y, cy - x); // 0 -> -45
    }
    for &(x, y) in octant.iter().rev() {
        push(cx + x, cy - y); // -45 -> -90
    }
    for &(x, y) in octant.iter() {
        push(cx - x, cy - y); // -90 -> -135
    }
    for &(x, y) in octant.iter().rev() {
        push(cx - y, cy - x); // -135 -> 180
    }
    for &(x, y) in octant.iter() {
        push(cx - y, cy + x); // 180 -> 135
    }
    for &(x, y) in octant.iter().rev() {
        push(cx - x, cy + y); // 135 -> 90
    }

    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

/// Ordered, duplicate-free perimeter of a midpoint circle.
///
/// The eight symmetric images of one octant are unrolled into eight
/// sequential passes so the result walks the circle once, clockwise (with y
/// pointing up), starting at the top point `(cx, cy + r)`. The start point is
/// not repeated at the end. Points beyond the `i32` range are left out.
pub fn circle_perimeter(center: GridPoint, radius: i32) -> Vec<GridPoint> {
    circle_points(center, radius)
        .into_iter()
        .filter_map(|(x, y)| Some(GridPoint::new(i32::try_from(x).ok()?, i32::try_from(y).ok()?)))
        .collect()
}

/// Whether any perimeter cell of the circle can fall inside `clip`.
///
/// False when the circle's box misses `clip`, or when `clip` lies wholly
/// inside the ring the midpoint walk stays outside of.
pub fn circle_touches(center: GridPoint, radius: i32, clip: &Bounds) -> bool {
    let (cx, cy, r) = (
        i64::from(center.x),
        i64::from(center.y),
        i64::from(radius),
    );
    let misses_box = cx + r < i64::from(clip.min_x)
        || cx - r > i64::from(clip.max_x)
        || cy + r < i64::from(clip.min_y)
        || cy - r > i64::from(clip.max_y);
    if misses_box {
        return false;
    }
    // the walk never comes closer to the centre than r - 2
    let far_x = (i64::from(clip.min_x) - cx)
        .abs()
        .max((i64::from(clip.max_x) - cx).abs());
    let far_y = (i64::from(clip.min_y) - cy)
        .abs()
        .max((i64::from(clip.max_y) - cy).abs());
    let inner = i128::from((r - 2).max(0));
    i128::from(far_x).pow(2) + i128::from(far_y).pow(2) >= inner * inner
}

/// Corners of the rectangle swept by a line of the given width.
///
/// Returned in drawing order: the two corners on the left of the centre line
/// (start then end), then the two on the right (end then start). `None` for
/// a non-positive width or a zero-length centre line.
pub fn wide_line_corners(from: GridPoint, to: GridPoint, width: i32) -> Option<[GridPoint; 4]> {
    if width <= 0 || from == to {
        return None;
    }
    let dx = f64::from(to.x) - f64::from(from.x);
    let dy = f64::from(to.y) - f64::from(from.y);
    let len = (dx * dx + dy * dy).sqrt();
    let half = f64::from(width) / 2.0;
    let px = -dy / len * half;
    let py = dx / len * half;

    let offset = |p: GridPoint, sign: f64| {
        GridPoint::new(
            (f64::from(p.x) + sign * px).round() as i32,
            (f64::from(p.y) + sign * py).round() as i32,
        )
    };
    Some([
        offset(from, 1.0),
        offset(to, 1.0),
        offset(to, -1.0),
        offset(from, -1.0),
    ])
}

/// True when consecutive points are 8-connected neighbours.
pub fn is_connected_walk(points: &[GridPoint]) -> bool {
    points
        .windows(2)
        .all(|w| (w[0].x - w[1].x).abs() <= 1 && (w[0].y - w[1].y).abs() <= 1 && w[0] != w[1])
}
