use kurbo::{BezPath, Shape as _};

use crate::foundation::core::{Point, Rect};

/// Shrink factor applied to rendered hotspot outlines. `1.0` leaves them untouched.
pub const DEFAULT_SHRINK_FACTOR: f64 = 1.0;

/// Area-weighted centroid of a polygon outline.
///
/// - no points: `None`
/// - one point: that point
/// - otherwise the shoelace centroid over the closed outline (last point wraps to first),
///   which is exact for simple polygons, concave ones included, and independent of winding.
///
/// Outlines with (numerically) zero enclosed area, such as two points or a collinear run,
/// fall back to the arithmetic mean of their points.
pub fn centroid(points: &[Point]) -> Option<Point> {
    match points {
        [] => return None,
        [only] => return Some(*only),
        _ => {}
    }

    let mut twice_area = 0.0;
    let mut abs_cross = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        let cross = p.x * q.y - q.x * p.y;
        twice_area += cross;
        abs_cross += cross.abs();
        cx += (p.x + q.x) * cross;
        cy += (p.y + q.y) * cross;
    }

    let degenerate = twice_area == 0.0
        || !twice_area.is_finite()
        || twice_area.abs() <= abs_cross * 1e-12;
    if degenerate {
        return Some(mean(points));
    }

    let denom = 3.0 * twice_area;
    Some(Point::new(cx / denom, cy / denom))
}

fn mean(points: &[Point]) -> Point {
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

/// Serialize an outline as `"x,y x,y ..."`, preserving order and the points' own precision.
pub fn to_coordinate_string(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Move every point toward the centroid by `factor` (`1.0` is the identity, `0.0` collapses).
pub fn shrink_toward_centroid(points: &[Point], factor: f64) -> Vec<Point> {
    let Some(c) = centroid(points) else {
        return Vec::new();
    };
    points
        .iter()
        .map(|p| Point::new(c.x + (p.x - c.x) * factor, c.y + (p.y - c.y) * factor))
        .collect()
}

/// Axis-aligned bounds of an outline.
pub fn bounding_box(points: &[Point]) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    Some(
        rest.iter()
            .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p)),
    )
}

/// Whether `p` falls inside the closed outline (non-zero winding).
pub fn hit_test(points: &[Point], p: Point) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut path = BezPath::new();
    path.move_to(points[0]);
    for q in &points[1..] {
        path.line_to(*q);
    }
    path.close_path();
    path.contains(p)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/polygon.rs"]
mod tests;
