//! Per-vertex miter offset of closed polygons.
//!
//! Each vertex moves along the bisector of its two adjacent edge normals by
//! `distance / cos(turn / 2)`, so straight runs keep exactly `distance` between the original
//! and offset outlines. Positive distances move to the left of the direction of travel: for a
//! clockwise outline (y up) that is outward, so a negative distance insets it.
use glam::Vec2;

/// Longest miter allowed, as a multiple of `|distance|`, to keep needle-sharp turns bounded.
pub const MITER_LIMIT: f32 = 8.0;

#[inline]
fn left_normal(direction: Vec2) -> Vec2 {
    Vec2::new(-direction.y, direction.x)
}

/// Offset vector for vertex `current` between `previous` and `next`.
pub fn miter_offset(previous: Vec2, current: Vec2, next: Vec2, distance: f32) -> Vec2 {
    let incoming = (current - previous).normalize_or_zero();
    let outgoing = (next - current).normalize_or_zero();
    let n0 = left_normal(incoming);
    let n1 = left_normal(outgoing);

    let bisector = (n0 + n1).normalize_or_zero();
    if bisector == Vec2::ZERO {
        // A full reversal: push straight out along the incoming normal.
        return n0 * distance;
    }
    let reference = if n0 != Vec2::ZERO { n0 } else { n1 };
    let cos_half_turn = bisector.dot(reference);
    let length = if cos_half_turn.abs() < 1.0 / MITER_LIMIT {
        distance * MITER_LIMIT
    } else {
        distance / cos_half_turn
    };
    bisector * length
}

/// Offset every vertex of the closed polygon `points` by `distance`.
///
/// The polygon is implicitly closed (the last point connects back to the first).
pub fn offset_outline(points: &[Vec2], distance: f32) -> Vec<Vec2> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    (0..n)
        .map(|i| {
            let previous = points[(i + n - 1) % n];
            let current = points[i];
            let next = points[(i + 1) % n];
            current + miter_offset(previous, current, next, distance)
        })
        .collect()
}

/// Twice the signed area of the polygon; negative for clockwise winding with y up.
pub fn signed_area2(points: &[Vec2]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum()
}
