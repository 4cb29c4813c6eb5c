//! Uniform Catmull-Rom interpolating curve through a sequence of control points.
use glam::Vec2;

/// Catmull-Rom segment between `p1` and `p2` at parameter `t` in [0, 1].
#[inline]
fn catmull_rom(t: f32, p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Vec2 {
    let v0 = (p2 - p0) * 0.5;
    let v1 = (p3 - p1) * 0.5;
    let t2 = t * t;
    let t3 = t * t2;
    (2.0 * p1 - 2.0 * p2 + v0 + v1) * t3 + (-3.0 * p1 + 3.0 * p2 - 2.0 * v0 - v1) * t2 + v0 * t + p1
}

/// Evaluate the curve through `points` at global parameter `t` in [0, 1].
///
/// End segments reuse the first/last control point as their outer tangent neighbour.
pub fn point_at(points: &[Vec2], t: f32) -> Vec2 {
    match points.len() {
        0 => return Vec2::ZERO,
        1 => return points[0],
        _ => {}
    }
    let last = points.len() - 1;
    let scaled = last as f32 * t.clamp(0.0, 1.0);
    let index = (scaled.floor() as usize).min(last);
    let weight = scaled - index as f32;

    let p0 = points[index.saturating_sub(1)];
    let p1 = points[index];
    let p2 = points[(index + 1).min(last)];
    let p3 = points[(index + 2).min(last)];
    catmull_rom(weight, p0, p1, p2, p3)
}

/// Sample the curve at `divisions + 1` evenly spaced parameters, endpoints included.
pub fn sample(points: &[Vec2], divisions: usize) -> Vec<Vec2> {
    let divisions = divisions.max(1);
    (0..=divisions)
        .map(|d| point_at(points, d as f32 / divisions as f32))
        .collect()
}
