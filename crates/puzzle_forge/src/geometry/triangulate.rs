//! Ear-clipping triangulation of simple closed polygons.
//!
//! The polygon may be non-convex and wound either way. Consecutive duplicate vertices are
//! skipped, a self-intersecting outline is rejected up front, and the returned index triples
//! reference the caller's vertex slice.
use glam::Vec2;

use crate::error::GeometryError;

/// Triangulate the closed polygon `points`, returning triangles as indices into `points`.
pub fn triangulate(points: &[Vec2]) -> Result<Vec<[usize; 3]>, GeometryError> {
    let mut ring = distinct_ring(points);
    if ring.len() < 3 {
        return Err(GeometryError::TooFewVertices { count: ring.len() });
    }

    if let Some((first, second)) = find_self_intersection(points, &ring) {
        return Err(GeometryError::SelfIntersecting { first, second });
    }

    let (min, max) = ring.iter().fold(
        (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
        |(min, max), &i| (min.min(points[i]), max.max(points[i])),
    );
    let extent = (max - min).max_element().max(f32::MIN_POSITIVE);
    let eps = extent * extent * 1e-7;

    let area: f32 = (0..ring.len())
        .map(|k| points[ring[k]].perp_dot(points[ring[(k + 1) % ring.len()]]))
        .sum();
    let winding = if area < 0.0 { -1.0 } else { 1.0 };

    let mut triangles = Vec::with_capacity(ring.len() - 2);
    let mut cursor = 0;
    while ring.len() > 3 {
        let n = ring.len();
        let ear = (0..n)
            .map(|step| (cursor + step) % n)
            .find(|&i| is_ear(points, &ring, i, winding, eps));

        match ear {
            Some(i) => {
                triangles.push([ring[(i + n - 1) % n], ring[i], ring[(i + 1) % n]]);
                ring.remove(i);
                cursor = if i == 0 { 0 } else { i - 1 };
            }
            None => {
                // Collinear vertices never form an ear; drop one and try again.
                let flat = (0..n).find(|&i| corner_cross(points, &ring, i).abs() <= eps);
                match flat {
                    Some(i) => {
                        ring.remove(i);
                        cursor = 0;
                    }
                    None => return Err(GeometryError::NoEar { remaining: n }),
                }
            }
        }
    }

    if corner_cross(points, &ring, 1).abs() > eps {
        triangles.push([ring[0], ring[1], ring[2]]);
    }
    Ok(triangles)
}

/// Indices of `points` with consecutive duplicates (including a repeated closing point) removed.
fn distinct_ring(points: &[Vec2]) -> Vec<usize> {
    let mut ring: Vec<usize> = Vec::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        if ring.last().is_some_and(|&last| points[last] == *p) {
            continue;
        }
        ring.push(i);
    }
    while ring.len() > 1 && points[ring[0]] == points[ring[ring.len() - 1]] {
        ring.pop();
    }
    ring
}

/// First pair of non-adjacent ring segments that cross, as indices of their start vertices.
pub(crate) fn find_self_intersection(points: &[Vec2], ring: &[usize]) -> Option<(usize, usize)> {
    let n = ring.len();
    if n < 4 {
        return None;
    }
    for a in 0..n {
        let a0 = points[ring[a]];
        let a1 = points[ring[(a + 1) % n]];
        for b in (a + 2)..n {
            if a == 0 && b == n - 1 {
                continue;
            }
            let b0 = points[ring[b]];
            let b1 = points[ring[(b + 1) % n]];
            if segments_cross(a0, a1, b0, b1) {
                return Some((ring[a], ring[b]));
            }
        }
    }
    None
}

#[inline]
fn orient(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b - a).perp_dot(c - a)
}

fn segments_cross(p0: Vec2, p1: Vec2, q0: Vec2, q1: Vec2) -> bool {
    let d1 = orient(q0, q1, p0);
    let d2 = orient(q0, q1, p1);
    let d3 = orient(p0, p1, q0);
    let d4 = orient(p0, p1, q1);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

fn corner_cross(points: &[Vec2], ring: &[usize], i: usize) -> f32 {
    let n = ring.len();
    let a = points[ring[(i + n - 1) % n]];
    let b = points[ring[i]];
    let c = points[ring[(i + 1) % n]];
    orient(a, b, c)
}

fn is_ear(points: &[Vec2], ring: &[usize], i: usize, winding: f32, eps: f32) -> bool {
    let n = ring.len();
    let prev = (i + n - 1) % n;
    let next = (i + 1) % n;
    if corner_cross(points, ring, i) * winding <= eps {
        return false;
    }
    let a = points[ring[prev]];
    let b = points[ring[i]];
    let c = points[ring[next]];
    !(0..n).any(|k| {
        if k == prev || k == i || k == next {
            return false;
        }
        let p = points[ring[k]];
        p != a && p != b && p != c && point_in_triangle(p, a, b, c)
    })
}

/// Inclusive point-in-triangle test, independent of triangle winding.
fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = orient(a, b, p);
    let d2 = orient(b, c, p);
    let d3 = orient(c, a, p);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}
