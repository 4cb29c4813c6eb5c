//! Connector curve generator.
//!
//! Replaces every interior edge of a [`Grid`] with an interlocking tab: the edge's corners are
//! nudged sideways, thirteen control points describe the neck, shoulders and head of the tab,
//! and an interpolating curve through the eleven interior control points is sampled into the
//! edge. Random draws happen in a fixed order per edge, and edges are visited in storage order
//! (all vertical, then all horizontal). Border edges consume no draws.
use glam::Vec2;
use rand::RngCore;
use tracing::debug;

use crate::geometry::spline;
use crate::random::{rand01, rand_range};
use crate::topology::grid::Grid;

/// Number of interior control points handed to the interpolating curve.
pub const TAB_INTERIOR_POINTS: usize = 11;

/// Bounds for the random parameters of a tab, as fractions of the edge length.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TabShape {
    /// Range of the tab centre along the edge.
    pub center: (f32, f32),
    /// Range of the tab width.
    pub width: (f32, f32),
    /// Height of the neck shoulder above the neck base, relative to the tab width.
    pub neck_length: f32,
    /// Maximum magnitude of the shared shoulder jitter along the edge.
    pub nip_jitter: f32,
    /// Range of the per-side factor applied to the shoulder jitter.
    pub nip_jitter_factor: (f32, f32),
    /// Range of the perpendicular bias applied to every control point.
    pub distortion: (f32, f32),
    /// Maximum independent jitter of each control point along the edge.
    pub lateral_jitter: f32,
    /// Maximum perpendicular shift of the edge's corners before the tab is built.
    pub edge_shift: f32,
}

impl TabShape {
    /// The organic look: every jitter bound enabled.
    pub const fn organic() -> Self {
        Self {
            center: (0.46, 0.54),
            width: (0.26, 0.28),
            neck_length: 0.25,
            nip_jitter: 0.05,
            nip_jitter_factor: (0.5, 1.0),
            distortion: (0.01, 0.05),
            lateral_jitter: 0.005,
            edge_shift: 0.035,
        }
    }

    /// Tabs without jitter, distortion or corner shifts. Draws are still consumed.
    pub const fn regular() -> Self {
        Self {
            center: (0.5, 0.5),
            width: (0.27, 0.27),
            neck_length: 0.25,
            nip_jitter: 0.0,
            nip_jitter_factor: (0.5, 1.0),
            distortion: (0.0, 0.0),
            lateral_jitter: 0.0,
            edge_shift: 0.0,
        }
    }

    /// Scale every jitter and distortion bound by `factor`.
    pub fn scaled(self, factor: f32) -> Self {
        let factor = factor.max(0.0);
        Self {
            nip_jitter: self.nip_jitter * factor,
            distortion: (self.distortion.0 * factor, self.distortion.1 * factor),
            lateral_jitter: self.lateral_jitter * factor,
            edge_shift: self.edge_shift * factor,
            ..self
        }
    }
}

impl Default for TabShape {
    fn default() -> Self {
        Self::organic()
    }
}

#[inline]
fn left_normal(direction: Vec2) -> Vec2 {
    Vec2::new(-direction.y, direction.x)
}

/// Draw the perpendicular shift applied to both corners of an edge.
pub fn shift_edge(start: Vec2, end: Vec2, rng: &mut dyn RngCore, shape: &TabShape) -> Vec2 {
    let length = start.distance(end);
    let normal = left_normal((end - start).normalize_or_zero());
    let amount = rand_range(rng, -shape.edge_shift, shape.edge_shift) * length;
    normal * amount
}

/// Build the thirteen tab control points from `start` to `end`.
///
/// Order: start, midStart, neckStartA, neckStartB, nipHeadStartA, nipHeadStartB, nipHead,
/// nipHeadEndB, nipHeadEndA, neckEndB, neckEndA, midEnd, end.
pub fn tab_control_points(
    start: Vec2,
    end: Vec2,
    rng: &mut dyn RngCore,
    shape: &TabShape,
) -> [Vec2; TAB_INTERIOR_POINTS + 2] {
    let length = start.distance(end);
    let parallel = (end - start).normalize_or_zero();
    let normal = left_normal(parallel);
    let at = |t: f32| start + (end - start) * t;
    let up = |amount: f32| normal * (amount * length);
    let along = |amount: f32| parallel * (amount * length);

    let mid_pos = rand_range(rng, shape.center.0, shape.center.1);
    let mid_size = rand_range(rng, shape.width.0, shape.width.1);
    let direction = if rand01(rng) > 0.5 { 1.0 } else { -1.0 };
    let nip_length = mid_size * direction;
    let nip_jitter = rand_range(rng, -shape.nip_jitter, shape.nip_jitter);
    let (factor_min, factor_max) = shape.nip_jitter_factor;
    let start_jitter = nip_jitter * rand_range(rng, factor_min, factor_max);
    let end_jitter = nip_jitter * rand_range(rng, factor_min, factor_max);
    let bias = -direction * rand_range(rng, shape.distortion.0, shape.distortion.1) * length;
    let neck = shape.neck_length;

    let mid_start = at(mid_pos - mid_size * 0.5);
    let mid_end = at(mid_pos + mid_size * 0.5);

    let head_start_a =
        at(mid_pos - mid_size * 0.45) + up(nip_length * 0.65) + along(start_jitter);
    let head_start_b =
        at(mid_pos - mid_size * 0.325) + up(nip_length * 0.9) + along(start_jitter);
    let head_end_a = at(mid_pos + mid_size * 0.45) + up(nip_length * 0.65) + along(end_jitter);
    let head_end_b = at(mid_pos + mid_size * 0.325) + up(nip_length * 0.9) + along(end_jitter);
    let head = at(mid_pos) + up(nip_length);

    let neck_start_a = at(mid_pos - mid_size * 0.25) + up(nip_length * 0.1);
    let neck_start_b =
        at(mid_pos - mid_size * 0.25) + up(nip_length * (0.1 + neck)) + along(start_jitter * 0.6);
    let neck_end_a = at(mid_pos + mid_size * 0.25) + up(nip_length * 0.1);
    let neck_end_b =
        at(mid_pos + mid_size * 0.25) + up(nip_length * (0.1 + neck)) + along(end_jitter * 0.6);

    // Distortion order is part of the draw contract.
    let mut distorted = [
        mid_start,
        mid_end,
        head_start_a,
        head_start_b,
        head_end_a,
        head_end_b,
        head,
        neck_start_a,
        neck_start_b,
        neck_end_a,
        neck_end_b,
    ];
    for p in distorted.iter_mut() {
        *p += normal * bias;
    }
    for p in distorted.iter_mut() {
        *p += along(rand_range(rng, -shape.lateral_jitter, shape.lateral_jitter));
    }
    let [
        mid_start,
        mid_end,
        head_start_a,
        head_start_b,
        head_end_a,
        head_end_b,
        head,
        neck_start_a,
        neck_start_b,
        neck_end_a,
        neck_end_b,
    ] = distorted;

    [
        start,
        mid_start,
        neck_start_a,
        neck_start_b,
        head_start_a,
        head_start_b,
        head,
        head_end_b,
        head_end_a,
        neck_end_b,
        neck_end_a,
        mid_end,
        end,
    ]
}

/// Sample the connector curve between `start` and `end` (corners excluded).
pub fn connector_curve(
    start: Vec2,
    end: Vec2,
    rng: &mut dyn RngCore,
    shape: &TabShape,
    divisions: usize,
) -> Vec<Vec2> {
    let controls = tab_control_points(start, end, rng, shape);
    spline::sample(&controls[1..controls.len() - 1], divisions)
}

/// Shift and curve every interior edge of `grid`, returning the number of curved edges.
///
/// Corner shifts move the shared lattice corners, so every edge and cell touching a corner
/// observes the displaced point.
pub fn curve_edges(
    grid: &mut Grid,
    rng: &mut dyn RngCore,
    shape: &TabShape,
    divisions: usize,
) -> usize {
    let mut curved = 0;
    for id in grid.edge_ids() {
        let (start_id, end_id) = {
            let edge = grid.edge(id);
            if edge.is_border {
                continue;
            }
            (edge.start, edge.end)
        };

        let shift = shift_edge(grid.corner(start_id), grid.corner(end_id), rng, shape);
        grid.corners[start_id.0] += shift;
        grid.corners[end_id.0] += shift;

        let curve = connector_curve(
            grid.corner(start_id),
            grid.corner(end_id),
            rng,
            shape,
            divisions,
        );
        grid.edges[id.0].curve = curve;
        curved += 1;
    }
    debug!(curved, total = grid.edges.len(), "connector curves sampled");
    curved
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::random::tests::FixedRng;
    use crate::topology::solver::GridSize;

    struct CountingRng {
        inner: StdRng,
        draws: usize,
    }

    impl RngCore for CountingRng {
        fn next_u32(&mut self) -> u32 {
            self.draws += 1;
            self.inner.next_u32()
        }

        fn next_u64(&mut self) -> u64 {
            self.draws += 1;
            self.inner.next_u64()
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            self.inner.fill_bytes(dest);
        }
    }

    #[test]
    fn control_points_keep_endpoints_and_count() {
        let mut rng = StdRng::seed_from_u64(3);
        let start = Vec2::new(0.0, 0.0);
        let end = Vec2::new(100.0, 0.0);
        let points = tab_control_points(start, end, &mut rng, &TabShape::organic());
        assert_eq!(points.len(), 13);
        assert_eq!(points[0], start);
        assert_eq!(points[12], end);
    }

    #[test]
    fn regular_tab_is_symmetric_around_center() {
        // value 0 -> every draw is the lower bound, direction is -1.
        let mut rng = FixedRng { value: 0 };
        let start = Vec2::new(0.0, 0.0);
        let end = Vec2::new(100.0, 0.0);
        let p = tab_control_points(start, end, &mut rng, &TabShape::regular());

        // Head sits at the centre, one tab width below the edge.
        assert!((p[6].x - 50.0).abs() < 1e-4);
        assert!((p[6].y + 27.0).abs() < 1e-4);
        // Mirror pairs around x = 50.
        for (a, b) in [(1, 11), (2, 10), (3, 9), (4, 8), (5, 7)] {
            assert!((p[a].x + p[b].x - 100.0).abs() < 1e-4, "pair {a}/{b}");
            assert!((p[a].y - p[b].y).abs() < 1e-4, "pair {a}/{b}");
        }
    }

    #[test]
    fn tab_draws_a_fixed_number_of_values() {
        let mut rng = CountingRng {
            inner: StdRng::seed_from_u64(11),
            draws: 0,
        };
        let _ = tab_control_points(Vec2::ZERO, Vec2::X * 10.0, &mut rng, &TabShape::organic());
        assert_eq!(rng.draws, 7 + TAB_INTERIOR_POINTS);
    }

    #[test]
    fn curve_edges_touches_only_interior_edges() {
        let mut grid = Grid::new(GridSize::new(4, 3), Vec2::new(10.0, 10.0), false);
        let mut rng = CountingRng {
            inner: StdRng::seed_from_u64(5),
            draws: 0,
        };
        let curved = curve_edges(&mut grid, &mut rng, &TabShape::organic(), 20);
        assert_eq!(curved, 17);
        assert_eq!(rng.draws, 17 * (1 + 7 + TAB_INTERIOR_POINTS));
        for edge in &grid.edges {
            if edge.is_border {
                assert!(edge.curve.is_empty());
            } else {
                assert_eq!(edge.curve.len(), 21);
            }
        }
    }

    #[test]
    fn same_seed_reproduces_identical_curves() {
        let run = |seed: u64| {
            let mut grid = Grid::new(GridSize::new(5, 4), Vec2::new(32.0, 24.0), false);
            let mut rng = StdRng::seed_from_u64(seed);
            curve_edges(&mut grid, &mut rng, &TabShape::organic(), 20);
            grid.edges
                .iter()
                .flat_map(|e| e.curve.iter().flat_map(|p| [p.x.to_bits(), p.y.to_bits()]))
                .collect::<Vec<u32>>()
        };
        assert_eq!(run(99), run(99));
        assert_ne!(run(99), run(100));
    }

    const DRAWS_PER_EDGE: usize = 1 + 7 + TAB_INTERIOR_POINTS;

    #[test]
    fn interior_edges_draw_in_storage_order() {
        // Without corner shifts every edge keeps its lattice corners, so the k-th interior
        // edge can be rebuilt from the stream offset alone.
        let shape = TabShape {
            edge_shift: 0.0,
            ..TabShape::organic()
        };
        let size = GridSize::new(4, 3);
        let cell = Vec2::new(40.0, 30.0);
        let lattice = Grid::new(size, cell, false);
        let mut grid = lattice.clone();
        curve_edges(&mut grid, &mut StdRng::seed_from_u64(17), &shape, 20);

        let interior: Vec<usize> = (0..lattice.edges.len())
            .filter(|&i| !lattice.edges[i].is_border)
            .collect();
        assert_eq!(interior.len(), 17);
        // Vertical edges are stored first, so they are curved first.
        assert!(interior[..9].iter().all(|&i| i < lattice.vertical_count()));
        assert!(interior[9..].iter().all(|&i| i >= lattice.vertical_count()));

        for (k, &index) in interior.iter().enumerate() {
            let mut rng = StdRng::seed_from_u64(17);
            for _ in 0..k * DRAWS_PER_EDGE {
                rng.next_u32();
            }
            let edge = &lattice.edges[index];
            let (start, end) = (lattice.corner(edge.start), lattice.corner(edge.end));
            assert_eq!(shift_edge(start, end, &mut rng, &shape), Vec2::ZERO);
            let expected = connector_curve(start, end, &mut rng, &shape, 20);
            assert_eq!(grid.edges[index].curve, expected, "interior edge {k} (index {index})");
        }
    }

    #[test]
    fn corner_shifts_accumulate_in_edge_order() {
        let shape = TabShape::organic();
        let lattice = Grid::new(GridSize::new(3, 3), Vec2::new(50.0, 50.0), false);
        let mut grid = lattice.clone();
        curve_edges(&mut grid, &mut StdRng::seed_from_u64(23), &shape, 12);

        let mut replay = lattice.clone();
        let mut rng = StdRng::seed_from_u64(23);
        let verticals = 0..lattice.vertical_count();
        let horizontals = lattice.vertical_count()..lattice.edges.len();
        for index in verticals.chain(horizontals) {
            let edge = lattice.edges[index].clone();
            if edge.is_border {
                continue;
            }
            let shift = shift_edge(
                replay.corner(edge.start),
                replay.corner(edge.end),
                &mut rng,
                &shape,
            );
            replay.corners[edge.start.0] += shift;
            replay.corners[edge.end.0] += shift;
            replay.edges[index].curve = connector_curve(
                replay.corner(edge.start),
                replay.corner(edge.end),
                &mut rng,
                &shape,
                12,
            );
        }

        assert_eq!(grid.corners, replay.corners);
        for (index, (a, b)) in grid.edges.iter().zip(&replay.edges).enumerate() {
            assert_eq!(a.curve, b.curve, "edge {index}");
        }
    }

    #[test]
    fn scaled_shape_zeroes_jitter() {
        let shape = TabShape::organic().scaled(0.0);
        assert_eq!(shape.edge_shift, 0.0);
        assert_eq!(shape.lateral_jitter, 0.0);
        assert_eq!(shape.distortion, (0.0, 0.0));
        assert_eq!(shape.center, TabShape::organic().center);
    }
}
