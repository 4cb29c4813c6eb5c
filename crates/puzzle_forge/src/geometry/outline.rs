//! Outline assembly: stitch a cell's four edges into one closed polygon.
use glam::Vec2;

use crate::topology::grid::{CornerId, Grid};

/// Walk the cell's edges in order and join them into an implicitly closed outline.
///
/// An edge whose start corner is not the previous edge's end corner is walked backwards.
/// Each edge contributes every point but its last, which is the next edge's first.
pub fn stitch_outline(grid: &Grid, slot: usize) -> Vec<Vec2> {
    let cell = &grid.pieces[slot];
    let mut points = Vec::new();
    let mut end_corner: Option<CornerId> = None;

    for &edge_id in &cell.edges {
        let edge = grid.edge(edge_id);
        let mut line = grid.edge_points(edge_id);
        let (first, last) = match end_corner {
            Some(previous_end) if edge.start != previous_end => {
                line.reverse();
                (edge.end, edge.start)
            }
            _ => (edge.start, edge.end),
        };
        debug_assert!(end_corner.is_none_or(|c| c == first));
        line.pop();
        points.extend(line);
        end_corner = Some(last);
    }

    points
}

/// Centre of the axis-aligned box around the cell's four corners.
pub fn cell_center(grid: &Grid, slot: usize) -> Vec2 {
    let corners = grid.cell_corners(slot);
    let min = corners.iter().copied().fold(Vec2::splat(f32::INFINITY), Vec2::min);
    let max = corners.iter().copied().fold(Vec2::splat(f32::NEG_INFINITY), Vec2::max);
    (min + max) * 0.5
}
