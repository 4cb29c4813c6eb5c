//! Render buffers for the assembled pieces.
use std::ops::Range;

use glam::{Vec2, Vec3};

use crate::state::PieceId;

/// Flat vertex/index buffers for every piece of a puzzle.
///
/// Each piece contributes its offset outline as one contiguous vertex run, in outline order,
/// so the run doubles as the piece's closed contour. Positions are relative to the piece
/// centre; UVs are the world position divided by the board size.
#[derive(Clone, Debug, Default)]
pub struct PuzzleMesh {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub piece_ids: Vec<u32>,
    pub indices: Vec<u32>,
    runs: Vec<Range<usize>>,
    triangle_runs: Vec<Range<usize>>,
}

impl PuzzleMesh {
    pub fn with_capacity(pieces: usize, vertices_per_piece: usize) -> Self {
        let vertices = pieces * vertices_per_piece;
        Self {
            positions: Vec::with_capacity(vertices),
            uvs: Vec::with_capacity(vertices),
            piece_ids: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(vertices.saturating_sub(2 * pieces) * 3),
            runs: Vec::with_capacity(pieces),
            triangle_runs: Vec::with_capacity(pieces),
        }
    }

    /// Append one piece. `triangles` index into `outline`.
    pub fn push_piece(
        &mut self,
        id: PieceId,
        outline: &[Vec2],
        center: Vec2,
        board_size: Vec2,
        triangles: &[[usize; 3]],
    ) {
        let base = self.positions.len();
        let first_triangle = self.triangle_count();
        for &point in outline {
            let local = point - center;
            self.positions.push([local.x, local.y, 0.0]);
            self.uvs.push((point / board_size).to_array());
            self.piece_ids.push(id.get());
        }
        self.indices
            .extend(triangles.iter().flatten().map(|&i| (base + i) as u32));
        self.runs.push(base..self.positions.len());
        self.triangle_runs.push(first_triangle..self.triangle_count());
    }

    pub fn piece_count(&self) -> usize {
        self.runs.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Local-space contour of the piece stored at `slot` (0-based).
    pub fn contour(&self, slot: usize) -> impl Iterator<Item = Vec2> + '_ {
        let run = self.runs.get(slot).cloned().unwrap_or(0..0);
        self.positions[run].iter().map(|p| Vec2::new(p[0], p[1]))
    }

    /// Local-space triangles of the piece stored at `slot`.
    pub fn piece_triangles(&self, slot: usize) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        let run = self.triangle_runs.get(slot).cloned().unwrap_or(0..0);
        self.indices[run.start * 3..run.end * 3]
            .chunks_exact(3)
            .map(|tri| tri_corners(&self.positions, tri))
    }

    /// Every triangle as `(piece id, local corners)`.
    pub fn triangles(&self) -> impl Iterator<Item = (u32, [Vec3; 3])> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            (
                self.piece_ids[tri[0] as usize],
                tri_corners(&self.positions, tri),
            )
        })
    }
}

fn tri_corners(positions: &[[f32; 3]], tri: &[u32]) -> [Vec3; 3] {
    [0, 1, 2].map(|k| Vec3::from_array(positions[tri[k] as usize]))
}
