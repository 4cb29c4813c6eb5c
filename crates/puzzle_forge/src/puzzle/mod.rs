//! Puzzle configuration, generation and the resulting model.
use glam::Vec2;

use crate::geometry::mesh::PuzzleMesh;
use crate::render::{Frame, Viewport};
use crate::state::{PieceId, PieceStateStore};
use crate::topology::grid::Grid;

pub mod config;
pub mod generator;

pub use config::PuzzleConfig;
pub use generator::{generate_puzzle, PuzzleGenerator};

/// A generated puzzle: topology, render mesh and live piece state.
///
/// `centers[slot]` is where piece `slot + 1` sits in the solved board; a piece is in place
/// when its position equals its centre and its rotation is zero.
#[derive(Clone, Debug)]
pub struct PuzzleModel {
    /// Grid arena with the final (shifted) corners; edge curves are already collapsed.
    pub grid: Grid,
    pub centers: Vec<Vec2>,
    /// Initial scattered positions.
    pub layout: Vec<Vec2>,
    pub mesh: PuzzleMesh,
    pub store: PieceStateStore,
    pub board_size: Vec2,
    pub cell_size: Vec2,
    /// Maximum distance at which a piece snaps onto a neighbour.
    pub snap_tolerance: f32,
    /// Inset applied to every outline.
    pub gap: f32,
}

impl PuzzleModel {
    pub fn piece_count(&self) -> u32 {
        self.store.len() as u32
    }

    pub fn average_cell_size(&self) -> f32 {
        (self.cell_size.x + self.cell_size.y) * 0.5
    }

    /// Min/max corners of the initial piece positions.
    pub fn table_bounds(&self) -> (Vec2, Vec2) {
        if self.layout.is_empty() {
            return (Vec2::ZERO, self.board_size);
        }
        self.layout.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(min, max), p| (min.min(*p), max.max(*p)),
        )
    }

    /// Solved position of a piece.
    pub fn home(&self, id: PieceId) -> Option<Vec2> {
        self.centers.get(id.index()).copied()
    }

    /// Whether every piece is unrotated and within `tolerance` of its solved position.
    pub fn is_solved(&self, tolerance: f32) -> bool {
        self.store
            .states()
            .iter()
            .zip(&self.centers)
            .all(|(state, center)| {
                state.rotation.quarter_turns() == 0
                    && state.position.truncate().distance(*center) <= tolerance
            })
    }

    /// Renderer inputs for the current state.
    pub fn frame(&self, viewport: Viewport, buffer_dirty: bool) -> Frame<'_> {
        Frame {
            mesh: &self.mesh,
            pieces: self.store.buffer(),
            piece_count: self.piece_count(),
            viewport,
            buffer_dirty,
        }
    }
}
