//! Neighbour snapping.
//!
//! A piece snaps when the world position of one of its edges' first point, as seen by the
//! piece, lies within tolerance of the same point as seen by the neighbour across that edge.
//! Only identically rotated neighbours qualify and the first qualifying edge wins.
use glam::{Vec2, Vec3};
use tracing::debug;

use crate::error::StateError;
use crate::events::{EventSink, PuzzleEvent};
use crate::state::{PieceId, PieceStateStore};
use crate::topology::grid::Grid;

/// Outcome of a successful snap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snap {
    pub neighbour: PieceId,
    /// Translation that was applied to the piece.
    pub offset: Vec2,
}

/// Try to snap `piece` onto one of its neighbours, moving it and dropping it to `z = 0`.
pub fn snap_piece(
    grid: &Grid,
    centers: &[Vec2],
    store: &mut PieceStateStore,
    piece: PieceId,
    tolerance: f32,
) -> Result<Option<Snap>, StateError> {
    let slot = piece.index();
    let cell = grid
        .pieces
        .get(slot)
        .ok_or(StateError::NotFound { id: piece.get() })?;
    let state = store.piece(piece)?;

    for &edge in &cell.edges {
        let Some(other_slot) = grid.neighbour_across(edge, slot) else {
            continue;
        };
        let Some(other) = PieceId::from_slot(other_slot) else {
            continue;
        };
        let other_state = store.piece(other)?;
        if other_state.rotation != state.rotation {
            continue;
        }

        let anchor = grid.first_point(edge);
        let mine = state.local_to_world(anchor - centers[slot]);
        let theirs = other_state.local_to_world(anchor - centers[other_slot]);
        if mine.distance(theirs) > tolerance {
            continue;
        }

        let offset = theirs - mine;
        let target = state.position.truncate() + offset;
        store.set(piece.get(), Vec3::new(target.x, target.y, 0.0), state.rotation)?;
        debug!(%piece, neighbour = %other, ?offset, "piece snapped");
        return Ok(Some(Snap {
            neighbour: other,
            offset,
        }));
    }
    Ok(None)
}

/// Snap each piece in turn, emitting [`PuzzleEvent::Snapped`] for every success.
///
/// Returns the number of pieces that snapped. Ids the store rejects are skipped.
pub fn snap_pieces(
    grid: &Grid,
    centers: &[Vec2],
    store: &mut PieceStateStore,
    pieces: &[PieceId],
    tolerance: f32,
    sink: &mut dyn EventSink,
) -> usize {
    let mut snapped = 0;
    for &piece in pieces {
        match snap_piece(grid, centers, store, piece, tolerance) {
            Ok(Some(snap)) => {
                snapped += 1;
                sink.send(PuzzleEvent::Snapped {
                    piece,
                    neighbour: snap.neighbour,
                    offset: snap.offset,
                });
            }
            Ok(None) => {}
            Err(err) => debug!(%piece, %err, "snap skipped"),
        }
    }
    snapped
}
