//! The single authoritative id → state mapping.
use glam::Vec3;
use tracing::trace;

use crate::error::StateError;
use crate::state::{PackedPieceBuffer, PieceId, PieceSnapshot, PieceState, Rotation};

/// Owns every piece's live state and keeps the packed buffer in sync with it.
#[derive(Clone, Debug)]
pub struct PieceStateStore {
    states: Vec<PieceState>,
    buffer: PackedPieceBuffer,
    dirty: bool,
}

impl PieceStateStore {
    /// Create a store from the initial states, in piece order (slot 0 is id 1).
    pub fn new(initial: Vec<PieceState>) -> Self {
        let mut buffer = PackedPieceBuffer::new(initial.len());
        for (slot, state) in initial.iter().enumerate() {
            buffer.write(slot + 1, state);
        }
        Self {
            states: initial,
            buffer,
            dirty: true,
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn count(&self) -> u32 {
        self.states.len() as u32
    }

    /// Replace the state of piece `id`, mirroring it into the packed buffer.
    pub fn set(&mut self, id: u32, position: Vec3, rotation: Rotation) -> Result<(), StateError> {
        if id == 0 || id > self.count() {
            return Err(StateError::OutOfRange {
                id,
                count: self.count(),
            });
        }
        let state = PieceState::new(position, rotation);
        self.states[(id - 1) as usize] = state;
        self.buffer.write(id as usize, &state);
        self.dirty = true;
        trace!(id, ?position, %rotation, "piece state written");
        Ok(())
    }

    pub fn get(&self, id: u32) -> Result<PieceState, StateError> {
        id.checked_sub(1)
            .and_then(|slot| self.states.get(slot as usize))
            .copied()
            .ok_or(StateError::NotFound { id })
    }

    pub fn piece(&self, id: PieceId) -> Result<PieceState, StateError> {
        self.get(id.get())
    }

    /// Ids of every piece, ascending.
    pub fn ids(&self) -> impl Iterator<Item = PieceId> + '_ {
        (0..self.states.len()).filter_map(PieceId::from_slot)
    }

    pub fn states(&self) -> &[PieceState] {
        &self.states
    }

    pub fn buffer(&self) -> &PackedPieceBuffer {
        &self.buffer
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Return whether the buffer changed since the last call, clearing the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn snapshot(&self) -> Vec<PieceSnapshot> {
        self.ids()
            .zip(&self.states)
            .map(|(id, state)| PieceSnapshot {
                id,
                position: state.position.to_array(),
                rotation: state.rotation,
            })
            .collect()
    }

    /// Apply previously captured snapshots. Stops at the first invalid id.
    pub fn restore(&mut self, snapshots: &[PieceSnapshot]) -> Result<(), StateError> {
        for snapshot in snapshots {
            self.set(
                snapshot.id.get(),
                Vec3::from_array(snapshot.position),
                snapshot.rotation,
            )?;
        }
        Ok(())
    }
}
