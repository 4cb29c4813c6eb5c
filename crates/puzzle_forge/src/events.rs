//! Event types and sinks for observing generation and interaction.
//!
//! This module defines [`PuzzleEvent`] and a set of sinks to emit, collect, or forward
//! events while running [`crate::puzzle::generator::PuzzleGenerator`] or while the
//! [`crate::interaction::engine::InteractionEngine`] handles pointer input. The
//! [`PuzzleEvent::Snapped`] event is the one-shot feedback signal meant for audio/visual hosts.
use glam::Vec2;

use crate::random::Seed;
use crate::state::{PieceId, Rotation};
use crate::topology::solver::GridSize;

/// Describes events emitted by the generator and the interaction engine.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum PuzzleEvent {
    /// Emitted before any generation work begins.
    GenerationStarted {
        /// Grid chosen by the piece-count solver.
        grid: GridSize,
        /// Seed driving the run.
        seed: Seed,
    },

    /// Emitted after every interior edge received its connector curve.
    CurvesGenerated {
        /// Number of curved (interior) edges.
        curved: usize,
        /// Number of straight border edges.
        border: usize,
    },

    /// Emitted when the model is complete.
    GenerationFinished {
        /// Number of pieces in the model.
        pieces: usize,
        /// Number of render-mesh triangles.
        triangles: usize,
    },

    /// Emitted whenever a picking result replaces the current selection.
    SelectionChanged {
        /// The new selection, possibly empty.
        selection: Vec<PieceId>,
    },

    /// Emitted after a quarter-turn rotation was applied.
    PieceRotated {
        piece: PieceId,
        rotation: Rotation,
    },

    /// Emitted when a drag ends and its pieces are released.
    PiecesDropped {
        pieces: Vec<PieceId>,
    },

    /// Emitted when a piece snapped onto a neighbour.
    Snapped {
        /// The piece that moved.
        piece: PieceId,
        /// The neighbour it aligned with.
        neighbour: PieceId,
        /// Translation applied to the piece.
        offset: Vec2,
    },

    /// Non-fatal warning.
    Warning {
        /// Context string (e.g. phase, piece id).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// A generic event sink that accepts [`PuzzleEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: PuzzleEvent);

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = PuzzleEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: PuzzleEvent) {}
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(PuzzleEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(PuzzleEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(PuzzleEvent),
{
    #[inline]
    fn send(&mut self, event: PuzzleEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<PuzzleEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<PuzzleEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[PuzzleEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of [`PuzzleEvent::Snapped`] events collected so far.
    pub fn snap_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, PuzzleEvent::Snapped { .. }))
            .count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: PuzzleEvent) {
        self.events.push(event);
    }
}
