#![forbid(unsafe_code)]
//! puzzle_forge: seeded jigsaw puzzle generation and piece interaction.
//!
//! Modules:
//! - topology: piece-count solver and the shared-edge grid arena
//! - geometry: connector curves, outline stitching, miter offset, triangulation, mesh buffers
//! - state: piece ids, quarter-turn rotations, the packed piece buffer and its store
//! - render: the renderer contract consumed by the core plus a CPU reference renderer
//! - interaction: picking decode, camera view, snapping and the pointer state machine
//! - puzzle: configuration and the generation pipeline producing a [`puzzle::PuzzleModel`]
pub mod error;
pub mod events;
pub mod geometry;
pub mod interaction;
pub mod puzzle;
pub mod random;
pub mod render;
pub mod state;
pub mod topology;

/// Convenient re-exports for common types. Import with `use puzzle_forge::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, GeometryError, Result, StateError};
    pub use crate::events::{EventSink, FnSink, PuzzleEvent, VecSink};
    pub use crate::geometry::connector::TabShape;
    pub use crate::geometry::mesh::PuzzleMesh;
    pub use crate::interaction::camera::CameraView;
    pub use crate::interaction::engine::{
        InteractionContext, InteractionEngine, InteractionState, Modifiers, PointerButton,
        PointerEvent,
    };
    pub use crate::interaction::picking::{decode_ids, encode_id, PickingBuffer, ScreenRect};
    pub use crate::puzzle::config::PuzzleConfig;
    pub use crate::puzzle::generator::{generate_puzzle, PuzzleGenerator};
    pub use crate::puzzle::PuzzleModel;
    pub use crate::random::{PuzzleRng, Seed};
    pub use crate::render::raster::SoftwareRenderer;
    pub use crate::render::{Frame, PuzzleRenderer, Viewport};
    pub use crate::state::{PackedPieceBuffer, PieceId, PieceSnapshot, PieceState, PieceStateStore, Rotation};
    pub use crate::topology::grid::{EdgeId, Grid};
    pub use crate::topology::solver::{solve_grid, GridSize};
}
