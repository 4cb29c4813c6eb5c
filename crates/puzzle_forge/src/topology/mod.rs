//! Puzzle topology: how many pieces, and which edges each piece shares with its neighbours.
//!
//! [`solver`] picks the column/row grid for a board, [`grid`] builds the arena of corners,
//! shared edges and piece cells. No piece geometry is computed here.
pub mod grid;
pub mod solver;

pub use grid::{CornerId, Edge, EdgeAxis, EdgeId, Grid, PieceCell};
pub use solver::{solve_grid, GridSize, MAX_PIECE_COUNT};
