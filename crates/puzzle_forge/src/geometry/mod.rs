//! Piece geometry: connector curves, outline assembly and the render mesh.
//!
//! The generator drives these in order: [`connector`] curves the interior edges of a grid,
//! [`outline`] stitches each cell into a closed polygon, [`offset`] insets it by the visual
//! gap, [`triangulate`] fills it and [`mesh`] collects the result into flat buffers.
pub mod connector;
pub mod mesh;
pub mod offset;
pub mod outline;
pub mod spline;
pub mod triangulate;

pub use connector::{curve_edges, TabShape};
pub use mesh::PuzzleMesh;
pub use offset::offset_outline;
pub use outline::{cell_center, stitch_outline};
pub use triangulate::triangulate;
