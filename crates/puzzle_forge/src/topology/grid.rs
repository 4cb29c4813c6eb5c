//! Grid partitioner: the shared-edge arena behind every puzzle.
//!
//! Corners, edges and piece cells live in flat vectors and reference each other by index.
//! Edges are stored all-vertical-then-all-horizontal; that order is also the order in which
//! connector curves consume random draws, so it is part of the reproducibility contract.
use glam::Vec2;

use crate::error::{Error, Result};
use crate::topology::solver::GridSize;

/// Index of a lattice corner in [`Grid::corners`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CornerId(pub usize);

/// Index of an edge in [`Grid::edges`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

/// Orientation of an edge in the undistorted lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeAxis {
    Vertical,
    Horizontal,
}

/// A shared grid line between one (border) or two (interior) pieces.
#[derive(Clone, Debug)]
pub struct Edge {
    /// First point of the line.
    pub start: CornerId,
    /// Last point of the line.
    pub end: CornerId,
    /// Sampled connector curve between `start` and `end`; empty for a straight line.
    pub curve: Vec<Vec2>,
    /// Border edges lie on the board perimeter and are never curved.
    pub is_border: bool,
    /// Sequence number assigned while walking the lattice.
    pub connection_id: u32,
    pub axis: EdgeAxis,
    /// Piece slots referencing this edge.
    pub neighbours: Vec<usize>,
}

/// One grid cell and its four bounding edges.
#[derive(Clone, Debug)]
pub struct PieceCell {
    pub col: u32,
    pub row: u32,
    /// Left vertical, top horizontal, right vertical, bottom horizontal (y grows upward).
    pub edges: [EdgeId; 4],
}

#[derive(Clone, Debug)]
pub struct Grid {
    pub size: GridSize,
    pub cell_size: Vec2,
    pub corners: Vec<Vec2>,
    pub edges: Vec<Edge>,
    pub pieces: Vec<PieceCell>,
    vertical_count: usize,
}

impl Grid {
    /// Build the `(cols + 1) x (rows + 1)` lattice, its edges and the `cols * rows` cells.
    pub fn new(size: GridSize, cell_size: Vec2, borderless: bool) -> Self {
        let cols = size.cols as usize;
        let rows = size.rows as usize;

        let mut corners = Vec::with_capacity((cols + 1) * (rows + 1));
        for x in 0..=cols {
            for y in 0..=rows {
                corners.push(Vec2::new(cell_size.x * x as f32, cell_size.y * y as f32));
            }
        }
        let corner = |x: usize, y: usize| CornerId(x * (rows + 1) + y);

        let mut verticals = Vec::with_capacity((cols + 1) * rows);
        let mut horizontals = Vec::with_capacity(cols * (rows + 1));
        let mut connection_id = 0u32;
        for x in 0..=cols {
            for y in 0..=rows {
                if y < rows {
                    verticals.push(Edge {
                        start: corner(x, y),
                        end: corner(x, y + 1),
                        curve: Vec::new(),
                        is_border: !borderless && (x == 0 || x == cols),
                        connection_id,
                        axis: EdgeAxis::Vertical,
                        neighbours: Vec::with_capacity(2),
                    });
                    connection_id += 1;
                }
                if x < cols {
                    horizontals.push(Edge {
                        start: corner(x, y),
                        end: corner(x + 1, y),
                        curve: Vec::new(),
                        is_border: !borderless && (y == 0 || y == rows),
                        connection_id,
                        axis: EdgeAxis::Horizontal,
                        neighbours: Vec::with_capacity(2),
                    });
                    connection_id += 1;
                }
            }
        }

        let vertical_count = verticals.len();
        let mut edges = verticals;
        edges.append(&mut horizontals);

        let mut pieces = Vec::with_capacity(cols * rows);
        for x in 0..cols {
            for y in 0..rows {
                let slot = pieces.len();
                let cell_edges = [
                    EdgeId(x * rows + y),
                    EdgeId(vertical_count + x * (rows + 1) + y + 1),
                    EdgeId((x + 1) * rows + y),
                    EdgeId(vertical_count + x * (rows + 1) + y),
                ];
                for edge in cell_edges {
                    edges[edge.0].neighbours.push(slot);
                }
                pieces.push(PieceCell {
                    col: x as u32,
                    row: y as u32,
                    edges: cell_edges,
                });
            }
        }

        Self {
            size,
            cell_size,
            corners,
            edges,
            pieces,
            vertical_count,
        }
    }

    /// Number of vertical edges; horizontal edges start at this index.
    pub fn vertical_count(&self) -> usize {
        self.vertical_count
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    pub fn corner(&self, id: CornerId) -> Vec2 {
        self.corners[id.0]
    }

    /// Piece slot of the cell at `(col, row)`.
    pub fn slot_of(&self, col: u32, row: u32) -> Option<usize> {
        (col < self.size.cols && row < self.size.rows)
            .then(|| col as usize * self.size.rows as usize + row as usize)
    }

    /// First point of an edge: its start corner.
    pub fn first_point(&self, id: EdgeId) -> Vec2 {
        self.corner(self.edge(id).start)
    }

    /// Full point sequence of an edge: `[start, curve.., end]`.
    pub fn edge_points(&self, id: EdgeId) -> Vec<Vec2> {
        let edge = self.edge(id);
        let mut points = Vec::with_capacity(edge.curve.len() + 2);
        points.push(self.corner(edge.start));
        points.extend_from_slice(&edge.curve);
        points.push(self.corner(edge.end));
        points
    }

    /// The other piece slot referencing `edge`, if any.
    pub fn neighbour_across(&self, edge: EdgeId, slot: usize) -> Option<usize> {
        self.edge(edge)
            .neighbours
            .iter()
            .copied()
            .find(|&other| other != slot)
    }

    /// Corner points of a cell: the first point of each of its four edges.
    pub fn cell_corners(&self, slot: usize) -> [Vec2; 4] {
        self.pieces[slot].edges.map(|edge| self.first_point(edge))
    }

    /// Iterate edge ids in curve-generation order.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> {
        (0..self.edges.len()).map(EdgeId)
    }

    pub fn border_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_border).count()
    }

    /// Drop sampled curves so each edge is back to its two corners.
    pub fn collapse_curves(&mut self) {
        for edge in &mut self.edges {
            edge.curve = Vec::new();
        }
    }

    /// Check edge and piece counts and the neighbour invariants of the arena.
    pub fn validate(&self) -> Result<()> {
        let expected_edges = self.size.edge_count() as usize;
        if self.edges.len() != expected_edges {
            return Err(Error::Topology(format!(
                "expected {expected_edges} edges, found {}",
                self.edges.len()
            )));
        }
        let expected_pieces = self.size.total() as usize;
        if self.pieces.len() != expected_pieces {
            return Err(Error::Topology(format!(
                "expected {expected_pieces} pieces, found {}",
                self.pieces.len()
            )));
        }

        let cols = self.size.cols as usize;
        let rows = self.size.rows as usize;
        for (index, edge) in self.edges.iter().enumerate() {
            let on_perimeter = match edge.axis {
                EdgeAxis::Vertical => {
                    let x = index / rows;
                    x == 0 || x == cols
                }
                EdgeAxis::Horizontal => {
                    let y = (index - self.vertical_count) % (rows + 1);
                    y == 0 || y == rows
                }
            };
            let expected = if on_perimeter { 1 } else { 2 };
            if edge.neighbours.len() != expected {
                return Err(Error::Topology(format!(
                    "edge {} has {} neighbours, expected {expected}",
                    edge.connection_id,
                    edge.neighbours.len()
                )));
            }
        }

        for (slot, cell) in self.pieces.iter().enumerate() {
            for edge in cell.edges {
                if !self.edge(edge).neighbours.contains(&slot) {
                    return Err(Error::Topology(format!(
                        "piece slot {slot} references edge {} which does not list it",
                        self.edge(edge).connection_id
                    )));
                }
            }
        }

        Ok(())
    }
}
