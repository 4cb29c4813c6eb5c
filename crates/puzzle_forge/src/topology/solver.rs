//! Piece-count solver.
//!
//! Turns a board size and a target piece count into a column/row grid whose product is at
//! least the target while keeping the cell aspect close to the board's.
use crate::error::{Error, Result};

/// Largest grid, in pieces, the solver will produce.
pub const MAX_PIECE_COUNT: u32 = 1 << 22;

/// Column/row count of a puzzle grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSize {
    pub cols: u32,
    pub rows: u32,
}

impl GridSize {
    pub fn new(cols: u32, rows: u32) -> Self {
        Self { cols, rows }
    }

    /// Total number of pieces, `cols * rows`, saturating at `u32::MAX`.
    pub fn total(&self) -> u32 {
        self.cols.saturating_mul(self.rows)
    }

    /// Number of shared edges in the lattice, `cols * (rows + 1) + rows * (cols + 1)`,
    /// saturating at `u32::MAX`.
    pub fn edge_count(&self) -> u32 {
        self.cols
            .saturating_mul(self.rows.saturating_add(1))
            .saturating_add(self.rows.saturating_mul(self.cols.saturating_add(1)))
    }
}

/// Solve the grid for a `width` × `height` board and at least `target` pieces.
///
/// Starts from `round(sqrt(target * width / height))` columns and
/// `round(sqrt(target * height / width))` rows, then increments the smaller of the two
/// (columns on a tie) until the product reaches `target`.
pub fn solve_grid(width: f32, height: f32, target: u32) -> Result<GridSize> {
    if !(width.is_finite() && width > 0.0) || !(height.is_finite() && height > 0.0) {
        return Err(Error::InvalidConfig(format!(
            "board size must be positive, got {width} x {height}"
        )));
    }
    if target == 0 {
        return Err(Error::InvalidConfig("target piece count must be > 0".into()));
    }
    if target > MAX_PIECE_COUNT {
        return Err(Error::InvalidConfig(format!(
            "target piece count {target} exceeds {MAX_PIECE_COUNT}"
        )));
    }

    let w = width as f64;
    let h = height as f64;
    let t = target as f64;
    let mut cols = ((t * (w / h)).sqrt().round() as u32).max(1);
    let mut rows = ((t * (h / w)).sqrt().round() as u32).max(1);

    while (cols as u64) * (rows as u64) < target as u64 {
        if cols <= rows {
            cols += 1;
        } else {
            rows += 1;
        }
    }

    let total = u64::from(cols) * u64::from(rows);
    if total > u64::from(MAX_PIECE_COUNT) {
        return Err(Error::InvalidConfig(format!(
            "a {width} x {height} board needs a {cols} x {rows} grid, above {MAX_PIECE_COUNT} pieces"
        )));
    }

    Ok(GridSize { cols, rows })
}
