//! Generation settings.
use crate::error::{Error, Result};
use crate::geometry::connector::TabShape;
use crate::random::Seed;
use crate::topology::solver::MAX_PIECE_COUNT;

/// Visual gap between neighbouring pieces, as a fraction of the average cell size.
pub const DEFAULT_GAP_RATIO: f32 = 0.005;
/// Snap tolerance, as a fraction of the average cell size.
pub const DEFAULT_SNAP_RATIO: f32 = 0.15;
/// Spread of the initial layout relative to the assembled board.
pub const DEFAULT_PACKING_SCALE: f32 = 1.6;
/// Connector curves are sampled at `divisions + 1` parameters.
pub const DEFAULT_CURVE_DIVISIONS: usize = 20;

/// Configuration for generating a puzzle.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PuzzleConfig {
    /// Board width in world units.
    pub width: f32,
    /// Board height in world units.
    pub height: f32,
    /// Minimum number of pieces, at most [`MAX_PIECE_COUNT`].
    pub target_count: u32,
    pub seed: Seed,
    /// Treat the perimeter like interior edges (tabs everywhere).
    pub borderless: bool,
    pub tab_shape: TabShape,
    pub gap_ratio: f32,
    pub snap_ratio: f32,
    pub packing_scale: f32,
    pub curve_divisions: usize,
    /// Give every piece a random quarter-turn at the start.
    pub scramble_rotation: bool,
}

impl PuzzleConfig {
    pub fn new(width: f32, height: f32, target_count: u32) -> Self {
        Self {
            width,
            height,
            target_count,
            seed: Seed::default(),
            borderless: false,
            tab_shape: TabShape::organic(),
            gap_ratio: DEFAULT_GAP_RATIO,
            snap_ratio: DEFAULT_SNAP_RATIO,
            packing_scale: DEFAULT_PACKING_SCALE,
            curve_divisions: DEFAULT_CURVE_DIVISIONS,
            scramble_rotation: true,
        }
    }

    pub fn with_seed(mut self, seed: impl Into<Seed>) -> Self {
        self.seed = seed.into();
        self
    }

    pub fn with_borderless(mut self, borderless: bool) -> Self {
        self.borderless = borderless;
        self
    }

    pub fn with_tab_shape(mut self, tab_shape: TabShape) -> Self {
        self.tab_shape = tab_shape;
        self
    }

    pub fn with_gap_ratio(mut self, gap_ratio: f32) -> Self {
        self.gap_ratio = gap_ratio;
        self
    }

    pub fn with_snap_ratio(mut self, snap_ratio: f32) -> Self {
        self.snap_ratio = snap_ratio;
        self
    }

    pub fn with_packing_scale(mut self, packing_scale: f32) -> Self {
        self.packing_scale = packing_scale;
        self
    }

    pub fn with_curve_divisions(mut self, curve_divisions: usize) -> Self {
        self.curve_divisions = curve_divisions;
        self
    }

    pub fn with_scramble_rotation(mut self, scramble_rotation: bool) -> Self {
        self.scramble_rotation = scramble_rotation;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(Error::InvalidConfig("width must be finite and > 0".into()));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(Error::InvalidConfig("height must be finite and > 0".into()));
        }
        if self.target_count == 0 {
            return Err(Error::InvalidConfig("target_count must be > 0".into()));
        }
        if self.target_count > MAX_PIECE_COUNT {
            return Err(Error::InvalidConfig(format!(
                "target_count must be <= {MAX_PIECE_COUNT}"
            )));
        }
        if !(self.gap_ratio.is_finite() && self.gap_ratio >= 0.0) {
            return Err(Error::InvalidConfig("gap_ratio must be >= 0".into()));
        }
        if !(self.snap_ratio.is_finite() && self.snap_ratio > 0.0) {
            return Err(Error::InvalidConfig("snap_ratio must be > 0".into()));
        }
        if !(self.packing_scale.is_finite() && self.packing_scale > 0.0) {
            return Err(Error::InvalidConfig("packing_scale must be > 0".into()));
        }
        if self.curve_divisions == 0 {
            return Err(Error::InvalidConfig("curve_divisions must be > 0".into()));
        }
        Ok(())
    }
}
