//! Live piece state: ids, quarter-turn rotations and the store mirrored into the packed buffer.
use std::fmt;
use std::num::NonZeroU32;

use glam::{Vec2, Vec3};

pub mod packed;
pub mod store;

pub use packed::PackedPieceBuffer;
pub use store::PieceStateStore;

/// 1-based piece identifier. Zero is reserved for "no piece" in picking buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PieceId(NonZeroU32);

impl PieceId {
    /// Returns `None` for the reserved id 0.
    pub fn new(id: u32) -> Option<Self> {
        NonZeroU32::new(id).map(Self)
    }

    /// Id of the piece stored at 0-based `slot`.
    pub fn from_slot(slot: usize) -> Option<Self> {
        u32::try_from(slot)
            .ok()
            .and_then(|s| s.checked_add(1))
            .and_then(Self::new)
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// 0-based slot of this piece.
    #[inline]
    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl From<PieceId> for u32 {
    fn from(id: PieceId) -> Self {
        id.get()
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A rotation by a whole number of quarter turns, always in `0..4`.
///
/// Stored exactly so that orientation comparisons between pieces never depend on float
/// rounding; [`Rotation::radians`] is the value written to the packed buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rotation(u8);

impl Rotation {
    pub const ZERO: Self = Self(0);

    pub fn from_quarter_turns(turns: u32) -> Self {
        Self((turns % 4) as u8)
    }

    #[inline]
    pub fn quarter_turns(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn radians(self) -> f32 {
        f32::from(self.0) * std::f32::consts::FRAC_PI_2
    }

    /// Advance by π/2, wrapping after a full turn.
    #[must_use]
    pub fn rotate_quarter(self) -> Self {
        Self((self.0 + 1) % 4)
    }

    /// Rotate `v` counter-clockwise by this rotation.
    pub fn apply(self, v: Vec2) -> Vec2 {
        match self.0 {
            0 => v,
            1 => Vec2::new(-v.y, v.x),
            2 => -v,
            _ => Vec2::new(v.y, -v.x),
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", u32::from(self.0) * 90)
    }
}

/// Live placement of one piece.
///
/// `position.xy` is the world location of the piece centre; `z` is a draw-order hint
/// (raised while the piece is being dragged).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PieceState {
    pub position: Vec3,
    pub rotation: Rotation,
}

impl PieceState {
    pub fn new(position: Vec3, rotation: Rotation) -> Self {
        Self { position, rotation }
    }

    /// World position of a point given relative to the piece centre.
    pub fn local_to_world(&self, local: Vec2) -> Vec2 {
        self.rotation.apply(local) + self.position.truncate()
    }
}

/// Read-only copy of one piece's state, for persistence and host-side hooks.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PieceSnapshot {
    pub id: PieceId,
    pub position: [f32; 3],
    pub rotation: Rotation,
}
