//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, grid topology violations, per-piece geometry failures and
//! piece state store access. [`GeometryError`] and [`StateError`] are also used on their own
//! by the geometry helpers and the state store.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("topology violation: {0}")]
    Topology(String),

    #[error("geometry failure for piece slot {piece}: {source}")]
    Geometry {
        piece: usize,
        #[source]
        source: GeometryError,
    },

    #[error(transparent)]
    State(#[from] StateError),

    #[error("{0}")]
    Other(String),
}

/// Failures while turning a piece outline into a render mesh.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("outline intersects itself between segments {first} and {second}")]
    SelfIntersecting { first: usize, second: usize },

    #[error("outline has {count} distinct vertices, at least 3 are required")]
    TooFewVertices { count: usize },

    #[error("no ear left to clip with {remaining} vertices remaining")]
    NoEar { remaining: usize },
}

/// Piece state store access with an id outside `1..=piece_count`.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("piece id {id} is out of range 1..={count}")]
    OutOfRange { id: u32, count: u32 },

    #[error("piece id {id} does not name a piece")]
    NotFound { id: u32 },
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
