//! Error types for spherical Delaunay / Voronoi construction

use thiserror::Error;

/// Errors that can occur while building, querying or relaxing a diagram
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VoronoiError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Too few sites to span a sphere
    #[error("insufficient sites: got {found}, at least {required} required")]
    InsufficientSites { found: usize, required: usize },

    /// Sites rejected as degenerate (coplanar, coincident, non-finite, ...)
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// The hull provider returned a face count that does not triangulate a sphere
    #[error("inconsistent hull: expected {expected} triangles, found {found}")]
    InconsistentHull { expected: usize, found: usize },

    /// The hull provider returned a face referencing a site that does not exist
    #[error("inconsistent hull: face index {index} out of range [0, {sites})")]
    InvalidHullIndex { index: usize, sites: usize },

    /// Incident triangles around a site do not close into a single fan
    #[error("broken triangle fan around site {site} at position {position}")]
    BrokenFan { site: usize, position: usize },

    /// A lookup was outside the valid range
    #[error("{kind} index {index} out of range [0, {len})")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    /// Raw diagram arrays do not describe a valid CSR layout
    #[error("malformed diagram: {0}")]
    MalformedDiagram(String),

    /// A zero-length vector had to be projected onto the sphere
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
}

impl VoronoiError {
    pub(crate) fn out_of_range(kind: &'static str, index: usize, len: usize) -> Self {
        VoronoiError::IndexOutOfRange { kind, index, len }
    }
}

/// Result type alias for voronoi operations
pub type Result<T> = std::result::Result<T, VoronoiError>;
