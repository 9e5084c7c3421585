//! Spherical Delaunay triangulation and Voronoi diagrams
//!
//! Builds the Voronoi diagram of a set of sites on the unit sphere from the
//! convex hull of the sites, with CCW-ordered cell boundaries and neighbors,
//! and improves site uniformity with Lloyd's relaxation.
//!
//! # Quick Start
//!
//! ```rust
//! use sphere_voronoi::*;
//! use sphere_voronoi::generation::generate_sphere_points;
//!
//! let config = DiagramConfigBuilder::new()
//!     .tolerance(DEFAULT_TOLERANCE).unwrap()
//!     .build().unwrap();
//!
//! let mut diagram = Diagram::new(generate_sphere_points(1000, 42), config).unwrap();
//! diagram.relax(5).unwrap();
//!
//! let cell = diagram.cell(0).unwrap();
//! println!("cell 0 has {} neighbors", cell.neighbor_count());
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-cell lookups using KD-tree
//! - `serde`: Enables serialization support for configuration and diagrams

// Modules
pub mod cell;
pub mod config;
pub mod diagram;
pub mod error;
pub mod generation;
mod timing;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use cell::Cell;
pub use config::{DiagramConfig, DiagramConfigBuilder, DEFAULT_TOLERANCE, MIN_SITES};
pub use diagram::Diagram;
pub use error::{Result, VoronoiError};
pub use generation::{HullProvider, LloydOptions, LloydReport, ParryHull, Triangulation};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::DVec3 for convenience
pub use glam::DVec3;
