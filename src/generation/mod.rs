//! Core Delaunay / Voronoi construction
//!
//! The pipeline is: site generation, convex hull (the spherical Delaunay
//! triangulation), CCW orientation and incidence ordering, then the Voronoi
//! dual. Lloyd's relaxation loops over the whole pipeline.

pub mod delaunay;
mod fibonacci;
pub mod hull;
pub mod incidence;
mod lloyd;
pub(crate) mod points;
mod voronoi;

pub use delaunay::Triangulation;
pub use fibonacci::generate_fibonacci_sphere_points;
pub use hull::{HullProvider, ParryHull};
pub use incidence::{next_vertex, order_incident_ccw, prev_vertex};
pub use lloyd::{
    lloyd_relaxation, lloyd_relaxation_with_hull, lloyd_relaxation_with_options, relaxed_sites,
    LloydOptions, LloydReport,
};
pub use points::generate_sphere_points;
pub use voronoi::triangle_circumcenter;

pub(crate) use voronoi::build_diagram;
