//! Diagram: the Voronoi diagram of sites on the unit sphere

use glam::DVec3;
use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::config::{DiagramConfig, MIN_SITES};
use crate::error::{Result, VoronoiError};
use crate::generation::delaunay::Triangulation;
use crate::generation::hull::{HullProvider, ParryHull};
use crate::generation::{build_diagram, lloyd_relaxation};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// A Voronoi diagram on the unit sphere
///
/// Owns the sites, one Voronoi vertex per Delaunay triangle, and a CSR
/// layout of the cells: cell `i` occupies `cell_offsets[i]..cell_offsets[i + 1]`
/// in both `cell_vertices` (indices into `vertices`) and `cell_neighbors`
/// (indices into `sites`). Both runs are CCW when looking at the sphere from
/// outside, and index-aligned.
///
/// A diagram is built whole and never partially mutated; relaxation
/// produces a new diagram.
///
/// # Examples
///
/// ```
/// use sphere_voronoi::*;
/// use sphere_voronoi::generation::generate_sphere_points;
///
/// let sites = generate_sphere_points(100, 42);
/// let diagram = Diagram::new(sites, DiagramConfig::default()).unwrap();
///
/// assert_eq!(diagram.cell_count(), 100);
/// assert_eq!(diagram.vertices().len(), 2 * 100 - 4);
///
/// let cell = diagram.cell(0).unwrap();
/// println!("Cell 0 has {} neighbors", cell.neighbor_count());
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawDiagram"))]
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    sites: Vec<DVec3>,
    vertices: Vec<DVec3>,
    cell_vertices: Vec<usize>,
    cell_neighbors: Vec<usize>,
    cell_offsets: Vec<usize>,
    config: DiagramConfig,
}

/// Unchecked serialized form, validated through [`Diagram::from_raw_parts`]
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawDiagram {
    sites: Vec<DVec3>,
    vertices: Vec<DVec3>,
    cell_vertices: Vec<usize>,
    cell_neighbors: Vec<usize>,
    cell_offsets: Vec<usize>,
    config: DiagramConfig,
}

#[cfg(feature = "serde")]
impl TryFrom<RawDiagram> for Diagram {
    type Error = VoronoiError;

    fn try_from(raw: RawDiagram) -> Result<Self> {
        Diagram::from_raw_parts(
            raw.sites,
            raw.vertices,
            raw.cell_vertices,
            raw.cell_neighbors,
            raw.cell_offsets,
            raw.config,
        )
    }
}

impl Diagram {
    /// Build the Voronoi diagram of `sites`
    ///
    /// Sites should be unit vectors; at least 4 are required and they must
    /// not be coplanar.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if the configuration is invalid (checked first)
    /// - `InsufficientSites` for fewer than 4 sites
    /// - `DegenerateInput` if the hull rejects the sites
    /// - `InconsistentHull`, `InvalidHullIndex`, `BrokenFan` for internal
    ///   consistency failures
    /// - `DegenerateGeometry` for a zero-area Delaunay triangle
    ///
    /// # Example
    ///
    /// ```
    /// use sphere_voronoi::*;
    /// use glam::DVec3;
    ///
    /// let sites = vec![DVec3::X, DVec3::Y, DVec3::Z];
    /// assert!(Diagram::new(sites, DiagramConfig::default()).is_err());
    /// ```
    pub fn new(sites: Vec<DVec3>, config: DiagramConfig) -> Result<Self> {
        Self::with_hull(sites, config, &ParryHull)
    }

    /// Build the Voronoi diagram of `sites` using a custom hull provider
    pub fn with_hull<H: HullProvider + ?Sized>(
        sites: Vec<DVec3>,
        config: DiagramConfig,
        hull: &H,
    ) -> Result<Self> {
        let triangulation = Triangulation::with_hull(sites, &config, hull)?;
        build_diagram(triangulation, config)
    }

    pub(crate) fn from_validated_parts(
        sites: Vec<DVec3>,
        vertices: Vec<DVec3>,
        cell_vertices: Vec<usize>,
        cell_neighbors: Vec<usize>,
        cell_offsets: Vec<usize>,
        config: DiagramConfig,
    ) -> Self {
        Self {
            sites,
            vertices,
            cell_vertices,
            cell_neighbors,
            cell_offsets,
            config,
        }
    }

    /// Reassemble a diagram from its raw arrays (e.g. after deserialization)
    ///
    /// Checks the CSR shape and every index range; it does not recompute
    /// or verify the geometry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a bad configuration and
    /// `MalformedDiagram` if the arrays do not fit together.
    pub fn from_raw_parts(
        sites: Vec<DVec3>,
        vertices: Vec<DVec3>,
        cell_vertices: Vec<usize>,
        cell_neighbors: Vec<usize>,
        cell_offsets: Vec<usize>,
        config: DiagramConfig,
    ) -> Result<Self> {
        config.validate()?;
        let malformed = |msg: String| Err(VoronoiError::MalformedDiagram(msg));

        if sites.len() < MIN_SITES {
            return malformed(format!("{} sites, at least {} required", sites.len(), MIN_SITES));
        }
        if cell_offsets.len() != sites.len() + 1 {
            return malformed(format!(
                "{} offsets for {} sites",
                cell_offsets.len(),
                sites.len()
            ));
        }
        if cell_vertices.len() != cell_neighbors.len() {
            return malformed(format!(
                "{} cell vertices but {} cell neighbors",
                cell_vertices.len(),
                cell_neighbors.len()
            ));
        }
        if cell_offsets[0] != 0 || cell_offsets[sites.len()] != cell_vertices.len() {
            return malformed("offsets do not span the cell arrays".to_string());
        }
        if cell_offsets.windows(2).any(|w| w[0] > w[1]) {
            return malformed("offsets are not monotonic".to_string());
        }
        if let Some(&v) = cell_vertices.iter().find(|&&v| v >= vertices.len()) {
            return malformed(format!("cell vertex {} out of range [0, {})", v, vertices.len()));
        }
        if let Some(&s) = cell_neighbors.iter().find(|&&s| s >= sites.len()) {
            return malformed(format!("cell neighbor {} out of range [0, {})", s, sites.len()));
        }

        Ok(Self::from_validated_parts(
            sites,
            vertices,
            cell_vertices,
            cell_neighbors,
            cell_offsets,
            config,
        ))
    }

    /// Get the configuration used to build this diagram
    #[inline]
    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    /// Get the tolerance the diagram was built with (reused on relaxation)
    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.config.tolerance
    }

    /// Get the number of cells (equal to the number of sites)
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.sites.len()
    }

    /// Get the sites, indexed by cell
    #[inline]
    pub fn sites(&self) -> &[DVec3] {
        &self.sites
    }

    /// Get the Voronoi vertices, one per Delaunay triangle
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Get the concatenated boundary vertex indices of all cells
    #[inline]
    pub fn cell_vertices(&self) -> &[usize] {
        &self.cell_vertices
    }

    /// Get the concatenated neighbor site indices of all cells
    #[inline]
    pub fn cell_neighbors(&self) -> &[usize] {
        &self.cell_neighbors
    }

    /// Get the CSR offsets (length `cell_count() + 1`)
    #[inline]
    pub fn cell_offsets(&self) -> &[usize] {
        &self.cell_offsets
    }

    /// Get a view of one cell
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if `index >= cell_count()`.
    ///
    /// # Example
    ///
    /// ```
    /// # use sphere_voronoi::*;
    /// # let sites = sphere_voronoi::generation::generate_sphere_points(10, 0);
    /// # let diagram = Diagram::new(sites, DiagramConfig::default()).unwrap();
    /// assert!(diagram.cell(0).is_ok());
    /// assert!(diagram.cell(diagram.cell_count()).is_err());
    /// ```
    pub fn cell(&self, index: usize) -> Result<Cell<'_>> {
        if index >= self.cell_count() {
            return Err(VoronoiError::out_of_range("cell", index, self.cell_count()));
        }
        Ok(Cell::new(self, index))
    }

    /// Iterate over all cells in index order
    pub fn cells(&self) -> impl ExactSizeIterator<Item = Cell<'_>> + '_ {
        (0..self.cell_count()).map(move |i| Cell::new(self, i))
    }

    /// Get the neighbor site indices of a cell, CCW
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if `index >= cell_count()`.
    pub fn neighbors_of(&self, index: usize) -> Result<&[usize]> {
        Ok(self.cell(index)?.neighbor_indices())
    }

    /// Find cells within a given hop count from a center cell (BFS)
    ///
    /// Returns the sorted indices of every cell reachable in at most `hops`
    /// steps along the neighbor graph, including the center cell.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if `center >= cell_count()`.
    pub fn cells_within_hops(&self, center: usize, hops: usize) -> Result<Vec<usize>> {
        self.cell(center)?;

        let mut visited = HashSet::new();
        let mut current = vec![center];
        visited.insert(center);

        for _ in 0..hops {
            let mut next = Vec::new();
            for &cell in &current {
                for &neighbor in self.cell_neighbors_unchecked(cell) {
                    if visited.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            current = next;
        }

        let mut cells: Vec<usize> = visited.into_iter().collect();
        cells.sort_unstable();
        Ok(cells)
    }

    /// Lloyd-relax the diagram by `steps` iterations, returning a new diagram
    ///
    /// Zero steps returns an identical copy.
    ///
    /// # Errors
    ///
    /// Propagates any construction error from the rebuilds.
    pub fn relaxed(&self, steps: usize) -> Result<Diagram> {
        lloyd_relaxation(self, steps)
    }

    /// Lloyd-relax the diagram in place by `steps` iterations
    ///
    /// The diagram is replaced as a whole, and only if every step succeeds.
    ///
    /// # Example
    ///
    /// ```
    /// # use sphere_voronoi::*;
    /// # let sites = sphere_voronoi::generation::generate_sphere_points(200, 0);
    /// let mut diagram = Diagram::new(sites, DiagramConfig::default()).unwrap();
    /// let before = diagram.sites().to_vec();
    /// diagram.relax(2).unwrap();
    /// assert_ne!(diagram.sites(), &before[..]);
    /// ```
    pub fn relax(&mut self, steps: usize) -> Result<()> {
        *self = self.relaxed(steps)?;
        Ok(())
    }

    /// Build a KD-tree over the sites (requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    pub fn spatial_index(&self) -> SpatialIndex {
        SpatialIndex::new(&self.sites)
    }

    pub(crate) fn cell_range(&self, index: usize) -> std::ops::Range<usize> {
        self.cell_offsets[index]..self.cell_offsets[index + 1]
    }

    fn cell_neighbors_unchecked(&self, index: usize) -> &[usize] {
        &self.cell_neighbors[self.cell_range(index)]
    }
}
