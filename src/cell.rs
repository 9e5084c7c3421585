//! Voronoi Cell View
//!
//! A borrowed, zero-copy view of one cell of a [`Diagram`].

use glam::DVec3;
use std::fmt;

use crate::diagram::Diagram;
use crate::error::{Result, VoronoiError};

/// A single Voronoi cell of a diagram
///
/// The cell's index is the index of its site. Boundary vertices and
/// neighbors are both ordered counter-clockwise around the site as seen
/// from outside the sphere, and are index-aligned: neighbor `i` is the site
/// across the Delaunay edge leading into boundary vertex `i`.
///
/// # Memory Usage
///
/// A view is two words (index plus diagram reference); nothing is copied
/// out of the diagram's flat arrays.
#[derive(Clone, Copy)]
pub struct Cell<'a> {
    diagram: &'a Diagram,
    index: usize,
}

impl<'a> Cell<'a> {
    pub(crate) fn new(diagram: &'a Diagram, index: usize) -> Self {
        Self { diagram, index }
    }

    /// Index of this cell's site in the diagram
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The generating site of this cell
    #[inline]
    pub fn site(&self) -> DVec3 {
        self.diagram.sites()[self.index]
    }

    /// Get the vertex count (polygon complexity)
    ///
    /// Always equal to [`Cell::neighbor_count`].
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.diagram.cell_range(self.index).len()
    }

    /// Get the number of neighboring cells
    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.vertex_count()
    }

    /// Indices into the diagram's vertices of this cell's boundary, CCW
    #[inline]
    pub fn vertex_indices(&self) -> &'a [usize] {
        &self.diagram.cell_vertices()[self.diagram.cell_range(self.index)]
    }

    /// Indices of the neighboring sites, CCW
    #[inline]
    pub fn neighbor_indices(&self) -> &'a [usize] {
        &self.diagram.cell_neighbors()[self.diagram.cell_range(self.index)]
    }

    /// Boundary vertex at local position `i`
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if `i >= vertex_count()`.
    pub fn vertex(&self, i: usize) -> Result<DVec3> {
        let &v = self
            .vertex_indices()
            .get(i)
            .ok_or_else(|| VoronoiError::out_of_range("vertex", i, self.vertex_count()))?;
        Ok(self.diagram.vertices()[v])
    }

    /// Neighboring cell at local position `i`
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if `i >= neighbor_count()`.
    pub fn neighbor(&self, i: usize) -> Result<Cell<'a>> {
        let &n = self
            .neighbor_indices()
            .get(i)
            .ok_or_else(|| VoronoiError::out_of_range("neighbor", i, self.neighbor_count()))?;
        Ok(Cell::new(self.diagram, n))
    }

    /// Boundary vertex positions, CCW
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = DVec3> + 'a {
        let all = self.diagram.vertices();
        self.vertex_indices().iter().map(move |&v| all[v])
    }

    /// Neighboring cells, CCW
    pub fn neighbors(&self) -> impl ExactSizeIterator<Item = Cell<'a>> + 'a {
        let diagram = self.diagram;
        self.neighbor_indices()
            .iter()
            .map(move |&n| Cell::new(diagram, n))
    }

    /// Check if this cell shares an edge with the cell at `other`
    #[inline]
    pub fn is_neighbor_of(&self, other: usize) -> bool {
        self.neighbor_indices().contains(&other)
    }

    /// Spherical centroid: the mean of the boundary vertices, projected onto the sphere
    ///
    /// # Errors
    ///
    /// Returns `DegenerateGeometry` if the cell has no vertices or the
    /// vertices sum to zero.
    pub fn centroid(&self) -> Result<DVec3> {
        let count = self.vertex_count();
        if count == 0 {
            return Err(VoronoiError::DegenerateGeometry(format!(
                "cell {} has no vertices",
                self.index
            )));
        }

        let mean = self.vertices().sum::<DVec3>() / count as f64;
        mean.try_normalize().ok_or_else(|| {
            VoronoiError::DegenerateGeometry(format!(
                "cell {} vertices average to the origin",
                self.index
            ))
        })
    }

    /// Surface area of the cell on the unit sphere, in steradians
    ///
    /// Sums the spherical triangles fanned from the site to consecutive
    /// boundary vertices. The areas of all cells add up to 4π.
    pub fn area(&self) -> f64 {
        let site = self.site();
        let ring: Vec<DVec3> = self.vertices().collect();
        let k = ring.len();
        (0..k)
            .map(|i| spherical_triangle_area(site, ring[i], ring[(i + 1) % k]))
            .sum()
    }

    /// Great-circle angle between this cell's site and another cell's site
    pub fn distance_to(&self, other: &Cell<'_>) -> f64 {
        angle_between(self.site(), other.site())
    }
}

/// Signed area of the spherical triangle `abc` on the unit sphere
///
/// Van Oosterom–Strackee: `tan(E / 2) = a·(b×c) / (1 + a·b + b·c + c·a)`.
fn spherical_triangle_area(a: DVec3, b: DVec3, c: DVec3) -> f64 {
    let triple = a.dot(b.cross(c));
    let denom = 1.0 + a.dot(b) + b.dot(c) + c.dot(a);
    2.0 * triple.atan2(denom)
}

fn angle_between(a: DVec3, b: DVec3) -> f64 {
    a.cross(b).length().atan2(a.dot(b))
}

impl PartialEq for Cell<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && std::ptr::eq(self.diagram, other.diagram)
    }
}

impl Eq for Cell<'_> {}

impl fmt::Debug for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("index", &self.index)
            .field("site", &self.site())
            .field("vertex_indices", &self.vertex_indices())
            .field("neighbor_indices", &self.neighbor_indices())
            .finish()
    }
}
