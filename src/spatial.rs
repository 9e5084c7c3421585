//! Spatial indexing for fast position-to-cell lookups
//!
//! This module is only available with the `spatial-index` feature.

use glam::DVec3;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

/// Wrapper around KD-tree for nearest-site queries
///
/// On the unit sphere the site nearest by chord length is also nearest by
/// great-circle distance, so the result is the Voronoi cell containing the
/// position's projection onto the sphere.
///
/// # Performance
///
/// - Construction: O(n log n)
/// - Query: O(log n)
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f64, usize, 3, 32>,
}

impl SpatialIndex {
    /// Build spatial index from sites
    ///
    /// # Example
    ///
    /// ```
    /// use sphere_voronoi::*;
    ///
    /// let sites = vec![DVec3::X, DVec3::Y, DVec3::Z];
    ///
    /// let index = SpatialIndex::new(&sites);
    /// let cell = index.find_nearest(DVec3::new(1.0, 0.1, 0.0));
    /// assert_eq!(cell, 0);
    /// ```
    pub fn new(sites: &[DVec3]) -> Self {
        let points: Vec<[f64; 3]> = sites.iter().map(|s| s.to_array()).collect();

        Self {
            tree: ImmutableKdTree::new_from_slice(&points),
        }
    }

    /// Index of the site nearest to `position`
    ///
    /// `position` does not need to lie on the sphere; any nonzero point
    /// resolves to the cell containing its direction.
    pub fn find_nearest(&self, position: DVec3) -> usize {
        let query = position.normalize_or_zero().to_array();
        let result = self.tree.nearest_one::<SquaredEuclidean>(&query);
        result.item
    }
}
