//! Spherical Delaunay triangulation via convex hull
//!
//! For points on a sphere, the Delaunay triangulation is the convex hull of
//! those points. This module lifts hull faces into a triangulation with a
//! canonical CCW winding per triangle and a CSR vertex -> triangle index
//! whose per-vertex runs are sorted CCW around the vertex.

use glam::DVec3;

use crate::config::{DiagramConfig, MIN_SITES};
use crate::error::{Result, VoronoiError};
use crate::generation::hull::{HullProvider, ParryHull};
use crate::generation::incidence::order_incident_ccw;
use crate::timing::Timed;

/// Delaunay triangulation of sites on the unit sphere
///
/// Triangle `t` touches vertex `v` iff `t` appears in
/// `incident_triangles[incident_offsets[v]..incident_offsets[v + 1]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangulation {
    /// Input points, in input order
    pub vertices: Vec<DVec3>,
    /// Triangles as vertex index triples, CCW when looking at the sphere from outside
    pub triangles: Vec<[usize; 3]>,
    /// Incident triangle indices of every vertex, concatenated, each run CCW
    pub incident_triangles: Vec<usize>,
    /// Offsets into `incident_triangles`, one per vertex plus a final end offset
    pub incident_offsets: Vec<usize>,
}

impl Triangulation {
    /// Triangulate `vertices` using the default parry-backed hull
    ///
    /// # Errors
    ///
    /// See [`Triangulation::with_hull`].
    pub fn new(vertices: Vec<DVec3>, config: &DiagramConfig) -> Result<Self> {
        Self::with_hull(vertices, config, &ParryHull)
    }

    /// Triangulate `vertices` using a custom hull provider
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if the tolerance is invalid
    /// - `InsufficientSites` for fewer than 4 vertices (the hull is never invoked)
    /// - any error of the hull provider, unchanged
    /// - `InconsistentHull` / `InvalidHullIndex` if the hull is not a triangulated sphere
    /// - `BrokenFan` if a vertex's triangles do not close into one fan
    pub fn with_hull<H: HullProvider + ?Sized>(
        vertices: Vec<DVec3>,
        config: &DiagramConfig,
        hull: &H,
    ) -> Result<Self> {
        config.validate()?;

        let num_vertices = vertices.len();
        if num_vertices < MIN_SITES {
            return Err(VoronoiError::InsufficientSites {
                found: num_vertices,
                required: MIN_SITES,
            });
        }
        let num_triangles = 2 * num_vertices - 4;

        let faces = {
            let _t = Timed::debug("convex hull");
            hull.hull_faces(&vertices, config.tolerance)?
        };
        if faces.len() != num_triangles {
            return Err(VoronoiError::InconsistentHull {
                expected: num_triangles,
                found: faces.len(),
            });
        }
        if let Some(&index) = faces.iter().flatten().find(|&&v| v >= num_vertices) {
            return Err(VoronoiError::InvalidHullIndex {
                index,
                sites: num_vertices,
            });
        }

        let _t = Timed::debug("triangulation adjacency");

        // Strictly inside the hull for non-coplanar sites, unlike the origin
        // when every site lies in one hemisphere
        let interior = vertices.iter().sum::<DVec3>() / num_vertices as f64;
        let triangles: Vec<[usize; 3]> = faces
            .into_iter()
            .map(|face| orient_ccw(face, &vertices, interior))
            .collect();

        let (incident_triangles, incident_offsets) =
            build_incidence(&triangles, num_vertices);

        let mut triangulation = Self {
            vertices,
            triangles,
            incident_triangles,
            incident_offsets,
        };
        triangulation.sort_incidence()?;

        log::trace!(
            "triangulated {} vertices into {} triangles",
            num_vertices,
            num_triangles
        );
        Ok(triangulation)
    }

    /// Number of vertices (sites)
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles (always `2 * vertex_count() - 4`)
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Triangles incident to a vertex, in CCW order around it
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if `vertex` is not a vertex index.
    pub fn incident_triangles(&self, vertex: usize) -> Result<&[usize]> {
        if vertex >= self.vertex_count() {
            return Err(VoronoiError::out_of_range(
                "vertex",
                vertex,
                self.vertex_count(),
            ));
        }
        let start = self.incident_offsets[vertex];
        let end = self.incident_offsets[vertex + 1];
        Ok(&self.incident_triangles[start..end])
    }

    /// Positions of the three vertices of a triangle, in CCW order
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if `triangle` is not a triangle index.
    pub fn triangle_vertices(&self, triangle: usize) -> Result<[DVec3; 3]> {
        let [a, b, c] = *self.triangles.get(triangle).ok_or_else(|| {
            VoronoiError::out_of_range("triangle", triangle, self.triangle_count())
        })?;
        Ok([self.vertices[a], self.vertices[b], self.vertices[c]])
    }

    fn sort_incidence(&mut self) -> Result<()> {
        for v in 0..self.vertices.len() {
            let start = self.incident_offsets[v];
            let end = self.incident_offsets[v + 1];
            order_incident_ccw(v, &mut self.incident_triangles[start..end], &self.triangles)?;
        }
        Ok(())
    }
}

/// Swap the last two indices if the triangle winds clockwise seen from outside
///
/// "Outside" is judged against `interior`, a point strictly inside the hull,
/// so the face normal of every returned triangle points away from the hull.
fn orient_ccw(mut tri: [usize; 3], vertices: &[DVec3], interior: DVec3) -> [usize; 3] {
    let v0 = vertices[tri[0]];
    let v1 = vertices[tri[1]];
    let v2 = vertices[tri[2]];
    let normal = (v1 - v0).cross(v2 - v0);
    if normal.dot(v0 - interior) < 0.0 {
        tri.swap(1, 2);
    }
    tri
}

/// Two-pass counting sort of triangle indices by vertex
///
/// Returns `(values, offsets)`; runs are in triangle order, not yet CCW.
fn build_incidence(triangles: &[[usize; 3]], num_vertices: usize) -> (Vec<usize>, Vec<usize>) {
    let mut offsets = vec![0usize; num_vertices + 1];
    for tri in triangles {
        for &v in tri {
            offsets[v + 1] += 1;
        }
    }
    for i in 0..num_vertices {
        offsets[i + 1] += offsets[i];
    }

    let mut cursor = offsets[..num_vertices].to_vec();
    let mut values = vec![0usize; triangles.len() * 3];
    for (t, tri) in triangles.iter().enumerate() {
        for &v in tri {
            values[cursor[v]] = t;
            cursor[v] += 1;
        }
    }

    (values, offsets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::incidence::{next_vertex, prev_vertex};
    use crate::generation::points::generate_sphere_points;

    fn tetrahedron() -> Vec<DVec3> {
        vec![DVec3::X, DVec3::Y, DVec3::Z, -DVec3::ONE.normalize()]
    }

    /// Hull provider returning a fixed face list
    struct FixedHull(Vec<[usize; 3]>);

    impl HullProvider for FixedHull {
        fn hull_faces(&self, _points: &[DVec3], _tolerance: f64) -> Result<Vec<[usize; 3]>> {
            Ok(self.0.clone())
        }
    }

    /// Hull provider that must never be reached
    struct UnreachableHull;

    impl HullProvider for UnreachableHull {
        fn hull_faces(&self, _points: &[DVec3], _tolerance: f64) -> Result<Vec<[usize; 3]>> {
            Err(VoronoiError::DegenerateInput("hull invoked".to_string()))
        }
    }

    #[test]
    fn test_tetrahedron() {
        let dt = Triangulation::new(tetrahedron(), &DiagramConfig::default()).unwrap();

        assert_eq!(dt.vertex_count(), 4);
        assert_eq!(dt.triangle_count(), 4);
        assert_eq!(dt.incident_offsets, vec![0, 3, 6, 9, 12]);
        for v in 0..4 {
            assert_eq!(dt.incident_triangles(v).unwrap().len(), 3);
        }
    }

    #[test]
    fn test_euler_counts() {
        for n in [4, 10, 100, 1000] {
            let points = generate_sphere_points(n, 7);
            let dt = Triangulation::new(points, &DiagramConfig::default()).unwrap();

            assert_eq!(dt.triangle_count(), 2 * n - 4);
            assert_eq!(dt.incident_triangles.len(), 3 * (2 * n - 4));
            assert_eq!(dt.incident_offsets.len(), n + 1);
            assert_eq!(dt.incident_offsets[n], dt.incident_triangles.len());
        }
    }

    #[test]
    fn test_triangles_ccw() {
        let points = generate_sphere_points(200, 42);
        let dt = Triangulation::new(points, &DiagramConfig::default()).unwrap();

        for t in 0..dt.triangle_count() {
            let [a, b, c] = dt.triangle_vertices(t).unwrap();
            assert!((b - a).cross(c - a).dot(a) >= 0.0, "triangle {} is CW", t);
        }
    }

    #[test]
    fn test_incidence_cyclic() {
        let points = generate_sphere_points(300, 3);
        let dt = Triangulation::new(points, &DiagramConfig::default()).unwrap();

        for v in 0..dt.vertex_count() {
            let fan = dt.incident_triangles(v).unwrap();
            let k = fan.len();
            assert!(k >= 3);
            for i in 0..k {
                let cur = &dt.triangles[fan[i]];
                let nxt = &dt.triangles[fan[(i + 1) % k]];
                assert!(cur.contains(&v));
                assert_eq!(prev_vertex(cur, v), next_vertex(nxt, v));
            }
        }
    }

    #[test]
    fn test_insufficient_vertices_skip_hull() {
        let points = vec![DVec3::X, DVec3::Y, DVec3::Z];
        let err = Triangulation::with_hull(points, &DiagramConfig::default(), &UnreachableHull)
            .unwrap_err();
        assert_eq!(
            err,
            VoronoiError::InsufficientSites {
                found: 3,
                required: 4
            }
        );
    }

    #[test]
    fn test_invalid_tolerance_skips_hull() {
        let config = DiagramConfig { tolerance: 0.0 };
        let err = Triangulation::with_hull(tetrahedron(), &config, &UnreachableHull).unwrap_err();
        assert!(matches!(err, VoronoiError::InvalidConfig(_)));
    }

    #[test]
    fn test_hull_error_propagates() {
        let err = Triangulation::with_hull(tetrahedron(), &DiagramConfig::default(), &UnreachableHull)
            .unwrap_err();
        assert_eq!(err, VoronoiError::DegenerateInput("hull invoked".to_string()));
    }

    #[test]
    fn test_wrong_face_count() {
        let hull = FixedHull(vec![[0, 1, 2], [0, 2, 3], [0, 3, 1]]);
        let err = Triangulation::with_hull(tetrahedron(), &DiagramConfig::default(), &hull)
            .unwrap_err();
        assert_eq!(
            err,
            VoronoiError::InconsistentHull {
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn test_face_index_out_of_range() {
        let hull = FixedHull(vec![[0, 1, 2], [0, 2, 3], [0, 3, 1], [1, 3, 7]]);
        let err = Triangulation::with_hull(tetrahedron(), &DiagramConfig::default(), &hull)
            .unwrap_err();
        assert_eq!(err, VoronoiError::InvalidHullIndex { index: 7, sites: 4 });
    }

    #[test]
    fn test_non_manifold_faces() {
        // Right count, but vertex 3 is never used and 0 is used four times
        let hull = FixedHull(vec![[0, 1, 2], [0, 2, 1], [0, 1, 2], [0, 2, 1]]);
        let err = Triangulation::with_hull(tetrahedron(), &DiagramConfig::default(), &hull)
            .unwrap_err();
        assert!(matches!(err, VoronoiError::BrokenFan { .. }));
    }

    #[test]
    fn test_accessors_range_checked() {
        let dt = Triangulation::new(tetrahedron(), &DiagramConfig::default()).unwrap();

        assert_eq!(
            dt.incident_triangles(4).unwrap_err(),
            VoronoiError::out_of_range("vertex", 4, 4)
        );
        assert_eq!(
            dt.triangle_vertices(4).unwrap_err(),
            VoronoiError::out_of_range("triangle", 4, 4)
        );
    }

    #[test]
    fn test_build_incidence_counting_sort() {
        let triangles = vec![[0, 1, 2], [0, 2, 3], [0, 3, 1], [1, 3, 2]];
        let (values, offsets) = build_incidence(&triangles, 4);

        assert_eq!(offsets, vec![0, 3, 6, 9, 12]);
        assert_eq!(&values[0..3], &[0, 1, 2]);
        assert_eq!(&values[3..6], &[0, 2, 3]);
        assert_eq!(&values[6..9], &[0, 1, 3]);
        assert_eq!(&values[9..12], &[1, 2, 3]);
    }

    #[test]
    fn test_orient_ccw_swaps_clockwise() {
        let vertices = vec![DVec3::X, DVec3::Y, DVec3::Z];
        assert_eq!(orient_ccw([0, 1, 2], &vertices, DVec3::ZERO), [0, 1, 2]);
        assert_eq!(orient_ccw([0, 2, 1], &vertices, DVec3::ZERO), [0, 1, 2]);

        // Seen from a point beyond the face, the same winding is clockwise
        assert_eq!(orient_ccw([0, 1, 2], &vertices, DVec3::ONE), [0, 2, 1]);
    }

    /// Sites within a small cap around +Z, at distinct polar angles
    fn cap() -> Vec<DVec3> {
        let mut sites = vec![DVec3::Z];
        for (polar, azimuth) in [(0.15f64, 0.0f64), (0.2, 1.3), (0.25, 2.9), (0.18, 4.4)] {
            sites.push(DVec3::new(
                polar.sin() * azimuth.cos(),
                polar.sin() * azimuth.sin(),
                polar.cos(),
            ));
        }
        sites
    }

    fn assert_consistent(dt: &Triangulation) {
        let n = dt.vertex_count();
        assert_eq!(dt.triangle_count(), 2 * n - 4);

        let interior = dt.vertices.iter().sum::<DVec3>() / n as f64;
        for t in 0..dt.triangle_count() {
            let [a, b, c] = dt.triangle_vertices(t).unwrap();
            assert!((b - a).cross(c - a).dot(a - interior) > 0.0, "triangle {} faces inward", t);
        }

        for v in 0..n {
            let fan = dt.incident_triangles(v).unwrap();
            let k = fan.len();
            for i in 0..k {
                let cur = &dt.triangles[fan[i]];
                let nxt = &dt.triangles[fan[(i + 1) % k]];
                assert_eq!(prev_vertex(cur, v), next_vertex(nxt, v));
            }
        }
    }

    #[test]
    fn test_hemisphere_cap() {
        let dt = Triangulation::new(cap(), &DiagramConfig::default()).unwrap();
        assert_consistent(&dt);
    }

    #[test]
    fn test_four_random_sites() {
        // Four random sites usually share a hemisphere
        for seed in 0..32 {
            let points = generate_sphere_points(4, seed);
            let dt = Triangulation::new(points, &DiagramConfig::default()).unwrap();
            assert_consistent(&dt);
        }
    }
}
