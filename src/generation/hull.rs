//! Convex hull provider
//!
//! For points on a sphere, the Delaunay triangulation is the convex hull of
//! those points. The hull itself is treated as a black box behind the
//! [`HullProvider`] trait; [`ParryHull`] is a thin wrapper around
//! parry3d's convex hull algorithm.

use glam::DVec3;
use parry3d_f64::math::Point;
use parry3d_f64::transformation;

use crate::error::{Result, VoronoiError};

/// Something that can triangulate the convex hull of a 3D point cloud
///
/// Implementations return one `[a, b, c]` index triple per hull face, with
/// indices into `points`. Face winding does not matter; the triangulation
/// builder canonicalizes it. Degenerate input (coplanar, coincident or
/// otherwise rejected points) must be reported as an error, which callers
/// propagate without retrying.
pub trait HullProvider {
    /// Compute the triangular faces of the convex hull of `points`
    fn hull_faces(&self, points: &[DVec3], tolerance: f64) -> Result<Vec<[usize; 3]>>;
}

/// Hull provider backed by `parry3d-f64`
///
/// Rejects non-finite, coincident, collinear and coplanar inputs using the
/// tolerance before running the hull, and fails if the hull does not keep
/// every input point as a vertex (e.g. duplicate sites).
#[derive(Debug, Clone, Copy, Default)]
pub struct ParryHull;

impl HullProvider for ParryHull {
    fn hull_faces(&self, points: &[DVec3], tolerance: f64) -> Result<Vec<[usize; 3]>> {
        check_affine_span(points, tolerance)?;

        let parry_points: Vec<Point<f64>> =
            points.iter().map(|p| Point::new(p.x, p.y, p.z)).collect();

        let (vertices, triangles) = transformation::try_convex_hull(&parry_points)
            .map_err(|err| {
                VoronoiError::DegenerateInput(format!("convex hull failed: {:?}", err))
            })?;

        // Unused points are swap-removed by parry, so a full-length vertex
        // list also means the input order was kept.
        if vertices.len() != points.len() {
            return Err(VoronoiError::DegenerateInput(format!(
                "convex hull kept {} of {} sites (duplicate or interior points)",
                vertices.len(),
                points.len()
            )));
        }

        Ok(triangles
            .into_iter()
            .map(|[a, b, c]| [a as usize, b as usize, c as usize])
            .collect())
    }
}

/// Verify that the points span a 3D volume
///
/// Picks an initial simplex from extreme points the way quickhull does:
/// the point farthest from the first one, then the point farthest from that
/// line, then the point farthest from that plane. Each distance must exceed
/// the tolerance.
fn check_affine_span(points: &[DVec3], tolerance: f64) -> Result<()> {
    if let Some(index) = points.iter().position(|p| !p.is_finite()) {
        return Err(VoronoiError::DegenerateInput(format!(
            "site {} has a non-finite coordinate",
            index
        )));
    }

    let Some(&origin) = points.first() else {
        return Err(VoronoiError::DegenerateInput("no points".to_string()));
    };

    let (far, line_len) = farthest(points, |p| (p - origin).length());
    if line_len <= tolerance {
        return Err(VoronoiError::DegenerateInput(
            "all sites coincide".to_string(),
        ));
    }
    let axis = (points[far] - origin) / line_len;

    let (apex, line_dist) = farthest(points, |p| (p - origin).cross(axis).length());
    if line_dist <= tolerance {
        return Err(VoronoiError::DegenerateInput(
            "all sites are collinear".to_string(),
        ));
    }
    let normal = axis.cross(points[apex] - origin).normalize();

    let (_, plane_dist) = farthest(points, |p| (p - origin).dot(normal).abs());
    if plane_dist <= tolerance {
        return Err(VoronoiError::DegenerateInput(
            "all sites are coplanar".to_string(),
        ));
    }

    Ok(())
}

fn farthest(points: &[DVec3], distance: impl Fn(DVec3) -> f64) -> (usize, f64) {
    points
        .iter()
        .enumerate()
        .map(|(i, &p)| (i, distance(p)))
        .fold((0, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> Vec<DVec3> {
        vec![
            DVec3::X,
            DVec3::Y,
            DVec3::Z,
            -DVec3::ONE.normalize(),
        ]
    }

    #[test]
    fn test_parry_hull_tetrahedron() {
        let faces = ParryHull.hull_faces(&tetrahedron(), 1e-12).unwrap();

        // Should have 4 triangular faces, each site used 3 times
        assert_eq!(faces.len(), 4);
        let mut uses = [0usize; 4];
        for face in &faces {
            for &v in face {
                uses[v] += 1;
            }
        }
        assert_eq!(uses, [3, 3, 3, 3]);
    }

    #[test]
    fn test_parry_hull_octahedron() {
        let points = vec![DVec3::X, -DVec3::X, DVec3::Y, -DVec3::Y, DVec3::Z, -DVec3::Z];
        let faces = ParryHull.hull_faces(&points, 1e-12).unwrap();
        assert_eq!(faces.len(), 8);
    }

    #[test]
    fn test_coplanar_rejected() {
        let points = vec![
            DVec3::X,
            DVec3::Y,
            -DVec3::X,
            -DVec3::Y,
            DVec3::new(1.0, 1.0, 0.0).normalize(),
        ];
        let result = ParryHull.hull_faces(&points, 1e-12);
        assert!(matches!(result, Err(VoronoiError::DegenerateInput(_))));
    }

    #[test]
    fn test_coincident_rejected() {
        let points = vec![DVec3::X; 5];
        let result = ParryHull.hull_faces(&points, 1e-12);
        assert!(matches!(result, Err(VoronoiError::DegenerateInput(_))));
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut points = tetrahedron();
        points[2] = DVec3::new(f64::NAN, 0.0, 1.0);
        let result = ParryHull.hull_faces(&points, 1e-12);
        assert!(matches!(result, Err(VoronoiError::DegenerateInput(_))));
    }

    #[test]
    fn test_nearly_coplanar_depends_on_tolerance() {
        let points = vec![
            DVec3::X,
            DVec3::Y,
            -DVec3::X,
            DVec3::new(0.0, -1.0, 1e-6).normalize(),
        ];
        assert!(ParryHull.hull_faces(&points, 1e-3).is_err());
        assert!(check_affine_span(&points, 1e-9).is_ok());
    }
}
