//! Voronoi dual construction from a Delaunay triangulation
//!
//! Each Delaunay triangle contributes one Voronoi vertex, the circumcenter
//! on the side of its outward face normal, projected onto the sphere. A site's cell boundary is its CCW fan of
//! incident triangles, so the triangulation's CSR index is reused as-is for
//! the cell boundaries; neighbor lists are computed index-aligned to it.

use glam::DVec3;

use crate::config::DiagramConfig;
use crate::diagram::Diagram;
use crate::error::{Result, VoronoiError};
use crate::generation::delaunay::Triangulation;
use crate::generation::incidence::next_vertex;
use crate::timing::Timed;

/// Unnormalized circumcenter direction of a spherical triangle
///
/// The result is perpendicular to the triangle's plane and oriented into the
/// hemisphere of its vertices. Its length is twice the planar triangle area,
/// so it is zero for degenerate triangles.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use sphere_voronoi::generation::triangle_circumcenter;
///
/// let c = triangle_circumcenter(DVec3::X, DVec3::Y, DVec3::Z).normalize();
/// assert!((c - DVec3::ONE.normalize()).length() < 1e-12);
/// ```
pub fn triangle_circumcenter(a: DVec3, b: DVec3, c: DVec3) -> DVec3 {
    let circumcenter = (a - b).cross(b - c);
    if circumcenter.dot(a + b + c) < 0.0 {
        -circumcenter
    } else {
        circumcenter
    }
}

/// Build the Voronoi diagram dual to a CCW-ordered triangulation
///
/// # Errors
///
/// - `DegenerateGeometry` if a triangle has zero area (its circumcenter
///   cannot be projected onto the sphere)
/// - `BrokenFan` if a fan references a triangle that does not contain its site
pub(crate) fn build_diagram(triangulation: Triangulation, config: DiagramConfig) -> Result<Diagram> {
    let _t = Timed::debug("voronoi dual");

    let vertices = voronoi_vertices(&triangulation)?;
    let cell_neighbors = cell_neighbors(&triangulation)?;

    let Triangulation {
        vertices: sites,
        incident_triangles: cell_vertices,
        incident_offsets: cell_offsets,
        ..
    } = triangulation;

    Ok(Diagram::from_validated_parts(
        sites,
        vertices,
        cell_vertices,
        cell_neighbors,
        cell_offsets,
        config,
    ))
}

/// One unit-length Voronoi vertex per triangle
///
/// Triangles are wound outward, so the face normal already points at the
/// empty side of the triangle's circumcircle. For a face whose circumcircle
/// is larger than a hemisphere (all sites in one hemisphere) that is the far
/// side, where [`triangle_circumcenter`] would pick the near one.
fn voronoi_vertices(triangulation: &Triangulation) -> Result<Vec<DVec3>> {
    triangulation
        .triangles
        .iter()
        .enumerate()
        .map(|(t, &[a, b, c])| {
            let v = &triangulation.vertices;
            (v[b] - v[a])
                .cross(v[c] - v[a])
                .try_normalize()
                .ok_or_else(|| {
                    VoronoiError::DegenerateGeometry(format!(
                        "triangle {} ({}, {}, {}) has zero area",
                        t, a, b, c
                    ))
                })
        })
        .collect()
}

/// Neighbor site across each fan position: the vertex after the site in that triangle
fn cell_neighbors(triangulation: &Triangulation) -> Result<Vec<usize>> {
    let offsets = &triangulation.incident_offsets;
    let mut neighbors = vec![0usize; triangulation.incident_triangles.len()];

    for site in 0..triangulation.vertex_count() {
        let start = offsets[site];
        let fan = &triangulation.incident_triangles[start..offsets[site + 1]];
        for (i, &t) in fan.iter().enumerate() {
            neighbors[start + i] = next_vertex(&triangulation.triangles[t], site)
                .ok_or(VoronoiError::BrokenFan { site, position: i })?;
        }
    }

    Ok(neighbors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_circumcenter_orthonormal() {
        let want = DVec3::ONE.normalize();

        let got = triangle_circumcenter(DVec3::X, DVec3::Y, DVec3::Z).normalize();
        assert_abs_diff_eq!((got - want).length(), 0.0, epsilon = 1e-12);

        // Reversed winding lands in the same hemisphere
        let got = triangle_circumcenter(DVec3::Z, DVec3::Y, DVec3::X).normalize();
        assert_abs_diff_eq!((got - want).length(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_circumcenter_equidistant() {
        let a = DVec3::new(0.3, 0.9, 0.1).normalize();
        let b = DVec3::new(-0.5, 0.7, 0.4).normalize();
        let c = DVec3::new(0.1, 0.6, -0.8).normalize();
        let center = triangle_circumcenter(a, b, c).normalize();

        let da = center.dot(a);
        assert_abs_diff_eq!(center.dot(b), da, epsilon = 1e-12);
        assert_abs_diff_eq!(center.dot(c), da, epsilon = 1e-12);
        assert!(da > 0.0);
    }

    #[test]
    fn test_degenerate_triangle_is_zero() {
        let c = triangle_circumcenter(DVec3::X, DVec3::X, DVec3::Y);
        assert_eq!(c, DVec3::ZERO);
        assert!(c.try_normalize().is_none());
    }

    #[test]
    fn test_vertex_follows_face_normal() {
        let triangulation = Triangulation {
            vertices: vec![DVec3::X, DVec3::Y, DVec3::Z, -DVec3::ONE.normalize()],
            triangles: vec![[0, 1, 2], [0, 2, 1]],
            incident_triangles: vec![],
            incident_offsets: vec![0; 5],
        };
        let vertices = voronoi_vertices(&triangulation).unwrap();
        let want = DVec3::ONE.normalize();
        assert_abs_diff_eq!((vertices[0] - want).length(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!((vertices[1] + want).length(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_area_triangle_fails() {
        // Hand-built triangulation with a repeated vertex in one triangle
        let triangulation = Triangulation {
            vertices: vec![DVec3::X, DVec3::Y, DVec3::Z, -DVec3::ONE.normalize()],
            triangles: vec![[0, 1, 2], [0, 0, 3], [0, 3, 1], [1, 3, 2]],
            incident_triangles: vec![],
            incident_offsets: vec![0; 5],
        };
        let err = voronoi_vertices(&triangulation).unwrap_err();
        assert!(matches!(err, VoronoiError::DegenerateGeometry(_)));
    }
}
