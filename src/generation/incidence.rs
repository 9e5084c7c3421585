//! Counter-clockwise ordering of the triangles around a site
//!
//! Triangles are stored with their vertices in CCW order as seen from
//! outside the sphere, so triangle `(v, a, b)` sweeps from `a` to `b`
//! counter-clockwise around `v`. Two triangles are adjacent around `v` when
//! one's `next` equals the other's `prev`; going CCW, `B` follows `A` when
//! `prev(A, v) == next(B, v)`, i.e. both share the spoke `v -> prev(A, v)`.
//!
//! Chaining the other way, `next(T_i, v) == prev(T_{i+1}, v)`, walks the
//! same fan clockwise. The runs in `Triangulation::incident_triangles` are
//! therefore the reverse of an order built with that rule: every run here
//! satisfies `prev(T_i, v) == next(T_{i+1 mod k}, v)`.

use crate::error::{Result, VoronoiError};

/// Vertex following `v` in the triangle's CCW order
///
/// Returns `None` if `v` is not a vertex of the triangle.
#[inline]
pub fn next_vertex(triangle: &[usize; 3], v: usize) -> Option<usize> {
    let pos = triangle.iter().position(|&t| t == v)?;
    Some(triangle[(pos + 1) % 3])
}

/// Vertex preceding `v` in the triangle's CCW order
///
/// Returns `None` if `v` is not a vertex of the triangle.
#[inline]
pub fn prev_vertex(triangle: &[usize; 3], v: usize) -> Option<usize> {
    let pos = triangle.iter().position(|&t| t == v)?;
    Some(triangle[(pos + 2) % 3])
}

/// Permute `incident` in place into CCW fan order around `site`
///
/// Selection-style pass: position `i` receives the triangle whose next
/// vertex matches the previous vertex of the triangle at `i - 1`. This is
/// O(k²) in the site's degree, which stays small for well-spread sites.
///
/// # Errors
///
/// Returns `BrokenFan` if a triangle does not contain `site`, if no
/// successor exists for some position, if the fan does not close back onto
/// its first triangle, or if the site has fewer than 3 triangles. All of
/// these mean the triangulation is not a closed 2-manifold.
pub fn order_incident_ccw(
    site: usize,
    incident: &mut [usize],
    triangles: &[[usize; 3]],
) -> Result<()> {
    let broken = |position| VoronoiError::BrokenFan { site, position };
    let n = incident.len();
    if n < 3 {
        return Err(broken(0));
    }

    for i in 1..n {
        let tail = prev_vertex(&triangles[incident[i - 1]], site).ok_or(broken(i - 1))?;

        let mut found = None;
        for j in i..n {
            let head = next_vertex(&triangles[incident[j]], site).ok_or(broken(j))?;
            if head == tail {
                found = Some(j);
                break;
            }
        }

        let j = found.ok_or(broken(i))?;
        incident.swap(i, j);
    }

    let tail = prev_vertex(&triangles[incident[n - 1]], site).ok_or(broken(n - 1))?;
    let head = next_vertex(&triangles[incident[0]], site).ok_or(broken(0))?;
    if tail != head {
        return Err(broken(n - 1));
    }

    Ok(())
}
