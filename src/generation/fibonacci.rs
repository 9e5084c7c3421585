//! Fibonacci Lattice Point Distribution
//!
//! Generates near-uniform site distributions on the unit sphere using the
//! Fibonacci spiral (golden angle) method with added jitter.
//!
//! # Algorithm
//!
//! The Fibonacci lattice uses the golden ratio to create a spiral pattern that
//! naturally avoids clustering. Points are placed at:
//! - Longitude: `2π * i / φ` (golden angle increments)
//! - Latitude: Evenly spaced in z-coordinate with pole offset
//!
//! Random tangential jitter breaks up the regular spiral so that no four
//! sites are cocircular, which keeps the Delaunay triangulation unambiguous.
//!
//! # References
//!
//! - [Fibonacci Lattice Optimization](https://extremelearning.com.au/how-to-evenly-distribute-points-on-a-sphere-more-effectively-than-the-canonical-fibonacci-lattice/)

use glam::DVec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::f64::consts::PI;

/// Golden ratio φ = (1 + √5) / 2
const PHI: f64 = 1.618033988749895;

/// Jitter strength as fraction of average site spacing
const JITTER_STRENGTH: f64 = 0.5;

/// Offset that pushes the first and last points away from the poles
fn get_epsilon(n: usize) -> f64 {
    match n {
        0..=23 => 0.33,
        24..=176 => 1.33,
        177..=889 => 3.33,
        890..=10999 => 10.0,
        _ => 27.5,
    }
}

/// Generate sites on the unit sphere using a jittered Fibonacci lattice
///
/// Produces a near-uniform distribution in O(n) time, a good starting point
/// when only a few Lloyd iterations are wanted.
///
/// # Example
///
/// ```rust
/// use sphere_voronoi::generation::generate_fibonacci_sphere_points;
///
/// let points = generate_fibonacci_sphere_points(1000, 42);
/// assert_eq!(points.len(), 1000);
/// ```
pub fn generate_fibonacci_sphere_points(count: usize, seed: u64) -> Vec<DVec3> {
    if count == 0 {
        return Vec::new();
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let epsilon = get_epsilon(count);
    let n = count as f64;

    // Average angular spacing between points (approximate)
    let avg_spacing = (4.0 * PI / n).sqrt();
    let jitter_amount = avg_spacing * JITTER_STRENGTH;

    (0..count)
        .map(|i| {
            let i_f = i as f64;

            let theta = 2.0 * PI * i_f / PHI;
            let cos_phi = (1.0 - 2.0 * (i_f + epsilon) / (n - 1.0 + 2.0 * epsilon)).clamp(-1.0, 1.0);
            let sin_phi = (1.0 - cos_phi * cos_phi).sqrt();

            let base = DVec3::new(sin_phi * theta.cos(), sin_phi * theta.sin(), cos_phi);

            let jitter_theta: f64 = rng.gen_range(0.0..2.0 * PI);
            let jitter_mag: f64 = rng.gen_range(0.0..jitter_amount);

            // Orthonormal basis of the tangent plane
            let up = if base.z.abs() < 0.9 { DVec3::Z } else { DVec3::X };
            let tangent1 = base.cross(up).normalize();
            let tangent2 = base.cross(tangent1).normalize();

            let jittered = base
                + tangent1 * jitter_mag * jitter_theta.cos()
                + tangent2 * jitter_mag * jitter_theta.sin();

            jittered.normalize()
        })
        .collect()
}
