//! Seeded random site generation on the unit sphere

use glam::DVec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::f64::consts::PI;

/// Generate `count` random unit vectors, uniformly distributed by area
///
/// The same seed always produces the same points, which makes the output
/// suitable for reproducible diagrams and tests. Points are not spread
/// evenly; run Lloyd relaxation on the resulting diagram for that.
///
/// # Example
///
/// ```rust
/// use sphere_voronoi::generation::generate_sphere_points;
///
/// let points = generate_sphere_points(100, 42);
/// assert_eq!(points.len(), 100);
/// assert!(points.iter().all(|p| (p.length() - 1.0).abs() < 1e-12));
/// ```
pub fn generate_sphere_points(count: usize, seed: u64) -> Vec<DVec3> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    (0..count)
        .map(|_| {
            // Uniform z and longitude give a uniform density on the sphere
            let z: f64 = rng.gen_range(-1.0..=1.0);
            let lon: f64 = rng.gen_range(-PI..PI);
            let r = (1.0 - z * z).max(0.0).sqrt();
            DVec3::new(r * lon.cos(), r * lon.sin(), z).normalize()
        })
        .collect()
}
