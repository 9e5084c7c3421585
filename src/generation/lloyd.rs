//! Lloyd's Relaxation for uniform site distribution
//!
//! Lloyd's Relaxation iteratively improves the uniformity of the sites by
//! moving each site to the spherical centroid of its Voronoi cell and
//! rebuilding the diagram from scratch.

use glam::DVec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::diagram::Diagram;
use crate::error::{Result, VoronoiError};
use crate::generation::hull::{HullProvider, ParryHull};
use crate::timing::Timed;

/// Options for Lloyd's relaxation algorithm
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LloydOptions {
    /// Maximum number of iterations to run
    pub max_iterations: usize,
    /// Convergence threshold - stop when max site displacement < this value
    ///
    /// Displacement is the chord length on the unit sphere.
    /// Set to 0.0 to disable early termination.
    pub convergence_threshold: f64,
}

impl LloydOptions {
    /// Run exactly `steps` iterations, with early termination disabled
    pub fn steps(steps: usize) -> Self {
        Self {
            max_iterations: steps,
            convergence_threshold: 0.0,
        }
    }

    /// Check that the threshold is usable
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the threshold is negative or not finite
    pub fn validate(&self) -> Result<()> {
        if !self.convergence_threshold.is_finite() || self.convergence_threshold < 0.0 {
            return Err(VoronoiError::InvalidConfig(format!(
                "Lloyd convergence threshold must be >= 0 (got {})",
                self.convergence_threshold
            )));
        }
        Ok(())
    }
}

impl Default for LloydOptions {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            // Stop when no site moves more than 1% of the sphere radius
            convergence_threshold: 0.01,
        }
    }
}

/// Outcome of a relaxation run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LloydReport {
    /// Number of iterations actually performed
    pub iterations: usize,
    /// Whether the run stopped early on the convergence threshold
    pub converged: bool,
    /// Largest site displacement of the last iteration (0 if none ran)
    pub max_displacement: f64,
}

/// Apply `steps` iterations of Lloyd's Relaxation
///
/// Returns the rebuilt diagram; the input is left untouched. Zero steps
/// returns an identical copy.
///
/// # Example
///
/// ```rust
/// use sphere_voronoi::*;
/// use sphere_voronoi::generation::{generate_sphere_points, lloyd_relaxation};
///
/// let diagram = Diagram::new(generate_sphere_points(100, 1), DiagramConfig::default()).unwrap();
/// let relaxed = lloyd_relaxation(&diagram, 3).unwrap();
/// assert_eq!(relaxed.cell_count(), 100);
/// ```
pub fn lloyd_relaxation(diagram: &Diagram, steps: usize) -> Result<Diagram> {
    let (relaxed, _) = lloyd_relaxation_with_options(diagram, LloydOptions::steps(steps))?;
    Ok(relaxed)
}

/// Apply Lloyd's Relaxation with custom options
///
/// Rebuilds with the default parry-backed hull and the diagram's own tolerance.
pub fn lloyd_relaxation_with_options(
    diagram: &Diagram,
    options: LloydOptions,
) -> Result<(Diagram, LloydReport)> {
    lloyd_relaxation_with_hull(diagram, options, &ParryHull)
}

/// Apply Lloyd's Relaxation with custom options and a custom hull provider
///
/// # Errors
///
/// Returns `InvalidConfig` for bad options (before any rebuild), and
/// propagates centroid and rebuild failures unchanged. On error no partial
/// result is returned.
pub fn lloyd_relaxation_with_hull<H: HullProvider + ?Sized>(
    diagram: &Diagram,
    options: LloydOptions,
    hull: &H,
) -> Result<(Diagram, LloydReport)> {
    options.validate()?;

    let _total = Timed::debug("lloyd relaxation");
    let mut current = diagram.clone();
    let mut report = LloydReport {
        iterations: 0,
        converged: false,
        max_displacement: 0.0,
    };

    log::debug!(
        "[Lloyd] Starting: {} sites, max {} iterations, threshold {:.4}",
        current.cell_count(),
        options.max_iterations,
        options.convergence_threshold
    );

    for iteration in 0..options.max_iterations {
        let _iter = Timed::trace("lloyd iteration");

        let (sites, max_displacement) = relaxed_sites(&current)?;
        current = Diagram::with_hull(sites, *current.config(), hull)?;

        report.iterations = iteration + 1;
        report.max_displacement = max_displacement;

        log::debug!(
            "[Lloyd] Iter {}: max_disp={:.6}",
            iteration + 1,
            max_displacement
        );

        if options.convergence_threshold > 0.0 && max_displacement < options.convergence_threshold {
            report.converged = true;
            break;
        }
    }

    log::info!(
        "[Lloyd] Finished: {} iterations (of max {}), converged={}",
        report.iterations,
        options.max_iterations,
        report.converged
    );

    Ok((current, report))
}

/// Centroid of every cell, all computed against the same diagram
///
/// Returns the new sites and the largest displacement.
pub fn relaxed_sites(diagram: &Diagram) -> Result<(Vec<DVec3>, f64)> {
    let _t = Timed::trace("lloyd centroids");
    let mut max_displacement: f64 = 0.0;

    let sites = diagram
        .cells()
        .map(|cell| {
            let centroid = cell.centroid()?;
            max_displacement = max_displacement.max((centroid - cell.site()).length());
            Ok(centroid)
        })
        .collect::<Result<Vec<DVec3>>>()?;

    Ok((sites, max_displacement))
}
