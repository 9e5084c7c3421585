//! Diagram configuration and builder
//!
//! The only tunable of a diagram is the numerical tolerance handed to the
//! hull provider. It is validated eagerly, before any geometry work begins.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoronoiError};

/// Default tolerance used for coplanarity and degeneracy decisions
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

/// Minimum number of sites that can span a triangulated sphere
pub const MIN_SITES: usize = 4;

/// Configuration for building a Voronoi diagram
///
/// # Example
///
/// ```rust
/// use sphere_voronoi::*;
///
/// let config = DiagramConfigBuilder::new()
///     .tolerance(1e-10)
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(config.tolerance, 1e-10);
///
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: DiagramConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramConfig {
    /// Numerical tolerance used to decide coincidence and coplanarity of sites
    ///
    /// Must be strictly positive and finite.
    pub tolerance: f64,
}

impl DiagramConfig {
    /// Check that every field holds a usable value
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the tolerance is not strictly positive and finite
    pub fn validate(&self) -> Result<()> {
        validate_tolerance(self.tolerance)
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

fn validate_tolerance(tolerance: f64) -> Result<()> {
    if !tolerance.is_finite() || tolerance <= 0.0 {
        return Err(VoronoiError::InvalidConfig(format!(
            "tolerance must be positive and finite (got {})",
            tolerance
        )));
    }
    Ok(())
}

/// Builder for creating a `DiagramConfig` with validation
///
/// # Example
///
/// ```rust
/// use sphere_voronoi::*;
///
/// // Use defaults
/// let config = DiagramConfigBuilder::new().build().unwrap();
/// assert_eq!(config.tolerance, DEFAULT_TOLERANCE);
///
/// // Invalid values are rejected when set
/// assert!(DiagramConfigBuilder::new().tolerance(0.0).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct DiagramConfigBuilder {
    tolerance: f64,
}

impl DiagramConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - tolerance: 1e-12
    pub fn new() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Override the numerical tolerance
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if tolerance <= 0.0 or is not finite
    pub fn tolerance(mut self, tolerance: f64) -> Result<Self> {
        validate_tolerance(tolerance)?;
        self.tolerance = tolerance;
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<DiagramConfig> {
        let config = DiagramConfig {
            tolerance: self.tolerance,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for DiagramConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = DiagramConfigBuilder::new().build().unwrap();
        assert_eq!(config.tolerance, DEFAULT_TOLERANCE);
        assert_eq!(config, DiagramConfig::default());
    }

    #[test]
    fn test_builder_custom_tolerance() {
        let config = DiagramConfigBuilder::new()
            .tolerance(0.5)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.tolerance, 0.5);
    }

    #[test]
    fn test_builder_invalid_tolerance() {
        for tolerance in [0.0, -1.0, -0.01, f64::NAN, f64::INFINITY] {
            let result = DiagramConfigBuilder::new().tolerance(tolerance);
            assert!(
                matches!(result, Err(VoronoiError::InvalidConfig(_))),
                "tolerance {} should be rejected",
                tolerance
            );
        }
    }

    #[test]
    fn test_validate_struct_literal() {
        let config = DiagramConfig { tolerance: -1e-9 };
        assert!(config.validate().is_err());

        let config = DiagramConfig { tolerance: 1e-9 };
        assert!(config.validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = DiagramConfigBuilder::new()
            .tolerance(1e-8)
            .unwrap()
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: DiagramConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }
}
