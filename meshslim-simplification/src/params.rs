//! Parameters for quadric-error simplification.

use serde::{Deserialize, Serialize};

/// Proximity threshold used when none is given.
pub const DEFAULT_PROXIMITY_THRESHOLD: f64 = 0.01;

/// Where a contracted vertex is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractionPlacement {
    /// Always the midpoint of the two endpoints.
    #[default]
    Midpoint,
    /// The minimiser of the combined quadric, falling back to the midpoint
    /// when its upper-left 3x3 block is singular.
    Optimal,
}

/// Parameters for quadric-error simplification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplifyParams {
    /// Ratio of live triangles to keep. Values at or above 1.0 keep the mesh
    /// as is. Default: 0.5
    pub ratio: f64,

    /// Vertices closer than this distance are paired even when they share no
    /// edge. Zero disables proximity pairing. Default: 0.01
    pub proximity_threshold: f64,

    /// Contracted vertex placement. Default: midpoint
    pub placement: ContractionPlacement,
}

impl Default for SimplifyParams {
    fn default() -> Self {
        Self {
            ratio: 0.5,
            proximity_threshold: DEFAULT_PROXIMITY_THRESHOLD,
            placement: ContractionPlacement::Midpoint,
        }
    }
}

impl SimplifyParams {
    /// Create params keeping the given ratio of triangles.
    #[must_use]
    pub fn with_ratio(ratio: f64) -> Self {
        Self {
            ratio,
            ..Default::default()
        }
    }

    /// Set the proximity pairing threshold.
    #[must_use]
    pub const fn with_proximity_threshold(mut self, threshold: f64) -> Self {
        self.proximity_threshold = threshold;
        self
    }

    /// Set the contracted vertex placement.
    #[must_use]
    pub const fn with_placement(mut self, placement: ContractionPlacement) -> Self {
        self.placement = placement;
        self
    }
}
