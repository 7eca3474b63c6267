// 🧭 Quadrant Classification
// Maps composite scores onto the four-quadrant strategic matrix

use serde::{Deserialize, Serialize};

/// Score threshold splitting both axes into low/high halves.
/// A score exactly on the threshold counts as high.
pub const QUADRANT_THRESHOLD: f64 = 50.0;

// ============================================================================
// CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// High volume, high potential
    #[serde(rename = "Grow & Scale")]
    GrowScale,

    /// Low volume, high potential
    #[serde(rename = "Incubate")]
    Incubate,

    /// High volume, low potential
    #[serde(rename = "Protect")]
    Protect,

    /// Low volume, low potential
    #[serde(rename = "Maintain / Exit")]
    MaintainExit,
}

impl Category {
    /// Classify an account from its composite scores.
    ///
    /// Total over all finite inputs. Boundary values resolve to the
    /// high side on both axes.
    pub fn classify(volume_score: f64, potential_score: f64) -> Self {
        if volume_score >= QUADRANT_THRESHOLD {
            if potential_score >= QUADRANT_THRESHOLD {
                Category::GrowScale
            } else {
                Category::Protect
            }
        } else if potential_score >= QUADRANT_THRESHOLD {
            Category::Incubate
        } else {
            Category::MaintainExit
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::GrowScale => "Grow & Scale",
            Category::Incubate => "Incubate",
            Category::Protect => "Protect",
            Category::MaintainExit => "Maintain / Exit",
        }
    }

    /// Marker color used by the rendering layers.
    pub fn color(&self) -> &'static str {
        match self {
            Category::GrowScale => "#22c55e",
            Category::Incubate => "#3b82f6",
            Category::Protect => "#ef4444",
            Category::MaintainExit => "#94a3b8",
        }
    }

    /// All categories in matrix reading order (top-right first).
    pub fn all() -> [Category; 4] {
        [
            Category::GrowScale,
            Category::Incubate,
            Category::Protect,
            Category::MaintainExit,
        ]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TESTS
// ============================================================================
