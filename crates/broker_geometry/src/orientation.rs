//! Euler-angle orientation, as reported by the source simulation.

use serde::{Deserialize, Serialize};

/// Yaw/pitch/roll in degrees, as produced by the simulation.
///
/// This is a wire-format convenience, not a rotation representation used
/// for interpolation or composition — those concerns belong to the client
/// renderer, which is out of scope for this crate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Orientation {
    pub yaw_deg: f64,
    pub pitch_deg: f64,
    pub roll_deg: f64,
}

impl Orientation {
    #[must_use]
    pub const fn new(yaw_deg: f64, pitch_deg: f64, roll_deg: f64) -> Self {
        Self {
            yaw_deg,
            pitch_deg,
            roll_deg,
        }
    }

    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0);
}

impl Default for Orientation {
    fn default() -> Self {
        Self::IDENTITY
    }
}
