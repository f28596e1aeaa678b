//! 3D position/velocity vector.
//!
//! [`Vector3`] is the wire representation of a position, velocity, or
//! angular rate. It is `f64`-precision (matching the source simulation) and
//! serializes as a named `{x, y, z}` struct rather than a tuple, so the
//! field names survive across both the binary and textual encodings.
//!
//! Absence of a position is modeled by wrapping the type in `Option`, never
//! by a zero vector — a zero vector is a real value at the origin.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A position, velocity, or angular-rate vector in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    /// The zero vector. Distinct from "no position" — callers that mean
    /// "unknown" must use `Option<Vector3>`, not this constant.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn to_dvec3(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    #[must_use]
    pub fn from_dvec3(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    /// Euclidean distance to `other`, ignoring the vertical (`z`) axis.
    ///
    /// Interest-tier ranges in this system are horizontal-plane distances;
    /// altitude separation alone never pushes an entity to a weaker tier.
    #[must_use]
    pub fn horizontal_distance(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Full 3D Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.to_dvec3().distance(other.to_dvec3())
    }

    /// Angle of this vector around the vertical axis, normalized to
    /// `[0, 2*PI)`. Used by the arc-chunk spatial index.
    #[must_use]
    pub fn horizontal_angle(self) -> f64 {
        let angle = self.y.atan2(self.x);
        if angle < 0.0 {
            angle + std::f64::consts::TAU
        } else {
            angle
        }
    }
}

impl Default for Vector3 {
    fn default() -> Self {
        Self::ZERO
    }
}
