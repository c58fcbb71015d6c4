// Village ring layout.
//
// Members sit on concentric rings around the family, one ring per circle
// (1 = innermost). This module places them on their ring:
// - Deterministic: no randomness, circles processed in ascending order
// - Stable: a member keeps its stored angle while nothing else claims it
// - Separated: members that have to move take the first free evenly spaced slot
//
// Submodules:
// - angle_index: bucketed lookup of already placed positions
// - distribution: full re-layout of every ring
// - optimal: single placement for a newly added member

use std::collections::HashMap;
use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::member::{Member, MemberId};

mod angle_index;
mod distribution;
mod optimal;

pub use distribution::{conflict_score, distribute_all, is_angle_available};
pub use optimal::{find_optimal_position, seed_position_angle};

/// Distance between two neighbouring rings.
pub const DEFAULT_RADIUS_STEP: f64 = 80.0;
/// Two members closer than this (in radians) on the same ring collide. 10 degrees.
pub const MIN_ANGLE_SEPARATION: f64 = TAU / 36.0;
/// Members whose radii differ by this much or more never collide.
pub const RADIAL_TOLERANCE: f64 = 40.0;
/// Number of evenly spaced candidates tried for a new member.
pub const CANDIDATE_COUNT: usize = 36;

/// What to do with a member whose stored angle is already taken.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackStrategy {
    /// Move to the member's evenly spaced slot, or the next free one.
    #[default]
    Target,
    /// Search around the slot for the angle with the least overlap.
    LeastConflict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Ring radius per circle index.
    pub radius_step: f64,
    /// Angular collision threshold in radians.
    pub min_angle_separation: f64,
    /// Radial collision threshold in layout units.
    pub radial_tolerance: f64,
    /// Candidate angles scanned by `find_optimal_position`.
    pub candidate_count: usize,
    pub fallback: FallbackStrategy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            radius_step: DEFAULT_RADIUS_STEP,
            min_angle_separation: MIN_ANGLE_SEPARATION,
            radial_tolerance: RADIAL_TOLERANCE,
            candidate_count: CANDIDATE_COUNT,
            fallback: FallbackStrategy::Target,
        }
    }
}

impl LayoutConfig {
    /// Rejects a ring spacing that would collapse or invert the rings.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !(self.radius_step.is_finite() && self.radius_step > 0.0) {
            return Err(LayoutError::InvalidInput(format!(
                "radius_step must be positive and finite, got {}",
                self.radius_step
            )));
        }
        Ok(())
    }

    /// Radius of the ring for `circle`. Rejects circles below 1.
    pub fn base_radius(&self, circle: i64) -> Result<f64, LayoutError> {
        self.validate()?;
        if circle < 1 {
            return Err(LayoutError::InvalidCircle { member: None, circle });
        }
        Ok(self.radius_step * circle as f64)
    }
}

/// Offset from the family at the centre, plus the angle that produced it.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
}

impl Position {
    pub fn from_polar(angle: f64, radius: f64) -> Self {
        Self {
            x: angle.cos() * radius,
            y: angle.sin() * radius,
            angle,
        }
    }

    /// Distance from the centre.
    pub fn radius(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Map any angle into [0, 2π).
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU { 0.0 } else { a }
}

/// Shortest angular distance between two angles, in [0, π].
/// Symmetric in its arguments, bit for bit.
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let d = (normalize_angle(a) - normalize_angle(b)).abs();
    d.min(TAU - d)
}

/// Result of a full distribution pass.
pub type Distribution = HashMap<MemberId, Position>;

/// A stored angle that no longer matches the computed layout.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AngleUpdate {
    pub id: MemberId,
    pub position_angle: f64,
}

/// Members whose stored angle should be written back after a distribution.
/// Members without a stored angle are always included. Keeps input order.
pub fn changed_angles(members: &[Member], positions: &Distribution, epsilon: f64) -> Vec<AngleUpdate> {
    members
        .iter()
        .filter_map(|m| {
            let pos = positions.get(&m.id)?;
            let moved = match m.position_angle {
                Some(stored) => (stored - pos.angle).abs() > epsilon,
                None => true,
            };
            moved.then_some(AngleUpdate { id: m.id, position_angle: pos.angle })
        })
        .collect()
}
