//! Output types for the React village view.
//!
//! These structs are serialized to JSON and handed to the frontend, which
//! draws the rings and writes changed angles back through the village API.
//! The `*_json` functions are the whole JSON boundary; the wasm exports only
//! wrap them.

use serde::Serialize;

use crate::error::LayoutError;
use crate::layout::{
    AngleUpdate, LayoutConfig, Position, changed_angles, distribute_all, find_optimal_position,
    seed_position_angle,
};
use crate::member::{Member, MemberId};

/// Angles closer than this to the stored value are not reported as changed.
pub const ANGLE_EPSILON: f64 = 1e-9;

/// A placed member
#[derive(Debug, Clone, Serialize)]
pub struct PositionOutput {
    pub id: MemberId,
    pub x: f64,
    pub y: f64,
    pub angle: f64,
}

/// Error information for the frontend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorInfo {
    pub kind: String,
    pub message: String,
}

impl From<&LayoutError> for ErrorInfo {
    fn from(err: &LayoutError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Result of a full distribution, positions in input order
#[derive(Debug, Clone, Default, Serialize)]
pub struct DistributionOutput {
    pub positions: Vec<PositionOutput>,
    /// Members whose stored angle should be persisted
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub updates: Vec<AngleUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

/// Result of placing a single new member
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlacementOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl DistributionOutput {
    fn failed(err: &LayoutError) -> Self {
        Self { error: Some(err.into()), ..Self::default() }
    }
}

impl PlacementOutput {
    fn from_result(result: Result<Position, LayoutError>) -> Self {
        match result {
            Ok(position) => Self { position: Some(position), error: None },
            Err(err) => Self { position: None, error: Some((&err).into()) },
        }
    }
}

/// Empty or blank input means the default config.
pub fn parse_config(config_json: &str) -> Result<LayoutConfig, LayoutError> {
    if config_json.trim().is_empty() {
        return Ok(LayoutConfig::default());
    }
    let cfg: LayoutConfig = serde_json::from_str(config_json)
        .map_err(|e| LayoutError::InvalidInput(format!("config: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

fn parse_members(members_json: &str) -> Result<Vec<Member>, LayoutError> {
    serde_json::from_str(members_json)
        .map_err(|e| LayoutError::InvalidInput(format!("members: {e}")))
}

fn parse_positions(positions_json: &str) -> Result<Vec<Position>, LayoutError> {
    serde_json::from_str(positions_json)
        .map_err(|e| LayoutError::InvalidInput(format!("positions: {e}")))
}

pub fn distribute_json(members_json: &str, config_json: &str) -> DistributionOutput {
    let run = || -> Result<DistributionOutput, LayoutError> {
        let cfg = parse_config(config_json)?;
        let members = parse_members(members_json)?;
        let layout = distribute_all(&members, &cfg)?;

        let positions = members
            .iter()
            .filter_map(|m| {
                let p = layout.get(&m.id)?;
                Some(PositionOutput { id: m.id, x: p.x, y: p.y, angle: p.angle })
            })
            .collect();
        let updates = changed_angles(&members, &layout, ANGLE_EPSILON);

        Ok(DistributionOutput { positions, updates, error: None })
    };

    run().unwrap_or_else(|err| DistributionOutput::failed(&err))
}

pub fn optimal_json(circle: i64, positions_json: &str, config_json: &str) -> PlacementOutput {
    let result = parse_config(config_json).and_then(|cfg| {
        let existing = parse_positions(positions_json)?;
        find_optimal_position(circle, &existing, &cfg)
    });
    PlacementOutput::from_result(result)
}

pub fn seed_json(circle: i64, members_json: &str, config_json: &str) -> PlacementOutput {
    let result = parse_config(config_json).and_then(|cfg| {
        let members = parse_members(members_json)?;
        seed_position_angle(circle, &members, &cfg)
    });
    PlacementOutput::from_result(result)
}
