// Placement of a single new member without touching anyone else.
//
// The ring is cut into evenly spaced candidate angles and the candidate whose
// nearest placed neighbour is farthest away wins (greedy max-min).

use std::f64::consts::TAU;

use log::debug;

use super::{LayoutConfig, Position};
use crate::error::LayoutError;
use crate::member::Member;

/// Best position on `circle` given everything already placed.
///
/// Candidates are scanned in ascending angle order and only a strictly larger
/// minimum distance replaces the current best, so ties go to the lowest angle.
/// With nothing placed yet the answer is angle 0.
pub fn find_optimal_position(
    circle: i64,
    existing: &[Position],
    cfg: &LayoutConfig,
) -> Result<Position, LayoutError> {
    let radius = cfg.base_radius(circle)?;
    if existing.is_empty() {
        return Ok(Position::from_polar(0.0, radius));
    }

    let count = cfg.candidate_count.max(1);
    let mut best_angle = 0.0;
    let mut max_min_distance = 0.0;

    for i in 0..count {
        let angle = i as f64 * TAU / count as f64;
        let candidate = Position::from_polar(angle, radius);

        let min_distance = existing
            .iter()
            .map(|p| candidate.distance_to(p))
            .fold(f64::INFINITY, f64::min);

        if min_distance > max_min_distance {
            max_min_distance = min_distance;
            best_angle = angle;
        }
    }

    debug!(
        "optimal angle {:.4} on circle {} (clearance {:.1} from {} placed)",
        best_angle,
        circle,
        max_min_distance,
        existing.len()
    );
    Ok(Position::from_polar(best_angle, radius))
}

/// Starting position for a member about to be added to `circle`, based on
/// where the current members are stored.
pub fn seed_position_angle(
    circle: i64,
    members: &[Member],
    cfg: &LayoutConfig,
) -> Result<Position, LayoutError> {
    let existing = members
        .iter()
        .map(|m| {
            let radius = cfg
                .base_radius(m.circle)
                .map_err(|_| LayoutError::InvalidCircle { member: Some(m.id), circle: m.circle })?;
            Ok(Position::from_polar(m.current_angle(), radius))
        })
        .collect::<Result<Vec<_>, LayoutError>>()?;

    find_optimal_position(circle, &existing, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::MemberId;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_empty_ring_starts_at_zero() {
        let cfg = LayoutConfig::default();
        let pos = find_optimal_position(1, &[], &cfg).unwrap();
        assert_eq!(pos.angle, 0.0);
        assert_eq!(pos.x, 80.0);
        assert_eq!(pos.y, 0.0);

        let pos = find_optimal_position(3, &[], &cfg).unwrap();
        assert_eq!(pos.x, 240.0);
    }

    #[test]
    fn test_opposite_of_single_neighbour() {
        let cfg = LayoutConfig::default();
        let existing = vec![Position { x: 80.0, y: 0.0, angle: 0.0 }];
        let pos = find_optimal_position(1, &existing, &cfg).unwrap();
        assert!((pos.angle - PI).abs() < EPS);
        assert!((pos.x + 80.0).abs() < EPS);
        assert!(pos.y.abs() < EPS);
    }

    #[test]
    fn test_avoids_neighbour_on_other_ring() {
        let cfg = LayoutConfig::default();
        let existing = vec![Position::from_polar(FRAC_PI_2, 80.0)];
        let pos = find_optimal_position(2, &existing, &cfg).unwrap();
        assert!((pos.angle - 3.0 * FRAC_PI_2).abs() < EPS);
        assert!((pos.radius() - 160.0).abs() < EPS);
    }

    #[test]
    fn test_existing_positions_untouched() {
        let cfg = LayoutConfig::default();
        let existing = vec![Position::from_polar(1.0, 80.0), Position::from_polar(2.0, 160.0)];
        let before = existing.clone();
        find_optimal_position(1, &existing, &cfg).unwrap();
        assert_eq!(existing, before);
    }

    #[test]
    fn test_invalid_circle() {
        let cfg = LayoutConfig::default();
        assert_eq!(
            find_optimal_position(0, &[], &cfg),
            Err(LayoutError::InvalidCircle { member: None, circle: 0 })
        );
    }

    #[test]
    fn test_seed_uses_stored_angles() {
        let cfg = LayoutConfig::default();
        let members = vec![Member::new(1, "Oma", 1).with_angle(FRAC_PI_2)];
        let pos = seed_position_angle(1, &members, &cfg).unwrap();
        assert!((pos.angle - 3.0 * FRAC_PI_2).abs() < EPS);

        // Missing angles count as 0
        let members = vec![Member::new(1, "Oma", 1)];
        let pos = seed_position_angle(1, &members, &cfg).unwrap();
        assert!((pos.angle - PI).abs() < EPS);
    }

    #[test]
    fn test_seed_reports_bad_member() {
        let cfg = LayoutConfig::default();
        let members = vec![Member::new(4, "Kapot", -1)];
        assert_eq!(
            seed_position_angle(1, &members, &cfg),
            Err(LayoutError::InvalidCircle { member: Some(MemberId(4)), circle: -1 })
        );
    }
}
