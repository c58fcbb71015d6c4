// Full distribution of every member onto its ring.
//
// Circles are laid out one after another in ascending order, but they share a
// single set of placed positions so a member can never land on top of anyone
// placed earlier in the same pass. Within a ring members are visited in order
// of their stored angle; each keeps that angle when it is free and otherwise
// moves to the first free angle the fallback strategy finds. A ring too
// crowded for that is spaced evenly from scratch.

use std::collections::BTreeMap;
use std::f64::consts::{PI, TAU};

use log::{debug, trace, warn};

use super::angle_index::AngleIndex;
use super::{Distribution, FallbackStrategy, LayoutConfig, Position, angular_distance, normalize_angle};
use crate::error::LayoutError;
use crate::member::Member;

/// Compute a position for every member.
///
/// Each input member gets exactly one entry in the result. The input slice is
/// left untouched; callers persist the returned angles if they want the layout
/// to survive a reload. Feeding the returned angles back in yields the same
/// layout.
///
/// # Errors
/// Returns [`LayoutError::InvalidCircle`] for the first member whose circle is
/// below 1, and [`LayoutError::InvalidInput`] for an unusable `radius_step`.
/// Nothing is placed in either case.
pub fn distribute_all(members: &[Member], cfg: &LayoutConfig) -> Result<Distribution, LayoutError> {
    if let Some(bad) = members.iter().find(|m| m.circle < 1) {
        warn!("rejecting distribution: member {} has circle {}", bad.id, bad.circle);
        return Err(LayoutError::InvalidCircle { member: Some(bad.id), circle: bad.circle });
    }

    let mut by_circle: BTreeMap<i64, Vec<&Member>> = BTreeMap::new();
    for member in members {
        by_circle.entry(member.circle).or_default().push(member);
    }

    let mut placed = AngleIndex::new(cfg.min_angle_separation);
    let mut positions = Distribution::with_capacity(members.len());

    for (circle, mut ring) in by_circle {
        let radius = cfg.base_radius(circle)?;
        let step = TAU / ring.len().max(1) as f64;

        // Stable sort: members sharing an angle keep their input order
        ring.sort_by(|a, b| a.current_angle().total_cmp(&b.current_angle()));

        let angles = place_ring(circle, &ring, radius, step, &placed, cfg).unwrap_or_else(|| {
            debug!("circle {}: no free angle left, spacing {} members evenly", circle, ring.len());
            (0..ring.len()).map(|i| i as f64 * step).collect()
        });

        for (member, angle) in ring.iter().zip(angles) {
            let pos = Position::from_polar(angle, radius);
            placed.insert(pos);
            positions.insert(member.id, pos);
        }
    }

    debug!("distributed {} members, {} placed", members.len(), placed.len());
    Ok(positions)
}

/// Angles for one sorted ring, or `None` when some member has nowhere free
/// to go. `placed` holds the rings laid out before this one.
fn place_ring(
    circle: i64,
    ring: &[&Member],
    radius: f64,
    step: f64,
    placed: &AngleIndex,
    cfg: &LayoutConfig,
) -> Option<Vec<f64>> {
    let n = ring.len();
    let mut ring_placed = AngleIndex::new(cfg.min_angle_separation);
    let mut angles = Vec::with_capacity(n);

    for (i, member) in ring.iter().enumerate() {
        let target = i as f64 * step;
        let current = member.current_angle();
        let is_free = |angle: f64| {
            available_in_index(angle, radius, placed, cfg)
                && available_in_index(angle, radius, &ring_placed, cfg)
        };

        let angle = if is_free(current) {
            current
        } else {
            match cfg.fallback {
                FallbackStrategy::Target => next_free_slot(i, n, step, cfg, &is_free)?,
                FallbackStrategy::LeastConflict => {
                    let neighbours = [placed.all(), ring_placed.all()];
                    least_conflict_angle(target, radius, &neighbours, member, cfg, &is_free)?
                }
            }
        };
        trace!(
            "member {} circle {}: current {:.4} target {:.4} -> {:.4}",
            member.id, circle, current, target, angle
        );

        ring_placed.insert(Position::from_polar(angle, radius));
        angles.push(angle);
    }
    Some(angles)
}

/// The member's own slot, then the ring's other slots in order, then a scan
/// in half-threshold steps from the slot. First free angle wins.
fn next_free_slot(
    i: usize,
    n: usize,
    step: f64,
    cfg: &LayoutConfig,
    is_free: &impl Fn(f64) -> bool,
) -> Option<f64> {
    let target = i as f64 * step;
    let half = cfg.min_angle_separation / 2.0;
    let fine_steps = if half.is_finite() && half > 0.0 { (TAU / half).floor() as usize } else { 0 };

    (0..n)
        .map(|k| ((i + k) % n) as f64 * step)
        .chain((1..=fine_steps).map(|k| normalize_angle(target + k as f64 * half)))
        .find(|&angle| is_free(angle))
}

fn collides(angle: f64, radius: f64, other: &Position, cfg: &LayoutConfig) -> bool {
    angular_distance(angle, other.angle) < cfg.min_angle_separation
        && (radius - other.radius()).abs() < cfg.radial_tolerance
}

/// True when no placed position is within both the angular and the radial
/// threshold of (`angle`, `radius`).
pub fn is_angle_available(angle: f64, radius: f64, placed: &[Position], cfg: &LayoutConfig) -> bool {
    !placed.iter().any(|p| collides(angle, radius, p, cfg))
}

fn available_in_index(angle: f64, radius: f64, placed: &AngleIndex, cfg: &LayoutConfig) -> bool {
    !placed.near(angle).any(|p| collides(angle, radius, p, cfg))
}

/// How badly `member` would overlap its neighbours at `angle` on a ring of
/// `radius`. Each neighbour inside the member's clearance adds its relative
/// intrusion, so 0 means no overlap at all.
pub fn conflict_score(angle: f64, radius: f64, placed: &[Position], member: &Member) -> f64 {
    let candidate = Position::from_polar(angle, radius);
    let min_dist = member.conflict_radius();

    placed
        .iter()
        .map(|p| candidate.distance_to(p))
        .filter(|&d| d < min_dist)
        .map(|d| (min_dist - d) / min_dist)
        .sum()
}

/// Scan half-threshold steps across a full turn centred on `target` and keep
/// the first free angle with the lowest conflict score.
fn least_conflict_angle(
    target: f64,
    radius: f64,
    neighbours: &[&[Position]],
    member: &Member,
    cfg: &LayoutConfig,
    is_free: &impl Fn(f64) -> bool,
) -> Option<f64> {
    let step = cfg.min_angle_separation / 2.0;
    if !(step.is_finite() && step > 0.0) {
        return is_free(target).then_some(target);
    }

    let steps = (TAU / step).floor() as usize;
    let mut best = None;
    let mut min_conflict = f64::INFINITY;

    for k in 0..=steps {
        let test = normalize_angle(target + (-PI + k as f64 * step));
        if !is_free(test) {
            continue;
        }
        let conflict: f64 = neighbours
            .iter()
            .map(|placed| conflict_score(test, radius, placed, member))
            .sum();
        if conflict < min_conflict {
            min_conflict = conflict;
            best = Some(test);
        }
    }
    best
}
