// Angle-bucketed index of placed members.
//
// Availability only cares about members within the angular threshold, so
// instead of scanning everything placed so far we bucket positions by angle.
// A bucket is at least as wide as the threshold, which means every possible
// collision lives in the query bucket or one of its two neighbours.

use std::collections::HashMap;
use std::f64::consts::TAU;

use super::{Position, normalize_angle};

/// Upper bound on buckets; more buys nothing at village scale.
const MAX_BUCKETS: usize = 360;

#[derive(Debug, Clone)]
pub struct AngleIndex {
    bucket_count: usize,
    buckets: HashMap<usize, Vec<Position>>,
    placed: Vec<Position>,
}

impl AngleIndex {
    /// `threshold` is the widest angular gap a query will ask about.
    pub fn new(threshold: f64) -> Self {
        let bucket_count = if threshold.is_finite() && threshold > 0.0 {
            ((TAU / threshold).floor() as usize).clamp(1, MAX_BUCKETS)
        } else {
            1
        };
        Self {
            bucket_count,
            buckets: HashMap::new(),
            placed: Vec::new(),
        }
    }

    fn bucket_of(&self, angle: f64) -> usize {
        let b = (normalize_angle(angle) / TAU * self.bucket_count as f64) as usize;
        b.min(self.bucket_count - 1)
    }

    pub fn insert(&mut self, pos: Position) {
        let bucket = self.bucket_of(pos.angle);
        self.buckets.entry(bucket).or_default().push(pos);
        self.placed.push(pos);
    }

    /// Positions that might lie within the threshold of `angle`.
    /// May include false positives; callers do the exact check.
    pub fn near(&self, angle: f64) -> impl Iterator<Item = &Position> {
        let n = self.bucket_count;
        let center = self.bucket_of(angle);
        let mut cells = vec![(center + n - 1) % n, center, (center + 1) % n];
        cells.sort_unstable();
        cells.dedup();

        cells
            .into_iter()
            .filter_map(|cell| self.buckets.get(&cell))
            .flatten()
    }

    /// Everything placed so far, in insertion order.
    pub fn all(&self) -> &[Position] {
        &self.placed
    }

    pub fn len(&self) -> usize {
        self.placed.len()
    }
}
