//! Village ring layout engine for the Nuri village view.
//!
//! Places support-network members on concentric rings (one per circle of
//! closeness) so that members on the same ring stay apart and keep their
//! previous angle whenever they can.

mod error;
mod layout;
mod member;
pub mod output;
pub mod wasm;

pub use error::LayoutError;
pub use layout::{
    AngleUpdate, CANDIDATE_COUNT, DEFAULT_RADIUS_STEP, Distribution, FallbackStrategy, LayoutConfig,
    MIN_ANGLE_SEPARATION, Position, RADIAL_TOLERANCE, angular_distance, changed_angles,
    conflict_score, distribute_all, find_optimal_position, is_angle_available, normalize_angle,
    seed_position_angle,
};
pub use member::{
    CONFLICT_RADIUS_PER_SIZE, Category, ContactFrequency, DEFAULT_SIZE_FACTOR, Member, MemberId,
    parse_position_angle,
};
