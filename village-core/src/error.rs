use thiserror::Error;

use crate::member::MemberId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Circles are 1-based; 0 or negative would collapse or invert the ring.
    #[error("invalid circle {circle}{}", member_suffix(.member))]
    InvalidCircle { member: Option<MemberId>, circle: i64 },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

fn member_suffix(member: &Option<MemberId>) -> String {
    member.map(|id| format!(" for member {id}")).unwrap_or_default()
}

impl LayoutError {
    /// Stable machine-readable tag for the JSON error payload.
    pub fn kind(&self) -> &'static str {
        match self {
            LayoutError::InvalidCircle { .. } => "invalid_circle",
            LayoutError::InvalidInput(_) => "invalid_input",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LayoutError::InvalidCircle { member: Some(MemberId(4)), circle: 0 };
        assert_eq!(err.to_string(), "invalid circle 0 for member 4");
        assert_eq!(err.kind(), "invalid_circle");

        let err = LayoutError::InvalidCircle { member: None, circle: -2 };
        assert_eq!(err.to_string(), "invalid circle -2");
    }
}
