//! Village member records as the layout engine sees them.
//!
//! These mirror the rows the frontend fetches from the village API. Only the
//! fields that influence placement are modelled; everything else on the row is
//! ignored during deserialization.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Member identifier (serial id from the database).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub i64);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of support a member provides.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Informeel,
    Formeel,
    Inspiratie,
}

/// How often the family is in contact with a member.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactFrequency {
    S,
    M,
    L,
    XL,
}

/// Base size of a member without a contact frequency.
pub const DEFAULT_SIZE_FACTOR: f64 = 0.5;

/// Units of clearance per unit of size factor.
pub const CONFLICT_RADIUS_PER_SIZE: f64 = 30.0;

impl ContactFrequency {
    /// Relative footprint of a member with this contact frequency.
    pub fn size_factor(self) -> f64 {
        match self {
            ContactFrequency::S => 0.5,
            ContactFrequency::M => 0.875,
            ContactFrequency::L => 1.25,
            ContactFrequency::XL => 1.75,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    #[serde(default)]
    pub name: String,
    /// Ring tier, 1 = closest. Signed so that bad rows can be reported.
    pub circle: i64,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub contact_frequency: Option<ContactFrequency>,
    /// Stored angle in radians. Absent or unparseable values read as `None`.
    #[serde(default, deserialize_with = "deserialize_position_angle")]
    pub position_angle: Option<f64>,
}

impl Member {
    pub fn new(id: i64, name: impl Into<String>, circle: i64) -> Self {
        Self {
            id: MemberId(id),
            name: name.into(),
            circle,
            category: None,
            contact_frequency: None,
            position_angle: None,
        }
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.position_angle = Some(angle);
        self
    }

    pub fn with_frequency(mut self, frequency: ContactFrequency) -> Self {
        self.contact_frequency = Some(frequency);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Stored angle, or 0 when none is stored.
    pub fn current_angle(&self) -> f64 {
        self.position_angle.unwrap_or(0.0)
    }

    pub fn size_factor(&self) -> f64 {
        self.contact_frequency
            .map(ContactFrequency::size_factor)
            .unwrap_or(DEFAULT_SIZE_FACTOR)
    }

    /// Minimum Euclidean clearance this member wants from its neighbours.
    pub fn conflict_radius(&self) -> f64 {
        self.size_factor() * CONFLICT_RADIUS_PER_SIZE
    }
}

/// Parse a stored angle the way the API hands it out (as text).
/// Returns `None` for empty, malformed or non-finite input.
pub fn parse_position_angle(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|angle| angle.is_finite())
}

fn deserialize_position_angle<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    #[allow(dead_code)]
    enum RawAngle {
        Number(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    let angle = match Option::<RawAngle>::deserialize(deserializer)? {
        Some(RawAngle::Number(angle)) if angle.is_finite() => Some(angle),
        Some(RawAngle::Text(raw)) => parse_position_angle(&raw),
        _ => None,
    };
    Ok(angle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_position_angle() {
        assert_eq!(parse_position_angle("1.5"), Some(1.5));
        assert_eq!(parse_position_angle(" 0.25 "), Some(0.25));
        assert_eq!(parse_position_angle(""), None);
        assert_eq!(parse_position_angle("north"), None);
        assert_eq!(parse_position_angle("NaN"), None);
    }

    #[test]
    fn test_member_from_api_row() {
        let json = r#"{
            "id": 7,
            "userId": 3,
            "name": "Oma",
            "circle": 1,
            "category": "informeel",
            "contactFrequency": "XL",
            "positionAngle": "2.5"
        }"#;
        let member: Member = serde_json::from_str(json).unwrap();
        assert_eq!(member.id, MemberId(7));
        assert_eq!(member.category, Some(Category::Informeel));
        assert_eq!(member.contact_frequency, Some(ContactFrequency::XL));
        assert_eq!(member.position_angle, Some(2.5));
        assert_eq!(member.conflict_radius(), 52.5);
    }

    #[test]
    fn test_missing_or_malformed_angle_reads_as_none() {
        let missing: Member = serde_json::from_str(r#"{"id":1,"circle":2}"#).unwrap();
        assert_eq!(missing.position_angle, None);
        assert_eq!(missing.current_angle(), 0.0);

        let null: Member =
            serde_json::from_str(r#"{"id":1,"circle":2,"positionAngle":null}"#).unwrap();
        assert_eq!(null.position_angle, None);

        let garbage: Member =
            serde_json::from_str(r#"{"id":1,"circle":2,"positionAngle":"abc"}"#).unwrap();
        assert_eq!(garbage.position_angle, None);

        let wrong_type: Member =
            serde_json::from_str(r#"{"id":1,"circle":2,"positionAngle":true}"#).unwrap();
        assert_eq!(wrong_type.position_angle, None);

        let number: Member =
            serde_json::from_str(r#"{"id":1,"circle":2,"positionAngle":0.5}"#).unwrap();
        assert_eq!(number.position_angle, Some(0.5));
    }

    #[test]
    fn test_size_factor_defaults_to_small() {
        let member = Member::new(1, "Buurvrouw", 3);
        assert_eq!(member.size_factor(), DEFAULT_SIZE_FACTOR);
        let member = member.with_frequency(ContactFrequency::L);
        assert_eq!(member.size_factor(), 1.25);
    }
}
