//! Serde helpers for session-relative timestamps written as seconds.
//!
//! Timing providers publish offsets from session start as fractional seconds.
//! These helpers map them onto [`Duration`] and refuse negative or non-finite
//! values at deserialization time.

use serde::{Deserialize, Deserializer, Serializer, de::Error as _};
use std::time::Duration;

/// Convert fractional seconds to a [`Duration`], refusing negative or non-finite input.
pub fn duration_from_secs(secs: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(secs).ok()
}

/// `#[serde(with = "session_time")]` for a required timestamp.
pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(value.as_secs_f64())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    duration_from_secs(secs).ok_or_else(|| {
        D::Error::custom(format!("invalid session time {secs}: expected non-negative seconds"))
    })
}

/// `#[serde(with = "session_time::option")]` for a timestamp that may be absent.
pub mod option {
    use super::duration_from_secs;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};
    use std::time::Duration;

    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(duration) => serializer.serialize_some(&duration.as_secs_f64()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<f64>::deserialize(deserializer)? {
            Some(secs) => duration_from_secs(secs).map(Some).ok_or_else(|| {
                D::Error::custom(format!(
                    "invalid session time {secs}: expected non-negative seconds"
                ))
            }),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Stamp {
        #[serde(with = "super")]
        at: Duration,
        #[serde(default, with = "super::option")]
        maybe: Option<Duration>,
    }

    #[test]
    fn parses_fractional_seconds() {
        let stamp: Stamp = serde_yaml_ng::from_str("at: 12.5\nmaybe: 3").unwrap();
        assert_eq!(stamp.at, Duration::from_millis(12_500));
        assert_eq!(stamp.maybe, Some(Duration::from_secs(3)));
    }

    #[test]
    fn absent_optional_is_none() {
        let stamp: Stamp = serde_yaml_ng::from_str("at: 1.0").unwrap();
        assert_eq!(stamp.maybe, None);

        let stamp: Stamp = serde_yaml_ng::from_str("at: 1.0\nmaybe: ~").unwrap();
        assert_eq!(stamp.maybe, None);
    }

    #[test]
    fn rejects_negative_times() {
        assert!(serde_yaml_ng::from_str::<Stamp>("at: -1.0").is_err());
        assert!(serde_yaml_ng::from_str::<Stamp>("at: 1.0\nmaybe: -0.5").is_err());
    }

    #[test]
    fn rejects_non_finite_times() {
        assert!(duration_from_secs(f64::NAN).is_none());
        assert!(duration_from_secs(f64::INFINITY).is_none());
        assert!(serde_yaml_ng::from_str::<Stamp>("at: .nan").is_err());
    }

    #[test]
    fn serializes_as_seconds() {
        let stamp = Stamp { at: Duration::from_millis(1500), maybe: None };
        let yaml = serde_yaml_ng::to_string(&stamp).unwrap();
        assert!(yaml.contains("at: 1.5"), "unexpected yaml: {yaml}");
    }
}
