//! Fixed-width RFC 3339 timestamps.
//!
//! Server-assigned timestamps are written as `YYYY-MM-DDTHH:MM:SS.ffffffZ`.
//! With a constant width, the lexical order of the stored strings equals
//! their chronological order, which both record stores rely on when sorting
//! by a timestamp field.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Formats `ts` in the fixed-width representation.
#[must_use]
pub fn format(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Serde `serialize_with` for `DateTime<Utc>`.
///
/// # Errors
///
/// Propagates serializer errors.
pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(ts))
}

/// Serde `deserialize_with` for `DateTime<Utc>`. Accepts any RFC 3339 input.
///
/// # Errors
///
/// Fails when the input is not an RFC 3339 string.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(serde::de::Error::custom)
}

/// Same as the parent module, for `Option<DateTime<Utc>>`.
pub mod option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serde `serialize_with` for optional timestamps.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(
        ts: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match ts {
            Some(ts) => super::serialize(ts, serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Serde `deserialize_with` for optional timestamps.
    ///
    /// # Errors
    ///
    /// Fails when a present value is not an RFC 3339 string.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| {
                DateTime::parse_from_rfc3339(&raw)
                    .map(|ts| ts.with_timezone(&Utc))
                    .map_err(serde::de::Error::custom)
            })
            .transpose()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn width_is_constant() {
        let whole = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single();
        let Some(whole) = whole else {
            panic!("valid date");
        };
        let fractional = whole + chrono::Duration::nanoseconds(123_456_789);
        assert_eq!(format(&whole), "2024-05-01T12:00:00.000000Z");
        assert_eq!(format(&fractional), "2024-05-01T12:00:00.123456Z");
    }

    #[test]
    fn lexical_order_is_chronological() {
        let earlier = Utc::now();
        let later = earlier + chrono::Duration::milliseconds(1500);
        assert!(format(&earlier) < format(&later));
    }
}
