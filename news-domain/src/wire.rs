//! Wire-format helpers for RPC transports that need a different
//! representation than the domain types' own `Serialize`/`Deserialize`
//! (e.g. timestamps as Unix seconds rather than chrono's RFC3339 default).

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// `#[serde(with = "news_domain::wire::unix_seconds")]` on a `DateTime<Utc>`
/// field transports it as an integer count of seconds since the epoch.
pub mod unix_seconds {
    use super::*;

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        value.timestamp().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let secs = i64::deserialize(deserializer)?;
        Utc.timestamp_opt(secs, 0)
            .single()
            .ok_or_else(|| serde::de::Error::custom("timestamp out of range"))
    }
}
