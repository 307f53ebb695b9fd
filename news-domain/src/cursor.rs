use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;

/// `(published_at, id)` pair encoding the last item seen in a page, per
/// §4.C2. Reversible, opaque, URL-safe base64 (no padding) over the ASCII
/// string `"<unix_nano>|<id>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub published_at: DateTime<Utc>,
    pub id: Uuid,
}

impl PageCursor {
    pub fn new(published_at: DateTime<Utc>, id: Uuid) -> Self {
        Self { published_at, id }
    }

    pub fn encode(&self) -> String {
        let nanos = self
            .published_at
            .timestamp_nanos_opt()
            .unwrap_or(self.published_at.timestamp() * 1_000_000_000);
        let raw = format!("{}|{}", nanos, self.id);
        URL_SAFE_NO_PAD.encode(raw.as_bytes())
    }

    pub fn decode(token: &str) -> Result<Self, DomainError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.as_bytes())
            .map_err(|_| DomainError::InvalidCursor)?;
        let raw = String::from_utf8(bytes).map_err(|_| DomainError::InvalidCursor)?;

        let (nanos_str, id_str) = raw.split_once('|').ok_or(DomainError::InvalidCursor)?;
        let nanos: i64 = nanos_str.parse().map_err(|_| DomainError::InvalidCursor)?;
        let id = Uuid::parse_str(id_str).map_err(|_| DomainError::InvalidCursor)?;

        let published_at = DateTime::from_timestamp_nanos(nanos);

        Ok(Self { published_at, id })
    }
}
