use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single normalized news item, as persisted by the News Store.
///
/// See spec §3 for the field invariants: `title`/`link` are non-empty after
/// trimming, `link` is the uniqueness key, and `published_at`/`fetched_at`
/// are always UTC.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsItem {
    pub id: Uuid,
    pub title: String,
    pub category: Option<String>,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub link: String,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub fetched_at: DateTime<Utc>,
}

/// Default and maximum page sizes for `ListNews`, used by the Query Service
/// Facade (§4.D) to normalize caller-supplied limits before they reach the
/// store.
pub const DEFAULT_LIST_LIMIT: i32 = 20;
pub const MAX_LIST_LIMIT: i32 = 100;

#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub limit: i32,
    pub page_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<NewsItem>,
    pub next_page_token: String,
}
