use chrono::{DateTime, Utc};
use news_domain::NewsItem;
use uuid::Uuid;

use crate::feed::ParsedItem;

/// The pure domain function enforcing `NewsItem` invariants (§3) and
/// stamping `fetched_at`, applied by the orchestrator to every parsed item
/// before it is batched for storage (§4.C1b).
///
/// Returns `None` when the item must be dropped (empty title/link after
/// trimming).
pub fn finalize(item: ParsedItem, now: DateTime<Utc>) -> Option<NewsItem> {
    let title = item.title.trim().to_string();
    let link = item.link.trim().to_string();
    if title.is_empty() || link.is_empty() {
        return None;
    }

    let short_description = item.short_description.filter(|s| !s.trim().is_empty());
    let long_description = item
        .long_description
        .filter(|l| !l.trim().is_empty())
        .or_else(|| short_description.clone());

    let published_at = item.published_at.unwrap_or(now).with_timezone(&Utc);

    Some(NewsItem {
        id: Uuid::new_v4(),
        title,
        category: item.category.filter(|c| !c.trim().is_empty()),
        short_description,
        long_description,
        link,
        image_url: item.image_url.filter(|i| !i.trim().is_empty()),
        published_at,
        fetched_at: now,
    })
}
