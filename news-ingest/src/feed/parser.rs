use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use feed_rs::model::Entry;
use regex::Regex;
use reqwest::Client;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

/// One URL's worth of accepted, finalizer-ready items (or the reason the
/// URL failed), per §4.C1a's `ParseResult = { url, items?, error? }`.
#[derive(Debug)]
pub struct ParseResult {
    pub url: String,
    pub outcome: std::result::Result<Vec<ParsedItem>, String>,
}

/// A single `<item>` after trimming, canonicalization, and image selection,
/// but with `published_at` left `None` when upstream omitted/mis-formatted
/// it and `fetched_at` left entirely unset — the orchestrator's finalizer
/// (§4.C1b) owns stamping those.
#[derive(Debug, Clone)]
pub struct ParsedItem {
    pub title: String,
    pub link: String,
    pub category: Option<String>,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub image_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

const DEFAULT_CONCURRENCY: usize = 6;

pub struct FeedParser {
    client: Client,
    concurrency: usize,
}

impl FeedParser {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// `ParseMany`: fetch and decode every URL, at most `concurrency` in
    /// flight, honoring `cancel`. Returns the receiving half of a channel
    /// that yields one `ParseResult` per input URL, in arrival order
    /// (unspecified relative to input order, per spec), then closes.
    pub fn parse_many(
        &self,
        cancel: CancellationToken,
        urls: Vec<String>,
    ) -> mpsc::UnboundedReceiver<ParseResult> {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = self.client.clone();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        tokio::spawn(async move {
            let mut handles = Vec::with_capacity(urls.len());

            for url in urls {
                if cancel.is_cancelled() {
                    break;
                }

                let permit = {
                    let semaphore = semaphore.clone();
                    let cancel = cancel.clone();
                    tokio::select! {
                        permit = semaphore.acquire_owned() => permit.ok(),
                        _ = cancel.cancelled() => None,
                    }
                };

                let Some(permit) = permit else {
                    break;
                };

                let client = client.clone();
                let tx = tx.clone();
                let cancel = cancel.clone();

                let handle = tokio::spawn(async move {
                    let _permit = permit;
                    let result = tokio::select! {
                        result = fetch_and_parse(&client, &url) => result,
                        _ = cancel.cancelled() => Err("canceled".to_string()),
                    };

                    let outcome = match result {
                        Ok(items) => Ok(items),
                        Err(err) => Err(err),
                    };

                    let _ = tx.send(ParseResult { url, outcome });
                });

                handles.push(handle);
            }

            for handle in handles {
                let _ = handle.await;
            }
        });

        rx
    }
}

async fn fetch_and_parse(client: &Client, url: &str) -> std::result::Result<Vec<ParsedItem>, String> {
    let response = client.get(url).send().await.map_err(|e| e.to_string())?;

    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status()));
    }

    let body = response.bytes().await.map_err(|e| e.to_string())?;

    let raw_dates = raw_entry_dates(&String::from_utf8_lossy(&body));

    let feed = feed_rs::parser::parse(&body[..]).map_err(|e| format!("parse error: {e}"))?;

    let mut items = Vec::with_capacity(feed.entries.len());
    for (i, entry) in feed.entries.into_iter().enumerate() {
        let raw_date = raw_dates.get(i).and_then(|d| d.as_deref());
        if let Some(item) = parse_entry(entry, raw_date) {
            items.push(item);
        }
    }

    Ok(items)
}

/// Pulls each `<item>`/`<entry>` block's raw date text (`pubDate`,
/// `published`, `updated`, or `dc:date`) straight out of the feed body, in
/// document order, so `parse_date`'s fallback chain can run on the
/// original string — `feed-rs` parses dates itself and does not expose the
/// text it started from.
fn raw_entry_dates(body: &str) -> Vec<Option<String>> {
    static ENTRY_BOUNDARY: &str = r"(?is)<(?:item|entry)\b[^>]*>(.*?)</(?:item|entry)>";
    static DATE_TAG: &str = r"(?is)<(?:pubDate|published|updated|dc:date)[^>]*>\s*(.*?)\s*</(?:pubDate|published|updated|dc:date)>";

    let entry_re = Regex::new(ENTRY_BOUNDARY).expect("static regex");
    let date_re = Regex::new(DATE_TAG).expect("static regex");

    entry_re
        .captures_iter(body)
        .map(|entry_match| {
            let block = entry_match.get(1).map(|m| m.as_str()).unwrap_or("");
            date_re
                .captures(block)
                .and_then(|date_match| date_match.get(1))
                .map(|m| m.as_str().trim().to_string())
        })
        .collect()
}

fn parse_entry(entry: Entry, raw_date: Option<&str>) -> Option<ParsedItem> {
    let raw_title = entry
        .title
        .as_ref()
        .map(|t| t.content.clone())
        .unwrap_or_default();
    let title = raw_title.trim().to_string();

    let raw_link = entry.links.first().map(|l| l.href.clone()).unwrap_or_default();
    let link = canonicalize(raw_link.trim(), entry.id.trim());

    if title.is_empty() || link.is_empty() {
        debug!("dropping entry with empty title or link: title={:?} link={:?}", title, link);
        return None;
    }

    let category = entry
        .categories
        .first()
        .map(|c| c.term.trim().to_string())
        .filter(|c| !c.is_empty());

    let short_description = entry.summary.as_ref().map(|s| s.content.trim().to_string());
    let long_description = entry.content.as_ref().and_then(|c| c.body.as_ref()).map(|b| b.trim().to_string());

    let image_url = pick_image(&entry, long_description.as_deref(), short_description.as_deref());

    // The spec's own fallback chain runs on the raw text first; `feed-rs`'s
    // parsed value only covers formats that chain doesn't (e.g. loose ISO
    // 8601 variants), so it's a fallback, not the primary source.
    let published_at = raw_date
        .and_then(|raw| parse_date(raw).ok())
        .or_else(|| entry.published.map(|dt| dt.with_timezone(&Utc)));

    Some(ParsedItem {
        title,
        link,
        category,
        short_description,
        long_description,
        image_url,
        published_at,
    })
}

/// §4.C1a `canonicalize(rawLink, guid)`.
pub fn canonicalize(raw_link: &str, guid: &str) -> String {
    let candidate = if raw_link.is_empty() && (guid.starts_with("http://") || guid.starts_with("https://")) {
        guid
    } else {
        raw_link
    };

    let Ok(mut url) = Url::parse(candidate) else {
        return candidate.to_string();
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        return candidate.to_string();
    }

    url.set_fragment(None);

    let filtered: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !is_tracking_param(k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if filtered.is_empty() {
        url.set_query(None);
    } else {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in &filtered {
            serializer.append_pair(k, v);
        }
        url.set_query(Some(&serializer.finish()));
    }

    url.to_string()
}

fn is_tracking_param(key: &str) -> bool {
    let lower = key.to_lowercase();
    lower.starts_with("utm_") || lower.starts_with("mc_") || lower.ends_with("clid") || lower == "igshid"
}

/// §4.C1a `pickImage(item)`. `feed-rs` folds RSS `<enclosure>` and Media RSS
/// `media:content` into the same `entry.media` collection without
/// preserving which element produced them, so priorities 1 and 2 below are
/// necessarily merged into one pass over that collection; `media:thumbnail`
/// is still distinguishable via `MediaThumbnail`. See DESIGN.md.
fn pick_image(entry: &Entry, long_description: Option<&str>, short_description: Option<&str>) -> Option<String> {
    let mut best: Option<(Option<u64>, String)> = None;
    for media in &entry.media {
        for content in &media.content {
            let is_image = content
                .content_type
                .as_ref()
                .map(|m| m.type_() == "image")
                .unwrap_or(true);
            if !is_image {
                continue;
            }
            let Some(url) = content.url.as_ref() else { continue };
            let size = content.size;
            best = Some(match best {
                None => (size, url.to_string()),
                Some((best_size, _)) if size.unwrap_or(0) >= best_size.unwrap_or(0) => (size, url.to_string()),
                Some(prev) => prev,
            });
        }
    }
    if let Some((_, url)) = best {
        return Some(url);
    }

    for media in &entry.media {
        for thumb in &media.thumbnails {
            if !thumb.image.uri.is_empty() {
                return Some(thumb.image.uri.clone());
            }
        }
    }

    if let Some(content) = long_description.and_then(first_img_src) {
        return Some(content);
    }
    if let Some(content) = short_description.and_then(first_img_src) {
        return Some(content);
    }

    None
}

fn first_img_src(html: &str) -> Option<String> {
    static PATTERN: &str = r#"<img[^>]+src=["']([^"']+)["']"#;
    let re = Regex::new(PATTERN).ok()?;
    re.captures(html).and_then(|c| c.get(1)).map(|m| m.as_str().to_string())
}

/// §4.C1a `parseDate`: try, in order, RFC1123Z, RFC1123, their 2-digit-year
/// variants, RFC822Z, RFC822, RFC3339, and `Mon, 02 Jan 2006 15:04:05 MST`.
/// Returns UTC. Run against the raw date text `raw_entry_dates` pulls out
/// of the feed body, since `feed-rs` itself only exposes already-parsed
/// values and not the source string.
pub fn parse_date(input: &str) -> std::result::Result<DateTime<Utc>, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("empty date".to_string());
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    const FORMATS: &[&str] = &[
        "%a, %d %b %Y %H:%M:%S %z",
        "%a, %d %b %y %H:%M:%S %z",
        "%a, %d %b %Y %H:%M:%S %Z",
        "%a, %d %b %y %H:%M:%S %Z",
        "%a %b %e %H:%M:%S %Y",
    ];

    for fmt in FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
        }
    }

    Err(format!("unrecognized date format: {trimmed}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_strips_tracking_params_and_fragment() {
        let got = canonicalize("https://h/p?utm_source=x&a=1#f", "");
        assert_eq!(got, "https://h/p?a=1");
    }

    #[test]
    fn canonicalize_passes_through_non_http_schemes() {
        let got = canonicalize("mailto:foo@bar.com", "");
        assert_eq!(got, "mailto:foo@bar.com");
    }

    #[test]
    fn canonicalize_falls_back_to_http_guid_when_link_blank() {
        let got = canonicalize("", "https://example.org/guid");
        assert_eq!(got, "https://example.org/guid");
    }

    #[test]
    fn canonicalize_ignores_non_http_guid_when_link_blank() {
        let got = canonicalize("", "urn:uuid:not-a-url");
        assert_eq!(got, "");
    }

    #[test]
    fn parse_date_handles_rfc1123z() {
        let dt = parse_date("Tue, 16 Sep 2025 12:00:00 +0300").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-09-16T09:00:00+00:00");
    }

    #[test]
    fn raw_entry_dates_extracts_pubdate_per_item_in_order() {
        let body = r#"
            <rss><channel>
                <item><pubDate>Tue, 16 Sep 2025 12:00:00 +0300</pubDate></item>
                <item><title>no date here</title></item>
                <item><pubDate>Wed, 17 Sep 2025 01:00:00 +0000</pubDate></item>
            </channel></rss>
        "#;
        let dates = raw_entry_dates(body);
        assert_eq!(dates, vec![
            Some("Tue, 16 Sep 2025 12:00:00 +0300".to_string()),
            None,
            Some("Wed, 17 Sep 2025 01:00:00 +0000".to_string()),
        ]);
    }

    #[test]
    fn parse_date_rejects_empty_input() {
        assert_eq!(parse_date("").unwrap_err(), "empty date");
    }
}
