use std::time::Duration;

use news_domain::NewsItem;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clients::interceptors::{with_outbound_logging, OutboundContext};
use crate::error::UpstreamKind;

/// Wire shape for a news item: `published_at`/`fetched_at` cross the wire
/// as Unix seconds (§4.E, §6), not chrono's RFC3339 default.
#[derive(Debug, Clone, Deserialize)]
struct WireNewsItem {
    id: Uuid,
    title: String,
    category: Option<String>,
    short_description: Option<String>,
    long_description: Option<String>,
    link: String,
    image_url: Option<String>,
    #[serde(with = "news_domain::wire::unix_seconds")]
    published_at: chrono::DateTime<chrono::Utc>,
    #[serde(with = "news_domain::wire::unix_seconds")]
    fetched_at: chrono::DateTime<chrono::Utc>,
}

impl From<WireNewsItem> for NewsItem {
    fn from(item: WireNewsItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            category: item.category,
            short_description: item.short_description,
            long_description: item.long_description,
            link: item.link,
            image_url: item.image_url,
            published_at: item.published_at,
            fetched_at: item.fetched_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WirePage {
    items: Vec<WireNewsItem>,
    next_page_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsPage {
    pub items: Vec<NewsItem>,
    pub next_page_token: String,
}

impl From<WirePage> for NewsPage {
    fn from(page: WirePage) -> Self {
        Self {
            items: page.items.into_iter().map(NewsItem::from).collect(),
            next_page_token: page.next_page_token,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireError {
    code: String,
    #[allow(dead_code)]
    message: String,
}

/// Thin HTTP/JSON client over news-ingest's RPC surface (§4.C3d): a
/// `reqwest::Client` built once and reused, one method per remote
/// operation.
#[derive(Clone)]
pub struct NewsClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl NewsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()
            .expect("failed to build news client");
        Self { client, base_url: base_url.into(), timeout }
    }

    pub async fn list_news(
        &self,
        ctx: &OutboundContext,
        limit: i32,
        page_token: &str,
    ) -> Result<NewsPage, UpstreamKind> {
        with_outbound_logging("news.list_news", || async {
            let url = format!("{}/v1/news", self.base_url);
            let builder = self
                .client
                .get(url)
                .query(&[("limit", limit.to_string()), ("page_token", page_token.to_string())])
                .timeout(ctx.remaining(self.timeout));
            let response = ctx.apply(builder).send().await.map_err(reqwest_err_to_kind)?;
            decode::<WirePage>(response).await.map(NewsPage::from)
        })
        .await
    }

    pub async fn news_by_id(&self, ctx: &OutboundContext, id: &str) -> Result<NewsItem, UpstreamKind> {
        with_outbound_logging("news.get_news", || async {
            let url = format!("{}/v1/news/{}", self.base_url, id);
            let builder = self.client.get(url).timeout(ctx.remaining(self.timeout));
            let response = ctx.apply(builder).send().await.map_err(reqwest_err_to_kind)?;
            decode::<WireNewsItem>(response).await.map(NewsItem::from)
        })
        .await
    }
}

/// A timed-out outbound call is reported as `DeadlineExceeded`, not
/// `Unavailable` — the two are distinguishable upstream kinds (§4.C3c) and
/// only the former matches a caller's own deadline having elapsed.
fn reqwest_err_to_kind(err: reqwest::Error) -> UpstreamKind {
    if err.is_timeout() {
        UpstreamKind::DeadlineExceeded
    } else {
        UpstreamKind::Unavailable
    }
}

async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T, UpstreamKind> {
    let status = response.status();
    if status.is_success() {
        return response.json().await.map_err(|_| UpstreamKind::Internal);
    }
    let kind = match response.json::<WireError>().await {
        Ok(body) => match body.code.as_str() {
            "invalid_argument" => UpstreamKind::InvalidArgument,
            "not_found" => UpstreamKind::NotFound,
            _ => UpstreamKind::Internal,
        },
        Err(_) => status_to_kind(status),
    };
    Err(kind)
}

fn status_to_kind(status: StatusCode) -> UpstreamKind {
    match status {
        StatusCode::BAD_REQUEST => UpstreamKind::InvalidArgument,
        StatusCode::NOT_FOUND => UpstreamKind::NotFound,
        StatusCode::SERVICE_UNAVAILABLE => UpstreamKind::Unavailable,
        StatusCode::GATEWAY_TIMEOUT => UpstreamKind::DeadlineExceeded,
        _ => UpstreamKind::Internal,
    }
}
