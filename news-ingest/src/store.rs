use async_trait::async_trait;
use news_domain::{types::DEFAULT_LIST_LIMIT, ListOptions, NewsItem, Page, PageCursor};
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::error::{AggregatorError, Result};

/// §4.C1c News Store contract: idempotent upsert-by-link with the
/// no-regression merge policy, keyset pagination, and point lookup.
#[async_trait]
pub trait NewsStore: Send + Sync {
    async fn save_news(&self, batch: &[NewsItem]) -> Result<()>;
    async fn list_news(&self, opts: ListOptions) -> Result<Page>;
    async fn news_by_id(&self, id: &str) -> Result<NewsItem>;
}

pub struct PgNewsStore {
    pool: PgPool,
}

impl PgNewsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await.map_err(|e| {
            AggregatorError::General(format!("migration failed: {e}"))
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl NewsStore for PgNewsStore {
    /// One `INSERT ... ON CONFLICT (link) DO UPDATE` per row, each column
    /// expressed as a `CASE`/`COALESCE` so the merge happens inside a
    /// single statement and can't race with a concurrent reader (§9's
    /// "merge policy as pure SQL" design note).
    async fn save_news(&self, batch: &[NewsItem]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for item in batch {
            sqlx::query(
                r#"
                INSERT INTO news (id, title, category, short_description, long_description, link, image_url, published_at, fetched_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ON CONFLICT (link) DO UPDATE SET
                    title = EXCLUDED.title,
                    category = CASE WHEN EXCLUDED.category IS NOT NULL AND EXCLUDED.category != '' THEN EXCLUDED.category ELSE news.category END,
                    short_description = CASE WHEN EXCLUDED.short_description IS NOT NULL AND EXCLUDED.short_description != '' THEN EXCLUDED.short_description ELSE news.short_description END,
                    long_description = CASE
                        WHEN EXCLUDED.long_description IS NOT NULL AND EXCLUDED.long_description != ''
                             AND length(EXCLUDED.long_description) >= COALESCE(length(news.long_description), 0)
                        THEN EXCLUDED.long_description
                        ELSE news.long_description
                    END,
                    image_url = CASE WHEN EXCLUDED.image_url IS NOT NULL AND EXCLUDED.image_url != '' THEN EXCLUDED.image_url ELSE news.image_url END,
                    fetched_at = EXCLUDED.fetched_at
                "#,
            )
            .bind(item.id)
            .bind(&item.title)
            .bind(&item.category)
            .bind(&item.short_description)
            .bind(&item.long_description)
            .bind(&item.link)
            .bind(&item.image_url)
            .bind(item.published_at)
            .bind(item.fetched_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!("saved batch of {} news items", batch.len());
        Ok(())
    }

    async fn list_news(&self, opts: ListOptions) -> Result<Page> {
        let limit = if opts.limit <= 0 { 1 } else { opts.limit } as i64;

        let cursor = if opts.page_token.is_empty() {
            None
        } else {
            Some(PageCursor::decode(&opts.page_token).map_err(|_| AggregatorError::InvalidCursor)?)
        };

        let rows = match cursor {
            Some(c) => {
                sqlx::query(
                    r#"
                    SELECT id, title, category, short_description, long_description, link, image_url, published_at, fetched_at
                    FROM news
                    WHERE (published_at, id) < ($1, $2)
                    ORDER BY published_at DESC, id DESC
                    LIMIT $3
                    "#,
                )
                .bind(c.published_at)
                .bind(c.id)
                .bind(limit + 1)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, title, category, short_description, long_description, link, image_url, published_at, fetched_at
                    FROM news
                    ORDER BY published_at DESC, id DESC
                    LIMIT $1
                    "#,
                )
                .bind(limit + 1)
                .fetch_all(&self.pool)
                .await?
            }
        };

        let mut items: Vec<NewsItem> = rows.iter().map(row_to_item).collect();

        let next_page_token = if items.len() > limit as usize {
            items.truncate(limit as usize);
            let last = items.last().expect("limit > 0 guarantees a last element");
            PageCursor::new(last.published_at, last.id).encode()
        } else {
            String::new()
        };

        Ok(Page { items, next_page_token })
    }

    async fn news_by_id(&self, id: &str) -> Result<NewsItem> {
        let Ok(uuid) = Uuid::parse_str(id) else {
            return Err(AggregatorError::NotFound);
        };

        let row = sqlx::query(
            r#"
            SELECT id, title, category, short_description, long_description, link, image_url, published_at, fetched_at
            FROM news WHERE id = $1
            "#,
        )
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_item).ok_or(AggregatorError::NotFound)
    }
}

fn row_to_item(row: &sqlx::postgres::PgRow) -> NewsItem {
    NewsItem {
        id: row.get("id"),
        title: row.get("title"),
        category: row.get("category"),
        short_description: row.get("short_description"),
        long_description: row.get("long_description"),
        link: row.get("link"),
        image_url: row.get("image_url"),
        published_at: row.get("published_at"),
        fetched_at: row.get("fetched_at"),
    }
}

/// In-memory fake used to exercise the merge policy and keyset pagination
/// without a live Postgres instance.
pub struct MemoryNewsStore {
    items: tokio::sync::RwLock<std::collections::HashMap<String, NewsItem>>,
}

impl Default for MemoryNewsStore {
    fn default() -> Self {
        Self {
            items: tokio::sync::RwLock::new(std::collections::HashMap::new()),
        }
    }
}

#[async_trait]
impl NewsStore for MemoryNewsStore {
    async fn save_news(&self, batch: &[NewsItem]) -> Result<()> {
        let mut items = self.items.write().await;
        for incoming in batch {
            match items.get(&incoming.link).cloned() {
                None => {
                    items.insert(incoming.link.clone(), incoming.clone());
                }
                Some(existing) => {
                    let merged = merge(&existing, incoming);
                    items.insert(incoming.link.clone(), merged);
                }
            }
        }
        Ok(())
    }

    async fn list_news(&self, opts: ListOptions) -> Result<Page> {
        let limit = if opts.limit <= 0 { 1 } else { opts.limit } as usize;
        let cursor = if opts.page_token.is_empty() {
            None
        } else {
            Some(PageCursor::decode(&opts.page_token).map_err(|_| AggregatorError::InvalidCursor)?)
        };

        let items = self.items.read().await;
        let mut all: Vec<NewsItem> = items.values().cloned().collect();
        all.sort_by(|a, b| (b.published_at, b.id).cmp(&(a.published_at, a.id)));

        let filtered: Vec<NewsItem> = match cursor {
            Some(c) => all
                .into_iter()
                .filter(|i| (i.published_at, i.id) < (c.published_at, c.id))
                .collect(),
            None => all,
        };

        let mut page: Vec<NewsItem> = filtered.into_iter().take(limit + 1).collect();
        let next_page_token = if page.len() > limit {
            page.truncate(limit);
            let last = page.last().expect("limit > 0 guarantees a last element");
            PageCursor::new(last.published_at, last.id).encode()
        } else {
            String::new()
        };

        Ok(Page { items: page, next_page_token })
    }

    async fn news_by_id(&self, id: &str) -> Result<NewsItem> {
        let Ok(uuid) = Uuid::parse_str(id) else {
            return Err(AggregatorError::NotFound);
        };
        let items = self.items.read().await;
        items.values().find(|i| i.id == uuid).cloned().ok_or(AggregatorError::NotFound)
    }
}

fn merge(existing: &NewsItem, incoming: &NewsItem) -> NewsItem {
    let category = non_empty_or(incoming.category.clone(), existing.category.clone());
    let short_description = non_empty_or(incoming.short_description.clone(), existing.short_description.clone());

    let long_description = match (&incoming.long_description, &existing.long_description) {
        (Some(new), _) if !new.trim().is_empty() => {
            let existing_len = existing.long_description.as_deref().map(str::len).unwrap_or(0);
            if new.len() >= existing_len {
                Some(new.clone())
            } else {
                existing.long_description.clone()
            }
        }
        _ => existing.long_description.clone(),
    };

    let image_url = non_empty_or(incoming.image_url.clone(), existing.image_url.clone());

    NewsItem {
        id: existing.id,
        title: incoming.title.clone(),
        category,
        short_description,
        long_description,
        link: existing.link.clone(),
        image_url,
        published_at: existing.published_at,
        fetched_at: incoming.fetched_at,
    }
}

fn non_empty_or(new: Option<String>, existing: Option<String>) -> Option<String> {
    match new {
        Some(v) if !v.trim().is_empty() => Some(v),
        _ => existing,
    }
}

pub fn default_limit() -> i32 {
    DEFAULT_LIST_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn item(link: &str, title: &str, long: &str, published_at: chrono::DateTime<Utc>) -> NewsItem {
        NewsItem {
            id: Uuid::new_v4(),
            title: title.to_string(),
            category: None,
            short_description: None,
            long_description: Some(long.to_string()),
            link: link.to_string(),
            image_url: None,
            published_at,
            fetched_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn no_regression_merge_keeps_longer_description_and_never_overwrites_published_at() {
        let store = MemoryNewsStore::default();
        let published = Utc::now();
        let first = item("https://x/a", "v1", "this is a very long original text", published);
        store.save_news(&[first.clone()]).await.unwrap();

        let mut second = item("https://x/a", "v2", "shorter", published + Duration::seconds(5));
        second.id = first.id;
        store.save_news(&[second]).await.unwrap();

        let got = store.news_by_id(&first.id.to_string()).await.unwrap();
        assert_eq!(got.title, "v2");
        assert_eq!(got.long_description.as_deref(), Some("this is a very long original text"));
        assert_eq!(got.published_at, published);
    }

    #[tokio::test]
    async fn save_is_idempotent() {
        let store = MemoryNewsStore::default();
        let published = Utc::now();
        let first = item("https://x/a", "v1", "same", published);
        store.save_news(&[first.clone()]).await.unwrap();
        store.save_news(&[first.clone()]).await.unwrap();

        let page = store.list_news(ListOptions { limit: 10, page_token: String::new() }).await.unwrap();
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn pagination_visits_every_item_exactly_once_and_terminates() {
        let store = MemoryNewsStore::default();
        let now = Utc::now();
        let items: Vec<NewsItem> = (0..3)
            .map(|i| item(&format!("https://x/{i}"), "t", "d", now))
            .collect();
        store.save_news(&items).await.unwrap();

        let mut seen = std::collections::HashSet::new();
        let mut token = String::new();
        loop {
            let page = store
                .list_news(ListOptions { limit: 2, page_token: token.clone() })
                .await
                .unwrap();
            for it in &page.items {
                assert!(seen.insert(it.id), "item visited twice");
            }
            if page.next_page_token.is_empty() {
                break;
            }
            token = page.next_page_token;
        }

        assert_eq!(seen.len(), 3);
    }

    #[tokio::test]
    async fn news_by_id_not_found_for_malformed_id() {
        let store = MemoryNewsStore::default();
        let err = store.news_by_id("not-a-uuid").await.unwrap_err();
        assert!(matches!(err, AggregatorError::NotFound));
    }
}
