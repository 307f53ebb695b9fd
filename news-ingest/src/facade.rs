use std::sync::Arc;

use news_domain::types::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use news_domain::{DomainError, ListOptions, NewsItem, Page};

use crate::store::NewsStore;

/// §4.D Query Service Facade: a thin layer over the store that normalizes
/// `ListOptions.limit` and translates storage errors into domain errors.
pub struct QueryFacade {
    store: Arc<dyn NewsStore>,
}

impl QueryFacade {
    pub fn new(store: Arc<dyn NewsStore>) -> Self {
        Self { store }
    }

    pub async fn list_news(&self, mut opts: ListOptions) -> Result<Page, DomainError> {
        opts.limit = normalize_limit(opts.limit);
        self.store.list_news(opts).await.map_err(Into::into)
    }

    pub async fn news_by_id(&self, id: &str) -> Result<NewsItem, DomainError> {
        self.store.news_by_id(id).await.map_err(Into::into)
    }
}

fn normalize_limit(limit: i32) -> i32 {
    if limit <= 0 {
        DEFAULT_LIST_LIMIT
    } else if limit > MAX_LIST_LIMIT {
        MAX_LIST_LIMIT
    } else {
        limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryNewsStore;

    #[tokio::test]
    async fn clamps_non_positive_limit_to_default() {
        let facade = QueryFacade::new(Arc::new(MemoryNewsStore::default()));
        let page = facade
            .list_news(ListOptions { limit: 0, page_token: String::new() })
            .await
            .unwrap();
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn translates_invalid_cursor() {
        let facade = QueryFacade::new(Arc::new(MemoryNewsStore::default()));
        let err = facade
            .list_news(ListOptions { limit: 10, page_token: "not valid!!".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidCursor));
    }

    #[tokio::test]
    async fn translates_not_found() {
        let facade = QueryFacade::new(Arc::new(MemoryNewsStore::default()));
        let err = facade.news_by_id("bogus").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound));
    }
}
