use std::sync::Arc;

use chrono::Utc;
use news_domain::ListOptions;
use news_ingest::ingest::finalizer::finalize;
use news_ingest::store::{MemoryNewsStore, NewsStore};

/// S1 (partial, parsing half): confirms the finalizer stamps fetched_at and
/// substitutes now() for a missing published_at, given items shaped the way
/// the feed parser would hand them off.
#[tokio::test]
async fn s1_missing_published_at_is_substituted_with_ingest_time() {
    let now = Utc::now();
    let item = news_ingest::feed::ParsedItem {
        title: "B".to_string(),
        link: "https://example.org/guid".to_string(),
        category: None,
        short_description: None,
        long_description: None,
        image_url: None,
        published_at: None,
    };

    let finalized = finalize(item, now).unwrap();
    assert_eq!(finalized.published_at, now);
    assert_eq!(finalized.fetched_at, now);
    assert_eq!(finalized.link, "https://example.org/guid");
}

/// S2: second save with a shorter long_description never regresses the
/// first save's longer text, and title is always replaced.
#[tokio::test]
async fn s2_no_regression_merge_end_to_end() {
    let store = MemoryNewsStore::default();
    let link = "https://example.org/article";
    let now = Utc::now();

    let mut v1 = news_ingest::feed::ParsedItem {
        title: "v1".to_string(),
        link: link.to_string(),
        category: None,
        short_description: None,
        long_description: Some("this is a very long original text".to_string()),
        image_url: None,
        published_at: Some(now),
    };
    let first = finalize(v1.clone(), now).unwrap();
    store.save_news(&[first.clone()]).await.unwrap();

    v1.title = "v2".to_string();
    v1.long_description = Some("shorter".to_string());
    let mut second = finalize(v1, now).unwrap();
    second.id = first.id;
    store.save_news(&[second]).await.unwrap();

    let got = store.news_by_id(&first.id.to_string()).await.unwrap();
    assert_eq!(got.title, "v2");
    assert_eq!(got.long_description.as_deref(), Some("this is a very long original text"));
}

/// S3: three items with identical published_at page cleanly across two
/// `List` calls with no duplicates and no omissions.
#[tokio::test]
async fn s3_pagination_over_identical_timestamps() {
    let store = MemoryNewsStore::default();
    let now = Utc::now();

    let mut batch = Vec::new();
    for i in 0..3 {
        let item = news_ingest::feed::ParsedItem {
            title: format!("item {i}"),
            link: format!("https://example.org/{i}"),
            category: None,
            short_description: None,
            long_description: None,
            image_url: None,
            published_at: Some(now),
        };
        batch.push(finalize(item, now).unwrap());
    }
    store.save_news(&batch).await.unwrap();

    let store: Arc<dyn NewsStore> = Arc::new(store);
    let first_page = store
        .list_news(ListOptions { limit: 2, page_token: String::new() })
        .await
        .unwrap();
    assert_eq!(first_page.items.len(), 2);
    assert!(!first_page.next_page_token.is_empty());

    let second_page = store
        .list_news(ListOptions { limit: 2, page_token: first_page.next_page_token })
        .await
        .unwrap();
    assert_eq!(second_page.items.len(), 1);
    assert!(second_page.next_page_token.is_empty());

    let mut ids: Vec<_> = first_page.items.iter().map(|i| i.id).collect();
    ids.extend(second_page.items.iter().map(|i| i.id));
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}
