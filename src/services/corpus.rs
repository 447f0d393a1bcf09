//! Turns a keyword into a corpus of resolved movie records.
//!
//! Search pages are walked sequentially, detail lookups run concurrently under a
//! semaphore. The resulting corpus keeps request order regardless of which lookup
//! finishes first.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::{sync::Semaphore, task::JoinSet};

use crate::{
    error::{AppError, AppResult},
    models::MovieRecord,
    services::providers::MetadataSource,
};

/// Ordered, title-unique collection of resolved records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    records: Vec<MovieRecord>,
    positions: HashMap<String, usize>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a corpus keeping the first record seen for every title
    pub fn from_records(records: impl IntoIterator<Item = MovieRecord>) -> Self {
        let mut corpus = Self::new();
        for record in records {
            corpus.push(record);
        }
        corpus
    }

    /// Appends a record unless its title is already present
    fn push(&mut self, record: MovieRecord) -> bool {
        if self.positions.contains_key(&record.title) {
            tracing::debug!(title = %record.title, "Duplicate title dropped from corpus");
            return false;
        }
        self.positions.insert(record.title.clone(), self.records.len());
        self.records.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    pub fn get(&self, position: usize) -> Option<&MovieRecord> {
        self.records.get(position)
    }

    /// Row of `title` in the corpus and in any index built from it
    pub fn position(&self, title: &str) -> Option<usize> {
        self.positions.get(title).copied()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.positions.contains_key(title)
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.title.as_str())
    }
}

/// Collects unique titles for a keyword from up to `max_pages` search pages
///
/// Paging stops at the first empty page. Credential failures always propagate; a
/// transport failure propagates only when no page has succeeded yet.
pub async fn collect_titles(
    source: &dyn MetadataSource,
    keyword: &str,
    max_pages: u32,
) -> AppResult<Vec<String>> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Err(AppError::InvalidInput(
            "Search keyword cannot be empty".to_string(),
        ));
    }

    let mut titles: Vec<String> = Vec::new();

    for page in 1..=max_pages.max(1) {
        let page_titles = match source.search(keyword, page).await {
            Ok(page_titles) => page_titles,
            Err(e) if e.is_fatal() || page == 1 => return Err(e),
            Err(e) => {
                tracing::warn!(
                    keyword = %keyword,
                    page = page,
                    error = %e,
                    provider = source.name(),
                    "Search page failed, keeping earlier pages"
                );
                break;
            }
        };

        if page_titles.is_empty() {
            break;
        }

        for title in page_titles {
            if !titles.contains(&title) {
                titles.push(title);
            }
        }
    }

    tracing::info!(
        keyword = %keyword,
        titles = titles.len(),
        provider = source.name(),
        "Keyword search completed"
    );

    Ok(titles)
}

/// Resolves every title into a record, skipping titles that fail to resolve
///
/// Returns an empty corpus when nothing resolved. Fails when the source rejects
/// credentials, or when every single lookup failed with a transport error.
pub async fn build_corpus(
    source: Arc<dyn MetadataSource>,
    titles: &[String],
    max_concurrent_requests: usize,
) -> AppResult<Corpus> {
    let semaphore = Arc::new(Semaphore::new(max_concurrent_requests.max(1)));
    let mut lookups = JoinSet::new();

    for (position, title) in titles.iter().cloned().enumerate() {
        let source = Arc::clone(&source);
        let semaphore = Arc::clone(&semaphore);
        lookups.spawn(async move {
            let resolved = match semaphore.acquire_owned().await {
                Ok(_permit) => source.get_details(&title).await,
                Err(e) => Err(AppError::Internal(e.to_string())),
            };
            (position, title, resolved)
        });
    }

    let mut slots: Vec<Option<MovieRecord>> = vec![None; titles.len()];
    let mut failures = 0usize;

    while let Some(joined) = lookups.join_next().await {
        match joined {
            Ok((position, _, Ok(Some(record)))) => slots[position] = Some(record),
            Ok((_, title, Ok(None))) => {
                tracing::debug!(title = %title, "Title not found, skipping");
            }
            Ok((_, title, Err(e))) if e.is_fatal() => {
                tracing::error!(title = %title, error = %e, "Metadata source rejected request");
                return Err(e);
            }
            Ok((_, title, Err(e))) => {
                tracing::warn!(title = %title, error = %e, "Detail lookup failed, skipping");
                failures += 1;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Detail lookup task failed");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        tracing::warn!(
            requested = titles.len(),
            error_count = failures,
            "Partial detail resolution failure"
        );
    }

    if !titles.is_empty() && failures == titles.len() {
        return Err(AppError::SourceUnavailable(
            "Failed to fetch details for any title".to_string(),
        ));
    }

    let corpus = Corpus::from_records(slots.into_iter().flatten());

    tracing::info!(
        requested = titles.len(),
        resolved = corpus.len(),
        provider = source.name(),
        "Corpus built"
    );

    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::MockMetadataSource;
    use std::time::Duration;

    fn titles(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn record(title: &str) -> MovieRecord {
        MovieRecord::new(title, "Drama", format!("{} plot", title))
    }

    /// Source whose detail lookups finish in reverse request order
    struct SlowFirstSource;

    #[async_trait::async_trait]
    impl MetadataSource for SlowFirstSource {
        async fn search(&self, _keyword: &str, _page: u32) -> AppResult<Vec<String>> {
            Ok(Vec::new())
        }

        async fn get_details(&self, title: &str) -> AppResult<Option<MovieRecord>> {
            let delay = match title {
                "First" => 60,
                "Second" => 30,
                _ => 0,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(Some(record(title)))
        }

        fn name(&self) -> &'static str {
            "slow-first"
        }
    }

    #[test]
    fn test_corpus_first_title_wins() {
        let corpus = Corpus::from_records(vec![
            MovieRecord::new("Heat", "Crime", "first"),
            MovieRecord::new("Alien", "Horror", ""),
            MovieRecord::new("Heat", "Crime", "second"),
        ]);

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.position("Heat"), Some(0));
        assert_eq!(corpus.position("Alien"), Some(1));
        assert_eq!(corpus.get(0).unwrap().plot, "first");
        assert!(!corpus.contains("Ran"));
    }

    #[tokio::test]
    async fn test_collect_titles_dedupes_and_stops_on_empty_page() {
        let mut source = MockMetadataSource::new();
        source
            .expect_search()
            .withf(|keyword, page| keyword == "love" && *page == 1)
            .returning(|_, _| Ok(titles(&["Love Actually", "Crazy Love"])));
        source
            .expect_search()
            .withf(|keyword, page| keyword == "love" && *page == 2)
            .returning(|_, _| Ok(titles(&["Crazy Love", "Love Story"])));
        source
            .expect_search()
            .withf(|keyword, page| keyword == "love" && *page == 3)
            .returning(|_, _| Ok(Vec::new()));
        source.expect_name().return_const("mock");

        let collected = collect_titles(&source, " love ", 5).await.unwrap();
        assert_eq!(collected, titles(&["Love Actually", "Crazy Love", "Love Story"]));
    }

    #[tokio::test]
    async fn test_collect_titles_first_page_failure_propagates() {
        let mut source = MockMetadataSource::new();
        source
            .expect_search()
            .returning(|_, _| Err(AppError::SourceUnavailable("timed out".to_string())));
        source.expect_name().return_const("mock");

        let result = collect_titles(&source, "1999", 5).await;
        assert!(matches!(result, Err(AppError::SourceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_collect_titles_later_page_failure_keeps_earlier_pages() {
        let mut source = MockMetadataSource::new();
        source
            .expect_search()
            .withf(|keyword, page| keyword == "1999" && *page == 1)
            .returning(|_, _| Ok(titles(&["The Matrix"])));
        source
            .expect_search()
            .withf(|keyword, page| keyword == "1999" && *page == 2)
            .returning(|_, _| Err(AppError::SourceUnavailable("reset".to_string())));
        source.expect_name().return_const("mock");

        let collected = collect_titles(&source, "1999", 5).await.unwrap();
        assert_eq!(collected, titles(&["The Matrix"]));
    }

    #[tokio::test]
    async fn test_collect_titles_quota_on_later_page_is_fatal() {
        let mut source = MockMetadataSource::new();
        source
            .expect_search()
            .withf(|keyword, page| keyword == "war" && *page == 1)
            .returning(|_, _| Ok(titles(&["War Horse"])));
        source
            .expect_search()
            .withf(|keyword, page| keyword == "war" && *page == 2)
            .returning(|_, _| Err(AppError::Unauthorized("Request limit reached!".to_string())));
        source.expect_name().return_const("mock");

        let result = collect_titles(&source, "war", 5).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_blank_keyword_rejected_before_search() {
        let source = MockMetadataSource::new();
        let result = collect_titles(&source, "  ", 5).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_build_corpus_skips_unresolved_titles_in_order() {
        let mut source = MockMetadataSource::new();
        source.expect_get_details().returning(|title| match title {
            "Missing" => Ok(None),
            "Flaky" => Err(AppError::SourceUnavailable("timed out".to_string())),
            other => Ok(Some(record(other))),
        });
        source.expect_name().return_const("mock");

        let requested = titles(&["Alpha", "Missing", "Beta", "Flaky", "Gamma"]);
        let corpus = build_corpus(Arc::new(source), &requested, 2).await.unwrap();

        let resolved: Vec<&str> = corpus.titles().collect();
        assert_eq!(resolved, vec!["Alpha", "Beta", "Gamma"]);
    }

    #[tokio::test]
    async fn test_build_corpus_empty_input_is_empty_corpus() {
        let mut source = MockMetadataSource::new();
        source.expect_get_details().never();
        source.expect_name().return_const("mock");

        let corpus = build_corpus(Arc::new(source), &[], 4).await.unwrap();
        assert!(corpus.is_empty());
    }

    #[tokio::test]
    async fn test_build_corpus_all_not_found_is_empty_corpus() {
        let mut source = MockMetadataSource::new();
        source.expect_get_details().returning(|_| Ok(None));
        source.expect_name().return_const("mock");

        let corpus = build_corpus(Arc::new(source), &titles(&["A", "B"]), 4)
            .await
            .unwrap();
        assert!(corpus.is_empty());
    }

    #[tokio::test]
    async fn test_build_corpus_all_transport_failures_is_unavailable() {
        let mut source = MockMetadataSource::new();
        source
            .expect_get_details()
            .returning(|_| Err(AppError::SourceUnavailable("connection refused".to_string())));
        source.expect_name().return_const("mock");

        let result = build_corpus(Arc::new(source), &titles(&["A", "B"]), 4).await;
        assert!(matches!(result, Err(AppError::SourceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_build_corpus_unauthorized_aborts() {
        let mut source = MockMetadataSource::new();
        source.expect_get_details().returning(|title| match title {
            "B" => Err(AppError::Unauthorized("Invalid API key!".to_string())),
            other => Ok(Some(record(other))),
        });
        source.expect_name().return_const("mock");

        let result = build_corpus(Arc::new(source), &titles(&["A", "B", "C"]), 1).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_build_corpus_dedupes_resolved_titles() {
        let mut source = MockMetadataSource::new();
        // OMDb resolves both spellings to the same canonical title
        source
            .expect_get_details()
            .returning(|_| Ok(Some(record("The Matrix"))));
        source.expect_name().return_const("mock");

        let corpus = build_corpus(Arc::new(source), &titles(&["Matrix", "The Matrix"]), 2)
            .await
            .unwrap();
        assert_eq!(corpus.len(), 1);
    }

    #[tokio::test]
    async fn test_build_corpus_keeps_request_order_when_lookups_finish_out_of_order() {
        let requested = titles(&["First", "Second", "Third"]);
        let corpus = build_corpus(Arc::new(SlowFirstSource), &requested, 3)
            .await
            .unwrap();

        let resolved: Vec<&str> = corpus.titles().collect();
        assert_eq!(resolved, vec!["First", "Second", "Third"]);
    }
}
