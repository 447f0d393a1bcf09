use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    config::FetchSettings,
    error::{AppError, AppResult},
    models::MovieRecord,
    services::{
        corpus::{build_corpus, collect_titles, Corpus},
        providers::MetadataSource,
        recommender::{self, Surprise, TitlePicker},
        similarity::SimilarityIndex,
    },
};

/// A corpus and the index built from it, always replaced together
#[derive(Debug, Clone)]
pub struct Catalog {
    pub keyword: String,
    pub corpus: Corpus,
    pub index: SimilarityIndex,
    pub loaded_at: DateTime<Utc>,
}

/// Outcome of a successful fetch
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FetchSummary {
    pub keyword: String,
    pub loaded: usize,
    pub titles: Vec<String>,
    pub loaded_at: DateTime<Utc>,
}

/// State for one interactive user run
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    catalog: Option<Catalog>,
    favorites: Vec<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            catalog: None,
            favorites: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    /// Searches `keyword`, resolves the matches and swaps in a fresh catalog
    ///
    /// Any failure leaves the previous catalog untouched.
    pub async fn fetch(
        &mut self,
        source: Arc<dyn MetadataSource>,
        keyword: &str,
        settings: &FetchSettings,
    ) -> AppResult<FetchSummary> {
        let titles = collect_titles(source.as_ref(), keyword, settings.max_pages).await?;
        if titles.is_empty() {
            return Err(AppError::EmptyResult(
                "No movies found for that keyword.".to_string(),
            ));
        }

        let corpus = build_corpus(source, &titles, settings.max_concurrent_requests).await?;
        let index = SimilarityIndex::build(&corpus).ok_or_else(|| {
            AppError::EmptyResult("Could not build dataset. Try another keyword.".to_string())
        })?;

        let catalog = Catalog {
            keyword: keyword.trim().to_string(),
            corpus,
            index,
            loaded_at: Utc::now(),
        };

        let summary = FetchSummary {
            keyword: catalog.keyword.clone(),
            loaded: catalog.corpus.len(),
            titles: catalog.corpus.titles().map(str::to_string).collect(),
            loaded_at: catalog.loaded_at,
        };

        tracing::info!(
            session_id = %self.id,
            keyword = %summary.keyword,
            loaded = summary.loaded,
            "Catalog replaced"
        );

        self.catalog = Some(catalog);
        Ok(summary)
    }

    /// Titles of the current catalog, empty before the first fetch
    pub fn titles(&self) -> Vec<String> {
        self.catalog
            .as_ref()
            .map(|c| c.corpus.titles().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn recommend(&self, title: &str, top_n: usize) -> AppResult<Vec<MovieRecord>> {
        let catalog = self.catalog.as_ref().ok_or(AppError::NoData)?;
        Ok(recommender::recommend(
            title,
            &catalog.corpus,
            &catalog.index,
            top_n,
        ))
    }

    pub fn surprise(&self, picker: &mut dyn TitlePicker, top_n: usize) -> AppResult<Surprise> {
        let catalog = self.catalog.as_ref().ok_or(AppError::NoData)?;
        recommender::surprise(&catalog.corpus, &catalog.index, picker, top_n)
    }

    pub fn add_favorite(&mut self, title: impl Into<String>) {
        self.favorites.push(title.into());
    }

    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }
}
