use serde::{Deserialize, Serialize};

/// Placeholder OMDb uses for fields it has no value for
pub const OMDB_MISSING: &str = "N/A";

/// One resolved movie title with the metadata used for similarity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRecord {
    pub title: String,
    /// Comma separated genre list, empty when unknown
    pub genre: String,
    /// Short plot synopsis, empty when unknown
    pub plot: String,
    pub poster_url: Option<String>,
    pub year: Option<String>,
}

impl MovieRecord {
    pub fn new(title: impl Into<String>, genre: impl Into<String>, plot: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            genre: genre.into(),
            plot: plot.into(),
            poster_url: None,
            year: None,
        }
    }

    pub fn with_poster(mut self, poster_url: impl Into<String>) -> Self {
        self.poster_url = present(Some(poster_url.into()));
        self
    }

    /// Text the similarity index is built from: genre and plot joined by one space
    pub fn feature_text(&self) -> String {
        format!("{} {}", self.genre, self.plot)
    }
}

/// Drops OMDb's "N/A" marker and blank strings
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| {
        let v = v.trim();
        !v.is_empty() && v != OMDB_MISSING
    })
}

// ============================================================================
// OMDb API Types
// ============================================================================

/// Response from `?s=<keyword>`
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchResponse {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Search", default)]
    pub search: Vec<OmdbSearchItem>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl OmdbSearchResponse {
    pub fn is_success(&self) -> bool {
        self.response.eq_ignore_ascii_case("true")
    }
}

/// One hit in a search page
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchItem {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: Option<String>,
    #[serde(rename = "imdbID", default)]
    pub imdb_id: Option<String>,
}

/// Response from `?t=<title>`
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbMovieDetails {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Year", default)]
    pub year: Option<String>,
    #[serde(rename = "Genre", default)]
    pub genre: Option<String>,
    #[serde(rename = "Plot", default)]
    pub plot: Option<String>,
    #[serde(rename = "Poster", default)]
    pub poster: Option<String>,
}

impl OmdbMovieDetails {
    pub fn is_success(&self) -> bool {
        self.response.eq_ignore_ascii_case("true")
    }

    /// Converts a successful lookup into a record; `None` when OMDb reported no match
    pub fn into_record(self) -> Option<MovieRecord> {
        if !self.is_success() {
            return None;
        }

        let title = present(self.title)?;

        Some(MovieRecord {
            title,
            genre: present(self.genre).unwrap_or_default(),
            plot: present(self.plot).unwrap_or_default(),
            poster_url: present(self.poster),
            year: present(self.year),
        })
    }
}
