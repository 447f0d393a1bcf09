/// OMDb (Open Movie Database) provider
///
/// Both operations hit the same endpoint with different query parameters:
/// 1. Search: `?s=<keyword>&type=movie&page=<n>` → up to 10 titles per page
/// 2. Details: `?t=<title>` → genre, plot and poster for one title
///
/// OMDb reports most failures as HTTP 200 with `"Response": "False"` and an
/// `Error` message, so credential problems have to be recognised from the text.
use crate::{
    error::{AppError, AppResult},
    models::{MovieRecord, OmdbMovieDetails, OmdbSearchResponse},
    services::providers::MetadataSource,
};
use reqwest::{Client as HttpClient, Response, StatusCode};
use std::time::Duration;

const PROVIDER_NAME: &str = "omdb";

#[derive(Clone)]
pub struct OmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl OmdbProvider {
    /// Creates a provider whose every request is bounded by `timeout`
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
        })
    }

    /// Returns the body of a successful response, classifying HTTP-level failures
    async fn read_body(&self, response: Response) -> AppResult<String> {
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v["Error"].as_str().map(str::to_string))
                .unwrap_or_else(|| status.to_string());
            return Err(AppError::Unauthorized(message));
        }

        if !status.is_success() {
            return Err(AppError::SourceUnavailable(format!(
                "OMDb API returned status {}: {}",
                status, body
            )));
        }

        Ok(body)
    }

    fn parse_search(body: &str) -> AppResult<Vec<String>> {
        let response: OmdbSearchResponse = serde_json::from_str(body).map_err(|e| {
            tracing::error!(error = %e, response = %body, "Failed to deserialize OMDb search");
            AppError::SourceUnavailable(format!("Failed to parse OMDb response: {}", e))
        })?;

        if !response.is_success() {
            return match response.error {
                Some(message) if is_credential_error(&message) => {
                    Err(AppError::Unauthorized(message))
                }
                // "Movie not found!", "Too many results." and running past the last page
                _ => Ok(Vec::new()),
            };
        }

        Ok(response.search.into_iter().map(|item| item.title).collect())
    }

    fn parse_details(body: &str) -> AppResult<Option<MovieRecord>> {
        let details: OmdbMovieDetails = serde_json::from_str(body).map_err(|e| {
            tracing::error!(error = %e, response = %body, "Failed to deserialize OMDb details");
            AppError::SourceUnavailable(format!("Failed to parse OMDb response: {}", e))
        })?;

        if let Some(message) = details.error.as_deref() {
            if is_credential_error(message) {
                return Err(AppError::Unauthorized(message.to_string()));
            }
        }

        Ok(details.into_record())
    }
}

/// OMDb's wording for a bad key, a missing key and an exhausted daily quota
fn is_credential_error(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("api key") || message.contains("request limit")
}

fn transport_error(error: reqwest::Error) -> AppError {
    if error.is_timeout() {
        AppError::SourceUnavailable(format!("OMDb request timed out: {}", error))
    } else {
        AppError::SourceUnavailable(format!("OMDb request failed: {}", error))
    }
}

#[async_trait::async_trait]
impl MetadataSource for OmdbProvider {
    async fn search(&self, keyword: &str, page: u32) -> AppResult<Vec<String>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(AppError::InvalidInput(
                "Search keyword cannot be empty".to_string(),
            ));
        }

        let page_param = page.to_string();
        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[
                ("s", keyword),
                ("type", "movie"),
                ("page", page_param.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let body = self.read_body(response).await?;
        let titles = Self::parse_search(&body)?;

        tracing::info!(
            keyword = %keyword,
            page = page,
            results = titles.len(),
            provider = PROVIDER_NAME,
            "Title search completed"
        );

        Ok(titles)
    }

    async fn get_details(&self, title: &str) -> AppResult<Option<MovieRecord>> {
        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[("t", title), ("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(transport_error)?;

        let body = self.read_body(response).await?;
        let record = Self::parse_details(&body)?;

        tracing::debug!(
            title = %title,
            found = record.is_some(),
            provider = PROVIDER_NAME,
            "Details fetched"
        );

        Ok(record)
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
