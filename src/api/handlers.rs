use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::MovieRecord,
    services::FetchSummary,
};

use super::AppState;

// Request/Response types

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct FetchRequest {
    pub keyword: String,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub title: String,
    pub top_n: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SurpriseRequest {
    pub top_n: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub title: String,
}

/// A recommended movie as rendered to clients
#[derive(Debug, Serialize)]
pub struct MovieView {
    pub title: String,
    pub genre: String,
    pub plot: String,
    pub year: Option<String>,
    pub poster_url: Option<String>,
    pub poster_available: bool,
}

impl From<MovieRecord> for MovieView {
    fn from(record: MovieRecord) -> Self {
        Self {
            poster_available: record.poster_url.is_some(),
            title: record.title,
            genre: record.genre,
            plot: record.plot,
            year: record.year,
            poster_url: record.poster_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub query: String,
    pub recommendations: Vec<MovieView>,
}

#[derive(Debug, Serialize)]
pub struct SurpriseResponse {
    pub selected: MovieView,
    pub recommendations: Vec<MovieView>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Start a new session
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionResponse>) {
    let session_id = state.create_session().await;
    (StatusCode::CREATED, Json(SessionResponse { session_id }))
}

/// End a session, discarding its catalog and favorites
pub async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.end_session(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Fetch movies for a keyword and rebuild the session's catalog
pub async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<FetchRequest>,
) -> AppResult<Json<FetchSummary>> {
    let session = state.session(id).await?;
    let mut session = session.lock().await;

    let summary = session
        .fetch(state.source.clone(), &request.keyword, &state.settings)
        .await?;

    Ok(Json(summary))
}

/// Titles available for selection
pub async fn get_titles(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<String>>> {
    let session = state.session(id).await?;
    let titles = session.lock().await.titles();
    Ok(Json(titles))
}

/// Recommend movies similar to a selected title
pub async fn recommend(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecommendRequest>,
) -> AppResult<Json<RecommendResponse>> {
    let top_n = request.top_n.unwrap_or(state.settings.default_top_n);
    let session = state.session(id).await?;
    let recommendations = session.lock().await.recommend(&request.title, top_n)?;

    Ok(Json(RecommendResponse {
        query: request.title,
        recommendations: recommendations.into_iter().map(MovieView::from).collect(),
    }))
}

/// Pick a random title and recommend from it
pub async fn surprise(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    request: Option<Json<SurpriseRequest>>,
) -> AppResult<Json<SurpriseResponse>> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let top_n = request.top_n.unwrap_or(state.settings.default_top_n);

    let session = state.session(id).await?;
    let session = session.lock().await;
    let mut picker = state.picker.lock().await;
    let result = session.surprise(&mut **picker, top_n)?;

    Ok(Json(SurpriseResponse {
        selected: result.selected.into(),
        recommendations: result.recommendations.into_iter().map(MovieView::from).collect(),
    }))
}

/// Save a title to the session's favorites
pub async fn add_favorite(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<FavoriteRequest>,
) -> AppResult<(StatusCode, Json<Vec<String>>)> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput(
            "Favorite title cannot be empty".to_string(),
        ));
    }

    let session = state.session(id).await?;
    let mut session = session.lock().await;
    session.add_favorite(title);

    Ok((StatusCode::CREATED, Json(session.favorites().to_vec())))
}

/// List the session's favorites in the order they were saved
pub async fn get_favorites(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<String>>> {
    let session = state.session(id).await?;
    let favorites = session.lock().await.favorites().to_vec();
    Ok(Json(favorites))
}
