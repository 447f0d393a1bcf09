use axum::{
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Sessions
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/:id", delete(handlers::end_session))
        // Catalog
        .route("/sessions/:id/fetch", post(handlers::fetch))
        .route("/sessions/:id/titles", get(handlers::get_titles))
        // Recommendations
        .route("/sessions/:id/recommend", post(handlers::recommend))
        .route("/sessions/:id/surprise", post(handlers::surprise))
        // Favorites
        .route("/sessions/:id/favorites", get(handlers::get_favorites))
        .route("/sessions/:id/favorites", post(handlers::add_favorite))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
