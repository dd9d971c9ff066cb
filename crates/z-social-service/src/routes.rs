//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{accounts, follows, health, profiles, search};
use crate::pictures::UPLOADS_PATH;
use crate::state::AppState;

// ============================================================================
// Limits
// ============================================================================

/// Maximum concurrent requests for API endpoints.
const API_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Room for multipart boundaries and headers on top of the picture limit.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
/// - `GET /uploads/*` - Stored profile pictures
///
/// ## Auth
/// - `POST /v1/auth/register` - Create an account and log in
/// - `POST /v1/auth/login` - Log in
/// - `GET /v1/accounts/me` - Get the current account
///
/// ## Profiles
/// - `GET /v1/profiles/me` - Own profile page
/// - `GET /v1/profiles/:id` - Any profile page (token optional)
/// - `PUT /v1/profiles/:id` - Edit own profile
/// - `POST /v1/profiles/:id/picture` - Upload own picture (multipart)
/// - `GET /v1/profiles/:id/followers` - Followers
/// - `GET /v1/profiles/:id/following` - Followed accounts
///
/// ## Graph
/// - `POST /v1/follows/:id` - Follow
/// - `DELETE /v1/follows/:id` - Unfollow
/// - `GET /v1/search?q=` - Search accounts
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let max_upload_bytes = state.config.max_upload_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;
    let upload_dir = state.pictures.dir().to_path_buf();

    // Build CORS layer
    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    // JSON routes share the small body limit
    let json_routes = Router::new()
        // Auth
        .route("/auth/register", post(accounts::register))
        .route("/auth/login", post(accounts::login))
        .route("/accounts/me", get(accounts::get_me))
        // Profiles
        .route("/profiles/me", get(profiles::get_my_profile))
        .route(
            "/profiles/:id",
            get(profiles::get_profile).put(profiles::update_profile),
        )
        .route("/profiles/:id/followers", get(profiles::list_followers))
        .route("/profiles/:id/following", get(profiles::list_following))
        // Graph
        .route(
            "/follows/:id",
            post(follows::follow).delete(follows::unfollow),
        )
        .route("/search", get(search::search))
        .layer(RequestBodyLimitLayer::new(max_body_bytes));

    // The picture size check happens while streaming the multipart field
    let upload_routes = Router::new()
        .route("/profiles/:id/picture", post(profiles::upload_picture))
        .layer(DefaultBodyLimit::max(
            max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES),
        ));

    let api_routes = json_routes
        .merge(upload_routes)
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        // Health (public, no rate limit)
        .route("/health", get(health::health))
        // API v1 routes (rate limited)
        .nest("/v1", api_routes)
        // Stored pictures
        .nest_service(UPLOADS_PATH, ServeDir::new(upload_dir))
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
