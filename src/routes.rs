//! Router configuration.

use axum::{
    middleware,
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::api::handlers::{
    create_link_handler, delete_link_handler, get_link_handler, health_handler,
    list_links_handler, redirect_handler, update_link_handler,
};
use crate::api::middleware::{identity, rate_limit};
use crate::state::AppState;

/// Builds the application router.
///
/// # Endpoints
///
/// - `GET    /health`          - Health check
/// - `GET    /api/links`       - List the caller's links
/// - `POST   /api/links`       - Create a link
/// - `GET    /api/links/{id}`  - Fetch a link
/// - `PATCH  /api/links/{id}`  - Partially update a link
/// - `DELETE /api/links/{id}`  - Delete a link
/// - `GET    /{id}`            - Public redirect
///
/// The rate limiter runs before every handler; the identity middleware
/// resolves `X-User-ID` into an `AccessContext` for the API routes.
pub fn app_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route(
            "/links/{id}",
            get(get_link_handler)
                .patch(update_link_handler)
                .delete(delete_link_handler),
        )
        .layer(middleware::from_fn(identity::layer));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_routes)
        .route("/{id}", get(redirect_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::layer,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
