//! Handler for the public short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};

use crate::error::AppError;
use crate::state::AppState;

/// Resolves a short id and redirects to its destination.
///
/// # Endpoint
///
/// `GET /{id}`
///
/// No authentication: resolution ignores ownership entirely. A missing or
/// paused link is a uniform 404 (or a redirect to the configured fallback
/// page), so anonymous callers cannot distinguish the two.
pub async fn redirect_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    match state.link_service.get_by_id_for_redirect(&id).await {
        Ok(link) => Ok(Redirect::temporary(&link.destination_url)),
        Err(AppError::NotFound { .. }) if state.fallback_url.is_some() => {
            let fallback = state.fallback_url.as_deref().unwrap_or_default();
            Ok(Redirect::temporary(fallback))
        }
        Err(e) => Err(e),
    }
}
