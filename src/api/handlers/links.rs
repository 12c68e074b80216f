//! Handlers for link management endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use crate::api::dto::link::{CreateLinkBody, LinkListResponse, LinkResponse, UpdateLinkBody};
use crate::domain::access::AccessContext;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the caller's active links.
///
/// # Endpoint
///
/// `GET /api/links`
///
/// An unauthenticated caller gets an empty list.
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<AccessContext>,
) -> Result<Json<LinkListResponse>, AppError> {
    let links = state.link_service.get_all(&ctx).await?;

    let links = links
        .into_iter()
        .map(|link| LinkResponse::from_link(link, &state.base_url))
        .collect();

    Ok(Json(LinkListResponse { links }))
}

/// Fetches one of the caller's links.
///
/// # Endpoint
///
/// `GET /api/links/{id}`
pub async fn get_link_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<AccessContext>,
    Path(id): Path<String>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get_by_id(&ctx, &id).await?;

    Ok(Json(LinkResponse::from_link(link, &state.base_url)))
}

/// Creates a link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Errors
///
/// Returns 400 Bad Request when validation fails or the requested id is
/// already in use.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<AccessContext>,
    Json(payload): Json<CreateLinkBody>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state.link_service.create(&ctx, payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(LinkResponse::from_link(link, &state.base_url)),
    ))
}

/// Partially updates one of the caller's links.
///
/// # Endpoint
///
/// `PATCH /api/links/{id}`
///
/// Only provided fields are changed; empty strings are treated as absent.
pub async fn update_link_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<AccessContext>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateLinkBody>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let link = state.link_service.update(&ctx, &id, payload.into()).await?;

    Ok(Json(LinkResponse::from_link(link, &state.base_url)))
}

/// Deletes one of the caller's links and returns its last snapshot.
///
/// # Endpoint
///
/// `DELETE /api/links/{id}`
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<AccessContext>,
    Path(id): Path<String>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.delete(&ctx, &id).await?;

    Ok(Json(LinkResponse::from_link(link, &state.base_url)))
}
