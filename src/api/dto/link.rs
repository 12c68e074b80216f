//! DTOs for the link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{CreateLinkRequest, Link, LinkStatus, UpdateLinkRequest};

/// Request body for `POST /api/links`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkBody {
    /// Requested short id; normalized server-side, generated when absent.
    #[validate(length(max = 50, message = "Id must be at most 50 characters"))]
    pub id: Option<String>,

    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,

    /// The redirect target.
    #[validate(
        url(message = "Invalid URL format"),
        length(max = 5000, message = "URL must be at most 5000 characters")
    )]
    pub destination_url: String,
}

impl From<CreateLinkBody> for CreateLinkRequest {
    fn from(body: CreateLinkBody) -> Self {
        Self {
            id: body.id,
            name: body.name,
            destination_url: body.destination_url,
        }
    }
}

/// Request body for `PATCH /api/links/{id}`.
///
/// All fields are optional; absent (or empty-string) fields are left
/// unchanged. Destination changes additionally require the service to be
/// configured with `ALLOW_DESTINATION_UPDATE`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateLinkBody {
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,

    pub status: Option<LinkStatus>,

    #[validate(
        url(message = "Invalid URL format"),
        length(max = 5000, message = "URL must be at most 5000 characters")
    )]
    pub destination_url: Option<String>,
}

impl From<UpdateLinkBody> for UpdateLinkRequest {
    fn from(body: UpdateLinkBody) -> Self {
        Self {
            name: body.name,
            status: body.status,
            destination_url: body.destination_url,
        }
    }
}

/// JSON representation of a link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: String,
    pub name: String,
    pub short_url: String,
    pub destination_url: String,
    pub status: LinkStatus,
    pub redirect_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LinkResponse {
    /// Builds the response, rendering the full short URL from the
    /// configured public base URL.
    pub fn from_link(link: Link, base_url: &str) -> Self {
        let short_url = format!("{}/{}", base_url.trim_end_matches('/'), link.id);

        Self {
            id: link.id,
            name: link.name,
            short_url,
            destination_url: link.destination_url,
            status: link.status,
            redirect_count: link.redirect_count,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

/// Response body for `GET /api/links`.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub links: Vec<LinkResponse>,
}
