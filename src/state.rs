//! Shared application state for request handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::application::services::{LinkService, SlidingWindowLimiter};
use crate::domain::clock::SystemClock;
use crate::infrastructure::persistence::PgLinkRepository;

/// State threaded through the router.
///
/// The rate limiter's counters are the only cross-request mutable state in
/// the process.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<PgPool>,
    pub link_service: Arc<LinkService<PgLinkRepository, SystemClock>>,
    pub rate_limiter: Arc<SlidingWindowLimiter<SystemClock>>,
    /// Public base URL used to render full short URLs in responses.
    pub base_url: String,
    /// Where failed public redirects land instead of a bare 404, if set.
    pub fallback_url: Option<String>,
}
