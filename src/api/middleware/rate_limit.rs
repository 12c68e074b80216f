//! Request admission middleware backed by the sliding-window limiter.
//!
//! Consulted before any handler runs, independent of link identity. One
//! budget is shared by all callers.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use metrics::counter;
use serde_json::json;

use crate::application::services::RateLimitError;
use crate::state::AppState;

pub async fn layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    match st.rate_limiter.check() {
        Ok(()) => next.run(req).await,
        Err(RateLimitError::Exhausted { retry_after }) => {
            counter!("rate_limit_rejections_total").increment(1);
            tracing::debug!(
                retry_after_secs = retry_after.as_secs_f64(),
                "rate limit exceeded"
            );

            rejection(
                StatusCode::TOO_MANY_REQUESTS,
                "Rate limit exceeded. Try later",
                retry_after.as_secs().max(1),
            )
        }
        Err(RateLimitError::Internal) => {
            // Counting backend is unusable: fail closed, but keep the
            // condition retryable for the client.
            tracing::error!("rate limiter failure, rejecting request");

            rejection(
                StatusCode::SERVICE_UNAVAILABLE,
                "Service temporarily unavailable",
                1,
            )
        }
    }
}

fn rejection(status: StatusCode, message: &str, retry_after_secs: u64) -> Response {
    let body = Json(json!({
        "error": {
            "code": "rate_limited",
            "message": message,
            "details": { "retry_after_secs": retry_after_secs },
        }
    }));

    let mut response = (status, body).into_response();

    if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
        response.headers_mut().insert(header::RETRY_AFTER, value);
    }

    response
}
