//! Identity-resolving middleware.
//!
//! Reads the `X-User-ID` header (populated by the authenticating reverse
//! proxy) into an [`AccessContext`] request extension. It never rejects a
//! request: the link service owns the unauthenticated-caller policies, so
//! anonymous requests pass through with an anonymous context.

use axum::{extract::Request, middleware::Next, response::Response};

use crate::domain::access::AccessContext;

pub const USER_ID_HEADER: &str = "x-user-id";

pub async fn layer(mut req: Request, next: Next) -> Response {
    let ctx = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(AccessContext::for_owner)
        .unwrap_or_else(AccessContext::anonymous);

    if let Some(owner) = ctx.owner_id() {
        tracing::debug!(owner, "resolved request identity");
    }

    req.extensions_mut().insert(ctx);

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_name_is_lowercase() {
        // HeaderMap::get requires a lowercase standard name.
        assert_eq!(USER_ID_HEADER, USER_ID_HEADER.to_lowercase());
    }
}
