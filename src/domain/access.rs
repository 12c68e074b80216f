//! Per-request access context.
//!
//! Carries the resolved owner identity (or its absence) as an explicit
//! typed value instead of an untyped per-request context bag. Produced by
//! the identity middleware, consumed by the link service.

/// The authenticated principal for one request, if any.
#[derive(Debug, Clone, Default)]
pub struct AccessContext {
    owner_id: Option<String>,
}

impl AccessContext {
    /// Context for an unauthenticated request.
    pub fn anonymous() -> Self {
        Self { owner_id: None }
    }

    /// Context for an authenticated owner. An empty or whitespace-only id
    /// is treated as unauthenticated.
    pub fn for_owner(owner_id: impl Into<String>) -> Self {
        let owner_id = owner_id.into();
        let trimmed = owner_id.trim();

        if trimmed.is_empty() {
            Self::anonymous()
        } else {
            Self {
                owner_id: Some(trimmed.to_string()),
            }
        }
    }

    pub fn owner_id(&self) -> Option<&str> {
        self.owner_id.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.owner_id.is_some()
    }
}
