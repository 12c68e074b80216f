//! Repository trait for link storage.

use crate::domain::entities::{Link, LinkStatus};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Field values written by an owner-conditional update.
///
/// The engine merges the caller's partial update into these concrete values
/// before handing them to the store; the repository writes them verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkChanges {
    pub name: String,
    pub destination_url: String,
    pub status: LinkStatus,
    pub updated_at: DateTime<Utc>,
}

/// Store adapter for links.
///
/// Single-item operations are atomic; multi-step flows built on top of them
/// (check-then-create, fetch-then-update) are not transactional.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Fetches a link by id, regardless of owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unexpected`] on store errors.
    async fn find_by_id(&self, id: &str) -> Result<Option<Link>, AppError>;

    /// Scans links for one owner, optionally filtered by status, newest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unexpected`] on store errors.
    async fn list_by_owner(
        &self,
        owner_id: &str,
        status: Option<LinkStatus>,
    ) -> Result<Vec<Link>, AppError>;

    /// Persists a new link.
    ///
    /// The caller is responsible for the collision check; a racing
    /// duplicate insert surfaces as [`AppError::Unexpected`].
    async fn insert(&self, link: &Link) -> Result<(), AppError>;

    /// Updates a link's mutable fields, conditioned on `id` and `owner_id`
    /// both matching.
    ///
    /// Returns `false` when no row matched the condition; the store does
    /// not distinguish a missing row from an ownership mismatch.
    async fn update(
        &self,
        id: &str,
        owner_id: &str,
        changes: &LinkChanges,
    ) -> Result<bool, AppError>;

    /// Hard-deletes a link, conditioned on `id` and `owner_id` both
    /// matching. Returns `false` when no row matched.
    async fn delete(&self, id: &str, owner_id: &str) -> Result<bool, AppError>;

    /// Increments the redirect counter by one, out-of-band from the
    /// primary mutation path.
    async fn increment_redirect_count(&self, id: &str) -> Result<(), AppError>;
}
