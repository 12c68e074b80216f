//! Link lifecycle service: ownership-scoped CRUD and redirect resolution.

use std::sync::Arc;

use metrics::counter;
use serde_json::json;

use crate::domain::access::AccessContext;
use crate::domain::clock::Clock;
use crate::domain::entities::{CreateLinkRequest, Link, LinkStatus, UpdateLinkRequest};
use crate::domain::repositories::{LinkChanges, LinkRepository};
use crate::error::AppError;
use crate::utils::id_allocator;

/// Orchestrates link create/read/update/delete and public redirect
/// resolution.
///
/// Ownership (`owner_id` equality) is the sole authorization predicate for
/// everything except the redirect path, which ignores ownership entirely.
/// Check-then-act flows (collision check on create, fetch-then-update) are
/// deliberately non-transactional; mutations are additionally conditioned
/// on `id AND owner_id` at the store to close the read-to-write ownership
/// race.
pub struct LinkService<R, C> {
    repository: Arc<R>,
    clock: C,
    /// When false (the canonical policy), `update` ignores destination URL
    /// changes and keeps the stored value.
    allow_destination_update: bool,
}

impl<R: LinkRepository, C: Clock> LinkService<R, C> {
    pub fn new(repository: Arc<R>, clock: C, allow_destination_update: bool) -> Self {
        Self {
            repository,
            clock,
            allow_destination_update,
        }
    }

    /// Lists the caller's active links.
    ///
    /// An unauthenticated caller gets an empty list, not an error: no
    /// owner means no links.
    pub async fn get_all(&self, ctx: &AccessContext) -> Result<Vec<Link>, AppError> {
        let Some(owner) = ctx.owner_id() else {
            return Ok(Vec::new());
        };

        self.repository
            .list_by_owner(owner, Some(LinkStatus::Active))
            .await
    }

    /// Fetches one of the caller's links by id.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] when no link has this id
    /// - [`AppError::Forbidden`] when the caller is unauthenticated or is
    ///   not the owner
    pub async fn get_by_id(&self, ctx: &AccessContext, id: &str) -> Result<Link, AppError> {
        let owner = ctx
            .owner_id()
            .ok_or_else(|| AppError::forbidden("Authentication required", json!({})))?;

        self.fetch_owned(owner, id).await
    }

    /// Resolves a link for the public redirect path, without any ownership
    /// check.
    ///
    /// A missing link and a non-active link are both [`AppError::NotFound`]
    /// so an anonymous caller cannot tell them apart. On success the
    /// redirect counter is incremented best-effort: a failed increment is
    /// logged and never fails the resolution.
    pub async fn get_by_id_for_redirect(&self, id: &str) -> Result<Link, AppError> {
        let link = self
            .repository
            .find_by_id(id)
            .await?
            .filter(Link::is_redirect_eligible)
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))?;

        if let Err(e) = self.repository.increment_redirect_count(id).await {
            counter!("link_redirect_count_write_failures_total").increment(1);
            tracing::warn!(id, error = %e, "failed to increment redirect count");
        }

        counter!("link_redirects_total").increment(1);

        Ok(link)
    }

    /// Creates a link for the authenticated owner.
    ///
    /// The identifier is the normalized requested id or a generated one;
    /// either way it is collision-checked against the store before the
    /// write. An existing id is rejected, never overwritten.
    ///
    /// # Errors
    ///
    /// - [`AppError::BadRequest`] when the id is already in use
    /// - [`AppError::Unexpected`] when the context carries no owner: this
    ///   path is unreachable without authentication, so a missing owner is
    ///   an internal consistency violation, not a caller mistake
    pub async fn create(
        &self,
        ctx: &AccessContext,
        request: CreateLinkRequest,
    ) -> Result<Link, AppError> {
        let owner = ctx.owner_id().ok_or_else(|| {
            tracing::error!("create reached without a resolved owner");
            AppError::unexpected("Missing owner identity", json!({}))
        })?;

        let id = id_allocator::allocate(request.id.as_deref())?;

        if self.repository.find_by_id(&id).await?.is_some() {
            return Err(AppError::bad_request(
                "This short URL is already in use",
                json!({ "id": id }),
            ));
        }

        let now = self.clock.now();
        let link = Link {
            id,
            owner_id: owner.to_string(),
            name: request.name.unwrap_or_default(),
            destination_url: request.destination_url,
            status: LinkStatus::Active,
            redirect_count: 0,
            created_at: now,
            updated_at: now,
        };

        self.repository.insert(&link).await?;

        Ok(link)
    }

    /// Partially updates one of the caller's links.
    ///
    /// Absent or empty fields keep their stored values; `updated_at` is
    /// always refreshed. The write is conditioned on `id AND owner_id`, so
    /// an ownership change between the read and the write fails closed.
    /// Returns the re-fetched stored row, not the locally merged value.
    pub async fn update(
        &self,
        ctx: &AccessContext,
        id: &str,
        request: UpdateLinkRequest,
    ) -> Result<Link, AppError> {
        let owner = ctx
            .owner_id()
            .ok_or_else(|| AppError::forbidden("Authentication required", json!({})))?;

        let current = self.fetch_owned(owner, id).await?;

        let changes = self.merge(&current, request);

        let matched = self.repository.update(id, owner, &changes).await?;
        if !matched {
            // The row was there a moment ago; the conditional write
            // no-opped, so ownership (or the row) changed underneath us.
            return Err(AppError::forbidden(
                "Not allowed to modify this link",
                json!({ "id": id }),
            ));
        }

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::unexpected("Updated link disappeared", json!({ "id": id })))
    }

    /// Deletes one of the caller's links and returns its last snapshot.
    ///
    /// Hard delete, conditioned on `id AND owner_id` like [`Self::update`].
    pub async fn delete(&self, ctx: &AccessContext, id: &str) -> Result<Link, AppError> {
        let owner = ctx
            .owner_id()
            .ok_or_else(|| AppError::forbidden("Authentication required", json!({})))?;

        let link = self.fetch_owned(owner, id).await?;

        let matched = self.repository.delete(id, owner).await?;
        if !matched {
            return Err(AppError::forbidden(
                "Not allowed to delete this link",
                json!({ "id": id }),
            ));
        }

        Ok(link)
    }

    /// Fetches a link and verifies the caller owns it.
    ///
    /// Ownership mismatch is always `Forbidden`, never `NotFound`: direct
    /// reads are gated by ownership, not status.
    async fn fetch_owned(&self, owner: &str, id: &str) -> Result<Link, AppError> {
        let link = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))?;

        if !link.is_owned_by(owner) {
            return Err(AppError::forbidden(
                "Not allowed to access this link",
                json!({ "id": id }),
            ));
        }

        Ok(link)
    }

    /// Merges a partial update into the current row. Empty strings count
    /// as absent, per the governing empty-means-unset convention.
    fn merge(&self, current: &Link, request: UpdateLinkRequest) -> LinkChanges {
        let name = request
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| current.name.clone());

        let destination_url = if self.allow_destination_update {
            request
                .destination_url
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| current.destination_url.clone())
        } else {
            current.destination_url.clone()
        };

        LinkChanges {
            name,
            destination_url,
            status: request.status.unwrap_or(current.status),
            updated_at: self.clock.now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::ManualClock;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use mockall::Sequence;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn test_link(id: &str, owner: &str, status: LinkStatus) -> Link {
        Link {
            id: id.to_string(),
            owner_id: owner.to_string(),
            name: "My link".to_string(),
            destination_url: "https://example.com".to_string(),
            status,
            redirect_count: 7,
            created_at: fixed_time() - Duration::days(1),
            updated_at: fixed_time() - Duration::days(1),
        }
    }

    fn service(
        repo: MockLinkRepository,
        clock: Arc<ManualClock>,
        allow_destination_update: bool,
    ) -> LinkService<MockLinkRepository, Arc<ManualClock>> {
        LinkService::new(Arc::new(repo), clock, allow_destination_update)
    }

    fn owner_ctx() -> AccessContext {
        AccessContext::for_owner("user-1")
    }

    // ── get_all ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_get_all_anonymous_returns_empty_without_store_call() {
        let mut repo = MockLinkRepository::new();
        repo.expect_list_by_owner().times(0);

        let svc = service(
            repo,
            Arc::new(ManualClock::starting_at(fixed_time())),
            false,
        );

        let links = svc.get_all(&AccessContext::anonymous()).await.unwrap();
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_get_all_scans_active_links_for_owner() {
        let mut repo = MockLinkRepository::new();
        repo.expect_list_by_owner()
            .withf(|owner, status| owner == "user-1" && *status == Some(LinkStatus::Active))
            .times(1)
            .returning(|_, _| Ok(vec![test_link("abc123", "user-1", LinkStatus::Active)]));

        let svc = service(
            repo,
            Arc::new(ManualClock::starting_at(fixed_time())),
            false,
        );

        let links = svc.get_all(&owner_ctx()).await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].id, "abc123");
    }

    // ── get_by_id ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_get_by_id_success() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .withf(|id| id == "abc123")
            .times(1)
            .returning(|_| Ok(Some(test_link("abc123", "user-1", LinkStatus::Paused))));

        let svc = service(
            repo,
            Arc::new(ManualClock::starting_at(fixed_time())),
            false,
        );

        // Status does not gate direct reads.
        let link = svc.get_by_id(&owner_ctx(), "abc123").await.unwrap();
        assert_eq!(link.status, LinkStatus::Paused);
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id().times(1).returning(|_| Ok(None));

        let svc = service(
            repo,
            Arc::new(ManualClock::starting_at(fixed_time())),
            false,
        );

        let err = svc.get_by_id(&owner_ctx(), "nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_by_id_other_owner_is_forbidden() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .returning(|_| Ok(Some(test_link("abc123", "user-2", LinkStatus::Active))));

        let svc = service(
            repo,
            Arc::new(ManualClock::starting_at(fixed_time())),
            false,
        );

        let err = svc.get_by_id(&owner_ctx(), "abc123").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_get_by_id_unauthenticated_is_forbidden() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id().times(0);

        let svc = service(
            repo,
            Arc::new(ManualClock::starting_at(fixed_time())),
            false,
        );

        let err = svc
            .get_by_id(&AccessContext::anonymous(), "abc123")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_get_by_id_legacy_empty_owner_is_forbidden() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .returning(|_| Ok(Some(test_link("abc123", "", LinkStatus::Active))));

        let svc = service(
            repo,
            Arc::new(ManualClock::starting_at(fixed_time())),
            false,
        );

        let err = svc.get_by_id(&owner_ctx(), "abc123").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    // ── get_by_id_for_redirect ───────────────────────────────────────────

    #[tokio::test]
    async fn test_redirect_resolves_active_link_and_increments() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .returning(|_| Ok(Some(test_link("abc123", "user-2", LinkStatus::Active))));
        repo.expect_increment_redirect_count()
            .withf(|id| id == "abc123")
            .times(1)
            .returning(|_| Ok(()));

        let svc = service(
            repo,
            Arc::new(ManualClock::starting_at(fixed_time())),
            false,
        );

        // No ownership check: the owner is irrelevant here.
        let link = svc.get_by_id_for_redirect("abc123").await.unwrap();
        assert_eq!(link.destination_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_redirect_paused_link_is_not_found_and_not_counted() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .returning(|_| Ok(Some(test_link("abc123", "user-1", LinkStatus::Paused))));
        repo.expect_increment_redirect_count().times(0);

        let svc = service(
            repo,
            Arc::new(ManualClock::starting_at(fixed_time())),
            false,
        );

        let err = svc.get_by_id_for_redirect("abc123").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_redirect_missing_link_is_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id().times(1).returning(|_| Ok(None));
        repo.expect_increment_redirect_count().times(0);

        let svc = service(
            repo,
            Arc::new(ManualClock::starting_at(fixed_time())),
            false,
        );

        let err = svc.get_by_id_for_redirect("nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_redirect_survives_failed_counter_write() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .returning(|_| Ok(Some(test_link("abc123", "user-1", LinkStatus::Active))));
        repo.expect_increment_redirect_count()
            .times(1)
            .returning(|_| Err(AppError::unexpected("store down", json!({}))));

        let svc = service(
            repo,
            Arc::new(ManualClock::starting_at(fixed_time())),
            false,
        );

        let link = svc.get_by_id_for_redirect("abc123").await.unwrap();
        assert_eq!(link.id, "abc123");
    }

    // ── create ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_create_with_generated_id() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id().times(1).returning(|_| Ok(None));
        repo.expect_insert()
            .withf(|link| {
                link.id.len() == 6
                    && link.owner_id == "user-1"
                    && link.status == LinkStatus::Active
                    && link.redirect_count == 0
            })
            .times(1)
            .returning(|_| Ok(()));

        let svc = service(
            repo,
            Arc::new(ManualClock::starting_at(fixed_time())),
            false,
        );

        let link = svc
            .create(
                &owner_ctx(),
                CreateLinkRequest {
                    id: None,
                    name: Some("Docs".to_string()),
                    destination_url: "https://docs.example.com".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(link.created_at, fixed_time());
        assert_eq!(link.updated_at, fixed_time());
        assert_eq!(link.name, "Docs");
    }

    #[tokio::test]
    async fn test_create_normalizes_requested_id() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .withf(|id| id == "my-promo-link")
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_insert()
            .withf(|link| link.id == "my-promo-link")
            .times(1)
            .returning(|_| Ok(()));

        let svc = service(
            repo,
            Arc::new(ManualClock::starting_at(fixed_time())),
            false,
        );

        let link = svc
            .create(
                &owner_ctx(),
                CreateLinkRequest {
                    id: Some("  my promo link!  ".to_string()),
                    name: None,
                    destination_url: "https://example.com".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(link.id, "my-promo-link");
    }

    #[tokio::test]
    async fn test_create_rejects_id_collision() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .returning(|_| Ok(Some(test_link("taken", "user-2", LinkStatus::Active))));
        repo.expect_insert().times(0);

        let svc = service(
            repo,
            Arc::new(ManualClock::starting_at(fixed_time())),
            false,
        );

        let err = svc
            .create(
                &owner_ctx(),
                CreateLinkRequest {
                    id: Some("taken".to_string()),
                    name: None,
                    destination_url: "https://example.com".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn test_create_without_owner_is_internal_error() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id().times(0);

        let svc = service(
            repo,
            Arc::new(ManualClock::starting_at(fixed_time())),
            false,
        );

        let err = svc
            .create(
                &AccessContext::anonymous(),
                CreateLinkRequest {
                    id: None,
                    name: None,
                    destination_url: "https://example.com".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unexpected { .. }));
    }

    // ── update ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_update_merges_and_returns_stored_row() {
        let clock = Arc::new(ManualClock::starting_at(fixed_time()));
        let mut repo = MockLinkRepository::new();
        let mut seq = Sequence::new();

        repo.expect_find_by_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(test_link("abc123", "user-1", LinkStatus::Active))));

        repo.expect_update()
            .withf(|id, owner, changes| {
                id == "abc123"
                    && owner == "user-1"
                    && changes.name == "Renamed"
                    && changes.status == LinkStatus::Paused
                    && changes.destination_url == "https://example.com"
                    && changes.updated_at == fixed_time()
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(true));

        repo.expect_find_by_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                let mut stored = test_link("abc123", "user-1", LinkStatus::Paused);
                stored.name = "Renamed".to_string();
                stored.updated_at = fixed_time();
                Ok(Some(stored))
            });

        let svc = service(repo, clock, false);

        let link = svc
            .update(
                &owner_ctx(),
                "abc123",
                UpdateLinkRequest {
                    name: Some("Renamed".to_string()),
                    status: Some(LinkStatus::Paused),
                    destination_url: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(link.name, "Renamed");
        assert_eq!(link.status, LinkStatus::Paused);
        assert_eq!(link.updated_at, fixed_time());
    }

    #[tokio::test]
    async fn test_update_empty_name_keeps_existing() {
        let clock = Arc::new(ManualClock::starting_at(fixed_time()));
        let mut repo = MockLinkRepository::new();

        repo.expect_find_by_id()
            .returning(|_| Ok(Some(test_link("abc123", "user-1", LinkStatus::Active))));
        repo.expect_update()
            .withf(|_, _, changes| changes.name == "My link")
            .times(1)
            .returning(|_, _, _| Ok(true));

        let svc = service(repo, clock, false);

        svc.update(
            &owner_ctx(),
            "abc123",
            UpdateLinkRequest {
                name: Some(String::new()),
                status: None,
                destination_url: None,
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_update_refreshes_updated_at() {
        let clock = Arc::new(ManualClock::starting_at(fixed_time()));
        clock.advance(Duration::hours(2));
        let later = fixed_time() + Duration::hours(2);

        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Ok(Some(test_link("abc123", "user-1", LinkStatus::Active))));
        repo.expect_update()
            .withf(move |_, _, changes| changes.updated_at == later)
            .times(1)
            .returning(|_, _, _| Ok(true));

        let svc = service(repo, clock, false);

        svc.update(&owner_ctx(), "abc123", UpdateLinkRequest::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_other_owner_is_forbidden() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .returning(|_| Ok(Some(test_link("abc123", "user-2", LinkStatus::Active))));
        repo.expect_update().times(0);

        let svc = service(
            repo,
            Arc::new(ManualClock::starting_at(fixed_time())),
            false,
        );

        let err = svc
            .update(&owner_ctx(), "abc123", UpdateLinkRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_update_conditional_miss_fails_closed() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .returning(|_| Ok(Some(test_link("abc123", "user-1", LinkStatus::Active))));
        repo.expect_update().times(1).returning(|_, _, _| Ok(false));

        let svc = service(
            repo,
            Arc::new(ManualClock::starting_at(fixed_time())),
            false,
        );

        let err = svc
            .update(&owner_ctx(), "abc123", UpdateLinkRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_update_ignores_destination_url_by_default() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Ok(Some(test_link("abc123", "user-1", LinkStatus::Active))));
        repo.expect_update()
            .withf(|_, _, changes| changes.destination_url == "https://example.com")
            .times(1)
            .returning(|_, _, _| Ok(true));

        let svc = service(
            repo,
            Arc::new(ManualClock::starting_at(fixed_time())),
            false,
        );

        svc.update(
            &owner_ctx(),
            "abc123",
            UpdateLinkRequest {
                name: None,
                status: None,
                destination_url: Some("https://evil.example.com".to_string()),
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_update_applies_destination_url_when_allowed() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Ok(Some(test_link("abc123", "user-1", LinkStatus::Active))));
        repo.expect_update()
            .withf(|_, _, changes| changes.destination_url == "https://new.example.com")
            .times(1)
            .returning(|_, _, _| Ok(true));

        let svc = service(repo, Arc::new(ManualClock::starting_at(fixed_time())), true);

        svc.update(
            &owner_ctx(),
            "abc123",
            UpdateLinkRequest {
                name: None,
                status: None,
                destination_url: Some("https://new.example.com".to_string()),
            },
        )
        .await
        .unwrap();
    }

    // ── delete ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_delete_returns_snapshot() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .returning(|_| Ok(Some(test_link("abc123", "user-1", LinkStatus::Active))));
        repo.expect_delete()
            .withf(|id, owner| id == "abc123" && owner == "user-1")
            .times(1)
            .returning(|_, _| Ok(true));

        let svc = service(
            repo,
            Arc::new(ManualClock::starting_at(fixed_time())),
            false,
        );

        let link = svc.delete(&owner_ctx(), "abc123").await.unwrap();
        assert_eq!(link.id, "abc123");
        assert_eq!(link.redirect_count, 7);
    }

    #[tokio::test]
    async fn test_delete_other_owner_is_forbidden() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .returning(|_| Ok(Some(test_link("abc123", "user-2", LinkStatus::Active))));
        repo.expect_delete().times(0);

        let svc = service(
            repo,
            Arc::new(ManualClock::starting_at(fixed_time())),
            false,
        );

        let err = svc.delete(&owner_ctx(), "abc123").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_delete_conditional_miss_fails_closed() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .returning(|_| Ok(Some(test_link("abc123", "user-1", LinkStatus::Active))));
        repo.expect_delete().times(1).returning(|_, _| Ok(false));

        let svc = service(
            repo,
            Arc::new(ManualClock::starting_at(fixed_time())),
            false,
        );

        let err = svc.delete(&owner_ctx(), "abc123").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }
}
