//! Link entity: the mapping from a short identifier to a destination URL.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Redirect eligibility of a link.
///
/// Only `Active` links resolve publicly. Both states are reachable only via
/// an explicit owner update; there are no automatic transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Active,
    Paused,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
        }
    }

    /// Parses the stored representation. Returns `None` for unknown values
    /// so the caller can decide how to surface a corrupt row.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "paused" => Some(Self::Paused),
            _ => None,
        }
    }
}

/// A shortened link owned by a single principal.
///
/// `id` is the store's primary key, unique across all owners and immutable
/// once created. `owner_id` may be empty only on legacy rows and must never
/// match an authenticated caller. `redirect_count` is maintained
/// out-of-band by the redirect path and only increases.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub destination_url: String,
    pub status: LinkStatus,
    pub redirect_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// Returns true if the link resolves publicly.
    pub fn is_redirect_eligible(&self) -> bool {
        self.status == LinkStatus::Active
    }

    /// Returns true if `owner` is the owning principal.
    ///
    /// Legacy rows with an empty `owner_id` are owned by nobody.
    pub fn is_owned_by(&self, owner: &str) -> bool {
        !self.owner_id.is_empty() && self.owner_id == owner
    }
}

/// Pre-validated input for creating a link.
#[derive(Debug, Clone, Default)]
pub struct CreateLinkRequest {
    /// Requested short id; normalized by the allocator, generated if absent.
    pub id: Option<String>,
    pub name: Option<String>,
    pub destination_url: String,
}

/// Pre-validated partial update for a link.
///
/// Absent or empty-string fields are no-ops, never resets.
#[derive(Debug, Clone, Default)]
pub struct UpdateLinkRequest {
    pub name: Option<String>,
    pub status: Option<LinkStatus>,
    /// Only applied when the engine is configured to allow destination
    /// changes.
    pub destination_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_link(status: LinkStatus, owner_id: &str) -> Link {
        let now = Utc::now();
        Link {
            id: "abc123".to_string(),
            owner_id: owner_id.to_string(),
            name: "Example".to_string(),
            destination_url: "https://example.com".to_string(),
            status,
            redirect_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(LinkStatus::parse("active"), Some(LinkStatus::Active));
        assert_eq!(LinkStatus::parse("paused"), Some(LinkStatus::Paused));
        assert_eq!(LinkStatus::Active.as_str(), "active");
        assert_eq!(LinkStatus::Paused.as_str(), "paused");
    }

    #[test]
    fn test_status_rejects_historical_variants() {
        assert_eq!(LinkStatus::parse("pending_approval"), None);
        assert_eq!(LinkStatus::parse("suspended"), None);
        assert_eq!(LinkStatus::parse(""), None);
    }

    #[test]
    fn test_redirect_eligibility() {
        assert!(sample_link(LinkStatus::Active, "user-1").is_redirect_eligible());
        assert!(!sample_link(LinkStatus::Paused, "user-1").is_redirect_eligible());
    }

    #[test]
    fn test_ownership() {
        let link = sample_link(LinkStatus::Active, "user-1");
        assert!(link.is_owned_by("user-1"));
        assert!(!link.is_owned_by("user-2"));
    }

    #[test]
    fn test_legacy_empty_owner_matches_nobody() {
        let link = sample_link(LinkStatus::Active, "");
        assert!(!link.is_owned_by(""));
        assert!(!link.is_owned_by("user-1"));
    }
}
