//! Campaign aggregate - a named collection of NPCs owned by one user
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: All fields are encapsulated
//! - **Newtypes**: `CampaignName` and `Description` for validated strings
//! - **Valid by construction**: `new()` takes pre-validated types
//!
//! Ownership is an invariant, not a mutable field: a campaign belongs to
//! exactly one user for its whole life, and every mutation refreshes
//! `updated_at` with a caller-supplied timestamp (the clock is injected so
//! the domain stays deterministic).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ids::{CampaignId, UserId};
use crate::value_objects::{CampaignName, Description};

/// A campaign: the unit of ownership for NPC records
///
/// # Invariants
///
/// - `name` is always non-empty and <= 200 characters (enforced by `CampaignName`)
/// - `description` is always <= 5000 characters (enforced by `Description`)
/// - `owner` never changes after creation
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use folio_domain::{Campaign, CampaignName, UserId};
///
/// let owner = UserId::new();
/// let name = CampaignName::new("Lost Mine of Phandelver").unwrap();
/// let campaign = Campaign::new(owner, name, Utc::now());
///
/// assert_eq!(campaign.name().as_str(), "Lost Mine of Phandelver");
/// assert!(campaign.is_owned_by(owner));
/// ```
#[derive(Debug, Clone)]
pub struct Campaign {
    id: CampaignId,
    owner: UserId,
    name: CampaignName,
    description: Description,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Campaign {
    /// Create a new campaign owned by the given user.
    ///
    /// `name` must be a pre-validated `CampaignName`; validation happens
    /// when creating the name, not here.
    pub fn new(owner: UserId, name: CampaignName, now: DateTime<Utc>) -> Self {
        Self {
            id: CampaignId::new(),
            owner,
            name,
            description: Description::empty(),
            created_at: now,
            updated_at: now,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the campaign's unique identifier.
    #[inline]
    pub fn id(&self) -> CampaignId {
        self.id
    }

    /// Returns the identifier of the owning user.
    #[inline]
    pub fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns true if the given user owns this campaign.
    #[inline]
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner == user
    }

    /// Returns the campaign's name.
    #[inline]
    pub fn name(&self) -> &CampaignName {
        &self.name
    }

    /// Returns the campaign's description.
    #[inline]
    pub fn description(&self) -> &Description {
        &self.description
    }

    /// Returns when the campaign was created.
    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the campaign was last mutated.
    #[inline]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // =========================================================================
    // Builder Methods (for construction)
    // =========================================================================

    /// Set the campaign's description.
    pub fn with_description(mut self, description: Description) -> Self {
        self.description = description;
        self
    }

    /// Set the campaign's ID (used when loading from storage).
    pub fn with_id(mut self, id: CampaignId) -> Self {
        self.id = id;
        self
    }

    /// Set the campaign's timestamps (used when loading from storage).
    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    // =========================================================================
    // Mutation Methods
    // =========================================================================

    /// Rename the campaign, refreshing `updated_at`.
    pub fn set_name(&mut self, name: CampaignName, now: DateTime<Utc>) {
        self.name = name;
        self.updated_at = now;
    }

    /// Replace the description, refreshing `updated_at`.
    pub fn set_description(&mut self, description: Description, now: DateTime<Utc>) {
        self.description = description;
        self.updated_at = now;
    }
}

// ============================================================================
// Serde Implementation
// ============================================================================

/// Intermediate format for serialization that matches the wire format
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CampaignWireFormat {
    id: CampaignId,
    owner: UserId,
    name: CampaignName,
    #[serde(default)]
    description: Description,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Serialize for Campaign {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wire = CampaignWireFormat {
            id: self.id,
            owner: self.owner,
            name: self.name.clone(),
            description: self.description.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Campaign {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = CampaignWireFormat::deserialize(deserializer)?;
        Ok(Campaign {
            id: wire.id,
            owner: wire.owner,
            name: wire.name,
            description: wire.description,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn later_time() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_600, 0).unwrap()
    }

    mod constructor {
        use super::*;

        #[test]
        fn new_creates_campaign_with_correct_defaults() {
            let owner = UserId::new();
            let name = CampaignName::new("Storm King's Thunder").unwrap();
            let campaign = Campaign::new(owner, name, fixed_time());

            assert_eq!(campaign.name().as_str(), "Storm King's Thunder");
            assert_eq!(campaign.owner(), owner);
            assert!(campaign.is_owned_by(owner));
            assert!(!campaign.is_owned_by(UserId::new()));
            assert!(campaign.description().is_empty());
            assert_eq!(campaign.created_at(), fixed_time());
            assert_eq!(campaign.updated_at(), fixed_time());
        }

        #[test]
        fn builder_methods_work() {
            let owner = UserId::new();
            let name = CampaignName::new("Waterdeep").unwrap();
            let desc = Description::new("Urban intrigue").unwrap();
            let id = CampaignId::new();
            let campaign = Campaign::new(owner, name, fixed_time())
                .with_description(desc)
                .with_id(id)
                .with_timestamps(fixed_time(), later_time());

            assert_eq!(campaign.id(), id);
            assert_eq!(campaign.description().as_str(), "Urban intrigue");
            assert_eq!(campaign.created_at(), fixed_time());
            assert_eq!(campaign.updated_at(), later_time());
        }
    }

    mod mutation {
        use super::*;

        #[test]
        fn set_name_refreshes_updated_at() {
            let owner = UserId::new();
            let name = CampaignName::new("Old Name").unwrap();
            let mut campaign = Campaign::new(owner, name, fixed_time());

            campaign.set_name(CampaignName::new("New Name").unwrap(), later_time());

            assert_eq!(campaign.name().as_str(), "New Name");
            assert_eq!(campaign.created_at(), fixed_time());
            assert_eq!(campaign.updated_at(), later_time());
        }

        #[test]
        fn set_description_refreshes_updated_at() {
            let owner = UserId::new();
            let name = CampaignName::new("Campaign").unwrap();
            let mut campaign = Campaign::new(owner, name, fixed_time());

            campaign.set_description(Description::new("Notes").unwrap(), later_time());

            assert_eq!(campaign.description().as_str(), "Notes");
            assert_eq!(campaign.updated_at(), later_time());
        }
    }

    mod serde {
        use super::*;

        #[test]
        fn serialize_deserialize_roundtrip() {
            let owner = UserId::new();
            let name = CampaignName::new("Dragon Heist").unwrap();
            let campaign = Campaign::new(owner, name, fixed_time())
                .with_description(Description::new("A treasure hunt").unwrap());

            let json = serde_json::to_string(&campaign).unwrap();
            let deserialized: Campaign = serde_json::from_str(&json).unwrap();

            assert_eq!(deserialized.id(), campaign.id());
            assert_eq!(deserialized.owner(), campaign.owner());
            assert_eq!(deserialized.name().as_str(), "Dragon Heist");
            assert_eq!(deserialized.description().as_str(), "A treasure hunt");
        }

        #[test]
        fn wire_format_is_camel_case() {
            let owner = UserId::new();
            let name = CampaignName::new("Camel").unwrap();
            let campaign = Campaign::new(owner, name, fixed_time());

            let json = serde_json::to_value(&campaign).unwrap();
            assert!(json.get("createdAt").is_some());
            assert!(json.get("updatedAt").is_some());
            assert!(json.get("created_at").is_none());
        }
    }
}
