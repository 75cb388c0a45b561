//! NPC aggregate - a non-player character belonging to a campaign
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: All fields are encapsulated
//! - **Newtypes**: `NpcName` and `Description` for validated strings
//! - **Value objects**: `AbilityScores` for the six optional scores
//!
//! Free-form descriptors (race, class, alignment, location, notes) are
//! optional strings rather than enums: organizers record whatever their
//! table uses, and the roster treats an absent location and a blank one
//! the same way.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ids::{CampaignId, NpcId, UserId};
use crate::value_objects::{AbilityScores, Description, NpcName};

/// A non-player character within a campaign
///
/// # Invariants
///
/// - `name` is always non-empty and <= 200 characters (enforced by `NpcName`)
/// - `campaign_id` and `owner` never change after creation
/// - Absent ability scores read as 10 through `AbilityScores`
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use folio_domain::{Ability, AbilityScores, CampaignId, Npc, NpcName, UserId};
///
/// let name = NpcName::new("Gundren Rockseeker").unwrap();
/// let npc = Npc::new(CampaignId::new(), UserId::new(), name, Utc::now())
///     .with_race("Dwarf")
///     .with_location("Phandalin")
///     .with_abilities(AbilityScores::new().with_score(Ability::Constitution, 14));
///
/// assert_eq!(npc.location(), Some("Phandalin"));
/// assert_eq!(npc.abilities().modifier_display(Ability::Constitution), "+2");
/// ```
#[derive(Debug, Clone)]
pub struct Npc {
    id: NpcId,
    campaign_id: CampaignId,
    owner: UserId,
    name: NpcName,
    race: Option<String>,
    class_name: Option<String>,
    alignment: Option<String>,
    location: Option<String>,
    description: Description,
    notes: Option<String>,
    portrait_url: Option<String>,
    abilities: AbilityScores,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Npc {
    /// Create a new NPC in the given campaign.
    pub fn new(
        campaign_id: CampaignId,
        owner: UserId,
        name: NpcName,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NpcId::new(),
            campaign_id,
            owner,
            name,
            race: None,
            class_name: None,
            alignment: None,
            location: None,
            description: Description::empty(),
            notes: None,
            portrait_url: None,
            abilities: AbilityScores::new(),
            created_at: now,
            updated_at: now,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the NPC's unique identifier.
    #[inline]
    pub fn id(&self) -> NpcId {
        self.id
    }

    /// Returns the identifier of the campaign this NPC belongs to.
    #[inline]
    pub fn campaign_id(&self) -> CampaignId {
        self.campaign_id
    }

    /// Returns the identifier of the owning user.
    #[inline]
    pub fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns true if the given user owns this NPC.
    #[inline]
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner == user
    }

    /// Returns the NPC's name.
    #[inline]
    pub fn name(&self) -> &NpcName {
        &self.name
    }

    /// Returns the NPC's race, if recorded.
    #[inline]
    pub fn race(&self) -> Option<&str> {
        self.race.as_deref()
    }

    /// Returns the NPC's class, if recorded.
    #[inline]
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Returns the NPC's alignment, if recorded.
    #[inline]
    pub fn alignment(&self) -> Option<&str> {
        self.alignment.as_deref()
    }

    /// Returns the NPC's current location, if recorded.
    #[inline]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns the NPC's description.
    #[inline]
    pub fn description(&self) -> &Description {
        &self.description
    }

    /// Returns the organizer's private notes, if any.
    #[inline]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns the public URL of the NPC's portrait, if one is attached.
    #[inline]
    pub fn portrait_url(&self) -> Option<&str> {
        self.portrait_url.as_deref()
    }

    /// Returns the NPC's ability scores.
    #[inline]
    pub fn abilities(&self) -> &AbilityScores {
        &self.abilities
    }

    /// Returns when the NPC was created.
    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the NPC was last mutated.
    #[inline]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // =========================================================================
    // Builder Methods (for construction)
    // =========================================================================

    /// Set the NPC's race.
    pub fn with_race(mut self, race: impl Into<String>) -> Self {
        self.race = Some(race.into());
        self
    }

    /// Set the NPC's class.
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Set the NPC's alignment.
    pub fn with_alignment(mut self, alignment: impl Into<String>) -> Self {
        self.alignment = Some(alignment.into());
        self
    }

    /// Set the NPC's current location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the NPC's description.
    pub fn with_description(mut self, description: Description) -> Self {
        self.description = description;
        self
    }

    /// Set the organizer's private notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Set the portrait URL.
    pub fn with_portrait_url(mut self, url: impl Into<String>) -> Self {
        self.portrait_url = Some(url.into());
        self
    }

    /// Set the NPC's ability scores.
    pub fn with_abilities(mut self, abilities: AbilityScores) -> Self {
        self.abilities = abilities;
        self
    }

    /// Set the NPC's ID (used when loading from storage).
    pub fn with_id(mut self, id: NpcId) -> Self {
        self.id = id;
        self
    }

    /// Set the NPC's timestamps (used when loading from storage).
    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    // =========================================================================
    // Mutation Methods
    // =========================================================================

    /// Rename the NPC, refreshing `updated_at`.
    pub fn set_name(&mut self, name: NpcName, now: DateTime<Utc>) {
        self.name = name;
        self.updated_at = now;
    }

    /// Set or clear the NPC's race, refreshing `updated_at`.
    pub fn set_race(&mut self, race: Option<String>, now: DateTime<Utc>) {
        self.race = race;
        self.updated_at = now;
    }

    /// Set or clear the NPC's class, refreshing `updated_at`.
    pub fn set_class_name(&mut self, class_name: Option<String>, now: DateTime<Utc>) {
        self.class_name = class_name;
        self.updated_at = now;
    }

    /// Set or clear the NPC's alignment, refreshing `updated_at`.
    pub fn set_alignment(&mut self, alignment: Option<String>, now: DateTime<Utc>) {
        self.alignment = alignment;
        self.updated_at = now;
    }

    /// Set or clear the NPC's location, refreshing `updated_at`.
    pub fn set_location(&mut self, location: Option<String>, now: DateTime<Utc>) {
        self.location = location;
        self.updated_at = now;
    }

    /// Replace the description, refreshing `updated_at`.
    pub fn set_description(&mut self, description: Description, now: DateTime<Utc>) {
        self.description = description;
        self.updated_at = now;
    }

    /// Set or clear the private notes, refreshing `updated_at`.
    pub fn set_notes(&mut self, notes: Option<String>, now: DateTime<Utc>) {
        self.notes = notes;
        self.updated_at = now;
    }

    /// Set or clear the portrait URL, refreshing `updated_at`.
    pub fn set_portrait_url(&mut self, url: Option<String>, now: DateTime<Utc>) {
        self.portrait_url = url;
        self.updated_at = now;
    }

    /// Replace the ability scores, refreshing `updated_at`.
    pub fn set_abilities(&mut self, abilities: AbilityScores, now: DateTime<Utc>) {
        self.abilities = abilities;
        self.updated_at = now;
    }
}

// ============================================================================
// Serde Implementation
// ============================================================================

/// Intermediate format for serialization that matches the wire format
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NpcWireFormat {
    id: NpcId,
    campaign_id: CampaignId,
    owner: UserId,
    name: NpcName,
    race: Option<String>,
    class_name: Option<String>,
    alignment: Option<String>,
    location: Option<String>,
    #[serde(default)]
    description: Description,
    notes: Option<String>,
    portrait_url: Option<String>,
    #[serde(default)]
    abilities: AbilityScores,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Serialize for Npc {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wire = NpcWireFormat {
            id: self.id,
            campaign_id: self.campaign_id,
            owner: self.owner,
            name: self.name.clone(),
            race: self.race.clone(),
            class_name: self.class_name.clone(),
            alignment: self.alignment.clone(),
            location: self.location.clone(),
            description: self.description.clone(),
            notes: self.notes.clone(),
            portrait_url: self.portrait_url.clone(),
            abilities: self.abilities,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Npc {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = NpcWireFormat::deserialize(deserializer)?;
        Ok(Npc {
            id: wire.id,
            campaign_id: wire.campaign_id,
            owner: wire.owner,
            name: wire.name,
            race: wire.race,
            class_name: wire.class_name,
            alignment: wire.alignment,
            location: wire.location,
            description: wire.description,
            notes: wire.notes,
            portrait_url: wire.portrait_url,
            abilities: wire.abilities,
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
    use crate::value_objects::Ability;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn later_time() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_600, 0).unwrap()
    }

    fn make_npc(name: &str) -> Npc {
        Npc::new(
            CampaignId::new(),
            UserId::new(),
            NpcName::new(name).unwrap(),
            fixed_time(),
        )
    }

    mod constructor {
        use super::*;

        #[test]
        fn new_creates_npc_with_correct_defaults() {
            let campaign_id = CampaignId::new();
            let owner = UserId::new();
            let npc = Npc::new(
                campaign_id,
                owner,
                NpcName::new("Toblen Stonehill").unwrap(),
                fixed_time(),
            );

            assert_eq!(npc.name().as_str(), "Toblen Stonehill");
            assert_eq!(npc.campaign_id(), campaign_id);
            assert!(npc.is_owned_by(owner));
            assert_eq!(npc.race(), None);
            assert_eq!(npc.class_name(), None);
            assert_eq!(npc.alignment(), None);
            assert_eq!(npc.location(), None);
            assert!(npc.description().is_empty());
            assert_eq!(npc.notes(), None);
            assert_eq!(npc.portrait_url(), None);
            assert_eq!(npc.abilities().modifier(Ability::Strength), 0);
            assert_eq!(npc.created_at(), fixed_time());
            assert_eq!(npc.updated_at(), fixed_time());
        }

        #[test]
        fn builder_methods_work() {
            let npc = make_npc("Sildar Hallwinter")
                .with_race("Human")
                .with_class_name("Fighter")
                .with_alignment("Lawful Good")
                .with_location("Phandalin")
                .with_description(Description::new("A kindhearted knight").unwrap())
                .with_notes("Secretly a Lords' Alliance agent")
                .with_portrait_url("/assets/portraits/u/sildar.png")
                .with_abilities(AbilityScores::new().with_score(Ability::Strength, 16));

            assert_eq!(npc.race(), Some("Human"));
            assert_eq!(npc.class_name(), Some("Fighter"));
            assert_eq!(npc.alignment(), Some("Lawful Good"));
            assert_eq!(npc.location(), Some("Phandalin"));
            assert_eq!(npc.description().as_str(), "A kindhearted knight");
            assert_eq!(npc.notes(), Some("Secretly a Lords' Alliance agent"));
            assert_eq!(npc.portrait_url(), Some("/assets/portraits/u/sildar.png"));
            assert_eq!(npc.abilities().modifier_display(Ability::Strength), "+3");
        }

        #[test]
        fn with_id_and_timestamps_for_hydration() {
            let id = NpcId::new();
            let npc = make_npc("Gundren")
                .with_id(id)
                .with_timestamps(fixed_time(), later_time());

            assert_eq!(npc.id(), id);
            assert_eq!(npc.created_at(), fixed_time());
            assert_eq!(npc.updated_at(), later_time());
        }
    }

    mod mutation {
        use super::*;

        #[test]
        fn set_name_refreshes_updated_at() {
            let mut npc = make_npc("Glasstaff");

            npc.set_name(NpcName::new("Iarno Albrek").unwrap(), later_time());

            assert_eq!(npc.name().as_str(), "Iarno Albrek");
            assert_eq!(npc.updated_at(), later_time());
        }

        #[test]
        fn set_location_can_clear() {
            let mut npc = make_npc("Gundren").with_location("Cragmaw Hideout");
            assert_eq!(npc.location(), Some("Cragmaw Hideout"));

            npc.set_location(None, later_time());

            assert_eq!(npc.location(), None);
            assert_eq!(npc.updated_at(), later_time());
        }

        #[test]
        fn set_abilities_replaces_the_block() {
            let mut npc = make_npc("Venomfang");

            npc.set_abilities(
                AbilityScores::new()
                    .with_score(Ability::Strength, 19)
                    .with_score(Ability::Dexterity, 10),
                later_time(),
            );

            assert_eq!(npc.abilities().modifier_display(Ability::Strength), "+4");
            assert_eq!(npc.abilities().modifier_display(Ability::Dexterity), "+0");
            assert_eq!(npc.updated_at(), later_time());
        }

        #[test]
        fn set_portrait_url_attaches_and_detaches() {
            let mut npc = make_npc("Halia");

            npc.set_portrait_url(
                Some("/assets/portraits/u/halia.webp".to_string()),
                later_time(),
            );
            assert_eq!(npc.portrait_url(), Some("/assets/portraits/u/halia.webp"));

            npc.set_portrait_url(None, later_time());
            assert_eq!(npc.portrait_url(), None);
        }
    }

    mod serde {
        use super::*;

        #[test]
        fn serialize_deserialize_roundtrip() {
            let npc = make_npc("Nezznar")
                .with_race("Drow")
                .with_class_name("Wizard")
                .with_location("Wave Echo Cave")
                .with_abilities(AbilityScores::new().with_score(Ability::Intelligence, 16));

            let json = serde_json::to_string(&npc).unwrap();
            let deserialized: Npc = serde_json::from_str(&json).unwrap();

            assert_eq!(deserialized.id(), npc.id());
            assert_eq!(deserialized.campaign_id(), npc.campaign_id());
            assert_eq!(deserialized.name().as_str(), "Nezznar");
            assert_eq!(deserialized.race(), Some("Drow"));
            assert_eq!(deserialized.location(), Some("Wave Echo Cave"));
            assert_eq!(
                deserialized.abilities().score(Ability::Intelligence),
                Some(16)
            );
        }

        #[test]
        fn wire_format_is_camel_case() {
            let npc = make_npc("Camel").with_class_name("Bard");

            let json = serde_json::to_value(&npc).unwrap();
            assert!(json.get("campaignId").is_some());
            assert!(json.get("className").is_some());
            assert!(json.get("portraitUrl").is_some());
            assert!(json.get("campaign_id").is_none());
        }

        #[test]
        fn deserializes_without_abilities_field() {
            let npc = make_npc("Sparse");
            let mut json = serde_json::to_value(&npc).unwrap();
            json.as_object_mut().unwrap().remove("abilities");
            json.as_object_mut().unwrap().remove("description");

            let deserialized: Npc = serde_json::from_value(json).unwrap();
            assert_eq!(deserialized.abilities().score(Ability::Strength), None);
            assert!(deserialized.description().is_empty());
        }
    }
}
