//! Roster queries - location filtering and text search over NPC collections
//!
//! Pure functions over slices of NPCs. Both filters preserve the input
//! order, so whatever ordering the caller established (creation order from
//! storage) survives filtering.

use std::collections::BTreeSet;

use crate::aggregates::Npc;

/// Reserved query token that selects NPCs with no location.
const UNASSIGNED_TOKEN: &str = "none";

/// Reserved query token that disables location filtering.
const ALL_TOKEN: &str = "all";

/// A location-based filter over a campaign's roster
///
/// The `At` variant matches the stored location exactly, case-sensitive:
/// "Phandalin" and "phandalin" are two different places as far as the
/// filter is concerned. Text search (see [`filter_npcs`]) is the
/// case-insensitive side of the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationFilter {
    /// No location filtering; every NPC passes.
    All,
    /// Only NPCs with no recorded location (or a blank one).
    Unassigned,
    /// Only NPCs whose location equals the given string exactly.
    At(String),
}

impl LocationFilter {
    /// Parse a filter from its query-string form.
    ///
    /// `"all"` (or an empty string) means no filtering, `"none"` selects
    /// unassigned NPCs, and anything else is an exact location. The two
    /// reserved tokens are matched exactly; a place literally named
    /// `"None"` is reachable because the token comparison is
    /// case-sensitive.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "" | ALL_TOKEN => LocationFilter::All,
            UNASSIGNED_TOKEN => LocationFilter::Unassigned,
            other => LocationFilter::At(other.to_string()),
        }
    }

    /// Returns true if the given NPC passes this filter.
    pub fn matches(&self, npc: &Npc) -> bool {
        match self {
            LocationFilter::All => true,
            LocationFilter::Unassigned => !has_location(npc),
            LocationFilter::At(place) => npc.location() == Some(place.as_str()),
        }
    }
}

/// An NPC with a blank location string counts as unassigned.
fn has_location(npc: &Npc) -> bool {
    npc.location().is_some_and(|loc| !loc.is_empty())
}

/// Filter a roster by location and free-text search, preserving order.
///
/// The search query is matched case-insensitively as a substring against
/// the NPC's name, race, class, and location; a blank query passes every
/// NPC. The location filter and the search query compose with AND.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use folio_domain::{filter_npcs, CampaignId, LocationFilter, Npc, NpcName, UserId};
///
/// let campaign = CampaignId::new();
/// let owner = UserId::new();
/// let now = Utc::now();
/// let roster = vec![
///     Npc::new(campaign, owner, NpcName::new("Gundren Rockseeker").unwrap(), now)
///         .with_race("Dwarf")
///         .with_location("Phandalin"),
///     Npc::new(campaign, owner, NpcName::new("Nezznar").unwrap(), now).with_race("Drow"),
/// ];
///
/// let hits = filter_npcs(&roster, &LocationFilter::All, "dwarf");
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].name().as_str(), "Gundren Rockseeker");
/// ```
pub fn filter_npcs<'a>(npcs: &'a [Npc], location: &LocationFilter, query: &str) -> Vec<&'a Npc> {
    // Whitespace only decides whether search applies at all; a non-blank
    // query is matched verbatim, padding included.
    let blank = query.trim().is_empty();
    let needle = query.to_lowercase();
    npcs.iter()
        .filter(|npc| location.matches(npc))
        .filter(|npc| blank || matches_query(npc, &needle))
        .collect()
}

/// `needle` must already be lowercased.
fn matches_query(npc: &Npc, needle: &str) -> bool {
    let fields = [
        Some(npc.name().as_str()),
        npc.race(),
        npc.class_name(),
        npc.location(),
    ];
    fields
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Collect the distinct non-blank locations of a roster, sorted.
///
/// Used to build the location dropdown: each place appears once no matter
/// how many NPCs live there, and unassigned NPCs contribute nothing.
pub fn distinct_locations(npcs: &[Npc]) -> Vec<String> {
    let set: BTreeSet<&str> = npcs
        .iter()
        .filter_map(|npc| npc.location())
        .filter(|loc| !loc.is_empty())
        .collect();
    set.into_iter().map(String::from).collect()
}

// ============================================================================
// Tests
// ============================================================================
