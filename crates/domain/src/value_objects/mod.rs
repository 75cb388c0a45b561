//! Value objects - immutable, validated domain values

mod ability;
mod names;

pub use ability::{ability_modifier, format_modifier, Ability, AbilityScores, DEFAULT_ABILITY_SCORE};
pub use names::{CampaignName, Description, NpcName};
