pub mod aggregates;
pub mod error;
pub mod ids;
pub mod roster;
pub mod value_objects;

pub use aggregates::{Campaign, Npc};
pub use error::DomainError;
pub use ids::{CampaignId, NpcId, UserId};
pub use roster::{distinct_locations, filter_npcs, LocationFilter};
pub use value_objects::{
    ability_modifier, format_modifier, Ability, AbilityScores, CampaignName, Description, NpcName,
    DEFAULT_ABILITY_SCORE,
};
