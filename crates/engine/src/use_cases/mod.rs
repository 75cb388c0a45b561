//! Use cases - application operations composed from ports.

pub mod campaigns;
pub mod npcs;

pub use campaigns::CampaignUseCases;
pub use npcs::{NpcDraft, NpcUseCases, PortraitError};
