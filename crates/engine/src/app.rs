//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::ports::{AssetStorePort, CampaignRepo, ClockPort, NpcRepo};
use crate::use_cases::{CampaignUseCases, NpcUseCases};

/// Main application state.
///
/// Holds all use cases. Passed to HTTP handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub campaigns: CampaignUseCases,
    pub npcs: NpcUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        campaign_repo: Arc<dyn CampaignRepo>,
        npc_repo: Arc<dyn NpcRepo>,
        assets: Arc<dyn AssetStorePort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            use_cases: UseCases {
                campaigns: CampaignUseCases::new(campaign_repo.clone(), clock.clone()),
                npcs: NpcUseCases::new(npc_repo, campaign_repo, assets, clock),
            },
        }
    }
}
