//! Campaign use cases.
//!
//! Every operation takes the acting user and refuses to reveal whether a
//! campaign exists when it belongs to someone else: ownership failures
//! surface as NotFound, exactly like a row the caller cannot see.

use std::sync::Arc;

use folio_domain::{Campaign, CampaignId, CampaignName, Description, UserId};

use crate::infrastructure::ports::{CampaignRepo, ClockPort, RepoError};

/// Campaign CRUD scoped to the acting user.
pub struct CampaignUseCases {
    campaign_repo: Arc<dyn CampaignRepo>,
    clock: Arc<dyn ClockPort>,
}

impl CampaignUseCases {
    pub fn new(campaign_repo: Arc<dyn CampaignRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            campaign_repo,
            clock,
        }
    }

    /// List the user's campaigns, newest first.
    pub async fn list(&self, user: UserId) -> Result<Vec<Campaign>, RepoError> {
        self.campaign_repo.list_for_owner(user).await
    }

    /// Create a campaign owned by the user.
    pub async fn create(
        &self,
        user: UserId,
        name: CampaignName,
        description: Description,
    ) -> Result<Campaign, RepoError> {
        let campaign = Campaign::new(user, name, self.clock.now()).with_description(description);
        self.campaign_repo.save(&campaign).await?;
        tracing::info!(campaign_id = %campaign.id(), owner = %user, "Created campaign");
        Ok(campaign)
    }

    /// Get one of the user's campaigns.
    pub async fn get(&self, user: UserId, id: CampaignId) -> Result<Campaign, RepoError> {
        self.get_owned(user, id).await
    }

    /// Rename and re-describe one of the user's campaigns.
    pub async fn update(
        &self,
        user: UserId,
        id: CampaignId,
        name: CampaignName,
        description: Description,
    ) -> Result<Campaign, RepoError> {
        let mut campaign = self.get_owned(user, id).await?;
        let now = self.clock.now();
        campaign.set_name(name, now);
        campaign.set_description(description, now);
        self.campaign_repo.save(&campaign).await?;
        Ok(campaign)
    }

    /// Delete one of the user's campaigns along with its NPCs.
    pub async fn delete(&self, user: UserId, id: CampaignId) -> Result<(), RepoError> {
        // Ownership check first so a foreign ID deletes nothing.
        self.get_owned(user, id).await?;
        self.campaign_repo.delete(id).await?;
        tracing::info!(campaign_id = %id, owner = %user, "Deleted campaign");
        Ok(())
    }

    async fn get_owned(
        &self,
        user: UserId,
        id: CampaignId,
    ) -> Result<Campaign, RepoError> {
        let campaign = self
            .campaign_repo
            .get(id)
            .await?
            .ok_or_else(|| RepoError::not_found("Campaign", id))?;
        if !campaign.is_owned_by(user) {
            return Err(RepoError::not_found("Campaign", id));
        }
        Ok(campaign)
    }
}
