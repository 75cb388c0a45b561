//! NPC use cases.
//!
//! Ownership is enforced the same way as for campaigns: an NPC the acting
//! user does not own reads as NotFound. Roster filtering delegates to the
//! pure functions in the domain crate.

use std::sync::Arc;

use folio_domain::{
    distinct_locations, filter_npcs, AbilityScores, CampaignId, Description, LocationFilter, Npc,
    NpcId, NpcName, UserId,
};

use crate::infrastructure::ports::{
    AssetStoreError, AssetStorePort, CampaignRepo, ClockPort, NpcRepo, RepoError,
};

/// Error type for portrait uploads, which cross two ports.
#[derive(Debug, thiserror::Error)]
pub enum PortraitError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Asset(#[from] AssetStoreError),
}

/// The mutable fields of an NPC, as submitted by the organizer.
///
/// Used for both create and update; an update replaces all of these at
/// once (the portrait is managed separately via [`NpcUseCases::attach_portrait`]).
pub struct NpcDraft {
    pub name: NpcName,
    pub race: Option<String>,
    pub class_name: Option<String>,
    pub alignment: Option<String>,
    pub location: Option<String>,
    pub description: Description,
    pub notes: Option<String>,
    pub abilities: AbilityScores,
}

/// NPC CRUD and roster queries scoped to the acting user.
pub struct NpcUseCases {
    npc_repo: Arc<dyn NpcRepo>,
    campaign_repo: Arc<dyn CampaignRepo>,
    assets: Arc<dyn AssetStorePort>,
    clock: Arc<dyn ClockPort>,
}

impl NpcUseCases {
    pub fn new(
        npc_repo: Arc<dyn NpcRepo>,
        campaign_repo: Arc<dyn CampaignRepo>,
        assets: Arc<dyn AssetStorePort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            npc_repo,
            campaign_repo,
            assets,
            clock,
        }
    }

    /// Create an NPC in one of the user's campaigns.
    pub async fn create(
        &self,
        user: UserId,
        campaign_id: CampaignId,
        draft: NpcDraft,
    ) -> Result<Npc, RepoError> {
        self.check_campaign_owned(user, campaign_id).await?;

        let mut npc = Npc::new(campaign_id, user, draft.name, self.clock.now())
            .with_description(draft.description)
            .with_abilities(draft.abilities);
        if let Some(race) = draft.race {
            npc = npc.with_race(race);
        }
        if let Some(class_name) = draft.class_name {
            npc = npc.with_class_name(class_name);
        }
        if let Some(alignment) = draft.alignment {
            npc = npc.with_alignment(alignment);
        }
        if let Some(location) = draft.location {
            npc = npc.with_location(location);
        }
        if let Some(notes) = draft.notes {
            npc = npc.with_notes(notes);
        }

        self.npc_repo.save(&npc).await?;
        tracing::info!(npc_id = %npc.id(), campaign_id = %campaign_id, "Created NPC");
        Ok(npc)
    }

    /// Get one of the user's NPCs.
    pub async fn get(&self, user: UserId, id: NpcId) -> Result<Npc, RepoError> {
        self.get_owned(user, id).await
    }

    /// Replace the mutable fields of one of the user's NPCs.
    ///
    /// The portrait URL is untouched; it only changes through
    /// [`Self::attach_portrait`].
    pub async fn update(
        &self,
        user: UserId,
        id: NpcId,
        draft: NpcDraft,
    ) -> Result<Npc, RepoError> {
        let mut npc = self.get_owned(user, id).await?;
        let now = self.clock.now();

        npc.set_name(draft.name, now);
        npc.set_race(draft.race, now);
        npc.set_class_name(draft.class_name, now);
        npc.set_alignment(draft.alignment, now);
        npc.set_location(draft.location, now);
        npc.set_description(draft.description, now);
        npc.set_notes(draft.notes, now);
        npc.set_abilities(draft.abilities, now);

        self.npc_repo.save(&npc).await?;
        Ok(npc)
    }

    /// Delete one of the user's NPCs.
    pub async fn delete(&self, user: UserId, id: NpcId) -> Result<(), RepoError> {
        self.get_owned(user, id).await?;
        self.npc_repo.delete(id).await?;
        tracing::info!(npc_id = %id, "Deleted NPC");
        Ok(())
    }

    /// The campaign's roster, filtered by location and search text.
    ///
    /// NPCs come back in creation order; filtering preserves it.
    pub async fn roster(
        &self,
        user: UserId,
        campaign_id: CampaignId,
        location: &LocationFilter,
        search: &str,
    ) -> Result<Vec<Npc>, RepoError> {
        self.check_campaign_owned(user, campaign_id).await?;
        let all = self.npc_repo.list_in_campaign(campaign_id).await?;
        Ok(filter_npcs(&all, location, search)
            .into_iter()
            .cloned()
            .collect())
    }

    /// The distinct locations used by the campaign's NPCs, sorted.
    pub async fn locations(
        &self,
        user: UserId,
        campaign_id: CampaignId,
    ) -> Result<Vec<String>, RepoError> {
        self.check_campaign_owned(user, campaign_id).await?;
        let all = self.npc_repo.list_in_campaign(campaign_id).await?;
        Ok(distinct_locations(&all))
    }

    /// Store an uploaded portrait and point the NPC at it.
    pub async fn attach_portrait(
        &self,
        user: UserId,
        id: NpcId,
        filename: &str,
        bytes: &[u8],
    ) -> Result<Npc, PortraitError> {
        let mut npc = self.get_owned(user, id).await?;
        let url = self.assets.store_portrait(user, filename, bytes).await?;
        npc.set_portrait_url(Some(url), self.clock.now());
        self.npc_repo.save(&npc).await?;
        Ok(npc)
    }

    async fn get_owned(&self, user: UserId, id: NpcId) -> Result<Npc, RepoError> {
        let npc = self
            .npc_repo
            .get(id)
            .await?
            .ok_or_else(|| RepoError::not_found("Npc", id))?;
        if !npc.is_owned_by(user) {
            return Err(RepoError::not_found("Npc", id));
        }
        Ok(npc)
    }

    async fn check_campaign_owned(
        &self,
        user: UserId,
        campaign_id: CampaignId,
    ) -> Result<(), RepoError> {
        let campaign = self
            .campaign_repo
            .get(campaign_id)
            .await?
            .ok_or_else(|| RepoError::not_found("Campaign", campaign_id))?;
        if !campaign.is_owned_by(user) {
            return Err(RepoError::not_found("Campaign", campaign_id));
        }
        Ok(())
    }
}
