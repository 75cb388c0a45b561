//! SQLite-backed campaign storage.

use async_trait::async_trait;
use folio_domain::{Campaign, CampaignId, CampaignName, Description, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{parse_timestamp, parse_uuid};
use crate::infrastructure::ports::{CampaignRepo, RepoError};

/// SQLite implementation of [`CampaignRepo`].
pub struct SqliteCampaignRepo {
    pool: SqlitePool,
}

impl SqliteCampaignRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(row: &SqliteRow, operation: &'static str) -> Result<Campaign, RepoError> {
        let id: String = row.get("id");
        let owner: String = row.get("owner");
        let name: String = row.get("name");
        let description: String = row.get("description");
        let created_at: String = row.get("created_at");
        let updated_at: String = row.get("updated_at");

        let name = CampaignName::new(name).map_err(RepoError::serialization)?;
        let description = Description::new(description).map_err(RepoError::serialization)?;

        let campaign = Campaign::new(
            UserId::from_uuid(parse_uuid(&owner, operation)?),
            name,
            parse_timestamp(&created_at, operation)?,
        )
        .with_description(description)
        .with_id(CampaignId::from_uuid(parse_uuid(&id, operation)?))
        .with_timestamps(
            parse_timestamp(&created_at, operation)?,
            parse_timestamp(&updated_at, operation)?,
        );

        Ok(campaign)
    }
}

#[async_trait]
impl CampaignRepo for SqliteCampaignRepo {
    async fn get(&self, id: CampaignId) -> Result<Option<Campaign>, RepoError> {
        let row = sqlx::query("SELECT * FROM campaigns WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("campaign_get", e))?;

        row.map(|r| Self::from_row(&r, "campaign_get")).transpose()
    }

    async fn save(&self, campaign: &Campaign) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO campaigns (id, owner, name, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(campaign.id().to_string())
        .bind(campaign.owner().to_string())
        .bind(campaign.name().as_str())
        .bind(campaign.description().as_str())
        .bind(campaign.created_at().to_rfc3339())
        .bind(campaign.updated_at().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("campaign_save", e))?;

        Ok(())
    }

    async fn delete(&self, id: CampaignId) -> Result<(), RepoError> {
        // Explicit cascade in one transaction; the FK clause is the backstop.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("campaign_delete", e))?;

        sqlx::query("DELETE FROM npcs WHERE campaign_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("campaign_delete", e))?;

        let result = sqlx::query("DELETE FROM campaigns WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("campaign_delete", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Campaign", id));
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("campaign_delete", e))?;

        Ok(())
    }

    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Campaign>, RepoError> {
        let rows = sqlx::query("SELECT * FROM campaigns WHERE owner = ? ORDER BY created_at DESC")
            .bind(owner.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("campaign_list", e))?;

        rows.iter()
            .map(|r| Self::from_row(r, "campaign_list"))
            .collect()
    }
}
