//! SQLite-backed NPC storage.
//!
//! Ability scores are stored as six nullable INTEGER columns rather than a
//! JSON blob so they stay queryable from the sqlite3 shell.

use async_trait::async_trait;
use folio_domain::{
    Ability, AbilityScores, CampaignId, Description, Npc, NpcId, NpcName, UserId,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{parse_timestamp, parse_uuid};
use crate::infrastructure::ports::{NpcRepo, RepoError};

/// SQLite implementation of [`NpcRepo`].
pub struct SqliteNpcRepo {
    pool: SqlitePool,
}

impl SqliteNpcRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(row: &SqliteRow, operation: &'static str) -> Result<Npc, RepoError> {
        let id: String = row.get("id");
        let campaign_id: String = row.get("campaign_id");
        let owner: String = row.get("owner");
        let name: String = row.get("name");
        let description: String = row.get("description");
        let created_at: String = row.get("created_at");
        let updated_at: String = row.get("updated_at");

        let name = NpcName::new(name).map_err(RepoError::serialization)?;
        let description = Description::new(description).map_err(RepoError::serialization)?;

        let mut abilities = AbilityScores::new();
        abilities.set(Ability::Strength, row.get("strength"));
        abilities.set(Ability::Dexterity, row.get("dexterity"));
        abilities.set(Ability::Constitution, row.get("constitution"));
        abilities.set(Ability::Intelligence, row.get("intelligence"));
        abilities.set(Ability::Wisdom, row.get("wisdom"));
        abilities.set(Ability::Charisma, row.get("charisma"));

        let mut npc = Npc::new(
            CampaignId::from_uuid(parse_uuid(&campaign_id, operation)?),
            UserId::from_uuid(parse_uuid(&owner, operation)?),
            name,
            parse_timestamp(&created_at, operation)?,
        )
        .with_description(description)
        .with_abilities(abilities)
        .with_id(NpcId::from_uuid(parse_uuid(&id, operation)?))
        .with_timestamps(
            parse_timestamp(&created_at, operation)?,
            parse_timestamp(&updated_at, operation)?,
        );

        // Optional descriptors; the builder methods wrap in Some, so only
        // apply them when the column is non-null.
        if let Some(race) = row.get::<Option<String>, _>("race") {
            npc = npc.with_race(race);
        }
        if let Some(class_name) = row.get::<Option<String>, _>("class_name") {
            npc = npc.with_class_name(class_name);
        }
        if let Some(alignment) = row.get::<Option<String>, _>("alignment") {
            npc = npc.with_alignment(alignment);
        }
        if let Some(location) = row.get::<Option<String>, _>("location") {
            npc = npc.with_location(location);
        }
        if let Some(notes) = row.get::<Option<String>, _>("notes") {
            npc = npc.with_notes(notes);
        }
        if let Some(portrait_url) = row.get::<Option<String>, _>("portrait_url") {
            npc = npc.with_portrait_url(portrait_url);
        }

        Ok(npc)
    }
}

#[async_trait]
impl NpcRepo for SqliteNpcRepo {
    async fn get(&self, id: NpcId) -> Result<Option<Npc>, RepoError> {
        let row = sqlx::query("SELECT * FROM npcs WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("npc_get", e))?;

        row.map(|r| Self::from_row(&r, "npc_get")).transpose()
    }

    async fn save(&self, npc: &Npc) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO npcs (
                id, campaign_id, owner, name, race, class_name, alignment,
                location, description, notes, portrait_url,
                strength, dexterity, constitution, intelligence, wisdom, charisma,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                race = excluded.race,
                class_name = excluded.class_name,
                alignment = excluded.alignment,
                location = excluded.location,
                description = excluded.description,
                notes = excluded.notes,
                portrait_url = excluded.portrait_url,
                strength = excluded.strength,
                dexterity = excluded.dexterity,
                constitution = excluded.constitution,
                intelligence = excluded.intelligence,
                wisdom = excluded.wisdom,
                charisma = excluded.charisma,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(npc.id().to_string())
        .bind(npc.campaign_id().to_string())
        .bind(npc.owner().to_string())
        .bind(npc.name().as_str())
        .bind(npc.race())
        .bind(npc.class_name())
        .bind(npc.alignment())
        .bind(npc.location())
        .bind(npc.description().as_str())
        .bind(npc.notes())
        .bind(npc.portrait_url())
        .bind(npc.abilities().score(Ability::Strength))
        .bind(npc.abilities().score(Ability::Dexterity))
        .bind(npc.abilities().score(Ability::Constitution))
        .bind(npc.abilities().score(Ability::Intelligence))
        .bind(npc.abilities().score(Ability::Wisdom))
        .bind(npc.abilities().score(Ability::Charisma))
        .bind(npc.created_at().to_rfc3339())
        .bind(npc.updated_at().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("npc_save", e))?;

        Ok(())
    }

    async fn delete(&self, id: NpcId) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM npcs WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("npc_delete", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Npc", id));
        }

        Ok(())
    }

    async fn list_in_campaign(&self, campaign_id: CampaignId) -> Result<Vec<Npc>, RepoError> {
        let rows = sqlx::query("SELECT * FROM npcs WHERE campaign_id = ? ORDER BY created_at ASC")
            .bind(campaign_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("npc_list", e))?;

        rows.iter().map(|r| Self::from_row(r, "npc_list")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::test_support::test_pool;
    use crate::infrastructure::persistence::SqliteCampaignRepo;
    use crate::infrastructure::ports::CampaignRepo;
    use chrono::{TimeZone, Utc};
    use folio_domain::{Campaign, CampaignName};

    async fn seeded_campaign(pool: &SqlitePool, owner: UserId) -> Campaign {
        let campaign = Campaign::new(
            owner,
            CampaignName::new("Lost Mine of Phandelver").unwrap(),
            Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        );
        SqliteCampaignRepo::new(pool.clone())
            .save(&campaign)
            .await
            .unwrap();
        campaign
    }

    fn npc(campaign: &Campaign, name: &str, secs: i64) -> Npc {
        Npc::new(
            campaign.id(),
            campaign.owner(),
            NpcName::new(name).unwrap(),
            Utc.timestamp_opt(secs, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn save_and_get_roundtrip_with_all_fields() {
        let dir = tempfile::tempdir().unwrap();
        let pool = test_pool(&dir).await;
        let owner = UserId::new();
        let campaign = seeded_campaign(&pool, owner).await;
        let repo = SqliteNpcRepo::new(pool);

        let saved = npc(&campaign, "Sildar Hallwinter", 1_700_000_100)
            .with_race("Human")
            .with_class_name("Fighter")
            .with_alignment("Lawful Good")
            .with_location("Phandalin")
            .with_description(Description::new("A kindhearted knight").unwrap())
            .with_notes("Lords' Alliance agent")
            .with_portrait_url("/assets/portraits/u/sildar.png")
            .with_abilities(
                AbilityScores::new()
                    .with_score(Ability::Strength, 16)
                    .with_score(Ability::Dexterity, 8),
            );
        repo.save(&saved).await.unwrap();

        let loaded = repo.get(saved.id()).await.unwrap().unwrap();
        assert_eq!(loaded.name().as_str(), "Sildar Hallwinter");
        assert_eq!(loaded.campaign_id(), campaign.id());
        assert_eq!(loaded.owner(), owner);
        assert_eq!(loaded.race(), Some("Human"));
        assert_eq!(loaded.class_name(), Some("Fighter"));
        assert_eq!(loaded.alignment(), Some("Lawful Good"));
        assert_eq!(loaded.location(), Some("Phandalin"));
        assert_eq!(loaded.notes(), Some("Lords' Alliance agent"));
        assert_eq!(loaded.portrait_url(), Some("/assets/portraits/u/sildar.png"));
        assert_eq!(loaded.abilities().score(Ability::Strength), Some(16));
        assert_eq!(loaded.abilities().score(Ability::Dexterity), Some(8));
        assert_eq!(loaded.abilities().score(Ability::Charisma), None);
    }

    #[tokio::test]
    async fn sparse_npc_roundtrips_with_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let pool = test_pool(&dir).await;
        let campaign = seeded_campaign(&pool, UserId::new()).await;
        let repo = SqliteNpcRepo::new(pool);

        let saved = npc(&campaign, "Mysterious Stranger", 1_700_000_100);
        repo.save(&saved).await.unwrap();

        let loaded = repo.get(saved.id()).await.unwrap().unwrap();
        assert_eq!(loaded.race(), None);
        assert_eq!(loaded.location(), None);
        assert_eq!(loaded.portrait_url(), None);
        assert!(loaded.description().is_empty());
        assert_eq!(loaded.abilities().modifier(Ability::Strength), 0);
    }

    #[tokio::test]
    async fn list_in_campaign_is_creation_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let pool = test_pool(&dir).await;
        let campaign = seeded_campaign(&pool, UserId::new()).await;
        let repo = SqliteNpcRepo::new(pool);

        repo.save(&npc(&campaign, "Second", 1_700_000_200)).await.unwrap();
        repo.save(&npc(&campaign, "First", 1_700_000_100)).await.unwrap();
        repo.save(&npc(&campaign, "Third", 1_700_000_300)).await.unwrap();

        let roster = repo.list_in_campaign(campaign.id()).await.unwrap();
        let names: Vec<&str> = roster.iter().map(|n| n.name().as_str()).collect();
        assert_eq!(names, ["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn upsert_replaces_mutable_fields() {
        let dir = tempfile::tempdir().unwrap();
        let pool = test_pool(&dir).await;
        let campaign = seeded_campaign(&pool, UserId::new()).await;
        let repo = SqliteNpcRepo::new(pool);

        let mut saved = npc(&campaign, "Gundren Rockseeker", 1_700_000_100)
            .with_location("Phandalin");
        repo.save(&saved).await.unwrap();

        saved.set_location(
            Some("Cragmaw Hideout".to_string()),
            Utc.timestamp_opt(1_700_000_600, 0).unwrap(),
        );
        repo.save(&saved).await.unwrap();

        let loaded = repo.get(saved.id()).await.unwrap().unwrap();
        assert_eq!(loaded.location(), Some("Cragmaw Hideout"));
        assert_eq!(loaded.updated_at(), saved.updated_at());
    }

    #[tokio::test]
    async fn campaign_delete_cascades_to_npcs() {
        let dir = tempfile::tempdir().unwrap();
        let pool = test_pool(&dir).await;
        let campaign = seeded_campaign(&pool, UserId::new()).await;
        let campaign_repo = SqliteCampaignRepo::new(pool.clone());
        let repo = SqliteNpcRepo::new(pool);

        let orphan_to_be = npc(&campaign, "Toblen Stonehill", 1_700_000_100);
        repo.save(&orphan_to_be).await.unwrap();

        campaign_repo.delete(campaign.id()).await.unwrap();

        assert!(repo.get(orphan_to_be.id()).await.unwrap().is_none());
        assert!(repo
            .list_in_campaign(campaign.id())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let pool = test_pool(&dir).await;
        seeded_campaign(&pool, UserId::new()).await;
        let repo = SqliteNpcRepo::new(pool);

        let err = repo.delete(NpcId::new()).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
