//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Database access (could swap SQLite -> Postgres)
//! - Portrait storage (could swap local disk -> object storage)
//! - Clock (for testing)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_domain::{Campaign, CampaignId, Npc, NpcId, UserId};

// =============================================================================
// Error Types
// =============================================================================

/// Repository operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Entity not found - includes entity type and ID for actionable error messages.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Database operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepoError {
    /// Create a NotFound error with entity type and ID context.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Portrait storage errors.
#[derive(Debug, thiserror::Error)]
pub enum AssetStoreError {
    #[error("Asset I/O error in {operation}: {message}")]
    Io {
        operation: &'static str,
        message: String,
    },
    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),
}

impl AssetStoreError {
    pub fn io(operation: &'static str, message: impl ToString) -> Self {
        Self::Io {
            operation,
            message: message.to_string(),
        }
    }
}

// =============================================================================
// Clock Port (for testing)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

// =============================================================================
// Database Ports (one per entity type)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CampaignRepo: Send + Sync {
    // CRUD
    async fn get(&self, id: CampaignId) -> Result<Option<Campaign>, RepoError>;
    async fn save(&self, campaign: &Campaign) -> Result<(), RepoError>;
    /// Delete a campaign and every NPC that belongs to it.
    async fn delete(&self, id: CampaignId) -> Result<(), RepoError>;

    // Queries
    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Campaign>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NpcRepo: Send + Sync {
    // CRUD
    async fn get(&self, id: NpcId) -> Result<Option<Npc>, RepoError>;
    async fn save(&self, npc: &Npc) -> Result<(), RepoError>;
    async fn delete(&self, id: NpcId) -> Result<(), RepoError>;

    // Queries
    async fn list_in_campaign(&self, campaign_id: CampaignId) -> Result<Vec<Npc>, RepoError>;
}

// =============================================================================
// Portrait Storage Port
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetStorePort: Send + Sync {
    /// Store portrait bytes under the owner's namespace.
    ///
    /// `filename` is the upload's original name; only its extension is kept.
    /// Returns the public URL the stored portrait is served from.
    async fn store_portrait(
        &self,
        owner: UserId,
        filename: &str,
        bytes: &[u8],
    ) -> Result<String, AssetStoreError>;
}
