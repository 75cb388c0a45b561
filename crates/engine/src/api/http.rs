//! HTTP routes.

use axum::{
    body::Bytes,
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use folio_domain::{
    AbilityScores, Campaign, CampaignId, CampaignName, Description, DomainError, LocationFilter,
    Npc, NpcId, NpcName, UserId,
};

use crate::app::App;
use crate::infrastructure::ports::RepoError;
use crate::use_cases::{NpcDraft, PortraitError};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/campaigns", get(list_campaigns).post(create_campaign))
        .route(
            "/api/campaigns/{id}",
            get(get_campaign).put(update_campaign).delete(delete_campaign),
        )
        .route("/api/campaigns/{id}/npcs", get(list_npcs).post(create_npc))
        .route("/api/campaigns/{id}/locations", get(list_locations))
        .route(
            "/api/npcs/{id}",
            get(get_npc).put(update_npc).delete(delete_npc),
        )
        .route("/api/npcs/{id}/portrait", post(upload_portrait))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Authentication
// =============================================================================

/// The acting user, taken from the `X-User-Id` header.
///
/// A missing or malformed header rejects the request with 401 before the
/// handler runs.
pub struct CurrentUser(pub UserId);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;
        let uuid = Uuid::parse_str(raw).map_err(|_| ApiError::Unauthorized)?;
        Ok(CurrentUser(UserId::from_uuid(uuid)))
    }
}

// =============================================================================
// Campaigns
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CampaignRequest {
    name: String,
    #[serde(default)]
    description: String,
}

impl CampaignRequest {
    fn validate(self) -> Result<(CampaignName, Description), ApiError> {
        Ok((
            CampaignName::new(self.name)?,
            Description::new(self.description)?,
        ))
    }
}

async fn list_campaigns(
    State(app): State<Arc<App>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Campaign>>, ApiError> {
    let campaigns = app.use_cases.campaigns.list(user).await?;
    Ok(Json(campaigns))
}

async fn create_campaign(
    State(app): State<Arc<App>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CampaignRequest>,
) -> Result<(StatusCode, Json<Campaign>), ApiError> {
    let (name, description) = req.validate()?;
    let campaign = app.use_cases.campaigns.create(user, name, description).await?;
    Ok((StatusCode::CREATED, Json(campaign)))
}

async fn get_campaign(
    State(app): State<Arc<App>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Campaign>, ApiError> {
    let campaign = app
        .use_cases
        .campaigns
        .get(user, CampaignId::from_uuid(id))
        .await?;
    Ok(Json(campaign))
}

async fn update_campaign(
    State(app): State<Arc<App>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<CampaignRequest>,
) -> Result<Json<Campaign>, ApiError> {
    let (name, description) = req.validate()?;
    let campaign = app
        .use_cases
        .campaigns
        .update(user, CampaignId::from_uuid(id), name, description)
        .await?;
    Ok(Json(campaign))
}

async fn delete_campaign(
    State(app): State<Arc<App>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app.use_cases
        .campaigns
        .delete(user, CampaignId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// NPCs
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NpcRequest {
    name: String,
    race: Option<String>,
    class_name: Option<String>,
    alignment: Option<String>,
    location: Option<String>,
    #[serde(default)]
    description: String,
    notes: Option<String>,
    #[serde(default)]
    abilities: AbilityScores,
}

impl NpcRequest {
    fn into_draft(self) -> Result<NpcDraft, ApiError> {
        Ok(NpcDraft {
            name: NpcName::new(self.name)?,
            race: non_blank(self.race),
            class_name: non_blank(self.class_name),
            alignment: non_blank(self.alignment),
            location: non_blank(self.location),
            description: Description::new(self.description)?,
            notes: non_blank(self.notes),
            abilities: self.abilities,
        })
    }
}

/// The frontend submits cleared fields as empty strings; store them as NULL.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[derive(Deserialize)]
struct RosterQuery {
    #[serde(default)]
    location: String,
    #[serde(default)]
    search: String,
}

async fn list_npcs(
    State(app): State<Arc<App>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Query(query): Query<RosterQuery>,
) -> Result<Json<Vec<Npc>>, ApiError> {
    let filter = LocationFilter::parse(&query.location);
    let npcs = app
        .use_cases
        .npcs
        .roster(user, CampaignId::from_uuid(id), &filter, &query.search)
        .await?;
    Ok(Json(npcs))
}

async fn create_npc(
    State(app): State<Arc<App>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<NpcRequest>,
) -> Result<(StatusCode, Json<Npc>), ApiError> {
    let draft = req.into_draft()?;
    let npc = app
        .use_cases
        .npcs
        .create(user, CampaignId::from_uuid(id), draft)
        .await?;
    Ok((StatusCode::CREATED, Json(npc)))
}

async fn list_locations(
    State(app): State<Arc<App>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<String>>, ApiError> {
    let locations = app
        .use_cases
        .npcs
        .locations(user, CampaignId::from_uuid(id))
        .await?;
    Ok(Json(locations))
}

async fn get_npc(
    State(app): State<Arc<App>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Npc>, ApiError> {
    let npc = app.use_cases.npcs.get(user, NpcId::from_uuid(id)).await?;
    Ok(Json(npc))
}

async fn update_npc(
    State(app): State<Arc<App>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<NpcRequest>,
) -> Result<Json<Npc>, ApiError> {
    let draft = req.into_draft()?;
    let npc = app
        .use_cases
        .npcs
        .update(user, NpcId::from_uuid(id), draft)
        .await?;
    Ok(Json(npc))
}

async fn delete_npc(
    State(app): State<Arc<App>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app.use_cases.npcs.delete(user, NpcId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
struct PortraitQuery {
    filename: String,
}

async fn upload_portrait(
    State(app): State<Arc<App>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Query(query): Query<PortraitQuery>,
    body: Bytes,
) -> Result<Json<Npc>, ApiError> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("Portrait body is empty".to_string()));
    }
    let npc = app
        .use_cases
        .npcs
        .attach_portrait(user, NpcId::from_uuid(id), &query.filename, &body)
        .await?;
    Ok(Json(npc))
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    NotFound,
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Missing or invalid X-User-Id".to_string())
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        if e.is_not_found() {
            ApiError::NotFound
        } else {
            ApiError::Internal(e.to_string())
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<PortraitError> for ApiError {
    fn from(e: PortraitError) -> Self {
        match e {
            PortraitError::Repo(e) => e.into(),
            PortraitError::Asset(e) => ApiError::BadRequest(e.to_string()),
        }
    }
}
