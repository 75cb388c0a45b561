//! Folio Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::header::HeaderName;
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod app;
mod infrastructure;
mod use_cases;

use app::App;
use infrastructure::{
    assets::LocalAssetStore,
    clock::SystemClock,
    persistence::{self, SqliteCampaignRepo, SqliteNpcRepo},
    ports::{AssetStorePort, CampaignRepo, ClockPort, NpcRepo},
};

/// URL prefix portraits are served from.
const PORTRAIT_BASE: &str = "/assets/portraits";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine may run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Folio Engine");

    // Load configuration
    let db_path = std::env::var("FOLIO_DB").unwrap_or_else(|_| "folio.db".into());
    let asset_dir = std::env::var("FOLIO_ASSET_DIR").unwrap_or_else(|_| "portraits".into());
    let server_host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let server_port: u16 = std::env::var("SERVER_PORT")
        .or_else(|_| std::env::var("PORT"))
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .unwrap_or(3000);

    // Connect to SQLite and ensure the schema exists
    tracing::info!("Opening database at {}", db_path);
    let pool = persistence::connect(&db_path).await?;
    persistence::ensure_schema(&pool).await?;

    // Wire up infrastructure
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
    let campaign_repo: Arc<dyn CampaignRepo> = Arc::new(SqliteCampaignRepo::new(pool.clone()));
    let npc_repo: Arc<dyn NpcRepo> = Arc::new(SqliteNpcRepo::new(pool));
    let assets: Arc<dyn AssetStorePort> = Arc::new(LocalAssetStore::new(
        &asset_dir,
        PORTRAIT_BASE,
        clock.clone(),
    ));

    // Create application
    let app = Arc::new(App::new(campaign_repo, npc_repo, assets, clock));

    // Build router
    let mut router = api::http::routes()
        .with_state(app)
        .nest_service(PORTRAIT_BASE, ServeDir::new(&asset_dir))
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer_from_env() {
        router = router.layer(cors);
    }

    // Start server
    let addr: SocketAddr = format!("{server_host}:{server_port}").parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer_from_env() -> Option<CorsLayer> {
    let allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let Some(allowed_origins) = allowed_origins else {
        return None;
    };

    let mut cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        // The frontend sends X-User-Id and JSON content types which trigger CORS preflights.
        .allow_headers([
            HeaderName::from_static("x-user-id"),
            axum::http::header::CONTENT_TYPE,
        ]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
