mod models;
mod service;
mod config;
mod dtos;
mod error;
mod db;
mod utils;
mod middleware;
mod handler;
mod routes;

use std::sync::Arc;

use anyhow::Context;
use axum::http::{header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE}, HeaderValue, Method};
use config::{Config, DataSource};
use db::{DBClient, MemoryStore, Repository};
use dotenv::dotenv;
use models::listingmodel::{Listing, MAX_MONTHLY_RENT};
use routes::create_router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

use service::{
    booking_service::BookingService,
    negotiation_service::NegotiationService,
    payment_service::PaymentService,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub repo: Arc<dyn Repository>,
    // Services
    pub negotiation_service: Arc<NegotiationService>,
    pub booking_service: Arc<BookingService>,
    pub payment_service: Arc<PaymentService>,
}

impl AppState {
    pub fn new(repo: Arc<dyn Repository>, config: Config) -> Self {
        let negotiation_service = Arc::new(NegotiationService::new(
            repo.clone(),
            config.negotiation_ttl_hours,
        ));
        let booking_service = Arc::new(BookingService::new(
            repo.clone(),
            config.security_deposit,
        ));
        let payment_service = Arc::new(PaymentService::new(repo.clone()));

        Self {
            env: config,
            repo,
            negotiation_service,
            booking_service,
            payment_service,
        }
    }
}

async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn Repository>> {
    match config.data_source {
        DataSource::Memory => {
            let Some(path) = &config.fixtures_path else {
                tracing::info!("using empty in-memory store");
                return Ok(Arc::new(MemoryStore::new()));
            };

            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading fixtures from {}", path))?;
            let listings = serde_json::from_str::<Vec<Listing>>(&raw)
                .with_context(|| format!("parsing fixtures in {}", path))?;
            if let Some(bad) = listings.iter().find(|l| !(1..=MAX_MONTHLY_RENT).contains(&l.price)) {
                anyhow::bail!("fixture listing {} has price {} outside 1..={}", bad.id, bad.price, MAX_MONTHLY_RENT);
            }

            tracing::info!(listings = listings.len(), "using in-memory store");
            Ok(Arc::new(MemoryStore::with_listings(listings)))
        }
        DataSource::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set when DATA_SOURCE=postgres")?;

            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await
                .context("connecting to the database")?;
            tracing::info!("✅ Connection to the database is successful!");

            let db_client = DBClient::new(pool);
            db_client.migrate().await.context("running migrations")?;
            Ok(Arc::new(db_client))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::DEBUG.into())
                .from_env_lossy(),
        )
        .init();

    dotenv().ok();

    let config = Config::init();

    let repo = open_store(&config).await?;

    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH]);

    let app_state = Arc::new(AppState::new(repo, config.clone()));

    let app = create_router(app_state).layer(cors);

    tracing::info!("🚀 Server is running on http://localhost:{}", config.port);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port))
        .await
        .context("binding listener")?;

    axum::serve(listener, app).await?;
    Ok(())
}
