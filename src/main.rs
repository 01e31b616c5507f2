//! Naina - conversational shopping assistant backend.
//!
//! Boots configuration, the database pool, the Shopify sync engine, the
//! vendor gateway, and the HTTP API.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use naina::adapters::ai::{CohereConfig, CohereProvider, GroqConfig, GroqProvider};
use naina::adapters::http::{chat_router, ChatAppState};
use naina::adapters::postgres::{PostgresConversationStore, PostgresProductStore};
use naina::adapters::shopify::{DisabledCatalogClient, ShopifyClient, ShopifyClientConfig};
use naina::adapters::{KeywordIntentDetector, StoreKnowledgeAggregator};
use naina::application::{
    AiGateway, CatalogSyncEngine, ConversationOrchestrator, ProductSearchService, SyncState,
};
use naina::config::AppConfig;
use naina::ports::{AiProvider, ConversationStore, ProductStore, RemoteCatalogClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "naina=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Naina shopping assistant backend");

    let config = AppConfig::load()?;
    config.validate()?;

    // Database
    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;
    info!("Database connection established");

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Migrations applied");
    }

    let conversations: Arc<dyn ConversationStore> =
        Arc::new(PostgresConversationStore::new(pool.clone()));
    let products: Arc<dyn ProductStore> = Arc::new(PostgresProductStore::new(pool.clone()));

    // Shopify: credentials are optional; a failed connection test degrades
    // to local-catalog mode rather than refusing to start.
    let (remote, sync_enabled): (Arc<dyn RemoteCatalogClient>, bool) =
        if config.shopify.is_configured() {
            let client_config = ShopifyClientConfig::new(
                config.shopify.store_domain.clone().unwrap_or_default(),
                config.shopify.access_token.clone().unwrap_or_default(),
            )
            .with_api_version(config.shopify.api_version.clone())
            .with_timeout(config.shopify.timeout());

            let client = ShopifyClient::new(client_config)?;
            let connected = client.test_connection().await;
            if connected {
                info!("Shopify connection verified, catalog sync enabled");
            } else {
                warn!("Shopify credentials rejected, running on local catalog only");
            }
            (Arc::new(client), connected)
        } else {
            info!("Shopify not configured, running on local catalog only");
            (Arc::new(DisabledCatalogClient), false)
        };

    let sync_state = Arc::new(SyncState::new(sync_enabled));

    let sync_engine = Arc::new(CatalogSyncEngine::new(
        Arc::clone(&remote),
        Arc::clone(&products),
        Arc::clone(&sync_state),
        config.shopify.page_size,
    ));
    if sync_enabled {
        sync_engine
            .clone()
            .start_auto_sync(config.shopify.sync_interval());
    }

    // Vendor gateway
    let mut gateway = AiGateway::new(config.ai.default_vendor.clone());
    if let Some(key) = config.ai.groq_api_key.as_deref().filter(|k| !k.is_empty()) {
        let provider = GroqProvider::new(
            GroqConfig::new(key)
                .with_model(config.ai.groq_model.clone())
                .with_timeout(config.ai.timeout()),
        )?;
        info!(vendor = provider.vendor_id(), "Registered AI vendor");
        gateway = gateway.register(Arc::new(provider));
    }
    if let Some(key) = config.ai.cohere_api_key.as_deref().filter(|k| !k.is_empty()) {
        let provider = CohereProvider::new(
            CohereConfig::new(key)
                .with_model(config.ai.cohere_model.clone())
                .with_timeout(config.ai.timeout()),
        )?;
        info!(vendor = provider.vendor_id(), "Registered AI vendor");
        gateway = gateway.register(Arc::new(provider));
    }
    let gateway = Arc::new(gateway);

    // Application services
    let search = Arc::new(ProductSearchService::new(
        Arc::clone(&remote),
        Arc::clone(&products),
        Arc::clone(&sync_state),
    ));
    let knowledge = Arc::new(StoreKnowledgeAggregator::new(Arc::clone(&products)));
    let intent = Arc::new(KeywordIntentDetector::new());
    let orchestrator = Arc::new(ConversationOrchestrator::new(
        Arc::clone(&conversations),
        intent,
        knowledge,
        search,
        gateway,
    ));

    let state = ChatAppState::new(orchestrator, conversations, sync_state);
    let app = chat_router().with_state(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr = config.server.socket_addr()?;
    info!(%addr, "Listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
