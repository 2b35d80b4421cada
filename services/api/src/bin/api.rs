//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{db::DbAdapter, memory::MemorySwapStore},
    config::Config,
    error::ApiError,
    web::{build_router, state::AppState},
};
use skill_swap_core::{SwapBoard, SwapStore, SystemClock};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Select the Swap Store ---
    let store: Arc<dyn SwapStore> = match &config.database_url {
        Some(database_url) => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await?;
            let db_adapter = DbAdapter::new(db_pool);
            info!("Running database migrations...");
            db_adapter.run_migrations().await?;
            info!("Database migrations complete.");
            Arc::new(db_adapter)
        }
        None => {
            warn!("DATABASE_URL is not set; swaps are kept in memory and lost on restart.");
            Arc::new(MemorySwapStore::new())
        }
    };

    // --- 3. Build the Shared AppState ---
    let board = SwapBoard::new(store, Arc::new(SystemClock))
        .with_mutation_attempts(config.mutation_attempts);
    let app_state = Arc::new(AppState {
        board,
        config: config.clone(),
    });

    // --- 4. Create the Web Router ---
    let app = build_router(app_state);

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
