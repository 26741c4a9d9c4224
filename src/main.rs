use anyhow::Result;
use dotenv::dotenv;
use std::sync::Arc;

use workout_calorie_tracker::config::Config;
use workout_calorie_tracker::server::create_router;
use workout_calorie_tracker::services::{CalorieEstimator, CompletionService, OpenRouterService};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables first so RUST_LOG from .env applies
    dotenv().ok();

    // Initialize logger
    env_logger::init();

    log::info!("🚀 Starting Workout Calorie Tracker...");

    let config = Config::from_env()?;

    let openrouter = OpenRouterService::new(
        config.openrouter_api_key.clone(),
        config.openrouter_model.clone(),
    )
    .with_base_url(config.openrouter_base_url.clone());
    log::info!("✅ OpenRouter service initialized with model: {}", openrouter.model());

    let completion = Arc::new(openrouter) as Arc<dyn CompletionService>;
    let estimator = Arc::new(CalorieEstimator::new(completion));

    let app = create_router(estimator);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    log::info!("🌐 Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("🛑 Shutting down...");
        })
        .await?;

    Ok(())
}
