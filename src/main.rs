use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use puzzle_gateway::{
    GENERATE_PATH, app,
    cache::SqliteCache,
    config::Args,
    provider::GeminiClient,
    service::PuzzleService,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env is a local-dev convenience, real deployments set the environment
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "puzzle_gateway=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = dotenv {
        tracing::debug!("no .env loaded ({}), using process environment", e);
    }

    // parse cli arguments, a missing or placeholder key stops us here
    let args = Args::parse();
    args.validate()?;

    let cache = SqliteCache::open(&args.database_url)?;
    let generator = GeminiClient::new(
        reqwest::Client::new(),
        args.gemini_api_key.clone(),
        args.gemini_url.clone(),
    );
    let state = Arc::new(AppState::new(PuzzleService::new(
        Arc::new(cache),
        Arc::new(generator),
    )));

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("puzzle gateway listening on http://{}{}", addr, GENERATE_PATH);
    tracing::info!("cache database: {}", args.database_url);
    tracing::info!("provider endpoint: {}", args.gemini_url);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("puzzle gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
