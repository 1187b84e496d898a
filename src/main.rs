use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use afb_core::sentiment::MockSentimentAnalyzer;
use api_rest::{router, AppState};

/// Main entry point for the AFB application
///
/// Starts the REST server for the appraisal form builder:
/// - REST server on port 3000 (configurable via AFB_REST_ADDR)
///
/// The server holds a single in-memory form store for its lifetime; nothing
/// is persisted across restarts.
///
/// # Environment Variables
/// - `AFB_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If server startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("afb=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("AFB_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("++ Starting AFB REST on {}", rest_addr);

    let state = AppState::new(Arc::new(MockSentimentAnalyzer));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
