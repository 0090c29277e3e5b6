// src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crm_backend::{config::AppState, routes::build_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let app_state = AppState::new().await?;
    let addr = app_state.config.bind_addr.clone();

    let app = build_router(app_state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Server listening on {}", listener.local_addr()?);
    tracing::info!("📚 Swagger UI at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
