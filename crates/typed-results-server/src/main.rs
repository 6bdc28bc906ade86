use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;
use typed_results_server::{endpoint_registry, router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load_default()?.with_env_overrides()?;

    let registry = endpoint_registry(&config);
    info!("Registered {} endpoints", registry.len());
    for endpoint in registry.endpoints() {
        let statuses: Vec<u16> = endpoint
            .responses
            .iter()
            .map(|r| r.status_code.as_u16())
            .collect();
        info!("  {} {} -> {:?}", endpoint.method, endpoint.path, statuses);
    }

    let app = router(&config, AppState::new(registry));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
