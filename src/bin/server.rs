use repoprep::api::{create_app, AppState};
use repoprep::Config;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config);

    info!("GitHub Repository Analyzer starting");
    info!("Health check: http://{bind_addr}/health");

    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Server listening on http://{bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
