use axum::Router;
use proxyzone_dns_api::{create_api_routes, AppState};
use tokio_util::sync::CancellationToken;
use tracing::info;

pub async fn start_web_server(
    bind_addr: String,
    state: AppState,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!(
        bind_address = %listener.local_addr()?,
        reload_url = format!("http://{}/dns/reload", bind_addr),
        "Reload API listening"
    );

    let app: Router = create_api_routes(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("Reload API stopped");
    Ok(())
}
