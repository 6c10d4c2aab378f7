use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bulkparts_observability::init();

    let config = bulkparts_api::config::AppConfig::from_env().context("invalid configuration")?;
    let app = bulkparts_api::app::build_app(&config).await?;

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
