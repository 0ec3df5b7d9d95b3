use std::sync::Arc;

use anyhow::Context;

use quartermaster_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("failed to read .env");
        }
    }
    quartermaster_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let services = quartermaster_api::app::build_services(&config)
        .await
        .context("failed to initialise inventory store")?;
    let app = quartermaster_api::app::build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
