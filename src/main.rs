use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mymediatrek::{build_state, run_blocking, AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")))
                             .init();

    let cfg = AppConfig::from_env().context("loading configuration")?;
    let addr = cfg.server.socket_addr()?;

    // build_pool bloquea (conexión inicial + migraciones).
    let state = run_blocking(move || build_state(&cfg)).await
                                                       .context("connecting to database")?;

    let app = trek_api::router(state);
    let listener = tokio::net::TcpListener::bind(addr).await
                                                      .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "mymediatrek listening");
    axum::serve(listener, app).await?;
    Ok(())
}
