mod api;
mod middleware;
mod reload;
mod source;

use std::sync::Arc;

use handicraft_core::ProductStore;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    source::CatalogSource,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = handicraft_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(?config, "configuration loaded");

    let source = CatalogSource::from_config(&config).await?;
    let store = Arc::new(ProductStore::new(source));

    // A failed warm-up is not fatal: requests retry the load until it succeeds.
    if let Err(e) = reload::warm(&store).await {
        tracing::error!(error = %e, "initial catalog load failed; serving with a cold cache");
    }
    reload::spawn_reload_on_hangup(Arc::clone(&store))?;

    let state = AppState {
        store,
        search: Arc::new(config.search_options()),
        id_order: config.id_order(),
    };
    let app = build_app(state, &config.images_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %config.bind_addr,
        env = %config.env,
        source = %config.source,
        "handicraft API listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
