use std::sync::Arc;

use handicraft_core::{ProductSource, SourceError};

use crate::source::CatalogStore;

/// Loads the catalog now and logs what was loaded and what was skipped.
pub async fn warm(store: &CatalogStore) -> Result<(), SourceError> {
    let catalog = store.load().await?;

    tracing::info!(
        source = %store.source().describe(),
        products = catalog.len(),
        rejected = catalog.rejected().len(),
        "product catalog loaded"
    );
    for rejected in catalog.rejected() {
        tracing::warn!(
            position = rejected.position,
            error = %rejected.error,
            "skipped product record"
        );
    }

    Ok(())
}

/// Invalidates and reloads the catalog on every `SIGHUP`.
///
/// The import job runs out of process and signals the server afterwards.
#[cfg(unix)]
pub fn spawn_reload_on_hangup(store: Arc<CatalogStore>) -> anyhow::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangups = signal(SignalKind::hangup())?;
    tokio::spawn(async move {
        while hangups.recv().await.is_some() {
            let was_loaded = store.invalidate().await;
            tracing::info!(was_loaded, "received SIGHUP, product cache invalidated");

            if let Err(e) = warm(&store).await {
                tracing::error!(error = %e, "catalog reload failed; cache stays cold");
            }
        }
    });
    Ok(())
}

#[cfg(not(unix))]
pub fn spawn_reload_on_hangup(_store: Arc<CatalogStore>) -> anyhow::Result<()> {
    tracing::warn!("SIGHUP reload is unavailable on this platform");
    Ok(())
}
