use handicraft_core::{AppConfig, JsonFileSource, ProductSource, ProductStore, SourceError, SourceKind};
use handicraft_db::PgRecordSource;
use serde_json::Value;

pub type CatalogStore = ProductStore<CatalogSource>;

/// The record source selected by `HANDICRAFT_SOURCE`.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    File(JsonFileSource),
    Database(PgRecordSource),
}

impl CatalogSource {
    /// Builds the configured source. The database variant connects and runs
    /// pending migrations first.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        match config.source {
            SourceKind::File => Ok(Self::File(JsonFileSource::new(&config.products_path))),
            SourceKind::Database => {
                let pool = handicraft_db::connect_from_app_config(config).await?;
                let applied = handicraft_db::run_migrations(&pool).await?;
                tracing::info!(applied, "database migrations applied");
                Ok(Self::Database(PgRecordSource::new(pool)))
            }
        }
    }
}

impl ProductSource for CatalogSource {
    async fn fetch_records(&self) -> Result<Vec<Value>, SourceError> {
        match self {
            Self::File(source) => source.fetch_records().await,
            Self::Database(source) => source.fetch_records().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::File(source) => source.describe(),
            Self::Database(source) => source.describe(),
        }
    }
}
