pub mod app_config;
pub mod coerce;
pub mod config;
pub mod normalize;
pub mod product;
pub mod query;
pub mod source;
pub mod store;

pub use app_config::{AppConfig, Environment, SourceKind};
pub use config::{load_app_config, load_app_config_from_env};
pub use normalize::{normalize, NormalizeError};
pub use product::Product;
pub use query::{search, IdOrder, SearchCriteria, SearchField, SearchOptions};
pub use source::{parse_records, JsonFileSource, ProductSource, SourceError};
pub use store::{Catalog, ProductStore, RejectedRecord};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
