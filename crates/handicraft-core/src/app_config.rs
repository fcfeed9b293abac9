use std::net::SocketAddr;
use std::path::PathBuf;

use crate::query::{IdOrder, SearchOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Where the server reads product records from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    File,
    Database,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::File => write!(f, "file"),
            SourceKind::Database => write!(f, "database"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub source: SourceKind,
    pub products_path: PathBuf,
    pub images_dir: PathBuf,
    /// Required when `source` is [`SourceKind::Database`].
    pub database_url: Option<String>,
    pub search_design: bool,
    pub sort_product_ids: bool,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl AppConfig {
    #[must_use]
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions::with_design(self.search_design)
    }

    #[must_use]
    pub fn id_order(&self) -> IdOrder {
        if self.sort_product_ids {
            IdOrder::Ascending
        } else {
            IdOrder::LoadOrder
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("source", &self.source)
            .field("products_path", &self.products_path)
            .field("images_dir", &self.images_dir)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[redacted]"),
            )
            .field("search_design", &self.search_design)
            .field("sort_product_ids", &self.sort_product_ids)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
