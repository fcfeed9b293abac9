use crate::app_config::{AppConfig, Environment, SourceKind};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_flag = |var: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, "false");
        parse_bool(&raw).ok_or_else(|| invalid(var, format!("expected a boolean, got \"{raw}\"")))
    };

    let env = parse_environment(&or_default("HANDICRAFT_ENV", "development"));
    let bind_addr = parse_addr("HANDICRAFT_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("HANDICRAFT_LOG_LEVEL", "info");

    let source_raw = or_default("HANDICRAFT_SOURCE", "file");
    let source = parse_source(&source_raw).ok_or_else(|| {
        invalid(
            "HANDICRAFT_SOURCE",
            format!("expected \"file\" or \"database\", got \"{source_raw}\""),
        )
    })?;

    let products_path = PathBuf::from(or_default(
        "HANDICRAFT_PRODUCTS_PATH",
        "./data/products.json",
    ));
    let images_dir = PathBuf::from(or_default("HANDICRAFT_IMAGES_DIR", "./public/images"));

    let database_url = lookup("DATABASE_URL").ok().filter(|url| !url.is_empty());
    if source == SourceKind::Database && database_url.is_none() {
        return Err(ConfigError::MissingEnvVar("DATABASE_URL".to_string()));
    }

    let search_design = parse_flag("HANDICRAFT_SEARCH_DESIGN")?;
    let sort_product_ids = parse_flag("HANDICRAFT_SORT_PRODUCT_IDS")?;

    let db_max_connections = parse_u32("HANDICRAFT_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("HANDICRAFT_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("HANDICRAFT_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        source,
        products_path,
        images_dir,
        database_url,
        search_design,
        sort_product_ids,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_source(s: &str) -> Option<SourceKind> {
    match s.trim().to_ascii_lowercase().as_str() {
        "file" => Some(SourceKind::File),
        "database" | "db" => Some(SourceKind::Database),
        _ => None,
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
