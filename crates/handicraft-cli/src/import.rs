//! Import and check command handlers.
//!
//! Both commands normalize every record up front so rejects are reported
//! before anything touches the database. Rejected records are still stored
//! on import: the catalog skips them at load time the same way.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use handicraft_core::{Catalog, JsonFileSource, ProductSource, RejectedRecord};
use serde_json::Value;

/// Outcome of normalizing a record file.
#[derive(Debug)]
pub(crate) struct RecordReport {
    pub total: usize,
    pub accepted: usize,
    pub duplicate_ids: Vec<i64>,
    pub rejected: Vec<RejectedRecord>,
}

impl RecordReport {
    pub(crate) fn from_records(records: &[Value]) -> Self {
        let catalog = Catalog::from_records(records);

        let mut seen = HashSet::new();
        let duplicates: BTreeSet<i64> = catalog
            .ids()
            .into_iter()
            .filter(|id| !seen.insert(*id))
            .collect();

        Self {
            total: records.len(),
            accepted: catalog.len(),
            duplicate_ids: duplicates.into_iter().collect(),
            rejected: catalog.rejected().to_vec(),
        }
    }

    fn log(&self) {
        for rejected in &self.rejected {
            tracing::warn!(
                position = rejected.position,
                error = %rejected.error,
                "record will be skipped by the catalog"
            );
        }
        for id in &self.duplicate_ids {
            tracing::warn!(id, "duplicate product id; only the first record is reachable by id");
        }
    }

    fn print(&self) {
        println!(
            "{} records: {} accepted, {} rejected, {} duplicate ids",
            self.total,
            self.accepted,
            self.rejected.len(),
            self.duplicate_ids.len()
        );
    }
}

async fn read_records(file: &Path) -> anyhow::Result<Vec<Value>> {
    let records = JsonFileSource::new(file).fetch_records().await?;
    Ok(records)
}

/// Normalize a record file and print a report. Never touches the database.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON array.
pub(crate) async fn run_check(file: &Path) -> anyhow::Result<()> {
    let records = read_records(file).await?;
    let report = RecordReport::from_records(&records);
    report.log();
    report.print();
    Ok(())
}

/// Replace the `product_records` table with the contents of `file`.
///
/// When `dry_run` is `true` the report is printed and the database is left
/// alone.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the database is unreachable,
/// migrations fail, or the replace transaction fails.
pub(crate) async fn run_import(file: &Path, dry_run: bool) -> anyhow::Result<()> {
    let records = read_records(file).await?;
    let report = RecordReport::from_records(&records);
    report.log();

    if dry_run {
        report.print();
        println!("[dry-run] no changes written");
        return Ok(());
    }

    let config = handicraft_core::load_app_config()?;
    let pool = handicraft_db::connect_from_app_config(&config).await?;
    let applied = handicraft_db::run_migrations(&pool).await?;
    tracing::info!(applied, "database migrations applied");

    let inserted = handicraft_db::replace_product_records(&pool, &records).await?;
    tracing::info!(inserted, file = %file.display(), "product records replaced");

    report.print();
    println!("imported {inserted} records; send SIGHUP to handicraft-server to reload the catalog");
    Ok(())
}
