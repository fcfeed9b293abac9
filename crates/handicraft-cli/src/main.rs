mod import;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "handicraft-cli")]
#[command(about = "Handicraft catalog command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replace the stored product records with a JSON array file
    Import {
        file: PathBuf,
        /// Report what would be imported without writing to the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Normalize a JSON array file and report rejected records
    Check { file: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Import { file, dry_run }) => import::run_import(&file, dry_run).await?,
        Some(Commands::Check { file }) => import::run_check(&file).await?,
        None => println!("handicraft-cli: run with --help to list commands"),
    }

    Ok(())
}
