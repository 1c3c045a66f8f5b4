//! Bulk-loads role/context pairs from a spreadsheet, replacing the context table.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use prompting_api::config::{require_env, ContextTable};
use prompting_api::context::ingest::{read_role_contexts, replace_contexts};
use prompting_api::db::create_pool;

#[derive(Debug, Parser)]
#[command(
    name = "import-contexts",
    version,
    about = "Replace the role context table with rows from a spreadsheet"
)]
struct Args {
    /// Spreadsheet to import (xlsx, xls or ods; first worksheet is used)
    #[arg(long, env = "IMPORT_PATH", default_value = "Occupation_Data.xlsx")]
    path: PathBuf,

    /// Header of the column holding role names
    #[arg(long, env = "IMPORT_ROLE_COLUMN", default_value = "Title")]
    role_column: String,

    /// Header of the column holding role descriptions
    #[arg(long, env = "IMPORT_CONTEXT_COLUMN", default_value = "Description")]
    context_column: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let table = ContextTable::from_env()?;
    let database_url = require_env("DATABASE_URL")?;

    let rows = read_role_contexts(&args.path, &args.role_column, &args.context_column)
        .with_context(|| format!("Failed to read {}", args.path.display()))?;
    info!("Read {} rows from {}", rows.len(), args.path.display());

    let pool = create_pool(&database_url).await?;
    let written = replace_contexts(&pool, &table, &rows).await?;
    pool.close().await;

    info!("Imported {written} rows into {}", table.table);
    Ok(())
}
