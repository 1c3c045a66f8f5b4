//! Bulk import of role/context pairs from a spreadsheet into the context table.
//!
//! The table is replaced wholesale on every run. Rows are loaded into a staging
//! table first and swapped in with one `RENAME TABLE`, so a failed load leaves
//! the live table untouched.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use sqlx::{MySql, MySqlPool, QueryBuilder};
use tracing::info;

use crate::config::ContextTable;
use crate::context::sheet::{Sheet, SheetError};

/// Rows per multi-row INSERT.
const INSERT_BATCH_SIZE: usize = 500;
/// Roles are indexed for equality lookups, so they need a bounded type.
const ROLE_COLUMN_LENGTH: usize = 512;

/// One row destined for the context table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleContext {
    pub role: String,
    pub context: Option<String>,
}

/// Reads `(role, context)` pairs from the named spreadsheet columns.
/// Rows without a role are dropped; blank contexts become `None`.
pub fn read_role_contexts(
    path: &Path,
    role_column: &str,
    context_column: &str,
) -> Result<Vec<RoleContext>, SheetError> {
    let sheet = Sheet::open(path)?;
    role_contexts_from_sheet(&sheet, role_column, context_column)
}

pub fn role_contexts_from_sheet(
    sheet: &Sheet,
    role_column: &str,
    context_column: &str,
) -> Result<Vec<RoleContext>, SheetError> {
    let role_index = sheet.column(role_column)?;
    let context_index = sheet.column(context_column)?;

    Ok(sheet
        .column_values(role_index)
        .zip(sheet.column_values(context_index))
        .filter_map(|(role, context)| role.map(|role| RoleContext { role, context }))
        .collect())
}

/// Replaces the contents of the context table with `rows`.
/// Returns the number of rows written.
///
/// MySQL commits DDL implicitly, so the inserts run in their own transaction
/// against the staging table and the swap is a single atomic rename.
pub async fn replace_contexts(
    pool: &MySqlPool,
    table: &ContextTable,
    rows: &[RoleContext],
) -> Result<u64> {
    let staging = format!("{}_staging", table.table);
    let retired = format!("{}_retired", table.table);

    sqlx::query(&drop_table_sql(&staging)).execute(pool).await?;
    sqlx::query(&create_table_sql(table, &staging))
        .execute(pool)
        .await?;

    let mut tx = pool.begin().await?;
    let mut written = 0;
    for batch in rows.chunks(INSERT_BATCH_SIZE) {
        let mut insert: QueryBuilder<MySql> = QueryBuilder::new(format!(
            "INSERT INTO `{}` (`{}`, `{}`) ",
            staging, table.role_column, table.context_column
        ));
        insert.push_values(batch, |mut row, entry| {
            row.push_bind(&entry.role).push_bind(&entry.context);
        });
        written += insert.build().execute(&mut *tx).await?.rows_affected();
    }
    tx.commit().await?;
    info!("Loaded {written} rows into `{staging}`");

    // First run: there is no live table to retire yet.
    sqlx::query(&create_table_sql(table, &table.table))
        .execute(pool)
        .await?;
    sqlx::query(&drop_table_sql(&retired)).execute(pool).await?;
    sqlx::query(&swap_tables_sql(&table.table, &staging, &retired))
        .execute(pool)
        .await?;
    sqlx::query(&drop_table_sql(&retired)).execute(pool).await?;
    info!("Replaced table `{}`", table.table);

    Ok(written)
}

fn drop_table_sql(name: &str) -> String {
    format!("DROP TABLE IF EXISTS `{name}`")
}

fn create_table_sql(table: &ContextTable, name: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS `{name}` (\
            `{r}` VARCHAR({len}) NOT NULL, \
            `{c}` TEXT NULL, \
            INDEX `idx_{r}` (`{r}`)\
        ) DEFAULT CHARSET = utf8mb4",
        r = table.role_column,
        c = table.context_column,
        len = ROLE_COLUMN_LENGTH,
    )
}

fn swap_tables_sql(live: &str, staging: &str, retired: &str) -> String {
    format!("RENAME TABLE `{live}` TO `{retired}`, `{staging}` TO `{live}`")
}
