use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::{debug, warn};

use crate::config::ContextTable;

/// Source of descriptive context text for a role.
///
/// Lookups never fail: a missing row or an unreachable backend both read as
/// "no context" so the UI can keep working.
#[async_trait]
pub trait ContextStore: Send + Sync {
    async fn context_for_role(&self, role: &str) -> String;
}

/// Context lookups against the relational role/context table.
pub struct SqlContextStore {
    pool: Option<MySqlPool>,
    query: String,
}

impl SqlContextStore {
    pub fn new(pool: Option<MySqlPool>, table: &ContextTable) -> Self {
        Self {
            pool,
            query: lookup_sql(table),
        }
    }
}

#[async_trait]
impl ContextStore for SqlContextStore {
    async fn context_for_role(&self, role: &str) -> String {
        let Some(pool) = &self.pool else {
            debug!("No database configured; returning empty context for '{role}'");
            return String::new();
        };

        let row: Result<Option<Option<String>>, sqlx::Error> = sqlx::query_scalar(&self.query)
            .bind(role)
            .fetch_optional(pool)
            .await;

        match row {
            Ok(context) => context.flatten().unwrap_or_default(),
            Err(e) => {
                warn!("Context lookup for '{role}' failed: {e}");
                String::new()
            }
        }
    }
}

fn lookup_sql(table: &ContextTable) -> String {
    format!(
        "SELECT `{}` FROM `{}` WHERE `{}` = ? LIMIT 1",
        table.context_column, table.table, table.role_column
    )
}
