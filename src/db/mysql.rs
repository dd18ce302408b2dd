use super::summary::{ColumnRow, summarize};
use super::{ConnectionTarget, SchemaError, SchemaInspector, SummaryLimits};
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::Connection;
use std::time::Duration;
use tracing::{debug, info};

const COLUMNS_QUERY: &str = "SELECT CAST(TABLE_NAME AS CHAR), CAST(COLUMN_NAME AS CHAR), CAST(COLUMN_TYPE AS CHAR) \
     FROM information_schema.COLUMNS \
     WHERE TABLE_SCHEMA = ? \
     ORDER BY TABLE_NAME, ORDINAL_POSITION";

/// Reads table and column metadata from a live MySQL server. Each call opens
/// and closes its own connection.
pub struct MySqlSchemaInspector {
    connect_timeout: Duration,
}

impl MySqlSchemaInspector {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    fn connect_options(target: &ConnectionTarget) -> MySqlConnectOptions {
        let mut options = MySqlConnectOptions::new()
            .host(&target.host)
            .port(target.port)
            .database(&target.database);
        if let Some(username) = &target.username {
            options = options.username(username);
        }
        if let Some(password) = &target.password {
            options = options.password(password);
        }
        options
    }
}

#[async_trait]
impl SchemaInspector for MySqlSchemaInspector {
    async fn fetch_summary(
        &self,
        target: &ConnectionTarget,
        limits: SummaryLimits,
    ) -> Result<String, SchemaError> {
        debug!("Connecting to {} for schema summary", target.display());

        let options = Self::connect_options(target);
        let mut conn = tokio::time::timeout(self.connect_timeout, MySqlConnection::connect_with(&options))
            .await
            .map_err(|_| SchemaError::Timeout(target.display()))??;

        let rows: Vec<(String, String, String)> = sqlx::query_as(COLUMNS_QUERY)
            .bind(&target.database)
            .fetch_all(&mut conn)
            .await?;

        conn.close().await?;

        let rows: Vec<ColumnRow> = rows
            .into_iter()
            .map(|(table, column, data_type)| ColumnRow {
                table,
                column,
                data_type,
            })
            .collect();

        info!(
            "Fetched {} columns from {} for schema summary",
            rows.len(),
            target.display()
        );

        Ok(summarize(&target.database, &rows, limits))
    }
}
