pub mod mysql;
pub mod summary;

use crate::llm::models::TranslateRequest;
use async_trait::async_trait;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3306;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid port '{0}'")]
    InvalidPort(String),
    #[error("no database name given")]
    MissingDatabase,
    #[error("timed out connecting to {0}")]
    Timeout(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Where to look for the live schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ConnectionTarget {
    pub fn from_request(request: &TranslateRequest) -> Result<Self, SchemaError> {
        let host = request
            .host
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .unwrap_or(DEFAULT_HOST)
            .to_string();

        let port = match request.port.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_PORT,
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| SchemaError::InvalidPort(raw.to_string()))?,
        };

        let database = request
            .database
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or(SchemaError::MissingDatabase)?
            .to_string();

        Ok(Self {
            host,
            port,
            database,
            username: request.username.clone(),
            password: request.password.clone(),
        })
    }

    /// `host:port/database`, safe to log.
    pub fn display(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.database)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryLimits {
    pub max_tables: usize,
    pub max_columns: usize,
}

impl Default for SummaryLimits {
    fn default() -> Self {
        Self {
            max_tables: 50,
            max_columns: 50,
        }
    }
}

#[async_trait]
pub trait SchemaInspector: Send + Sync {
    async fn fetch_summary(
        &self,
        target: &ConnectionTarget,
        limits: SummaryLimits,
    ) -> Result<String, SchemaError>;
}
