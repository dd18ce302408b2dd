use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Label reported in translation responses, independent of the provider model id.
pub const RESPONSE_MODEL_LABEL: &str = "llama-3.1-70b-versatile";

/// Returned as `schemaDescription` whenever schema generation fails.
pub const SCHEMA_FALLBACK: &str =
    r#"{"entities":[],"relationships":[],"description":"Error generating schema"}"#;

// Outbound chat-completion body

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatRequest {
    pub fn single_user_message(model: &str, prompt: &str, temperature: Option<f32>) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature,
        }
    }
}

// Schema generation

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaGenerationRequest {
    pub model_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaGenerationResponse {
    pub model_name: String,
    /// Schema document as JSON text, without `sql_script`.
    pub schema_description: String,
    pub unused_field: Option<String>,
    pub latency_ms: u64,
    pub error: Option<String>,
    pub sql_script: String,
}

// Translation

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Dialect {
    #[default]
    Mysql,
    Postgresql,
    Sqlserver,
    Oracle,
    Sqlite,
}

impl Dialect {
    /// Wire name, e.g. `MYSQL`.
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Mysql => "MYSQL",
            Dialect::Postgresql => "POSTGRESQL",
            Dialect::Sqlserver => "SQLSERVER",
            Dialect::Oracle => "ORACLE",
            Dialect::Sqlite => "SQLITE",
        }
    }

    /// Human name used inside prompts.
    pub fn display_name(&self) -> &'static str {
        match self {
            Dialect::Mysql => "MySQL",
            Dialect::Postgresql => "PostgreSQL",
            Dialect::Sqlserver => "SQL Server",
            Dialect::Oracle => "Oracle",
            Dialect::Sqlite => "SQLite",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub dialect: Option<Dialect>,
    pub host: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub port: Option<String>,
    pub database: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub text: Option<String>,
    pub query_type: Option<String>,
    #[serde(default)]
    pub optimize: bool,
}

// Callers send the port either as `"3306"` or `3306`.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    }))
}

impl TranslateRequest {
    pub fn dialect(&self) -> Dialect {
        self.dialect.unwrap_or_default()
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn query_type(&self) -> String {
        self.query_type
            .as_deref()
            .map(str::to_uppercase)
            .unwrap_or_else(|| "SELECT".to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    pub sql: String,
    pub dialect: String,
    pub model_name: String,
    pub latency_ms: u64,
    pub error: Option<String>,
    pub explanation: Option<String>,
    pub optimized_sql: Option<String>,
    pub suggestions: Option<Vec<String>>,
    pub indexes: Option<Vec<String>>,
    pub complexity: Option<String>,
    pub cost: Option<String>,
}

impl TranslateResponse {
    /// A failed translation: the message goes in `sql`, everything after `error` is null.
    pub fn failure(dialect: Dialect, message: String, label: &str, latency_ms: u64) -> Self {
        Self {
            sql: message,
            dialect: dialect.name().to_string(),
            model_name: RESPONSE_MODEL_LABEL.to_string(),
            latency_ms,
            error: Some(label.to_string()),
            explanation: None,
            optimized_sql: None,
            suggestions: None,
            indexes: None,
            complexity: None,
            cost: None,
        }
    }
}
