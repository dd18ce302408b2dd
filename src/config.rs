use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String, // Provider model id sent in the request body
    pub schema_temperature: Option<f32>,
    pub translate_temperature: Option<f32>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SchemaConfig {
    pub max_tables: usize,
    pub max_columns: usize,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub web: WebConfig,
    pub llm: LlmConfig,
    pub schema: SchemaConfig,
}

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl AppConfig {
    pub fn new(args: &CliArgs) -> Result<Self, ConfigError> {
        let defaults = AppConfig::default();

        // Start with default configuration
        let mut config_builder = Config::builder()
            .set_default("web.host", defaults.web.host)?
            .set_default("web.port", i64::from(defaults.web.port))?
            .set_default("llm.api_url", defaults.llm.api_url)?
            .set_default("llm.model", defaults.llm.model)?
            .set_default("llm.schema_temperature", 0.1_f64)?
            .set_default("schema.max_tables", defaults.schema.max_tables as i64)?
            .set_default("schema.max_columns", defaults.schema.max_columns as i64)?
            .set_default("schema.connect_timeout_secs", defaults.schema.connect_timeout_secs as i64)?;

        // Add configuration from file if specified
        if let Some(config_path) = &args.config {
            config_builder = config_builder.add_source(File::from(config_path.as_path()));
        } else {
            // Check for config in default locations
            let default_locations = vec![
                "config.toml",
                "config/config.toml",
                "/etc/askdb/config.toml",
            ];

            for location in default_locations {
                if Path::new(location).exists() {
                    config_builder =
                        config_builder.add_source(File::new(location, config::FileFormat::Toml));
                    break;
                }
            }
        }

        // ASKDB_LLM__API_KEY, ASKDB_WEB__PORT, ...
        config_builder = config_builder.add_source(
            Environment::with_prefix("ASKDB")
                .prefix_separator("_")
                .separator("__"),
        );

        // Build the config
        let mut config: AppConfig = config_builder.build()?.try_deserialize()?;

        // Override with command line args if provided
        if let Some(host) = &args.host {
            config.web.host = host.clone();
        }
        if let Some(port) = args.port {
            config.web.port = port;
        }

        Ok(config)
    }
}

// Default implementation
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            web: WebConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            llm: LlmConfig {
                api_url: "https://api.groq.com/openai/v1/chat/completions".to_string(),
                api_key: None,
                model: "groq/compound".to_string(),
                schema_temperature: Some(0.1),
                translate_temperature: None,
                timeout_secs: None,
            },
            schema: SchemaConfig {
                max_tables: 50,
                max_columns: 50,
                connect_timeout_secs: 5,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_values_override_defaults() {
        let path = std::env::temp_dir().join(format!("askdb-config-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[web]
port = 9090

[llm]
api_key = "file-key"
translate_temperature = 0.3

[schema]
max_tables = 10
"#
        )
        .unwrap();

        let args = CliArgs {
            config: Some(path.clone()),
            ..Default::default()
        };
        let config = AppConfig::new(&args).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.web.port, 9090);
        assert_eq!(config.web.host, "127.0.0.1");
        assert_eq!(config.llm.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.llm.model, "groq/compound");
        assert_eq!(config.llm.schema_temperature, Some(0.1));
        assert_eq!(config.llm.translate_temperature, Some(0.3));
        assert_eq!(config.schema.max_tables, 10);
        assert_eq!(config.schema.max_columns, 50);
    }

    #[test]
    fn cli_flags_take_precedence() {
        let path = std::env::temp_dir().join(format!("askdb-cli-{}.toml", std::process::id()));
        std::fs::write(&path, "[web]\nport = 9090\n").unwrap();

        let args = CliArgs {
            config: Some(path.clone()),
            host: Some("0.0.0.0".to_string()),
            port: Some(7000),
            log_json: false,
        };
        let config = AppConfig::new(&args).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.web.host, "0.0.0.0");
        assert_eq!(config.web.port, 7000);
    }
}
