use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

mod config;
mod db;
mod llm;
mod service;
mod util;
mod web;

use crate::config::{AppConfig, CliArgs};
use crate::db::mysql::MySqlSchemaInspector;
use crate::llm::prompts::PromptBuilder;
use crate::llm::providers::groq::GroqClient;
use crate::util::logging::init_tracing;
use crate::web::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = CliArgs::parse();

    // Initialize logging
    init_tracing(args.log_json);

    // Load configuration
    let config = match AppConfig::new(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Initialize LLM client
    let llm = match GroqClient::new(&config.llm) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to initialize LLM client: {}", e);
            return Err(e.into());
        }
    };
    info!(
        "Using chat completion endpoint {} with model {}",
        llm.api_url(),
        config.llm.model
    );

    let prompts = PromptBuilder::new()?;
    let inspector = MySqlSchemaInspector::new(Duration::from_secs(config.schema.connect_timeout_secs));

    let app_state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(llm),
        Arc::new(inspector),
        prompts,
    ));

    // Start the web server
    info!("Starting AskDB server on {}:{}", config.web.host, config.web.port);
    match web::run_server(config.web, app_state).await {
        Ok(_) => info!("Server stopped gracefully"),
        Err(e) => {
            error!("Server error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
