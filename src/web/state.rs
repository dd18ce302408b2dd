use crate::config::AppConfig;
use crate::db::{SchemaInspector, SummaryLimits};
use crate::llm::ChatCompletion;
use crate::llm::prompts::PromptBuilder;
use crate::service::{SchemaGenerator, Translator};
use std::sync::Arc;

/// Shared application state for the web server. Everything here is read-only
/// after start-up.
pub struct AppState {
    pub config: AppConfig,
    pub schema_generator: SchemaGenerator,
    pub translator: Translator,
    pub llm_model: String,
    pub startup_time: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        llm: Arc<dyn ChatCompletion>,
        inspector: Arc<dyn SchemaInspector>,
        prompts: PromptBuilder,
    ) -> Self {
        let prompts = Arc::new(prompts);
        let limits = SummaryLimits {
            max_tables: config.schema.max_tables,
            max_columns: config.schema.max_columns,
        };

        let schema_generator = SchemaGenerator::new(
            Arc::clone(&llm),
            Arc::clone(&prompts),
            config.llm.schema_temperature,
        );
        let translator = Translator::new(
            Arc::clone(&llm),
            inspector,
            prompts,
            limits,
            config.llm.translate_temperature,
        );

        Self {
            llm_model: llm.model().to_string(),
            config,
            schema_generator,
            translator,
            startup_time: chrono::Utc::now(),
        }
    }
}
