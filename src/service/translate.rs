use crate::db::{ConnectionTarget, SchemaInspector, SummaryLimits};
use crate::llm::models::{Dialect, RESPONSE_MODEL_LABEL, TranslateRequest, TranslateResponse};
use crate::llm::normalize::{ModelReply, extract_content, parse_model_output, strip_fences};
use crate::llm::prompts::PromptBuilder;
use crate::llm::ChatCompletion;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

pub const REQUEST_FAILED: &str = "Request failed";
pub const INVALID_RESPONSE_FORMAT: &str = "Invalid response format";
pub const PARSE_FAILED: &str = "Failed to parse model output";

/// Generates SQL from an intent, or reviews an existing query when `optimize` is set.
pub struct Translator {
    llm: Arc<dyn ChatCompletion>,
    inspector: Arc<dyn SchemaInspector>,
    prompts: Arc<PromptBuilder>,
    limits: SummaryLimits,
    temperature: Option<f32>,
}

impl Translator {
    pub fn new(
        llm: Arc<dyn ChatCompletion>,
        inspector: Arc<dyn SchemaInspector>,
        prompts: Arc<PromptBuilder>,
        limits: SummaryLimits,
        temperature: Option<f32>,
    ) -> Self {
        Self {
            llm,
            inspector,
            prompts,
            limits,
            temperature,
        }
    }

    /// Never fails: every failure is reported through `error` with details in `sql`.
    pub async fn translate(&self, request: &TranslateRequest) -> TranslateResponse {
        let start = Instant::now();
        let elapsed = || start.elapsed().as_millis() as u64;

        let dialect = request.dialect();
        let text = request.text();
        let query_type = request.query_type();
        info!(
            "Translate request: dialect={}, query_type={}, optimize={}",
            dialect, query_type, request.optimize
        );

        let prompt = if request.optimize {
            self.prompts.translate_optimize(text)
        } else {
            let schema_summary = self.schema_summary(request).await;
            self.prompts
                .translate_generate(&query_type, dialect.display_name(), &schema_summary, text)
        };
        let prompt = match prompt {
            Ok(prompt) => prompt,
            Err(e) => {
                error!("Failed to render translate prompt: {}", e);
                return TranslateResponse::failure(
                    dialect,
                    format!("Prompt rendering failed: {}", e),
                    REQUEST_FAILED,
                    elapsed(),
                );
            }
        };

        let body = match self.llm.complete(&prompt, self.temperature).await {
            Ok(body) => body,
            Err(e) => {
                error!("Chat completion call failed: {}", e);
                return TranslateResponse::failure(
                    dialect,
                    format!("Groq API call failed: {}", e),
                    REQUEST_FAILED,
                    elapsed(),
                );
            }
        };

        let content = match extract_content(&body) {
            Ok(content) => content,
            Err(e) => {
                error!("Unexpected chat completion body: {}", e);
                return TranslateResponse::failure(
                    dialect,
                    format!("Groq response error: {}", e),
                    INVALID_RESPONSE_FORMAT,
                    elapsed(),
                );
            }
        };

        let reply = match parse_model_output(&content) {
            Ok(reply) => reply,
            Err(e) => {
                let raw = strip_fences(&content);
                warn!("Model output is not JSON: {}", e);
                debug!("Raw model output: {}", raw);
                return TranslateResponse::failure(
                    dialect,
                    format!("JSON Parse Error: {}\nRAW: {}", e, raw),
                    PARSE_FAILED,
                    elapsed(),
                );
            }
        };

        let latency_ms = elapsed();
        info!("Translate request finished in {}ms", latency_ms);

        if request.optimize {
            optimization_report(dialect, &reply, latency_ms)
        } else {
            generated_sql(dialect, &reply, latency_ms)
        }
    }

    /// Falls back to an inline notice when the live schema cannot be read.
    async fn schema_summary(&self, request: &TranslateRequest) -> String {
        let target = match ConnectionTarget::from_request(request) {
            Ok(target) => target,
            Err(e) => {
                warn!("Skipping schema lookup: {}", e);
                return format!("Schema unavailable: {}", e);
            }
        };

        match self.inspector.fetch_summary(&target, self.limits).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Schema lookup for {} failed: {}", target.display(), e);
                format!("Schema unavailable: {}", e)
            }
        }
    }
}

fn generated_sql(dialect: Dialect, reply: &ModelReply, latency_ms: u64) -> TranslateResponse {
    TranslateResponse {
        sql: reply.text("sql", ""),
        dialect: dialect.name().to_string(),
        model_name: RESPONSE_MODEL_LABEL.to_string(),
        latency_ms,
        error: None,
        explanation: Some(reply.text("explanation", "")),
        optimized_sql: None,
        suggestions: None,
        indexes: None,
        complexity: None,
        cost: None,
    }
}

// Missing optimization fields default silently; see DESIGN.md.
fn optimization_report(dialect: Dialect, reply: &ModelReply, latency_ms: u64) -> TranslateResponse {
    TranslateResponse {
        sql: reply.text("sql", ""),
        dialect: dialect.name().to_string(),
        model_name: RESPONSE_MODEL_LABEL.to_string(),
        latency_ms,
        error: None,
        explanation: Some(reply.text("explanation", "")),
        optimized_sql: Some(reply.text("optimized_sql", "")),
        suggestions: Some(reply.strings("suggestions")),
        indexes: Some(reply.strings("indexes")),
        complexity: Some(reply.text("complexity", "Unknown")),
        cost: Some(reply.text("cost", "Unknown")),
    }
}
