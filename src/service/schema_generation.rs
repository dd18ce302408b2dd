use crate::llm::models::{SCHEMA_FALLBACK, SchemaGenerationRequest, SchemaGenerationResponse};
use crate::llm::normalize::{extract_content, parse_model_output};
use crate::llm::prompts::PromptBuilder;
use crate::llm::{ChatCompletion, LlmError};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Turns a business-model name into a schema description and a MySQL DDL script.
pub struct SchemaGenerator {
    llm: Arc<dyn ChatCompletion>,
    prompts: Arc<PromptBuilder>,
    temperature: Option<f32>,
}

struct GeneratedSchema {
    description: String,
    sql_script: String,
}

impl SchemaGenerator {
    pub fn new(
        llm: Arc<dyn ChatCompletion>,
        prompts: Arc<PromptBuilder>,
        temperature: Option<f32>,
    ) -> Self {
        Self {
            llm,
            prompts,
            temperature,
        }
    }

    /// Never fails: any error yields the fallback description and an `error` message.
    pub async fn generate(&self, request: &SchemaGenerationRequest) -> SchemaGenerationResponse {
        let start = Instant::now();
        info!("Generating schema for business model: {}", request.model_name);

        let (schema_description, sql_script, error) = match self.try_generate(request).await {
            Ok(generated) => (generated.description, generated.sql_script, None),
            Err(e) => {
                error!("Schema generation failed for '{}': {}", request.model_name, e);
                (SCHEMA_FALLBACK.to_string(), String::new(), Some(e.to_string()))
            }
        };

        let latency_ms = start.elapsed().as_millis() as u64;
        info!("Schema generation finished in {}ms", latency_ms);

        SchemaGenerationResponse {
            model_name: request.model_name.clone(),
            schema_description,
            unused_field: None,
            latency_ms,
            error,
            sql_script,
        }
    }

    async fn try_generate(
        &self,
        request: &SchemaGenerationRequest,
    ) -> Result<GeneratedSchema, LlmError> {
        let prompt = self.prompts.schema_generation(&request.model_name)?;
        let body = self.llm.complete(&prompt, self.temperature).await?;
        let content = extract_content(&body)?;
        let reply = parse_model_output(&content)?;

        let sql_script = reply.text("sql_script", "");
        let mut document = reply.into_inner();
        let object = document.as_object_mut().ok_or_else(|| {
            LlmError::Parse("model output is not a JSON object".to_string())
        })?;
        object.remove("sql_script");

        let description =
            serde_json::to_string(&document).map_err(|e| LlmError::Parse(e.to_string()))?;

        Ok(GeneratedSchema {
            description,
            sql_script,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::FakeLlm;
    use serde_json::{Value, json};
    use std::time::Duration;

    fn generator(llm: Arc<FakeLlm>) -> SchemaGenerator {
        SchemaGenerator::new(llm, Arc::new(PromptBuilder::new().unwrap()), Some(0.1))
    }

    fn request(name: &str) -> SchemaGenerationRequest {
        SchemaGenerationRequest {
            model_name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn splits_sql_script_from_description() {
        let llm = Arc::new(FakeLlm::content(
            r#"{"entities":[],"relationships":[],"description":"d","sql_script":"CREATE TABLE t (id INT);"}"#,
        ));
        let response = generator(llm.clone()).generate(&request("library")).await;

        assert_eq!(response.error, None);
        assert_eq!(response.model_name, "library");
        assert_eq!(response.sql_script, "CREATE TABLE t (id INT);");
        assert_eq!(
            response.schema_description,
            r#"{"entities":[],"relationships":[],"description":"d"}"#
        );
        let parsed: Value = serde_json::from_str(&response.schema_description).unwrap();
        assert!(parsed.get("sql_script").is_none());
        assert!(response.unused_field.is_none());

        let (prompt, temperature) = llm.last_prompt();
        assert!(prompt.contains("\n\nlibrary\n\n"));
        assert_eq!(temperature, Some(0.1));
    }

    #[tokio::test]
    async fn accepts_fenced_reply() {
        let llm = Arc::new(FakeLlm::content(
            "```json\n{\"entities\":[{\"name\":\"book\"}],\"relationships\":[],\"description\":\"lib\",\"sql_script\":\"CREATE TABLE book (id INT);\"}\n```",
        ));
        let response = generator(llm).generate(&request("library")).await;

        assert_eq!(response.error, None);
        assert_eq!(response.sql_script, "CREATE TABLE book (id INT);");
        let parsed: Value = serde_json::from_str(&response.schema_description).unwrap();
        assert_eq!(parsed["entities"], json!([{"name": "book"}]));
    }

    #[tokio::test]
    async fn closing_remark_after_reply_is_ignored() {
        let llm = Arc::new(FakeLlm::content(
            "```json\n{\"entities\":[],\"description\":\"d\",\"sql_script\":\"CREATE TABLE t (id INT);\"}\n```\nHope this helps.",
        ));
        let response = generator(llm).generate(&request("shop")).await;

        assert_eq!(response.error, None);
        assert_eq!(response.sql_script, "CREATE TABLE t (id INT);");
        assert_eq!(response.schema_description, r#"{"entities":[],"description":"d"}"#);
    }

    #[tokio::test]
    async fn latency_covers_the_model_call() {
        let delay = Duration::from_millis(25);

        let llm = Arc::new(FakeLlm::content(r#"{"entities":[]}"#).with_delay(delay));
        let response = generator(llm).generate(&request("shop")).await;
        assert_eq!(response.error, None);
        assert!(response.latency_ms >= 25, "latency {}ms", response.latency_ms);

        let llm = Arc::new(FakeLlm::failing("timeout").with_delay(delay));
        let response = generator(llm).generate(&request("shop")).await;
        assert_eq!(response.schema_description, SCHEMA_FALLBACK);
        assert!(response.latency_ms >= 25, "latency {}ms", response.latency_ms);
    }

    #[tokio::test]
    async fn missing_sql_script_yields_empty_script() {
        let llm = Arc::new(FakeLlm::content(r#"{"entities":[],"description":"x"}"#));
        let response = generator(llm).generate(&request("shop")).await;

        assert_eq!(response.error, None);
        assert_eq!(response.sql_script, "");
        assert_eq!(response.schema_description, r#"{"entities":[],"description":"x"}"#);
    }

    #[tokio::test]
    async fn non_json_reply_falls_back() {
        let llm = Arc::new(FakeLlm::content("I cannot help with that."));
        let response = generator(llm).generate(&request("shop")).await;

        assert_eq!(response.schema_description, SCHEMA_FALLBACK);
        assert_eq!(response.sql_script, "");
        assert!(response.error.as_deref().is_some_and(|e| !e.is_empty()));
    }

    #[tokio::test]
    async fn non_object_reply_falls_back() {
        let llm = Arc::new(FakeLlm::content("[1, 2, 3]"));
        let response = generator(llm).generate(&request("shop")).await;

        assert_eq!(response.schema_description, SCHEMA_FALLBACK);
        assert_eq!(response.error.as_deref(), Some("model output is not a JSON object"));
    }

    #[tokio::test]
    async fn transport_failure_falls_back_with_message() {
        let llm = Arc::new(FakeLlm::failing("connection refused"));
        let response = generator(llm).generate(&request("shop")).await;

        assert_eq!(response.schema_description, SCHEMA_FALLBACK);
        assert_eq!(response.sql_script, "");
        assert_eq!(response.error.as_deref(), Some("connection refused"));
    }

    #[tokio::test]
    async fn malformed_envelope_falls_back() {
        let llm = Arc::new(FakeLlm::body(json!({"id": "x", "choices": []})));
        let response = generator(llm).generate(&request("shop")).await;

        assert_eq!(response.schema_description, SCHEMA_FALLBACK);
        assert!(response.error.is_some());
    }
}
