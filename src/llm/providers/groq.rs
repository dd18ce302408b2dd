use crate::config::LlmConfig;
use crate::llm::models::ChatRequest;
use crate::llm::{ChatCompletion, LlmError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error};

/// OpenAI-compatible chat-completion client (Groq by default).
pub struct GroqClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl GroqClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                LlmError::Config("API key is required for the chat-completion provider".to_string())
            })?;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| LlmError::Config(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key,
            model: config.model.clone(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl ChatCompletion for GroqClient {
    async fn complete(
        &self,
        prompt: &str,
        temperature: Option<f32>,
    ) -> Result<serde_json::Value, LlmError> {
        let request = ChatRequest::single_user_message(&self.model, prompt, temperature);

        debug!(
            "Calling chat completion at {} with model: {}",
            self.api_url, self.model
        );

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Chat completion responded with status code: {} - {}", status, body);
            return Err(LlmError::Request(format!("{} {}", status, body)));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| LlmError::Request(format!("Failed to read response body: {}", e)))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
