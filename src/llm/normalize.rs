use crate::llm::LlmError;
use serde_json::Value;

/// Removes literal ```` ```json ```` and ```` ``` ```` markers anywhere in the text, then trims.
pub fn strip_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Pulls `choices[0].message.content` out of a chat-completion body.
pub fn extract_content(body: &Value) -> Result<String, LlmError> {
    let choices = body
        .get("choices")
        .and_then(Value::as_array)
        .ok_or_else(|| LlmError::InvalidResponse("missing 'choices' array".to_string()))?;

    let first = choices
        .first()
        .ok_or_else(|| LlmError::InvalidResponse("'choices' is empty".to_string()))?;

    let message = first
        .get("message")
        .filter(|m| m.is_object())
        .ok_or_else(|| LlmError::InvalidResponse("missing 'message' in first choice".to_string()))?;

    match message.get("content") {
        Some(Value::String(content)) => Ok(content.trim().to_string()),
        Some(Value::Null) | None => Err(LlmError::InvalidResponse(
            "missing 'content' in message".to_string(),
        )),
        Some(other) => Ok(other.to_string().trim().to_string()),
    }
}

/// Strips fences and parses the first JSON value in the model text. Anything
/// after that value (a closing remark, say) is ignored.
pub fn parse_model_output(raw: &str) -> Result<ModelReply, LlmError> {
    let cleaned = strip_fences(raw);
    match serde_json::Deserializer::from_str(&cleaned)
        .into_iter::<Value>()
        .next()
    {
        Some(Ok(value)) => Ok(ModelReply(value)),
        Some(Err(e)) => Err(LlmError::Parse(e.to_string())),
        None => Err(LlmError::Parse("model output is empty".to_string())),
    }
}

/// Tolerant view over the model's JSON: absent or mistyped fields fall back
/// to defaults instead of failing.
#[derive(Debug, Clone)]
pub struct ModelReply(pub Value);

impl ModelReply {
    pub fn text(&self, key: &str, default: &str) -> String {
        match self.0.get(key) {
            None | Some(Value::Null) => default.to_string(),
            Some(value) => as_text(value),
        }
    }

    pub fn strings(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::Null => "null".to_string(),
                    other => as_text(other),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Object(_) => String::new(),
    }
}
