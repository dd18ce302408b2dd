use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::llm::models::{
    SchemaGenerationRequest, SchemaGenerationResponse, TranslateRequest, TranslateResponse,
};
use crate::web::state::AppState;

// System status

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub version: String,
    pub uptime_seconds: i64,
    pub llm_model: String,
    pub llm_endpoint: String,
}

// API Implementations

// Schema generation from a business model name
pub async fn generate_schema(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SchemaGenerationRequest>,
) -> Json<SchemaGenerationResponse> {
    debug!("Schema generation request: {}", payload.model_name);
    Json(state.schema_generator.generate(&payload).await)
}

// Natural language to SQL, or optimization of the given SQL
pub async fn translate(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TranslateRequest>,
) -> Json<TranslateResponse> {
    debug!("Translate request text: {}", payload.text());
    Json(state.translator.translate(&payload).await)
}

pub async fn system_status(State(state): State<Arc<AppState>>) -> Json<SystemStatus> {
    let now = chrono::Utc::now();
    let uptime = now.signed_duration_since(state.startup_time).num_seconds();

    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
        llm_model: state.llm_model.clone(),
        llm_endpoint: state.config.llm.api_url.clone(),
    })
}
