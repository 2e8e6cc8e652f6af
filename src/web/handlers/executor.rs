//! # Executor Handlers
//!
//! The five endpoints the AltWalker driver calls. Step execution runs on the blocking pool
//! since handlers are synchronous user code.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::types::{ContextMap, ExecuteStepResult};
use crate::web::response_types::{
    ApiError, ApiResult, HasModelResponse, HasStepResponse, Payload,
};
use crate::web::state::ExecutorWebState;

/// Query parameters for `hasModel`
#[derive(Debug, Default, Deserialize)]
pub struct ModelQuery {
    pub name: Option<String>,
}

/// Query parameters for `hasStep` and `executeStep`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepQuery {
    pub model_name: Option<String>,
    pub name: Option<String>,
}

/// GET /altwalker/hasModel
pub async fn has_model(
    State(state): State<Arc<ExecutorWebState>>,
    Query(query): Query<ModelQuery>,
) -> Payload<HasModelResponse> {
    let has_model = state.engine.has_model(query.name.as_deref());
    debug!(model = ?query.name, has_model, "hasModel");
    Payload::new(HasModelResponse { has_model })
}

/// GET /altwalker/hasStep
pub async fn has_step(
    State(state): State<Arc<ExecutorWebState>>,
    Query(query): Query<StepQuery>,
) -> Payload<HasStepResponse> {
    let step_name = query.name.unwrap_or_default();
    let has_step = state
        .engine
        .has_step(query.model_name.as_deref(), &step_name);
    debug!(model = ?query.model_name, step = %step_name, has_step, "hasStep");
    Payload::new(HasStepResponse { has_step })
}

/// POST /altwalker/executeStep
///
/// The body is optional; when present it may carry the context map as `{"data": {...}}`.
pub async fn execute_step(
    State(state): State<Arc<ExecutorWebState>>,
    Query(query): Query<StepQuery>,
    body: Bytes,
) -> ApiResult<Payload<ExecuteStepResult>> {
    let data = parse_step_data(&body)?;
    let step_name = query.name.unwrap_or_default();
    let model_name = query.model_name;

    let engine = Arc::clone(&state.engine);
    let result = tokio::task::spawn_blocking(move || {
        engine.execute_step(model_name.as_deref(), &step_name, data)
    })
    .await
    .map_err(|e| {
        ApiError::internal(format!("Step execution task failed: {e}"), format!("{e:?}"))
    })??;

    Ok(Payload::new(result))
}

/// PUT /altwalker/reset
pub async fn reset(State(state): State<Arc<ExecutorWebState>>) -> ApiResult<StatusCode> {
    let engine = Arc::clone(&state.engine);
    tokio::task::spawn_blocking(move || engine.reset())
        .await
        .map_err(|e| ApiError::internal(format!("Reset task failed: {e}"), format!("{e:?}")))?;
    Ok(StatusCode::OK)
}

/// POST /altwalker/load
///
/// Models are registered at startup, so there is nothing to load.
pub async fn load() -> StatusCode {
    StatusCode::OK
}

/// Any unrouted path or method
pub async fn handler_not_found() -> ApiError {
    ApiError::HandlerNotFound
}

/// Extract the optional context map from an `executeStep` body
pub fn parse_step_data(body: &[u8]) -> ApiResult<Option<ContextMap>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("malformed JSON body: {e}")))?;

    match value {
        Value::Null => Ok(None),
        Value::Object(mut object) => match object.remove("data") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(data)) => Ok(Some(data)),
            Some(other) => Err(ApiError::bad_request(format!(
                "`data` must be a JSON object, got {}",
                json_type(&other)
            ))),
        },
        other => Err(ApiError::bad_request(format!(
            "request body must be a JSON object, got {}",
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
