//! # Gateway Response Types
//!
//! Wire envelopes the driver expects: successful bodies are wrapped as `{"payload": ...}`
//! and failures as `{"error": {"message": ..., "trace": ...}}`. Executor errors map to the
//! non-standard 46x status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::any::Any;
use thiserror::Error;
use tracing::{error, warn};

use crate::constants::wire_status;
use crate::error::{ErrorKind, ExecutorError, StepError};

/// Successful response body, serialized as `{"payload": T}`
#[derive(Debug, Clone, Serialize)]
pub struct Payload<T> {
    pub payload: T,
}

impl<T> Payload<T> {
    pub fn new(payload: T) -> Self {
        Self { payload }
    }
}

impl<T: Serialize> IntoResponse for Payload<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HasModelResponse {
    #[serde(rename = "hasModel")]
    pub has_model: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HasStepResponse {
    #[serde(rename = "hasStep")]
    pub has_step: bool,
}

/// Error body, serialized as `{"error": {...}}`
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

/// Gateway errors with their HTTP status mapping
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Executor(#[from] ExecutorError),

    #[error("Handler not found")]
    HandlerNotFound,

    #[error("Invalid request: {message}")]
    BadRequest { message: String },

    #[error("{message}")]
    Internal { message: String, trace: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>, trace: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            trace: trace.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Executor(error) => match error.kind() {
                ErrorKind::ModelNotFound => status(wire_status::MODEL_NOT_FOUND),
                ErrorKind::StepNotFound => status(wire_status::STEP_NOT_FOUND),
                ErrorKind::InvalidStepHandler => status(wire_status::INVALID_STEP_HANDLER),
                ErrorKind::ConstructionFault | ErrorKind::StepExecutionFault => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::HandlerNotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn trace(&self) -> Option<String> {
        match self {
            ApiError::Executor(error) => Some(format!("{error:?}")),
            ApiError::HandlerNotFound => None,
            ApiError::BadRequest { message } => Some(message.clone()),
            ApiError::Internal { trace, .. } => Some(trace.clone()),
        }
    }
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            error!(status = %status_code, error = %self, "Executor request failed");
        } else if status_code != StatusCode::NOT_FOUND {
            warn!(status = %status_code, error = %self, "Executor request rejected");
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                message: self.to_string(),
                trace: self.trace(),
            },
        };
        (status_code, Json(body)).into_response()
    }
}

/// Response for a panic that escaped a request handler
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let fault = StepError::from_panic(payload, "request handler");
    ApiError::internal(fault.message, fault.trace).into_response()
}

pub type ApiResult<T> = Result<T, ApiError>;
