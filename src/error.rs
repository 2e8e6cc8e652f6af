//! # Error Taxonomy
//!
//! Structured errors returned across the engine boundary. Resolution and construction
//! failures surface as [`ExecutorError`]; handler faults are folded into the step result
//! as a [`StepError`] and never propagate as errors.

use serde::{Deserialize, Serialize};
use std::any::Any;
use thiserror::Error;

/// Discriminant shared by every failure the engine can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ModelNotFound,
    StepNotFound,
    InvalidStepHandler,
    StepExecutionFault,
    ConstructionFault,
}

/// Why a step name resolved to something the engine refuses to invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerDefect {
    /// More than one public method shares the step name
    MultipleHandlers,
    /// The single match takes parameters the engine cannot supply
    InvalidHandler,
}

impl HandlerDefect {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerDefect::MultipleHandlers => "MultipleHandlers",
            HandlerDefect::InvalidHandler => "InvalidHandler",
        }
    }
}

impl std::fmt::Display for HandlerDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures detected before a handler is invoked
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    #[error("No model named `{model}` was registered")]
    ModelNotFound { model: String },

    #[error("Method named `{step}` not found in class `{model}`.")]
    StepNotFound { model: String, step: String },

    #[error("{reason} for `{step}` in type `{model}`.")]
    InvalidStepHandler {
        model: String,
        step: String,
        reason: HandlerDefect,
    },

    #[error("Could not create an instance of `{model}`: {reason}")]
    ConstructionFault { model: String, reason: String },
}

impl ExecutorError {
    pub fn model_not_found(model: impl Into<String>) -> Self {
        Self::ModelNotFound {
            model: model.into(),
        }
    }

    pub fn step_not_found(model: impl Into<String>, step: impl Into<String>) -> Self {
        Self::StepNotFound {
            model: model.into(),
            step: step.into(),
        }
    }

    pub fn invalid_handler(
        model: impl Into<String>,
        step: impl Into<String>,
        reason: HandlerDefect,
    ) -> Self {
        Self::InvalidStepHandler {
            model: model.into(),
            step: step.into(),
            reason,
        }
    }

    pub fn construction_fault(model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConstructionFault {
            model: model.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ExecutorError::ModelNotFound { .. } => ErrorKind::ModelNotFound,
            ExecutorError::StepNotFound { .. } => ErrorKind::StepNotFound,
            ExecutorError::InvalidStepHandler { .. } => ErrorKind::InvalidStepHandler,
            ExecutorError::ConstructionFault { .. } => ErrorKind::ConstructionFault,
        }
    }
}

/// Errors raised while building the model registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Service already started. Register the models before starting the service.")]
    Closed,

    #[error("A model named `{name}` is already registered")]
    DuplicateModel { name: String },

    #[error("`{name}` is reserved for the setup model; use register_setup instead")]
    ReservedName { name: String },

    #[error("A setup model (`{existing}`) is already registered")]
    SetupAlreadyRegistered { existing: String },
}

/// Fault raised by a step handler, in the shape the driver expects on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepError {
    pub message: String,
    pub trace: String,
}

impl StepError {
    pub fn new(message: impl Into<String>, trace: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace: trace.into(),
        }
    }

    /// The alternate debug rendering carries the cause chain (and a backtrace when enabled).
    pub fn from_anyhow(error: anyhow::Error) -> Self {
        Self {
            message: error.to_string(),
            trace: format!("{error:?}"),
        }
    }

    /// Build a fault from a caught panic payload.
    pub fn from_panic(payload: Box<dyn Any + Send>, location: &str) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&'static str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "step handler panicked".to_string()
        };
        Self {
            trace: format!("panicked in {location}: {message}"),
            message,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::StepExecutionFault
    }
}

pub type Result<T> = std::result::Result<T, ExecutorError>;
