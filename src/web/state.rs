//! # Gateway State
//!
//! Shared state handed to every request handler.

use std::sync::Arc;
use tracing::info;

use crate::execution::ExecutionEngine;

/// Shared application state for the executor gateway
#[derive(Debug, Clone)]
pub struct ExecutorWebState {
    pub engine: Arc<ExecutionEngine>,
}

impl ExecutorWebState {
    pub fn new(engine: Arc<ExecutionEngine>) -> Self {
        info!(
            models = ?engine.registry().model_names(),
            "Executor web state created"
        );
        Self { engine }
    }
}
