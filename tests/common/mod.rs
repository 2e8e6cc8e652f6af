//! Shared fixtures for integration tests.

#![allow(dead_code)]

pub mod models;
pub mod strategies;

use altwalker_executor::config::ExecutorConfig;
use altwalker_executor::registry::ModelRegistry;
use altwalker_executor::{ExecutionEngine, ExecutorService, TraceCapture};
use tracing::level_filters::LevelFilter;

use models::{Account, Diagnostics, Incompatible, Overloads, RunSetup, Unconstructible};

/// Registry holding every fixture model, optionally with the setup model
pub fn registry(with_setup: bool) -> ModelRegistry {
    let mut registry = ModelRegistry::new();
    registry
        .register_model::<Account>()
        .and_then(|r| r.register_model::<Diagnostics>())
        .and_then(|r| r.register_model::<Overloads>())
        .and_then(|r| r.register_model::<Incompatible>())
        .and_then(|r| r.register_model::<Unconstructible>())
        .expect("fixture models register");
    if with_setup {
        registry
            .register_setup::<RunSetup>()
            .expect("setup model registers");
    }
    registry
}

/// Engine over every fixture model plus `Setup`, capturing at every level
pub fn engine() -> ExecutionEngine {
    ExecutionEngine::with_trace_capture(registry(true), quiet_capture())
}

pub fn engine_without_setup() -> ExecutionEngine {
    ExecutionEngine::with_trace_capture(registry(false), quiet_capture())
}

fn quiet_capture() -> TraceCapture {
    TraceCapture::new(LevelFilter::TRACE, false)
}

/// Service over every fixture model, bound to an ephemeral local port
pub fn service() -> ExecutorService {
    let mut config = ExecutorConfig::default();
    config.server.bind_address = "127.0.0.1:0".to_string();
    config.trace.forward_to_log = false;

    let mut service = ExecutorService::with_config(config);
    service
        .register_model::<Account>()
        .and_then(|s| s.register_model::<Diagnostics>())
        .and_then(|s| s.register_model::<Overloads>())
        .and_then(|s| s.register_model::<Incompatible>())
        .and_then(|s| s.register_model::<Unconstructible>())
        .and_then(|s| s.register_setup::<RunSetup>())
        .expect("fixture models register");
    service
}
