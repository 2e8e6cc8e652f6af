//! # Gateway Routes
//!
//! Route table for the driver-facing API under the `/altwalker` prefix.

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::constants::routes as paths;
use crate::web::{handlers, state::ExecutorWebState};

/// Routes the AltWalker driver calls during a run
pub fn executor_routes() -> Router<Arc<ExecutorWebState>> {
    Router::new()
        .route(paths::HAS_MODEL, get(handlers::executor::has_model))
        .route(paths::HAS_STEP, get(handlers::executor::has_step))
        .route(paths::EXECUTE_STEP, post(handlers::executor::execute_step))
        .route(paths::RESET, put(handlers::executor::reset))
        .route(paths::LOAD, post(handlers::executor::load))
}
