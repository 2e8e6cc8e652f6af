//! # Executor Gateway
//!
//! HTTP surface over the execution engine, shaped after the AltWalker executor protocol.
//!
//! | Route                          | Method | Body                          |
//! |--------------------------------|--------|-------------------------------|
//! | `/altwalker/hasModel?name=`    | GET    | `{"payload":{"hasModel":b}}`  |
//! | `/altwalker/hasStep?modelName=&name=` | GET | `{"payload":{"hasStep":b}}` |
//! | `/altwalker/executeStep?modelName=&name=` | POST | `{"payload": result}`  |
//! | `/altwalker/reset`             | PUT    | empty                         |
//! | `/altwalker/load`              | POST   | empty                         |

use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::info;

pub mod handlers;
pub mod response_types;
pub mod routes;
pub mod state;

pub use response_types::{ApiError, ApiResult, Payload};
pub use state::ExecutorWebState;

/// Create the executor web application with all routes and middleware
pub fn create_app(state: Arc<ExecutorWebState>) -> Router {
    let common_middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(response_types::handle_panic));

    let app = Router::new()
        .merge(routes::executor_routes())
        .fallback(handlers::executor::handler_not_found)
        .method_not_allowed_fallback(handlers::executor::handler_not_found)
        .layer(common_middleware)
        .with_state(state);

    info!("Executor web application created with all routes and middleware");
    app
}
