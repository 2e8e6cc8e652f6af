#![allow(clippy::doc_markdown)] // Allow technical terms like AltWalker, GraphWalker in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # AltWalker Executor
//!
//! Step execution backend for the AltWalker model-based test driver.
//!
//! ## Overview
//!
//! The driver walks a test graph and, for every vertex and edge, asks the executor whether a
//! handler exists and then asks it to run that handler, threading a shared context map
//! between calls. This crate answers those questions for Rust models registered at startup.
//!
//! ## Architecture
//!
//! - **Registration**: models declare their public method surface through [`registry::Model`]
//!   and are registered by name; a single `Setup` model holds run-level fixtures.
//! - **Dispatch**: [`execution::ExecutionEngine`] resolves `(model, step)` pairs, classifies
//!   the match, invokes it against a persistent per-type instance and folds handler faults
//!   into a structured result.
//! - **Capture**: diagnostics logged with `tracing` during a step are returned as its output.
//! - **Gateway**: [`web`] exposes the engine over the driver's HTTP protocol.
//!
//! ## Module Organization
//!
//! - [`registry`] - Model declarations and the name registry
//! - [`execution`] - Resolver, instance cache, output capture and engine
//! - [`web`] - axum gateway
//! - [`service`] - Host bootstrap
//! - [`config`] - Layered configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use altwalker_executor::registry::{MethodTable, Model};
//! use altwalker_executor::types::ContextMap;
//! use altwalker_executor::ExecutorService;
//!
//! #[derive(Default)]
//! struct Login {
//!     attempts: u32,
//! }
//!
//! impl Model for Login {
//!     fn construct() -> anyhow::Result<Self> {
//!         Ok(Self::default())
//!     }
//!
//!     fn methods(table: &mut MethodTable<Self>) {
//!         table
//!             .step("e_submit", |login: &mut Login| login.attempts += 1)
//!             .step_with_context("v_logged_in", |login: &mut Login, data: &mut ContextMap| {
//!                 data.insert("attempts".into(), login.attempts.into());
//!             });
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut service = ExecutorService::new();
//!     service.register_model::<Login>()?;
//!     service.run_from_args(std::env::args_os()).await
//! }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod execution;
pub mod logging;
pub mod registry;
pub mod service;
pub mod types;
pub mod web;

pub use cli::ExecutorArgs;
pub use config::{ConfigManager, ExecutorConfig};
pub use error::{ErrorKind, ExecutorError, HandlerDefect, RegistryError, Result, StepError};
pub use execution::{ExecutionEngine, TraceCapture};
pub use registry::{MethodTable, Model, ModelRegistry};
pub use service::{ExecutorService, RunningService};
pub use types::{ContextMap, ExecuteStepResult, StepClassification};
