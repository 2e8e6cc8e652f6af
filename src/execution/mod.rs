//! # Step Execution
//!
//! Resolution, instance lifetime, output capture and the engine that composes them.
//!
//! ```text
//! ExecutionEngine
//! ├── StepResolver     (name -> handler classification)
//! ├── InstanceManager  (one live instance per model type)
//! └── TraceCapture     (per-execution diagnostic collector)
//! ```

pub mod engine;
pub mod instance_manager;
pub mod step_resolver;
pub mod trace_capture;

pub use engine::ExecutionEngine;
pub use instance_manager::InstanceManager;
pub use step_resolver::{StepResolution, StepResolver};
pub use trace_capture::{is_capturing, CaptureScope, TraceCapture};
