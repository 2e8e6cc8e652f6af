//! # Execution Engine
//!
//! Answers the driver's four questions: does a model exist, does a step exist, run a step,
//! and forget all model state.
//!
//! ## Execution flow
//!
//! ```text
//! execute_step(model, step, data)
//! ├── registry lookup        -> ModelNotFound
//! ├── step resolution        -> StepNotFound | InvalidStepHandler
//! └── invoke
//!     ├── open capture scope
//!     ├── instance lookup    -> ConstructionFault
//!     ├── call handler       (Err and panics folded into the result)
//!     └── collect output
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info_span};
use uuid::Uuid;

use super::instance_manager::InstanceManager;
use super::step_resolver::{StepResolution, StepResolver};
use super::trace_capture::TraceCapture;
use crate::constants::effective_model_name;
use crate::error::{ExecutorError, HandlerDefect, StepError};
use crate::logging::{log_error, log_step_operation};
use crate::registry::{MethodInfo, ModelDescriptor, ModelRegistry};
use crate::types::{ContextMap, ExecuteStepResult, StepArgs};

/// Step dispatcher over a closed model registry
#[derive(Debug)]
pub struct ExecutionEngine {
    registry: Arc<ModelRegistry>,
    resolver: StepResolver,
    instances: InstanceManager,
    capture: TraceCapture,
}

impl ExecutionEngine {
    /// Close `registry` and build an engine with the default capture settings
    pub fn new(registry: ModelRegistry) -> Self {
        Self::with_trace_capture(registry, TraceCapture::default())
    }

    pub fn with_trace_capture(mut registry: ModelRegistry, capture: TraceCapture) -> Self {
        registry.close();
        debug!(
            models = registry.len(),
            capture_level = %capture.level(),
            "Execution engine created"
        );
        Self {
            registry: Arc::new(registry),
            resolver: StepResolver::new(),
            instances: InstanceManager::new(),
            capture,
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn instances(&self) -> &InstanceManager {
        &self.instances
    }

    pub fn has_model(&self, model_name: Option<&str>) -> bool {
        self.registry.contains(model_name)
    }

    /// True when the model exists and the step resolves to an invocable handler
    pub fn has_step(&self, model_name: Option<&str>, step_name: &str) -> bool {
        self.registry
            .lookup(model_name)
            .map(|model| self.resolver.classify(model, step_name).is_invocable())
            .unwrap_or(false)
    }

    /// Run one step.
    ///
    /// Resolution and construction failures are returned as errors. A handler that returns
    /// `Err` or panics still produces `Ok`, with the fault in [`ExecuteStepResult::error`].
    /// Context handlers receive `data` (empty when absent) and hand it back, mutated, in
    /// [`ExecuteStepResult::data`].
    pub fn execute_step(
        &self,
        model_name: Option<&str>,
        step_name: &str,
        data: Option<ContextMap>,
    ) -> Result<ExecuteStepResult, ExecutorError> {
        let model_key = effective_model_name(model_name);
        let execution_id = Uuid::new_v4();
        let span = info_span!(
            "execute_step",
            execution_id = %execution_id,
            model = %model_key,
            step = %step_name
        );
        let _entered = span.enter();

        let (model, method, takes_context) = match self.resolve(model_name, step_name) {
            Ok(resolved) => resolved,
            Err(error) => {
                log_step_operation(
                    "execute_step",
                    model_key,
                    step_name,
                    "rejected",
                    Some(&error.to_string()),
                );
                return Err(error);
            }
        };

        let mut context = takes_context.then(|| data.unwrap_or_default());

        let scope = self.capture.open();
        let invoked = self.instances.with_instance(model, |instance| {
            let args = match context.as_mut() {
                Some(map) => StepArgs::Context(map),
                None => StepArgs::None,
            };
            panic::catch_unwind(AssertUnwindSafe(|| method.invoke(instance, args)))
                .unwrap_or_else(|payload| {
                    let location = format!("{}.{}", model.name(), method.name());
                    Err(StepError::from_panic(payload, &location))
                })
        });
        let output = scope.collect();

        let returned = match invoked {
            Ok(returned) => returned,
            Err(error) => {
                log_error(
                    "ExecutionEngine",
                    "execute_step",
                    &error.to_string(),
                    Some(model.type_name()),
                );
                return Err(error);
            }
        };

        let mut result = ExecuteStepResult {
            output,
            data: context,
            ..Default::default()
        };
        match returned {
            Ok(value) => {
                result.result = value;
                log_step_operation("execute_step", model.name(), step_name, "completed", None);
            }
            Err(fault) => {
                log_step_operation(
                    "execute_step",
                    model.name(),
                    step_name,
                    "faulted",
                    Some(&fault.message),
                );
                result.error = Some(fault);
            }
        }

        Ok(result)
    }

    /// Discard every model instance. Registrations are untouched.
    pub fn reset(&self) {
        self.instances.reset();
    }

    fn resolve(
        &self,
        model_name: Option<&str>,
        step_name: &str,
    ) -> Result<(&ModelDescriptor, &MethodInfo, bool), ExecutorError> {
        let model = self
            .registry
            .lookup(model_name)
            .map(Arc::as_ref)
            .ok_or_else(|| ExecutorError::model_not_found(effective_model_name(model_name)))?;

        match self.resolver.resolve(model, step_name) {
            StepResolution::NoArgs(method) => Ok((model, method, false)),
            StepResolution::WithContext(method) => Ok((model, method, true)),
            StepResolution::NotFound => Err(ExecutorError::step_not_found(model.name(), step_name)),
            StepResolution::Ambiguous { .. } => Err(ExecutorError::invalid_handler(
                model.name(),
                step_name,
                HandlerDefect::MultipleHandlers,
            )),
            StepResolution::IncompatibleSignature(_) => Err(ExecutorError::invalid_handler(
                model.name(),
                step_name,
                HandlerDefect::InvalidHandler,
            )),
        }
    }
}
