//! # Core Value Types
//!
//! Values exchanged between the driver, the engine and step handlers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StepError;

/// Ordered, string-keyed blackboard threaded by the driver across step calls.
///
/// Values are arbitrary JSON. Insertion order is preserved through serialization.
pub type ContextMap = serde_json::Map<String, Value>;

/// Arguments the engine supplies to a step invoker
#[derive(Debug)]
pub enum StepArgs<'a> {
    None,
    Context(&'a mut ContextMap),
}

/// What a handler produced: an optional return value or a fault
pub type StepReturn = std::result::Result<Option<Value>, StepError>;

/// Shape of the handler a step name resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepClassification {
    NoArgs,
    WithContext,
    NotFound,
    Ambiguous,
    IncompatibleSignature,
}

impl StepClassification {
    /// Whether the engine is able to invoke a step with this shape
    pub fn is_invocable(&self) -> bool {
        matches!(self, StepClassification::NoArgs | StepClassification::WithContext)
    }
}

/// Outcome of one `execute_step` call.
///
/// `error` present implies `result` absent; `data` is present exactly when the invoked
/// handler takes the context map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecuteStepResult {
    pub output: String,
    pub data: Option<ContextMap>,
    pub result: Option<Value>,
    pub error: Option<StepError>,
}

/// Conversion from a handler's return type into a [`StepReturn`].
///
/// Unit and JSON `null` both mean "no return value".
pub trait StepOutput {
    fn into_step_return(self) -> StepReturn;
}

impl StepOutput for () {
    fn into_step_return(self) -> StepReturn {
        Ok(None)
    }
}

impl StepOutput for Value {
    fn into_step_return(self) -> StepReturn {
        Ok(non_null(self))
    }
}

impl<T, E> StepOutput for std::result::Result<T, E>
where
    T: Serialize,
    E: Into<anyhow::Error>,
{
    fn into_step_return(self) -> StepReturn {
        match self {
            Ok(value) => serde_json::to_value(value).map(non_null).map_err(|e| {
                StepError::from_anyhow(
                    anyhow::Error::new(e)
                        .context("step returned a value that is not JSON-serializable"),
                )
            }),
            Err(error) => Err(StepError::from_anyhow(error.into())),
        }
    }
}

fn non_null(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        other => Some(other),
    }
}
