//! # Step Resolver
//!
//! Classifies what a step name resolves to on a model. Resolution is a pure function of the
//! descriptor and the name: nothing is cached between calls.

use crate::registry::{MethodInfo, ModelDescriptor, ParamType};
use crate::types::StepClassification;

/// Result of resolving a step name against a model's method surface
#[derive(Debug, Clone, Copy)]
pub enum StepResolution<'a> {
    /// Single match without parameters
    NoArgs(&'a MethodInfo),
    /// Single match taking the context map
    WithContext(&'a MethodInfo),
    NotFound,
    /// More than one method carries the name, whatever their signatures
    Ambiguous { matches: usize },
    /// Single match whose parameters the engine cannot supply
    IncompatibleSignature(&'a MethodInfo),
}

impl<'a> StepResolution<'a> {
    pub fn classification(&self) -> StepClassification {
        match self {
            StepResolution::NoArgs(_) => StepClassification::NoArgs,
            StepResolution::WithContext(_) => StepClassification::WithContext,
            StepResolution::NotFound => StepClassification::NotFound,
            StepResolution::Ambiguous { .. } => StepClassification::Ambiguous,
            StepResolution::IncompatibleSignature(_) => StepClassification::IncompatibleSignature,
        }
    }
}

/// Stateless step classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct StepResolver;

impl StepResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve<'a>(&self, model: &'a ModelDescriptor, step_name: &str) -> StepResolution<'a> {
        let mut candidates = model
            .methods()
            .iter()
            .filter(|method| method.name() == step_name);

        let method = match (candidates.next(), candidates.next()) {
            (None, _) => return StepResolution::NotFound,
            (Some(_), Some(_)) => {
                return StepResolution::Ambiguous {
                    matches: 2 + candidates.count(),
                }
            }
            (Some(method), None) => method,
        };

        match method.params() {
            [] if method.is_invocable() => StepResolution::NoArgs(method),
            [ParamType::ContextMap] if method.is_invocable() => StepResolution::WithContext(method),
            _ => StepResolution::IncompatibleSignature(method),
        }
    }

    pub fn classify(&self, model: &ModelDescriptor, step_name: &str) -> StepClassification {
        self.resolve(model, step_name).classification()
    }
}
