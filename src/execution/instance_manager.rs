//! # Instance Manager
//!
//! Lazily constructs and caches one instance per registered model type.
//!
//! Access to instances goes through [`InstanceManager::with_instance`], which holds the cache
//! lock for the duration of the closure. Step executions are therefore serialized, and a
//! [`InstanceManager::reset`] issued while a step runs waits for that step to finish.

use parking_lot::Mutex;
use std::any::TypeId;
use std::collections::hash_map::{Entry, HashMap};
use std::panic::{self, AssertUnwindSafe};
use tracing::info;

use crate::error::{ExecutorError, StepError};
use crate::registry::{ModelDescriptor, ModelInstance};

/// Exclusive owner of live model instances
#[derive(Default)]
pub struct InstanceManager {
    instances: Mutex<HashMap<TypeId, Box<ModelInstance>>>,
}

impl InstanceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the cached instance of `model`, constructing it on first use.
    ///
    /// A constructor error or panic is reported as `ConstructionFault`; nothing is cached in
    /// that case, so the next call retries construction.
    pub fn with_instance<R>(
        &self,
        model: &ModelDescriptor,
        f: impl FnOnce(&mut ModelInstance) -> R,
    ) -> Result<R, ExecutorError> {
        let mut instances = self.instances.lock();

        let instance = match instances.entry(model.type_id()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                entry.insert(Self::construct(model)?)
            }
        };

        Ok(f(instance.as_mut()))
    }

    /// Drop every cached instance
    pub fn reset(&self) {
        let mut instances = self.instances.lock();
        let discarded = instances.len();
        instances.clear();
        info!(discarded = discarded, "Model instances reset");
    }

    /// Number of live instances
    pub fn len(&self) -> usize {
        self.instances.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether an instance of `M` is currently cached
    pub fn contains<M: 'static>(&self) -> bool {
        self.instances.lock().contains_key(&TypeId::of::<M>())
    }

    fn construct(model: &ModelDescriptor) -> Result<Box<ModelInstance>, ExecutorError> {
        match panic::catch_unwind(AssertUnwindSafe(|| model.construct())) {
            Ok(Ok(instance)) => Ok(instance),
            Ok(Err(error)) => Err(ExecutorError::construction_fault(
                model.name(),
                format!("{error:#}"),
            )),
            Err(payload) => {
                let fault = StepError::from_panic(payload, &format!("{}::construct", model.name()));
                Err(ExecutorError::construction_fault(model.name(), fault.message))
            }
        }
    }
}

impl std::fmt::Debug for InstanceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceManager")
            .field("instances", &self.len())
            .finish()
    }
}
