//! # Model Registry
//!
//! Name to model mapping built before the service starts. The reserved `Setup` key holds
//! the run-level setup model and is what a null or empty model name resolves to.
//!
//! Registration closes when the execution engine is built; the registry is immutable from
//! then on and shared behind an `Arc`.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use super::model::{Model, ModelDescriptor};
use crate::constants::{effective_model_name, SETUP_MODEL_NAME};
use crate::error::RegistryError;
use crate::logging::log_registry_operation;

/// Registered models keyed by the name the driver uses
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: BTreeMap<String, Arc<ModelDescriptor>>,
    closed: bool,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `M` under its declared name
    pub fn register_model<M: Model>(&mut self) -> Result<&mut Self, RegistryError> {
        self.register_descriptor(ModelDescriptor::of::<M>())
    }

    /// Register `S` as the setup model.
    ///
    /// Only one setup model may be registered; a second registration is rejected.
    pub fn register_setup<S: Model>(&mut self) -> Result<&mut Self, RegistryError> {
        self.ensure_open()?;
        if let Some(existing) = self.models.get(SETUP_MODEL_NAME) {
            return Err(RegistryError::SetupAlreadyRegistered {
                existing: existing.type_name().to_string(),
            });
        }

        let descriptor = ModelDescriptor::named::<S>(SETUP_MODEL_NAME);
        log_registry_operation(
            "register_setup",
            Some(descriptor.type_name()),
            "registered",
            None,
        );
        self.models
            .insert(SETUP_MODEL_NAME.to_string(), Arc::new(descriptor));
        Ok(self)
    }

    /// Register a prebuilt descriptor under its own name
    pub fn register_descriptor(
        &mut self,
        descriptor: ModelDescriptor,
    ) -> Result<&mut Self, RegistryError> {
        self.ensure_open()?;

        let name = descriptor.name().to_string();
        if name == SETUP_MODEL_NAME {
            return Err(RegistryError::ReservedName { name });
        }
        if self.models.contains_key(&name) {
            return Err(RegistryError::DuplicateModel { name });
        }

        let details = format!("{} public methods", descriptor.methods().len());
        log_registry_operation("register_model", Some(&name), "registered", Some(&details));
        self.models.insert(name, Arc::new(descriptor));
        Ok(self)
    }

    /// Find the model addressed by `model_name`; null and empty names address `Setup`
    pub fn lookup(&self, model_name: Option<&str>) -> Option<&Arc<ModelDescriptor>> {
        self.models.get(effective_model_name(model_name))
    }

    pub fn contains(&self, model_name: Option<&str>) -> bool {
        self.lookup(model_name).is_some()
    }

    pub fn setup(&self) -> Option<&Arc<ModelDescriptor>> {
        self.models.get(SETUP_MODEL_NAME)
    }

    /// Stop accepting registrations
    pub fn close(&mut self) {
        if !self.closed {
            debug!(models = self.models.len(), "Model registry closed");
        }
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Registered keys in sorted order, including `Setup` when present
    pub fn model_names(&self) -> Vec<&str> {
        self.models.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    fn ensure_open(&self) -> Result<(), RegistryError> {
        if self.closed {
            return Err(RegistryError::Closed);
        }
        Ok(())
    }
}
