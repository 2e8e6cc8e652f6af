//! # Registry Infrastructure
//!
//! Declaration and registration of models.
//!
//! ## Overview
//!
//! Models describe their public method surface at compile time through [`Model`] and
//! [`MethodTable`]. The [`ModelRegistry`] maps driver-facing names to type-erased
//! [`ModelDescriptor`]s and reserves the `Setup` key for the run-level setup model.
//!
//! ```text
//! Registry Infrastructure
//! ├── Model / MethodTable   (compile-time method surface)
//! ├── ModelDescriptor       (type-erased constructor + methods)
//! └── ModelRegistry         (name -> descriptor, closed at startup)
//! ```

pub mod model;
pub mod model_registry;

pub use model::{
    short_type_name, Invoker, MethodInfo, MethodTable, Model, ModelDescriptor, ModelInstance,
    ParamList, ParamType,
};
pub use model_registry::ModelRegistry;
