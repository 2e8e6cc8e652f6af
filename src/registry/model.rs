//! # Model Declarations
//!
//! Compile-time description of a model's public method surface. A model type implements
//! [`Model`] and lists its methods in a [`MethodTable`]; the table is type-erased into a
//! [`ModelDescriptor`] so the engine can dispatch by name without knowing the concrete type.
//!
//! ```rust
//! use altwalker_executor::registry::{MethodTable, Model};
//! use altwalker_executor::types::ContextMap;
//!
//! #[derive(Default)]
//! struct Counter {
//!     hits: u64,
//! }
//!
//! impl Model for Counter {
//!     fn construct() -> anyhow::Result<Self> {
//!         Ok(Self::default())
//!     }
//!
//!     fn methods(table: &mut MethodTable<Self>) {
//!         table
//!             .step("hit", |counter: &mut Counter| counter.hits += 1)
//!             .step_with_context("report", |counter: &mut Counter, data: &mut ContextMap| {
//!                 data.insert("hits".into(), counter.hits.into());
//!             });
//!     }
//! }
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::StepError;
use crate::types::{ContextMap, StepArgs, StepOutput, StepReturn};

/// A live model instance as held by the instance cache
pub type ModelInstance = dyn Any + Send;

/// Type-erased call into one declared step
pub type Invoker = Arc<dyn Fn(&mut ModelInstance, StepArgs<'_>) -> StepReturn + Send + Sync>;

type Constructor = Arc<dyn Fn() -> anyhow::Result<Box<ModelInstance>> + Send + Sync>;

/// A type whose public methods are addressable as steps.
pub trait Model: Send + Sized + 'static {
    /// Name the driver uses to address this model. Defaults to the bare type name.
    fn model_name() -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Zero-argument constructor used on first use after startup or a reset.
    fn construct() -> anyhow::Result<Self> {
        Err(anyhow::anyhow!(
            "`{}` declares no zero-argument constructor",
            Self::model_name()
        ))
    }

    /// Declare the public method surface.
    fn methods(table: &mut MethodTable<Self>);
}

/// Strip module path and generic arguments from a Rust type name
pub fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// One parameter in a declared method signature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// `&mut ContextMap`, supplied by the engine
    ContextMap,
    /// Any other parameter, identified by its Rust type name
    Value(&'static str),
}

impl ParamType {
    pub fn of<T: 'static>() -> Self {
        ParamType::Value(std::any::type_name::<T>())
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::ContextMap => f.write_str("&mut ContextMap"),
            ParamType::Value(name) => f.write_str(name),
        }
    }
}

/// Parameter lists for methods the engine can see but never calls
pub trait ParamList {
    fn param_types() -> Vec<ParamType>;
}

impl<A: 'static> ParamList for (A,) {
    fn param_types() -> Vec<ParamType> {
        vec![ParamType::of::<A>()]
    }
}

impl<A: 'static, B: 'static> ParamList for (A, B) {
    fn param_types() -> Vec<ParamType> {
        vec![ParamType::of::<A>(), ParamType::of::<B>()]
    }
}

impl<A: 'static, B: 'static, C: 'static> ParamList for (A, B, C) {
    fn param_types() -> Vec<ParamType> {
        vec![ParamType::of::<A>(), ParamType::of::<B>(), ParamType::of::<C>()]
    }
}

/// A declared public method
#[derive(Clone)]
pub struct MethodInfo {
    name: String,
    params: Vec<ParamType>,
    invoker: Option<Invoker>,
}

impl MethodInfo {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    pub fn is_invocable(&self) -> bool {
        self.invoker.is_some()
    }

    /// Call the method on `instance`
    pub fn invoke(&self, instance: &mut ModelInstance, args: StepArgs<'_>) -> StepReturn {
        match &self.invoker {
            Some(invoker) => invoker(instance, args),
            None => Err(StepError::new(
                format!("`{}` cannot be invoked as a step", self.name),
                format!("signature: ({})", self.signature()),
            )),
        }
    }

    pub fn signature(&self) -> String {
        self.params
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Debug for MethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInfo")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("invocable", &self.invoker.is_some())
            .finish()
    }
}

/// Builder for a model's method surface
pub struct MethodTable<M> {
    methods: Vec<MethodInfo>,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> MethodTable<M> {
    fn new() -> Self {
        Self {
            methods: Vec::new(),
            _model: PhantomData,
        }
    }

    /// Declare a method taking no parameters
    pub fn step<F, R>(&mut self, name: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut M) -> R + Send + Sync + 'static,
        R: StepOutput,
    {
        let invoker: Invoker = Arc::new(
            move |instance: &mut ModelInstance, _args: StepArgs<'_>| -> StepReturn {
                let model = downcast::<M>(instance)?;
                handler(model).into_step_return()
            },
        );
        self.push(name, Vec::new(), Some(invoker))
    }

    /// Declare a method taking the driver's context map
    pub fn step_with_context<F, R>(&mut self, name: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut M, &mut ContextMap) -> R + Send + Sync + 'static,
        R: StepOutput,
    {
        let invoker: Invoker = Arc::new(
            move |instance: &mut ModelInstance, args: StepArgs<'_>| -> StepReturn {
                let model = downcast::<M>(instance)?;
                match args {
                    StepArgs::Context(data) => handler(model, data).into_step_return(),
                    StepArgs::None => Err(StepError::new(
                        "context map was not supplied",
                        format!("{} expects &mut ContextMap", M::model_name()),
                    )),
                }
            },
        );
        self.push(name, vec![ParamType::ContextMap], Some(invoker))
    }

    /// Declare a public method with parameters the engine cannot supply
    pub fn method<P: ParamList>(&mut self, name: &str) -> &mut Self {
        self.push(name, P::param_types(), None)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    fn push(&mut self, name: &str, params: Vec<ParamType>, invoker: Option<Invoker>) -> &mut Self {
        self.methods.push(MethodInfo {
            name: name.to_string(),
            params,
            invoker,
        });
        self
    }
}

fn downcast<M: 'static>(instance: &mut ModelInstance) -> Result<&mut M, StepError> {
    instance.downcast_mut::<M>().ok_or_else(|| {
        StepError::new(
            "model instance has an unexpected type",
            format!("expected {}", std::any::type_name::<M>()),
        )
    })
}

/// Immutable, type-erased description of a registered model
#[derive(Clone)]
pub struct ModelDescriptor {
    name: String,
    type_id: TypeId,
    type_name: &'static str,
    constructor: Constructor,
    methods: Arc<[MethodInfo]>,
}

impl ModelDescriptor {
    /// Describe `M` under its declared name
    pub fn of<M: Model>() -> Self {
        Self::named::<M>(M::model_name())
    }

    /// Describe `M` under an explicit registry key
    pub fn named<M: Model>(name: &str) -> Self {
        let mut table = MethodTable::<M>::new();
        M::methods(&mut table);

        let constructor: Constructor =
            Arc::new(|| M::construct().map(|model| Box::new(model) as Box<ModelInstance>));

        Self {
            name: name.to_string(),
            type_id: TypeId::of::<M>(),
            type_name: std::any::type_name::<M>(),
            constructor,
            methods: table.methods.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    /// Every declared method carrying exactly this name
    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodInfo> + 'a {
        self.methods.iter().filter(move |method| method.name == name)
    }

    /// Run the model's zero-argument constructor
    pub fn construct(&self) -> anyhow::Result<Box<ModelInstance>> {
        (self.constructor)()
    }
}

impl fmt::Debug for ModelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelDescriptor")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("methods", &self.methods)
            .finish()
    }
}
