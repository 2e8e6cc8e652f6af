//! # Executor Service
//!
//! Host bootstrap: collect model registrations, then build the engine and serve it over
//! HTTP. Registration closes as soon as the engine exists.
//!
//! ```rust,no_run
//! use altwalker_executor::registry::{MethodTable, Model};
//! use altwalker_executor::ExecutorService;
//!
//! struct Smoke;
//!
//! impl Model for Smoke {
//!     fn construct() -> anyhow::Result<Self> {
//!         Ok(Smoke)
//!     }
//!
//!     fn methods(table: &mut MethodTable<Self>) {
//!         table.step("v_start", |_: &mut Smoke| tracing::info!("started"));
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut service = ExecutorService::new();
//!     service.register_model::<Smoke>()?;
//!     service.run_from_args(std::env::args_os()).await
//! }
//! ```

use anyhow::Context;
use axum::Router;
use clap::Parser;
use std::ffi::OsString;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::cli::ExecutorArgs;
use crate::config::{ConfigManager, ConfigResult, ExecutorConfig};
use crate::error::RegistryError;
use crate::execution::{ExecutionEngine, TraceCapture};
use crate::logging::init_structured_logging;
use crate::registry::{Model, ModelRegistry};
use crate::web::{create_app, ExecutorWebState};

/// Registration front-end and HTTP host for the execution engine
#[derive(Debug, Default)]
pub struct ExecutorService {
    config: ExecutorConfig,
    registry: ModelRegistry,
    engine: Option<Arc<ExecutionEngine>>,
}

impl ExecutorService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExecutorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn register_model<M: Model>(&mut self) -> Result<&mut Self, RegistryError> {
        self.ensure_not_started()?;
        self.registry.register_model::<M>()?;
        Ok(self)
    }

    pub fn register_setup<S: Model>(&mut self) -> Result<&mut Self, RegistryError> {
        self.ensure_not_started()?;
        self.registry.register_setup::<S>()?;
        Ok(self)
    }

    pub fn is_started(&self) -> bool {
        self.engine.is_some()
    }

    /// Build the engine on first call, closing registration
    pub fn engine(&mut self) -> ConfigResult<Arc<ExecutionEngine>> {
        if let Some(engine) = &self.engine {
            return Ok(Arc::clone(engine));
        }

        let capture = TraceCapture::from_config(&self.config.trace)?;
        let registry = std::mem::take(&mut self.registry);
        let engine = Arc::new(ExecutionEngine::with_trace_capture(registry, capture));
        self.engine = Some(Arc::clone(&engine));
        Ok(engine)
    }

    /// The gateway application over this service's engine
    pub fn router(&mut self) -> ConfigResult<Router> {
        let engine = self.engine()?;
        let state = Arc::new(ExecutorWebState::new(engine));
        Ok(create_app(state))
    }

    /// Bind the configured address and serve in the background
    pub async fn spawn(&mut self) -> anyhow::Result<RunningService> {
        let bind_address = self.config.server.listen_address()?;
        let app = self.router()?;

        let listener = tokio::net::TcpListener::bind(&bind_address)
            .await
            .with_context(|| format!("Failed to bind to {bind_address}"))?;
        let local_addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = &result {
                error!("Executor web server error: {e}");
            }
            result
        });

        info!(local_addr = %local_addr, "AltWalker executor listening");
        Ok(RunningService {
            local_addr,
            shutdown_tx,
            handle,
        })
    }

    /// Serve until Ctrl-C
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let running = self.spawn().await?;
        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for the shutdown signal")?;
        info!("Shutdown signal received");
        running.stop().await
    }

    /// Parse command-line arguments, load configuration, start logging and serve.
    ///
    /// `args` includes the program name, as with `std::env::args_os()`. Invalid arguments,
    /// `--help` and `--version` print and exit the process.
    pub async fn run_from_args<I, T>(&mut self, args: I) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args = ExecutorArgs::parse_from(args);
        self.apply_args(&args)?;
        init_structured_logging(&self.config.logging);
        self.run().await
    }

    /// Replace the configuration with one loaded from `args` and the environment
    pub fn apply_args(&mut self, args: &ExecutorArgs) -> anyhow::Result<()> {
        self.ensure_not_started()?;
        let manager = ConfigManager::load_with_overrides(&args.overrides())?;
        self.config = manager.config().clone();
        Ok(())
    }

    fn ensure_not_started(&self) -> Result<(), RegistryError> {
        if self.is_started() {
            return Err(RegistryError::Closed);
        }
        Ok(())
    }
}

/// Handle to a server started with [`ExecutorService::spawn`]
#[derive(Debug)]
pub struct RunningService {
    local_addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<std::io::Result<()>>,
}

impl RunningService {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.local_addr)
    }

    /// Stop accepting connections and wait for in-flight requests
    pub async fn stop(self) -> anyhow::Result<()> {
        let _ = self.shutdown_tx.send(());
        self.handle
            .await
            .context("Executor web server task failed")??;
        info!(local_addr = %self.local_addr, "AltWalker executor stopped");
        Ok(())
    }
}
