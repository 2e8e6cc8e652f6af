//! # System Constants
//!
//! Names, routes and wire status codes shared between the engine and the HTTP gateway.
//! Values match what the AltWalker driver expects from an executor.

/// Reserved registry key for the run-level setup model
pub const SETUP_MODEL_NAME: &str = "Setup";

/// Default address the executor listens on
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5000";

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "ALTWALKER";

/// HTTP routes exposed to the driver
pub mod routes {
    pub const PREFIX: &str = "/altwalker";
    pub const HAS_MODEL: &str = "/altwalker/hasModel";
    pub const HAS_STEP: &str = "/altwalker/hasStep";
    pub const EXECUTE_STEP: &str = "/altwalker/executeStep";
    pub const RESET: &str = "/altwalker/reset";
    pub const LOAD: &str = "/altwalker/load";
}

/// Non-standard status codes the driver interprets as executor errors
pub mod wire_status {
    pub const MODEL_NOT_FOUND: u16 = 460;
    pub const STEP_NOT_FOUND: u16 = 461;
    pub const INVALID_STEP_HANDLER: u16 = 462;
}

/// Message returned for unrouted requests
pub const HANDLER_NOT_FOUND_MESSAGE: &str = "Handler not found";

/// Resolve an optional model name, mapping null/empty to the setup model
pub fn effective_model_name(model_name: Option<&str>) -> &str {
    match model_name {
        Some(name) if !name.is_empty() => name,
        _ => SETUP_MODEL_NAME,
    }
}
