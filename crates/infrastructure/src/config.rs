//! Application configuration
//!
//! Layered from built-in defaults, a TOML/YAML/JSON file and `FAULTLINE__`
//! environment variables (e.g. `FAULTLINE__LOGGING__LEVEL=debug`).
//!
//! ```toml
//! header_override = "ignore"
//!
//! [logging]
//! level = "info"
//!
//! [[routes]]
//! name = "reviews"
//!
//! [routes.fault.delay]
//! percent = 10
//! fixed_delay = "5s"
//! ```

use std::path::Path;
use std::sync::Arc;

use application::{
    ApplicationError, FaultDecisionEngine, HeaderOverride, IgnoreOverride, OpaqueOverride,
    RouteFaultTable,
};
use domain::{FaultPolicy, HttpFaultInjectionConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chaos::{FaultInjector, FaultInjectorConfig};
use crate::telemetry::LoggingConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "FAULTLINE";

/// Config file looked up in the working directory when no path is given
const DEFAULT_FILE_NAME: &str = "faultline";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// Sources could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A fault policy failed validation
    #[error(transparent)]
    Invalid(#[from] ApplicationError),
}

/// How override headers named by a fault are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderOverrideMode {
    /// Always use the configured value
    #[default]
    Ignore,
    /// Pass abort header values through as opaque codes
    Opaque,
}

impl HeaderOverrideMode {
    /// Strategy implementing this mode
    pub fn strategy(self) -> Arc<dyn HeaderOverride> {
        match self {
            Self::Ignore => Arc::new(IgnoreOverride),
            Self::Opaque => Arc::new(OpaqueOverride),
        }
    }
}

/// Fault injection rules of one route
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    /// Route name, unique within the file
    pub name: String,

    /// Faults injected on this route
    #[serde(default)]
    pub fault: HttpFaultInjectionConfig,
}

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FaultLineConfig {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Override header interpretation
    #[serde(default)]
    pub header_override: HeaderOverrideMode,

    /// Safety gates applied by every injector
    #[serde(default)]
    pub injector: FaultInjectorConfig,

    /// Route rules
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

impl FaultLineConfig {
    /// Load configuration from file and environment
    ///
    /// With `path` set the file must exist. Without it an optional
    /// `faultline.{toml,yaml,json}` in the working directory is read.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigLoadError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_FILE_NAME).required(false),
        };

        let config = Self::builder()?
            .add_source(file)
            .add_source(Self::environment())
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Parse configuration from TOML text, ignoring the environment
    pub fn from_toml(text: &str) -> Result<Self, ConfigLoadError> {
        let config = Self::builder()?
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigLoadError> {
        Ok(config::Config::builder()
            // Start with defaults
            .set_default("logging.level", "info")?
            .set_default("header_override", "ignore")?)
    }

    fn environment() -> config::Environment {
        // Override with environment variables (e.g., FAULTLINE__INJECTOR__ENABLED)
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    /// Decision engine using the configured override strategy
    pub fn engine(&self) -> FaultDecisionEngine {
        FaultDecisionEngine::with_header_override(self.header_override.strategy())
    }

    /// Validate every route and build the lookup table
    pub fn route_table(&self) -> Result<RouteFaultTable, ConfigLoadError> {
        let routes = self
            .routes
            .iter()
            .map(|route| (route.name.clone(), route.fault.clone()));
        Ok(RouteFaultTable::from_configs(self.engine(), routes)?)
    }

    /// Gated injector for a named route
    ///
    /// Returns `Ok(None)` for unknown routes.
    pub fn injector_for(&self, route: &str) -> Result<Option<FaultInjector>, ConfigLoadError> {
        let Some(config) = self.routes.iter().find(|r| r.name == route) else {
            return Ok(None);
        };
        let policy = FaultPolicy::try_from(config.fault.clone())
            .map_err(|e| ApplicationError::invalid_route(route, e))?;

        Ok(Some(FaultInjector::with_config(
            self.engine(),
            policy,
            self.injector.clone(),
        )))
    }
}
