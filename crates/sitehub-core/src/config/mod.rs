//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod auth;
pub mod database;
pub mod logging;
pub mod session;

use serde::{Deserialize, Serialize};

use self::auth::AuthConfig;
use self::database::DatabaseConfig;
use self::logging::LoggingConfig;
use self::session::SessionConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Token signing and credential settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Session lifecycle settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the named environment.
    ///
    /// Sources, later ones winning: `config/default.toml`, then
    /// `config/{env}.toml`, then `SITEHUB__`-prefixed environment
    /// variables (`SITEHUB__DATABASE__URL` overrides `database.url`).
    /// Both files are optional; every section except `database` has
    /// usable defaults.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let overlay = format!("config/{env}");
        config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&overlay).required(false))
            .add_source(
                config::Environment::with_prefix("SITEHUB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(AppError::from)
    }

    /// Load configuration for the environment named by `SITEHUB_ENV`,
    /// defaulting to `development`.
    pub fn from_env() -> Result<Self, AppError> {
        let env = std::env::var("SITEHUB_ENV").unwrap_or_else(|_| "development".to_string());
        Self::load(&env)
    }
}
