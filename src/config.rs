//! Application-level configuration: storage backend selection, network port
//! and the optional admin credential. Everything is read exactly once at
//! startup; no code path probes the environment after boot.

use std::env;

use thiserror::Error;
use tracing::info;

/// Selects the storage backend (`memory` or `mongo`).
const STORE_ENV: &str = "HUNT_STORE";
/// MongoDB connection URI, required when the mongo backend is selected.
const MONGO_URI_ENV: &str = "MONGO_URI";
/// MongoDB database name override.
const MONGO_DB_ENV: &str = "MONGO_DB";
/// HTTP listen port.
const PORT_ENV: &str = "PORT";
/// Admin token guarding the organizer routes; open when unset.
const ADMIN_TOKEN_ENV: &str = "ADMIN_TOKEN";

const DEFAULT_PORT: u16 = 8080;

/// Errors raised by invalid startup configuration. All of them are fatal;
/// the process refuses to boot on a backend it cannot identify.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The backend selector has an unrecognized value.
    #[error("unknown HUNT_STORE value `{value}` (expected `memory` or `mongo`)")]
    UnknownBackend {
        /// The rejected value.
        value: String,
    },
    /// The mongo backend was selected without a connection URI.
    #[error("HUNT_STORE=mongo requires MONGO_URI to be set")]
    MissingMongoUri,
    /// The listen port is not a valid u16.
    #[error("invalid PORT value `{value}`")]
    InvalidPort {
        /// The rejected value.
        value: String,
    },
}

/// Which storage backend the process runs against, decided at startup.
#[derive(Debug, Clone)]
pub enum StorageBackendConfig {
    /// Process-scoped in-memory store.
    Memory,
    /// Durable MongoDB store.
    Mongo {
        /// Connection URI.
        uri: String,
        /// Database name; the backend default applies when unset.
        database: Option<String>,
    },
}

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// The storage backend to connect at startup.
    pub backend: StorageBackendConfig,
    /// HTTP listen port.
    pub port: u16,
    /// Admin token; organizer routes are open when absent.
    pub admin_token: Option<String>,
}

impl AppConfig {
    /// Load the configuration from the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let backend = match env::var(STORE_ENV) {
            Err(_) => {
                info!("HUNT_STORE not set; defaulting to the in-memory store");
                StorageBackendConfig::Memory
            }
            Ok(value) => match value.as_str() {
                "memory" => StorageBackendConfig::Memory,
                "mongo" => {
                    let uri = env::var(MONGO_URI_ENV).map_err(|_| ConfigError::MissingMongoUri)?;
                    let database = env::var(MONGO_DB_ENV).ok();
                    StorageBackendConfig::Mongo { uri, database }
                }
                other => {
                    return Err(ConfigError::UnknownBackend {
                        value: other.to_owned(),
                    });
                }
            },
        };

        let port = match env::var(PORT_ENV) {
            Err(_) => DEFAULT_PORT,
            Ok(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { value })?,
        };

        let admin_token = env::var(ADMIN_TOKEN_ENV)
            .ok()
            .filter(|token| !token.is_empty());

        Ok(Self {
            backend,
            port,
            admin_token,
        })
    }
}
