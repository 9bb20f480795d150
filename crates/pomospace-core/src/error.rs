//! Core error types for pomospace-core.
//!
//! Nothing in the phase engine is fatal. These errors surface from the
//! storage, configuration and catalog layers; callers recover locally by
//! falling back to defaults.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomospace-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Key-value storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Route catalog errors
    #[error("Route catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A route id that is not present in the catalog
    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not name a known setting
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Route catalog validation errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Catalog has no routes
    #[error("Route catalog is empty")]
    Empty,

    /// Route has no waypoints
    #[error("Route '{0}' has no waypoints")]
    NoWaypoints(String),

    /// Waypoint distances are not strictly increasing
    #[error("Route '{route}': waypoint '{waypoint}' is not further than the previous one")]
    UnorderedWaypoints { route: String, waypoint: String },

    /// Declared total does not match the furthest waypoint
    #[error("Route '{route}': total distance {declared} does not match last waypoint at {actual}")]
    TotalDistanceMismatch {
        route: String,
        declared: u32,
        actual: u32,
    },

    /// Two routes share an id
    #[error("Duplicate route id: {0}")]
    DuplicateRoute(String),

    /// Catalog file could not be parsed
    #[error("Failed to parse route catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_sqlite_error_maps_to_locked() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
            None,
        );
        assert!(matches!(StorageError::from(err), StorageError::Locked));
    }

    #[test]
    fn unknown_route_message_names_the_id() {
        let err = CoreError::UnknownRoute("omega".into());
        assert_eq!(err.to_string(), "Unknown route: omega");
    }
}
