//! Error types for route discovery and generation.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid dynamic segment in {path}: {reason}")]
    Pattern { path: String, reason: String },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("Directory tree deeper than {max_depth} levels at {path}")]
    DepthExceeded { path: PathBuf, max_depth: usize },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Missing value for parameter '{name}' in route {route}")]
    MissingParam { route: String, name: String },

    #[error("Unknown route: {0}")]
    UnknownRoute(String),
}

impl RouteError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RouteError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        RouteError::Config {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for RouteError {
    fn from(e: serde_json::Error) -> Self {
        RouteError::Serialization(e.to_string())
    }
}

pub type RouteResult<T> = Result<T, RouteError>;
