//! Error types for the route watcher.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::RouteError;

/// Errors from watcher setup. Failures inside the watch loop are logged, not returned.
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Failed to initialize watcher: {reason}")]
    InitFailed { reason: String },

    #[error("Cannot watch path {path}: {reason}")]
    PathWatchFailed { path: PathBuf, reason: String },

    #[error("Invalid watch configuration: {0}")]
    Config(#[from] RouteError),
}

impl From<notify::Error> for WatchError {
    fn from(e: notify::Error) -> Self {
        WatchError::InitFailed {
            reason: e.to_string(),
        }
    }
}
