//! Command implementations for the CLI.
//!
//! Each command is implemented in its own module.

pub mod generate;
pub mod init;
pub mod link;
pub mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Settings;
use crate::routes::RoutePipeline;

/// Apply a `--app-dir` override and build a pipeline without emitters.
fn pipeline_for(mut settings: Settings, app_dir: Option<PathBuf>) -> anyhow::Result<RoutePipeline> {
    if let Some(dir) = app_dir {
        settings.app_dir = dir;
    }
    Ok(RoutePipeline::new(Arc::new(settings))?)
}
