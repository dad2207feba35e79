//! Emitters that turn a finished [`RouteMap`] into text artifacts.
//!
//! The pipeline only knows the [`RouteEmitter`] trait; what gets written and
//! where belongs to each emitter.

mod declaration;
mod link_helper;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{RouteError, RouteResult};
use crate::routes::RouteMap;

pub use declaration::DeclarationEmitter;
pub use link_helper::LinkHelperEmitter;

/// Trait for consumers of a generated route table.
#[async_trait]
pub trait RouteEmitter: Send + Sync {
    /// Emitter name for logging.
    fn name(&self) -> &str;

    /// Where the artifact is written.
    fn output_path(&self) -> &Path;

    /// Render the artifact text.
    fn render(&self, routes: &RouteMap) -> RouteResult<String>;

    /// Render and write the artifact, returning the written path.
    async fn emit(&self, routes: &RouteMap) -> RouteResult<PathBuf> {
        let contents = self.render(routes)?;
        write_artifact(self.output_path(), &contents).await?;
        Ok(self.output_path().to_path_buf())
    }
}

/// Write `contents` to `path`, creating missing parent directories.
pub async fn write_artifact(path: &Path, contents: &str) -> RouteResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !tokio::fs::try_exists(parent).await.unwrap_or(false) {
            crate::log_event!("emit", "creating", "{}", parent.display());
        }
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| RouteError::io(parent, e))?;
    }
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| RouteError::io(path, e))
}
