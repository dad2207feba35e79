//! Filesystem watcher that keeps generated routes in sync with the app directory.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use super::debouncer::DEFAULT_DEBOUNCE_MS;
use super::error::WatchError;
use super::event::{ChangeEvent, EventFilter};
use super::regenerator::{RegenerationSummary, Regenerator};
use crate::config::WatchConfig;
use crate::routes::RoutePipeline;

const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Watches the app directory recursively and regenerates routes after each
/// burst of added or removed files.
pub struct RouteWatcher {
    pipeline: Arc<RoutePipeline>,
    root: PathBuf,
    quiet_period: Duration,
    ignore_patterns: Vec<String>,
}

impl RouteWatcher {
    pub fn builder() -> RouteWatcherBuilder {
        RouteWatcherBuilder::new()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Watch until `shutdown` resolves. The filesystem watch is released
    /// before this returns, on every path.
    pub async fn watch<F>(self, shutdown: F) -> Result<RegenerationSummary, WatchError>
    where
        F: Future<Output = ()>,
    {
        let filter = EventFilter::new(&self.root, &self.ignore_patterns)?;

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                for change in ChangeEvent::from_notify(&event) {
                    let _ = tx.blocking_send(change);
                }
            }
            Err(e) => tracing::error!("[watcher] file watch error: {e}"),
        })?;

        let guard = WatchGuard::acquire(watcher, &self.root)?;
        crate::log_event!(
            "watcher",
            "started",
            "{} (quiet period {}ms)",
            self.root.display(),
            self.quiet_period.as_millis()
        );

        let summary = Regenerator::new(self.pipeline, filter, self.quiet_period)
            .run(rx, shutdown)
            .await;

        drop(guard);
        Ok(summary)
    }
}

/// Holds the recursive watch on the root; dropping it releases the watch.
pub struct WatchGuard {
    watcher: RecommendedWatcher,
    root: PathBuf,
}

impl WatchGuard {
    pub fn acquire(mut watcher: RecommendedWatcher, root: &Path) -> Result<Self, WatchError> {
        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(|e| WatchError::PathWatchFailed {
                path: root.to_path_buf(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            watcher,
            root: root.to_path_buf(),
        })
    }
}

impl Drop for WatchGuard {
    fn drop(&mut self) {
        if let Err(e) = self.watcher.unwatch(&self.root) {
            tracing::debug!("[watcher] unwatch {} failed: {e}", self.root.display());
        }
        crate::log_event!("watcher", "released", "{}", self.root.display());
    }
}

/// Builder for [`RouteWatcher`].
pub struct RouteWatcherBuilder {
    pipeline: Option<Arc<RoutePipeline>>,
    debounce_ms: u64,
    ignore_patterns: Vec<String>,
}

impl RouteWatcherBuilder {
    pub fn new() -> Self {
        Self {
            pipeline: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            ignore_patterns: Vec::new(),
        }
    }

    /// Set the pipeline to re-run. Its app directory is the watched root.
    pub fn pipeline(mut self, pipeline: Arc<RoutePipeline>) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    pub fn ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Apply the `[watch]` section of the settings.
    pub fn config(self, config: &WatchConfig) -> Self {
        self.debounce_ms(config.debounce_ms)
            .ignore_patterns(config.ignore_patterns.clone())
    }

    pub fn build(self) -> Result<RouteWatcher, WatchError> {
        let pipeline = self.pipeline.ok_or_else(|| WatchError::InitFailed {
            reason: "Pipeline is required".to_string(),
        })?;

        let root = pipeline
            .app_dir()
            .canonicalize()
            .map_err(|e| WatchError::PathWatchFailed {
                path: pipeline.app_dir().to_path_buf(),
                reason: e.to_string(),
            })?;

        Ok(RouteWatcher {
            pipeline,
            root,
            quiet_period: Duration::from_millis(self.debounce_ms),
            ignore_patterns: self.ignore_patterns,
        })
    }
}

impl Default for RouteWatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves on ctrl-c, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("[watcher] failed to listen for ctrl+c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("[watcher] failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    eprintln!("Received shutdown signal");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use tempfile::TempDir;

    fn pipeline_for(root: &Path) -> Arc<RoutePipeline> {
        let settings = Settings {
            app_dir: root.to_path_buf(),
            ..Settings::default()
        };
        Arc::new(RoutePipeline::new(Arc::new(settings)).unwrap())
    }

    #[test]
    fn test_builder_requires_pipeline() {
        assert!(matches!(
            RouteWatcher::builder().build(),
            Err(WatchError::InitFailed { .. })
        ));
    }

    #[test]
    fn test_builder_applies_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = WatchConfig {
            debounce_ms: 50,
            ignore_patterns: vec!["generated/**".to_string()],
        };

        let watcher = RouteWatcher::builder()
            .pipeline(pipeline_for(temp_dir.path()))
            .config(&config)
            .build()
            .unwrap();

        assert_eq!(watcher.quiet_period(), Duration::from_millis(50));
        assert_eq!(watcher.root(), temp_dir.path().canonicalize().unwrap());
    }

    #[tokio::test]
    async fn test_watch_stops_on_shutdown() {
        let temp_dir = TempDir::new().unwrap();
        let watcher = RouteWatcher::builder()
            .pipeline(pipeline_for(temp_dir.path()))
            .build()
            .unwrap();

        let summary = watcher.watch(async {}).await.unwrap();
        assert_eq!(summary, RegenerationSummary::default());
    }
}
