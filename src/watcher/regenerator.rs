//! Event loop that turns debounced change bursts into pipeline runs.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

use super::debouncer::{Burst, Debouncer, TimerToken, TokioScheduler};
use super::event::{ChangeEvent, EventFilter};
use crate::error::RouteResult;
use crate::routes::{GenerationReport, RoutePipeline};

/// Counts reported when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegenerationSummary {
    pub runs: usize,
    pub failures: usize,
}

type RunHandle = JoinHandle<RouteResult<GenerationReport>>;

pub struct Regenerator {
    pipeline: Arc<RoutePipeline>,
    filter: EventFilter,
    debouncer: Debouncer<TokioScheduler>,
    timer_rx: mpsc::UnboundedReceiver<TimerToken>,
}

impl Regenerator {
    pub fn new(pipeline: Arc<RoutePipeline>, filter: EventFilter, quiet_period: Duration) -> Self {
        let (scheduler, timer_rx) = TokioScheduler::new();
        Self {
            pipeline,
            filter,
            debouncer: Debouncer::new(scheduler, quiet_period),
            timer_rx,
        }
    }

    /// Consume change events until `shutdown` resolves or the event stream closes.
    ///
    /// Runs are spawned as separate tasks so events keep being recorded while
    /// a run is in flight. A run still in flight at shutdown is aborted; when
    /// the event stream closes it is awaited first.
    pub async fn run<F>(mut self, mut events: mpsc::Receiver<ChangeEvent>, shutdown: F) -> RegenerationSummary
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut summary = RegenerationSummary::default();
        let mut running: Option<RunHandle> = None;

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    if let Some(handle) = running.take() {
                        handle.abort();
                        crate::log_event!("watcher", "aborted in-flight regeneration");
                    }
                    break;
                }

                result = wait_for(&mut running) => {
                    running = None;
                    record_outcome(result, &mut summary);
                    if let Some(burst) = self.debouncer.finish() {
                        running = Some(self.spawn_run(burst));
                    }
                }

                Some(token) = self.timer_rx.recv() => {
                    if let Some(burst) = self.debouncer.on_timer(token) {
                        running = Some(self.spawn_run(burst));
                    }
                }

                event = events.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => {
                        if let Some(handle) = running.take() {
                            record_outcome(handle.await, &mut summary);
                        }
                        break;
                    }
                },
            }
        }

        crate::log_event!(
            "watcher",
            "stopped",
            "{} regenerations, {} failed",
            summary.runs,
            summary.failures
        );
        summary
    }

    fn handle_event(&mut self, event: ChangeEvent) {
        if !self.filter.qualifies(&event) {
            crate::debug_event!("watcher", "ignored", "{} {}", event.kind.label(), event.path.display());
            return;
        }
        crate::debug_event!("watcher", "change", "{} {}", event.kind.label(), event.path.display());
        self.debouncer.record(event.path);
    }

    fn spawn_run(&self, burst: Burst) -> RunHandle {
        crate::log_event!("watcher", "regenerating", "{} changed paths", burst.len());
        let pipeline = Arc::clone(&self.pipeline);
        tokio::spawn(async move { pipeline.generate().await })
    }
}

/// Resolves with the in-flight run's result; pends forever when idle.
async fn wait_for(running: &mut Option<RunHandle>) -> Result<RouteResult<GenerationReport>, JoinError> {
    match running {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

fn record_outcome(
    result: Result<RouteResult<GenerationReport>, JoinError>,
    summary: &mut RegenerationSummary,
) {
    summary.runs += 1;
    match result {
        Ok(Ok(report)) => {
            crate::log_event!("watcher", "regenerated", "{} routes", report.route_count);
        }
        Ok(Err(e)) => {
            summary.failures += 1;
            tracing::error!("[watcher] regeneration failed: {e}");
        }
        Err(e) => {
            summary.failures += 1;
            tracing::error!("[watcher] regeneration task failed: {e}");
        }
    }
}
