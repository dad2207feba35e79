//! Trailing-edge debouncing of route-affecting changes.
//!
//! A burst of add/remove events collapses into exactly one regeneration,
//! fired once no new event arrived for the quiet period. Timers go through
//! [`TimerScheduler`] so the state machine can be driven by a virtual clock.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use indexmap::IndexSet;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Default quiet period in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Identifies one started timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// Starts and cancels one-shot timers.
///
/// A started timer reports its token back to the owner once it expires;
/// how the token travels is up to the implementation.
pub trait TimerScheduler {
    fn start(&mut self, after: Duration) -> TimerToken;
    fn cancel(&mut self, token: TimerToken);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    PendingRegeneration,
}

/// Paths that changed during one burst.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Burst {
    pub paths: Vec<PathBuf>,
}

impl Burst {
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Idle / PendingRegeneration state machine with an in-flight flag.
#[derive(Debug)]
pub struct Debouncer<S: TimerScheduler> {
    scheduler: S,
    quiet_period: Duration,
    /// Changed paths since the last run started; duplicates coalesce.
    pending: IndexSet<PathBuf>,
    timer: Option<TimerToken>,
    in_flight: bool,
    /// Timer expired while a run was in flight.
    deferred: bool,
}

impl<S: TimerScheduler> Debouncer<S> {
    pub fn new(scheduler: S, quiet_period: Duration) -> Self {
        Self {
            scheduler,
            quiet_period,
            pending: IndexSet::new(),
            timer: None,
            in_flight: false,
            deferred: false,
        }
    }

    /// Record a qualifying change and restart the quiet-period timer.
    pub fn record(&mut self, path: PathBuf) {
        self.pending.insert(path);
        if let Some(previous) = self.timer.take() {
            self.scheduler.cancel(previous);
        }
        self.timer = Some(self.scheduler.start(self.quiet_period));
    }

    /// Handle an expired timer.
    ///
    /// Returns the burst to regenerate for, or `None` when the token is stale,
    /// nothing is pending, or a run is still in flight (the burst then runs
    /// once [`finish`](Self::finish) is called).
    pub fn on_timer(&mut self, token: TimerToken) -> Option<Burst> {
        if self.timer != Some(token) {
            return None;
        }
        self.timer = None;

        if self.in_flight {
            self.deferred = true;
            return None;
        }
        self.begin()
    }

    /// Mark the in-flight run as done. Returns the deferred burst, if any.
    ///
    /// When a newer event restarted the timer, the deferred paths wait for
    /// that timer so the last event still gets its full quiet period.
    pub fn finish(&mut self) -> Option<Burst> {
        self.in_flight = false;
        if !std::mem::take(&mut self.deferred) || self.timer.is_some() {
            return None;
        }
        self.begin()
    }

    fn begin(&mut self) -> Option<Burst> {
        if self.pending.is_empty() {
            return None;
        }
        self.in_flight = true;
        Some(Burst {
            paths: std::mem::take(&mut self.pending).into_iter().collect(),
        })
    }

    pub fn state(&self) -> DebounceState {
        if self.pending.is_empty() {
            DebounceState::Idle
        } else {
            DebounceState::PendingRegeneration
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

/// Scheduler backed by `tokio::time`. Expired tokens arrive on the receiver
/// returned from [`TokioScheduler::new`].
#[derive(Debug)]
pub struct TokioScheduler {
    next: u64,
    tx: mpsc::UnboundedSender<TimerToken>,
    timers: HashMap<TimerToken, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerToken>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            next: 0,
            tx,
            timers: HashMap::new(),
        };
        (scheduler, rx)
    }
}

impl TimerScheduler for TokioScheduler {
    fn start(&mut self, after: Duration) -> TimerToken {
        self.timers.retain(|_, handle| !handle.is_finished());

        let token = TimerToken(self.next);
        self.next += 1;

        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = tx.send(token);
        });
        self.timers.insert(token, handle);
        token
    }

    fn cancel(&mut self, token: TimerToken) {
        if let Some(handle) = self.timers.remove(&token) {
            handle.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }
}

/// Virtual-clock scheduler. Time only moves through [`ManualScheduler::advance`].
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next: u64,
    timers: Vec<(TimerToken, Duration)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn active_timers(&self) -> usize {
        self.timers.len()
    }

    /// Move the clock forward and return the timers that expired, earliest first.
    pub fn advance(&mut self, by: Duration) -> Vec<TimerToken> {
        self.now += by;
        let now = self.now;

        let mut due: Vec<(TimerToken, Duration)> = Vec::new();
        self.timers.retain(|&(token, deadline)| {
            if deadline <= now {
                due.push((token, deadline));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(_, deadline)| deadline);
        due.into_iter().map(|(token, _)| token).collect()
    }
}

impl TimerScheduler for ManualScheduler {
    fn start(&mut self, after: Duration) -> TimerToken {
        let token = TimerToken(self.next);
        self.next += 1;
        self.timers.push((token, self.now + after));
        token
    }

    fn cancel(&mut self, token: TimerToken) {
        self.timers.retain(|&(t, _)| t != token);
    }
}
