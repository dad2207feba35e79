//! Development-mode watcher that regenerates routes when pages appear or disappear.
//!
//! # Architecture
//!
//! ```text
//! notify (RecommendedWatcher, recursive on app_dir)
//!   -> ChangeEvent (renames split into remove + add)
//!   -> EventFilter (add/remove only, hidden/underscore/ignored paths dropped)
//!   -> Debouncer (quiet-period timer, in-flight flag)
//!   -> RoutePipeline::generate (one run per burst)
//! ```

pub mod debouncer;
pub mod error;
pub mod event;
pub mod regenerator;
pub mod route_watcher;

pub use debouncer::{
    Burst, DEFAULT_DEBOUNCE_MS, DebounceState, Debouncer, ManualScheduler, TimerScheduler,
    TimerToken, TokioScheduler,
};
pub use error::WatchError;
pub use event::{ChangeEvent, ChangeKind, EventFilter};
pub use regenerator::{RegenerationSummary, Regenerator};
pub use route_watcher::{RouteWatcher, RouteWatcherBuilder, WatchGuard, shutdown_signal};
