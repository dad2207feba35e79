pub mod cli;
pub mod config;
pub mod emit;
pub mod error;
pub mod logging;
pub mod routes;
pub mod watcher;

pub use config::Settings;
pub use emit::{DeclarationEmitter, LinkHelperEmitter, RouteEmitter};
pub use error::{RouteError, RouteResult};
pub use routes::{FileNode, Route, RouteMap, RoutePipeline};
pub use watcher::{RouteWatcher, WatchError};
