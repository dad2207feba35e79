//! Route discovery from an app directory.
//!
//! # Architecture
//!
//! ```text
//! TreeWalker (FileNode tree)
//!   -> RouteClassifier (page filter, params, canonical path, synthetic root)
//!   -> build_route_map (RouteMap, later duplicates win)
//!   -> RouteEmitter(s)
//! ```

pub mod classify;
pub mod link;
pub mod map;
pub mod pipeline;
pub mod walker;

pub use classify::{RouteClassifier, clean_path, extract_params, is_dynamic, is_page_file};
pub use link::{LinkOptions, build_href};
pub use map::{ROOT_PATH, Route, RouteMap, build_route_map};
pub use pipeline::{GenerationReport, RoutePipeline};
pub use walker::{FileNode, TreeWalker};
