//! Route and RouteMap types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Canonical path of the synthetic root route.
pub const ROOT_PATH: &str = "/";

/// One navigable route.
///
/// `params` keeps parameter names in order of first appearance; values are
/// empty placeholders filled in by whoever builds a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub path: String,
    pub is_dynamic: bool,
    pub params: IndexMap<String, String>,
}

impl Route {
    /// A static route without parameters.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_dynamic: false,
            params: IndexMap::new(),
        }
    }

    /// The synthetic `/` route every map ends with.
    pub fn root() -> Self {
        Self::new(ROOT_PATH)
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }
}

/// Canonical path → Route, in insertion order.
///
/// Inserting an existing path replaces the route but keeps the key's position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteMap {
    routes: IndexMap<String, Route>,
}

impl RouteMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a route under its own path, returning the route it replaced.
    pub fn insert(&mut self, route: Route) -> Option<Route> {
        let replaced = self.routes.insert(route.path.clone(), route);
        if let Some(old) = &replaced {
            crate::debug_event!("route-map", "replaced", "{}", old.path);
        }
        replaced
    }

    pub fn get(&self, path: &str) -> Option<&Route> {
        self.routes.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.routes.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Route)> {
        self.routes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Pretty JSON with two-space indentation, as embedded in emitted artifacts.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl FromIterator<Route> for RouteMap {
    fn from_iter<I: IntoIterator<Item = Route>>(iter: I) -> Self {
        let mut map = RouteMap::new();
        for route in iter {
            map.insert(route);
        }
        map
    }
}

/// Build a map from routes in sequence order; later duplicates win.
pub fn build_route_map(routes: impl IntoIterator<Item = Route>) -> RouteMap {
    routes.into_iter().collect()
}
