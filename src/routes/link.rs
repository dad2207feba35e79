//! Href building from a route, the Rust counterpart of the emitted `link$` helper.

use super::map::{Route, RouteMap};
use crate::error::{RouteError, RouteResult};

/// Options for building a link to a route.
#[derive(Debug, Clone, Default)]
pub struct LinkOptions<'a> {
    pub params: &'a [(String, String)],
    pub query: &'a [(String, String)],
    pub hash: Option<&'a str>,
}

/// Build an href for `route`.
///
/// Each `[name]` placeholder is replaced by its value. A dynamic route with a
/// parameter missing from `params` is an error. Query pairs are
/// form-urlencoded and appended after `?`, the hash after `#`.
pub fn build_href(route: &Route, options: &LinkOptions<'_>) -> RouteResult<String> {
    let mut path = route.path.clone();

    if route.is_dynamic {
        for name in route.param_names() {
            let value = options
                .params
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value)
                .ok_or_else(|| RouteError::MissingParam {
                    route: route.path.clone(),
                    name: name.to_string(),
                })?;
            path = path.replacen(&format!("[{name}]"), value, 1);
        }
    }

    if !options.query.is_empty() {
        let query = serde_urlencoded::to_string(options.query)
            .map_err(|e| RouteError::Serialization(e.to_string()))?;
        path.push('?');
        path.push_str(&query);
    }

    if let Some(hash) = options.hash {
        path.push('#');
        path.push_str(hash);
    }

    Ok(path)
}

impl RouteMap {
    /// Look up `href` and build a link to it.
    pub fn link(&self, href: &str, options: &LinkOptions<'_>) -> RouteResult<String> {
        let route = self
            .get(href)
            .ok_or_else(|| RouteError::UnknownRoute(href.to_string()))?;
        build_href(route, options)
    }
}
