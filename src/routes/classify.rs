//! Route classification and path normalization.
//!
//! Decides whether a walked leaf is a page, extracts its dynamic parameters and
//! derives the canonical route path. Canonical paths always start with `/`,
//! never end with `/` (except the root) and never contain `//`.

use std::path::Path;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use super::map::Route;
use super::walker::FileNode;
use crate::error::{RouteError, RouteResult};

/// Basename (before the first `.`) every page file must have.
const PAGE_STEM: &str = "page";

static ROUTE_GROUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^()]*\)").unwrap());
static TRAILING_SLASH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/$").unwrap());
static LEADING_DOUBLE_SLASH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^//").unwrap());
static TRAILING_EXTENSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.[a-z]+$").unwrap());
static TRAILING_PAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/page$").unwrap());
static SLASH_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/{2,}").unwrap());

/// True when the path contains both `[` and `]` anywhere.
///
/// The test covers the whole string, so a bracket in an ancestor directory
/// marks every descendant as dynamic.
pub fn is_dynamic(path: &str) -> bool {
    path.contains('[') && path.contains(']')
}

/// Extract `[name]` tokens left to right, each mapped to an empty placeholder.
///
/// Repeated names keep their first position. Nested, unclosed, unopened or
/// empty brackets are rejected rather than yielding a partial name.
pub fn extract_params(path: &str) -> RouteResult<IndexMap<String, String>> {
    let pattern_error = |reason: String| RouteError::Pattern {
        path: path.to_string(),
        reason,
    };

    let mut params = IndexMap::new();
    let mut open: Option<usize> = None;

    for (idx, ch) in path.char_indices() {
        match ch {
            '[' => {
                if let Some(start) = open {
                    return Err(pattern_error(format!(
                        "nested '[' at byte {idx} inside segment opened at byte {start}"
                    )));
                }
                open = Some(idx);
            }
            ']' => {
                let Some(start) = open.take() else {
                    return Err(pattern_error(format!("unmatched ']' at byte {idx}")));
                };
                let name = &path[start + 1..idx];
                if name.is_empty() {
                    return Err(pattern_error(format!("empty parameter name at byte {start}")));
                }
                params.insert(name.to_string(), String::new());
            }
            _ => {}
        }
    }

    if let Some(start) = open {
        return Err(pattern_error(format!("unclosed '[' at byte {start}")));
    }

    Ok(params)
}

/// A leaf is a page when its extension is recognized and its stem is `page`.
///
/// `extensions` carry the leading dot (`.tsx`).
pub fn is_page_file(path: &str, extensions: &[String]) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path);
    let ext = name.rsplit('.').next().unwrap_or(name);
    let stem = name.split('.').next().unwrap_or(name);

    stem == PAGE_STEM && extensions.iter().any(|e| e.strip_prefix('.') == Some(ext))
}

/// Derive the canonical route path from a leaf path.
///
/// Steps run in a fixed order; later steps clean up what earlier ones leave
/// behind (e.g. group removal produces `//`).
pub fn clean_path(path: &str, app_dir: &str) -> String {
    let mut out = path.strip_prefix(app_dir).unwrap_or(path).to_string();

    // Groups may nest, strip innermost first until none remain
    while ROUTE_GROUP.is_match(&out) {
        out = ROUTE_GROUP.replace_all(&out, "").into_owned();
    }

    let out = TRAILING_SLASH.replace(&out, "");
    let out = LEADING_DOUBLE_SLASH.replace(&out, "/");
    let out = TRAILING_EXTENSION.replace(&out, "");
    let out = TRAILING_PAGE.replace(&out, "");
    let out = SLASH_RUN.replace_all(&out, "/");

    // A group as the last directory leaves a trailing slash only after `/page` is gone
    let mut out = out.into_owned();
    if out.len() > 1 && out.ends_with('/') {
        out.pop();
    }

    if out.starts_with('/') {
        out
    } else {
        format!("/{out}")
    }
}

/// Convert a filesystem path to the `/`-separated string the classifier works on.
pub fn path_to_route_str(path: &Path) -> String {
    let s = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '\\' {
        s.replace('\\', "/")
    } else {
        s.into_owned()
    }
}

/// Classifies walked leaves into routes for one app directory.
#[derive(Debug, Clone)]
pub struct RouteClassifier {
    app_dir: String,
    extensions: Vec<String>,
}

impl RouteClassifier {
    pub fn new(app_dir: &Path, extensions: Vec<String>) -> Self {
        let mut app_dir = path_to_route_str(app_dir);
        while app_dir.len() > 1 && app_dir.ends_with('/') {
            app_dir.pop();
        }
        Self {
            app_dir,
            extensions,
        }
    }

    /// Classify one leaf. Returns `None` for anything that is not a page file.
    pub fn classify(&self, leaf: &Path) -> RouteResult<Option<Route>> {
        let base = path_to_route_str(leaf);
        if !is_page_file(&base, &self.extensions) {
            return Ok(None);
        }

        let params = extract_params(&base)?;
        Ok(Some(Route {
            path: clean_path(&base, &self.app_dir),
            is_dynamic: is_dynamic(&base),
            params,
        }))
    }

    /// Classify every leaf of the tree and append the synthetic root route.
    ///
    /// The root route goes last so it replaces a discovered `page.*` at the
    /// app root once the list is turned into a map.
    pub fn collect(&self, tree: &FileNode) -> RouteResult<Vec<Route>> {
        let mut routes = Vec::new();
        for leaf in tree.leaves() {
            if let Some(route) = self.classify(leaf)? {
                crate::debug_event!("classifier", "page", "{} -> {}", leaf.display(), route.path);
                routes.push(route);
            }
        }
        routes.push(Route::root());
        Ok(routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APP: &str = "/repo/src/app";

    fn exts() -> Vec<String> {
        crate::config::Settings::default().page_extensions
    }

    #[test]
    fn test_clean_path_examples() {
        assert_eq!(clean_path("/repo/src/app/blog/[slug]/page.tsx", APP), "/blog/[slug]");
        assert_eq!(clean_path("/repo/src/app/(auth)/login/page.ts", APP), "/login");
        assert_eq!(clean_path("/repo/src/app/about/page.jsx", APP), "/about");
        assert_eq!(clean_path("/repo/src/app/page.tsx", APP), "/");
        assert_eq!(clean_path("/repo/src/app/blog/(group)/page.tsx", APP), "/blog");
    }

    #[test]
    fn test_clean_path_multiple_groups() {
        assert_eq!(
            clean_path("/repo/src/app/(marketing)/docs/(v2)/intro/page.mdx", APP),
            "/docs/intro"
        );
        assert_eq!(clean_path("/repo/src/app/((nested))/x/page.tsx", APP), "/x");
    }

    #[test]
    fn test_clean_path_is_convergent() {
        for canonical in ["/", "/about", "/blog/[slug]", "/shop/[category]/[item]"] {
            assert_eq!(clean_path(canonical, APP), canonical);
        }
        let once = clean_path("/repo/src/app/(group)//a//b/page.tsx", APP);
        assert_eq!(once, "/a/b");
        assert_eq!(clean_path(&once, APP), once);

        let trailing_group = clean_path("/repo/src/app/blog/(group)/page.tsx", APP);
        assert_eq!(clean_path(&trailing_group, APP), trailing_group);
        assert_eq!(clean_path("/repo/src/app/(group)/page.tsx", APP), "/");
    }

    #[test]
    fn test_is_dynamic_whole_path() {
        assert!(is_dynamic("/app/blog/[slug]/page.tsx"));
        assert!(!is_dynamic("/app/blog/page.tsx"));
        assert!(!is_dynamic("/app/blog[/page.tsx"));
        // ancestor bracket still counts
        assert!(is_dynamic("/work/[old]/app/about/page.tsx"));
    }

    #[test]
    fn test_extract_params_order_and_duplicates() {
        let params = extract_params("/app/[shop]/[item]/[shop]/page.tsx").unwrap();
        let keys: Vec<_> = params.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["shop", "item"]);
        assert!(params.values().all(String::is_empty));

        assert!(extract_params("/app/about/page.tsx").unwrap().is_empty());
    }

    #[test]
    fn test_extract_params_fails_closed() {
        for bad in [
            "/app/[slug/page.tsx",
            "/app/slug]/page.tsx",
            "/app/[a[b]]/page.tsx",
            "/app/[]/page.tsx",
        ] {
            let err = extract_params(bad).unwrap_err();
            assert!(matches!(err, RouteError::Pattern { .. }), "{bad}");
        }
    }

    #[test]
    fn test_is_page_file() {
        let exts = exts();
        assert!(is_page_file("/app/page.tsx", &exts));
        assert!(is_page_file("/app/blog/page.mdx", &exts));
        assert!(is_page_file("/app/blog/page.test.ts", &exts));
        assert!(!is_page_file("/app/layout.tsx", &exts));
        assert!(!is_page_file("/app/page.css", &exts));
        assert!(!is_page_file("/app/.page.tsx", &exts));
        assert!(!is_page_file("/app/_page.tsx", &exts));
        assert!(!is_page_file("/app/page", &exts));
        assert!(!is_page_file("/app/mypage.tsx", &exts));
    }

    #[test]
    fn test_classify_examples() {
        let classifier = RouteClassifier::new(Path::new(APP), exts());

        let route = classifier
            .classify(Path::new("/repo/src/app/blog/[slug]/page.tsx"))
            .unwrap()
            .unwrap();
        assert_eq!(route.path, "/blog/[slug]");
        assert!(route.is_dynamic);
        assert_eq!(route.params.get("slug"), Some(&String::new()));

        let route = classifier
            .classify(Path::new("/repo/src/app/(auth)/login/page.ts"))
            .unwrap()
            .unwrap();
        assert_eq!(route.path, "/login");
        assert!(!route.is_dynamic);
        assert!(route.params.is_empty());

        assert!(classifier
            .classify(Path::new("/repo/src/app/blog/layout.tsx"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_classifier_trims_app_dir_slash() {
        let classifier = RouteClassifier::new(Path::new("/repo/src/app/"), exts());
        let route = classifier
            .classify(Path::new("/repo/src/app/about/page.tsx"))
            .unwrap()
            .unwrap();
        assert_eq!(route.path, "/about");
    }

    #[test]
    fn test_non_page_with_bad_brackets_is_ignored() {
        let classifier = RouteClassifier::new(Path::new(APP), exts());
        let result = classifier.classify(Path::new("/repo/src/app/notes[draft.md"));
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_collect_appends_root_last() {
        let classifier = RouteClassifier::new(Path::new(APP), exts());
        let tree = FileNode {
            base: APP.into(),
            children: vec![
                FileNode::leaf("/repo/src/app/about/page.jsx"),
                FileNode::leaf("/repo/src/app/layout.tsx"),
            ],
        };

        let routes = classifier.collect(&tree).unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].path, "/about");
        assert_eq!(routes[1], Route::root());
    }
}
