//! Walk → classify → build pipeline and artifact emission.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::classify::RouteClassifier;
use super::map::{RouteMap, build_route_map};
use super::walker::TreeWalker;
use crate::config::Settings;
use crate::emit::{DeclarationEmitter, LinkHelperEmitter, RouteEmitter};
use crate::error::RouteResult;

/// Outcome of one successful generation run.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub route_count: usize,
    pub artifacts: Vec<PathBuf>,
    pub elapsed: Duration,
}

/// Long-lived pipeline holding the configuration and registered emitters.
///
/// Every run is a full re-walk; nothing is cached between runs.
pub struct RoutePipeline {
    settings: Arc<Settings>,
    walker: TreeWalker,
    classifier: RouteClassifier,
    emitters: Vec<Box<dyn RouteEmitter>>,
}

impl RoutePipeline {
    /// Create a pipeline without emitters. Fails when the app directory is invalid.
    pub fn new(settings: Arc<Settings>) -> RouteResult<Self> {
        settings.validate()?;

        let walker = TreeWalker::new(settings.max_depth);
        let classifier =
            RouteClassifier::new(&settings.app_dir, settings.page_extensions.clone());

        Ok(Self {
            settings,
            walker,
            classifier,
            emitters: Vec::new(),
        })
    }

    /// Register an emitter; emitters run in registration order.
    pub fn with_emitter(mut self, emitter: impl RouteEmitter + 'static) -> Self {
        self.emitters.push(Box::new(emitter));
        self
    }

    /// Register the declaration and link helper emitters at their configured paths.
    pub fn with_default_emitters(self) -> Self {
        let declaration = DeclarationEmitter::new(self.settings.declaration_path.clone());
        let link_helper = LinkHelperEmitter::new(self.settings.utils_path.clone());
        self.with_emitter(declaration).with_emitter(link_helper)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn app_dir(&self) -> &Path {
        &self.settings.app_dir
    }

    pub fn emitter_count(&self) -> usize {
        self.emitters.len()
    }

    /// Run walk, classification and map building. The map is only returned
    /// once every stage finished.
    pub async fn build(&self) -> RouteResult<RouteMap> {
        let tree = self.walker.walk(&self.settings.app_dir).await?;
        let routes = self.classifier.collect(&tree)?;
        Ok(build_route_map(routes))
    }

    /// Build the map and hand it to every emitter, awaiting each write.
    ///
    /// A failure in any stage stops the run before the next emitter; nothing
    /// is emitted when the map could not be built.
    pub async fn generate(&self) -> RouteResult<GenerationReport> {
        let started = Instant::now();
        crate::log_event!("pipeline", "generating routes", "{}", self.settings.app_dir.display());

        let routes = self.build().await?;

        let mut artifacts = Vec::with_capacity(self.emitters.len());
        for emitter in &self.emitters {
            let path = emitter.emit(&routes).await?;
            crate::log_event!(emitter.name(), "emitted", "{}", path.display());
            artifacts.push(path);
        }

        let report = GenerationReport {
            route_count: routes.len(),
            artifacts,
            elapsed: started.elapsed(),
        };
        crate::log_event!(
            "pipeline",
            "routes generated",
            "{} routes in {:?}",
            report.route_count,
            report.elapsed
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouteError;
    use crate::routes::map::Route;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn pipeline_for(root: &Path) -> RoutePipeline {
        let settings = Settings {
            app_dir: root.to_path_buf(),
            ..Settings::default()
        };
        RoutePipeline::new(Arc::new(settings)).unwrap()
    }

    #[tokio::test]
    async fn test_only_about_page() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "about/page.jsx");

        let map = pipeline_for(temp_dir.path()).build().await.unwrap();

        assert_eq!(map.paths().collect::<Vec<_>>(), vec!["/about", "/"]);
        assert_eq!(map.get("/about"), Some(&Route::new("/about")));
        assert_eq!(map.get("/"), Some(&Route::root()));
    }

    #[tokio::test]
    async fn test_root_page_collapses_into_synthetic_root() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "page.tsx");

        let map = pipeline_for(temp_dir.path()).build().await.unwrap();

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("/"), Some(&Route::root()));
    }

    #[tokio::test]
    async fn test_non_pages_never_appear() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "layout.tsx");
        touch(root, ".env");
        touch(root, "_private/page.tsx");
        touch(root, ".hidden/page.tsx");
        touch(root, "blog/[slug]/page.tsx");
        touch(root, "blog/[slug]/loading.tsx");

        let map = pipeline_for(root).build().await.unwrap();

        assert_eq!(map.paths().collect::<Vec<_>>(), vec!["/blog/[slug]", "/"]);
    }

    #[tokio::test]
    async fn test_trailing_group_shares_key_with_parent() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "blog/page.tsx");
        touch(root, "blog/(feed)/page.tsx");

        let map = pipeline_for(root).build().await.unwrap();

        assert_eq!(map.paths().collect::<Vec<_>>(), vec!["/blog", "/"]);
    }

    #[tokio::test]
    async fn test_build_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "(shop)/cart/page.tsx");
        touch(root, "docs/[section]/[page]/page.mdx");

        let pipeline = pipeline_for(root);
        let first = pipeline.build().await.unwrap();
        let second = pipeline.build().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(
            first.paths().collect::<Vec<_>>(),
            second.paths().collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn test_bad_brackets_fail_the_run() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "blog/[slug/page.tsx");

        let err = pipeline_for(temp_dir.path()).build().await.unwrap_err();
        assert!(matches!(err, RouteError::Pattern { .. }));
    }

    #[test]
    fn test_missing_app_dir_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings {
            app_dir: temp_dir.path().join("missing"),
            ..Settings::default()
        };
        assert!(matches!(
            RoutePipeline::new(Arc::new(settings)),
            Err(RouteError::Config { .. })
        ));
    }
}
