//! Typed route declaration file (`index.d.ts`).

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::RouteEmitter;
use crate::error::RouteResult;
use crate::routes::RouteMap;

/// Writes `const routes = {...}; declare type RoutesOutput = typeof routes;`.
pub struct DeclarationEmitter {
    path: PathBuf,
}

impl DeclarationEmitter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RouteEmitter for DeclarationEmitter {
    fn name(&self) -> &str {
        "declaration"
    }

    fn output_path(&self) -> &Path {
        &self.path
    }

    fn render(&self, routes: &RouteMap) -> RouteResult<String> {
        let json = routes.to_json_pretty()?;
        Ok(format!(
            "\nconst routes = {json};\ndeclare type RoutesOutput = typeof routes;\n"
        ))
    }
}
