//! `link$` helper module: the route table plus a typed href builder for the app.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::RouteEmitter;
use crate::error::RouteResult;
use crate::routes::RouteMap;

const ROUTES_PLACEHOLDER: &str = "__ROUTES__";

const TEMPLATE: &str = r#"
export const routes = __ROUTES__;
type IsEmptyObject<T> = keyof T extends never ? true : false;

type Link$Options<T extends keyof RoutesOutput = keyof RoutesOutput> =
  IsEmptyObject<RoutesOutput[T]["params"]> extends false
    ? {
        href: T;
        params: RoutesOutput[T]["params"];
        query?: Record<string, string | number | boolean>;
        hash?: string;
      }
    : {
        href: T;
        params?: RoutesOutput[T]["params"];
        query?: Record<string, string | number | boolean>;
        hash?: string;
      };

type RoutesOutput = typeof routes;

const link$ = <T extends keyof RoutesOutput = keyof RoutesOutput>({
  href,
  params,
  query,
  hash,
}: Link$Options<T>) => {
  const route = routes[href];
  let path: string = route.path;

  if (route.isDynamic) {
    const params_keys = Object.keys(params!);
    const params_values = Object.values(params!);
    path = params_keys.reduce((acc, key, index) => {
      // @ts-ignore
      return acc.replace(`[${key}]`, params_values[index]);
    }, route.path);
  }

  if (query) {
    const queryString = new URLSearchParams(
      query as Record<string, string>,
    ).toString();
    path += `?${queryString}`;
  }

  if (hash) {
    path += `#${hash}`;
  }

  return path;
};

export default link$;
"#;

/// Writes the `link$` helper module.
pub struct LinkHelperEmitter {
    path: PathBuf,
}

impl LinkHelperEmitter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RouteEmitter for LinkHelperEmitter {
    fn name(&self) -> &str {
        "link-helper"
    }

    fn output_path(&self) -> &Path {
        &self.path
    }

    fn render(&self, routes: &RouteMap) -> RouteResult<String> {
        let json = routes.to_json_pretty()?;
        Ok(TEMPLATE.replacen(ROUTES_PLACEHOLDER, &json, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::{Route, build_route_map};

    #[test]
    fn test_render_embeds_routes() {
        let map = build_route_map(vec![Route::new("/about"), Route::root()]);
        let text = LinkHelperEmitter::new("link$.ts").render(&map).unwrap();

        assert!(text.contains("export const routes = {\n  \"/about\""));
        assert!(!text.contains(ROUTES_PLACEHOLDER));
        assert!(text.contains("export default link$;"));
    }

    #[test]
    fn test_route_text_cannot_inject_placeholder() {
        let map = build_route_map(vec![Route::new("/__ROUTES__"), Route::root()]);
        let text = LinkHelperEmitter::new("link$.ts").render(&map).unwrap();

        assert_eq!(text.matches("\"/__ROUTES__\"").count(), 2);
    }
}
