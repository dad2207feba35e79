//! Directory tree walker for the app directory.
//!
//! Produces a [`FileNode`] tree that mirrors the filesystem. Directories whose
//! name starts with `_` or `.` are pruned together with everything below them.
//! Entries are listed with `tokio::fs`, so every listing and stat yields to the
//! runtime.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use crate::error::{RouteError, RouteResult};

/// One entry of the walked tree. Files and empty directories have no children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub base: PathBuf,
    pub children: Vec<FileNode>,
}

impl FileNode {
    pub fn leaf(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// All leaf paths below this node in depth-first order.
    ///
    /// The node itself is never included, so walking an empty root yields nothing.
    pub fn leaves(&self) -> Vec<&Path> {
        let mut out = Vec::new();
        let mut stack: Vec<&FileNode> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if node.is_leaf() {
                out.push(node.base.as_path());
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }
}

/// Returns true for directory names that are excluded from the tree.
pub fn is_pruned_name(name: &str) -> bool {
    name.starts_with('_') || name.starts_with('.')
}

type WalkFuture<'a> = Pin<Box<dyn Future<Output = RouteResult<FileNode>> + Send + 'a>>;

/// Walks the app directory and builds a [`FileNode`] tree.
#[derive(Debug, Clone, Default)]
pub struct TreeWalker {
    max_depth: Option<usize>,
}

impl TreeWalker {
    pub fn new(max_depth: Option<usize>) -> Self {
        Self { max_depth }
    }

    /// Walk `root` recursively.
    ///
    /// Any unreadable directory or failed stat aborts the whole walk.
    pub async fn walk(&self, root: &Path) -> RouteResult<FileNode> {
        self.walk_dir(root.to_path_buf(), 0).await
    }

    fn walk_dir(&self, dir: PathBuf, depth: usize) -> WalkFuture<'_> {
        Box::pin(async move {
            if let Some(max_depth) = self.max_depth
                && depth > max_depth
            {
                return Err(RouteError::DepthExceeded {
                    path: dir,
                    max_depth,
                });
            }

            let mut entries = tokio::fs::read_dir(&dir)
                .await
                .map_err(|e| RouteError::io(&dir, e))?;

            let mut paths = Vec::new();
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| RouteError::io(&dir, e))?
            {
                paths.push(entry.path());
            }
            // read_dir order is platform dependent
            paths.sort();

            let mut children = Vec::with_capacity(paths.len());
            for path in paths {
                let metadata = tokio::fs::metadata(&path)
                    .await
                    .map_err(|e| RouteError::io(&path, e))?;

                if !metadata.is_dir() {
                    children.push(FileNode::leaf(path));
                    continue;
                }

                let pruned = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(is_pruned_name);
                if pruned {
                    crate::debug_event!("walker", "pruned", "{}", path.display());
                    continue;
                }

                children.push(self.walk_dir(path, depth + 1).await?);
            }

            Ok(FileNode {
                base: dir,
                children,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[tokio::test]
    async fn test_walk_mirrors_tree() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "page.tsx");
        touch(root, "blog/[slug]/page.tsx");
        touch(root, "blog/layout.tsx");

        let tree = TreeWalker::default().walk(root).await.unwrap();

        assert_eq!(tree.base, root);
        assert_eq!(tree.children.len(), 2);
        // sorted: blog before page.tsx
        assert_eq!(tree.children[0].base, root.join("blog"));
        assert_eq!(tree.children[1].base, root.join("page.tsx"));

        let leaves = tree.leaves();
        assert_eq!(
            leaves,
            vec![
                root.join("blog/[slug]/page.tsx").as_path(),
                root.join("blog/layout.tsx").as_path(),
                root.join("page.tsx").as_path(),
            ]
        );
    }

    #[tokio::test]
    async fn test_prunes_underscore_and_dot_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "_components/page.tsx");
        touch(root, ".cache/page.tsx");
        touch(root, "about/page.tsx");

        let tree = TreeWalker::default().walk(root).await.unwrap();

        let leaves = tree.leaves();
        assert_eq!(leaves, vec![root.join("about/page.tsx").as_path()]);
    }

    #[tokio::test]
    async fn test_underscore_files_are_kept_as_leaves() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "_helpers.ts");

        let tree = TreeWalker::default().walk(root).await.unwrap();
        assert_eq!(tree.leaves(), vec![root.join("_helpers.ts").as_path()]);
    }

    #[tokio::test]
    async fn test_missing_root_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        let err = TreeWalker::default().walk(&missing).await.unwrap_err();
        match err {
            RouteError::Io { path, .. } => assert_eq!(path, missing),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nested_stat_failure_aborts_walk() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "about/page.tsx");
        touch(root, "blog/page.tsx");
        let link = root.join("about/link");
        std::os::unix::fs::symlink(root.join("missing"), &link).unwrap();

        let err = TreeWalker::default().walk(root).await.unwrap_err();
        match err {
            RouteError::Io { path, .. } => assert_eq!(path, link),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_depth_guard() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "a/b/c/page.tsx");

        let err = TreeWalker::new(Some(2)).walk(root).await.unwrap_err();
        assert!(matches!(err, RouteError::DepthExceeded { max_depth: 2, .. }));

        assert!(TreeWalker::new(Some(3)).walk(root).await.is_ok());
    }

    #[test]
    fn test_is_pruned_name() {
        assert!(is_pruned_name("_private"));
        assert!(is_pruned_name(".git"));
        assert!(!is_pruned_name("blog"));
        assert!(!is_pruned_name("(auth)"));
    }
}
