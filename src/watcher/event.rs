//! Change events and the filter deciding which ones trigger regeneration.

use std::path::{Component, Path, PathBuf};

use ignore::overrides::{Override, OverrideBuilder};
use notify::event::{EventKind, ModifyKind, RenameMode};

use crate::error::{RouteError, RouteResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Add,
    Remove,
    Modify,
}

impl ChangeKind {
    pub fn label(&self) -> &'static str {
        match self {
            ChangeKind::Add => "add",
            ChangeKind::Remove => "remove",
            ChangeKind::Modify => "modify",
        }
    }
}

/// One `(kind, path)` change reported by the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub path: PathBuf,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    pub fn add(path: impl Into<PathBuf>) -> Self {
        Self::new(ChangeKind::Add, path)
    }

    pub fn remove(path: impl Into<PathBuf>) -> Self {
        Self::new(ChangeKind::Remove, path)
    }

    pub fn modify(path: impl Into<PathBuf>) -> Self {
        Self::new(ChangeKind::Modify, path)
    }

    /// Translate a notify event. Renames become a remove of the old name and
    /// an add of the new one; access and metadata-free events are dropped.
    pub fn from_notify(event: &notify::Event) -> Vec<ChangeEvent> {
        let all = |kind: ChangeKind| -> Vec<ChangeEvent> {
            event
                .paths
                .iter()
                .map(|p| ChangeEvent::new(kind, p.clone()))
                .collect()
        };

        match event.kind {
            EventKind::Create(_) => all(ChangeKind::Add),
            EventKind::Remove(_) => all(ChangeKind::Remove),
            EventKind::Modify(ModifyKind::Name(RenameMode::From)) => all(ChangeKind::Remove),
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => all(ChangeKind::Add),
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => match event.paths.as_slice() {
                [from, to] => vec![ChangeEvent::remove(from.clone()), ChangeEvent::add(to.clone())],
                _ => all(ChangeKind::Modify),
            },
            // Backends that cannot tell which side of a rename this is
            EventKind::Modify(ModifyKind::Name(_)) => event
                .paths
                .iter()
                .map(|p| {
                    let kind = if p.exists() {
                        ChangeKind::Add
                    } else {
                        ChangeKind::Remove
                    };
                    ChangeEvent::new(kind, p.clone())
                })
                .collect(),
            EventKind::Modify(_) => all(ChangeKind::Modify),
            _ => Vec::new(),
        }
    }
}

/// Decides whether a change qualifies for regeneration.
///
/// Only adds and removes qualify. Paths with a dot- or underscore-prefixed
/// component below the root are ignored, as is anything matching the
/// configured ignore globs.
pub struct EventFilter {
    root: PathBuf,
    ignore: Override,
}

impl EventFilter {
    pub fn new(root: impl Into<PathBuf>, ignore_patterns: &[String]) -> RouteResult<Self> {
        let root = root.into();
        let mut builder = OverrideBuilder::new(&root);
        for pattern in ignore_patterns {
            // `!` marks an override glob as an ignore rule
            builder.add(&format!("!{pattern}")).map_err(|e| {
                RouteError::config(format!("invalid ignore pattern '{pattern}': {e}"))
            })?;
        }
        let ignore = builder
            .build()
            .map_err(|e| RouteError::config(format!("invalid ignore patterns: {e}")))?;

        Ok(Self { root, ignore })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn qualifies(&self, event: &ChangeEvent) -> bool {
        event.kind != ChangeKind::Modify && !self.is_ignored(&event.path)
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);

        let hidden = relative.components().any(|c| match c {
            Component::Normal(name) => name
                .to_str()
                .is_some_and(|s| s.starts_with('.') || s.starts_with('_')),
            _ => false,
        });

        hidden || self.ignore.matched(relative, false).is_ignore()
    }
}
