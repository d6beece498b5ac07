use serde::{Deserialize, Serialize};
use std::{cmp::Reverse, fmt::Write, ops::Index};

use super::RetentionPath;
use crate::{
    diagnostic::SearchDiagnostic, error::RetentionError, node::Node, roots::RootReason,
    snapshot::SnapshotSource,
};

static EMPTY_PATH: RetentionPath = RetentionPath::empty();

/// Every retention path found by one search for one query node.
///
/// After [PathCollection::sort] the paths are ordered by reason priority (descending), then by
/// length (ascending). Collections are never merged; each search produces a fresh one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathCollection {
    query: Option<Node>,
    paths: Vec<RetentionPath>,
    iterations: usize,
    truncated: bool,
    diagnostics: Vec<SearchDiagnostic>,
}

impl PathCollection {
    pub fn new(query: Node) -> Self {
        PathCollection {
            query: Some(query),
            ..Default::default()
        }
    }

    pub fn query(&self) -> Option<Node> {
        self.query
    }

    pub fn paths(&self) -> &[RetentionPath] {
        &self.paths
    }

    pub fn get(&self, index: usize) -> Option<&RetentionPath> {
        self.paths.get(index)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RetentionPath> {
        self.paths.iter()
    }

    /// Frontier entries the search dequeued.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Whether the search stopped at its iteration limit.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn diagnostics(&self) -> &[SearchDiagnostic] {
        &self.diagnostics
    }

    pub fn push(&mut self, path: RetentionPath) {
        self.paths.push(path);
    }

    pub(crate) fn set_iterations(&mut self, iterations: usize) {
        self.iterations = iterations;
    }

    /// Mark the collection as cut short by the iteration limit, optionally dropping the paths
    /// found so far.
    pub(crate) fn truncate(&mut self, diagnostic: SearchDiagnostic, discard: bool) {
        if discard {
            self.paths.clear();
        }
        self.truncated = true;
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn add_diagnostic(&mut self, diagnostic: SearchDiagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Stable sort by [RetentionPath::sort_key], descending.
    pub fn sort(&mut self) {
        self.paths.sort_by_key(|path| Reverse(path.sort_key()));
    }

    /// The path to show first.
    ///
    /// Prefers shorter paths, except that a [RootReason::Static] path always displaces a
    /// non-static one and is only displaced by a shorter static path. Returns
    /// [RetentionPath::empty] when the collection is empty.
    pub fn shortest_path(&self) -> &RetentionPath {
        let Some(mut best) = self.paths.first() else {
            return &EMPTY_PATH;
        };
        for path in self.paths.iter() {
            let path_static = path.reason() == RootReason::Static;
            let best_static = best.reason() == RootReason::Static;
            if (path.len() < best.len() && (!best_static || path_static))
                || (path_static && !best_static)
            {
                best = path;
            }
        }
        best
    }

    /// Paths whose root has `reason`.
    pub fn with_reason(&self, reason: RootReason) -> impl Iterator<Item = &RetentionPath> {
        self.paths.iter().filter(move |path| path.reason() == reason)
    }

    /// Multi-line report: one block per path, root first, followed by the diagnostics.
    pub fn render<S: SnapshotSource + ?Sized>(&self, source: &S) -> Result<String, RetentionError> {
        let mut out = String::new();
        match self.query {
            Some(query) => writeln!(out, "Retention paths for {}", source.describe(query))?,
            None => writeln!(out, "Retention paths")?,
        }
        if self.paths.is_empty() {
            writeln!(out, "  no root reaches this object")?;
        }
        for (idx, path) in self.paths.iter().enumerate() {
            writeln!(out, "{:>3}. [{}] {}", idx + 1, path.reason(), path.explanation())?;
            for (depth, node) in path.iter().enumerate() {
                writeln!(out, "     {:indent$}{}", "", source.describe(*node), indent = depth * 2)?;
            }
        }
        for diagnostic in self.diagnostics.iter() {
            writeln!(out, "{diagnostic}")?;
        }
        Ok(out)
    }
}

impl Index<usize> for PathCollection {
    type Output = RetentionPath;

    fn index(&self, index: usize) -> &RetentionPath {
        &self.paths[index]
    }
}

impl<'a> IntoIterator for &'a PathCollection {
    type Item = &'a RetentionPath;
    type IntoIter = std::slice::Iter<'a, RetentionPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}
