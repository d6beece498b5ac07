//! Root path search.
//!
//! [`RootPathFinder`] answers "why is this object alive": starting from a query node it walks
//! the snapshot's references backwards, breadth first, and records one [`RetentionPath`] for
//! every root it reaches.
//!
//! Invariants of a single search:
//!
//! - every node enters the frontier at most once (the query included), so the work is bounded by
//!   the number of edges reachable backwards from the query and cycles cannot cause re-expansion
//! - roots end paths; a root is never expanded past
//! - because the traversal is breadth first, each recorded path is a shortest path from its root
//!   to the query
//! - at most [`SearchConfig::max_iterations`] frontier entries are dequeued; past that the search
//!   stops and applies [`SearchConfig::limit_policy`]

use petgraph::Direction;
use std::collections::{HashSet, VecDeque};

use crate::{
    config::{LimitPolicy, SearchConfig},
    diagnostic::SearchDiagnostic,
    error::RetentionError,
    node::{Node, NodeId},
    paths::{PathCollection, RetentionPath},
    roots::classify,
    snapshot::SnapshotSource,
};

/// One frontier entry: a node and the entry it was discovered from. Following `parent` links from
/// any entry back to the query spells out a partial path without copying it per entry.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    node: Node,
    parent: Option<usize>,
}

pub struct RootPathFinder<'a, S: SnapshotSource + ?Sized> {
    source: &'a S,
    config: SearchConfig,
}

impl<'a, S: SnapshotSource + ?Sized> RootPathFinder<'a, S> {
    pub fn new(source: &'a S) -> Self {
        RootPathFinder {
            source,
            config: SearchConfig::default(),
        }
    }

    pub fn with_config(source: &'a S, config: SearchConfig) -> Self {
        RootPathFinder { source, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Find every root `query` is reachable from, returning the paths sorted by
    /// [RetentionPath::sort_key].
    ///
    /// Hitting the iteration limit is not an error: the collection comes back truncated, with an
    /// [SearchDiagnostic::IterationLimit] attached. Errors are reserved for nodes that are not in
    /// the snapshot, including connection endpoints discovered along the way.
    pub fn find(&self, query: Node) -> Result<PathCollection, RetentionError> {
        let mut collection = PathCollection::new(query);
        let mut arena = vec![Frontier {
            node: query,
            parent: None,
        }];
        let mut queue = VecDeque::from([0usize]);
        let mut visited = HashSet::<NodeId>::from([query.id()]);
        let mut iterations = 0usize;

        while let Some(entry) = queue.pop_front() {
            iterations += 1;
            if iterations > self.config.max_iterations {
                let diagnostic = SearchDiagnostic::IterationLimit {
                    limit: self.config.max_iterations,
                    visited: visited.len(),
                    paths_found: collection.len(),
                    policy: self.config.limit_policy,
                };
                tracing::warn!("find_root_paths({query}): {diagnostic}");
                collection.truncate(
                    diagnostic,
                    self.config.limit_policy == LimitPolicy::Discard,
                );
                iterations -= 1;
                break;
            }

            let tip = arena[entry].node;
            if let Some(reason) = classify(self.source, tip)? {
                tracing::trace!("find_root_paths({query}): {tip} is a root ({reason})");
                collection.push(RetentionPath::new(unwind(&arena, entry), reason));
                continue;
            }

            for connection in self.source.connections(tip, Direction::Incoming) {
                let next = connection.from;
                if visited.insert(next.id()) {
                    arena.push(Frontier {
                        node: next,
                        parent: Some(entry),
                    });
                    queue.push_back(arena.len() - 1);
                }
            }
        }

        collection.set_iterations(iterations);
        if collection.is_empty() && !collection.is_truncated() {
            collection.add_diagnostic(SearchDiagnostic::info(format!(
                "{query} is not reachable from any root"
            )));
        }
        collection.sort();
        tracing::debug!(
            "find_root_paths({query}): {} paths, {iterations} iterations, {} nodes visited",
            collection.len(),
            visited.len()
        );
        Ok(collection)
    }
}

/// Rebuild the path ending at `entry`. Walking parent links from a root leads back to the query,
/// which is exactly root-first order.
fn unwind(arena: &[Frontier], entry: usize) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut current = Some(entry);
    while let Some(idx) = current {
        nodes.push(arena[idx].node);
        current = arena[idx].parent;
    }
    nodes
}

/// Search with the default [SearchConfig].
pub fn find_root_paths<S>(source: &S, query: Node) -> Result<PathCollection, RetentionError>
where
    S: SnapshotSource + ?Sized,
{
    RootPathFinder::new(source).find(query)
}
