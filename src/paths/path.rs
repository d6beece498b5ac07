use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::{node::Node, roots::RootReason, snapshot::SnapshotSource};

/// A chain of "referenced by" edges explaining why a node is alive.
///
/// `nodes[0]` is the root, the last node is the queried node, and every node references its
/// successor. The only empty path is [RetentionPath::empty], whose reason is [RootReason::None].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RetentionPath {
    nodes: Vec<Node>,
    reason: RootReason,
}

impl Default for RetentionPath {
    fn default() -> Self {
        RetentionPath::empty()
    }
}

impl RetentionPath {
    pub const fn empty() -> Self {
        RetentionPath {
            nodes: Vec::new(),
            reason: RootReason::None,
        }
    }

    /// `nodes` must be ordered root first.
    pub fn new(nodes: Vec<Node>, reason: RootReason) -> Self {
        RetentionPath { nodes, reason }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn reason(&self) -> RootReason {
        self.reason
    }

    pub fn explanation(&self) -> &'static str {
        self.reason.explanation()
    }

    pub fn root(&self) -> Option<Node> {
        self.nodes.first().copied()
    }

    pub fn target(&self) -> Option<Node> {
        self.nodes.last().copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    /// Ranking key, compared descending: reason priority in the high bits, then
    /// `i32::MAX - len` so shorter paths of the same reason rank first.
    pub fn sort_key(&self) -> u64 {
        ((self.reason.priority() as u64) << 40) + (i32::MAX as u64).saturating_sub(self.len() as u64)
    }

    /// Render as `root -> ... -> target`, labelling each node through `source`.
    pub fn render<S: SnapshotSource + ?Sized>(&self, source: &S) -> String {
        self.nodes
            .iter()
            .map(|node| source.describe(*node))
            .collect::<Vec<String>>()
            .join(" -> ")
    }
}

impl Display for RetentionPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.reason,
            self.nodes
                .iter()
                .map(|node| node.to_string())
                .collect::<Vec<String>>()
                .join(" -> ")
        )
    }
}

impl<'a> IntoIterator for &'a RetentionPath {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
