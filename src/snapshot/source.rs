use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::{
    node::Node,
    properties::{NativeObject, WellKnownType},
};

/// A single "references" edge of the snapshot: `from` holds a reference to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Connection {
    pub from: Node,
    pub to: Node,
}

impl Connection {
    pub fn new(from: Node, to: Node) -> Self {
        Connection { from, to }
    }
}

impl Display for Connection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Everything the root classifier and the path search engine need from a memory snapshot.
///
/// Implementations are read-only for the duration of a search and must answer every lookup in
/// constant time; a search may issue one [SnapshotSource::connections] call per visited node.
pub trait SnapshotSource {
    /// Whether `node` names an existing record of its category.
    fn contains(&self, node: Node) -> bool;

    fn native_object(&self, index: usize) -> Option<&NativeObject>;

    /// Whether the runtime type of native object `index` is, or derives from, `base`. Returns
    /// false when the capture does not contain `base` at all.
    fn native_is_subclass_of(&self, index: usize, base: WellKnownType) -> bool;

    /// Edges touching `node`. [Direction::Incoming] returns the edges whose `to` is `node` (its
    /// referencers), [Direction::Outgoing] the edges whose `from` is `node`.
    fn connections(&self, node: Node, direction: Direction) -> Vec<Connection>;

    /// Human readable label for `node`, used when rendering paths.
    fn describe(&self, node: Node) -> String {
        node.to_string()
    }
}
