//! [crate::node] contains [Node], the unified reference to one record of a memory snapshot, and
//! the [NodeId] identity used to key visited sets and comparisons across all four record
//! categories.
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    fmt::{Display, Formatter},
    hash::{Hash, Hasher},
    str::FromStr,
};

use crate::error::RetentionError;

/// Record category of a [Node].
///
/// Declaration order is the tag precedence used by [NodeId]: native objects carry the highest
/// tag, static fields the lowest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    StaticField,
    GcHandle,
    ManagedObject,
    NativeObject,
}

impl NodeKind {
    pub const ALL: [NodeKind; 4] = [
        NodeKind::NativeObject,
        NodeKind::ManagedObject,
        NodeKind::GcHandle,
        NodeKind::StaticField,
    ];

    /// The 2-bit category tag stored in the high bits of a [NodeId].
    pub const fn tag(&self) -> u64 {
        *self as u64
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::NativeObject => "native",
            NodeKind::ManagedObject => "managed",
            NodeKind::GcHandle => "gchandle",
            NodeKind::StaticField => "static",
        }
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = RetentionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().trim() {
            "native" | "native_object" => Ok(NodeKind::NativeObject),
            "managed" | "managed_object" => Ok(NodeKind::ManagedObject),
            "gchandle" | "gc_handle" => Ok(NodeKind::GcHandle),
            "static" | "static_field" => Ok(NodeKind::StaticField),
            other => Err(RetentionError::InvalidNode(format!(
                "Unknown node kind '{other}'. Expected one of native, managed, gchandle, static"
            ))),
        }
    }
}

/// Snapshot-wide identity of a [Node]: the category tag in the two most significant bits, the
/// category-local index in the remaining 62.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    const TAG_SHIFT: u32 = 62;
    const INDEX_MASK: u64 = (1 << Self::TAG_SHIFT) - 1;

    pub const fn new(kind: NodeKind, index: usize) -> Self {
        NodeId((kind.tag() << Self::TAG_SHIFT) | (index as u64 & Self::INDEX_MASK))
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn kind(&self) -> NodeKind {
        match self.0 >> Self::TAG_SHIFT {
            3 => NodeKind::NativeObject,
            2 => NodeKind::ManagedObject,
            1 => NodeKind::GcHandle,
            _ => NodeKind::StaticField,
        }
    }

    pub fn index(&self) -> usize {
        (self.0 & Self::INDEX_MASK) as usize
    }
}

impl From<Node> for NodeId {
    fn from(node: Node) -> Self {
        node.id()
    }
}

/// A reference to exactly one snapshot record.
///
/// Each variant holds the index of the record within its category's array. A `Node` owns
/// nothing; it is only meaningful against the snapshot it was taken from. Equality, hashing and
/// ordering all go through [Node::id].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    NativeObject(usize),
    ManagedObject(usize),
    GcHandle(usize),
    StaticField(usize),
}

impl Node {
    pub fn new(kind: NodeKind, index: usize) -> Self {
        match kind {
            NodeKind::NativeObject => Node::NativeObject(index),
            NodeKind::ManagedObject => Node::ManagedObject(index),
            NodeKind::GcHandle => Node::GcHandle(index),
            NodeKind::StaticField => Node::StaticField(index),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::NativeObject(_) => NodeKind::NativeObject,
            Node::ManagedObject(_) => NodeKind::ManagedObject,
            Node::GcHandle(_) => NodeKind::GcHandle,
            Node::StaticField(_) => NodeKind::StaticField,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Node::NativeObject(idx)
            | Node::ManagedObject(idx)
            | Node::GcHandle(idx)
            | Node::StaticField(idx) => *idx,
        }
    }

    pub fn id(&self) -> NodeId {
        NodeId::new(self.kind(), self.index())
    }

    /// Index of the native object record, if this node is one.
    pub fn native_index(&self) -> Option<usize> {
        match self {
            Node::NativeObject(idx) => Some(*idx),
            _ => None,
        }
    }

    pub fn managed_index(&self) -> Option<usize> {
        match self {
            Node::ManagedObject(idx) => Some(*idx),
            _ => None,
        }
    }

    pub fn gc_handle_index(&self) -> Option<usize> {
        match self {
            Node::GcHandle(idx) => Some(*idx),
            _ => None,
        }
    }

    pub fn static_field_index(&self) -> Option<usize> {
        match self {
            Node::StaticField(idx) => Some(*idx),
            _ => None,
        }
    }
}

impl From<NodeId> for Node {
    fn from(id: NodeId) -> Self {
        Node::new(id.kind(), id.index())
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id().cmp(&other.id())
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind(), self.index())
    }
}

/// Parses the `kind:index` form produced by [Display], e.g. `native:12` or `static:0`.
impl FromStr for Node {
    type Err = RetentionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, index) = s.split_once(':').ok_or_else(|| {
            RetentionError::InvalidNode(format!("Expected '<kind>:<index>', received '{s}'"))
        })?;
        Ok(Node::new(kind.parse()?, index.trim().parse()?))
    }
}
