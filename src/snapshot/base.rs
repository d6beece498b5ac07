use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs::read_to_string,
    path::Path,
};

use super::{Connection, ConnectionGraph, SnapshotSource};
use crate::{
    error::RetentionError,
    node::{Node, NodeKind},
    properties::{GcHandle, ManagedObject, NativeObject, NativeType, StaticField, WellKnownType},
};

/// Used for Serialization/Deserialization of [Snapshot]s. Records are addressed by their
/// position in each array.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotData {
    #[serde(default)]
    pub native_types: Vec<NativeType>,
    #[serde(default)]
    pub native_objects: Vec<NativeObject>,
    #[serde(default)]
    pub managed_objects: Vec<ManagedObject>,
    #[serde(default)]
    pub gc_handles: Vec<GcHandle>,
    #[serde(default)]
    pub static_fields: Vec<StaticField>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// An immutable, fully indexed memory capture.
///
/// Construction validates the capture: every connection endpoint, native type reference and GC
/// handle target must name an existing record. Once built, a `Snapshot` never changes, so any
/// number of searches may borrow it.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    native_types: Vec<NativeType>,
    native_objects: Vec<NativeObject>,
    managed_objects: Vec<ManagedObject>,
    gc_handles: Vec<GcHandle>,
    static_fields: Vec<StaticField>,
    connections: ConnectionGraph,
    well_known: BTreeMap<WellKnownType, usize>,
}

impl Snapshot {
    pub fn new(data: SnapshotData) -> Result<Self, RetentionError> {
        let SnapshotData {
            native_types,
            native_objects,
            managed_objects,
            gc_handles,
            static_fields,
            connections,
        } = data;

        for (idx, native_type) in native_types.iter().enumerate() {
            if let Some(base) = native_type.base.filter(|base| *base >= native_types.len()) {
                return Err(RetentionError::NotFound(format!(
                    "native type {idx} ('{}') names base type {base}, but the type table has {} entries",
                    native_type.name,
                    native_types.len()
                )));
            }
        }
        for (idx, obj) in native_objects.iter().enumerate() {
            if obj.native_type >= native_types.len() {
                return Err(RetentionError::NotFound(format!(
                    "native object {idx} ('{}') has native type {}, but the type table has {} entries",
                    obj.name,
                    obj.native_type,
                    native_types.len()
                )));
            }
        }
        for (idx, handle) in gc_handles.iter().enumerate() {
            if let Some(target) = handle.target.filter(|target| *target >= managed_objects.len())
            {
                return Err(RetentionError::InvalidNode(format!(
                    "gc handle {idx} targets managed object {target}, but the capture has {} managed objects",
                    managed_objects.len()
                )));
            }
        }

        let mut well_known = BTreeMap::new();
        for known in WellKnownType::ALL {
            if let Some(idx) = native_types
                .iter()
                .position(|native_type| native_type.name == known.type_name())
            {
                well_known.insert(known, idx);
            } else {
                tracing::debug!("Snapshot has no native type named '{known}'");
            }
        }

        let mut snapshot = Snapshot {
            native_types,
            native_objects,
            managed_objects,
            gc_handles,
            static_fields,
            connections: ConnectionGraph::default(),
            well_known,
        };

        for connection in connections.iter() {
            for endpoint in [connection.from, connection.to] {
                if !snapshot.contains(endpoint) {
                    return Err(RetentionError::InvalidNode(format!(
                        "connection {connection} references {endpoint}, which is not in the snapshot ({} records of kind {})",
                        snapshot.count(endpoint.kind()),
                        endpoint.kind()
                    )));
                }
            }
        }
        snapshot.connections = ConnectionGraph::from_connections(connections);

        tracing::debug!(
            "Built snapshot: {} native, {} managed, {} gc handles, {} static fields, {} connections",
            snapshot.native_objects.len(),
            snapshot.managed_objects.len(),
            snapshot.gc_handles.len(),
            snapshot.static_fields.len(),
            snapshot.connections.edge_count()
        );
        Ok(snapshot)
    }

    pub fn from_json_str(json: &str) -> Result<Self, RetentionError> {
        let data: SnapshotData = serde_json::from_str(json)?;
        Snapshot::new(data)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RetentionError> {
        tracing::debug!("Reading snapshot from {:?}", path.as_ref());
        let content = read_to_string(path)?;
        Snapshot::from_json_str(&content)
    }

    /// Reassemble the serializable form. Connections are emitted once per distinct edge.
    pub fn to_data(&self) -> SnapshotData {
        SnapshotData {
            native_types: self.native_types.clone(),
            native_objects: self.native_objects.clone(),
            managed_objects: self.managed_objects.clone(),
            gc_handles: self.gc_handles.clone(),
            static_fields: self.static_fields.clone(),
            connections: self.connections.all_connections().collect(),
        }
    }

    pub fn to_json_string(&self) -> Result<String, RetentionError> {
        Ok(serde_json::to_string_pretty(&self.to_data())?)
    }

    /// Number of records of `kind`.
    pub fn count(&self, kind: NodeKind) -> usize {
        match kind {
            NodeKind::NativeObject => self.native_objects.len(),
            NodeKind::ManagedObject => self.managed_objects.len(),
            NodeKind::GcHandle => self.gc_handles.len(),
            NodeKind::StaticField => self.static_fields.len(),
        }
    }

    pub fn node_count(&self) -> usize {
        NodeKind::ALL.iter().map(|kind| self.count(*kind)).sum()
    }

    /// Every node of the snapshot, native objects first.
    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        NodeKind::ALL
            .into_iter()
            .flat_map(move |kind| (0..self.count(kind)).map(move |idx| Node::new(kind, idx)))
    }

    pub fn connection_graph(&self) -> &ConnectionGraph {
        &self.connections
    }

    pub fn native_type(&self, index: usize) -> Option<&NativeType> {
        self.native_types.get(index)
    }

    pub fn native_types(&self) -> &[NativeType] {
        &self.native_types
    }

    pub fn managed_object(&self, index: usize) -> Option<&ManagedObject> {
        self.managed_objects.get(index)
    }

    pub fn gc_handle(&self, index: usize) -> Option<&GcHandle> {
        self.gc_handles.get(index)
    }

    pub fn static_field(&self, index: usize) -> Option<&StaticField> {
        self.static_fields.get(index)
    }

    /// Index of `known` in the native type table, if the capture contains it.
    pub fn well_known_type(&self, known: WellKnownType) -> Option<usize> {
        self.well_known.get(&known).copied()
    }

    /// Whether `type_index` equals `base_index` or derives from it. The walk is bounded by the
    /// type table length, so a cyclic base chain in a malformed capture terminates.
    pub fn is_subclass_of(&self, type_index: usize, base_index: usize) -> bool {
        let mut current = Some(type_index);
        for _ in 0..=self.native_types.len() {
            match current {
                Some(idx) if idx == base_index => return true,
                Some(idx) => current = self.native_types.get(idx).and_then(|t| t.base),
                None => return false,
            }
        }
        tracing::warn!("Native type {type_index} has a cyclic base type chain");
        false
    }
}

impl TryFrom<SnapshotData> for Snapshot {
    type Error = RetentionError;

    fn try_from(data: SnapshotData) -> Result<Self, Self::Error> {
        Snapshot::new(data)
    }
}

impl SnapshotSource for Snapshot {
    fn contains(&self, node: Node) -> bool {
        node.index() < self.count(node.kind())
    }

    fn native_object(&self, index: usize) -> Option<&NativeObject> {
        self.native_objects.get(index)
    }

    fn native_is_subclass_of(&self, index: usize, base: WellKnownType) -> bool {
        match (self.native_objects.get(index), self.well_known_type(base)) {
            (Some(obj), Some(base_index)) => self.is_subclass_of(obj.native_type, base_index),
            _ => false,
        }
    }

    fn connections(&self, node: Node, direction: Direction) -> Vec<Connection> {
        self.connections.connections(node, direction)
    }

    fn describe(&self, node: Node) -> String {
        match node {
            Node::NativeObject(idx) => match self.native_objects.get(idx) {
                Some(obj) => format!(
                    "{node} '{}' ({})",
                    obj.name,
                    self.native_type(obj.native_type)
                        .map(|t| t.name.as_str())
                        .unwrap_or("?")
                ),
                None => node.to_string(),
            },
            Node::ManagedObject(idx) => match self.managed_objects.get(idx) {
                Some(obj) => format!("{node} {} @ {:#x}", obj.type_name, obj.address),
                None => node.to_string(),
            },
            Node::GcHandle(idx) => match self.gc_handles.get(idx).and_then(|h| h.target) {
                Some(target) => format!("{node} -> managed:{target}"),
                None => node.to_string(),
            },
            Node::StaticField(idx) => match self.static_fields.get(idx) {
                Some(field) => format!("{node} {}.{}", field.type_name, field.field_name),
                None => node.to_string(),
            },
        }
    }
}
