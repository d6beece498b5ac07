use super::{Connection, Snapshot, SnapshotData};
use crate::{
    error::RetentionError,
    node::Node,
    properties::{GcHandle, ManagedObject, NativeObject, NativeType, StaticField},
};

/// Assembles a [Snapshot] record by record. Every `add_*` call returns the [Node] addressing the
/// new record, ready to be passed to [SnapshotBuilder::connect].
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuilder {
    data: SnapshotData,
}

impl SnapshotBuilder {
    /// Append a native type and return its index in the type table.
    pub fn add_type(&mut self, name: &str, base: Option<usize>) -> usize {
        self.data.native_types.push(NativeType::new(name, base));
        self.data.native_types.len() - 1
    }

    pub fn add_native(&mut self, obj: NativeObject) -> Node {
        self.data.native_objects.push(obj);
        Node::NativeObject(self.data.native_objects.len() - 1)
    }

    pub fn add_managed(&mut self, obj: ManagedObject) -> Node {
        self.data.managed_objects.push(obj);
        Node::ManagedObject(self.data.managed_objects.len() - 1)
    }

    pub fn add_gc_handle(&mut self, handle: GcHandle) -> Node {
        self.data.gc_handles.push(handle);
        Node::GcHandle(self.data.gc_handles.len() - 1)
    }

    pub fn add_static(&mut self, field: StaticField) -> Node {
        self.data.static_fields.push(field);
        Node::StaticField(self.data.static_fields.len() - 1)
    }

    /// Record that `from` holds a reference to `to`.
    pub fn connect(&mut self, from: Node, to: Node) -> &mut Self {
        self.data.connections.push(Connection::new(from, to));
        self
    }

    pub fn data(&self) -> &SnapshotData {
        &self.data
    }

    pub fn build(self) -> Result<Snapshot, RetentionError> {
        Snapshot::new(self.data)
    }
}

impl From<SnapshotData> for SnapshotBuilder {
    fn from(data: SnapshotData) -> Self {
        SnapshotBuilder { data }
    }
}
