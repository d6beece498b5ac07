//! Shared test utilities for snapshot and search testing

use crate::{
    node::Node,
    properties::{GcHandle, ManagedObject, NativeObject, NativeObjectFlag, StaticField},
    snapshot::{Snapshot, SnapshotBuilder},
};

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Indices of the native type table installed by [builder_with_types].
#[derive(Debug, Clone, Copy)]
pub struct Types {
    pub object: usize,
    pub component: usize,
    pub behaviour: usize,
    pub mono_behaviour: usize,
    pub transform: usize,
    pub game_object: usize,
    pub asset_bundle: usize,
    pub texture: usize,
    pub scriptable_object: usize,
    pub render_settings: usize,
}

/// A builder pre-loaded with the usual engine type hierarchy:
///
/// ```text
/// Object
/// +- Component
/// |  +- Behaviour
/// |  |  +- MonoBehaviour
/// |  +- Transform
/// +- GameObject
/// +- AssetBundle
/// +- Texture2D
/// +- ScriptableObject
/// +- RenderSettings
/// ```
pub fn builder_with_types() -> (SnapshotBuilder, Types) {
    init_logging();

    let mut builder = SnapshotBuilder::default();
    let object = builder.add_type("Object", None);
    let component = builder.add_type("Component", Some(object));
    let behaviour = builder.add_type("Behaviour", Some(component));
    let mono_behaviour = builder.add_type("MonoBehaviour", Some(behaviour));
    let transform = builder.add_type("Transform", Some(component));
    let game_object = builder.add_type("GameObject", Some(object));
    let asset_bundle = builder.add_type("AssetBundle", Some(object));
    let texture = builder.add_type("Texture2D", Some(object));
    let scriptable_object = builder.add_type("ScriptableObject", Some(object));
    let render_settings = builder.add_type("RenderSettings", Some(object));
    (
        builder,
        Types {
            object,
            component,
            behaviour,
            mono_behaviour,
            transform,
            game_object,
            asset_bundle,
            texture,
            scriptable_object,
            render_settings,
        },
    )
}

/// Nodes of [create_test_snapshot].
#[derive(Debug, Clone, Copy)]
pub struct SceneNodes {
    pub player: Node,
    pub controller: Node,
    pub handle: Node,
    pub script: Node,
    pub inventory: Node,
    pub icon: Node,
    pub instance_field: Node,
    pub orphan: Node,
}

/// A small scene:
///
/// ```text
/// GameObject "Player" -> MonoBehaviour "PlayerController" -> GCHandle -> managed PlayerScript
/// PlayerScript -> managed Inventory -> Texture2D "Icon"
/// static Game.Instance -> Inventory
/// Texture2D "Orphan" (no referencers, persistent)
/// ```
pub fn create_test_snapshot() -> (Snapshot, SceneNodes) {
    let (mut builder, types) = builder_with_types();

    let player = builder.add_native(NativeObject::new("Player", types.game_object));
    let controller =
        builder.add_native(NativeObject::new("PlayerController", types.mono_behaviour));
    let script = builder.add_managed(ManagedObject::new("PlayerScript"));
    let handle = builder.add_gc_handle(GcHandle {
        target: script.managed_index(),
    });
    let inventory = builder.add_managed(ManagedObject::new("Inventory"));
    let icon = builder.add_native(
        NativeObject::new("Icon", types.texture).with_flag(NativeObjectFlag::IsPersistent),
    );
    let instance_field = builder.add_static(StaticField::new("Game", "Instance"));
    let orphan = builder.add_native(
        NativeObject::new("Orphan", types.texture).with_flag(NativeObjectFlag::IsPersistent),
    );

    builder
        .connect(player, controller)
        .connect(controller, handle)
        .connect(handle, script)
        .connect(script, inventory)
        .connect(inventory, icon)
        .connect(instance_field, inventory);

    (
        builder.build().unwrap(),
        SceneNodes {
            player,
            controller,
            handle,
            script,
            inventory,
            icon,
            instance_field,
            orphan,
        },
    )
}
