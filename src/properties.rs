pub use enumset::EnumSet;
/// [crate::properties] contains the record types a memory snapshot is assembled from: native
/// objects and their runtime types, managed objects, GC handles and static fields.
use enumset::*;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Engine-side attributes recorded for every native object.
#[derive(EnumSetType, Debug, Hash, Serialize, Deserialize)]
#[enumset(serialize_repr = "list")]
#[serde(rename_all = "snake_case")]
pub enum NativeObjectFlag {
    /// Engine "manager" singleton (input, physics, render settings, ...)
    IsManager,
    /// Survives scene loads
    IsDontDestroyOnLoad,
    /// Backed by an asset on disk
    IsPersistent,
}

/// The engine's hide-flags bitmask. Discriminants are bit positions, so [EnumSet::as_u32] yields
/// the raw mask as it appears in a capture.
#[derive(EnumSetType, Debug, Hash)]
#[enumset(repr = "u32", serialize_repr = "u32")]
pub enum HideFlag {
    HideInHierarchy = 0,
    HideInInspector = 1,
    DontSaveInEditor = 2,
    NotEditable = 3,
    DontSaveInBuild = 4,
    DontUnloadUnusedAsset = 5,
}

/// Convert a raw hide-flags mask into a [HideFlag] set, dropping bits the engine does not
/// define.
pub fn hide_flags_from_mask(mask: u32) -> EnumSet<HideFlag> {
    EnumSet::from_u32_truncated(mask)
}

/// Native base types that root classification and display code test against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WellKnownType {
    Component,
    GameObject,
    AssetBundle,
    MonoBehaviour,
    ScriptableObject,
}

impl WellKnownType {
    pub const ALL: [WellKnownType; 5] = [
        WellKnownType::Component,
        WellKnownType::GameObject,
        WellKnownType::AssetBundle,
        WellKnownType::MonoBehaviour,
        WellKnownType::ScriptableObject,
    ];

    /// Type name as recorded in a capture's native type table.
    pub fn type_name(&self) -> &'static str {
        match self {
            WellKnownType::Component => "Component",
            WellKnownType::GameObject => "GameObject",
            WellKnownType::AssetBundle => "AssetBundle",
            WellKnownType::MonoBehaviour => "MonoBehaviour",
            WellKnownType::ScriptableObject => "ScriptableObject",
        }
    }
}

impl Display for WellKnownType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// An entry of the native type table. `base` is the index of the parent type, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeType {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<usize>,
}

impl NativeType {
    pub fn new(name: &str, base: Option<usize>) -> Self {
        NativeType {
            name: name.to_string(),
            base,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeObject {
    pub name: String,
    /// Index into the native type table
    pub native_type: usize,
    #[serde(default)]
    pub flags: EnumSet<NativeObjectFlag>,
    #[serde(default)]
    pub hide_flags: EnumSet<HideFlag>,
    #[serde(default)]
    pub instance_id: i32,
}

impl NativeObject {
    pub fn new(name: &str, native_type: usize) -> Self {
        NativeObject {
            name: name.to_string(),
            native_type,
            ..Default::default()
        }
    }

    pub fn with_flag(mut self, flag: NativeObjectFlag) -> Self {
        self.flags |= flag;
        self
    }

    pub fn with_hide_flag(mut self, flag: HideFlag) -> Self {
        self.hide_flags |= flag;
        self
    }

    pub fn is_manager(&self) -> bool {
        self.flags.contains(NativeObjectFlag::IsManager)
    }

    pub fn is_dont_destroy_on_load(&self) -> bool {
        self.flags.contains(NativeObjectFlag::IsDontDestroyOnLoad)
    }

    pub fn is_persistent(&self) -> bool {
        self.flags.contains(NativeObjectFlag::IsPersistent)
    }

    pub fn is_dont_unload_unused_asset(&self) -> bool {
        self.hide_flags.contains(HideFlag::DontUnloadUnusedAsset)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedObject {
    pub type_name: String,
    #[serde(default)]
    pub address: u64,
}

impl ManagedObject {
    pub fn new(type_name: &str) -> Self {
        ManagedObject {
            type_name: type_name.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcHandle {
    /// Managed object the handle pins, when the capture recorded one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticField {
    pub type_name: String,
    pub field_name: String,
}

impl StaticField {
    pub fn new(type_name: &str, field_name: &str) -> Self {
        StaticField {
            type_name: type_name.to_string(),
            field_name: field_name.to_string(),
        }
    }
}
