//! Root classification.
//!
//! A root is a node the engine or the managed runtime keeps alive on its own, rather than
//! because another tracked object references it. Backward searches stop at roots.
//!
//! [`RootReason`]'s declaration order and the decision list in [`classify`] are two views of the
//! same ranking: later reasons explain retention more permanently, and
//! [`crate::paths::PathCollection`] sorts on that order. Keep both in this module and change them
//! together.

use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
};

use crate::{
    error::RetentionError,
    node::Node,
    properties::WellKnownType,
    snapshot::SnapshotSource,
};

/// Why a root keeps its retention path alive. Ordered by importance: [RootReason::Unknown] ranks
/// highest so that unclassified roots stand out.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum RootReason {
    #[default]
    None,
    AssetBundle,
    Component,
    GameObject,
    UnityManager,
    DontUnloadUnusedAsset,
    DontDestroyOnLoad,
    Static,
    Unknown,
}

impl RootReason {
    pub const ALL: [RootReason; 9] = [
        RootReason::None,
        RootReason::AssetBundle,
        RootReason::Component,
        RootReason::GameObject,
        RootReason::UnityManager,
        RootReason::DontUnloadUnusedAsset,
        RootReason::DontDestroyOnLoad,
        RootReason::Static,
        RootReason::Unknown,
    ];

    /// Sort priority; the declaration index.
    pub const fn priority(&self) -> u8 {
        *self as u8
    }

    pub fn label(&self) -> &'static str {
        match self {
            RootReason::None => "None",
            RootReason::AssetBundle => "AssetBundle",
            RootReason::Component => "Component",
            RootReason::GameObject => "GameObject",
            RootReason::UnityManager => "Engine Manager",
            RootReason::DontUnloadUnusedAsset => "DontUnloadUnusedAsset",
            RootReason::DontDestroyOnLoad => "DontDestroyOnLoad",
            RootReason::Static => "Static Field",
            RootReason::Unknown => "Unknown",
        }
    }

    pub fn explanation(&self) -> &'static str {
        match self {
            RootReason::None => "No root was found for this object.",
            RootReason::AssetBundle => {
                "Loaded AssetBundles stay in memory until they are explicitly unloaded, along \
                with every object loaded from them that is still referenced."
            }
            RootReason::Component => {
                "Components attached to a GameObject in a loaded scene stay alive as long as the \
                scene is loaded and the component is not destroyed."
            }
            RootReason::GameObject => {
                "GameObjects in a loaded scene stay alive until the scene is unloaded or the \
                GameObject is destroyed."
            }
            RootReason::UnityManager => {
                "Engine managers are singletons owned by the engine and live for the whole \
                session."
            }
            RootReason::DontUnloadUnusedAsset => {
                "The object carries the DontUnloadUnusedAsset hide flag, so unloading unused \
                assets skips it until the flag is cleared or it is destroyed."
            }
            RootReason::DontDestroyOnLoad => {
                "The object was marked DontDestroyOnLoad and survives scene loads until it is \
                destroyed explicitly."
            }
            RootReason::Static => {
                "Static fields live as long as their type is loaded. Anything they reference \
                cannot be collected until the field is cleared."
            }
            RootReason::Unknown => {
                "The object is a root, but none of the known retention rules matched it."
            }
        }
    }
}

impl Display for RootReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Type-based rules, applied in order after the flag-based ones.
const TYPE_RULES: [(WellKnownType, RootReason); 3] = [
    (WellKnownType::Component, RootReason::Component),
    (WellKnownType::GameObject, RootReason::GameObject),
    (WellKnownType::AssetBundle, RootReason::AssetBundle),
];

/// Decide whether `node` is a root. Returns the reason for roots and `None` otherwise. The first
/// matching rule wins:
///
/// 1. static fields are roots ([RootReason::Static])
/// 2. managed objects and GC handles are never roots
/// 3. native objects, in order: manager, DontDestroyOnLoad, DontUnloadUnusedAsset; persistent
///    objects are not roots; then Component, GameObject, AssetBundle by type; anything else is a
///    root of [RootReason::Unknown]
///
/// Fails with [RetentionError::InvalidNode] when `node` does not exist in `source`.
pub fn classify<S>(source: &S, node: Node) -> Result<Option<RootReason>, RetentionError>
where
    S: SnapshotSource + ?Sized,
{
    if !source.contains(node) {
        return Err(RetentionError::InvalidNode(format!(
            "cannot classify {node}: no such record in the snapshot"
        )));
    }
    let index = match node {
        Node::StaticField(_) => return Ok(Some(RootReason::Static)),
        Node::ManagedObject(_) | Node::GcHandle(_) => return Ok(None),
        Node::NativeObject(index) => index,
    };
    let obj = source.native_object(index).ok_or_else(|| {
        RetentionError::InvalidNode(format!("{node} has no native object record"))
    })?;

    if obj.is_manager() {
        return Ok(Some(RootReason::UnityManager));
    }
    if obj.is_dont_destroy_on_load() {
        return Ok(Some(RootReason::DontDestroyOnLoad));
    }
    if obj.is_dont_unload_unused_asset() {
        return Ok(Some(RootReason::DontUnloadUnusedAsset));
    }
    if obj.is_persistent() {
        return Ok(None);
    }
    for (base, reason) in TYPE_RULES {
        if source.native_is_subclass_of(index, base) {
            return Ok(Some(reason));
        }
    }
    Ok(Some(RootReason::Unknown))
}

/// Root counts per [RootReason] over a set of nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootSummary {
    pub roots: BTreeMap<RootReason, usize>,
    pub non_roots: usize,
}

impl RootSummary {
    pub fn root_count(&self) -> usize {
        self.roots.values().sum()
    }

    pub fn count(&self, reason: RootReason) -> usize {
        self.roots.get(&reason).copied().unwrap_or_default()
    }
}

impl Display for RootSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let width = RootReason::ALL
            .iter()
            .map(|reason| reason.label().len())
            .max()
            .unwrap_or_default();
        for (reason, count) in self.roots.iter().rev() {
            writeln!(f, "{:>width$}: {count}", reason.label())?;
        }
        write!(f, "{:>width$}: {}", "not a root", self.non_roots)
    }
}

/// Classify every node in `nodes`, stopping at the first invalid one.
pub fn summarize<S, I>(source: &S, nodes: I) -> Result<RootSummary, RetentionError>
where
    S: SnapshotSource + ?Sized,
    I: IntoIterator<Item = Node>,
{
    let mut summary = RootSummary::default();
    for node in nodes {
        match classify(source, node)? {
            Some(reason) => *summary.roots.entry(reason).or_default() += 1,
            None => summary.non_roots += 1,
        }
    }
    Ok(summary)
}
