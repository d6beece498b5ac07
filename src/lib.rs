//! # retention-core
//!
//! Explains why an object in a captured memory snapshot is still alive.
//!
//! ## Overview
//!
//! A snapshot is a graph of native engine objects, managed runtime objects, GC handles and
//! static fields, connected by "references" edges. Some of those nodes are *roots*: the engine or
//! the runtime keeps them alive on its own. retention-core walks the graph backwards from any
//! node and reports every shortest chain of references leading to a root, tagged with the
//! reason that root is retained.
//!
//! ## Architecture
//!
//! - **[`node`]**: [`node::Node`], a reference to one snapshot record, and its snapshot-wide
//!   identity [`node::NodeId`]
//! - **[`properties`]**: the record types a snapshot is made of
//! - **[`snapshot`]**: the [`snapshot::SnapshotSource`] trait and the in-memory
//!   [`snapshot::Snapshot`]
//! - **[`roots`]**: [`roots::RootReason`] and the root classifier
//! - **[`search`]**: the backward breadth-first search
//! - **[`paths`]**: [`paths::RetentionPath`] and the ranked [`paths::PathCollection`]
//! - **[`config`]**: search limits, optionally loaded from TOML
//!
//! ## Quick Start
//!
//! ```rust
//! use retention_core::{
//!     properties::{GcHandle, ManagedObject, NativeObject},
//!     roots::RootReason,
//!     search::find_root_paths,
//!     snapshot::SnapshotBuilder,
//! };
//!
//! let mut builder = SnapshotBuilder::default();
//! let object = builder.add_type("Object", None);
//! let component = builder.add_type("Component", Some(object));
//! let camera = builder.add_native(NativeObject::new("Main Camera", component));
//! let handle = builder.add_gc_handle(GcHandle::default());
//! let target = builder.add_managed(ManagedObject::new("CameraController"));
//! builder.connect(camera, handle).connect(handle, target);
//! let snapshot = builder.build()?;
//!
//! let paths = find_root_paths(&snapshot, target)?;
//! let best = paths.shortest_path();
//! assert_eq!(best.reason(), RootReason::Component);
//! assert_eq!(best.nodes(), &[camera, handle, target]);
//! # Ok::<(), retention_core::RetentionError>(())
//! ```
//!
//! ## Errors and Diagnostics
//!
//! Only malformed input is an error: a node, or a connection endpoint, that does not name a
//! record in the snapshot fails with [`RetentionError::InvalidNode`]. A query that reaches no
//! root, or a search that exceeds its iteration limit, returns an empty (or truncated)
//! [`paths::PathCollection`] carrying [`diagnostic::SearchDiagnostic`]s.
//!
//! ## Features
//!
//! - **default**: the library
//! - **bin**: the `retention` CLI, which loads JSON snapshots and prints retention paths

pub mod config;
pub mod diagnostic;
pub mod error;
pub mod node;
pub mod paths;
pub mod properties;
pub mod roots;
pub mod search;
pub mod snapshot;
#[cfg(test)]
mod tests;

pub use error::*;
