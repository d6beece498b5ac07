//! Snapshot module: the read-only memory capture that root path searches run against.
//!
//! # Module Organization
//!
//! - [`source`]: the [`SnapshotSource`] trait the search engine consumes, and [`Connection`]
//! - [`graph`]: [`ConnectionGraph`], the reference index answering "who references this node"
//! - [`base`]: [`Snapshot`], the in-memory implementation, and its serde form [`SnapshotData`]
//! - [`builder`]: [`SnapshotBuilder`] for assembling snapshots programmatically
//!
//! ```rust
//! use retention_core::snapshot::{SnapshotBuilder, SnapshotSource};
//! use retention_core::properties::{NativeObject, StaticField};
//!
//! let mut builder = SnapshotBuilder::default();
//! let object_type = builder.add_type("Object", None);
//! let texture = builder.add_native(NativeObject::new("Noise", object_type));
//! let field = builder.add_static(StaticField::new("Game.Cache", "noise"));
//! builder.connect(field, texture);
//! let snapshot = builder.build().unwrap();
//! assert!(snapshot.contains(texture));
//! ```

mod base;
mod builder;
mod graph;
mod source;


pub use base::{Snapshot, SnapshotData};
pub use builder::SnapshotBuilder;
pub use graph::ConnectionGraph;
pub use source::{Connection, SnapshotSource};
