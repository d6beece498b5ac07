//! Tests for the backward root path search

use super::helpers::*;
use crate::{
    config::{LimitPolicy, SearchConfig},
    diagnostic::SearchDiagnostic,
    node::Node,
    properties::{GcHandle, ManagedObject, NativeObject, NativeObjectFlag, StaticField, WellKnownType},
    roots::{classify, RootReason},
    search::{find_root_paths, RootPathFinder},
    snapshot::{Connection, SnapshotBuilder, SnapshotSource},
    RetentionError,
};
use petgraph::Direction;
use std::collections::BTreeSet;
use test_log::test;

#[test]
fn test_query_static_field_is_its_own_root() {
    let (snapshot, scene) = create_test_snapshot();
    let paths = find_root_paths(&snapshot, scene.instance_field).unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].nodes(), &[scene.instance_field]);
    assert_eq!(paths[0].reason(), RootReason::Static);
    assert_eq!(paths.iterations(), 1);
}

#[test]
fn test_query_native_root_is_not_expanded() {
    let (snapshot, scene) = create_test_snapshot();
    // controller is referenced by player, but is a root itself
    let paths = find_root_paths(&snapshot, scene.controller).unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].nodes(), &[scene.controller]);
    assert_eq!(paths[0].reason(), RootReason::Component);
}

#[test]
fn test_component_gc_handle_managed_chain() {
    let (mut builder, types) = builder_with_types();
    let component = builder.add_native(NativeObject::new("Enemy", types.mono_behaviour));
    let managed = builder.add_managed(ManagedObject::new("EnemyAI"));
    let handle = builder.add_gc_handle(GcHandle {
        target: managed.managed_index(),
    });
    builder.connect(component, handle).connect(handle, managed);
    let snapshot = builder.build().unwrap();

    let paths = find_root_paths(&snapshot, managed).unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].nodes(), &[component, handle, managed]);
    assert_eq!(paths[0].reason(), RootReason::Component);
    assert!(paths.diagnostics().is_empty());
}

#[test]
fn test_scene_paths_are_sorted_and_minimal() {
    let (snapshot, scene) = create_test_snapshot();
    let paths = find_root_paths(&snapshot, scene.icon).unwrap();

    assert_eq!(paths.len(), 2);
    assert_eq!(
        paths[0].nodes(),
        &[scene.instance_field, scene.inventory, scene.icon]
    );
    assert_eq!(paths[0].reason(), RootReason::Static);
    assert_eq!(
        paths[1].nodes(),
        &[
            scene.controller,
            scene.handle,
            scene.script,
            scene.inventory,
            scene.icon
        ]
    );
    assert_eq!(paths[1].reason(), RootReason::Component);
    // The GameObject above the controller is never reached: roots end paths
    assert!(paths
        .iter()
        .all(|path| !path.nodes().contains(&scene.player)));
}

#[test]
fn test_unreachable_object_yields_empty_collection() {
    let (snapshot, scene) = create_test_snapshot();
    let paths = find_root_paths(&snapshot, scene.orphan).unwrap();
    assert!(paths.is_empty());
    assert!(!paths.is_truncated());
    let best = paths.shortest_path();
    assert!(best.is_empty());
    assert_eq!(best.reason(), RootReason::None);
    assert!(matches!(
        paths.diagnostics(),
        [SearchDiagnostic::Info(_)]
    ));
}

#[test]
fn test_every_path_starts_at_root_and_ends_at_query() {
    let (snapshot, _) = create_test_snapshot();
    for query in snapshot.nodes() {
        let paths = find_root_paths(&snapshot, query).unwrap();
        for path in paths.iter() {
            let root = path.root().unwrap();
            assert_eq!(classify(&snapshot, root).unwrap(), Some(path.reason()));
            assert_eq!(path.target(), Some(query));
            // Each consecutive pair is a real reference, root side first
            for pair in path.nodes().windows(2) {
                assert!(snapshot
                    .connections(pair[1], Direction::Incoming)
                    .contains(&Connection::new(pair[0], pair[1])));
            }
        }
    }
}

#[test]
fn test_cycles_without_roots_terminate() {
    let (mut builder, _) = builder_with_types();
    let a = builder.add_managed(ManagedObject::new("A"));
    let b = builder.add_managed(ManagedObject::new("B"));
    let c = builder.add_managed(ManagedObject::new("C"));
    builder.connect(a, b).connect(b, c).connect(c, a).connect(a, a);
    let snapshot = builder.build().unwrap();

    let paths = find_root_paths(&snapshot, a).unwrap();
    assert!(paths.is_empty());
    assert_eq!(paths.iterations(), 3);
}

#[test]
fn test_cycle_through_query_does_not_repeat_nodes() {
    let (mut builder, _) = builder_with_types();
    let query = builder.add_managed(ManagedObject::new("Query"));
    let other = builder.add_managed(ManagedObject::new("Other"));
    let field = builder.add_static(StaticField::new("Cache", "items"));
    builder
        .connect(query, other)
        .connect(other, query)
        .connect(field, other);
    let snapshot = builder.build().unwrap();

    let paths = find_root_paths(&snapshot, query).unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].nodes(), &[field, other, query]);
    for path in paths.iter() {
        let distinct = path.iter().collect::<BTreeSet<_>>();
        assert_eq!(distinct.len(), path.len());
    }
}

#[test]
fn test_diamond_keeps_first_discovered_shortest_path() {
    let (mut builder, _) = builder_with_types();
    let query = builder.add_managed(ManagedObject::new("Query"));
    let near = builder.add_managed(ManagedObject::new("Near"));
    let far_1 = builder.add_managed(ManagedObject::new("Far1"));
    let far_2 = builder.add_managed(ManagedObject::new("Far2"));
    let field = builder.add_static(StaticField::new("Registry", "all"));
    builder
        .connect(near, query)
        .connect(far_2, query)
        .connect(far_1, far_2)
        .connect(field, near)
        .connect(field, far_1);
    let snapshot = builder.build().unwrap();

    let paths = find_root_paths(&snapshot, query).unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].nodes(), &[field, near, query]);
}

#[test]
fn test_search_is_idempotent() {
    let (snapshot, scene) = create_test_snapshot();
    let finder = RootPathFinder::new(&snapshot);
    let first = finder.find(scene.icon).unwrap();
    let second = finder.find(scene.icon).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_invalid_query_fails() {
    let (snapshot, _) = create_test_snapshot();
    assert!(matches!(
        find_root_paths(&snapshot, Node::GcHandle(40)),
        Err(RetentionError::InvalidNode(_))
    ));
}

/// Query with two static referencers and a long chain of managed objects behind it.
fn fan_snapshot(chain: usize) -> (crate::snapshot::Snapshot, Node) {
    let (mut builder, _) = builder_with_types();
    let query = builder.add_managed(ManagedObject::new("Query"));
    let first = builder.add_static(StaticField::new("A", "first"));
    let second = builder.add_static(StaticField::new("B", "second"));
    builder.connect(first, query).connect(second, query);
    let mut previous = query;
    for idx in 0..chain {
        let link = builder.add_managed(ManagedObject::new(&format!("Link{idx}")));
        builder.connect(link, previous);
        previous = link;
    }
    (builder.build().unwrap(), query)
}

#[test]
fn test_iteration_limit_discards_partial_results() {
    let (snapshot, query) = fan_snapshot(30);
    let config = SearchConfig::default().with_max_iterations(5);
    let paths = RootPathFinder::with_config(&snapshot, config)
        .find(query)
        .unwrap();

    assert!(paths.is_empty());
    assert!(paths.is_truncated());
    assert_eq!(paths.iterations(), 5);
    match paths.diagnostics() {
        [SearchDiagnostic::IterationLimit {
            limit,
            paths_found,
            policy,
            ..
        }] => {
            assert_eq!(*limit, 5);
            assert_eq!(*paths_found, 2);
            assert_eq!(*policy, LimitPolicy::Discard);
        }
        other => panic!("unexpected diagnostics {other:?}"),
    }
    assert!(paths.shortest_path().is_empty());
}

#[test]
fn test_iteration_limit_keep_partial() {
    let (snapshot, query) = fan_snapshot(30);
    let config = SearchConfig::default()
        .with_max_iterations(5)
        .with_limit_policy(LimitPolicy::KeepPartial);
    let paths = RootPathFinder::with_config(&snapshot, config)
        .find(query)
        .unwrap();

    assert!(paths.is_truncated());
    assert_eq!(paths.len(), 2);
    assert!(paths.iter().all(|p| p.reason() == RootReason::Static));
    assert!(paths.diagnostics()[0].is_iteration_limit());
}

#[test]
fn test_limit_not_exceeded_when_search_finishes_exactly() {
    let (snapshot, scene) = create_test_snapshot();
    // inventory, script, instance_field, handle, controller
    let exact = SearchConfig::default().with_max_iterations(5);
    let paths = RootPathFinder::with_config(&snapshot, exact)
        .find(scene.inventory)
        .unwrap();
    assert!(!paths.is_truncated());
    assert_eq!(paths.len(), 2);

    let short = SearchConfig::default().with_max_iterations(4);
    let paths = RootPathFinder::with_config(&snapshot, short)
        .find(scene.inventory)
        .unwrap();
    assert!(paths.is_truncated());
    assert!(paths.is_empty());
}

#[test]
fn test_default_limit_guards_huge_chains() {
    let (snapshot, query) = fan_snapshot(100_000);
    let paths = find_root_paths(&snapshot, query).unwrap();
    assert!(paths.is_truncated());
    assert!(paths.is_empty());
    assert_eq!(paths.iterations(), crate::config::DEFAULT_MAX_ITERATIONS);
}

/// A source whose only connection points at a record that does not exist.
struct DanglingSource {
    native: NativeObject,
}

impl SnapshotSource for DanglingSource {
    fn contains(&self, node: Node) -> bool {
        node == Node::ManagedObject(0)
    }

    fn native_object(&self, index: usize) -> Option<&NativeObject> {
        (index == 0).then_some(&self.native)
    }

    fn native_is_subclass_of(&self, _index: usize, _base: WellKnownType) -> bool {
        false
    }

    fn connections(&self, node: Node, direction: Direction) -> Vec<Connection> {
        match direction {
            Direction::Incoming => vec![Connection::new(Node::NativeObject(7), node)],
            Direction::Outgoing => vec![],
        }
    }
}

#[test]
fn test_dangling_connection_endpoint_propagates() {
    let source = DanglingSource {
        native: NativeObject::new("Unused", 0).with_flag(NativeObjectFlag::IsManager),
    };
    assert!(matches!(
        find_root_paths(&source, Node::ManagedObject(0)),
        Err(RetentionError::InvalidNode(_))
    ));
}

#[test]
fn test_builder_rejects_unknown_endpoints() {
    let mut builder = SnapshotBuilder::default();
    let field = builder.add_static(StaticField::new("A", "b"));
    builder.connect(field, Node::ManagedObject(0));
    assert!(matches!(
        builder.build(),
        Err(RetentionError::InvalidNode(_))
    ));
}
