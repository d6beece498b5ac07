//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use std::path::PathBuf;
use tempfile::TempDir;

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times, subsequent calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Snapshot covering the four canonical lookups.
///
/// ```text
/// native:0 GameObject "Hero"
/// native:1 MonoBehaviour "HeroController"    -> gchandle:0 -> managed:0 HeroState
/// native:0 -> gchandle:1 -> managed:1 Weapon -> managed:2 Damage
/// static:0 Combat.LastDamage                 -> managed:2 Damage
/// native:2 Texture2D "Loose" (persistent, unreferenced)
/// ```
#[allow(dead_code)]
pub const SCENE_JSON: &str = r#"{
    "native_types": [
        { "name": "Object" },
        { "name": "Component", "base": 0 },
        { "name": "Behaviour", "base": 1 },
        { "name": "MonoBehaviour", "base": 2 },
        { "name": "GameObject", "base": 0 },
        { "name": "Texture2D", "base": 0 }
    ],
    "native_objects": [
        { "name": "Hero", "native_type": 4, "instance_id": 1200 },
        { "name": "HeroController", "native_type": 3, "instance_id": 1202 },
        { "name": "Loose", "native_type": 5, "flags": ["is_persistent"] }
    ],
    "managed_objects": [
        { "type_name": "HeroState", "address": 4096 },
        { "type_name": "Weapon", "address": 8192 },
        { "type_name": "Damage", "address": 12288 }
    ],
    "gc_handles": [
        { "target": 0 },
        { "target": 1 }
    ],
    "static_fields": [
        { "type_name": "Combat", "field_name": "LastDamage" }
    ],
    "connections": [
        { "from": { "native_object": 1 }, "to": { "gc_handle": 0 } },
        { "from": { "gc_handle": 0 }, "to": { "managed_object": 0 } },
        { "from": { "native_object": 0 }, "to": { "gc_handle": 1 } },
        { "from": { "gc_handle": 1 }, "to": { "managed_object": 1 } },
        { "from": { "managed_object": 1 }, "to": { "managed_object": 2 } },
        { "from": { "static_field": 0 }, "to": { "managed_object": 2 } }
    ]
}"#;

/// Write [SCENE_JSON] into a temp dir and return its path.
#[allow(dead_code)]
pub fn write_scene(temp_dir: &TempDir) -> PathBuf {
    let path = temp_dir.path().join("scene.json");
    std::fs::write(&path, SCENE_JSON).unwrap();
    path
}
