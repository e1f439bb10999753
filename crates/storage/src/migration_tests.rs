// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn same_version_is_noop() {
    let v1 = json!({"v": 1, "seq": 1, "state": {}});
    let registry = MigrationRegistry::new();
    let result = registry.migrate_to(v1.clone(), 1).unwrap();
    assert_eq!(result, v1);
}

#[test]
fn missing_version_reads_as_one() {
    let bare = json!({"seq": 3, "state": {"escalations": {}}});
    let registry = MigrationRegistry::new();
    assert_eq!(registry.migrate_to(bare.clone(), 1).unwrap(), bare);
}

#[test]
fn too_new_error() {
    let v99 = json!({"v": 99, "seq": 1, "state": {}});
    let registry = MigrationRegistry::new();
    assert!(matches!(registry.migrate_to(v99, 1), Err(MigrationError::TooNew(99, 1))));
}

#[test]
fn no_path_error() {
    let v1 = json!({"v": 1, "seq": 1, "state": {}});
    let registry = MigrationRegistry::new();
    assert!(matches!(registry.migrate_to(v1, 2), Err(MigrationError::NoPath(1, 2))));
}

/// Renames the old `alerts` map to `escalations`.
struct RenameAlerts;

impl Migration for RenameAlerts {
    fn source_version(&self) -> u32 {
        1
    }
    fn target_version(&self) -> u32 {
        2
    }
    fn migrate(&self, snapshot: &mut Value) -> Result<(), MigrationError> {
        let state = snapshot
            .get_mut("state")
            .and_then(Value::as_object_mut)
            .ok_or_else(|| MigrationError::Malformed("missing state".into()))?;
        if let Some(alerts) = state.remove("alerts") {
            state.insert("escalations".into(), alerts);
        }
        Ok(())
    }
}

#[test]
fn migration_chain() {
    let mut registry = MigrationRegistry::new();
    registry.register(Box::new(RenameAlerts));

    let v1 = json!({"v": 1, "seq": 42, "state": {"alerts": {"acme/widget": {}}}});
    let result = registry.migrate_to(v1, 2).unwrap();

    assert_eq!(result["v"], 2);
    assert_eq!(result["seq"], 42);
    assert!(result["state"]["escalations"]["acme/widget"].is_object());
    assert!(result["state"].get("alerts").is_none());
}

#[test]
fn failing_step_stops_the_chain() {
    let mut registry = MigrationRegistry::new();
    registry.register(Box::new(RenameAlerts));

    let broken = json!({"v": 1, "seq": 1});
    assert!(matches!(registry.migrate_to(broken, 2), Err(MigrationError::Malformed(_))));
}
