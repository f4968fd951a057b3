//! Integration tests for moving a catalogue between stores
//!
//! Tests the export -> file -> import path:
//! - Full round trip into an empty store
//! - Merging into a store that already diverged
//! - Malformed snapshot documents

use switchboard_core::{
    detect_conflicts, export_snapshot, import_snapshot, read_snapshot_file, write_snapshot_file,
    Agent, EntityStore, JsonFileStore, MemoryStore, NewCombination, NewOptyParameter, NewPort,
    NewTailParameter, NewUri, PortUpdate, Snapshot, SwitchError, SNAPSHOT_VERSION,
};
use std::fs;
use tempfile::TempDir;

fn populated() -> EntityStore<MemoryStore> {
    let store = EntityStore::new(MemoryStore::new());
    store
        .create_agent(Agent {
            id: "1001".to_string(),
            username: "support-7".to_string(),
        })
        .unwrap();
    let port = store
        .create_port(NewPort {
            port: 8443,
            description: Some("staging".to_string()),
        })
        .unwrap();
    let uri = store
        .create_uri(NewUri {
            uri: "/app/lab".to_string(),
            description: Some("lab".to_string()),
        })
        .unwrap();
    let tail = store
        .create_tail_parameter(NewTailParameter {
            key: "lang".to_string(),
            value: "en".to_string(),
        })
        .unwrap();
    let opty = store
        .create_opty_parameter(NewOptyParameter {
            key: "newNav".to_string(),
            value: false,
        })
        .unwrap();
    store
        .create_combination(NewCombination {
            title: "Lab".to_string(),
            agent_id: Some("1001".to_string()),
            port_id: Some(port.id),
            uri_id: Some(uri.id),
            tail_parameter_ids: vec![tail.id],
            opty_parameter_ids: vec![opty.id],
        })
        .unwrap();
    store
        .create_combination(NewCombination {
            title: "Draft".to_string(),
            ..Default::default()
        })
        .unwrap();
    store
}

#[test]
fn test_round_trip_into_empty_store() {
    let source = populated();
    let snapshot = export_snapshot(&source).unwrap();
    assert_eq!(snapshot.version, SNAPSHOT_VERSION);
    assert!(snapshot.exported_at.is_some());
    assert_eq!(snapshot.data.record_count(), 7);

    let target = EntityStore::new(MemoryStore::new());
    let conflicts = detect_conflicts(&target, &snapshot.data).unwrap();
    assert!(!conflicts.has_conflicts);

    let report = import_snapshot(&target, &snapshot.data, false).unwrap();
    assert_eq!(report.total().inserted, 7);
    assert_eq!(report.combinations.inserted, 2);

    assert_eq!(target.all_agents().unwrap(), source.all_agents().unwrap());
    assert_eq!(target.all_ports().unwrap(), source.all_ports().unwrap());
    assert_eq!(target.all_uris().unwrap(), source.all_uris().unwrap());
    assert_eq!(
        target.all_tail_parameters().unwrap(),
        source.all_tail_parameters().unwrap()
    );
    assert_eq!(
        target.all_opty_parameters().unwrap(),
        source.all_opty_parameters().unwrap()
    );
    assert_eq!(
        target.all_combinations().unwrap(),
        source.all_combinations().unwrap()
    );

    // Importing the same snapshot again changes nothing
    let again = import_snapshot(&target, &snapshot.data, true).unwrap();
    assert_eq!(again.total().unchanged, 7);
    assert_eq!(again.total().overwritten, 0);
}

#[test]
fn test_round_trip_through_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("switchboard-export.json");

    let source = populated();
    write_snapshot_file(&path, &export_snapshot(&source).unwrap()).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let raw: serde_json::Value = serde_json::from_str(&text).unwrap();
    for key in [
        "agents",
        "ports",
        "uris",
        "tailParameters",
        "optyParameters",
        "combinations",
    ] {
        assert!(raw["data"][key].is_array(), "data.{} should be an array", key);
    }
    assert!(raw["data"]["combinations"][0]["createdAt"].is_string());

    let target = EntityStore::new(JsonFileStore::open(temp_dir.path().join("store")).unwrap());
    let snapshot = read_snapshot_file(&path).unwrap();
    import_snapshot(&target, &snapshot.data, false).unwrap();
    assert_eq!(
        target.all_combinations().unwrap(),
        source.all_combinations().unwrap()
    );
}

#[test]
fn test_merge_into_diverged_store() {
    let source = populated();
    let snapshot = export_snapshot(&source).unwrap();

    let target = EntityStore::new(MemoryStore::new());
    import_snapshot(&target, &snapshot.data, false).unwrap();

    // Local edit diverges from the snapshot
    let port_id = target.all_ports().unwrap()[0].id.clone();
    target
        .update_port(
            &port_id,
            PortUpdate {
                port: Some(9443),
                ..Default::default()
            },
        )
        .unwrap();

    let conflicts = detect_conflicts(&target, &snapshot.data).unwrap();
    assert_eq!(conflicts.conflicts.ports, vec![port_id.clone()]);
    assert_eq!(conflicts.conflict_count(), 1);

    // Skip keeps the local value
    let report = import_snapshot(&target, &snapshot.data, false).unwrap();
    assert_eq!(report.ports.skipped, 1);
    assert_eq!(target.port_by_id(&port_id).unwrap().unwrap().port, 9443);

    // Overwrite takes the snapshot's value
    let report = import_snapshot(&target, &snapshot.data, true).unwrap();
    assert_eq!(report.ports.overwritten, 1);
    assert_eq!(target.port_by_id(&port_id).unwrap().unwrap().port, 8443);
}

#[test]
fn test_malformed_snapshots_rejected() {
    for text in [
        "not json",
        "[]",
        r#"{"data": {}}"#,
        r#"{"version": "1.0"}"#,
        r#"{"version": 1, "data": {}}"#,
        r#"{"version": "1.0", "data": []}"#,
        r#"{"version": "1.0", "data": {"ports": [{"id": "p1"}]}}"#,
    ] {
        let err = Snapshot::from_json(text).unwrap_err();
        assert!(
            matches!(err, SwitchError::InvalidFormat(_)),
            "{} should be InvalidFormat, got {:?}",
            text,
            err
        );
    }
}

#[test]
fn test_partial_snapshot_accepted() {
    let snapshot = Snapshot::from_json(
        r#"{"version": "1.0", "data": {"agents": [{"id": "7", "username": "x"}]}}"#,
    )
    .unwrap();
    assert!(snapshot.exported_at.is_none());

    let store = EntityStore::new(MemoryStore::new());
    let report = import_snapshot(&store, &snapshot.data, false).unwrap();
    assert_eq!(report.agents.inserted, 1);
    assert_eq!(report.total().inserted, 1);
}
