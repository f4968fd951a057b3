// Import Policy Contract Tests
//
// These tests verify how an incoming snapshot is merged into a live store.
// Identity is the id within a kind; a conflict is the same id with different
// content; the user decides once, for the whole import, whether conflicts
// keep the local record or take the incoming one.
//
// **Problem**: merges that match on content, silently overwrite, or roll back
// half-applied imports all look reasonable and all lose data
// **Solution**: Contract tests for the exact merge policy

use chrono::{Duration, Utc};
use serde_json::Value;
use std::sync::Arc;
use switchboard_core::{
    detect_conflicts, import_snapshot, Agent, Combination, EntityKind, EntityStore,
    KeyValueStore, MemoryStore, OptyParameter, Port, Result, SnapshotData, SwitchError,
    TailParameter, UriEntry,
};

fn port(id: &str, number: u16) -> Port {
    Port {
        id: id.to_string(),
        port: number,
        description: None,
    }
}

fn uri(id: &str, path: &str) -> UriEntry {
    UriEntry {
        id: id.to_string(),
        uri: path.to_string(),
        description: None,
    }
}

fn agent(id: &str, username: &str) -> Agent {
    Agent {
        id: id.to_string(),
        username: username.to_string(),
    }
}

fn seeded(data: &SnapshotData) -> EntityStore<MemoryStore> {
    let store = EntityStore::new(MemoryStore::new());
    import_snapshot(&store, data, false).unwrap();
    store
}

/// Backend whose writes to one key always fail
struct FailingStore {
    inner: Arc<MemoryStore>,
    fail_key: &'static str,
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        if key == self.fail_key {
            return Err(SwitchError::Storage(format!("write to {} refused", key)));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }
}

/// WHY: A conflict is exactly "same id, different content"
/// FORBIDDEN: Matching records by content, port number or key
/// REASON: Ids are the only stable identity across machines
#[test]
fn conflicts_are_same_id_with_different_content() {
    let store = seeded(&SnapshotData {
        ports: vec![port("p1", 80), port("p2", 443)],
        ..Default::default()
    });

    let incoming = SnapshotData {
        ports: vec![
            port("p1", 81),   // same id, changed
            port("p2", 443),  // identical
            port("p3", 80),   // new id, same port number as p1
        ],
        ..Default::default()
    };

    let report = detect_conflicts(&store, &incoming).unwrap();
    assert!(report.has_conflicts);
    assert_eq!(report.conflicts.ports, vec!["p1".to_string()]);
    assert!(report.conflicts.agents.is_empty());
    assert_eq!(report.conflict_count(), 1);
}

/// WHY: Detection is a pure read
/// REASON: The CLI runs it before asking whether to overwrite
#[test]
fn conflict_detection_does_not_write() {
    let store = seeded(&SnapshotData {
        agents: vec![agent("1", "a")],
        ..Default::default()
    });

    let incoming = SnapshotData {
        agents: vec![agent("1", "b"), agent("2", "c")],
        ..Default::default()
    };
    detect_conflicts(&store, &incoming).unwrap();

    assert_eq!(store.all_agents().unwrap(), vec![agent("1", "a")]);
}

/// WHY: Without overwrite, local records win and new records still arrive
/// BREAKS: Users declining overwrite would lose either local edits or new data
#[test]
fn skip_keeps_local_and_inserts_new() {
    let store = seeded(&SnapshotData {
        agents: vec![agent("1", "local")],
        ..Default::default()
    });

    let incoming = SnapshotData {
        agents: vec![agent("1", "incoming"), agent("2", "new")],
        ..Default::default()
    };
    let report = import_snapshot(&store, &incoming, false).unwrap();

    assert_eq!(report.agents.skipped, 1);
    assert_eq!(report.agents.inserted, 1);
    assert_eq!(
        store.all_agents().unwrap(),
        vec![agent("1", "local"), agent("2", "new")]
    );
}

/// WHY: With overwrite, incoming content replaces the local record in place
#[test]
fn overwrite_replaces_in_place() {
    let store = seeded(&SnapshotData {
        uris: vec![uri("u1", "/a"), uri("u2", "/b")],
        ..Default::default()
    });

    let incoming = SnapshotData {
        uris: vec![uri("u1", "/changed")],
        ..Default::default()
    };
    let report = import_snapshot(&store, &incoming, true).unwrap();

    assert_eq!(report.uris.overwritten, 1);
    assert_eq!(
        store.all_uris().unwrap(),
        vec![uri("u1", "/changed"), uri("u2", "/b")]
    );
}

/// WHY: An overwritten combination keeps its local creation time
/// REASON: createdAt records when the record first existed on this machine
#[test]
fn overwritten_combination_keeps_created_at() {
    let created = Utc::now() - Duration::days(3);
    let local = Combination {
        id: "c1".to_string(),
        title: "Local".to_string(),
        agent_id: None,
        port_id: None,
        uri_id: None,
        tail_parameter_ids: vec![],
        opty_parameter_ids: vec![],
        created_at: created,
        updated_at: created,
    };
    let store = seeded(&SnapshotData {
        combinations: vec![local.clone()],
        ..Default::default()
    });

    let remote_time = Utc::now() - Duration::days(1);
    let incoming = Combination {
        title: "Remote".to_string(),
        agent_id: Some("1".to_string()),
        created_at: remote_time,
        updated_at: remote_time,
        ..local.clone()
    };
    import_snapshot(
        &store,
        &SnapshotData {
            combinations: vec![incoming],
            ..Default::default()
        },
        true,
    )
    .unwrap();

    let stored = store.combination_by_id("c1").unwrap().unwrap();
    assert_eq!(stored.title, "Remote");
    assert_eq!(stored.agent_id, Some("1".to_string()));
    assert_eq!(stored.created_at, created);
    assert!(stored.updated_at > remote_time);
}

/// WHY: An overwrite settles; the same snapshot then matches the store
/// FORBIDDEN: Counting createdAt/updatedAt as content
/// BREAKS: Every later check of the same file reports a conflict that
/// overwriting can never resolve
#[test]
fn overwrite_settles_on_reimport() {
    let created = Utc::now() - Duration::days(5);
    let local = Combination {
        id: "c1".to_string(),
        title: "Local".to_string(),
        agent_id: None,
        port_id: None,
        uri_id: None,
        tail_parameter_ids: vec![],
        opty_parameter_ids: vec![],
        created_at: created,
        updated_at: created,
    };
    let store = seeded(&SnapshotData {
        combinations: vec![local.clone()],
        ..Default::default()
    });

    let exported_at = Utc::now() - Duration::days(1);
    let incoming = SnapshotData {
        combinations: vec![Combination {
            title: "Lab".to_string(),
            uri_id: Some("u1".to_string()),
            created_at: exported_at,
            updated_at: exported_at,
            ..local
        }],
        ..Default::default()
    };

    let report = import_snapshot(&store, &incoming, true).unwrap();
    assert_eq!(report.combinations.overwritten, 1);

    let after = detect_conflicts(&store, &incoming).unwrap();
    assert!(!after.has_conflicts);

    let again = import_snapshot(&store, &incoming, true).unwrap();
    assert_eq!(again.combinations.unchanged, 1);
    assert_eq!(again.combinations.overwritten, 0);
    assert_eq!(store.combination_by_id("c1").unwrap().unwrap().created_at, created);
}

/// WHY: Parameter selections are sets, not sequences
/// REASON: Reordering the same parameters is not a content change
#[test]
fn reordered_parameter_ids_are_not_a_conflict() {
    let at = Utc::now();
    let combination = Combination {
        id: "c1".to_string(),
        title: "t".to_string(),
        agent_id: None,
        port_id: None,
        uri_id: None,
        tail_parameter_ids: vec!["t1".to_string(), "t2".to_string()],
        opty_parameter_ids: vec![],
        created_at: at,
        updated_at: at,
    };
    let store = seeded(&SnapshotData {
        combinations: vec![combination.clone()],
        ..Default::default()
    });

    let reordered = Combination {
        tail_parameter_ids: vec!["t2".to_string(), "t1".to_string()],
        ..combination
    };
    let report = detect_conflicts(
        &store,
        &SnapshotData {
            combinations: vec![reordered],
            ..Default::default()
        },
    )
    .unwrap();
    assert!(!report.has_conflicts);
}

/// WHY: A failed import reports what was already committed
/// FORBIDDEN: Rolling back collections committed before the failure
/// REASON: No cross-collection transaction exists; the report must say so
#[test]
fn failure_reports_partial_import_without_rollback() {
    let inner = Arc::new(MemoryStore::new());
    let failing = EntityStore::new(FailingStore {
        inner: inner.clone(),
        fail_key: EntityKind::Uri.storage_key(),
    });

    let incoming = SnapshotData {
        agents: vec![agent("1", "a")],
        ports: vec![port("p1", 80)],
        uris: vec![uri("u1", "/a")],
        tail_parameters: vec![TailParameter {
            id: "t1".to_string(),
            key: "lang".to_string(),
            value: "en".to_string(),
        }],
        opty_parameters: vec![OptyParameter {
            id: "o1".to_string(),
            key: "beta".to_string(),
            value: true,
        }],
        combinations: vec![],
    };

    let err = import_snapshot(&failing, &incoming, false).unwrap_err();
    match err {
        SwitchError::PartialImport {
            failed,
            committed,
            reason,
        } => {
            assert_eq!(failed, EntityKind::Uri);
            assert_eq!(committed, vec![EntityKind::Agent, EntityKind::Port]);
            assert!(reason.contains("refused"));
        }
        other => panic!("expected PartialImport, got {:?}", other),
    }

    let view = EntityStore::new(inner);
    assert_eq!(view.all_agents().unwrap().len(), 1);
    assert_eq!(view.all_ports().unwrap().len(), 1);
    assert!(view.all_uris().unwrap().is_empty());
    assert!(view.all_tail_parameters().unwrap().is_empty());
}

/// WHY: Unchanged collections are not rewritten
/// REASON: A failing backend key must not break imports that do not touch it
#[test]
fn untouched_collections_are_not_written() {
    let inner = Arc::new(MemoryStore::new());
    let failing = EntityStore::new(FailingStore {
        inner,
        fail_key: EntityKind::Combination.storage_key(),
    });

    let report = import_snapshot(
        &failing,
        &SnapshotData {
            agents: vec![agent("1", "a")],
            ..Default::default()
        },
        true,
    )
    .unwrap();
    assert_eq!(report.agents.inserted, 1);
    assert_eq!(report.combinations.inserted, 0);
}
