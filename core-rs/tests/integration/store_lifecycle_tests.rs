//! Integration tests for the on-disk catalogue
//!
//! Tests the full lifecycle of a file-backed store:
//! - Creating records of every kind
//! - Reopening the store directory
//! - Updating and deleting
//! - Session state and clearing

use switchboard_core::{
    is_draft, resolve_references, Agent, AgentUpdate, CombinationUpdate, EntityKind, EntityStore,
    JsonFileStore, Navigation, NewCombination, NewOptyParameter, NewPort, NewTailParameter,
    NewUri, PortUpdate, SwitchError,
};
use std::fs;
use tempfile::TempDir;

fn open(dir: &TempDir) -> EntityStore<JsonFileStore> {
    EntityStore::new(JsonFileStore::open(dir.path().join("store")).unwrap())
}

#[test]
fn test_complete_catalogue_lifecycle() {
    let temp_dir = TempDir::new().unwrap();

    // 1. Populate a fresh store
    let combination_id = {
        let store = open(&temp_dir);
        store
            .create_agent(Agent {
                id: "1001".to_string(),
                username: "support-7".to_string(),
            })
            .unwrap();
        let port = store
            .create_port(NewPort {
                port: 3000,
                description: Some("dev server".to_string()),
            })
            .unwrap();
        let uri = store
            .create_uri(NewUri {
                uri: "/app/lab".to_string(),
                description: None,
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
                value: true,
            })
            .unwrap();

        let combination = store
            .create_combination(NewCombination {
                title: "Lab as support-7".to_string(),
                agent_id: Some("1001".to_string()),
                port_id: Some(port.id),
                uri_id: Some(uri.id),
                tail_parameter_ids: vec![tail.id],
                opty_parameter_ids: vec![opty.id],
            })
            .unwrap();
        assert!(!is_draft(&combination));
        combination.id
    };

    // 2. One JSON file per collection
    let store_dir = temp_dir.path().join("store");
    for kind in EntityKind::ALL {
        let path = store_dir.join(format!("{}.json", kind.storage_key()));
        assert!(path.exists(), "{} should be persisted", kind.storage_key());
    }

    // 3. Reopen and resolve everything
    let store = open(&temp_dir);
    assert_eq!(store.all_agents().unwrap().len(), 1);
    let combination = store.combination_by_id(&combination_id).unwrap().unwrap();
    let resolved = resolve_references(&combination, &store).unwrap();
    assert_eq!(resolved.agent.unwrap().username, "support-7");
    assert_eq!(resolved.port.unwrap().port, 3000);
    assert_eq!(resolved.uri.unwrap().uri, "/app/lab");
    assert_eq!(resolved.tail_parameters.len(), 1);
    assert_eq!(resolved.opty_parameters.len(), 1);

    // 4. Update survives another reopen
    let port_id = combination.port_id.clone().unwrap();
    store
        .update_port(
            &port_id,
            PortUpdate {
                port: Some(3001),
                ..Default::default()
            },
        )
        .unwrap();
    let store = open(&temp_dir);
    assert_eq!(store.port_by_id(&port_id).unwrap().unwrap().port, 3001);

    // 5. Deleting the uri leaves the combination with a dangling reference
    store.delete_uri(combination.uri_id.as_deref().unwrap()).unwrap();
    let combination = store.combination_by_id(&combination_id).unwrap().unwrap();
    assert!(!is_draft(&combination));
    assert!(resolve_references(&combination, &store).unwrap().uri.is_none());

    // 6. Clearing the reference turns it back into a draft
    let updated = store
        .update_combination(
            &combination_id,
            CombinationUpdate {
                uri_id: Some(None),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(is_draft(&updated));
    assert_eq!(updated.created_at, combination.created_at);
}

#[test]
fn test_agent_rename_persists() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(&temp_dir);

    for (id, name) in [("1001", "alice"), ("1002", "bob")] {
        store
            .create_agent(Agent {
                id: id.to_string(),
                username: name.to_string(),
            })
            .unwrap();
    }

    let err = store
        .update_agent(
            "1001",
            AgentUpdate {
                id: Some("1002".to_string()),
                username: None,
            },
        )
        .unwrap_err();
    assert!(matches!(err, SwitchError::DuplicateId { .. }));

    store
        .update_agent(
            "1001",
            AgentUpdate {
                id: Some("2001".to_string()),
                username: None,
            },
        )
        .unwrap();

    let store = open(&temp_dir);
    let ids: Vec<String> = store.all_agents().unwrap().into_iter().map(|a| a.id).collect();
    assert_eq!(ids, vec!["2001".to_string(), "1002".to_string()]);
}

#[test]
fn test_session_state_and_clear() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(&temp_dir);

    let combination = store
        .create_combination(NewCombination {
            title: "draft".to_string(),
            ..Default::default()
        })
        .unwrap();

    store
        .set_last_selected_combination_id(Some(&combination.id))
        .unwrap();
    store.set_current_impersonated_agent_id(Some("1001")).unwrap();
    store
        .set_current_navigation(Navigation::Combinations)
        .unwrap();

    let store = open(&temp_dir);
    assert_eq!(
        store.last_selected_combination_id().unwrap(),
        Some(combination.id.clone())
    );
    assert_eq!(
        store.current_impersonated_agent_id().unwrap(),
        Some("1001".to_string())
    );
    assert_eq!(store.current_navigation().unwrap(), Navigation::Combinations);

    store.clear_all_data().unwrap();
    assert!(store.all_combinations().unwrap().is_empty());
    assert_eq!(store.last_selected_combination_id().unwrap(), None);
    assert_eq!(store.current_impersonated_agent_id().unwrap(), None);
    assert_eq!(store.current_navigation().unwrap(), Navigation::Agents);
}

#[test]
fn test_corrupt_collection_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let store = open(&temp_dir);
    store
        .create_port(NewPort {
            port: 8080,
            description: None,
        })
        .unwrap();

    fs::write(temp_dir.path().join("store").join("ports.json"), "{not json").unwrap();

    let err = store.all_ports().unwrap_err();
    assert!(matches!(err, SwitchError::Storage(_)));

    // Other collections are unaffected
    assert!(store.all_agents().unwrap().is_empty());
}
