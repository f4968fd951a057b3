/**
 * snapshot.rs
 * Portable export document
 *
 * Format:
 * ```json
 * {
 *   "version": "1.0",
 *   "exportedAt": "2025-03-02T10:14:07.512Z",
 *   "data": {
 *     "agents": [], "ports": [], "uris": [],
 *     "tailParameters": [], "optyParameters": [], "combinations": []
 *   }
 * }
 * ```
 *
 * `version` and `data` are mandatory; a collection missing from `data`
 * reads as empty.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::errors::{Result, SwitchError};
use crate::model::{Agent, Combination, OptyParameter, Port, Record, TailParameter, UriEntry};
use crate::storage::KeyValueStore;
use crate::store::EntityStore;

/// Format version written by this crate
pub const SNAPSHOT_VERSION: &str = "1.0";

/// Full export of every collection at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
    pub data: SnapshotData,
}

/// The six collections of a snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotData {
    #[serde(default)]
    pub agents: Vec<Agent>,
    #[serde(default)]
    pub ports: Vec<Port>,
    #[serde(default)]
    pub uris: Vec<UriEntry>,
    #[serde(default)]
    pub tail_parameters: Vec<TailParameter>,
    #[serde(default)]
    pub opty_parameters: Vec<OptyParameter>,
    #[serde(default)]
    pub combinations: Vec<Combination>,
}

impl SnapshotData {
    /// Total number of records across all collections
    pub fn record_count(&self) -> usize {
        self.agents.len()
            + self.ports.len()
            + self.uris.len()
            + self.tail_parameters.len()
            + self.opty_parameters.len()
            + self.combinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}

impl Snapshot {
    /// Parse a snapshot document
    ///
    /// # Errors
    /// `InvalidFormat` if the text is not a JSON object, if `version` or
    /// `data` is missing, or if a record does not have the expected shape
    pub fn from_json(text: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(text)
            .map_err(|e| SwitchError::InvalidFormat(format!("not JSON: {}", e)))?;

        let object = value
            .as_object()
            .ok_or_else(|| SwitchError::InvalidFormat("expected a JSON object".to_string()))?;

        match object.get("version") {
            Some(JsonValue::String(_)) => {}
            Some(_) => {
                return Err(SwitchError::InvalidFormat(
                    "'version' must be a string".to_string(),
                ))
            }
            None => return Err(SwitchError::InvalidFormat("missing 'version'".to_string())),
        }

        match object.get("data") {
            Some(JsonValue::Object(_)) => {}
            Some(_) => {
                return Err(SwitchError::InvalidFormat(
                    "'data' must be an object".to_string(),
                ))
            }
            None => return Err(SwitchError::InvalidFormat("missing 'data'".to_string())),
        }

        let snapshot: Snapshot = serde_json::from_value(value)
            .map_err(|e| SwitchError::InvalidFormat(e.to_string()))?;

        if snapshot.version != SNAPSHOT_VERSION {
            warn!(version = %snapshot.version, "snapshot version differs from {}", SNAPSHOT_VERSION);
        }

        Ok(snapshot)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Read every collection into a versioned snapshot (pure read)
pub fn export_snapshot<S: KeyValueStore>(store: &EntityStore<S>) -> Result<Snapshot> {
    let data = SnapshotData {
        agents: store.all_agents()?,
        ports: store.all_ports()?,
        uris: store.all_uris()?,
        tail_parameters: store.all_tail_parameters()?,
        opty_parameters: store.all_opty_parameters()?,
        combinations: store.all_combinations()?,
    };

    info!(records = data.record_count(), "snapshot exported");

    Ok(Snapshot {
        version: SNAPSHOT_VERSION.to_string(),
        exported_at: Some(Utc::now()),
        data,
    })
}

/// Write a snapshot as pretty-printed JSON
pub fn write_snapshot_file<P: AsRef<Path>>(path: P, snapshot: &Snapshot) -> Result<()> {
    let path = path.as_ref();
    let json = snapshot.to_json_pretty()?;
    fs::write(path, json).map_err(|e| {
        SwitchError::Storage(format!("Failed to write snapshot {}: {}", path.display(), e))
    })
}

/// Read and validate a snapshot file
pub fn read_snapshot_file<P: AsRef<Path>>(path: P) -> Result<Snapshot> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    Snapshot::from_json(&text)
}

/// Typed access to the matching collection of a snapshot
pub trait SnapshotCollection: Record {
    fn records(data: &SnapshotData) -> &[Self];
}

impl SnapshotCollection for Agent {
    fn records(data: &SnapshotData) -> &[Self] {
        &data.agents
    }
}

impl SnapshotCollection for Port {
    fn records(data: &SnapshotData) -> &[Self] {
        &data.ports
    }
}

impl SnapshotCollection for UriEntry {
    fn records(data: &SnapshotData) -> &[Self] {
        &data.uris
    }
}

impl SnapshotCollection for TailParameter {
    fn records(data: &SnapshotData) -> &[Self] {
        &data.tail_parameters
    }
}

impl SnapshotCollection for OptyParameter {
    fn records(data: &SnapshotData) -> &[Self] {
        &data.opty_parameters
    }
}

impl SnapshotCollection for Combination {
    fn records(data: &SnapshotData) -> &[Self] {
        &data.combinations
    }
}
