/**
 * entities.rs
 * Persisted record types, their creation payloads and update payloads
 *
 * Records serialize with camelCase field names so that stored collections and
 * exported snapshots share one JSON shape:
 *
 * ```json
 * {
 *   "id": "5f0c...",
 *   "title": "Lab as support-7",
 *   "agentId": "agent-7",
 *   "portId": null,
 *   "uriId": "9a1d...",
 *   "tailParameterIds": [],
 *   "optyParameterIds": ["c3e1..."],
 *   "createdAt": "2025-03-02T10:14:07.512Z",
 *   "updatedAt": "2025-03-02T10:14:07.512Z"
 * }
 * ```
 *
 * Update payloads list only mutable fields. `Option<Option<_>>` fields
 * distinguish "leave as is" (None) from "clear" (Some(None)).
 */

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::kind::EntityKind;

/// Common behaviour of every persisted record
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync {
    const KIND: EntityKind;

    fn id(&self) -> &str;

    /// Field-by-field content equality, used for import conflict detection
    fn same_content(&self, other: &Self) -> bool;

    /// Record to store when `incoming` overwrites `self` during import
    fn overwritten_by(&self, incoming: &Self) -> Self {
        incoming.clone()
    }
}

/// Generate a fresh record id
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// ============================================================================
// Agent
// ============================================================================

/// Support agent that can be impersonated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub username: String,
}

/// Agents carry caller-chosen ids, so the payload is the full record
pub type NewAgent = Agent;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentUpdate {
    /// Rename the agent id (checked for collisions)
    pub id: Option<String>,
    pub username: Option<String>,
}

impl Agent {
    pub fn apply(&mut self, update: AgentUpdate) {
        if let Some(id) = update.id {
            self.id = id;
        }
        if let Some(username) = update.username {
            self.username = username;
        }
    }
}

impl Record for Agent {
    const KIND: EntityKind = EntityKind::Agent;

    fn id(&self) -> &str {
        &self.id
    }

    fn same_content(&self, other: &Self) -> bool {
        self.id == other.id && self.username == other.username
    }
}

// ============================================================================
// Port
// ============================================================================

/// Local development port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub id: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPort {
    pub port: u16,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortUpdate {
    pub port: Option<u16>,
    pub description: Option<Option<String>>,
}

impl Port {
    pub fn apply(&mut self, update: PortUpdate) {
        if let Some(port) = update.port {
            self.port = port;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
    }
}

impl Record for Port {
    const KIND: EntityKind = EntityKind::Port;

    fn id(&self) -> &str {
        &self.id
    }

    fn same_content(&self, other: &Self) -> bool {
        self.id == other.id && self.port == other.port && self.description == other.description
    }
}

// ============================================================================
// URI
// ============================================================================

/// Path on the target application (e.g. `/app/lab`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UriEntry {
    pub id: String,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUri {
    pub uri: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UriUpdate {
    pub uri: Option<String>,
    pub description: Option<Option<String>>,
}

impl UriEntry {
    pub fn apply(&mut self, update: UriUpdate) {
        if let Some(uri) = update.uri {
            self.uri = uri;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
    }
}

impl Record for UriEntry {
    const KIND: EntityKind = EntityKind::Uri;

    fn id(&self) -> &str {
        &self.id
    }

    fn same_content(&self, other: &Self) -> bool {
        self.id == other.id && self.uri == other.uri && self.description == other.description
    }
}

// ============================================================================
// Parameters
// ============================================================================

/// String query parameter appended to the target URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TailParameter {
    pub id: String,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTailParameter {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TailParameterUpdate {
    pub key: Option<String>,
    pub value: Option<String>,
}

impl TailParameter {
    pub fn apply(&mut self, update: TailParameterUpdate) {
        if let Some(key) = update.key {
            self.key = key;
        }
        if let Some(value) = update.value {
            self.value = value;
        }
    }
}

impl Record for TailParameter {
    const KIND: EntityKind = EntityKind::TailParameter;

    fn id(&self) -> &str {
        &self.id
    }

    fn same_content(&self, other: &Self) -> bool {
        self.id == other.id && self.key == other.key && self.value == other.value
    }
}

/// Boolean feature flag, sent as `opty_<key>=true|false`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptyParameter {
    pub id: String,
    pub key: String,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOptyParameter {
    pub key: String,
    pub value: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptyParameterUpdate {
    pub key: Option<String>,
    pub value: Option<bool>,
}

impl OptyParameter {
    pub fn apply(&mut self, update: OptyParameterUpdate) {
        if let Some(key) = update.key {
            self.key = key;
        }
        if let Some(value) = update.value {
            self.value = value;
        }
    }
}

impl Record for OptyParameter {
    const KIND: EntityKind = EntityKind::OptyParameter;

    fn id(&self) -> &str {
        &self.id
    }

    fn same_content(&self, other: &Self) -> bool {
        self.id == other.id && self.key == other.key && self.value == other.value
    }
}

// ============================================================================
// Combination
// ============================================================================

/// Saved bundle of references used to build a redirect target
///
/// Any reference may dangle once the referenced record is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combination {
    pub id: String,
    pub title: String,
    pub agent_id: Option<String>,
    pub port_id: Option<String>,
    pub uri_id: Option<String>,
    #[serde(default)]
    pub tail_parameter_ids: Vec<String>,
    #[serde(default)]
    pub opty_parameter_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCombination {
    pub title: String,
    pub agent_id: Option<String>,
    pub port_id: Option<String>,
    pub uri_id: Option<String>,
    pub tail_parameter_ids: Vec<String>,
    pub opty_parameter_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombinationUpdate {
    pub title: Option<String>,
    pub agent_id: Option<Option<String>>,
    pub port_id: Option<Option<String>>,
    pub uri_id: Option<Option<String>>,
    pub tail_parameter_ids: Option<Vec<String>>,
    pub opty_parameter_ids: Option<Vec<String>>,
}

impl Combination {
    /// Build a new combination stamped with `now`
    pub fn from_new(new: NewCombination, now: DateTime<Utc>) -> Self {
        Combination {
            id: generate_id(),
            title: new.title,
            agent_id: new.agent_id,
            port_id: new.port_id,
            uri_id: new.uri_id,
            tail_parameter_ids: new.tail_parameter_ids,
            opty_parameter_ids: new.opty_parameter_ids,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an update and refresh `updated_at`; `created_at` never changes
    pub fn apply(&mut self, update: CombinationUpdate, now: DateTime<Utc>) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(agent_id) = update.agent_id {
            self.agent_id = agent_id;
        }
        if let Some(port_id) = update.port_id {
            self.port_id = port_id;
        }
        if let Some(uri_id) = update.uri_id {
            self.uri_id = uri_id;
        }
        if let Some(ids) = update.tail_parameter_ids {
            self.tail_parameter_ids = ids;
        }
        if let Some(ids) = update.opty_parameter_ids {
            self.opty_parameter_ids = ids;
        }
        self.updated_at = now;
    }
}

impl Record for Combination {
    const KIND: EntityKind = EntityKind::Combination;

    fn id(&self) -> &str {
        &self.id
    }

    /// Timestamps are bookkeeping, not content
    fn same_content(&self, other: &Self) -> bool {
        fn as_set(ids: &[String]) -> BTreeSet<&str> {
            ids.iter().map(String::as_str).collect()
        }

        self.id == other.id
            && self.title == other.title
            && self.agent_id == other.agent_id
            && self.port_id == other.port_id
            && self.uri_id == other.uri_id
            && as_set(&self.tail_parameter_ids) == as_set(&other.tail_parameter_ids)
            && as_set(&self.opty_parameter_ids) == as_set(&other.opty_parameter_ids)
    }

    fn overwritten_by(&self, incoming: &Self) -> Self {
        Combination {
            created_at: self.created_at,
            updated_at: Utc::now(),
            ..incoming.clone()
        }
    }
}
