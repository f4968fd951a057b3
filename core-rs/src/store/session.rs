//! Persisted runtime state next to the catalogue collections
//!
//! These keys are not part of snapshots; `clear_all_data` resets them.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::info;

use crate::errors::Result;
use crate::model::EntityKind;
use crate::storage::KeyValueStore;

use super::EntityStore;

const LAST_SELECTED_COMBINATION: &str = "lastSelectedCombinationId";
const COMBINATION_INITIALIZED: &str = "currentCombinationInitialized";
const IMPERSONATED_AGENT: &str = "currentImpersonatedAgentId";
const IMPERSONATED_ORIGIN: &str = "currentImpersonatedOrigin";
const CURRENT_NAVIGATION: &str = "currentNavigation";

/// Section of the management screen last shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Navigation {
    #[default]
    Agents,
    Ports,
    Uris,
    TailParameters,
    OptyParameters,
    Combinations,
}

impl From<EntityKind> for Navigation {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Agent => Navigation::Agents,
            EntityKind::Port => Navigation::Ports,
            EntityKind::Uri => Navigation::Uris,
            EntityKind::TailParameter => Navigation::TailParameters,
            EntityKind::OptyParameter => Navigation::OptyParameters,
            EntityKind::Combination => Navigation::Combinations,
        }
    }
}

impl<S: KeyValueStore> EntityStore<S> {
    fn optional_string(&self, key: &str) -> Result<Option<String>> {
        Ok(match self.kv.get(key)? {
            Some(JsonValue::String(s)) => Some(s),
            _ => None,
        })
    }

    fn set_optional_string(&self, key: &str, value: Option<&str>) -> Result<()> {
        match value {
            Some(v) => self.kv.set(key, JsonValue::String(v.to_string())),
            None => self.kv.remove(key),
        }
    }

    pub fn last_selected_combination_id(&self) -> Result<Option<String>> {
        self.optional_string(LAST_SELECTED_COMBINATION)
    }

    pub fn set_last_selected_combination_id(&self, id: Option<&str>) -> Result<()> {
        self.set_optional_string(LAST_SELECTED_COMBINATION, id)
    }

    /// Combination whose parameters were last loaded into the editor
    pub fn current_combination_initialized(&self) -> Result<Option<String>> {
        self.optional_string(COMBINATION_INITIALIZED)
    }

    pub fn set_current_combination_initialized(&self, id: Option<&str>) -> Result<()> {
        self.set_optional_string(COMBINATION_INITIALIZED, id)
    }

    /// Agent the target session is currently impersonating, if known
    pub fn current_impersonated_agent_id(&self) -> Result<Option<String>> {
        self.optional_string(IMPERSONATED_AGENT)
    }

    pub fn set_current_impersonated_agent_id(&self, id: Option<&str>) -> Result<()> {
        self.set_optional_string(IMPERSONATED_AGENT, id)
    }

    /// Origin the recorded impersonation happened on
    pub fn current_impersonated_origin(&self) -> Result<Option<String>> {
        self.optional_string(IMPERSONATED_ORIGIN)
    }

    /// Remember that `agent_id` is impersonated on `origin`
    pub fn record_impersonation(&self, origin: &str, agent_id: &str) -> Result<()> {
        self.set_optional_string(IMPERSONATED_AGENT, Some(agent_id))?;
        self.set_optional_string(IMPERSONATED_ORIGIN, Some(origin))
    }

    /// Whether the session on `origin` is known to impersonate someone
    ///
    /// An impersonation recorded for another origin does not count.
    pub fn is_impersonating_on(&self, origin: &str) -> Result<bool> {
        Ok(self.current_impersonated_agent_id()?.is_some()
            && self.current_impersonated_origin()?.as_deref() == Some(origin))
    }

    pub fn current_navigation(&self) -> Result<Navigation> {
        Ok(match self.kv.get(CURRENT_NAVIGATION)? {
            Some(value) => serde_json::from_value(value).unwrap_or_default(),
            None => Navigation::default(),
        })
    }

    pub fn set_current_navigation(&self, navigation: Navigation) -> Result<()> {
        self.kv
            .set(CURRENT_NAVIGATION, serde_json::to_value(navigation)?)
    }

    /// Empty every collection and reset runtime state
    pub fn clear_all_data(&self) -> Result<()> {
        for kind in EntityKind::ALL {
            self.kv.set(kind.storage_key(), JsonValue::Array(Vec::new()))?;
        }
        for key in [
            LAST_SELECTED_COMBINATION,
            COMBINATION_INITIALIZED,
            IMPERSONATED_AGENT,
            IMPERSONATED_ORIGIN,
            CURRENT_NAVIGATION,
        ] {
            self.kv.remove(key)?;
        }

        info!("all data cleared");
        Ok(())
    }
}
