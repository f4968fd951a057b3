//! Combination aggregate rules
//!
//! A combination only needs a title to be saved. It is a *draft* while any of
//! its agent/port/uri references is unset; parameter selections are optional
//! and never make it a draft. References are resolved leniently: an id whose
//! record was deleted simply resolves to nothing.

use serde::Serialize;
use tracing::warn;

use crate::errors::{Result, SwitchError};
use crate::model::{Agent, Combination, OptyParameter, Port, Record, TailParameter, UriEntry};
use crate::storage::KeyValueStore;
use crate::store::EntityStore;

/// True iff agent, port or uri is unset
pub fn is_draft(combination: &Combination) -> bool {
    combination.agent_id.is_none() || combination.port_id.is_none() || combination.uri_id.is_none()
}

/// Check a combination before it is persisted
pub fn validate_for_save(combination: &Combination) -> Result<()> {
    if combination.title.trim().is_empty() {
        return Err(SwitchError::Validation("title required".to_string()));
    }
    Ok(())
}

/// A combination with its references looked up
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedCombination {
    pub agent: Option<Agent>,
    pub port: Option<Port>,
    pub uri: Option<UriEntry>,
    /// Resolvable tail parameters, in the combination's order
    pub tail_parameters: Vec<TailParameter>,
    /// Resolvable OPTY parameters, in the combination's order
    pub opty_parameters: Vec<OptyParameter>,
}

/// Look up every reference of `combination`; unresolvable ids are dropped
pub fn resolve_references<S: KeyValueStore>(
    combination: &Combination,
    store: &EntityStore<S>,
) -> Result<ResolvedCombination> {
    let agent = lookup(combination, "agent", combination.agent_id.as_deref(), |id| {
        store.agent_by_id(id)
    })?;
    let port = lookup(combination, "port", combination.port_id.as_deref(), |id| {
        store.port_by_id(id)
    })?;
    let uri = lookup(combination, "uri", combination.uri_id.as_deref(), |id| {
        store.uri_by_id(id)
    })?;

    let tail_all = store.all_tail_parameters()?;
    let tail_parameters = pick(combination, &combination.tail_parameter_ids, &tail_all);

    let opty_all = store.all_opty_parameters()?;
    let opty_parameters = pick(combination, &combination.opty_parameter_ids, &opty_all);

    Ok(ResolvedCombination {
        agent,
        port,
        uri,
        tail_parameters,
        opty_parameters,
    })
}

fn lookup<T, F>(
    combination: &Combination,
    field: &str,
    id: Option<&str>,
    find: F,
) -> Result<Option<T>>
where
    F: FnOnce(&str) -> Result<Option<T>>,
{
    let Some(id) = id else {
        return Ok(None);
    };
    let found = find(id)?;
    if found.is_none() {
        warn!(combination = %combination.id, field, id, "dangling reference");
    }
    Ok(found)
}

fn pick<T: Record>(combination: &Combination, ids: &[String], all: &[T]) -> Vec<T> {
    ids.iter()
        .filter_map(|id| {
            let found = all.iter().find(|item| item.id() == id.as_str()).cloned();
            if found.is_none() {
                warn!(combination = %combination.id, id = %id, "dangling parameter reference");
            }
            found
        })
        .collect()
}
