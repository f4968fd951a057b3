/**
 * store module
 * Typed CRUD over the six catalogue collections
 *
 * Collections (one key each in the backing KeyValueStore):
 * - agents          (caller-chosen ids, collision checked)
 * - ports, uris, tailParameters, optyParameters (generated ids)
 * - combinations    (generated ids, timestamps, validated before save)
 *
 * Deletes never cascade: combinations may keep dangling references.
 * No operation spans two collections atomically.
 */

mod collection;
pub mod session;

pub use session::Navigation;

use chrono::Utc;
use tracing::info;

use crate::errors::{Result, SwitchError};
use crate::model::{
    generate_id, Agent, AgentUpdate, Combination, CombinationUpdate, Entity, EntityKind,
    NewAgent, NewCombination, NewEntity, NewOptyParameter, NewPort, NewTailParameter, NewUri,
    OptyParameter, OptyParameterUpdate, Port, PortUpdate, TailParameter, TailParameterUpdate,
    UriEntry, UriUpdate,
};
use crate::storage::KeyValueStore;
use crate::validator;

/// Entity store over a key-value backend
pub struct EntityStore<S: KeyValueStore> {
    kv: S,
}

impl<S: KeyValueStore> EntityStore<S> {
    pub fn new(kv: S) -> Self {
        EntityStore { kv }
    }

    /// Backing key-value store
    pub fn backend(&self) -> &S {
        &self.kv
    }

    // ========================================================================
    // Agents
    // ========================================================================

    pub fn all_agents(&self) -> Result<Vec<Agent>> {
        self.all()
    }

    pub fn agent_by_id(&self, id: &str) -> Result<Option<Agent>> {
        self.get(id)
    }

    /// Create an agent with its caller-supplied id
    ///
    /// # Errors
    /// `DuplicateId` if an agent with that id already exists
    pub fn create_agent(&self, new: NewAgent) -> Result<Agent> {
        if new.id.trim().is_empty() {
            return Err(SwitchError::Validation("agent id required".to_string()));
        }
        self.insert(new)
    }

    /// Update an agent, optionally renaming its id
    ///
    /// # Errors
    /// - `NotFound` if `id` does not exist
    /// - `Validation` if the new id is blank
    /// - `DuplicateId` if the rename target is taken by another agent
    pub fn update_agent(&self, id: &str, update: AgentUpdate) -> Result<Agent> {
        self.modify(id, |agent: &mut Agent, others| {
            if let Some(new_id) = update.id.as_deref() {
                if new_id.trim().is_empty() {
                    return Err(SwitchError::Validation("agent id required".to_string()));
                }
                if new_id != agent.id && others.iter().any(|a| a.id == new_id) {
                    return Err(SwitchError::duplicate(EntityKind::Agent, new_id));
                }
            }
            agent.apply(update);
            Ok(())
        })
    }

    pub fn delete_agent(&self, id: &str) -> Result<()> {
        self.delete::<Agent>(id)
    }

    // ========================================================================
    // Ports
    // ========================================================================

    pub fn all_ports(&self) -> Result<Vec<Port>> {
        self.all()
    }

    pub fn port_by_id(&self, id: &str) -> Result<Option<Port>> {
        self.get(id)
    }

    pub fn create_port(&self, new: NewPort) -> Result<Port> {
        self.insert(Port {
            id: generate_id(),
            port: new.port,
            description: new.description,
        })
    }

    pub fn update_port(&self, id: &str, update: PortUpdate) -> Result<Port> {
        self.modify(id, |port: &mut Port, _| {
            port.apply(update);
            Ok(())
        })
    }

    pub fn delete_port(&self, id: &str) -> Result<()> {
        self.delete::<Port>(id)
    }

    // ========================================================================
    // URIs
    // ========================================================================

    pub fn all_uris(&self) -> Result<Vec<UriEntry>> {
        self.all()
    }

    pub fn uri_by_id(&self, id: &str) -> Result<Option<UriEntry>> {
        self.get(id)
    }

    pub fn create_uri(&self, new: NewUri) -> Result<UriEntry> {
        self.insert(UriEntry {
            id: generate_id(),
            uri: new.uri,
            description: new.description,
        })
    }

    pub fn update_uri(&self, id: &str, update: UriUpdate) -> Result<UriEntry> {
        self.modify(id, |uri: &mut UriEntry, _| {
            uri.apply(update);
            Ok(())
        })
    }

    pub fn delete_uri(&self, id: &str) -> Result<()> {
        self.delete::<UriEntry>(id)
    }

    // ========================================================================
    // Tail parameters
    // ========================================================================

    pub fn all_tail_parameters(&self) -> Result<Vec<TailParameter>> {
        self.all()
    }

    pub fn tail_parameter_by_id(&self, id: &str) -> Result<Option<TailParameter>> {
        self.get(id)
    }

    /// First tail parameter with the given key
    pub fn tail_parameter_by_key(&self, key: &str) -> Result<Option<TailParameter>> {
        Ok(self
            .all_tail_parameters()?
            .into_iter()
            .find(|p| p.key == key))
    }

    pub fn create_tail_parameter(&self, new: NewTailParameter) -> Result<TailParameter> {
        self.insert(TailParameter {
            id: generate_id(),
            key: new.key,
            value: new.value,
        })
    }

    pub fn update_tail_parameter(
        &self,
        id: &str,
        update: TailParameterUpdate,
    ) -> Result<TailParameter> {
        self.modify(id, |param: &mut TailParameter, _| {
            param.apply(update);
            Ok(())
        })
    }

    pub fn delete_tail_parameter(&self, id: &str) -> Result<()> {
        self.delete::<TailParameter>(id)
    }

    // ========================================================================
    // OPTY parameters
    // ========================================================================

    pub fn all_opty_parameters(&self) -> Result<Vec<OptyParameter>> {
        self.all()
    }

    pub fn opty_parameter_by_id(&self, id: &str) -> Result<Option<OptyParameter>> {
        self.get(id)
    }

    /// First OPTY parameter with the given key
    pub fn opty_parameter_by_key(&self, key: &str) -> Result<Option<OptyParameter>> {
        Ok(self
            .all_opty_parameters()?
            .into_iter()
            .find(|p| p.key == key))
    }

    pub fn create_opty_parameter(&self, new: NewOptyParameter) -> Result<OptyParameter> {
        self.insert(OptyParameter {
            id: generate_id(),
            key: new.key,
            value: new.value,
        })
    }

    pub fn update_opty_parameter(
        &self,
        id: &str,
        update: OptyParameterUpdate,
    ) -> Result<OptyParameter> {
        self.modify(id, |param: &mut OptyParameter, _| {
            param.apply(update);
            Ok(())
        })
    }

    pub fn delete_opty_parameter(&self, id: &str) -> Result<()> {
        self.delete::<OptyParameter>(id)
    }

    // ========================================================================
    // Combinations
    // ========================================================================

    /// All combinations, drafts included
    pub fn all_combinations(&self) -> Result<Vec<Combination>> {
        self.all()
    }

    pub fn combination_by_id(&self, id: &str) -> Result<Option<Combination>> {
        self.get(id)
    }

    /// Create a combination (draft or complete)
    ///
    /// # Errors
    /// `Validation` if the title is blank
    pub fn create_combination(&self, new: NewCombination) -> Result<Combination> {
        let combination = Combination::from_new(new, Utc::now());
        validator::validate_for_save(&combination)?;
        self.insert(combination)
    }

    /// Update a combination; `updated_at` is refreshed, `created_at` kept
    ///
    /// # Errors
    /// - `NotFound` if `id` does not exist
    /// - `Validation` if the update blanks the title
    pub fn update_combination(&self, id: &str, update: CombinationUpdate) -> Result<Combination> {
        self.modify(id, |combination: &mut Combination, _| {
            combination.apply(update, Utc::now());
            validator::validate_for_save(combination)
        })
    }

    pub fn delete_combination(&self, id: &str) -> Result<()> {
        self.delete::<Combination>(id)
    }

    /// Duplicate a combination under a new id and a "(copy)" title
    ///
    /// # Errors
    /// `NotFound` if `id` does not exist
    pub fn copy_combination(&self, id: &str) -> Result<Combination> {
        let original = self
            .combination_by_id(id)?
            .ok_or_else(|| SwitchError::not_found(EntityKind::Combination, id))?;

        let now = Utc::now();
        let copied = Combination {
            id: generate_id(),
            title: format!("{} (copy)", original.title),
            created_at: now,
            updated_at: now,
            ..original
        };
        validator::validate_for_save(&copied)?;

        info!(source = id, copy = %copied.id, "combination copied");
        self.insert(copied)
    }

    // ========================================================================
    // Kind dispatch
    // ========================================================================

    /// Create a record of whichever kind the payload carries
    pub fn create(&self, new: NewEntity) -> Result<Entity> {
        Ok(match new {
            NewEntity::Agent(n) => Entity::Agent(self.create_agent(n)?),
            NewEntity::Port(n) => Entity::Port(self.create_port(n)?),
            NewEntity::Uri(n) => Entity::Uri(self.create_uri(n)?),
            NewEntity::TailParameter(n) => Entity::TailParameter(self.create_tail_parameter(n)?),
            NewEntity::OptyParameter(n) => Entity::OptyParameter(self.create_opty_parameter(n)?),
            NewEntity::Combination(n) => Entity::Combination(self.create_combination(n)?),
        })
    }

    /// Delete a record by kind and id (idempotent)
    pub fn delete_kind(&self, kind: EntityKind, id: &str) -> Result<()> {
        match kind {
            EntityKind::Agent => self.delete_agent(id),
            EntityKind::Port => self.delete_port(id),
            EntityKind::Uri => self.delete_uri(id),
            EntityKind::TailParameter => self.delete_tail_parameter(id),
            EntityKind::OptyParameter => self.delete_opty_parameter(id),
            EntityKind::Combination => self.delete_combination(id),
        }
    }
}
