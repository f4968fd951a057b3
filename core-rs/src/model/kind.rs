//! Entity kind tags and the kind-dispatched create payload

use serde::{Deserialize, Serialize};
use std::fmt;

use super::entities::{
    Agent, Combination, NewAgent, NewCombination, NewOptyParameter, NewPort, NewTailParameter,
    NewUri, OptyParameter, Port, TailParameter, UriEntry,
};

/// The six persisted record kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Agent,
    Port,
    Uri,
    TailParameter,
    OptyParameter,
    Combination,
}

impl EntityKind {
    /// All kinds, in the order collections are exported and imported.
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Agent,
        EntityKind::Port,
        EntityKind::Uri,
        EntityKind::TailParameter,
        EntityKind::OptyParameter,
        EntityKind::Combination,
    ];

    /// Key of the collection in the key-value store (and in snapshot `data`)
    pub fn storage_key(&self) -> &'static str {
        match self {
            EntityKind::Agent => "agents",
            EntityKind::Port => "ports",
            EntityKind::Uri => "uris",
            EntityKind::TailParameter => "tailParameters",
            EntityKind::OptyParameter => "optyParameters",
            EntityKind::Combination => "combinations",
        }
    }

    /// Whether ids of this kind are supplied by the caller instead of generated
    pub fn has_caller_ids(&self) -> bool {
        matches!(self, EntityKind::Agent)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Agent => "agent",
            EntityKind::Port => "port",
            EntityKind::Uri => "uri",
            EntityKind::TailParameter => "tail parameter",
            EntityKind::OptyParameter => "opty parameter",
            EntityKind::Combination => "combination",
        };
        f.write_str(name)
    }
}

/// Creation payload for any kind
#[derive(Debug, Clone)]
pub enum NewEntity {
    Agent(NewAgent),
    Port(NewPort),
    Uri(NewUri),
    TailParameter(NewTailParameter),
    OptyParameter(NewOptyParameter),
    Combination(NewCombination),
}

impl NewEntity {
    pub fn kind(&self) -> EntityKind {
        match self {
            NewEntity::Agent(_) => EntityKind::Agent,
            NewEntity::Port(_) => EntityKind::Port,
            NewEntity::Uri(_) => EntityKind::Uri,
            NewEntity::TailParameter(_) => EntityKind::TailParameter,
            NewEntity::OptyParameter(_) => EntityKind::OptyParameter,
            NewEntity::Combination(_) => EntityKind::Combination,
        }
    }
}

/// A stored record of any kind
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Agent(Agent),
    Port(Port),
    Uri(UriEntry),
    TailParameter(TailParameter),
    OptyParameter(OptyParameter),
    Combination(Combination),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Agent(_) => EntityKind::Agent,
            Entity::Port(_) => EntityKind::Port,
            Entity::Uri(_) => EntityKind::Uri,
            Entity::TailParameter(_) => EntityKind::TailParameter,
            Entity::OptyParameter(_) => EntityKind::OptyParameter,
            Entity::Combination(_) => EntityKind::Combination,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Entity::Agent(a) => &a.id,
            Entity::Port(p) => &p.id,
            Entity::Uri(u) => &u.id,
            Entity::TailParameter(p) => &p.id,
            Entity::OptyParameter(p) => &p.id,
            Entity::Combination(c) => &c.id,
        }
    }
}
