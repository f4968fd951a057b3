/**
 * model module
 * Record types for the switchboard catalogue
 */

pub mod entities;
pub mod kind;

pub use entities::{
    generate_id, Agent, AgentUpdate, Combination, CombinationUpdate, NewAgent, NewCombination,
    NewOptyParameter, NewPort, NewTailParameter, NewUri, OptyParameter, OptyParameterUpdate, Port,
    PortUpdate, Record, TailParameter, TailParameterUpdate, UriEntry, UriUpdate,
};
pub use kind::{Entity, EntityKind, NewEntity};
