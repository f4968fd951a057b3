//! # Switchboard Core - impersonation catalogue runtime
//!
//! Support staff keep a catalogue of *agents* (users to impersonate),
//! *ports*, *URIs* and query parameters, and assemble them into named
//! *combinations*. Applying a combination impersonates the agent on the
//! target application and redirects to a URL built from the rest.
//!
//! ## Core Principle
//!
//! **The catalogue is six JSON collections in a key-value store.** Every
//! operation reads a whole collection, changes it and writes it back. There
//! are no cross-collection transactions and deletes never cascade.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  validator   │   │   transfer   │   │ url_builder  │
//! │ draft, save, │   │ export, diff │   │ redirect URL │
//! │   resolve    │   │   , import   │   │              │
//! └──────┬───────┘   └──────┬───────┘   └──────────────┘
//!        └──────────┬───────┘
//!            ┌──────┴───────┐          ┌──────────────┐
//!            │ EntityStore  │          │    remote    │
//!            │ typed CRUD   │          │ HTTP clients │
//!            └──────┬───────┘          └──────────────┘
//!            ┌──────┴───────┐
//!            │KeyValueStore │  memory | JSON files
//!            └──────────────┘
//! ```

pub mod config;
pub mod errors;
pub mod model;
pub mod remote;
pub mod storage;
pub mod store;
pub mod transfer;
pub mod url_builder;
pub mod validator;

pub use config::{AddressBookSettings, HttpSettings, ImpersonationSettings, SwitchboardConfig};
pub use errors::{Result, SwitchError};
pub use model::{
    Agent, AgentUpdate, Combination, CombinationUpdate, Entity, EntityKind, NewAgent,
    NewCombination, NewEntity, NewOptyParameter, NewPort, NewTailParameter, NewUri,
    OptyParameter, OptyParameterUpdate, Port, PortUpdate, Record, TailParameter,
    TailParameterUpdate, UriEntry, UriUpdate,
};
pub use remote::{AddressBookClient, ImpersonationClient};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
pub use store::{EntityStore, Navigation};
pub use transfer::{
    detect_conflicts, export_snapshot, import_snapshot, read_snapshot_file, write_snapshot_file,
    ConflictReport, ImportCounts, ImportReport, Snapshot, SnapshotData, SNAPSHOT_VERSION,
};
pub use url_builder::{ParameterOverrides, QueryParameter};
pub use validator::{is_draft, resolve_references, validate_for_save, ResolvedCombination};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
