//! Conflict detection and merge of an incoming snapshot into the live store
//!
//! Per incoming record, matched by id within its kind:
//! - id absent from the store        -> inserted
//! - id present, same content        -> unchanged
//! - id present, different content   -> conflict: skipped, or overwritten
//!   when `overwrite` is set
//!
//! Collections are committed one at a time (agents, ports, uris,
//! tailParameters, optyParameters, combinations). A failure while committing
//! one collection leaves the earlier ones committed and is reported as
//! `PartialImport`.

use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::errors::{Result, SwitchError};
use crate::model::{Agent, Combination, EntityKind, OptyParameter, Port, TailParameter, UriEntry};
use crate::storage::KeyValueStore;
use crate::store::EntityStore;

use super::report::{ConflictReport, ImportCounts, ImportReport, PerKind};
use super::snapshot::{SnapshotCollection, SnapshotData};

/// Ids of incoming records that collide with a differently-valued stored record
pub fn detect_conflicts<S: KeyValueStore>(
    store: &EntityStore<S>,
    incoming: &SnapshotData,
) -> Result<ConflictReport> {
    let conflicts = PerKind {
        agents: conflicting_ids::<Agent, S>(store, incoming)?,
        ports: conflicting_ids::<Port, S>(store, incoming)?,
        uris: conflicting_ids::<UriEntry, S>(store, incoming)?,
        tail_parameters: conflicting_ids::<TailParameter, S>(store, incoming)?,
        opty_parameters: conflicting_ids::<OptyParameter, S>(store, incoming)?,
        combinations: conflicting_ids::<Combination, S>(store, incoming)?,
    };

    let report = ConflictReport::from_conflicts(conflicts);
    info!(
        conflicts = report.conflict_count(),
        "import conflict detection finished"
    );
    Ok(report)
}

fn conflicting_ids<R: SnapshotCollection, S: KeyValueStore>(
    store: &EntityStore<S>,
    incoming: &SnapshotData,
) -> Result<Vec<String>> {
    let existing = store.all::<R>()?;
    let by_id: HashMap<&str, &R> = existing.iter().map(|r| (r.id(), r)).collect();

    Ok(R::records(incoming)
        .iter()
        .filter(|record| {
            by_id
                .get(record.id())
                .is_some_and(|stored| !stored.same_content(record))
        })
        .map(|record| record.id().to_string())
        .collect())
}

/// Merge `incoming` into the store
///
/// # Errors
/// `PartialImport` naming the collection that failed to commit and the
/// collections committed before it
pub fn import_snapshot<S: KeyValueStore>(
    store: &EntityStore<S>,
    incoming: &SnapshotData,
    overwrite: bool,
) -> Result<ImportReport> {
    let mut report = ImportReport::default();
    let mut committed: Vec<EntityKind> = Vec::new();

    for kind in EntityKind::ALL {
        let outcome = match kind {
            EntityKind::Agent => merge_collection::<Agent, S>(store, incoming, overwrite),
            EntityKind::Port => merge_collection::<Port, S>(store, incoming, overwrite),
            EntityKind::Uri => merge_collection::<UriEntry, S>(store, incoming, overwrite),
            EntityKind::TailParameter => {
                merge_collection::<TailParameter, S>(store, incoming, overwrite)
            }
            EntityKind::OptyParameter => {
                merge_collection::<OptyParameter, S>(store, incoming, overwrite)
            }
            EntityKind::Combination => {
                merge_collection::<Combination, S>(store, incoming, overwrite)
            }
        };

        match outcome {
            Ok(counts) => {
                *report.get_mut(kind) = counts;
                committed.push(kind);
            }
            Err(e) => {
                warn!(%kind, error = %e, "import stopped, earlier collections stay committed");
                return Err(SwitchError::PartialImport {
                    failed: kind,
                    committed,
                    reason: e.to_string(),
                });
            }
        }
    }

    let total = report.total();
    info!(
        inserted = total.inserted,
        unchanged = total.unchanged,
        skipped = total.skipped,
        overwritten = total.overwritten,
        overwrite,
        "snapshot imported"
    );
    Ok(report)
}

fn merge_collection<R: SnapshotCollection, S: KeyValueStore>(
    store: &EntityStore<S>,
    incoming: &SnapshotData,
    overwrite: bool,
) -> Result<ImportCounts> {
    let mut records = store.all::<R>()?;
    let mut counts = ImportCounts::default();

    for record in R::records(incoming) {
        match records.iter().position(|r| r.id() == record.id()) {
            None => {
                records.push(record.clone());
                counts.inserted += 1;
            }
            Some(index) if records[index].same_content(record) => {
                counts.unchanged += 1;
            }
            Some(index) if overwrite => {
                debug!(kind = %R::KIND, id = record.id(), "overwriting conflicting record");
                records[index] = records[index].overwritten_by(record);
                counts.overwritten += 1;
            }
            Some(_) => {
                debug!(kind = %R::KIND, id = record.id(), "skipping conflicting record");
                counts.skipped += 1;
            }
        }
    }

    if counts.changed() {
        store.replace_all(&records)?;
    }
    Ok(counts)
}
