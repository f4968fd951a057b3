// transfer/report.rs - Per-kind results of conflict detection and import

use serde::{Deserialize, Serialize};

use crate::model::EntityKind;

/// One value per entity kind, serialized under the snapshot collection names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerKind<T> {
    pub agents: T,
    pub ports: T,
    pub uris: T,
    pub tail_parameters: T,
    pub opty_parameters: T,
    pub combinations: T,
}

impl<T> PerKind<T> {
    pub fn get(&self, kind: EntityKind) -> &T {
        match kind {
            EntityKind::Agent => &self.agents,
            EntityKind::Port => &self.ports,
            EntityKind::Uri => &self.uris,
            EntityKind::TailParameter => &self.tail_parameters,
            EntityKind::OptyParameter => &self.opty_parameters,
            EntityKind::Combination => &self.combinations,
        }
    }

    pub fn get_mut(&mut self, kind: EntityKind) -> &mut T {
        match kind {
            EntityKind::Agent => &mut self.agents,
            EntityKind::Port => &mut self.ports,
            EntityKind::Uri => &mut self.uris,
            EntityKind::TailParameter => &mut self.tail_parameters,
            EntityKind::OptyParameter => &mut self.opty_parameters,
            EntityKind::Combination => &mut self.combinations,
        }
    }

    /// Entries in export/import order
    pub fn iter(&self) -> impl Iterator<Item = (EntityKind, &T)> {
        EntityKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}

/// Ids whose incoming content differs from the stored record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub has_conflicts: bool,
    pub conflicts: PerKind<Vec<String>>,
}

impl ConflictReport {
    pub fn from_conflicts(conflicts: PerKind<Vec<String>>) -> Self {
        let has_conflicts = conflicts.iter().any(|(_, ids)| !ids.is_empty());
        ConflictReport {
            has_conflicts,
            conflicts,
        }
    }

    pub fn conflict_count(&self) -> usize {
        self.conflicts.iter().map(|(_, ids)| ids.len()).sum()
    }
}

/// What happened to the incoming records of one collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportCounts {
    /// New ids added
    pub inserted: usize,
    /// Same id, identical content
    pub unchanged: usize,
    /// Conflicts left as stored (overwrite off)
    pub skipped: usize,
    /// Conflicts replaced by the incoming record (overwrite on)
    pub overwritten: usize,
}

impl ImportCounts {
    pub fn changed(&self) -> bool {
        self.inserted > 0 || self.overwritten > 0
    }
}

pub type ImportReport = PerKind<ImportCounts>;

impl ImportReport {
    pub fn total(&self) -> ImportCounts {
        self.iter().fold(ImportCounts::default(), |acc, (_, c)| ImportCounts {
            inserted: acc.inserted + c.inserted,
            unchanged: acc.unchanged + c.unchanged,
            skipped: acc.skipped + c.skipped,
            overwritten: acc.overwritten + c.overwritten,
        })
    }
}
