/**
 * transfer module
 * Snapshot export, import conflict detection and merge
 */

pub mod merge;
pub mod report;
pub mod snapshot;

pub use merge::{detect_conflicts, import_snapshot};
pub use report::{ConflictReport, ImportCounts, ImportReport, PerKind};
pub use snapshot::{
    export_snapshot, read_snapshot_file, write_snapshot_file, Snapshot, SnapshotCollection,
    SnapshotData, SNAPSHOT_VERSION,
};
