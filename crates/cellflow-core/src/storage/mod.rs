//! Storage module for the snapshot interchange format

mod parser;
mod snapshot;
mod writer;

pub use parser::{parse_snapshot, read_snapshot, read_version};
pub use snapshot::{Snapshot, SnapshotCell};
pub use writer::{write_snapshot, write_snapshot_content};
