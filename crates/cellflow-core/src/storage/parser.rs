//! Reader for snapshot files

use crate::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::Snapshot;

/// Read and decode a snapshot file
pub fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let content = fs::read_to_string(path)?;
    parse_snapshot(&content)
}

/// Decode a snapshot from a JSON string
pub fn parse_snapshot(content: &str) -> Result<Snapshot> {
    Ok(serde_json::from_str(content)?)
}

/// Read only the version tag of a snapshot file
pub fn read_version(path: &Path) -> Result<String> {
    #[derive(Deserialize)]
    struct VersionOnly {
        version: String,
    }

    let content = fs::read_to_string(path)?;
    let header: VersionOnly = serde_json::from_str(&content)?;
    Ok(header.version)
}
