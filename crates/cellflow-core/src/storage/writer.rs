//! Writer for snapshot files

use crate::error::Result;
use std::fs;
use std::path::Path;

use super::Snapshot;

/// Write a snapshot to a file
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let content = write_snapshot_content(snapshot)?;
    fs::write(path, content)?;
    Ok(())
}

/// Encode a snapshot as pretty-printed JSON
pub fn write_snapshot_content(snapshot: &Snapshot) -> Result<String> {
    let mut content = serde_json::to_string_pretty(snapshot)?;
    content.push('\n');
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::parse_snapshot;

    #[test]
    fn test_write_cells() {
        let mut snapshot = Snapshot::new("1.0");
        snapshot.insert("A1", "42");
        snapshot.insert("B1", "hello");
        snapshot.insert("C1", "=A1+1");
        let content = write_snapshot_content(&snapshot).unwrap();
        assert!(content.contains("\"version\": \"1.0\""));
        assert!(content.contains("\"contents\": \"=A1+1\""));
        assert_eq!(parse_snapshot(&content).unwrap(), snapshot);
    }

    #[test]
    fn test_sorted_output() {
        let mut snapshot = Snapshot::new("v");
        snapshot.insert("B2", "3");
        snapshot.insert("A1", "1");
        snapshot.insert("B1", "2");
        let content = write_snapshot_content(&snapshot).unwrap();
        let a1 = content.find("\"A1\"").unwrap();
        let b1 = content.find("\"B1\"").unwrap();
        let b2 = content.find("\"B2\"").unwrap();
        assert!(a1 < b1 && b1 < b2);
    }
}
