//! Snapshot model: cell name -> literal content, plus a version tag.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One cell in a snapshot. `contents` is the literal form: a number's string
/// form, text verbatim, or `=` followed by a canonical formula.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotCell {
    pub contents: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: String,
    #[serde(default)]
    pub cells: BTreeMap<String, SnapshotCell>,
}

impl Snapshot {
    pub fn new(version: impl Into<String>) -> Snapshot {
        Snapshot {
            version: version.into(),
            cells: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, contents: impl Into<String>) {
        self.cells.insert(
            name.into(),
            SnapshotCell {
                contents: contents.into(),
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cells.get(name).map(|cell| cell.contents.as_str())
    }
}
