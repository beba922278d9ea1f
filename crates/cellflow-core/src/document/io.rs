use super::{SheetOptions, Spreadsheet};
use crate::error::{Result, SheetError};
use crate::storage::{Snapshot, read_snapshot, read_version, write_snapshot};
use log::debug;
use std::path::{Path, PathBuf};

impl Spreadsheet {
    /// Literal contents of every non-empty cell, tagged with this sheet's version.
    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot::new(self.options.version.clone());
        for (name, content) in self.cells.iter() {
            snapshot.insert(name, content.to_literal());
        }
        snapshot
    }

    /// Rebuild a sheet from a snapshot.
    ///
    /// The snapshot's version must equal `options.version`. Every entry goes
    /// through [`Spreadsheet::set_contents_of_cell`], so bad names, malformed
    /// formulas and cycles are all reported.
    pub fn from_snapshot(snapshot: &Snapshot, options: SheetOptions) -> Result<Self> {
        if snapshot.version != options.version {
            return Err(SheetError::VersionMismatch {
                expected: options.version,
                found: snapshot.version.clone(),
            });
        }

        let mut sheet = Spreadsheet::with_options(options);
        for (name, cell) in &snapshot.cells {
            sheet
                .set_contents_of_cell(name, &cell.contents)
                .map_err(|err| match err {
                    SheetError::FormulaFormat(e) => SheetError::Snapshot {
                        name: name.clone(),
                        message: e.to_string(),
                    },
                    other => other,
                })?;
        }
        sheet.modified = false;
        debug!("loaded {} cell(s) from snapshot", snapshot.cells.len());
        Ok(sheet)
    }

    /// Save to `path` and remember it for [`Spreadsheet::save_file`].
    pub fn save(&mut self, path: &Path) -> Result<()> {
        write_snapshot(path, &self.snapshot())?;
        debug!("saved {} cell(s) to {}", self.cells.len(), path.display());
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Save to the current file path.
    /// Returns the path saved to.
    pub fn save_file(&mut self) -> Result<PathBuf> {
        let Some(path) = self.file_path.clone() else {
            return Err(SheetError::NoFilePath);
        };
        self.save(&path)?;
        Ok(path)
    }

    /// Load a sheet saved with [`Spreadsheet::save`].
    pub fn load(path: &Path, options: SheetOptions) -> Result<Self> {
        let snapshot = read_snapshot(path)?;
        let mut sheet = Spreadsheet::from_snapshot(&snapshot, options)?;
        sheet.file_path = Some(path.to_path_buf());
        Ok(sheet)
    }

    /// Version tag of a saved sheet, without loading its cells.
    pub fn saved_version(path: &Path) -> Result<String> {
        read_version(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellflow_engine::engine::{CellContent, CellValue};

    #[test]
    fn test_snapshot_literals() {
        let mut sheet = Spreadsheet::new();
        sheet.set_contents_of_cell("A1", "2.50").unwrap();
        sheet.set_contents_of_cell("B1", "label").unwrap();
        sheet.set_contents_of_cell("C1", "= A1 * 4").unwrap();

        let snapshot = sheet.snapshot();
        assert_eq!(snapshot.version, "default");
        assert_eq!(snapshot.get("A1"), Some("2.5"));
        assert_eq!(snapshot.get("B1"), Some("label"));
        assert_eq!(snapshot.get("C1"), Some("=A1*4"));
    }

    #[test]
    fn test_from_snapshot_rebuilds_values() {
        let mut snapshot = Snapshot::new("default");
        // Sorted load order sets A1 before its dependee B1.
        snapshot.insert("A1", "=B1+1");
        snapshot.insert("B1", "41");

        let sheet = Spreadsheet::from_snapshot(&snapshot, SheetOptions::new()).unwrap();
        assert_eq!(sheet.cell_value("A1").unwrap(), CellValue::Number(42.0));
        assert!(!sheet.modified());
    }

    #[test]
    fn test_from_snapshot_version_mismatch() {
        let snapshot = Snapshot::new("v2");
        let result = Spreadsheet::from_snapshot(&snapshot, SheetOptions::new().with_version("v1"));
        assert!(matches!(
            result,
            Err(SheetError::VersionMismatch { ref expected, ref found })
                if expected == "v1" && found == "v2"
        ));
    }

    #[test]
    fn test_from_snapshot_rejects_bad_entries() {
        let mut snapshot = Snapshot::new("default");
        snapshot.insert("A1", "=1+");
        assert!(matches!(
            Spreadsheet::from_snapshot(&snapshot, SheetOptions::new()),
            Err(SheetError::Snapshot { ref name, .. }) if name == "A1"
        ));

        let mut snapshot = Snapshot::new("default");
        snapshot.insert("1bad", "3");
        assert!(matches!(
            Spreadsheet::from_snapshot(&snapshot, SheetOptions::new()),
            Err(SheetError::InvalidName(_))
        ));

        let mut snapshot = Snapshot::new("default");
        snapshot.insert("A1", "=B1");
        snapshot.insert("B1", "=A1");
        assert!(matches!(
            Spreadsheet::from_snapshot(&snapshot, SheetOptions::new()),
            Err(SheetError::CircularDependency(_))
        ));
    }

    #[test]
    fn test_save_file_without_path() {
        let mut sheet = Spreadsheet::new();
        assert!(matches!(sheet.save_file(), Err(SheetError::NoFilePath)));
    }

    #[test]
    fn test_snapshot_round_trip_in_memory() {
        let mut sheet = Spreadsheet::new();
        sheet.set_contents_of_cell("x", "1e3").unwrap();
        sheet.set_contents_of_cell("y", "=x/8").unwrap();
        let copy = Spreadsheet::from_snapshot(&sheet.snapshot(), SheetOptions::new()).unwrap();
        assert_eq!(copy.cell_contents("x").unwrap(), CellContent::Number(1000.0));
        assert_eq!(copy.cell_value("y").unwrap(), CellValue::Number(125.0));
    }
}
