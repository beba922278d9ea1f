use cellflow_engine::engine::{CellStore, CellValue, DependencyGraph, NameRules};
use std::collections::HashMap;
use std::path::PathBuf;

/// Version tag used when none is configured.
pub const DEFAULT_VERSION: &str = "default";

/// Construction-time settings for a [`Spreadsheet`].
#[derive(Clone, Debug)]
pub struct SheetOptions {
    /// Normalizer and validator applied to every cell name and formula variable
    pub rules: NameRules,
    /// Version tag written to, and required from, snapshots
    pub version: String,
}

impl SheetOptions {
    pub fn new() -> Self {
        SheetOptions {
            rules: NameRules::default(),
            version: DEFAULT_VERSION.to_string(),
        }
    }

    pub fn with_normalizer<N>(mut self, normalize: N) -> Self
    where
        N: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.rules = self.rules.with_normalizer(normalize);
        self
    }

    pub fn with_validator<V>(mut self, validate: V) -> Self
    where
        V: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.rules = self.rules.with_validator(validate);
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// A spreadsheet: cell contents, the dependency graph between cells, and
/// the cached value of every non-empty cell.
///
/// All mutation goes through [`Spreadsheet::set_contents_of_cell`] (or
/// [`Spreadsheet::set_cell_contents`]), which keeps contents, edges and
/// values in sync and rolls back on a circular dependency. Callers sharing a
/// sheet across threads must serialize access themselves.
#[derive(Debug)]
pub struct Spreadsheet {
    pub(crate) cells: CellStore,
    pub(crate) graph: DependencyGraph,
    /// Evaluated value of each non-empty cell
    pub(crate) values: HashMap<String, CellValue>,
    pub(crate) options: SheetOptions,
    /// Where the sheet was last loaded from or saved to
    pub(crate) file_path: Option<PathBuf>,
    /// Whether the sheet changed since it was created, loaded or saved
    pub(crate) modified: bool,
}

impl Spreadsheet {
    /// Create an empty sheet with default name rules and version.
    pub fn new() -> Self {
        Self::with_options(SheetOptions::default())
    }

    pub fn with_options(options: SheetOptions) -> Self {
        Spreadsheet {
            cells: CellStore::new(),
            graph: DependencyGraph::new(),
            values: HashMap::new(),
            options,
            file_path: None,
            modified: false,
        }
    }

    pub fn options(&self) -> &SheetOptions {
        &self.options
    }

    pub fn version(&self) -> &str {
        &self.options.version
    }

    /// Read-only view of the dependency graph.
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn modified(&self) -> bool {
        self.modified
    }

    pub fn file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }
}

impl Default for Spreadsheet {
    fn default() -> Self {
        Self::new()
    }
}
