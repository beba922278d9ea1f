use super::Spreadsheet;
use crate::error::{Result, SheetError};
use cellflow_engine::engine::{
    CellContent, CellValue, Formula, FormulaFormatError, cells_to_recalculate, recalc_order,
};
use log::{debug, trace};

impl Spreadsheet {
    /// Normalize `name` and check it against the name grammar and validator.
    pub(crate) fn resolve_name(&self, name: &str) -> Result<String> {
        self.options
            .rules
            .resolve(name)
            .ok_or_else(|| SheetError::InvalidName(name.to_string()))
    }

    /// Set a cell from its literal form and return the recompute order.
    ///
    /// - A finite number becomes a number cell
    /// - `=` followed by a formula becomes a formula cell
    /// - The empty string clears the cell
    /// - Anything else is stored as text
    ///
    /// The order starts with the (normalized) name and lists every cell that
    /// depends on it, directly or indirectly, each after all of its dependees.
    /// On any error the sheet is left unchanged.
    pub fn set_contents_of_cell(&mut self, name: &str, literal: &str) -> Result<Vec<String>> {
        let name = self.resolve_name(name)?;
        let content = CellContent::parse(literal, &self.options.rules)?;
        self.commit(name, content)
    }

    /// Set a cell to already-built content.
    ///
    /// Formula variables are re-read through this sheet's
    /// [`NameRules`](cellflow_engine::engine::NameRules), exactly as if the
    /// formula had been given as a literal. Text starting with `=` and
    /// non-finite numbers are rejected, since neither has a literal form.
    pub fn set_cell_contents(&mut self, name: &str, content: CellContent) -> Result<Vec<String>> {
        let name = self.resolve_name(name)?;
        let content = self.conform(content)?;
        self.commit(name, content)
    }

    fn conform(&self, content: CellContent) -> Result<CellContent> {
        match content {
            CellContent::Formula(formula) => {
                let formula = Formula::with_rules(&formula.to_string(), &self.options.rules)?;
                Ok(CellContent::Formula(formula))
            }
            CellContent::Text(text) if text.starts_with('=') => Err(FormulaFormatError::new(
                format!("text '{}' would read back as a formula", text),
            )
            .into()),
            CellContent::Number(n) if !n.is_finite() => {
                Err(FormulaFormatError::new(format!("number {} is not finite", n)).into())
            }
            other => Ok(other),
        }
    }

    fn commit(&mut self, name: String, content: CellContent) -> Result<Vec<String>> {
        // Snapshot for rollback.
        let saved = self.graph.save_dependees(&name);

        match &content {
            CellContent::Formula(formula) => self.graph.replace_dependees(&name, formula.variables()),
            CellContent::Number(_) | CellContent::Text(_) => {
                self.graph.replace_dependees(&name, std::iter::empty::<&str>())
            }
        }
        let old_content = self.cells.set_content(&name, content);

        let order = match recalc_order(&self.graph, &name) {
            Ok(order) => order,
            Err(err) => {
                debug!("circular dependency through {}, rolling back", name);
                self.graph.restore_dependees(&saved);
                self.cells.restore(&name, old_content);
                return Err(err.into());
            }
        };

        self.recalculate(&order);
        self.modified = true;
        debug!("set {}: {} cell(s) recalculated", name, order.len());
        Ok(order)
    }

    /// Re-evaluate `order` front to back, reading earlier results from the cache.
    pub(crate) fn recalculate(&mut self, order: &[String]) {
        for name in order {
            if self.cells.content(name).is_none() {
                self.values.remove(name);
                continue;
            }
            let values = &self.values;
            let value = self
                .cells
                .value(name, |var| values.get(var).and_then(CellValue::as_number));
            trace!("recalc {} = {:?}", name, value);
            self.values.insert(name.clone(), value);
        }
    }

    /// Contents of a cell: number, text or formula. Empty cells read as empty text.
    pub fn cell_contents(&self, name: &str) -> Result<CellContent> {
        let name = self.resolve_name(name)?;
        Ok(self
            .cells
            .content(&name)
            .cloned()
            .unwrap_or_else(|| CellContent::Text(String::new())))
    }

    /// Value of a cell: number, text or formula error. Empty cells read as empty text.
    pub fn cell_value(&self, name: &str) -> Result<CellValue> {
        let name = self.resolve_name(name)?;
        Ok(self
            .values
            .get(&name)
            .cloned()
            .unwrap_or_else(|| CellValue::Text(String::new())))
    }

    /// Names of all non-empty cells, sorted.
    pub fn nonempty_cells(&self) -> impl Iterator<Item = &str> + '_ {
        self.cells.names()
    }

    /// Cells whose formulas reference `name` directly.
    pub fn direct_dependents(&self, name: &str) -> Result<Vec<String>> {
        let name = self.resolve_name(name)?;
        Ok(self.graph.dependents(&name).map(str::to_string).collect())
    }

    /// Recompute order for several changed cells at once.
    pub fn cells_to_recalculate<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<String>> {
        let names = names
            .iter()
            .map(|name| self.resolve_name(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(cells_to_recalculate(&self.graph, &names)?)
    }
}
