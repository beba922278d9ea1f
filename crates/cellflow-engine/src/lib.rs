//! cellflow_engine - Incremental cell recalculation engine.

pub mod engine;

#[cfg(test)]
mod tests {
    use crate::engine::*;
    use std::collections::HashMap;

    /// Minimal driver over the engine pieces: set a cell, rewire its edges,
    /// and compute the recompute order.
    fn set(
        graph: &mut DependencyGraph,
        store: &mut CellStore,
        name: &str,
        literal: &str,
    ) -> Result<Vec<String>, CircularDependency> {
        let content = CellContent::parse(literal, &NameRules::default()).unwrap();
        let saved = graph.save_dependees(name);
        let new_edges: Vec<String> = match &content {
            CellContent::Formula(f) => f.variables().map(str::to_string).collect(),
            _ => Vec::new(),
        };
        graph.replace_dependees(name, &new_edges);
        let old = store.set_content(name, content);
        match recalc_order(graph, name) {
            Ok(order) => Ok(order),
            Err(e) => {
                graph.restore_dependees(&saved);
                store.restore(name, old);
                Err(e)
            }
        }
    }

    fn values(store: &CellStore, order: &[String], cache: &mut HashMap<String, CellValue>) {
        for name in order {
            let value = store.value(name, |v| cache.get(v).and_then(CellValue::as_number));
            cache.insert(name.clone(), value);
        }
    }

    #[test]
    fn test_evaluate_scenario_194() {
        let f = Formula::new("2+3*5+(3+4*8)*5+2").unwrap();
        assert_eq!(f.evaluate(|_| None), Ok(194.0));
    }

    #[test]
    fn test_recompute_order_scenario() {
        let mut graph = DependencyGraph::new();
        let mut store = CellStore::new();
        set(&mut graph, &mut store, "A1", "5").unwrap();
        set(&mut graph, &mut store, "B1", "=A1+2").unwrap();
        set(&mut graph, &mut store, "C1", "=A1+B1").unwrap();

        let order = set(&mut graph, &mut store, "A1", "6").unwrap();
        assert_eq!(order[0], "A1");
        let b = order.iter().position(|n| n == "B1").unwrap();
        let c = order.iter().position(|n| n == "C1").unwrap();
        assert!(b < c);

        let mut cache = HashMap::new();
        values(&store, &order, &mut cache);
        assert_eq!(cache["C1"], CellValue::Number(14.0));
    }

    #[test]
    fn test_cycle_rolls_back_content_and_edges() {
        let mut graph = DependencyGraph::new();
        let mut store = CellStore::new();
        set(&mut graph, &mut store, "A1", "1").unwrap();
        set(&mut graph, &mut store, "B1", "=A1*2").unwrap();
        set(&mut graph, &mut store, "C1", "=B1+1").unwrap();

        assert!(set(&mut graph, &mut store, "A1", "=C1").is_err());
        assert_eq!(store.content("A1"), Some(&CellContent::Number(1.0)));
        assert!(!graph.has_dependees("A1"));
        assert_eq!(graph.size(), 2);
    }

    #[test]
    fn test_text_cell_reads_as_unknown_variable() {
        let mut graph = DependencyGraph::new();
        let mut store = CellStore::new();
        set(&mut graph, &mut store, "A1", "hello").unwrap();
        let order = set(&mut graph, &mut store, "B1", "=A1+1").unwrap();

        let mut cache = HashMap::new();
        values(&store, &["A1".to_string()], &mut cache);
        values(&store, &order, &mut cache);
        assert!(cache["B1"].is_error());
    }
}
