//! Recompute ordering and circular dependency detection.
//!
//! When a cell changes, every cell that (transitively) depends on it must be
//! recomputed, and each one only after everything it depends on. A
//! depth-first walk over direct dependents, inserting each cell at the front
//! of the result once all its dependents are done, yields exactly that order.
//! Reaching the cell a walk started from means the new edges closed a loop.
//! The walk keeps its own stack, so long chains do not recurse.

use log::trace;
use std::collections::HashSet;
use std::collections::VecDeque;
use thiserror::Error;

use super::deps::DependencyGraph;

/// A change would make `cell` depend on itself, directly or indirectly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("circular dependency through cell {cell}")]
pub struct CircularDependency {
    pub cell: String,
}

/// Order in which `names` and everything depending on them must be
/// recomputed. Each cell appears once, before all of its dependents.
pub fn cells_to_recalculate<S: AsRef<str>>(
    graph: &DependencyGraph,
    names: &[S],
) -> Result<Vec<String>, CircularDependency> {
    let mut visited = HashSet::new();
    let mut order = VecDeque::new();

    for name in names {
        let name = name.as_ref();
        if !visited.contains(name) {
            visit(graph, name, &mut visited, &mut order)?;
        }
    }

    Ok(order.into())
}

/// Recompute order for a single changed cell; `start` is always first.
pub fn recalc_order(graph: &DependencyGraph, start: &str) -> Result<Vec<String>, CircularDependency> {
    cells_to_recalculate(graph, &[start])
}

// Depth-first walk from `start` with an explicit stack of (cell, unvisited
// dependents) frames. A cell is put at the front of `order` once every one of
// its dependents has been finished.
fn visit<'g>(
    graph: &'g DependencyGraph,
    start: &'g str,
    visited: &mut HashSet<&'g str>,
    order: &mut VecDeque<String>,
) -> Result<(), CircularDependency> {
    trace!("recalc visit {}", start);
    visited.insert(start);
    let mut stack = vec![(start, graph.dependents(start))];

    while let Some((current, pending)) = stack.last_mut() {
        match pending.next() {
            Some(dependent) if dependent == start => {
                return Err(CircularDependency {
                    cell: start.to_string(),
                });
            }
            Some(dependent) => {
                if visited.insert(dependent) {
                    trace!("recalc visit {}", dependent);
                    stack.push((dependent, graph.dependents(dependent)));
                }
            }
            None => {
                let finished = current.to_string();
                stack.pop();
                order.push_front(finished);
            }
        }
    }

    Ok(())
}
