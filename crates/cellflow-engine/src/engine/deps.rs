//! Dependency graph between named cells.
//!
//! Stores ordered pairs `(s, t)` meaning "`t` depends on `s`". Using the
//! terms of the sheet:
//!
//! - `dependents(s)`: every `t` with `(s, t)` in the graph (cells that use `s`)
//! - `dependees(t)`: every `s` with `(s, t)` in the graph (cells `t` uses)
//!
//! Both directions are kept in one structure and only ever changed through
//! [`DependencyGraph::link`] / [`DependencyGraph::unlink`], so they cannot
//! drift apart. Names do not need to exist as cells; querying an unknown name
//! yields an empty result.
//!
//! For example, with `{("a","b"), ("a","c"), ("b","d"), ("d","d")}`:
//!
//! ```text
//! dependents("a") = {"b", "c"}     dependees("a") = {}
//! dependents("b") = {"d"}          dependees("b") = {"a"}
//! dependents("c") = {}             dependees("c") = {"a"}
//! dependents("d") = {"d"}          dependees("d") = {"b", "d"}
//! ```

use indexmap::{IndexMap, IndexSet};

type Adjacency = IndexMap<String, IndexSet<String>>;

/// The dependees of one cell together with where that cell sat in each
/// dependee's dependent set. Taken by [`DependencyGraph::save_dependees`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedDependees {
    cell: String,
    slots: Vec<(String, usize)>,
}

#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    /// s -> every t that depends on s
    dependents: Adjacency,
    /// t -> every s that t depends on
    dependees: Adjacency,
    size: usize,
}

impl DependencyGraph {
    pub fn new() -> DependencyGraph {
        DependencyGraph::default()
    }

    /// Number of ordered pairs in the graph.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of things `s` depends on (the size of `dependees(s)`).
    pub fn dependee_count(&self, s: &str) -> usize {
        self.dependees.get(s).map_or(0, IndexSet::len)
    }

    pub fn has_dependents(&self, s: &str) -> bool {
        self.dependents.get(s).is_some_and(|set| !set.is_empty())
    }

    pub fn has_dependees(&self, s: &str) -> bool {
        self.dependees.get(s).is_some_and(|set| !set.is_empty())
    }

    /// Cells that depend on `s`, in insertion order.
    pub fn dependents(&self, s: &str) -> impl Iterator<Item = &str> + '_ {
        self.dependents
            .get(s)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Cells that `s` depends on, in insertion order.
    pub fn dependees(&self, s: &str) -> impl Iterator<Item = &str> + '_ {
        self.dependees
            .get(s)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    pub fn contains(&self, s: &str, t: &str) -> bool {
        self.dependents.get(s).is_some_and(|set| set.contains(t))
    }

    /// Add `(s, t)`. No-op if the pair is already present.
    pub fn add_dependency(&mut self, s: &str, t: &str) {
        self.link(s, t);
    }

    /// Remove `(s, t)`. No-op if the pair is absent.
    pub fn remove_dependency(&mut self, s: &str, t: &str) {
        self.unlink(s, t);
    }

    /// Replace every `(s, _)` pair with `(s, t)` for each `t` in `new_dependents`.
    pub fn replace_dependents<I, S>(&mut self, s: &str, new_dependents: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let old: Vec<String> = self.dependents(s).map(str::to_string).collect();
        for t in &old {
            self.unlink(s, t);
        }
        for t in new_dependents {
            self.link(s, t.as_ref());
        }
    }

    /// Replace every `(_, s)` pair with `(r, s)` for each `r` in `new_dependees`.
    pub fn replace_dependees<I, S>(&mut self, s: &str, new_dependees: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let old: Vec<String> = self.dependees(s).map(str::to_string).collect();
        for r in &old {
            self.unlink(r, s);
        }
        for r in new_dependees {
            self.link(r.as_ref(), s);
        }
    }

    /// Record `(_, s)` and the position of `s` among each dependee's dependents.
    pub fn save_dependees(&self, s: &str) -> SavedDependees {
        let slots = self
            .dependees(s)
            .map(|r| {
                let index = self
                    .dependents
                    .get(r)
                    .and_then(|set| set.get_index_of(s))
                    .unwrap_or(0);
                (r.to_string(), index)
            })
            .collect();
        SavedDependees {
            cell: s.to_string(),
            slots,
        }
    }

    /// Put back exactly the `(_, s)` pairs taken by [`DependencyGraph::save_dependees`],
    /// each at its recorded position, so iteration order matches the saved state.
    pub fn restore_dependees(&mut self, saved: &SavedDependees) {
        self.replace_dependees(&saved.cell, std::iter::empty::<&str>());
        for (r, index) in &saved.slots {
            self.link_at(r, &saved.cell, *index);
        }
    }

    fn link(&mut self, s: &str, t: &str) {
        let inserted = self
            .dependents
            .entry(s.to_string())
            .or_default()
            .insert(t.to_string());
        if !inserted {
            return;
        }
        self.dependees
            .entry(t.to_string())
            .or_default()
            .insert(s.to_string());
        self.size += 1;
    }

    fn link_at(&mut self, s: &str, t: &str, index: usize) {
        let set = self.dependents.entry(s.to_string()).or_default();
        if set.contains(t) {
            return;
        }
        let index = index.min(set.len());
        set.shift_insert(index, t.to_string());
        self.dependees
            .entry(t.to_string())
            .or_default()
            .insert(s.to_string());
        self.size += 1;
    }

    fn unlink(&mut self, s: &str, t: &str) {
        let removed = match self.dependents.get_mut(s) {
            Some(set) => set.shift_remove(t),
            None => false,
        };
        if !removed {
            return;
        }
        prune(&mut self.dependents, s);
        if let Some(set) = self.dependees.get_mut(t) {
            set.shift_remove(s);
        }
        prune(&mut self.dependees, t);
        self.size -= 1;
    }
}

/// Drop an adjacency entry once it no longer holds any edge.
fn prune(adjacency: &mut Adjacency, key: &str) {
    if adjacency.get(key).is_some_and(IndexSet::is_empty) {
        adjacency.shift_remove(key);
    }
}
