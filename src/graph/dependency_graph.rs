//! Dependency graph implementation using petgraph.
//!
//! Provides a directed, weighted graph of dependables (packages, classes, ...)
//! with aggregated dependency weights, coupling metrics, cycle detection and
//! the instability-based default row layout used by the matrix.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use crate::matrix::{DsmCell, DsmRow};

/// Granularity of a dependable.
///
/// The numeric [`Scope::index`] mirrors the classification used by the
/// dependency engines this model is fed from: 0 for locations (jars,
/// directories), 1 for packages, 2 for classes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Physical locations such as jars or source directories
    #[default]
    Locations,
    /// Package-level items
    Packages,
    /// Class-level items
    Classes,
}

impl Scope {
    /// Returns the numeric index of this scope.
    pub fn index(self) -> u8 {
        match self {
            Self::Locations => 0,
            Self::Packages => 1,
            Self::Classes => 2,
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Locations => write!(f, "locations"),
            Self::Packages => write!(f, "packages"),
            Self::Classes => write!(f, "classes"),
        }
    }
}

/// A node of the dependency graph.
///
/// The fully-qualified name is the identity key; the display name is what
/// the matrix shows and what natural ordering sorts on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Dependable {
    /// Short name (e.g. a class simple name)
    pub display_name: String,
    /// Unique name (e.g. `com.example.core.Service`)
    pub fully_qualified_name: String,
    /// Granularity of this item
    pub scope: Scope,
}

impl Dependable {
    /// Creates a new dependable.
    ///
    /// # Example
    ///
    /// ```rust
    /// use dsmscope::graph::{Dependable, Scope};
    ///
    /// let item = Dependable::new("Service", "com.example.Service", Scope::Classes);
    /// assert_eq!(item.display_name, "Service");
    /// assert_eq!(item.scope.index(), 2);
    /// ```
    pub fn new(
        display_name: impl Into<String>,
        fully_qualified_name: impl Into<String>,
        scope: Scope,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            fully_qualified_name: fully_qualified_name.into(),
            scope,
        }
    }
}

/// Identifies a dependency by the fully-qualified names of its endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DependencyKey {
    /// Fully-qualified name of the depending item
    pub dependant: String,
    /// Fully-qualified name of the item depended upon
    pub dependee: String,
}

impl DependencyKey {
    /// Creates a key from two fully-qualified names.
    pub fn new(dependant: impl Into<String>, dependee: impl Into<String>) -> Self {
        Self {
            dependant: dependant.into(),
            dependee: dependee.into(),
        }
    }
}

/// A directed, weighted edge between two dependables.
///
/// The weight counts the underlying references from `dependant` to
/// `dependee`. The scopes of both endpoints are carried by the endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Dependency {
    /// The depending item
    pub dependant: Arc<Dependable>,
    /// The item depended upon
    pub dependee: Arc<Dependable>,
    /// Number of underlying references
    pub weight: u32,
}

impl Dependency {
    /// Creates a new dependency.
    pub fn new(dependant: Arc<Dependable>, dependee: Arc<Dependable>, weight: u32) -> Self {
        Self {
            dependant,
            dependee,
            weight,
        }
    }

    /// Returns the lookup key of this dependency.
    pub fn key(&self) -> DependencyKey {
        DependencyKey::new(
            &self.dependant.fully_qualified_name,
            &self.dependee.fully_qualified_name,
        )
    }

    /// Scope of the depending item.
    pub fn dependant_scope(&self) -> Scope {
        self.dependant.scope
    }

    /// Scope of the item depended upon.
    pub fn dependee_scope(&self) -> Scope {
        self.dependee.scope
    }
}

/// A directed graph of dependables.
///
/// Uses petgraph's `DiGraph` internally. Edges point from the dependant to
/// its dependee and carry the aggregated dependency weight.
///
/// # Example
///
/// ```rust
/// use dsmscope::graph::{Dependable, DependencyGraph, Scope};
///
/// let mut graph = DependencyGraph::new(Scope::Classes);
/// graph.add_item(Dependable::new("A", "app.A", Scope::Classes));
/// graph.add_item(Dependable::new("B", "app.B", Scope::Classes));
///
/// assert!(graph.add_dependency("app.A", "app.B", 2));
/// assert!(graph.add_dependency("app.A", "app.B", 1)); // aggregates
///
/// assert_eq!(graph.edge_count(), 1);
/// assert_eq!(graph.dependency("app.A", "app.B").unwrap().weight, 3);
/// ```
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// The underlying directed graph
    graph: DiGraph<Arc<Dependable>, u32>,
    /// Maps fully-qualified names to their node indices for O(1) lookup
    node_indices: HashMap<String, NodeIndex>,
    /// Scope the graph was built at
    scope: Scope,
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new(Scope::default())
    }
}

impl DependencyGraph {
    /// Creates a new empty graph at the given scope.
    ///
    /// ```rust
    /// use dsmscope::graph::{DependencyGraph, Scope};
    ///
    /// let graph = DependencyGraph::new(Scope::Packages);
    /// assert!(graph.is_empty());
    /// assert_eq!(graph.scope(), Scope::Packages);
    /// ```
    pub fn new(scope: Scope) -> Self {
        Self {
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
            scope,
        }
    }

    /// Creates a new graph with pre-allocated capacity.
    pub fn with_capacity(scope: Scope, nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            node_indices: HashMap::with_capacity(nodes),
            scope,
        }
    }

    /// The scope the graph was built at.
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Adds an item to the graph.
    ///
    /// If an item with the same fully-qualified name already exists, returns
    /// its existing node index without modification.
    pub fn add_item(&mut self, item: Dependable) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(&item.fully_qualified_name) {
            return idx;
        }

        let key = item.fully_qualified_name.clone();
        let idx = self.graph.add_node(Arc::new(item));
        self.node_indices.insert(key, idx);
        idx
    }

    /// Adds a dependency between two items.
    ///
    /// Adding the same edge twice aggregates the weights.
    ///
    /// # Returns
    ///
    /// `true` if the dependency was recorded, `false` if either item doesn't
    /// exist.
    pub fn add_dependency(&mut self, from: &str, to: &str, weight: u32) -> bool {
        let (Some(&from_idx), Some(&to_idx)) =
            (self.node_indices.get(from), self.node_indices.get(to))
        else {
            return false;
        };

        match self.graph.find_edge(from_idx, to_idx) {
            Some(edge) => {
                if let Some(existing) = self.graph.edge_weight_mut(edge) {
                    *existing = existing.saturating_add(weight);
                }
            }
            None => {
                self.graph.add_edge(from_idx, to_idx, weight);
            }
        }
        true
    }

    /// Gets an item by fully-qualified name.
    pub fn get_item(&self, fully_qualified_name: &str) -> Option<&Arc<Dependable>> {
        self.node_indices
            .get(fully_qualified_name)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// Gets the dependency from one item to another, if any.
    pub fn dependency(&self, from: &str, to: &str) -> Option<Dependency> {
        let from_idx = *self.node_indices.get(from)?;
        let to_idx = *self.node_indices.get(to)?;
        let edge = self.graph.find_edge(from_idx, to_idx)?;

        Some(Dependency::new(
            Arc::clone(&self.graph[from_idx]),
            Arc::clone(&self.graph[to_idx]),
            self.graph[edge],
        ))
    }

    /// Returns all items in insertion order.
    pub fn all_items(&self) -> Vec<Arc<Dependable>> {
        self.graph.node_weights().cloned().collect()
    }

    /// Returns the fully-qualified names of all items, sorted.
    pub fn item_names(&self) -> BTreeSet<&str> {
        self.node_indices.keys().map(String::as_str).collect()
    }

    /// Returns every dependency in the graph.
    pub fn dependencies(&self) -> Vec<Dependency> {
        self.graph
            .edge_references()
            .map(|edge| {
                Dependency::new(
                    Arc::clone(&self.graph[edge.source()]),
                    Arc::clone(&self.graph[edge.target()]),
                    *edge.weight(),
                )
            })
            .collect()
    }

    /// Returns the number of items in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of distinct dependencies in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Checks if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Checks if an item exists in the graph.
    pub fn contains(&self, fully_qualified_name: &str) -> bool {
        self.node_indices.contains_key(fully_qualified_name)
    }

    /// Number of distinct other items depending on the given item (Ca).
    pub fn afferent_coupling(&self, fully_qualified_name: &str) -> usize {
        self.coupling(fully_qualified_name, Direction::Incoming)
    }

    /// Number of distinct other items the given item depends on (Ce).
    pub fn efferent_coupling(&self, fully_qualified_name: &str) -> usize {
        self.coupling(fully_qualified_name, Direction::Outgoing)
    }

    fn coupling(&self, fully_qualified_name: &str, direction: Direction) -> usize {
        let Some(&idx) = self.node_indices.get(fully_qualified_name) else {
            return 0;
        };

        self.graph
            .neighbors_directed(idx, direction)
            .filter(|&other| other != idx)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Instability `Ce / (Ca + Ce)` of an item.
    ///
    /// Items without any coupling (and unknown items) have instability 0.
    ///
    /// ```rust
    /// use dsmscope::graph::{Dependable, DependencyGraph, Scope};
    ///
    /// let mut graph = DependencyGraph::new(Scope::Packages);
    /// graph.add_item(Dependable::new("ui", "app.ui", Scope::Packages));
    /// graph.add_item(Dependable::new("core", "app.core", Scope::Packages));
    /// graph.add_dependency("app.ui", "app.core", 1);
    ///
    /// assert_eq!(graph.instability("app.ui"), 1.0);
    /// assert_eq!(graph.instability("app.core"), 0.0);
    /// ```
    pub fn instability(&self, fully_qualified_name: &str) -> f64 {
        let ca = self.afferent_coupling(fully_qualified_name);
        let ce = self.efferent_coupling(fully_qualified_name);
        if ca + ce == 0 {
            0.0
        } else {
            ce as f64 / (ca + ce) as f64
        }
    }

    /// Returns the items of every cyclic strongly connected component.
    ///
    /// A component is cyclic if it has more than one node, or a single node
    /// with a self-dependency. Members are listed in depth-first walk order
    /// starting from the member with the lowest fully-qualified name, so a
    /// simple cycle `a -> b -> c -> a` comes back as `[a, b, c]`. Components
    /// are sorted by their first member.
    pub fn cyclic_components(&self) -> Vec<Vec<Arc<Dependable>>> {
        let mut components: Vec<Vec<Arc<Dependable>>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                self.walk_component(&scc)
                    .into_iter()
                    .map(|idx| Arc::clone(&self.graph[idx]))
                    .collect()
            })
            .collect();

        components.sort_by(|a, b| a[0].fully_qualified_name.cmp(&b[0].fully_qualified_name));
        components
    }

    fn walk_component(&self, scc: &[NodeIndex]) -> Vec<NodeIndex> {
        let members: HashSet<NodeIndex> = scc.iter().copied().collect();
        let Some(&start) = scc
            .iter()
            .min_by(|&&a, &&b| self.fqn(a).cmp(self.fqn(b)))
        else {
            return Vec::new();
        };

        let mut order = Vec::with_capacity(scc.len());
        let mut visited = HashSet::with_capacity(scc.len());
        let mut stack = vec![start];

        while let Some(idx) = stack.pop() {
            if !visited.insert(idx) {
                continue;
            }
            order.push(idx);

            let mut next: Vec<NodeIndex> = self
                .graph
                .neighbors_directed(idx, Direction::Outgoing)
                .filter(|n| members.contains(n) && !visited.contains(n))
                .collect();
            // Reverse so the lowest name is popped first
            next.sort_by(|&a, &b| self.fqn(b).cmp(self.fqn(a)));
            stack.extend(next);
        }

        order
    }

    fn fqn(&self, idx: NodeIndex) -> &str {
        &self.graph[idx].fully_qualified_name
    }

    /// Builds matrix rows for the given item order.
    ///
    /// `cells[j]` of row `i` holds the dependency from `items[i]` to
    /// `items[j]`, or is empty when there is none. Items unknown to the graph
    /// get rows of empty cells.
    pub fn rows_for(&self, items: &[Arc<Dependable>]) -> Vec<DsmRow> {
        let mut weights: HashMap<(NodeIndex, NodeIndex), u32> =
            HashMap::with_capacity(self.graph.edge_count());
        for edge in self.graph.edge_references() {
            weights.insert((edge.source(), edge.target()), *edge.weight());
        }

        let indices: Vec<Option<NodeIndex>> = items
            .iter()
            .map(|item| self.node_indices.get(&item.fully_qualified_name).copied())
            .collect();

        items
            .iter()
            .zip(&indices)
            .map(|(item, from)| {
                let cells = items
                    .iter()
                    .zip(&indices)
                    .map(|(other, to)| {
                        let weight = match (from, to) {
                            (Some(from), Some(to)) => weights.get(&(*from, *to)).copied(),
                            _ => None,
                        };
                        weight
                            .map(|weight| {
                                DsmCell::new(Dependency::new(
                                    Arc::clone(item),
                                    Arc::clone(other),
                                    weight,
                                ))
                            })
                            .unwrap_or_default()
                    })
                    .collect();
                DsmRow::new(Arc::clone(item), cells)
            })
            .collect()
    }

    /// Returns all items in the default (instability) layout.
    ///
    /// Sorted by instability descending, ties broken by display name and
    /// then fully-qualified name.
    pub fn default_order(&self) -> Vec<Arc<Dependable>> {
        let mut items: Vec<(f64, Arc<Dependable>)> = self
            .graph
            .node_weights()
            .map(|item| (self.instability(&item.fully_qualified_name), Arc::clone(item)))
            .collect();

        items.sort_by(|(ia, a), (ib, b)| {
            ib.total_cmp(ia)
                .then_with(|| a.display_name.cmp(&b.display_name))
                .then_with(|| a.fully_qualified_name.cmp(&b.fully_qualified_name))
        });

        items.into_iter().map(|(_, item)| item).collect()
    }

    /// Builds fully populated matrix rows in the default layout.
    pub fn build_default_rows(&self) -> Vec<DsmRow> {
        self.rows_for(&self.default_order())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> Dependable {
        Dependable::new(name, format!("app.{name}"), Scope::Classes)
    }

    fn graph_of(names: &[&str], edges: &[(&str, &str, u32)]) -> DependencyGraph {
        let mut graph = DependencyGraph::new(Scope::Classes);
        for name in names {
            graph.add_item(item(name));
        }
        for (from, to, weight) in edges {
            assert!(graph.add_dependency(&format!("app.{from}"), &format!("app.{to}"), *weight));
        }
        graph
    }

    #[test]
    fn test_create_empty_graph() {
        let graph = DependencyGraph::default();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.is_empty());
        assert_eq!(graph.scope(), Scope::Locations);
    }

    #[test]
    fn test_add_item_is_idempotent() {
        let mut graph = DependencyGraph::new(Scope::Classes);
        let idx = graph.add_item(item("A"));
        let idx2 = graph.add_item(Dependable::new("Other", "app.A", Scope::Packages));

        assert_eq!(idx, idx2);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.get_item("app.A").unwrap().display_name, "A");
    }

    #[test]
    fn test_add_dependency_unknown_item() {
        let mut graph = graph_of(&["A"], &[]);
        assert!(!graph.add_dependency("app.A", "app.missing", 1));
        assert!(!graph.add_dependency("app.missing", "app.A", 1));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_dependency_weights_aggregate() {
        let mut graph = graph_of(&["A", "B"], &[("A", "B", 2)]);
        graph.add_dependency("app.A", "app.B", 5);

        let dep = graph.dependency("app.A", "app.B").unwrap();
        assert_eq!(dep.weight, 7);
        assert_eq!(dep.dependant.display_name, "A");
        assert_eq!(dep.dependee.display_name, "B");
        assert!(graph.dependency("app.B", "app.A").is_none());
    }

    #[test]
    fn test_dependencies_and_keys() {
        let graph = graph_of(&["A", "B", "C"], &[("A", "B", 1), ("B", "C", 2)]);
        let mut keys: Vec<DependencyKey> = graph.dependencies().iter().map(Dependency::key).collect();
        keys.sort();

        assert_eq!(
            keys,
            vec![
                DependencyKey::new("app.A", "app.B"),
                DependencyKey::new("app.B", "app.C"),
            ]
        );
    }

    #[test]
    fn test_coupling_and_instability() {
        let graph = graph_of(
            &["A", "B", "C", "D"],
            &[("A", "C", 1), ("B", "C", 1), ("C", "D", 1)],
        );

        assert_eq!(graph.afferent_coupling("app.C"), 2);
        assert_eq!(graph.efferent_coupling("app.C"), 1);
        assert!((graph.instability("app.C") - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(graph.instability("app.A"), 1.0);
        assert_eq!(graph.instability("app.D"), 0.0);
        assert_eq!(graph.instability("app.missing"), 0.0);
    }

    #[test]
    fn test_self_dependency_not_counted_as_coupling() {
        let graph = graph_of(&["A"], &[("A", "A", 1)]);
        assert_eq!(graph.efferent_coupling("app.A"), 0);
        assert_eq!(graph.instability("app.A"), 0.0);
    }

    #[test]
    fn test_default_order_by_instability() {
        let graph = graph_of(
            &["D", "C", "B", "A"],
            &[("A", "C", 1), ("B", "C", 1), ("C", "D", 1)],
        );

        let names: Vec<String> = graph
            .default_order()
            .iter()
            .map(|i| i.display_name.clone())
            .collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_build_default_rows_populates_cells() {
        let graph = graph_of(&["A", "B"], &[("A", "B", 3)]);
        let rows = graph.build_default_rows();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].node.display_name, "A");
        assert_eq!(rows[0].cells.len(), 2);
        assert!(rows[0].cells[0].is_empty());
        assert_eq!(rows[0].cells[1].dependency_weight(), 3);
        assert!(rows[1].cells[0].is_empty());
        assert!(rows[1].cells[1].is_empty());
    }

    #[test]
    fn test_rows_for_custom_order() {
        let graph = graph_of(&["A", "B"], &[("A", "B", 3)]);
        let order = vec![
            Arc::clone(graph.get_item("app.B").unwrap()),
            Arc::clone(graph.get_item("app.A").unwrap()),
        ];
        let rows = graph.rows_for(&order);

        assert_eq!(rows[0].node.display_name, "B");
        assert_eq!(rows[1].cells[0].dependency_weight(), 3);
        assert!(rows[0].cells[1].is_empty());
    }

    #[test]
    fn test_cyclic_components() {
        let graph = graph_of(
            &["A", "B", "C", "D"],
            &[("A", "B", 1), ("B", "C", 2), ("C", "A", 1), ("A", "D", 1)],
        );

        let cycles = graph.cyclic_components();
        assert_eq!(cycles.len(), 1);

        let names: Vec<&str> = cycles[0].iter().map(|i| i.display_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_cyclic_components_self_loop() {
        let graph = graph_of(&["A", "B"], &[("A", "A", 1), ("A", "B", 1)]);
        let cycles = graph.cyclic_components();

        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 1);
        assert_eq!(cycles[0][0].display_name, "A");
    }

    #[test]
    fn test_no_cycles_in_dag() {
        let graph = graph_of(&["A", "B", "C"], &[("A", "B", 1), ("B", "C", 1)]);
        assert!(graph.cyclic_components().is_empty());
    }

    #[test]
    fn test_scope_index_and_display() {
        assert_eq!(Scope::Locations.index(), 0);
        assert_eq!(Scope::Packages.index(), 1);
        assert_eq!(Scope::Classes.index(), 2);
        assert_eq!(format!("{}", Scope::Packages), "packages");
        assert_eq!(Scope::default(), Scope::Locations);
    }
}
