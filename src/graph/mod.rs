//! Graph module for dependency relationship modeling.
//!
//! This module provides the [`DependencyGraph`] the matrix is built from:
//! dependables at a given [`Scope`], connected by weighted [`Dependency`]
//! edges.
//!
//! # Example
//!
//! ```rust
//! use dsmscope::graph::{Dependable, DependencyGraph, Scope};
//!
//! let mut graph = DependencyGraph::new(Scope::Packages);
//! graph.add_item(Dependable::new("core", "app.core", Scope::Packages));
//! graph.add_item(Dependable::new("ui", "app.ui", Scope::Packages));
//! graph.add_dependency("app.ui", "app.core", 4);
//!
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.edge_count(), 1);
//! ```

mod dependency_graph;

pub use dependency_graph::{Dependable, Dependency, DependencyGraph, DependencyKey, Scope};
