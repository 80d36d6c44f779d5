//! Dependency analysis module.
//!
//! The matrix consumes an [`AnalysisResult`]: which dependencies take part in
//! which [`Violation`]s, and whether the graph is valid overall. Results can
//! be built directly by an external analysis, or produced by the bundled
//! [`Analyzer`], which reports dependency cycles and forbidden dependencies.
//!
//! # Example
//!
//! ```rust
//! use dsmscope::analysis::{Analyzer, ForbiddenDependency};
//! use dsmscope::graph::{Dependable, DependencyGraph, Scope};
//!
//! let mut graph = DependencyGraph::new(Scope::Packages);
//! graph.add_item(Dependable::new("core", "app.core", Scope::Packages));
//! graph.add_item(Dependable::new("ui", "app.ui", Scope::Packages));
//! graph.add_dependency("app.core", "app.ui", 1);
//!
//! let result = Analyzer::new()
//!     .with_rule(ForbiddenDependency::new("layering", "app.core", "app.ui"))
//!     .analyze(&graph);
//!
//! let dep = graph.dependency("app.core", "app.ui").unwrap();
//! assert!(result.has_violations(&dep));
//! ```

mod analyzer;
mod result;

pub use analyzer::{Analyzer, ForbiddenDependency};
pub use result::{AnalysisResult, DependencyCycle, RuleViolation, Violation};
