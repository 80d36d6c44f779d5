//! Bundled dependency analyzer.
//!
//! Produces an [`AnalysisResult`] from a graph: one cycle violation per
//! cyclic component, and one rule violation per dependency matching a
//! [`ForbiddenDependency`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use super::result::{AnalysisResult, DependencyCycle, RuleViolation, Violation};
use crate::graph::{Dependency, DependencyGraph};

/// A rule forbidding dependencies between two groups of items.
///
/// Groups are fully-qualified-name prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForbiddenDependency {
    /// Rule name reported in violations
    pub name: String,
    /// Prefix of depending items
    pub from: String,
    /// Prefix of items that must not be depended upon
    pub to: String,
}

impl ForbiddenDependency {
    /// Creates a new rule.
    pub fn new(name: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    /// Returns true if the dependency breaks this rule.
    pub fn matches(&self, dependency: &Dependency) -> bool {
        dependency
            .dependant
            .fully_qualified_name
            .starts_with(&self.from)
            && dependency
                .dependee
                .fully_qualified_name
                .starts_with(&self.to)
    }
}

/// Runs cycle detection and rule checks over a graph.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    rules: Vec<ForbiddenDependency>,
}

impl Analyzer {
    /// Creates an analyzer with no rules (cycle detection only).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule.
    pub fn with_rule(mut self, rule: ForbiddenDependency) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several rules.
    pub fn with_rules(mut self, rules: impl IntoIterator<Item = ForbiddenDependency>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Analyzes the graph.
    ///
    /// # Example
    ///
    /// ```rust
    /// use dsmscope::analysis::Analyzer;
    /// use dsmscope::graph::{Dependable, DependencyGraph, Scope};
    ///
    /// let mut graph = DependencyGraph::new(Scope::Classes);
    /// graph.add_item(Dependable::new("A", "app.A", Scope::Classes));
    /// graph.add_item(Dependable::new("B", "app.B", Scope::Classes));
    /// graph.add_dependency("app.A", "app.B", 1);
    /// graph.add_dependency("app.B", "app.A", 1);
    ///
    /// let result = Analyzer::new().analyze(&graph);
    /// assert!(!result.is_valid());
    /// assert_eq!(result.all_violations().len(), 1);
    /// ```
    pub fn analyze(&self, graph: &DependencyGraph) -> AnalysisResult {
        let mut result = AnalysisResult::valid();
        let dependencies = graph.dependencies();

        let components = graph.cyclic_components();
        for members in &components {
            let names: HashSet<&str> = members
                .iter()
                .map(|m| m.fully_qualified_name.as_str())
                .collect();
            let violation = Violation::Cycle(DependencyCycle::new(members.clone()));

            for dependency in dependencies.iter().filter(|d| {
                names.contains(d.dependant.fully_qualified_name.as_str())
                    && names.contains(d.dependee.fully_qualified_name.as_str())
            }) {
                result.record(dependency.key(), violation.clone());
            }
        }

        for rule in &self.rules {
            for dependency in dependencies.iter().filter(|d| rule.matches(d)) {
                result.record(
                    dependency.key(),
                    Violation::Rule(RuleViolation {
                        rule: rule.name.clone(),
                        dependency: dependency.key(),
                    }),
                );
            }
        }

        debug!(
            cycles = components.len(),
            rules = self.rules.len(),
            violations = result.all_violations().len(),
            "analysis finished"
        );
        result
    }
}
