//! Analysis result model.
//!
//! An [`AnalysisResult`] maps each dependency to the violations it takes part
//! in. A violation is either a plain rule breach or a [`DependencyCycle`].

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::graph::{Dependable, Dependency, DependencyKey};

/// A closed path through the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DependencyCycle {
    /// The items forming the cycle; the last one depends back on the first
    pub members: Vec<Arc<Dependable>>,
}

impl DependencyCycle {
    /// Creates a cycle from its members in path order.
    pub fn new(members: Vec<Arc<Dependable>>) -> Self {
        Self { members }
    }

    /// Returns a formatted string representation of the cycle path.
    ///
    /// For example: "A -> B -> C -> A"
    pub fn cycle_path(&self) -> String {
        let Some(first) = self.members.first() else {
            return String::new();
        };
        let mut path = self
            .members
            .iter()
            .map(|m| m.display_name.as_str())
            .collect::<Vec<_>>()
            .join(" -> ");
        path.push_str(" -> ");
        path.push_str(&first.display_name);
        path
    }

    /// Checks whether an item (by fully-qualified name) is on the cycle.
    pub fn contains(&self, fully_qualified_name: &str) -> bool {
        self.members
            .iter()
            .any(|m| m.fully_qualified_name == fully_qualified_name)
    }

    /// Returns the number of items in the cycle.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the cycle has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A dependency that breaks a named rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleViolation {
    /// Name of the broken rule
    pub rule: String,
    /// The offending dependency
    pub dependency: DependencyKey,
}

/// A recorded breach of a dependency rule.
///
/// Every cycle is also a violation; [`Violation::as_cycle`] refines it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Violation {
    /// A dependency forbidden by a rule
    Rule(RuleViolation),
    /// Dependencies forming a cycle
    Cycle(DependencyCycle),
}

impl Violation {
    /// Returns true if this violation is a dependency cycle.
    pub fn is_cycle(&self) -> bool {
        matches!(self, Self::Cycle(_))
    }

    /// Returns the cycle if this violation is one.
    pub fn as_cycle(&self) -> Option<&DependencyCycle> {
        match self {
            Self::Cycle(cycle) => Some(cycle),
            Self::Rule(_) => None,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rule(rule) => write!(
                f,
                "rule '{}' forbids {} -> {}",
                rule.rule, rule.dependency.dependant, rule.dependency.dependee
            ),
            Self::Cycle(cycle) => write!(f, "cycle {}", cycle.cycle_path()),
        }
    }
}

/// Output of a dependency analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    by_dependency: HashMap<DependencyKey, BTreeSet<Violation>>,
    valid: bool,
}

impl Default for AnalysisResult {
    fn default() -> Self {
        Self::valid()
    }
}

impl AnalysisResult {
    /// Creates a result from per-dependency violations and a validity flag.
    pub fn new(by_dependency: HashMap<DependencyKey, BTreeSet<Violation>>, valid: bool) -> Self {
        Self {
            by_dependency,
            valid,
        }
    }

    /// A result with no violations.
    pub fn valid() -> Self {
        Self::new(HashMap::new(), true)
    }

    /// Records a violation against a dependency and marks the result invalid.
    pub fn record(&mut self, dependency: DependencyKey, violation: Violation) {
        self.by_dependency
            .entry(dependency)
            .or_default()
            .insert(violation);
        self.valid = false;
    }

    /// Whether the analysed graph passed every rule.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// All distinct violations.
    pub fn all_violations(&self) -> BTreeSet<&Violation> {
        self.by_dependency.values().flatten().collect()
    }

    /// Violations recorded for one dependency.
    pub fn violations_of(&self, dependency: &Dependency) -> BTreeSet<&Violation> {
        self.by_dependency
            .get(&dependency.key())
            .map(|set| set.iter().collect())
            .unwrap_or_default()
    }

    /// Returns true if at least one violation is recorded for the dependency.
    pub fn has_violations(&self, dependency: &Dependency) -> bool {
        self.by_dependency
            .get(&dependency.key())
            .is_some_and(|set| !set.is_empty())
    }

    /// Violations touching any dependency whose endpoints include one of the items.
    pub fn violations_of_items(&self, items: &[Arc<Dependable>]) -> HashSet<Violation> {
        let names: HashSet<&str> = items
            .iter()
            .map(|i| i.fully_qualified_name.as_str())
            .collect();

        self.by_dependency
            .iter()
            .filter(|(key, _)| {
                names.contains(key.dependant.as_str()) || names.contains(key.dependee.as_str())
            })
            .flat_map(|(_, violations)| violations.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Scope;

    fn item(name: &str) -> Arc<Dependable> {
        Arc::new(Dependable::new(name, format!("app.{name}"), Scope::Classes))
    }

    fn dep(from: &str, to: &str) -> Dependency {
        Dependency::new(item(from), item(to), 1)
    }

    fn rule(name: &str, from: &str, to: &str) -> Violation {
        Violation::Rule(RuleViolation {
            rule: name.to_string(),
            dependency: DependencyKey::new(format!("app.{from}"), format!("app.{to}")),
        })
    }

    #[test]
    fn test_valid_result_is_empty() {
        let result = AnalysisResult::default();
        assert!(result.is_valid());
        assert!(result.all_violations().is_empty());
        assert!(!result.has_violations(&dep("A", "B")));
        assert!(result.violations_of(&dep("A", "B")).is_empty());
    }

    #[test]
    fn test_record_marks_invalid() {
        let mut result = AnalysisResult::valid();
        let ab = dep("A", "B");
        result.record(ab.key(), rule("r", "A", "B"));

        assert!(!result.is_valid());
        assert!(result.has_violations(&ab));
        assert_eq!(result.violations_of(&ab).len(), 1);
        assert!(!result.has_violations(&dep("B", "A")));
    }

    #[test]
    fn test_shared_violation_counted_once() {
        let cycle = Violation::Cycle(DependencyCycle::new(vec![item("A"), item("B")]));
        let mut result = AnalysisResult::valid();
        result.record(dep("A", "B").key(), cycle.clone());
        result.record(dep("B", "A").key(), cycle);

        assert_eq!(result.all_violations().len(), 1);
    }

    #[test]
    fn test_violations_of_items() {
        let mut result = AnalysisResult::valid();
        result.record(dep("A", "B").key(), rule("r1", "A", "B"));
        result.record(dep("C", "D").key(), rule("r2", "C", "D"));

        let touching_b = result.violations_of_items(&[item("B")]);
        assert_eq!(touching_b.len(), 1);
        assert!(touching_b.contains(&rule("r1", "A", "B")));

        assert!(result.violations_of_items(&[item("E")]).is_empty());
    }

    #[test]
    fn test_cycle_path_and_membership() {
        let cycle = DependencyCycle::new(vec![item("A"), item("B"), item("C")]);
        assert_eq!(cycle.cycle_path(), "A -> B -> C -> A");
        assert!(cycle.contains("app.B"));
        assert!(!cycle.contains("app.D"));
        assert_eq!(cycle.len(), 3);
        assert_eq!(DependencyCycle::new(Vec::new()).cycle_path(), "");
    }

    #[test]
    fn test_violation_refinement() {
        let cycle = Violation::Cycle(DependencyCycle::new(vec![item("A")]));
        assert!(cycle.is_cycle());
        assert!(cycle.as_cycle().is_some());

        let plain = rule("layering", "A", "B");
        assert!(!plain.is_cycle());
        assert!(plain.as_cycle().is_none());
        assert_eq!(plain.to_string(), "rule 'layering' forbids app.A -> app.B");
    }
}
