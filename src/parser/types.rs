//! Graph description file types.
//!
//! These structs mirror the JSON document the CLI reads: a list of items,
//! the dependencies between them, and optional forbidden-dependency rules.

use serde::{Deserialize, Serialize};

use crate::analysis::ForbiddenDependency;
use crate::graph::{Dependable, Scope};

/// Represents the structure of a graph description file.
///
/// # Example
///
/// ```
/// use dsmscope::parser::types::GraphFile;
///
/// let json = r#"{"items": [{"name": "A", "fqn": "app.A"}]}"#;
/// let file: GraphFile = serde_json::from_str(json).unwrap();
/// assert_eq!(file.items.len(), 1);
/// assert!(file.dependencies.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GraphFile {
    /// Scope the graph was extracted at.
    #[serde(default)]
    pub scope: Scope,

    /// Every item of the graph.
    #[serde(default)]
    pub items: Vec<ItemEntry>,

    /// Edges between items, by fully-qualified name.
    #[serde(default)]
    pub dependencies: Vec<DependencyEntry>,

    /// Forbidden-dependency rules to check.
    #[serde(default)]
    pub rules: Vec<ForbiddenDependency>,
}

impl GraphFile {
    /// Returns true if the file describes no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One item of the graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemEntry {
    /// Display name.
    pub name: String,

    /// Fully-qualified name; defaults to the display name.
    #[serde(default)]
    pub fqn: Option<String>,

    /// Item scope; defaults to the file's scope.
    #[serde(default)]
    pub scope: Option<Scope>,
}

impl ItemEntry {
    /// Converts the entry into a dependable, falling back to `default_scope`.
    pub fn to_dependable(&self, default_scope: Scope) -> Dependable {
        Dependable::new(
            &self.name,
            self.fqn.clone().unwrap_or_else(|| self.name.clone()),
            self.scope.unwrap_or(default_scope),
        )
    }
}

fn default_weight() -> u32 {
    1
}

/// One dependency edge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DependencyEntry {
    /// Fully-qualified name of the depending item.
    pub from: String,

    /// Fully-qualified name of the item depended upon.
    pub to: String,

    /// Number of references; defaults to 1.
    #[serde(default = "default_weight")]
    pub weight: u32,
}
