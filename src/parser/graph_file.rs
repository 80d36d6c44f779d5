//! Parser for graph description files.
//!
//! This module reads the JSON graph description the CLI is given and turns
//! it into a [`DependencyGraph`] plus the rules to analyze it against.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use super::types::GraphFile;
use crate::analysis::ForbiddenDependency;
use crate::graph::DependencyGraph;

/// Errors that can occur during graph file parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to read the file from disk.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse JSON content.
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The graph description is structurally invalid.
    #[error("Invalid graph description: {0}")]
    InvalidGraph(String),
}

/// Result type alias for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a graph description file from a file path.
///
/// ```ignore
/// use std::path::Path;
/// use dsmscope::parser::graph_file::parse_file;
///
/// let file = parse_file(Path::new("graph.json")).unwrap();
/// println!("{} items", file.items.len());
/// ```
pub fn parse_file(path: &Path) -> ParseResult<GraphFile> {
    let content = fs::read_to_string(path)?;
    parse_str(&content)
}

/// Parses a graph description from a string.
///
/// # Example
///
/// ```
/// use dsmscope::parser::graph_file::parse_str;
///
/// let json = r#"{"items": [{"name": "A"}, {"name": "B"}]}"#;
/// let file = parse_str(json).unwrap();
/// assert_eq!(file.items.len(), 2);
/// ```
pub fn parse_str(content: &str) -> ParseResult<GraphFile> {
    let file: GraphFile = serde_json::from_str(content)?;
    validate(&file)?;
    Ok(file)
}

/// Validates a parsed graph description.
///
/// Rejects items with empty names, and dependencies declared without any
/// items to attach them to.
pub fn validate(file: &GraphFile) -> ParseResult<()> {
    if file.is_empty() && !file.dependencies.is_empty() {
        return Err(ParseError::InvalidGraph(
            "dependencies declared but no items".to_string(),
        ));
    }
    if let Some(position) = file.items.iter().position(|item| item.name.trim().is_empty()) {
        return Err(ParseError::InvalidGraph(format!(
            "item #{} has an empty name",
            position + 1
        )));
    }
    Ok(())
}

/// Builds the dependency graph described by the file.
///
/// Duplicate items keep their first declaration; dependencies naming an
/// unknown item are skipped. Both are logged as warnings.
///
/// # Example
///
/// ```
/// use dsmscope::parser::graph_file::{build_graph, parse_str};
///
/// let json = r#"{
///     "items": [{"name": "A"}, {"name": "B"}],
///     "dependencies": [{"from": "A", "to": "B", "weight": 2}]
/// }"#;
/// let graph = build_graph(&parse_str(json).unwrap());
/// assert_eq!(graph.dependency("A", "B").unwrap().weight, 2);
/// ```
pub fn build_graph(file: &GraphFile) -> DependencyGraph {
    let mut graph = DependencyGraph::with_capacity(
        file.scope,
        file.items.len(),
        file.dependencies.len(),
    );

    for item in &file.items {
        let dependable = item.to_dependable(file.scope);
        if graph.contains(&dependable.fully_qualified_name) {
            warn!(item = %dependable.fully_qualified_name, "duplicate item ignored");
            continue;
        }
        graph.add_item(dependable);
    }

    for dep in &file.dependencies {
        if !graph.add_dependency(&dep.from, &dep.to, dep.weight) {
            warn!(from = %dep.from, to = %dep.to, "dependency references unknown item, skipped");
        }
    }

    debug!(
        items = graph.node_count(),
        dependencies = graph.edge_count(),
        "graph built from description"
    );
    graph
}

/// Returns the forbidden-dependency rules declared in the file.
pub fn rules(file: &GraphFile) -> Vec<ForbiddenDependency> {
    file.rules.clone()
}
