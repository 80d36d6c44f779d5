//! JSON export implementation.
//!
//! Exports a dependency matrix in JSON format for machine-readable output.

use super::{sorted_cycles, Exporter};
use crate::matrix::DependencyMatrix;
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serializable matrix item for JSON output.
#[derive(Serialize)]
struct JsonItem {
    name: String,
    fqn: String,
    scope: String,
}

/// Serializable cycle info for JSON output.
#[derive(Serialize)]
struct JsonCycle {
    items: Vec<String>,
    path: String,
}

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    ordering: Option<String>,
    valid: bool,
    violations: usize,
    dependency_cycles: usize,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport {
    summary: JsonSummary,
    items: Vec<JsonItem>,
    /// Row-major dependency weights
    weights: Vec<Vec<u32>>,
    /// Row-major flags for cells whose dependency has violations
    violated: Vec<Vec<bool>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    violations: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dependency_cycles: Vec<JsonCycle>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, matrix: &DependencyMatrix, writer: &mut W) -> io::Result<()> {
        let items: Vec<JsonItem> = matrix
            .rows()
            .iter()
            .map(|row| JsonItem {
                name: row.node.display_name.clone(),
                fqn: row.node.fully_qualified_name.clone(),
                scope: row.node.scope.to_string(),
            })
            .collect();

        let weights: Vec<Vec<u32>> = matrix
            .rows()
            .iter()
            .map(|row| row.cells.iter().map(|c| c.dependency_weight()).collect())
            .collect();

        let violated: Vec<Vec<bool>> = matrix
            .rows()
            .iter()
            .map(|row| {
                row.cells
                    .iter()
                    .map(|c| matrix.has_violations_in(c))
                    .collect()
            })
            .collect();

        let mut violations: Vec<String> = matrix
            .all_violations()
            .iter()
            .map(|v| v.to_string())
            .collect();
        violations.sort();

        let dependency_cycles: Vec<JsonCycle> = sorted_cycles(matrix)
            .into_iter()
            .map(|c| JsonCycle {
                items: c
                    .members
                    .iter()
                    .map(|m| m.fully_qualified_name.clone())
                    .collect(),
                path: c.cycle_path(),
            })
            .collect();

        let export = JsonExport {
            summary: JsonSummary {
                size: matrix.size(),
                ordering: matrix.ordering().map(|o| o.to_string()),
                valid: matrix.analysis_result().is_valid(),
                violations: matrix.all_violations().len(),
                dependency_cycles: matrix.dependency_cycles().len(),
            },
            items,
            weights,
            violated,
            violations,
            dependency_cycles,
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}
