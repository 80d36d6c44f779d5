//! CSV export implementation.
//!
//! Exports a dependency matrix in CSV format for spreadsheet use: a header
//! row of item names, then one row per item with its dependency weights.

use super::Exporter;
use crate::matrix::DependencyMatrix;
use std::io::{self, Write};

/// CSV exporter implementation.
pub struct CsvExporter;

impl CsvExporter {
    /// Escape a field value for CSV format.
    ///
    /// Wraps the value in quotes if it contains commas, quotes, or newlines.
    fn escape_field(value: &str) -> String {
        if value.contains(',') || value.contains('"') || value.contains('\n') {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}

impl Exporter for CsvExporter {
    fn export<W: Write>(&self, matrix: &DependencyMatrix, writer: &mut W) -> io::Result<()> {
        let header: Vec<String> = std::iter::once("item".to_string())
            .chain(matrix.display_names().into_iter().map(Self::escape_field))
            .collect();
        writeln!(writer, "{}", header.join(","))?;

        for row in matrix.rows() {
            let fields: Vec<String> = std::iter::once(Self::escape_field(row.display_name()))
                .chain(row.cells.iter().map(|c| c.dependency_weight().to_string()))
                .collect();
            writeln!(writer, "{}", fields.join(","))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisResult;
    use crate::graph::{Dependable, DependencyGraph, Scope};
    use crate::matrix::MatrixOrdering;

    fn create_test_matrix(names: &[&str], edges: &[(&str, &str, u32)]) -> DependencyMatrix {
        let mut graph = DependencyGraph::new(Scope::Classes);
        for name in names {
            graph.add_item(Dependable::new(*name, *name, Scope::Classes));
        }
        for (from, to, weight) in edges {
            graph.add_dependency(from, to, *weight);
        }
        DependencyMatrix::new(graph, AnalysisResult::valid(), MatrixOrdering::Natural)
    }

    #[test]
    fn test_csv_export_basic() {
        let matrix = create_test_matrix(&["A", "B", "C"], &[("A", "B", 2), ("C", "A", 7)]);
        let mut output = Vec::new();

        CsvExporter.export(&matrix, &mut output).unwrap();

        let csv_str = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = csv_str.lines().collect();

        // Header + 3 rows
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "item,A,B,C");
        assert_eq!(lines[1], "A,0,2,0");
        assert_eq!(lines[2], "B,0,0,0");
        assert_eq!(lines[3], "C,7,0,0");
    }

    #[test]
    fn test_csv_export_empty_matrix() {
        let matrix = create_test_matrix(&[], &[]);
        let mut output = Vec::new();

        CsvExporter.export(&matrix, &mut output).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "item\n");
    }

    #[test]
    fn test_csv_escape_field() {
        assert_eq!(CsvExporter::escape_field("simple"), "simple");
        assert_eq!(CsvExporter::escape_field("Map<K,V>"), "\"Map<K,V>\"");
        assert_eq!(
            CsvExporter::escape_field("with\"quote"),
            "\"with\"\"quote\""
        );
    }

    #[test]
    fn test_csv_export_escapes_names() {
        let matrix = create_test_matrix(&["Pair<A,B>"], &[]);
        let mut output = Vec::new();

        CsvExporter.export(&matrix, &mut output).unwrap();

        let csv_str = String::from_utf8(output).unwrap();
        assert!(csv_str.starts_with("item,\"Pair<A,B>\"\n"));
        assert!(csv_str.contains("\n\"Pair<A,B>\",0\n"));
    }
}
