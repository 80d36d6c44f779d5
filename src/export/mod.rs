//! Export functionality for dependency matrices.
//!
//! This module provides exporters for writing a [`DependencyMatrix`] in
//! various formats: plain text, JSON, CSV, and Markdown.

pub mod csv;
pub mod json;
pub mod markdown;

use crate::analysis::DependencyCycle;
use crate::matrix::DependencyMatrix;
use std::io::{self, Write};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Text format - the diagnostic grid
    #[default]
    Text,
    /// JSON format - machine-readable, full data
    Json,
    /// CSV format - spreadsheet-friendly
    Csv,
    /// Markdown format - documentation/reporting
    Markdown,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: text, json, csv, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Text => write!(f, "text"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the matrix to the given writer.
    fn export<W: Write>(&self, matrix: &DependencyMatrix, writer: &mut W) -> io::Result<()>;
}

/// Text exporter: the grid rendering, whatever the matrix size.
pub struct TextExporter;

impl Exporter for TextExporter {
    fn export<W: Write>(&self, matrix: &DependencyMatrix, writer: &mut W) -> io::Result<()> {
        write!(writer, "{}", matrix.render_grid())
    }
}

/// Cycles of the matrix sorted by path, for stable output.
fn sorted_cycles(matrix: &DependencyMatrix) -> Vec<&DependencyCycle> {
    let mut cycles: Vec<&DependencyCycle> = matrix.dependency_cycles().iter().collect();
    cycles.sort();
    cycles
}

/// Export the matrix in the specified format.
pub fn export<W: Write>(
    format: ExportFormat,
    matrix: &DependencyMatrix,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Text => TextExporter.export(matrix, writer),
        ExportFormat::Json => json::JsonExporter.export(matrix, writer),
        ExportFormat::Csv => csv::CsvExporter.export(matrix, writer),
        ExportFormat::Markdown => markdown::MarkdownExporter.export(matrix, writer),
    }
}

/// Export the matrix to a string.
pub fn export_to_string(format: ExportFormat, matrix: &DependencyMatrix) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, matrix, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Analyzer;
    use crate::graph::{Dependable, DependencyGraph, Scope};
    use crate::matrix::MatrixOrdering;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(
            "markdown".parse::<ExportFormat>().unwrap(),
            ExportFormat::Markdown
        );
        assert_eq!(
            "md".parse::<ExportFormat>().unwrap(),
            ExportFormat::Markdown
        );
        assert!("invalid".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_display() {
        assert_eq!(format!("{}", ExportFormat::Text), "text");
        assert_eq!(format!("{}", ExportFormat::Json), "json");
        assert_eq!(format!("{}", ExportFormat::Csv), "csv");
        assert_eq!(format!("{}", ExportFormat::Markdown), "markdown");
    }

    #[test]
    fn test_text_export_is_grid_even_for_large_matrix() {
        let mut graph = DependencyGraph::new(Scope::Classes);
        for i in 0..25 {
            graph.add_item(Dependable::new(
                format!("N{i:02}"),
                format!("app.N{i:02}"),
                Scope::Classes,
            ));
        }
        let analysis = Analyzer::new().analyze(&graph);
        let matrix = DependencyMatrix::new(graph, analysis, MatrixOrdering::Natural);

        let text = export_to_string(ExportFormat::Text, &matrix).unwrap();
        assert!(text.starts_with("DependencyMatrix\n"));
        assert_eq!(text.lines().count(), 26);
    }
}
