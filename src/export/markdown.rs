//! Markdown export implementation.
//!
//! Exports a dependency matrix in Markdown format for documentation and
//! reporting. Columns are numbered after their row, the usual DSM layout.

use super::{sorted_cycles, Exporter};
use crate::matrix::DependencyMatrix;
use std::io::{self, Write};

/// Markdown exporter implementation.
pub struct MarkdownExporter;

impl MarkdownExporter {
    /// Escape characters that would break a table cell.
    fn escape_cell(value: &str) -> String {
        value.replace('|', "\\|")
    }
}

impl Exporter for MarkdownExporter {
    fn export<W: Write>(&self, matrix: &DependencyMatrix, writer: &mut W) -> io::Result<()> {
        // Title
        writeln!(writer, "# Dependency Structure Matrix")?;
        writeln!(writer)?;

        // Summary section
        writeln!(writer, "## Summary")?;
        writeln!(writer)?;
        writeln!(writer, "| Metric | Value |")?;
        writeln!(writer, "|--------|-------|")?;
        writeln!(writer, "| Items | {} |", matrix.size())?;
        writeln!(writer, "| Dependencies | {} |", matrix.graph().edge_count())?;
        writeln!(writer, "| Violations | {} |", matrix.all_violations().len())?;
        writeln!(
            writer,
            "| Dependency Cycles | {} |",
            matrix.dependency_cycles().len()
        )?;
        if let Some(ordering) = matrix.ordering() {
            writeln!(writer, "| Ordering | {} |", ordering)?;
        }
        writeln!(writer)?;

        if matrix.is_empty() {
            writeln!(writer, "*No items.*")?;
            return Ok(());
        }

        // Matrix section
        writeln!(writer, "## Matrix")?;
        writeln!(writer)?;
        let numbers: Vec<String> = (1..=matrix.size()).map(|n| n.to_string()).collect();
        writeln!(writer, "| Item | {} |", numbers.join(" | "))?;
        writeln!(writer, "|------|{}", "---|".repeat(matrix.size()))?;

        for (i, row) in matrix.rows().iter().enumerate() {
            let cells: Vec<String> = row
                .cells
                .iter()
                .enumerate()
                .map(|(j, cell)| match cell.dependency_weight() {
                    0 if i == j => "-".to_string(),
                    0 => " ".to_string(),
                    weight if matrix.has_violations_in(cell) => format!("**{}**", weight),
                    weight => weight.to_string(),
                })
                .collect();
            writeln!(
                writer,
                "| {}. {} | {} |",
                i + 1,
                Self::escape_cell(row.display_name()),
                cells.join(" | ")
            )?;
        }
        writeln!(writer)?;

        // Cycles section
        let cycles = sorted_cycles(matrix);
        if !cycles.is_empty() {
            writeln!(writer, "## Dependency Cycles ({})", cycles.len())?;
            writeln!(writer)?;
            for cycle in cycles {
                writeln!(writer, "- `{}`", cycle.cycle_path())?;
            }
            writeln!(writer)?;
        }

        Ok(())
    }
}
