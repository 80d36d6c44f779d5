//! The dependency structure matrix.
//!
//! A [`DependencyMatrix`] lays the items of a [`DependencyGraph`] out as a
//! square grid: cell `(i, j)` holds the dependency from the item at row `i`
//! to the item at row `j`. Rows can be reordered by swapping two elements or
//! by sorting with a [`MatrixOrdering`]; either way every cell keeps pointing
//! at the dependency between its row's and its column's item.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use super::error::{MatrixError, MatrixResult};
use super::ordering::{DependencyScope, Endpoint, MatrixOrdering};
use super::row::{DsmCell, DsmRow};
use crate::analysis::{AnalysisResult, DependencyCycle, Violation};
use crate::graph::{Dependency, DependencyGraph};

/// Matrices larger than this render as a one-line summary.
const GRID_DISPLAY_LIMIT: usize = 20;

/// A square matrix view over a dependency graph and its analysis.
///
/// The graph and analysis result are shared, read-only inputs; the matrix
/// exclusively owns its rows and cells. Mutating operations take `&mut self`,
/// so concurrent access has to be serialized by the caller, typically by
/// giving each consumer its own matrix or wrapping it in a `Mutex`.
///
/// # Example
///
/// ```rust
/// use dsmscope::analysis::Analyzer;
/// use dsmscope::graph::{Dependable, DependencyGraph, Scope};
/// use dsmscope::matrix::{DependencyMatrix, MatrixOrdering};
///
/// let mut graph = DependencyGraph::new(Scope::Classes);
/// for name in ["B", "A"] {
///     graph.add_item(Dependable::new(name, format!("app.{name}"), Scope::Classes));
/// }
/// graph.add_dependency("app.A", "app.B", 2);
///
/// let analysis = Analyzer::new().analyze(&graph);
/// let mut matrix = DependencyMatrix::new(graph, analysis, MatrixOrdering::Natural);
///
/// assert_eq!(matrix.display_names(), vec!["A", "B"]);
/// assert_eq!(matrix.cell(0, 1).unwrap().dependency_weight(), 2);
///
/// matrix.swap_elements(0, 1).unwrap();
/// assert_eq!(matrix.display_names(), vec!["B", "A"]);
/// assert_eq!(matrix.cell(1, 0).unwrap().dependency_weight(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct DependencyMatrix {
    rows: Vec<DsmRow>,
    graph: Arc<DependencyGraph>,
    analysis: Arc<AnalysisResult>,
    violations: HashSet<Violation>,
    dependency_cycles: HashSet<DependencyCycle>,
    /// `None` after a manual edit left the rows in no named ordering
    ordering: Option<MatrixOrdering>,
}

impl Default for DependencyMatrix {
    fn default() -> Self {
        Self::new(
            DependencyGraph::default(),
            AnalysisResult::valid(),
            MatrixOrdering::collaborator_default(),
        )
    }
}

/// The shared empty matrix, standing in for "no graph loaded".
pub fn empty_matrix() -> &'static DependencyMatrix {
    static EMPTY: OnceLock<DependencyMatrix> = OnceLock::new();
    EMPTY.get_or_init(DependencyMatrix::default)
}

fn cycles_of(violations: &HashSet<Violation>) -> HashSet<DependencyCycle> {
    violations
        .iter()
        .filter_map(Violation::as_cycle)
        .cloned()
        .collect()
}

impl DependencyMatrix {
    /// Builds a matrix from a graph snapshot and its analysis.
    ///
    /// Rows are laid out in the graph's default order first; if `ordering`
    /// is a different one the matrix is sorted right away.
    pub fn new(
        graph: impl Into<Arc<DependencyGraph>>,
        analysis: impl Into<Arc<AnalysisResult>>,
        ordering: MatrixOrdering,
    ) -> Self {
        let graph = graph.into();
        let analysis = analysis.into();

        let rows = graph.build_default_rows();
        let violations = analysis.violations_of_items(&graph.all_items());
        let dependency_cycles = cycles_of(&violations);

        let mut matrix = Self {
            rows,
            graph,
            analysis,
            violations,
            dependency_cycles,
            ordering: Some(MatrixOrdering::collaborator_default()),
        };
        if !ordering.is_collaborator_default() {
            matrix.sort(ordering);
        }

        debug!(
            size = matrix.size(),
            violations = matrix.violations.len(),
            cycles = matrix.dependency_cycles.len(),
            %ordering,
            "built dependency matrix"
        );
        matrix
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn check_index(&self, index: usize) -> MatrixResult<()> {
        if index < self.size() {
            Ok(())
        } else {
            Err(MatrixError::IndexOutOfBounds {
                index,
                size: self.size(),
            })
        }
    }

    /// All rows in order.
    pub fn rows(&self) -> &[DsmRow] {
        &self.rows
    }

    /// The row at `index`.
    pub fn row(&self, index: usize) -> MatrixResult<&DsmRow> {
        self.check_index(index)?;
        Ok(&self.rows[index])
    }

    /// Replaces the row at `index`.
    ///
    /// The row must have exactly `size()` cells. Clears the ordering tag.
    pub fn set_row(&mut self, index: usize, row: DsmRow) -> MatrixResult<()> {
        self.check_index(index)?;
        if row.cells.len() != self.size() {
            return Err(MatrixError::NotSquare {
                cells: row.cells.len(),
                size: self.size(),
            });
        }
        self.rows[index] = row;
        self.ordering = None;
        Ok(())
    }

    /// Replaces all rows.
    ///
    /// Every row must have as many cells as there are rows. Clears the
    /// ordering tag.
    pub fn set_rows(&mut self, rows: Vec<DsmRow>) -> MatrixResult<()> {
        let size = rows.len();
        if let Some(row) = rows.iter().find(|row| row.cells.len() != size) {
            return Err(MatrixError::NotSquare {
                cells: row.cells.len(),
                size,
            });
        }
        self.rows = rows;
        self.ordering = None;
        Ok(())
    }

    /// The cell at `(row, column)`.
    pub fn cell(&self, row: usize, column: usize) -> MatrixResult<&DsmCell> {
        self.check_index(row)?;
        self.check_index(column)?;
        Ok(&self.rows[row].cells[column])
    }

    /// Overwrites the cell at `(row, column)`.
    pub fn set_cell(&mut self, row: usize, column: usize, cell: DsmCell) -> MatrixResult<()> {
        self.check_index(row)?;
        self.check_index(column)?;
        self.rows[row].cells[column] = cell;
        Ok(())
    }

    /// Exchanges the contents of two cells.
    pub fn replace_cells(
        &mut self,
        row1: usize,
        column1: usize,
        row2: usize,
        column2: usize,
    ) -> MatrixResult<()> {
        for index in [row1, column1, row2, column2] {
            self.check_index(index)?;
        }
        self.swap_cells(row1, column1, row2, column2);
        Ok(())
    }

    fn swap_cells(&mut self, row1: usize, column1: usize, row2: usize, column2: usize) {
        if row1 == row2 {
            self.rows[row1].cells.swap(column1, column2);
        } else {
            let taken = mem::take(&mut self.rows[row1].cells[column1]);
            let other = mem::replace(&mut self.rows[row2].cells[column2], taken);
            self.rows[row1].cells[column1] = other;
        }
    }

    /// Swaps the items at two positions, moving their rows and columns.
    ///
    /// Afterwards every cell still holds the dependency between its row's and
    /// its column's item. Swapping a position with itself changes nothing;
    /// any other swap clears the ordering tag, since the rows may no longer
    /// follow a named ordering.
    pub fn swap_elements(&mut self, a: usize, b: usize) -> MatrixResult<()> {
        self.check_index(a)?;
        self.check_index(b)?;
        if a == b {
            return Ok(());
        }

        self.swap_positions(a.min(b), a.max(b));
        self.ordering = None;
        debug!(a, b, "swapped matrix elements");
        Ok(())
    }

    /// Requires `lo < hi < size()`.
    fn swap_positions(&mut self, lo: usize, hi: usize) {
        let size = self.size();

        // Rows, outside the two swapped columns
        {
            let (head, tail) = self.rows.split_at_mut(hi);
            let (row_lo, row_hi) = (&mut head[lo], &mut tail[0]);
            for k in (0..size).filter(|&k| k != lo && k != hi) {
                mem::swap(&mut row_lo.cells[k], &mut row_hi.cells[k]);
            }
        }

        // Columns, outside the two swapped rows
        for (i, row) in self.rows.iter_mut().enumerate() {
            if i != lo && i != hi {
                row.cells.swap(lo, hi);
            }
        }

        // Intersection cells, each pair exactly once
        let (head, tail) = self.rows.split_at_mut(hi);
        let (row_lo, row_hi) = (&mut head[lo], &mut tail[0]);
        mem::swap(&mut row_hi.cells[lo], &mut row_lo.cells[hi]);
        mem::swap(&mut row_lo.cells[lo], &mut row_hi.cells[hi]);

        // Items trade places, each row keeps its reordered cells
        mem::swap(&mut row_lo.node, &mut row_hi.node);
    }

    /// The ordering the rows currently follow, if any.
    pub fn ordering(&self) -> Option<MatrixOrdering> {
        self.ordering
    }

    /// Reorders the matrix. A no-op if `ordering` is already active.
    pub fn sort(&mut self, ordering: MatrixOrdering) {
        if self.ordering == Some(ordering) {
            return;
        }

        match ordering {
            MatrixOrdering::Instability => self.rows = self.graph.build_default_rows(),
            MatrixOrdering::Natural => self.sort_naturally(),
        }
        self.ordering = Some(ordering);
        debug!(%ordering, size = self.size(), "sorted dependency matrix");
    }

    /// Reorders the matrix by ordering name.
    ///
    /// An unknown name fails with [`MatrixError::UnsupportedOrdering`] and
    /// leaves the matrix untouched.
    pub fn sort_by_name(&mut self, name: &str) -> MatrixResult<()> {
        let ordering: MatrixOrdering = name.parse()?;
        self.sort(ordering);
        Ok(())
    }

    /// Stable sort by display name, applied as a series of element swaps.
    fn sort_naturally(&mut self) {
        let size = self.size();
        let mut target: Vec<usize> = (0..size).collect();
        target.sort_by(|&a, &b| {
            self.rows[a]
                .node
                .display_name
                .cmp(&self.rows[b].node.display_name)
        });

        // position[r]: where the row that started at r is now
        // occupant[p]: which starting row is now at p
        let mut position: Vec<usize> = (0..size).collect();
        let mut occupant: Vec<usize> = (0..size).collect();

        for (i, &wanted) in target.iter().enumerate() {
            let current = position[wanted];
            if current == i {
                continue;
            }
            // Positions before i are final, so current > i
            self.swap_positions(i, current);

            let displaced = occupant[i];
            occupant[i] = wanted;
            occupant[current] = displaced;
            position[wanted] = i;
            position[displaced] = current;
        }
    }

    /// Display names of all rows, in order.
    pub fn display_names(&self) -> Vec<&str> {
        self.rows.iter().map(DsmRow::display_name).collect()
    }

    /// Display name of the item at `index`.
    pub fn display_name(&self, index: usize) -> MatrixResult<&str> {
        Ok(self.row(index)?.display_name())
    }

    /// Fully-qualified name of the item at `index`.
    pub fn fully_qualified_name(&self, index: usize) -> MatrixResult<&str> {
        Ok(&self.row(index)?.node.fully_qualified_name)
    }

    /// Position of the first row with the given display name.
    pub fn row_index_of(&self, display_name: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.display_name() == display_name)
    }

    /// The graph this matrix was built from.
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// The analysis this matrix was built from.
    pub fn analysis_result(&self) -> &AnalysisResult {
        &self.analysis
    }

    /// Whether the dependency at `(row, column)` has violations.
    pub fn has_violations_at(&self, row: usize, column: usize) -> MatrixResult<bool> {
        Ok(self.has_violations_in(self.cell(row, column)?))
    }

    /// Whether the cell's dependency has violations. False for empty cells.
    pub fn has_violations_in(&self, cell: &DsmCell) -> bool {
        cell.dependency()
            .is_some_and(|dependency| self.has_violations(dependency))
    }

    /// Whether the analysis recorded any violation for the dependency.
    pub fn has_violations(&self, dependency: &Dependency) -> bool {
        self.analysis.has_violations(dependency)
    }

    /// Violations recorded for the dependency.
    pub fn violations_of(&self, dependency: &Dependency) -> BTreeSet<&Violation> {
        self.analysis.violations_of(dependency)
    }

    /// Scope of one endpoint of the dependency at `(row, column)`.
    ///
    /// [`DependencyScope::Unknown`] for empty cells.
    pub fn scope_of(
        &self,
        row: usize,
        column: usize,
        endpoint: Endpoint,
    ) -> MatrixResult<DependencyScope> {
        Ok(self
            .cell(row, column)?
            .dependency()
            .map_or(DependencyScope::Unknown, |dependency| {
                Self::scope_of_dependency(dependency, endpoint)
            }))
    }

    /// Like [`scope_of`](Self::scope_of) with the endpoint given by name.
    ///
    /// An unrecognised endpoint name yields [`DependencyScope::Unknown`].
    pub fn scope_of_named(
        &self,
        row: usize,
        column: usize,
        endpoint: &str,
    ) -> MatrixResult<DependencyScope> {
        let cell = self.cell(row, column)?;
        Ok(match (endpoint.parse::<Endpoint>(), cell.dependency()) {
            (Ok(endpoint), Some(dependency)) => Self::scope_of_dependency(dependency, endpoint),
            _ => DependencyScope::Unknown,
        })
    }

    /// Scope of one endpoint of a dependency.
    pub fn scope_of_dependency(dependency: &Dependency, endpoint: Endpoint) -> DependencyScope {
        DependencyScope::of(dependency, endpoint)
    }

    /// Every violation touching an item of the graph.
    pub fn all_violations(&self) -> &HashSet<Violation> {
        &self.violations
    }

    /// The cycle violations among [`all_violations`](Self::all_violations).
    pub fn dependency_cycles(&self) -> &HashSet<DependencyCycle> {
        &self.dependency_cycles
    }

    /// Replaces the cycle set, e.g. after an out-of-band recomputation.
    pub fn set_dependency_cycles(&mut self, cycles: HashSet<DependencyCycle>) {
        self.dependency_cycles = cycles;
    }

    /// One-line summary: size, plus violation count if the analysis failed.
    pub fn summary(&self) -> String {
        let mut line = format!("DependencyMatrix: size = {}", self.size());
        if !self.analysis.is_valid() {
            line.push_str(&format!(
                ", has {} violations",
                self.analysis.all_violations().len()
            ));
        }
        line
    }

    /// Grid rendering: one line per row, each cell's weight between pipes.
    pub fn render_grid(&self) -> String {
        let mut out = String::from("DependencyMatrix\n");
        for row in &self.rows {
            out.push_str(row.display_name());
            out.push(' ');
            for cell in &row.cells {
                out.push_str(&format!("| {} |", cell.dependency_weight()));
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for DependencyMatrix {
    /// Diagnostic view; not a stable serialization format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() || self.size() > GRID_DISPLAY_LIMIT {
            f.write_str(&self.summary())
        } else {
            f.write_str(&self.render_grid())
        }
    }
}

impl PartialEq for DependencyMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.ordering == other.ordering
            && self.rows == other.rows
            && self.graph.item_names() == other.graph.item_names()
            && self.analysis.all_violations() == other.analysis.all_violations()
    }
}

impl Eq for DependencyMatrix {}

impl Hash for DependencyMatrix {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordering.hash(state);
        self.rows.hash(state);
        self.graph.item_names().hash(state);
        self.analysis.all_violations().hash(state);
    }
}
