//! Matrix rows and cells.

use std::sync::Arc;

use crate::graph::{Dependable, Dependency};

/// One position of the matrix.
///
/// Holds the dependency between the row's item and the column's item, or
/// nothing when there is no direct dependency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DsmCell {
    dependency: Option<Dependency>,
}

impl DsmCell {
    /// Creates a cell holding a dependency.
    pub fn new(dependency: Dependency) -> Self {
        Self {
            dependency: Some(dependency),
        }
    }

    /// Creates an empty cell.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The dependency held by this cell, if any.
    pub fn dependency(&self) -> Option<&Dependency> {
        self.dependency.as_ref()
    }

    /// Weight of the held dependency, 0 for an empty cell.
    pub fn dependency_weight(&self) -> u32 {
        self.dependency.as_ref().map_or(0, |d| d.weight)
    }

    /// Returns true if the cell holds no dependency.
    pub fn is_empty(&self) -> bool {
        self.dependency.is_none()
    }
}

/// An item together with its cells, one per column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DsmRow {
    /// The item this row (and the column at the same index) stands for
    pub node: Arc<Dependable>,
    /// Cells in column order
    pub cells: Vec<DsmCell>,
}

impl DsmRow {
    /// Creates a new row.
    pub fn new(node: Arc<Dependable>, cells: Vec<DsmCell>) -> Self {
        Self { node, cells }
    }

    /// Display name of the row's item.
    pub fn display_name(&self) -> &str {
        &self.node.display_name
    }
}
