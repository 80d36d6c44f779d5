//! Dependency structure matrix.
//!
//! [`DependencyMatrix`] is a square grid over the items of a
//! [`DependencyGraph`](crate::graph::DependencyGraph): row and column `i`
//! both stand for the same item, and cell `(i, j)` holds the dependency from
//! item `i` to item `j`. Rows can be reordered by
//! [`swap_elements`](DependencyMatrix::swap_elements) or by sorting with a
//! [`MatrixOrdering`], and cells can be queried for violations, cycles and
//! scopes.

mod dependency_matrix;
mod error;
mod ordering;
mod row;

pub use dependency_matrix::{empty_matrix, DependencyMatrix};
pub use error::{MatrixError, MatrixResult};
pub use ordering::{DependencyScope, Endpoint, MatrixOrdering};
pub use row::{DsmCell, DsmRow};
