//! dsmscope - Dependency Structure Matrix model
//!
//! This crate lays a dependency graph out as a square matrix, keeps every
//! cell pointing at its dependency while rows are reordered, and answers
//! violation, cycle and scope queries against the cells.

pub mod analysis;
pub mod export;
pub mod graph;
pub mod matrix;
pub mod parser;
