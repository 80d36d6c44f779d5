//! Parser module for dsmscope.
//!
//! Reads graph description files: the items of a dependency graph, the
//! weighted dependencies between them, and forbidden-dependency rules.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use dsmscope::parser::{build_graph, parse_file, rules};
//!
//! let file = parse_file(Path::new("graph.json")).unwrap();
//! let graph = build_graph(&file);
//! println!("{} items, {} rules", graph.node_count(), rules(&file).len());
//! ```

pub mod graph_file;
pub mod types;

// Re-export commonly used items for convenience
pub use graph_file::{build_graph, parse_file, parse_str, rules, validate, ParseError, ParseResult};

pub use types::{DependencyEntry, GraphFile, ItemEntry};
