//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types from the keiro crate. Import this
//! module to get access to the core functionality without having to import
//! each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use keiro::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/flow.json")?;
//! let graph = EditorGraph::from_json(&json)?.into_graph()?;
//! let compiled = Compiler::builder(graph).build().compile()?;
//! println!("{} issues", compiled.issues.len());
//! # Ok(())
//! # }
//! ```

// Compile and decompile entry points
pub use crate::compiler::{CompiledPathway, Compiler, CompilerBuilder};
pub use crate::decompiler::Decompiler;

// Validation
pub use crate::compiler::{ValidationReport, validate};

// Graph and document models
pub use crate::document::{DocEdge, DocNode, DocNodeKind, Document, ExtractVar};
pub use crate::editor::EditorGraph;
pub use crate::graph::{
    Graph, GraphEdge, GraphNode, IntoGraph, NodeData, NodeKind, normalize_ids,
};

// Deterministic id generation
pub use crate::idgen::IdGenerator;

// Error types
pub use crate::error::{CompileError, DecompileError, GraphConversionError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
