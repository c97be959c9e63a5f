//! # Keiro - Call-Flow Graph Compiler
//!
//! **Keiro** compiles visually-authored conversation graphs into the pathway
//! document format consumed by an external conversational-voice platform,
//! and decompiles externally authored documents back into editable graphs.
//!
//! The compiler is a pure graph-rewriting pipeline. Given a graph of
//! conversation nodes (greeting, question, customer response, conditional,
//! transfer, webhook, end call) it:
//!
//! 1. **Normalizes ids** into the `[A-Za-z0-9_]` character set so they
//!    survive round-tripping through the external format.
//! 2. **Collects variables**: every extraction variable declared anywhere in
//!    the graph is gathered into one ordered, deduplicated list attached to
//!    the start node.
//! 3. **Eliminates conditionals**: the external format has no conditional
//!    node kind, so each one is rewritten into direct labeled edges between
//!    its predecessors and successors.
//! 4. **Synthesizes branches**: every declared customer-response option is
//!    guaranteed an outgoing labeled edge; missing negative branches get a
//!    terminal node so they never dead-end.
//! 5. **Validates and repairs**: reachability, orphans, and missing text are
//!    reported as issues and patched best-effort; compilation always
//!    produces a usable document.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use keiro::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let json = std::fs::read_to_string("path/to/flow.json")?;
//!
//!     // Parse the editor's raw graph JSON and compile it.
//!     let graph = EditorGraph::from_json(&json)?.into_graph()?;
//!     let compiled = Compiler::builder(graph)
//!         .with_name("Qualification Flow")
//!         .build()
//!         .compile()?;
//!
//!     // Structural problems never block the compile; they are reported so
//!     // the user can confirm a "deploy with fixes".
//!     for issue in &compiled.issues {
//!         eprintln!("warning: {}", issue);
//!     }
//!
//!     println!("{}", serde_json::to_string_pretty(&compiled.document)?);
//!
//!     // And back again: an imported document becomes an editable graph.
//!     let roundtrip = Decompiler::new(compiled.document).decompile()?;
//!     println!("{} nodes recovered", roundtrip.nodes.len());
//!     Ok(())
//! }
//! ```

pub mod compiler;
pub mod decompiler;
pub mod document;
pub mod editor;
pub mod error;
pub mod graph;
pub mod idgen;
pub mod prelude;
