//! # Kumiki - Block Editor Core
//!
//! **Kumiki** is the headless core of a block-based visual programming editor.
//! Blocks are placed on a canvas, wired together through typed ports, and the
//! resulting graph is turned into formatted source code through a pluggable
//! registry of block kinds.
//!
//! ## Core Workflow
//!
//! 1.  **Pick a Block Set**: Load one of the bundled registries (`BlockSet::JavaScript`,
//!     `BlockSet::Html`, `BlockSet::Css`) or assemble your own with `BlockKind::builder`.
//! 2.  **Edit the Graph**: Add blocks and connect their ports. Every mutation is
//!     validated against the registry; rejected calls leave the graph untouched.
//! 3.  **Generate**: Run the `Generator` over the graph. Generation never fails:
//!     problems are reported as diagnostics next to the best-effort output.
//! 4.  **Undo/Redo**: Commit snapshots to a `History` at natural edit boundaries
//!     and restore them with `Graph::restore`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kumiki::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let registry = BlockSet::JavaScript.load()?;
//!     let mut graph = Graph::new();
//!     let mut history = History::default();
//!
//!     let start = graph.add_block(&registry, "start", Position::new(40.0, 40.0))?.id;
//!     let log = graph.add_block(&registry, "log_message", Position::new(40.0, 120.0))?.id;
//!     graph.set_field(log, "message", "hello")?;
//!     graph.connect(&registry, Port::next(start), Port::flow_in(log))?;
//!     history.commit_graph(&graph, ViewTransform::default());
//!
//!     let result = Generator::builder(&registry).indent("    ").build().generate(&graph);
//!     println!("{}", result.text);
//!     for diagnostic in &result.diagnostics {
//!         eprintln!("{}: {}", diagnostic.kind, diagnostic.message);
//!     }
//!     Ok(())
//! }
//! ```

pub mod codegen;
pub mod config;
pub mod document;
pub mod error;
pub mod graph;
pub mod history;
pub mod prelude;
pub mod registry;
