//! Prelude module for convenient imports
//!
//! Re-exports the types needed to build a graph, generate code from it and
//! keep an undo history.
//!
//! # Example
//!
//! ```rust,no_run
//! use kumiki::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/document.json")?;
//! let document = GraphDocument::from_json_str(&json)?;
//! let registry = document.load_block_set()?;
//! let graph = document.into_graph(&registry)?;
//!
//! let result = generate(&graph, &registry);
//! println!("{}", result.text);
//! # Ok(())
//! # }
//! ```

// Graph model
pub use crate::graph::{
    BlockId, BlockInstance, Channel, Connection, ConnectionId, Direction, Graph, Port, Position,
    Value,
};

// Registry and block sets
pub use crate::registry::{BlockKind, BlockSet, DataInput, Registry};

// Code generation
pub use crate::codegen::{Diagnostic, DiagnosticKind, GenerationResult, Generator, generate};

// History and persistence
pub use crate::document::GraphDocument;
pub use crate::history::{History, HistoryState, ViewTransform};

// Configuration
pub use crate::config::{EditorConfig, GeneratorConfig, HistoryConfig};

// Error types
pub use crate::error::{ConnectionRejection, DocumentError, GraphError, RegistryError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
