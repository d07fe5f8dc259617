use crate::error::DocumentError;
use crate::graph::Graph;
use crate::history::{HistoryState, ViewTransform};
use crate::registry::{BlockSet, Registry};
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};
use tracing::debug;

/// A saved editing session: the block set it was built with and a snapshot
/// of the graph and view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub block_set: String,
    pub snapshot: HistoryState,
}

impl GraphDocument {
    pub fn new(block_set: &str, graph: &Graph, view: ViewTransform) -> Self {
        Self {
            block_set: block_set.to_string(),
            snapshot: graph.snapshot(view),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        encode_to_vec(self, standard()).map_err(|e| DocumentError::Encode(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        decode_from_slice(bytes, standard())
            .map(|(document, _)| document)
            .map_err(|e| DocumentError::Decode(e.to_string()))
    }

    /// Saves the document to `path` in the binary format.
    pub fn save(&self, path: &str) -> Result<(), DocumentError> {
        let bytes = self.to_bytes()?;
        let io_error = |source| DocumentError::Io {
            path: path.to_string(),
            source,
        };
        let mut file = fs::File::create(path).map_err(io_error)?;
        file.write_all(&bytes).map_err(io_error)?;
        debug!(path, bytes = bytes.len(), "document saved");
        Ok(())
    }

    /// Loads a document written by [`GraphDocument::save`].
    pub fn from_file(path: &str) -> Result<Self, DocumentError> {
        let io_error = |source| DocumentError::Io {
            path: path.to_string(),
            source,
        };
        let mut file = fs::File::open(path).map_err(io_error)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(io_error)?;
        Self::from_bytes(&bytes)
    }

    /// The built-in block set this document names.
    pub fn load_block_set(&self) -> Result<Registry, DocumentError> {
        Ok(self.block_set.parse::<BlockSet>()?.load()?)
    }

    /// Rebuilds the graph against `registry`, re-validating every connection.
    pub fn into_graph(&self, registry: &Registry) -> Result<Graph, DocumentError> {
        Ok(Graph::restore(&self.snapshot, registry)?)
    }
}
