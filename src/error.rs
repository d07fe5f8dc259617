use crate::graph::{BlockId, ConnectionId, Port};
use thiserror::Error;

/// Why a `connect` call was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionRejection {
    #[error("port '{0}' is not declared by its block's kind")]
    UnknownPort(Port),

    #[error("connections must run from an Out port to an In port")]
    WrongDirection,

    #[error("flow ports connect only to flow ports, data ports only to data ports")]
    ChannelMismatch,

    #[error("a block cannot be connected to itself")]
    SelfConnection,

    #[error("input port is already occupied by connection {occupant}")]
    InputOccupied { occupant: ConnectionId },

    #[error("an identical connection already exists ({existing})")]
    Duplicate { existing: ConnectionId },
}

impl ConnectionRejection {
    /// Stable reason code shown to the user.
    pub fn code(&self) -> &'static str {
        match self {
            ConnectionRejection::UnknownPort(_) => "UNKNOWN_PORT",
            ConnectionRejection::WrongDirection => "WRONG_DIRECTION",
            ConnectionRejection::ChannelMismatch => "CHANNEL_MISMATCH",
            ConnectionRejection::SelfConnection => "SELF_CONNECTION",
            ConnectionRejection::InputOccupied { .. } => "INPUT_OCCUPIED",
            ConnectionRejection::Duplicate { .. } => "DUPLICATE",
        }
    }
}

/// Structural errors raised by graph mutators. A failed call never mutates the graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("block kind '{0}' is not registered in the active block set")]
    UnknownKind(String),

    #[error("block {0} does not exist")]
    BlockNotFound(BlockId),

    #[error("invalid connection from '{from}' to '{to}' [{}]: {reason}", .reason.code())]
    InvalidConnection {
        from: Port,
        to: Port,
        reason: ConnectionRejection,
    },

    #[error("input '{port}' already has an incoming connection ({occupant})")]
    InputOccupied { port: Port, occupant: ConnectionId },

    #[error("snapshot could not be restored: {0}")]
    RestoreFailed(String),
}

impl GraphError {
    /// The reason code for connection failures, including an occupied input.
    pub fn rejection(&self) -> Option<ConnectionRejection> {
        match self {
            GraphError::InvalidConnection { reason, .. } => Some(reason.clone()),
            GraphError::InputOccupied { occupant, .. } => Some(ConnectionRejection::InputOccupied {
                occupant: *occupant,
            }),
            _ => None,
        }
    }
}

/// Errors raised while assembling a registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("block kind '{0}' is already registered")]
    DuplicateKind(String),

    #[error("unknown block set '{0}' (expected one of: javascript, html, css)")]
    UnknownBlockSet(String),
}

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),
}

/// Errors raised while reading or writing a graph document.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to parse document JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Serialization failed: {0}")]
    Encode(String),

    #[error("Deserialization failed: {0}")]
    Decode(String),

    #[error("Could not access file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
