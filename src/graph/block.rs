use super::port::BlockId;
use super::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canvas position of a block. Only carried so it survives undo/redo exactly.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One placed block of a given kind, holding its field data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockInstance {
    pub id: BlockId,
    pub kind: String,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
    #[serde(default)]
    pub position: Position,
}

impl BlockInstance {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Field text as a template sees it; missing fields read as empty.
    pub fn field_text(&self, name: &str) -> String {
        self.fields.get(name).map(Value::as_text).unwrap_or_default()
    }
}
