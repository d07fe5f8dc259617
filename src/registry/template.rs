use crate::graph::{BlockId, BlockInstance};
use ahash::AHashMap;
use std::sync::Arc;

/// What a code template can see of the block it is rendering.
pub struct BlockContext<'a> {
    block: &'a BlockInstance,
    inputs: &'a AHashMap<String, String>,
}

impl<'a> BlockContext<'a> {
    pub(crate) fn new(block: &'a BlockInstance, inputs: &'a AHashMap<String, String>) -> Self {
        Self { block, inputs }
    }

    pub fn id(&self) -> BlockId {
        self.block.id
    }

    pub fn kind(&self) -> &str {
        &self.block.kind
    }

    pub fn block(&self) -> &BlockInstance {
        self.block
    }

    /// Raw text of a field, empty when the field is missing.
    pub fn field(&self, name: &str) -> String {
        self.block.field_text(name)
    }

    /// Resolved value of a declared data input: the connected producer's
    /// expression, or the block's literal fallback.
    pub fn input(&self, name: &str) -> &str {
        self.inputs.get(name).map(String::as_str).unwrap_or("")
    }
}

/// Renders a plain block into a statement.
pub type StatementFn = Arc<dyn Fn(&BlockContext<'_>) -> String + Send + Sync>;
/// Renders a branching or container block. Receives one code fragment per slot,
/// in the kind's declared slot order.
pub type NestedFn = Arc<dyn Fn(&BlockContext<'_>, &[String]) -> String + Send + Sync>;
/// Renders a data producer into an expression.
pub type ValueFn = Arc<dyn Fn(&BlockContext<'_>) -> String + Send + Sync>;

/// The statement-level code function of a block kind.
#[derive(Clone)]
pub enum CodeTemplate {
    Statement(StatementFn),
    Nested(NestedFn),
}

impl std::fmt::Debug for CodeTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodeTemplate::Statement(_) => f.write_str("Statement(..)"),
            CodeTemplate::Nested(_) => f.write_str("Nested(..)"),
        }
    }
}

/// Lays out a nested code fragment inside a construct: one trailing newline when
/// non-empty, nothing at all when the slot is empty.
pub fn body(code: &str) -> String {
    let trimmed = code.trim_end_matches('\n');
    if trimmed.trim().is_empty() {
        String::new()
    } else {
        format!("{}\n", trimmed)
    }
}

/// Quotes text as a double-quoted string literal (JavaScript/CSS escaping).
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Escapes text for use inside HTML element content or attribute values.
pub fn escape_markup(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
