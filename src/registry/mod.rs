//! The block definition registry.
//!
//! A [`Registry`] maps block-kind identifiers to [`BlockKind`] definitions:
//! declared ports, fields, a structural [`BlockShape`] and the code templates
//! the generator combines. Registries are plain values; switching block sets
//! means assigning a different registry.

use crate::error::RegistryError;
use ahash::AHashMap;
use std::sync::Arc;

pub mod block_sets;
pub mod definition;
pub mod template;

pub use block_sets::BlockSet;
pub use definition::*;
pub use template::*;

/// Comment syntax of the generated language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `// text`
    Line,
    /// `/* text */`
    Block,
    /// `<!-- text -->`
    Markup,
}

impl CommentStyle {
    pub fn comment(&self, text: &str) -> String {
        match self {
            CommentStyle::Line => format!("// {}", text),
            CommentStyle::Block => format!("/* {} */", text),
            CommentStyle::Markup => format!("<!-- {} -->", text),
        }
    }
}

/// How the formatting pass tracks nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentStyle {
    /// Brace/bracket/paren balance (JavaScript, CSS).
    Braces,
    /// Open/close tag balance (HTML).
    Markup,
}

/// An immutable table of block kinds plus the language conventions they share.
#[derive(Debug, Clone)]
pub struct Registry {
    name: String,
    entry_kind: String,
    comment_style: CommentStyle,
    indent_style: IndentStyle,
    null_literal: String,
    kinds: AHashMap<String, Arc<BlockKind>>,
    order: Vec<String>,
}

impl Registry {
    /// An empty registry using `start` as entry kind and `//` comments.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entry_kind: "start".to_string(),
            comment_style: CommentStyle::Line,
            indent_style: IndentStyle::Braces,
            null_literal: "null".to_string(),
            kinds: AHashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn with_entry_kind(mut self, kind: &str) -> Self {
        self.entry_kind = kind.to_string();
        self
    }

    pub fn with_comment_style(mut self, style: CommentStyle) -> Self {
        self.comment_style = style;
        self
    }

    pub fn with_indent_style(mut self, style: IndentStyle) -> Self {
        self.indent_style = style;
        self
    }

    /// Text substituted for a data value that could not be produced.
    pub fn with_null_literal(mut self, literal: &str) -> Self {
        self.null_literal = literal.to_string();
        self
    }

    /// Adds a kind. Kind ids are unique within a registry.
    pub fn register(&mut self, kind: BlockKind) -> Result<(), RegistryError> {
        if self.kinds.contains_key(kind.id()) {
            return Err(RegistryError::DuplicateKind(kind.id().to_string()));
        }
        self.order.push(kind.id().to_string());
        self.kinds.insert(kind.id().to_string(), Arc::new(kind));
        Ok(())
    }

    /// Builder-style `register` for assembling a block set in one expression.
    pub fn with_kind(mut self, kind: BlockKind) -> Result<Self, RegistryError> {
        self.register(kind)?;
        Ok(self)
    }

    pub fn get(&self, kind: &str) -> Option<&BlockKind> {
        self.kinds.get(kind).map(Arc::as_ref)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }

    /// All kinds in registration order (palette order).
    pub fn kinds(&self) -> impl Iterator<Item = &BlockKind> {
        self.order.iter().filter_map(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entry_kind(&self) -> &str {
        &self.entry_kind
    }

    pub fn comment_style(&self) -> CommentStyle {
        self.comment_style
    }

    pub fn indent_style(&self) -> IndentStyle {
        self.indent_style
    }

    pub fn null_literal(&self) -> &str {
        &self.null_literal
    }

    /// Formats `text` as a comment in this registry's language.
    pub fn comment(&self, text: &str) -> String {
        self.comment_style.comment(text)
    }
}
