//! Code generation: walks the graph from its entry points and assembles one
//! formatted document from the registry's templates.
//!
//! Generation never fails. A graph under construction is the normal state of
//! an editor, so anything that cannot be rendered is replaced by an inline
//! diagnostic comment (or the registry's null literal inside an expression)
//! and reported in [`GenerationResult::diagnostics`].

use crate::config::GeneratorConfig;
use crate::graph::{BlockId, Graph};
use crate::registry::Registry;
use ahash::AHashSet;
use std::fmt;
use tracing::{debug, info};

mod emit;
pub mod format;

use emit::Emitter;

/// What went wrong while rendering one part of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A block's kind is not in the registry.
    UnknownKind,
    /// A kind has no code template for statement emission.
    MissingTemplate,
    /// A kind's template does not match its declared shape.
    ShapeMismatch,
    /// A connected producer has no value template.
    MissingValue,
    /// A block was reached again from inside its own nested scope.
    FlowCycle,
    /// Data inputs depend on each other in a cycle.
    DataCycle,
    /// A connection points at a block that does not exist.
    MissingBlock,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::UnknownKind => "unknown-kind",
            DiagnosticKind::MissingTemplate => "missing-template",
            DiagnosticKind::ShapeMismatch => "shape-mismatch",
            DiagnosticKind::MissingValue => "missing-value",
            DiagnosticKind::FlowCycle => "flow-cycle",
            DiagnosticKind::DataCycle => "data-cycle",
            DiagnosticKind::MissingBlock => "missing-block",
        };
        f.write_str(name)
    }
}

/// A generation-time degradation. Never raised, only reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub block: Option<BlockId>,
    pub kind: DiagnosticKind,
    pub message: String,
}

/// The output of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub text: String,
    /// `false` when the graph had no entry point; `text` then only holds a comment.
    pub had_entry_point: bool,
    pub diagnostics: Vec<Diagnostic>,
}

/// Generates code for `graph` with the default generator settings.
pub fn generate(graph: &Graph, registry: &Registry) -> GenerationResult {
    Generator::new(registry).generate(graph)
}

/// A code generator bound to one registry.
pub struct Generator<'r> {
    registry: &'r Registry,
    config: GeneratorConfig,
}

pub struct GeneratorBuilder<'r> {
    registry: &'r Registry,
    config: GeneratorConfig,
}

impl<'r> GeneratorBuilder<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            config: GeneratorConfig::default(),
        }
    }

    pub fn config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn indent(mut self, unit: &str) -> Self {
        self.config.indent = unit.to_string();
        self
    }

    pub fn entry_separator(mut self, text: &str) -> Self {
        self.config.entry_separator = text.to_string();
        self
    }

    pub fn inline_diagnostics(mut self, enabled: bool) -> Self {
        self.config.inline_diagnostics = enabled;
        self
    }

    pub fn build(self) -> Generator<'r> {
        Generator {
            registry: self.registry,
            config: self.config,
        }
    }
}

impl<'r> Generator<'r> {
    pub fn builder(registry: &'r Registry) -> GeneratorBuilder<'r> {
        GeneratorBuilder::new(registry)
    }

    pub fn new(registry: &'r Registry) -> Self {
        GeneratorBuilder::new(registry).build()
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Entry points: blocks of the registry's entry kind with no incoming flow,
    /// in creation order.
    pub fn entry_points(&self, graph: &Graph) -> Vec<BlockId> {
        graph
            .blocks_by_kind(self.registry.entry_kind())
            .filter(|b| graph.incoming_flow(b.id).is_none())
            .map(|b| b.id)
            .collect()
    }

    /// Generates the whole document.
    pub fn generate(&self, graph: &Graph) -> GenerationResult {
        let entries = self.entry_points(graph);
        if entries.is_empty() {
            info!(blocks = graph.len(), "no entry point, nothing to generate");
            return GenerationResult {
                text: format!("{}\n", self.registry.comment(&self.config.empty_message)),
                had_entry_point: false,
                diagnostics: Vec::new(),
            };
        }

        let mut emitter = Emitter::new(graph, self.registry, &self.config);
        let sections: Vec<String> = entries
            .iter()
            .map(|entry| {
                debug!(entry = %entry, "emitting entry point");
                let mut visited = AHashSet::new();
                emitter.emit(*entry, &mut visited)
            })
            .collect();

        let separator = format!(
            "\n\n{}\n\n",
            self.registry.comment(&self.config.entry_separator)
        );
        let text = format::reindent(
            &sections.join(&separator),
            self.registry.indent_style(),
            &self.config.indent,
        );
        let diagnostics = emitter.into_diagnostics();

        info!(
            registry = self.registry.name(),
            entries = entries.len(),
            bytes = text.len(),
            diagnostics = diagnostics.len(),
            "code generated"
        );
        GenerationResult {
            text,
            had_entry_point: true,
            diagnostics,
        }
    }

    /// Emits the chain starting at `block` on its own, unformatted. Useful for
    /// previews of a single block stack.
    pub fn emit_from(&self, graph: &Graph, block: BlockId) -> (String, Vec<Diagnostic>) {
        let mut emitter = Emitter::new(graph, self.registry, &self.config);
        let mut visited = AHashSet::new();
        let code = emitter.emit(block, &mut visited);
        (code, emitter.into_diagnostics())
    }
}
