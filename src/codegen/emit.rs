use super::{Diagnostic, DiagnosticKind};
use crate::config::GeneratorConfig;
use crate::graph::{BlockId, BlockInstance, Graph, Port};
use crate::registry::{
    BlockContext, BlockKind, BlockShape, CodeTemplate, DataInput, Registry, quote,
};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use tracing::{trace, warn};

/// The code of one block (plus its nested scopes), tagged with the block's kind
/// so containers can partition their children.
struct Fragment {
    kind: String,
    code: String,
}

/// Walks the graph and renders blocks through their registry templates.
///
/// The emitter never fails: anything it cannot render becomes a diagnostic.
pub(super) struct Emitter<'a> {
    graph: &'a Graph,
    registry: &'a Registry,
    config: &'a GeneratorConfig,
    diagnostics: Vec<Diagnostic>,
    /// Blocks whose branch or container code is being produced right now.
    open_scopes: Vec<BlockId>,
}

impl<'a> Emitter<'a> {
    pub(super) fn new(
        graph: &'a Graph,
        registry: &'a Registry,
        config: &'a GeneratorConfig,
    ) -> Self {
        Self {
            graph,
            registry,
            config,
            diagnostics: Vec::new(),
            open_scopes: Vec::new(),
        }
    }

    pub(super) fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Emits `block` and its trunk continuation, sharing `visited` along the trunk.
    pub(super) fn emit(&mut self, block: BlockId, visited: &mut AHashSet<BlockId>) -> String {
        let mut fragments = Vec::new();
        self.collect_chain(block, visited, &mut fragments);
        join(fragments)
    }

    /// Walks the trunk from `start` with an explicit stack, so only nested
    /// slots add to the call depth. Fan-out keeps creation order.
    fn collect_chain(
        &mut self,
        start: BlockId,
        visited: &mut AHashSet<BlockId>,
        out: &mut Vec<Fragment>,
    ) {
        let graph = self.graph;
        let mut pending = vec![start];

        while let Some(id) = pending.pop() {
            if !visited.insert(id) {
                trace!(block = %id, "already emitted on this path, chain truncated");
                continue;
            }
            let Some(block) = graph.block(id) else {
                let code =
                    self.degrade(Some(id), DiagnosticKind::MissingBlock, "block does not exist");
                out.push(Fragment {
                    kind: String::new(),
                    code,
                });
                continue;
            };
            if self.open_scopes.contains(&id) {
                let code = self.degrade(
                    Some(id),
                    DiagnosticKind::FlowCycle,
                    "block is nested inside itself, cycle cut here",
                );
                out.push(Fragment {
                    kind: block.kind.clone(),
                    code,
                });
                continue;
            }

            let code = self.emit_own(block);
            out.push(Fragment {
                kind: block.kind.clone(),
                code,
            });

            pending.extend(graph.outgoing_flow(id).iter().rev().map(|c| c.to.block));
        }
    }

    /// Renders one block, including its nested slots but not its trunk continuation.
    fn emit_own(&mut self, block: &'a BlockInstance) -> String {
        let registry = self.registry;
        let Some(kind) = registry.get(&block.kind) else {
            return self.degrade(
                Some(block.id),
                DiagnosticKind::UnknownKind,
                &format!("unknown block kind '{}'", block.kind),
            );
        };

        let inputs = self.resolve_inputs(block, kind);
        let ctx = BlockContext::new(block, &inputs);

        match (kind.shape(), kind.code()) {
            (_, None) => self.degrade(
                Some(block.id),
                DiagnosticKind::MissingTemplate,
                &format!("block kind '{}' has no code template", kind.id()),
            ),
            (BlockShape::Plain, Some(CodeTemplate::Statement(render))) => render(&ctx),
            (BlockShape::Branching { slots }, Some(CodeTemplate::Nested(render))) => {
                self.open_scopes.push(block.id);
                let branches: Vec<String> = slots
                    .iter()
                    .map(|slot| join(self.emit_slot(block.id, slot)))
                    .collect();
                self.open_scopes.pop();
                render(&ctx, &branches)
            }
            (BlockShape::Container { slot, partition }, Some(CodeTemplate::Nested(render))) => {
                self.open_scopes.push(block.id);
                let children = self.emit_slot(block.id, slot);
                self.open_scopes.pop();

                let children = match partition {
                    Some(discriminator) => {
                        let (members, statements): (Vec<Fragment>, Vec<Fragment>) = children
                            .into_iter()
                            .partition(|f| discriminator.is_member(&f.kind));
                        members.into_iter().chain(statements).collect()
                    }
                    None => children,
                };
                render(&ctx, &[join(children)])
            }
            (shape, Some(_)) => self.degrade(
                Some(block.id),
                DiagnosticKind::ShapeMismatch,
                &format!(
                    "block kind '{}' has a {} shape but a template for another shape",
                    kind.id(),
                    shape_name(shape)
                ),
            ),
        }
    }

    /// Emits everything hanging off one branch slot with a fresh visited set.
    fn emit_slot(&mut self, id: BlockId, slot: &str) -> Vec<Fragment> {
        let graph = self.graph;
        let mut visited = AHashSet::new();
        let mut fragments = Vec::new();
        for connection in graph.outgoing_branch(id, slot) {
            self.collect_chain(connection.to.block, &mut visited, &mut fragments);
        }
        fragments
    }

    /// Resolves every declared data input of `block` on a fresh resolution path.
    fn resolve_inputs(
        &mut self,
        block: &BlockInstance,
        kind: &BlockKind,
    ) -> AHashMap<String, String> {
        let mut path = AHashSet::new();
        path.insert(block.id);
        self.resolve_inputs_on_path(block, kind, &mut path)
    }

    fn resolve_inputs_on_path(
        &mut self,
        block: &BlockInstance,
        kind: &BlockKind,
        path: &mut AHashSet<BlockId>,
    ) -> AHashMap<String, String> {
        let graph = self.graph;
        kind.data_inputs()
            .iter()
            .map(|input| {
                let port = Port::data_in(block.id, &input.name);
                let value = match graph.occupant(&port) {
                    Some(connection) => self.producer_value(connection.from.block, path),
                    None => literal_fallback(block, input),
                };
                (input.name.clone(), value)
            })
            .collect()
    }

    /// The expression a producer contributes to a data input. Cycles, unknown
    /// kinds and kinds without a value template degrade to the null literal.
    fn producer_value(&mut self, id: BlockId, path: &mut AHashSet<BlockId>) -> String {
        let graph = self.graph;
        let registry = self.registry;
        let null = registry.null_literal().to_string();

        if !path.insert(id) {
            self.report(Some(id), DiagnosticKind::DataCycle, "data inputs form a cycle");
            return null;
        }

        let value = match graph.block(id) {
            None => {
                self.report(Some(id), DiagnosticKind::MissingBlock, "producer does not exist");
                null
            }
            Some(producer) => match registry.get(&producer.kind) {
                None => {
                    self.report(
                        Some(id),
                        DiagnosticKind::UnknownKind,
                        &format!("unknown producer kind '{}'", producer.kind),
                    );
                    null
                }
                Some(kind) => {
                    let inputs = self.resolve_inputs_on_path(producer, kind, path);
                    let ctx = BlockContext::new(producer, &inputs);
                    match kind.render_value(&ctx) {
                        Some(value) => value,
                        None => {
                            self.report(
                                Some(id),
                                DiagnosticKind::MissingValue,
                                &format!("block kind '{}' does not produce a value", kind.id()),
                            );
                            null
                        }
                    }
                }
            },
        };

        path.remove(&id);
        value
    }

    /// Records a diagnostic and returns the inline comment that replaces the fragment.
    fn degrade(&mut self, block: Option<BlockId>, kind: DiagnosticKind, message: &str) -> String {
        self.report(block, kind, message);
        if self.config.inline_diagnostics {
            let text = match block {
                Some(id) => format!("[{}] block {}: {}", kind, id, message),
                None => format!("[{}] {}", kind, message),
            };
            self.registry.comment(&text)
        } else {
            String::new()
        }
    }

    fn report(&mut self, block: Option<BlockId>, kind: DiagnosticKind, message: &str) {
        warn!(block = ?block, %kind, "{}", message);
        self.diagnostics.push(Diagnostic {
            block,
            kind,
            message: message.to_string(),
        });
    }
}

/// Field text for an unconnected input, or the input's declared default.
fn literal_fallback(block: &BlockInstance, input: &DataInput) -> String {
    let text = input
        .field
        .as_deref()
        .and_then(|field| block.field(field))
        .filter(|value| !value.is_blank())
        .map(|value| value.as_text());

    match text {
        Some(text) if input.quoted => quote(&text),
        Some(text) => text,
        None => input.default.clone(),
    }
}

fn join(fragments: Vec<Fragment>) -> String {
    fragments
        .into_iter()
        .map(|f| f.code)
        .filter(|code| !code.trim().is_empty())
        .join("\n")
}

fn shape_name(shape: &BlockShape) -> &'static str {
    match shape {
        BlockShape::Plain => "plain",
        BlockShape::Branching { .. } => "branching",
        BlockShape::Container { .. } => "container",
    }
}
