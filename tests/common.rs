//! Common test utilities for building registries and graphs.
use kumiki::prelude::*;
use kumiki::registry::CodeTemplate;

/// The bundled JavaScript block set.
#[allow(dead_code)]
pub fn javascript() -> Registry {
    BlockSet::JavaScript
        .load()
        .expect("bundled javascript block set must load")
}

/// Adds a block and returns its id, panicking on failure.
#[allow(dead_code)]
pub fn add(graph: &mut Graph, registry: &Registry, kind: &str) -> BlockId {
    graph
        .add_block(registry, kind, Position::default())
        .unwrap_or_else(|e| panic!("failed to add '{}': {}", kind, e))
        .id
}

/// Adds a block and sets one field on it.
#[allow(dead_code)]
pub fn add_with(
    graph: &mut Graph,
    registry: &Registry,
    kind: &str,
    field: &str,
    value: &str,
) -> BlockId {
    let id = add(graph, registry, kind);
    graph.set_field(id, field, value).unwrap();
    id
}

/// Connects `from.next` to `to.in`.
#[allow(dead_code)]
pub fn then(graph: &mut Graph, registry: &Registry, from: BlockId, to: BlockId) -> ConnectionId {
    graph
        .connect(registry, Port::next(from), Port::flow_in(to))
        .unwrap()
        .id
}

/// Connects the branch slot `slot` of `from` to `to.in`.
#[allow(dead_code)]
pub fn nest(
    graph: &mut Graph,
    registry: &Registry,
    from: BlockId,
    slot: &str,
    to: BlockId,
) -> ConnectionId {
    graph
        .connect(registry, Port::branch(from, slot), Port::flow_in(to))
        .unwrap()
        .id
}

/// Connects a data output to a data input.
#[allow(dead_code)]
pub fn feed(
    graph: &mut Graph,
    registry: &Registry,
    producer: BlockId,
    output: &str,
    consumer: BlockId,
    input: &str,
) -> ConnectionId {
    graph
        .connect(
            registry,
            Port::data_out(producer, output),
            Port::data_in(consumer, input),
        )
        .unwrap()
        .id
}

/// A small registry for exercising generator degradations.
///
/// `silent` has no template, `broken` is branching with a statement template,
/// and `sensor` declares a data output but no value template.
#[allow(dead_code)]
pub fn degraded_registry() -> Registry {
    Registry::new("degraded")
        .with_kind(
            BlockKind::builder("start")
                .flow_out()
                .statement(|_| "// begin".to_string())
                .build(),
        )
        .and_then(|r| {
            r.with_kind(
                BlockKind::builder("log")
                    .sequential()
                    .field("message", "")
                    .data_input(DataInput::new("message").quoted().default("\"\""))
                    .statement(|b| format!("log({});", b.input("message")))
                    .build(),
            )
        })
        .and_then(|r| r.with_kind(BlockKind::builder("silent").sequential().build()))
        .and_then(|r| {
            r.with_kind(
                BlockKind::builder("broken")
                    .sequential()
                    .branch("body")
                    .statement(|_| "broken();".to_string())
                    .build(),
            )
        })
        .and_then(|r| {
            r.with_kind(
                BlockKind::builder("sensor")
                    .data_output("value")
                    .build(),
            )
        })
        .expect("degraded registry must build")
}

/// Every In port of the graph has at most one incoming connection.
#[allow(dead_code)]
pub fn assert_single_occupancy(graph: &Graph) {
    for connection in graph.connections() {
        let incoming = graph.connections_to(&connection.to).count();
        assert_eq!(
            incoming, 1,
            "port {} has {} incoming connections",
            connection.to, incoming
        );
    }
}

#[allow(dead_code)]
pub fn is_nested(template: Option<&CodeTemplate>) -> bool {
    matches!(template, Some(CodeTemplate::Nested(_)))
}
