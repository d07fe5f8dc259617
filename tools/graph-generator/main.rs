use clap::Parser;
use kumiki::graph::{BlockId, Graph, Port, Position};
use kumiki::prelude::{BlockSet, GraphDocument, Registry, ViewTransform};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::fs;

/// A CLI tool to generate random JavaScript block graphs for stress runs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated graph document to
    #[arg(short, long, default_value = "generated_graph.json")]
    output: String,

    /// Approximate number of statement blocks to place
    #[arg(long, default_value_t = 200)]
    blocks: usize,

    /// Number of start blocks
    #[arg(long, default_value_t = 1)]
    entries: usize,

    /// Seed for reproducible graphs (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Also wire data cycles and a detached flow cycle into the graph
    #[arg(long)]
    cycles: bool,
}

const MAX_DEPTH: usize = 4;

/// Pools of kind ids, collected once from the registry.
struct KindPools {
    statements: Vec<String>,
    producers: Vec<String>,
}

impl KindPools {
    fn from_registry(registry: &Registry) -> Self {
        let statements = registry
            .kinds()
            .filter(|k| k.id() != registry.entry_kind() && k.has_flow_in() && k.code().is_some())
            .map(|k| k.id().to_string())
            .collect();
        let producers = registry
            .kinds()
            .filter(|k| k.is_producer())
            .map(|k| k.id().to_string())
            .collect();
        Self {
            statements,
            producers,
        }
    }
}

struct GraphBuilder<'r> {
    registry: &'r Registry,
    graph: Graph,
    rng: StdRng,
    pools: KindPools,
    remaining: usize,
    placed: usize,
}

impl<'r> GraphBuilder<'r> {
    fn new(registry: &'r Registry, rng: StdRng) -> Self {
        Self {
            registry,
            graph: Graph::new(),
            rng,
            pools: KindPools::from_registry(registry),
            remaining: 0,
            placed: 0,
        }
    }

    fn place(&mut self, kind: &str, depth: usize) -> Result<BlockId, Box<dyn std::error::Error>> {
        let position = Position::new(
            40.0 + depth as f64 * 60.0,
            40.0 + self.placed as f64 * 48.0,
        );
        self.placed += 1;
        Ok(self.graph.add_block(self.registry, kind, position)?.id)
    }

    /// Grows a statement chain hanging off `parent`, nesting into branch slots.
    fn grow_chain(
        &mut self,
        mut parent: Port,
        depth: usize,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let length = self.rng.random_range(1..=6);
        for _ in 0..length {
            if self.remaining == 0 {
                break;
            }
            self.remaining -= 1;

            let Some(kind) = self.pools.statements.choose(&mut self.rng).cloned() else {
                break;
            };
            let id = self.place(&kind, depth)?;
            self.graph.connect(self.registry, parent, Port::flow_in(id))?;
            self.feed_inputs(id, &kind, depth, 0)?;

            let (slots, has_next) = match self.registry.get(&kind) {
                Some(definition) => (
                    definition
                        .shape()
                        .slots()
                        .into_iter()
                        .map(str::to_string)
                        .collect::<Vec<_>>(),
                    definition.has_flow_out(),
                ),
                None => (Vec::new(), false),
            };
            if depth < MAX_DEPTH {
                for slot in slots {
                    if self.rng.random_bool(0.7) {
                        self.grow_chain(Port::branch(id, &slot), depth + 1)?;
                    }
                }
            }
            if !has_next {
                break;
            }
            parent = Port::next(id);
        }
        Ok(())
    }

    /// Connects random producers to some of the data inputs of `id`.
    fn feed_inputs(
        &mut self,
        id: BlockId,
        kind: &str,
        depth: usize,
        nesting: usize,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let inputs: Vec<String> = self
            .registry
            .get(kind)
            .map(|k| k.data_inputs().iter().map(|i| i.name.clone()).collect())
            .unwrap_or_default();

        for input in inputs {
            if nesting >= 2 || !self.rng.random_bool(0.4) {
                continue;
            }
            let Some(producer_kind) = self.pools.producers.choose(&mut self.rng).cloned() else {
                continue;
            };
            let producer = self.place(&producer_kind, depth + 1)?;
            let output = self.first_output(&producer_kind);
            self.graph.connect(
                self.registry,
                Port::data_out(producer, &output),
                Port::data_in(id, &input),
            )?;
            self.feed_inputs(producer, &producer_kind, depth + 1, nesting + 1)?;
        }
        Ok(())
    }

    fn first_output(&self, kind: &str) -> String {
        self.registry
            .get(kind)
            .and_then(|k| k.data_outputs().first().cloned())
            .unwrap_or_else(|| "value".to_string())
    }

    /// Two `not` blocks feeding each other, consumed by a fresh `if_condition`,
    /// plus a detached pair of statements whose flow runs in a circle.
    fn add_cycles(&mut self, after: Port) -> Result<(), Box<dyn std::error::Error>> {
        let branch = self.place("if_condition", 0)?;
        self.graph.connect(self.registry, after, Port::flow_in(branch))?;
        let first = self.place("not", 1)?;
        let second = self.place("not", 1)?;
        self.graph.connect(
            self.registry,
            Port::data_out(first, "result"),
            Port::data_in(branch, "condition"),
        )?;
        self.graph.connect(
            self.registry,
            Port::data_out(first, "result"),
            Port::data_in(second, "value"),
        )?;
        self.graph.connect(
            self.registry,
            Port::data_out(second, "result"),
            Port::data_in(first, "value"),
        )?;

        let a = self.place("comment", 0)?;
        let b = self.place("comment", 0)?;
        self.graph.connect(self.registry, Port::next(a), Port::flow_in(b))?;
        self.graph.connect(self.registry, Port::next(b), Port::flow_in(a))?;
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    if cli.entries == 0 {
        eprintln!("Error: --entries must be at least 1");
        std::process::exit(1);
    }

    println!(
        "Generating a graph with ~{} blocks across {} entry point(s)...",
        cli.blocks, cli.entries
    );

    let registry = BlockSet::JavaScript.load()?;
    let mut builder = GraphBuilder::new(&registry, rng);
    let per_entry = cli.blocks.div_ceil(cli.entries);

    let mut left = cli.blocks;
    let mut first_start = None;
    for _ in 0..cli.entries {
        let start = builder.place(registry.entry_kind(), 0)?;
        first_start.get_or_insert(start);
        builder.remaining = left.min(per_entry);
        let granted = builder.remaining;
        builder.grow_chain(Port::next(start), 1)?;
        left -= granted - builder.remaining;
    }

    if cli.cycles {
        if let Some(start) = first_start {
            builder.add_cycles(Port::next(start))?;
        }
        println!("-> Added a data cycle and a detached flow cycle.");
    }

    let graph = builder.graph;
    println!(
        "-> Placed {} blocks and {} connections.",
        graph.len(),
        graph.connection_count()
    );

    let document = GraphDocument::new(
        BlockSet::JavaScript.name(),
        &graph,
        ViewTransform::default(),
    );
    fs::write(&cli.output, document.to_json_string()?)?;

    println!("Successfully saved graph document to '{}'", cli.output);
    Ok(())
}
