use clap::Parser;
use kumiki::prelude::*;
use std::fs;
use std::time::Instant;
use tracing::{Level, warn};

/// Generate source code from a saved block graph document
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the graph document JSON file
    document_path: String,

    /// Block set to generate with (defaults to the one named in the document)
    #[arg(short, long)]
    block_set: Option<String>,

    /// Optional path to an editor config JSON file
    #[arg(short, long)]
    config: Option<String>,

    /// Write the generated code to this file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Indent width in spaces (overrides the config)
    #[arg(long)]
    indent: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let total_start = Instant::now();

    // --- 1. Loading ---
    let json = fs::read_to_string(&cli.document_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read document '{}': {}",
            &cli.document_path, e
        ))
    });
    let document = GraphDocument::from_json_str(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse document: {}", e)));

    let config = match &cli.config {
        Some(path) => EditorConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => EditorConfig::default(),
    };

    let block_set_name = cli.block_set.as_deref().unwrap_or(&document.block_set);
    let registry = block_set_name
        .parse::<BlockSet>()
        .and_then(|set| set.load())
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load block set: {}", e)));

    // --- 2. Restoring ---
    let graph = document
        .into_graph(&registry)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to restore graph: {}", e)));
    let load_duration = total_start.elapsed();

    // --- 3. Generation ---
    let mut builder = Generator::builder(&registry).config(config.generator);
    if let Some(width) = cli.indent {
        builder = builder.indent(&" ".repeat(width));
    }
    let generator = builder.build();

    let generate_start = Instant::now();
    let result = generator.generate(&graph);
    let generate_duration = generate_start.elapsed();

    for diagnostic in &result.diagnostics {
        match diagnostic.block {
            Some(block) => warn!(%block, kind = %diagnostic.kind, "{}", diagnostic.message),
            None => warn!(kind = %diagnostic.kind, "{}", diagnostic.message),
        }
    }
    if !result.had_entry_point {
        warn!("graph has no entry point");
    }

    // --- 4. Output ---
    match &cli.output {
        Some(path) => {
            fs::write(path, &result.text).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write output '{}': {}", path, e))
            });
            eprintln!("Generated code written to '{}'", path);
        }
        None => print!("{}", result.text),
    }

    eprintln!("\n--- Generation Summary ---");
    eprintln!("Block Set:        {}", registry.name());
    eprintln!("Blocks:           {}", graph.len());
    eprintln!("Connections:      {}", graph.connection_count());
    eprintln!("Diagnostics:      {}", result.diagnostics.len());
    eprintln!("Loading:          {:?}", load_duration);
    eprintln!("Generation:       {:?}", generate_duration);
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
