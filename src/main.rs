use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use itch_graph::{
    generate, ingest, write_graph, CommenterIndexBuilder, GraphConfig, OutputFormat,
    SimilarityMethod,
};

#[derive(Parser, Debug)]
#[command(name = "itch-graph", about = "Build a game similarity graph from shared commenters")]
struct Cli {
    /// Directory holding the `games/` and `users/` comment dumps
    input: PathBuf,
    /// Minimum number of commenters for a game to be a node
    #[arg(long)]
    node_threshold: Option<usize>,
    /// Minimum similarity for a pair to be an edge
    #[arg(long)]
    edge_threshold: Option<f32>,
    #[arg(long, value_enum)]
    method: Option<SimilarityMethod>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Dot)]
    format: OutputFormat,
    /// Write the graph here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// JSON file with generation settings; flags override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Worker threads for pair evaluation (0 = one per core)
    #[arg(long)]
    threads: Option<usize>,
}

impl Cli {
    fn graph_config(&self) -> anyhow::Result<GraphConfig> {
        let mut config = match &self.config {
            Some(path) => GraphConfig::from_json_file(path)?,
            None => GraphConfig::default(),
        };
        if let Some(n) = self.node_threshold {
            config.node_threshold = n;
        }
        if let Some(w) = self.edge_threshold {
            config.edge_threshold = w;
        }
        if let Some(method) = self.method {
            config.method = method;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.graph_config()?;
    info!(?config, "Using config");

    let time_start = Instant::now();
    info!("Loading commenters");
    let mut builder = CommenterIndexBuilder::new();
    ingest::load_commenters(&cli.input, &mut builder)?;
    let index = builder.seal();
    info!(
        games = index.game_count(),
        commenters = index.distinct_commenters(),
        "Index sealed"
    );

    let time_loaded = Instant::now();
    let graph = generate(&index, &config)?;
    let time_end = Instant::now();

    match &cli.output {
        Some(path) => write_graph(&graph.edges, cli.format, BufWriter::new(File::create(path)?))?,
        None => write_graph(&graph.edges, cli.format, BufWriter::new(io::stdout().lock()))?,
    }

    info!(
        "Loading comments: {:.3}s",
        (time_loaded - time_start).as_secs_f64()
    );
    info!(
        "Calculating edges: {:.3}s",
        (time_end - time_loaded).as_secs_f64()
    );
    Ok(())
}
