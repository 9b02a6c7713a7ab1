use std::io::Write;

use clap::ValueEnum;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::assembler::Edge;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Undirected graphviz graph
    #[default]
    Dot,
    /// `source,target,weight` edge list
    Csv,
}

pub fn write_graph<W: Write>(edges: &[Edge<'_>], format: OutputFormat, out: W) -> Result<()> {
    match format {
        OutputFormat::Dot => export_to_graphviz(edges, out),
        OutputFormat::Csv => export_to_csv(edges, out),
    }
}

/// Builds an undirected petgraph graph holding the games that appear in `edges`.
pub fn to_petgraph<'a>(edges: &[Edge<'a>]) -> UnGraph<&'a str, f32> {
    let mut graph = UnGraph::<&str, f32>::new_undirected();
    let mut nodes: FxHashMap<&str, NodeIndex> = FxHashMap::default();

    for edge in edges {
        let a = *nodes
            .entry(edge.source)
            .or_insert_with(|| graph.add_node(edge.source));
        let b = *nodes
            .entry(edge.target)
            .or_insert_with(|| graph.add_node(edge.target));
        graph.add_edge(a, b, edge.weight);
    }

    graph
}

pub fn export_to_graphviz<W: Write>(edges: &[Edge<'_>], mut out: W) -> Result<()> {
    let graph = to_petgraph(edges);
    let viz = Dot::with_attr_getters(
        &graph,
        &[Config::EdgeNoLabel, Config::NodeNoLabel],
        &|_, edge| format!("weight={}", edge.weight()),
        &|_, (_, game)| format!("label=\"{}\"", game),
    );

    writeln!(out, "{:?}", viz)?;
    out.flush()?;
    Ok(())
}

pub fn export_to_csv<W: Write>(edges: &[Edge<'_>], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for edge in edges {
        writer.serialize(edge)?;
    }
    writer.flush()?;
    Ok(())
}
