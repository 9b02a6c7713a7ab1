//! Pairwise similarity over every game that passes the node threshold.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::GraphConfig;
use crate::error::Result;
use crate::index::{validate_game_id, CommenterIndex, GameEntry};
use crate::similarity::{intersection_size, weight, SimilarityMethod};

/// Undirected weighted edge between two games, `source < target`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Edge<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub weight: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Games that passed the node threshold.
    pub nodes: usize,
    /// Pairs evaluated.
    pub pairs: u64,
    /// Pairs that passed the edge threshold.
    pub edges: usize,
}

#[derive(Debug, Clone)]
pub struct GeneratedGraph<'a> {
    pub edges: Vec<Edge<'a>>,
    pub stats: GenerationStats,
}

/// Number of unordered pairs among `n` nodes.
pub fn pair_count(n: usize) -> u64 {
    let n = n as u64;
    n * n.saturating_sub(1) / 2
}

/// Games with at least `node_threshold` commenters, in index order.
///
/// Fails on the first selected game whose identifier cannot be written out.
pub fn select_games(index: &CommenterIndex, node_threshold: usize) -> Result<Vec<&GameEntry>> {
    let mut selected = Vec::new();
    for game in index.games() {
        if game.commenter_count() < node_threshold {
            continue;
        }
        validate_game_id(&game.id)?;
        selected.push(game);
    }
    Ok(selected)
}

struct Progress {
    done: AtomicU64,
    total: u64,
    interval: u64,
}

impl Progress {
    fn new(total: u64, interval: u64) -> Self {
        Self {
            done: AtomicU64::new(0),
            total,
            interval,
        }
    }

    fn advance(&self, pairs: u64) {
        if pairs == 0 {
            return;
        }
        let before = self.done.fetch_add(pairs, Ordering::Relaxed);
        if self.interval == 0 {
            return;
        }
        let after = before + pairs;
        if before / self.interval != after / self.interval {
            info!(
                "Progress: {:.1}% ({}/{} pairs)",
                after as f64 / self.total as f64 * 100.0,
                after,
                self.total
            );
        }
    }

    fn done(&self) -> u64 {
        self.done.load(Ordering::Relaxed)
    }
}

/// Builds the similarity graph of `index`.
///
/// Edges come out in lexicographic pair order regardless of the number of
/// worker threads. Nothing is returned if any selected game id is unsafe.
pub fn generate<'a>(index: &'a CommenterIndex, config: &GraphConfig) -> Result<GeneratedGraph<'a>> {
    config.validate()?;

    let games = select_games(index, config.node_threshold)?;
    let total = pair_count(games.len());
    info!(
        nodes = games.len(),
        pairs = total,
        method = %config.method,
        "Creating graph"
    );

    let start = Instant::now();
    let progress = Progress::new(total, config.progress_interval);
    let rows = if config.threads > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()?;
        pool.install(|| evaluate_rows(&games, config, &progress))
    } else {
        evaluate_rows(&games, config, &progress)
    };

    let edges: Vec<Edge<'a>> = rows.into_iter().flatten().collect();
    let stats = GenerationStats {
        nodes: games.len(),
        pairs: progress.done(),
        edges: edges.len(),
    };
    debug!(elapsed = ?start.elapsed(), "pair evaluation finished");
    info!(edges = stats.edges, "Graph created");

    Ok(GeneratedGraph { edges, stats })
}

fn evaluate_rows<'a>(
    games: &[&'a GameEntry],
    config: &GraphConfig,
    progress: &Progress,
) -> Vec<Vec<Edge<'a>>> {
    (0..games.len())
        .into_par_iter()
        .map(|i| {
            let row = evaluate_row(games, i, config.method, config.edge_threshold);
            progress.advance((games.len() - i - 1) as u64);
            row
        })
        .collect()
}

/// Pairs `(i, j)` for every `j > i`.
fn evaluate_row<'a>(
    games: &[&'a GameEntry],
    i: usize,
    method: SimilarityMethod,
    edge_threshold: f32,
) -> Vec<Edge<'a>> {
    let a = games[i];
    let mut edges = Vec::new();

    for b in &games[i + 1..] {
        let shared = intersection_size(&a.commenters, &b.commenters);
        let w = weight(shared, a.commenter_count(), b.commenter_count(), method);
        if w < edge_threshold {
            continue;
        }
        edges.push(Edge {
            source: &a.id,
            target: &b.id,
            weight: w,
        });
    }

    edges
}
