//! Similarity graph of itch.io games built from the people commenting on them.
//!
//! Two games are linked when they share commenters; the edge weight is the
//! Jaccard index or the overlap coefficient of their commenter sets.

pub mod assembler;
pub mod config;
pub mod error;
pub mod export;
pub mod index;
pub mod ingest;
pub mod interner;
pub mod similarity;

pub use assembler::{generate, Edge, GeneratedGraph, GenerationStats};
pub use config::GraphConfig;
pub use error::{GraphError, Result};
pub use export::{write_graph, OutputFormat};
pub use index::{CommenterIndex, CommenterIndexBuilder};
pub use interner::{CommenterId, CommenterInterner};
pub use similarity::SimilarityMethod;
