use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    /// A game identifier would break the quoting of the written graph.
    #[error("game identifier contains a double-quote character: {game}")]
    UnsafeIdentifier { game: String },

    #[error("invalid game url: {0}")]
    InvalidGameUrl(String),

    #[error("no {} directory in input path", .0.display())]
    MissingDirectory(PathBuf),

    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("too many distinct commenters: {0} ids already assigned")]
    TooManyCommenters(usize),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, GraphError>;
