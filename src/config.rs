use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};
use crate::similarity::SimilarityMethod;

/// Parameters of a graph generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Minimum number of commenters for a game to become a node.
    pub node_threshold: usize,
    /// Minimum weight for a pair to become an edge.
    pub edge_threshold: f32,
    pub method: SimilarityMethod,
    /// Worker threads for pair evaluation; 0 uses the rayon default.
    pub threads: usize,
    /// Pairs between progress lines; 0 disables progress logging.
    pub progress_interval: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            node_threshold: 1,
            edge_threshold: 0.0,
            method: SimilarityMethod::Jaccard,
            threads: 0,
            progress_interval: 500_000,
        }
    }
}

impl GraphConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|source| GraphError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !self.edge_threshold.is_finite() || !(0.0..=1.0).contains(&self.edge_threshold) {
            return Err(GraphError::InvalidConfig(format!(
                "edge threshold must be in [0, 1], got {}",
                self.edge_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GraphConfig =
            serde_json::from_str(r#"{"edge_threshold": 0.25, "method": "overlap_coefficient"}"#)
                .unwrap();
        assert_eq!(config.edge_threshold, 0.25);
        assert_eq!(config.method, SimilarityMethod::OverlapCoefficient);
        assert_eq!(config.node_threshold, 1);
        assert_eq!(config.progress_interval, 500_000);
    }

    #[test]
    fn test_validate_edge_threshold() {
        let mut config = GraphConfig::default();
        assert!(config.validate().is_ok());

        config.edge_threshold = 1.0;
        assert!(config.validate().is_ok());

        config.edge_threshold = 1.5;
        assert!(matches!(config.validate(), Err(GraphError::InvalidConfig(_))));

        config.edge_threshold = f32::NAN;
        assert!(config.validate().is_err());

        config.edge_threshold = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"node_threshold": 5, "threads": 2}"#).unwrap();

        let config = GraphConfig::from_json_file(&path).unwrap();
        assert_eq!(config.node_threshold, 5);
        assert_eq!(config.threads, 2);

        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            GraphConfig::from_json_file(&path),
            Err(GraphError::Json { .. })
        ));
    }
}
