use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::index::CommenterSet;

/// How the overlap of two commenter sets becomes an edge weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMethod {
    /// |A ∩ B| / |A ∪ B|
    #[default]
    Jaccard,
    /// |A ∩ B| / min(|A|, |B|)
    #[value(name = "overlap_coefficient", alias = "overlap-coefficient")]
    OverlapCoefficient,
}

impl fmt::Display for SimilarityMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimilarityMethod::Jaccard => write!(f, "jaccard"),
            SimilarityMethod::OverlapCoefficient => write!(f, "overlap_coefficient"),
        }
    }
}

/// Counts the commenters shared by both sets.
///
/// Walks the smaller set and probes the larger one, so the cost is
/// `min(|a|, |b|)` lookups.
pub fn intersection_size(a: &CommenterSet, b: &CommenterSet) -> usize {
    let (small, big) = if a.len() > b.len() { (b, a) } else { (a, b) };
    small.iter().filter(|id| big.contains(id)).count()
}

/// Weight of a pair from its precomputed intersection.
///
/// A zero denominator (both sets empty for Jaccard, either set empty for the
/// overlap coefficient) yields `0.0`.
pub fn weight(intersection: usize, len_a: usize, len_b: usize, method: SimilarityMethod) -> f32 {
    let denominator = match method {
        SimilarityMethod::Jaccard => len_a + len_b - intersection,
        SimilarityMethod::OverlapCoefficient => len_a.min(len_b),
    };

    if denominator == 0 {
        return 0.0;
    }
    (intersection as f64 / denominator as f64) as f32
}

pub fn similarity(a: &CommenterSet, b: &CommenterSet, method: SimilarityMethod) -> f32 {
    weight(intersection_size(a, b), a.len(), b.len(), method)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[u32]) -> CommenterSet {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_intersection_size() {
        let a = set(&[1, 2, 3]);
        let b = set(&[2, 3, 4, 5, 6]);
        assert_eq!(intersection_size(&a, &b), 2);
        assert_eq!(intersection_size(&b, &a), 2);
        assert_eq!(intersection_size(&a, &a), 3);
        assert_eq!(intersection_size(&a, &set(&[])), 0);
    }

    #[test]
    fn test_jaccard() {
        let a = set(&[1, 2, 3]);
        let b = set(&[2, 3, 4]);
        assert_eq!(similarity(&a, &b, SimilarityMethod::Jaccard), 0.5);
        assert_eq!(similarity(&a, &a, SimilarityMethod::Jaccard), 1.0);
        assert_eq!(similarity(&a, &set(&[5]), SimilarityMethod::Jaccard), 0.0);
    }

    #[test]
    fn test_overlap_coefficient() {
        let a = set(&[1, 2, 3]);
        let b = set(&[2, 3, 4]);
        let w = similarity(&a, &b, SimilarityMethod::OverlapCoefficient);
        assert!((w - 2.0 / 3.0).abs() < 1e-6);

        // a subset always scores 1
        let sub = set(&[2]);
        assert_eq!(similarity(&a, &sub, SimilarityMethod::OverlapCoefficient), 1.0);
    }

    #[test]
    fn test_empty_sets_score_zero() {
        let empty = set(&[]);
        let a = set(&[1]);
        for method in [SimilarityMethod::Jaccard, SimilarityMethod::OverlapCoefficient] {
            assert_eq!(similarity(&empty, &empty, method), 0.0);
            assert_eq!(similarity(&empty, &a, method), 0.0);
        }
    }

    #[test]
    fn test_method_names() {
        assert_eq!(SimilarityMethod::OverlapCoefficient.to_string(), "overlap_coefficient");
        let parsed: SimilarityMethod = serde_json::from_str("\"overlap_coefficient\"").unwrap();
        assert_eq!(parsed, SimilarityMethod::OverlapCoefficient);
        assert_eq!(
            <SimilarityMethod as ValueEnum>::from_str("jaccard", false).unwrap(),
            SimilarityMethod::Jaccard
        );
    }
}
