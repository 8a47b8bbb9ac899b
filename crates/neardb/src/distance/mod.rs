//! Distance metrics and scoring.
//!
//! Every index fixes one [`Metric`] at creation; queries score candidates
//! with that metric. Scores are oriented so that **larger is always
//! better**, regardless of metric:
//!
//! - cosine: similarity in `[-1, 1]`, `0.0` for zero-magnitude vectors
//! - euclidean: `1 / (1 + distance)`, mapping `[0, inf)` onto `(0, 1]`
//! - dot-product: the raw dot product, unnormalized
//!
//! Keeping one ranking direction lets the query path use a single top-K
//! selection for all metrics.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Similarity metric for scoring a query against stored vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    /// Cosine similarity.
    Cosine,
    /// Euclidean (L2) distance, exposed as `1 / (1 + d)`.
    Euclidean,
    /// Raw dot product.
    DotProduct,
}

impl Metric {
    /// Score a candidate against the query. Larger is better.
    #[inline]
    #[must_use]
    pub fn score(&self, query: &[f32], candidate: &[f32]) -> f32 {
        match self {
            Self::Cosine => cosine_similarity(query, candidate),
            Self::Euclidean => 1.0 / (1.0 + euclidean_distance(query, candidate)),
            Self::DotProduct => dot_product(query, candidate),
        }
    }

    /// The canonical wire name of the metric.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::Euclidean => "euclidean",
            Self::DotProduct => "dot-product",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cosine" => Ok(Self::Cosine),
            "euclidean" => Ok(Self::Euclidean),
            "dot-product" => Ok(Self::DotProduct),
            other => Err(EngineError::InvalidArgument(format!(
                "unsupported metric '{other}' (expected cosine, euclidean or dot-product)"
            ))),
        }
    }
}

/// Dot product of two equal-length vectors.
///
/// # Panics
///
/// Debug-panics if the vectors have different lengths.
#[inline]
#[must_use]
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimension");
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Squared Euclidean (L2) distance.
#[inline]
#[must_use]
pub fn euclidean_distance_squared(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimension");
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Euclidean (L2) distance.
#[inline]
#[must_use]
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    euclidean_distance_squared(a, b).sqrt()
}

/// L2 norm (magnitude) of a vector.
#[inline]
#[must_use]
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity in `[-1, 1]`.
///
/// Returns `0.0` if either vector has zero magnitude, so degenerate
/// zero vectors score as "no similarity" instead of producing NaN.
#[inline]
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimension");

    let dot = dot_product(a, b);
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn assert_near(a: f32, b: f32) {
        assert!((a - b).abs() < EPSILON, "assertion failed: {} !~ {}", a, b);
    }

    #[test]
    fn dot_product_basic() {
        assert_near(dot_product(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
    }

    #[test]
    fn euclidean_distance_basic() {
        assert_near(euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_near(euclidean_distance_squared(&[0.0, 0.0], &[3.0, 4.0]), 25.0);
    }

    #[test]
    fn cosine_similarity_directions() {
        assert_near(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]), 1.0);
        assert_near(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_near(cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]), -1.0);
    }

    #[test]
    fn cosine_similarity_zero_vector_is_zero() {
        let score = cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]);
        assert_eq!(score, 0.0);
        assert!(!score.is_nan());
    }

    #[test]
    fn euclidean_score_is_similarity_oriented() {
        // Identical vectors score 1.0, farther vectors score lower.
        assert_near(Metric::Euclidean.score(&[1.0, 1.0], &[1.0, 1.0]), 1.0);
        let near = Metric::Euclidean.score(&[0.0, 0.0], &[1.0, 0.0]);
        let far = Metric::Euclidean.score(&[0.0, 0.0], &[5.0, 0.0]);
        assert!(near > far);
        assert_near(near, 0.5);
    }

    #[test]
    fn dot_product_score_is_raw() {
        assert_near(Metric::DotProduct.score(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
    }

    #[test]
    fn metric_parses_wire_names() {
        assert_eq!("cosine".parse::<Metric>().unwrap(), Metric::Cosine);
        assert_eq!("euclidean".parse::<Metric>().unwrap(), Metric::Euclidean);
        assert_eq!("dot-product".parse::<Metric>().unwrap(), Metric::DotProduct);
        assert!("manhattan".parse::<Metric>().is_err());
    }

    #[test]
    fn metric_display_roundtrips() {
        for metric in [Metric::Cosine, Metric::Euclidean, Metric::DotProduct] {
            assert_eq!(metric.to_string().parse::<Metric>().unwrap(), metric);
        }
    }
}
