//! Gradient-boosted tree ensemble over f64 features

use serde::{Deserialize, Serialize};

use super::tree::RegressionTree;
use crate::errors::{ForecastError, Result};

/// Tree-ensemble regressor trained on `log1p(sales)`.
///
/// Scoring sums every tree's leaf with the global `base_score`; outputs stay
/// on the log scale, the serving layer owns the inverse transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GbdtModel {
    pub trees: Vec<RegressionTree>,
    /// Bias added to every prediction (log scale)
    pub base_score: f64,
}

impl GbdtModel {
    pub fn new(trees: Vec<RegressionTree>, base_score: f64) -> Self {
        Self { trees, base_score }
    }

    /// Score a single assembled feature vector on the log scale.
    pub fn score(&self, features: &[f64]) -> f64 {
        self.trees
            .iter()
            .map(|tree| tree.evaluate(features))
            .sum::<f64>()
            + self.base_score
    }

    /// Validate the ensemble against the schema's feature count.
    pub fn validate(&self, feature_count: usize) -> Result<()> {
        if self.trees.is_empty() {
            return Err(ForecastError::Validation("model has no trees".to_string()));
        }
        if !self.base_score.is_finite() {
            return Err(ForecastError::Validation(
                "base score is not finite".to_string(),
            ));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(feature_count)
                .map_err(|reason| ForecastError::Validation(format!("tree {i}: {reason}")))?;
        }
        Ok(())
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }
}
