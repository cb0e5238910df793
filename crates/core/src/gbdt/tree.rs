//! Regression tree storage and traversal
//!
//! Trees are flat node arrays with node 0 as the root. Internal nodes route a
//! sample left when `features[feature] < threshold`, matching the exporter's
//! split convention; leaves carry their prediction in `value`.

use serde::{Deserialize, Serialize};

/// A single tree node. Leaves have `value = Some(_)` and -1 child indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Split feature index; -1 on leaves
    pub feature: i32,
    /// Split threshold; unused on leaves
    pub threshold: f64,
    /// Left child index (feature < threshold); -1 on leaves
    pub left: i32,
    /// Right child index; -1 on leaves
    pub right: i32,
    /// Leaf prediction on the log1p(sales) scale
    pub value: Option<f64>,
}

impl TreeNode {
    /// Create an internal split node.
    pub fn branch(feature: i32, threshold: f64, left: i32, right: i32) -> Self {
        Self {
            feature,
            threshold,
            left,
            right,
            value: None,
        }
    }

    /// Create a leaf node.
    pub fn leaf(value: f64) -> Self {
        Self {
            feature: -1,
            threshold: 0.0,
            left: -1,
            right: -1,
            value: Some(value),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.value.is_some()
    }
}

/// A single regression tree of the ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    /// Evaluate this tree on a feature vector.
    ///
    /// Assumes the tree passed `validate`; a structurally broken tree
    /// contributes 0 rather than panicking.
    pub fn evaluate(&self, features: &[f64]) -> f64 {
        let mut idx = 0usize;
        loop {
            let Some(node) = self.nodes.get(idx) else {
                return 0.0;
            };
            if let Some(value) = node.value {
                return value;
            }
            let Some(&sample) = features.get(node.feature as usize) else {
                return 0.0;
            };
            let next = if sample < node.threshold {
                node.left
            } else {
                node.right
            };
            if next < 0 {
                return 0.0;
            }
            idx = next as usize;
        }
    }

    /// Validate structure against the schema's feature count.
    pub fn validate(&self, feature_count: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (i, node) in self.nodes.iter().enumerate() {
            if let Some(value) = node.value {
                if !value.is_finite() {
                    return Err(format!("leaf {i} has non-finite value"));
                }
                continue;
            }

            if node.feature < 0 || node.feature as usize >= feature_count {
                return Err(format!(
                    "node {i} splits on out-of-range feature {}",
                    node.feature
                ));
            }
            if !node.threshold.is_finite() {
                return Err(format!("node {i} has non-finite threshold"));
            }
            for (child, side) in [(node.left, "left"), (node.right, "right")] {
                if child < 0 || child as usize >= self.nodes.len() {
                    return Err(format!("node {i} has out-of-range {side} child {child}"));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> RegressionTree {
        // feature 0 < 50 -> 1.5, else 2.5
        RegressionTree::new(vec![
            TreeNode::branch(0, 50.0, 1, 2),
            TreeNode::leaf(1.5),
            TreeNode::leaf(2.5),
        ])
    }

    #[test]
    fn routes_on_threshold() {
        let tree = tree();
        assert_eq!(tree.evaluate(&[30.0]), 1.5);
        assert_eq!(tree.evaluate(&[60.0]), 2.5);
        // The exact threshold goes right: left is strictly-less-than.
        assert_eq!(tree.evaluate(&[50.0]), 2.5);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let tree = tree();
        let features = vec![42.0, 7.0];
        let first = tree.evaluate(&features);
        assert!((0..100).all(|_| tree.evaluate(&features) == first));
    }

    #[test]
    fn validates_well_formed_tree() {
        assert!(tree().validate(1).is_ok());
    }

    #[test]
    fn rejects_out_of_range_child() {
        let broken = RegressionTree::new(vec![
            TreeNode::branch(0, 50.0, 5, 2),
            TreeNode::leaf(1.5),
            TreeNode::leaf(2.5),
        ]);
        assert!(broken.validate(1).is_err());
    }

    #[test]
    fn rejects_out_of_range_feature() {
        assert!(tree().validate(0).is_err());
    }

    #[test]
    fn rejects_non_finite_leaf() {
        let broken = RegressionTree::new(vec![TreeNode::leaf(f64::NAN)]);
        assert!(broken.validate(1).is_err());
    }
}
