//! Gradient Boosted Decision Tree inference
//!
//! Evaluation-only ensemble representation:
//!
//! - Flat node arrays, node 0 is the root, left means strictly-less-than
//! - Leaves carry log-scale values; scoring sums leaves plus a base score
//! - Structure is validated once at artifact load, traversal is infallible
//!
//! Training produces these trees offline; this module never fits anything.

pub mod model;
pub mod tree;

pub use model::GbdtModel;
pub use tree::{RegressionTree, TreeNode};
