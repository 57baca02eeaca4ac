// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//! Regressors exported from the training pipeline.
//!
//! Two families cover the trained strength models: an ordinary linear model
//! and an ensemble of binary regression trees (random forest averaging or
//! gradient boosting).

use serde::{Deserialize, Serialize};

use super::Predictor;
use crate::error::ModelError;
use crate::mix::{FeatureVector, FEATURE_COUNT};

// ============================================================================
// LINEAR
// ============================================================================

/// y = intercept + Σ coefficients[j] · x[j]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LinearRegressor {
    coefficients: FeatureVector,
    intercept: f64,
}

impl LinearRegressor {
    pub fn new(coefficients: FeatureVector, intercept: f64) -> Self {
        LinearRegressor {
            coefficients,
            intercept,
        }
    }
}

impl Predictor for LinearRegressor {
    fn predict(&self, scaled: &FeatureVector) -> f64 {
        self.coefficients
            .iter()
            .zip(scaled.iter())
            .fold(self.intercept, |acc, (c, x)| acc + c * x)
    }
}

// ============================================================================
// TREES
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize)]
enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// A fitted binary regression tree. Samples with `x[feature] <= threshold`
/// go left.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Build from the parallel-array layout (`children_left`,
    /// `children_right`, `feature`, `threshold`, `value`), where a leaf has
    /// `children_left == -1`.
    ///
    /// Children must point forward (index greater than the parent) so that
    /// traversal always terminates.
    pub fn from_arrays(
        children_left: &[i64],
        children_right: &[i64],
        feature: &[i64],
        threshold: &[f64],
        value: &[f64],
    ) -> Result<Self, ModelError> {
        let n = children_left.len();
        if n == 0 {
            return Err(ModelError::EmptyTree);
        }
        for (array, found) in [
            ("children_right", children_right.len()),
            ("feature", feature.len()),
            ("threshold", threshold.len()),
            ("value", value.len()),
        ] {
            if found != n {
                return Err(ModelError::RaggedArrays {
                    array,
                    expected: n,
                    found,
                });
            }
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let (l, r) = (children_left[i], children_right[i]);
            if l == -1 || r == -1 {
                if l != r {
                    return Err(ModelError::OneSidedNode { node: i });
                }
                if !value[i].is_finite() {
                    return Err(ModelError::NonFiniteLeaf { node: i });
                }
                nodes.push(TreeNode::Leaf { value: value[i] });
                continue;
            }

            let child = |c: i64| -> Result<usize, ModelError> {
                usize::try_from(c)
                    .ok()
                    .filter(|&idx| idx > i && idx < n)
                    .ok_or(ModelError::OutOfOrderChild { node: i, child: c })
            };
            let f = usize::try_from(feature[i])
                .ok()
                .filter(|&f| f < FEATURE_COUNT)
                .ok_or(ModelError::UnknownFeature {
                    node: i,
                    feature: feature[i],
                })?;
            if threshold[i].is_nan() {
                return Err(ModelError::NanThreshold { node: i });
            }
            nodes.push(TreeNode::Split {
                feature: f,
                threshold: threshold[i],
                left: child(l)?,
                right: child(r)?,
            });
        }
        Ok(RegressionTree { nodes })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn predict(&self, x: &FeatureVector) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

/// How per-tree outputs combine into one prediction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Aggregation {
    /// Random forest: arithmetic mean of the trees.
    Mean,
    /// Gradient boosting: `init + learning_rate * Σ trees`.
    Boosted { init: f64, learning_rate: f64 },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TreeEnsembleRegressor {
    trees: Vec<RegressionTree>,
    aggregation: Aggregation,
}

impl TreeEnsembleRegressor {
    pub fn new(trees: Vec<RegressionTree>, aggregation: Aggregation) -> Result<Self, ModelError> {
        if trees.is_empty() {
            return Err(ModelError::EmptyEnsemble);
        }
        Ok(TreeEnsembleRegressor { trees, aggregation })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

impl Predictor for TreeEnsembleRegressor {
    fn predict(&self, scaled: &FeatureVector) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.predict(scaled)).sum();
        match &self.aggregation {
            Aggregation::Mean => sum / self.trees.len() as f64,
            Aggregation::Boosted {
                init,
                learning_rate,
            } => init + learning_rate * sum,
        }
    }
}
