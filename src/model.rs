//! Classifiers that turn a feature vector into a failure probability.
//!
//! The production model is a pre-fitted gradient-boosted tree ensemble
//! exported to JSON. Training happens offline; this module only evaluates.
//!
//! ## Artifact format
//!
//! ```json
//! {
//!   "base_score": 0.5,
//!   "num_features": 2,
//!   "trees": [
//!     { "nodes": [
//!         { "feature": 0, "threshold": 50.0, "left": 1, "right": 2, "default_left": true },
//!         { "leaf": -1.2 },
//!         { "leaf": 0.8 }
//!     ] }
//!   ]
//! }
//! ```
//!
//! A sample goes `left` when `x < threshold`; NaN follows `default_left`.
//! The margin is `logit(base_score)` plus the sum of reached leaves and the
//! probability is its logistic sigmoid.

use crate::error::{ConfigError, ScoreError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Injected predictive function.
pub trait Classifier: Send + Sync {
    /// Probability of the positive ("high risk") class.
    fn predict_probability(&self, features: &[f64]) -> Result<f64, ScoreError>;

    /// Vector length the classifier was trained on, when known.
    fn feature_count(&self) -> Option<usize> {
        None
    }
}

/// A tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default = "default_true")]
        default_left: bool,
    },
    Leaf {
        leaf: f64,
    },
}

fn default_true() -> bool {
    true
}

/// One regression tree, nodes stored flat with the root at index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    fn leaf_value(&self, features: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { leaf } => return *leaf,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let x = features[*feature];
                    let go_left = if x.is_nan() {
                        *default_left
                    } else {
                        x < *threshold
                    };
                    idx = if go_left { *left } else { *right };
                }
            }
        }
    }

    // Children must point forward so traversal always terminates.
    fn validate(&self, tree_idx: usize, num_features: usize) -> Result<(), ConfigError> {
        if self.nodes.is_empty() {
            return Err(ConfigError::InvalidModel(format!(
                "tree {} has no nodes",
                tree_idx
            )));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                threshold,
                left,
                right,
                ..
            } = node
            {
                if *feature >= num_features {
                    return Err(ConfigError::InvalidModel(format!(
                        "tree {} node {} splits on feature {} (only {} features)",
                        tree_idx, i, feature, num_features
                    )));
                }
                if !threshold.is_finite() {
                    return Err(ConfigError::InvalidModel(format!(
                        "tree {} node {} has non-finite threshold",
                        tree_idx, i
                    )));
                }
                for child in [*left, *right] {
                    if child <= i || child >= self.nodes.len() {
                        return Err(ConfigError::InvalidModel(format!(
                            "tree {} node {} has invalid child {}",
                            tree_idx, i, child
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Binary gradient-boosted tree ensemble with logistic output.
///
/// Only validated ensembles can be built, deserialization included, so
/// evaluation never walks out of a tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawModel")]
pub struct GradientBoostedModel {
    /// Prior probability; its logit is the starting margin.
    base_score: f64,
    num_features: usize,
    trees: Vec<Tree>,
}

/// Artifact layout before validation.
#[derive(Deserialize)]
struct RawModel {
    base_score: f64,
    num_features: usize,
    trees: Vec<Tree>,
}

impl TryFrom<RawModel> for GradientBoostedModel {
    type Error = ConfigError;

    fn try_from(raw: RawModel) -> Result<Self, Self::Error> {
        Self::new(raw.base_score, raw.num_features, raw.trees)
    }
}

impl GradientBoostedModel {
    /// Validate and wrap an ensemble.
    pub fn new(base_score: f64, num_features: usize, trees: Vec<Tree>) -> Result<Self, ConfigError> {
        let model = Self {
            base_score,
            num_features,
            trees,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    /// Load a JSON artifact.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_score > 0.0 && self.base_score < 1.0) {
            return Err(ConfigError::InvalidModel(format!(
                "base_score {} must be in (0, 1)",
                self.base_score
            )));
        }
        if self.num_features == 0 {
            return Err(ConfigError::InvalidModel("num_features is 0".to_string()));
        }
        if self.trees.is_empty() {
            return Err(ConfigError::InvalidModel("ensemble has no trees".to_string()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i, self.num_features)?;
        }
        Ok(())
    }

    /// Raw additive score before the sigmoid.
    pub fn margin(&self, features: &[f64]) -> Result<f64, ScoreError> {
        if features.len() != self.num_features {
            return Err(ScoreError::FeatureCountMismatch {
                expected: self.num_features,
                actual: features.len(),
            });
        }
        let base = (self.base_score / (1.0 - self.base_score)).ln();
        Ok(base + self.trees.iter().map(|t| t.leaf_value(features)).sum::<f64>())
    }
}

impl Classifier for GradientBoostedModel {
    fn predict_probability(&self, features: &[f64]) -> Result<f64, ScoreError> {
        let margin = self.margin(features)?;
        Ok(1.0 / (1.0 + (-margin).exp()))
    }

    fn feature_count(&self) -> Option<usize> {
        Some(self.num_features)
    }
}

/// Returns the same probability for every input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantClassifier {
    probability: f64,
}

impl ConstantClassifier {
    pub fn new(probability: f64) -> Self {
        Self { probability }
    }
}

impl Classifier for ConstantClassifier {
    fn predict_probability(&self, _features: &[f64]) -> Result<f64, ScoreError> {
        Ok(self.probability)
    }
}

/// Adapts a closure into a [`Classifier`].
pub struct FnClassifier<F> {
    f: F,
}

impl<F> FnClassifier<F>
where
    F: Fn(&[f64]) -> Result<f64, ScoreError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Classifier for FnClassifier<F>
where
    F: Fn(&[f64]) -> Result<f64, ScoreError> + Send + Sync,
{
    fn predict_probability(&self, features: &[f64]) -> Result<f64, ScoreError> {
        (self.f)(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn stump(feature: usize, threshold: f64, low: f64, high: f64) -> Tree {
        Tree {
            nodes: vec![
                TreeNode::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                    default_left: true,
                },
                TreeNode::Leaf { leaf: low },
                TreeNode::Leaf { leaf: high },
            ],
        }
    }

    #[test]
    fn test_single_stump_probability() {
        let model = GradientBoostedModel::new(0.5, 1, vec![stump(0, 50.0, -2.0, 2.0)]).unwrap();

        let low = model.predict_probability(&[10.0]).unwrap();
        let high = model.predict_probability(&[80.0]).unwrap();

        assert_relative_eq!(low, 1.0 / (1.0 + 2.0f64.exp()), epsilon = 1e-12);
        assert_relative_eq!(high, 1.0 / (1.0 + (-2.0f64).exp()), epsilon = 1e-12);
    }

    #[test]
    fn test_threshold_is_strict_less_than() {
        let model = GradientBoostedModel::new(0.5, 1, vec![stump(0, 50.0, -1.0, 1.0)]).unwrap();
        assert!(model.predict_probability(&[50.0]).unwrap() > 0.5);
    }

    #[test]
    fn test_nan_follows_default_direction() {
        let model = GradientBoostedModel::new(0.5, 1, vec![stump(0, 50.0, -1.0, 1.0)]).unwrap();
        assert!(model.predict_probability(&[f64::NAN]).unwrap() < 0.5);
    }

    #[test]
    fn test_base_score_shifts_margin() {
        let model = GradientBoostedModel::new(0.2, 1, vec![stump(0, 0.0, 0.0, 0.0)]).unwrap();
        assert_relative_eq!(model.predict_probability(&[1.0]).unwrap(), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_feature_count_mismatch() {
        let model = GradientBoostedModel::new(0.5, 2, vec![stump(1, 1.0, 0.0, 0.0)]).unwrap();
        let err = model.predict_probability(&[1.0]).unwrap_err();
        assert_eq!(
            err,
            ScoreError::FeatureCountMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_rejects_backward_child() {
        let tree = Tree {
            nodes: vec![
                TreeNode::Leaf { leaf: 0.0 },
                TreeNode::Split {
                    feature: 0,
                    threshold: 1.0,
                    left: 0,
                    right: 0,
                    default_left: true,
                },
            ],
        };
        assert!(GradientBoostedModel::new(0.5, 1, vec![tree]).is_err());
    }

    #[test]
    fn test_deserialize_rejects_backward_child() {
        let json = r#"{
            "base_score": 0.5,
            "num_features": 1,
            "trees": [{ "nodes": [
                { "feature": 0, "threshold": 1.0, "left": 0, "right": 0 }
            ] }]
        }"#;
        let err = serde_json::from_str::<GradientBoostedModel>(json).unwrap_err();
        assert!(err.to_string().contains("invalid child 0"));
    }

    #[test]
    fn test_deserialize_rejects_dangling_child() {
        let json = r#"{
            "base_score": 0.5,
            "num_features": 1,
            "trees": [{ "nodes": [
                { "feature": 0, "threshold": 1.0, "left": 5, "right": 6 }
            ] }]
        }"#;
        assert!(serde_json::from_str::<GradientBoostedModel>(json).is_err());
    }

    #[test]
    fn test_serialized_model_loads_back() {
        let model = GradientBoostedModel::new(0.3, 1, vec![stump(0, 2.0, -1.0, 1.0)]).unwrap();
        let json = serde_json::to_string(&model).unwrap();
        let back: GradientBoostedModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back.trees().len(), 1);
        assert_eq!(back.base_score(), 0.3);
    }

    #[test]
    fn test_rejects_out_of_range_feature() {
        assert!(GradientBoostedModel::new(0.5, 1, vec![stump(3, 1.0, 0.0, 0.0)]).is_err());
    }

    #[test]
    fn test_load_json_artifact() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "base_score": 0.5,
                "num_features": 1,
                "trees": [{{ "nodes": [
                    {{ "feature": 0, "threshold": 50.0, "left": 1, "right": 2 }},
                    {{ "leaf": -3.0 }},
                    {{ "leaf": 3.0 }}
                ] }}]
            }}"#
        )
        .unwrap();
        file.flush().unwrap();

        let model = GradientBoostedModel::from_json_file(file.path()).unwrap();
        assert_eq!(model.feature_count(), Some(1));
        assert!(model.predict_probability(&[90.0]).unwrap() > 0.9);
    }

    #[test]
    fn test_constant_and_fn_classifiers() {
        assert_eq!(
            ConstantClassifier::new(0.1).predict_probability(&[]).unwrap(),
            0.1
        );
        let f = FnClassifier::new(|x: &[f64]| -> Result<f64, ScoreError> { Ok(x[0] / 100.0) });
        assert_eq!(f.predict_probability(&[40.0]).unwrap(), 0.4);
    }
}
