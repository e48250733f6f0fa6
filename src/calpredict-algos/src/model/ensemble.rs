use serde::{Deserialize, Serialize};

use super::{
    FEATURE_NAMES, FeatureValue, FeatureVector, ModelError, ModelOutput, RegressionModel,
    check_inputs,
};

/// One node of a [`RegressionTree`]. A split sends a row left when
/// `features[feature] < threshold` and right otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
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

/// Binary tree stored as a flat node list, rooted at index 0. Children always
/// sit after their parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    fn check(&self, tree: usize) -> Result<(), ModelError> {
        let malformed = |node, reason| ModelError::MalformedTree { tree, node, reason };

        if self.nodes.is_empty() {
            return Err(malformed(0, "tree has no nodes"));
        }

        for (index, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Leaf { value } if !value.is_finite() => {
                    return Err(malformed(index, "leaf value is not finite"));
                }
                TreeNode::Leaf { .. } => {}
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= FEATURE_NAMES.len() {
                        return Err(malformed(index, "split on an unknown feature"));
                    }
                    if !threshold.is_finite() {
                        return Err(malformed(index, "threshold is not finite"));
                    }
                    for child in [left, right] {
                        if child <= index || child >= self.nodes.len() {
                            return Err(malformed(index, "child index out of order"));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Walks from the root to a leaf. Every step moves to a later node, so the
    /// walk visits at most `nodes.len()` nodes.
    pub fn evaluate(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        let mut index = 0;
        for _ in 0..self.nodes.len() {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let Some(x) = features.values().get(*feature) else {
                        return Err(ModelError::Inference(format!(
                            "split on feature {} of {}",
                            feature,
                            features.values().len()
                        )));
                    };
                    index = if *x < *threshold { *left } else { *right };
                }
                None => break,
            }
        }
        Err(ModelError::Inference(format!(
            "tree walk did not reach a leaf (stopped at node {})",
            index
        )))
    }
}

/// Trees sharing one feature layout. How their outputs combine depends on the
/// document kind, see [`Aggregation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub inputs: Vec<String>,
    pub output: String,
    /// Added to the combined tree output.
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<RegressionTree>,
}

impl TreeEnsemble {
    pub(super) fn check(&self) -> Result<(), ModelError> {
        check_inputs(&self.inputs)?;

        if self.trees.is_empty() {
            return Err(ModelError::EmptyEnsemble);
        }
        if !self.base_score.is_finite() {
            return Err(ModelError::NonFiniteParameter);
        }

        self.trees
            .iter()
            .enumerate()
            .try_for_each(|(index, tree)| tree.check(index))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// Random forest: trees vote with equal weight.
    Mean,
    /// Gradient boosting: every tree adds a correction.
    Sum,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleModel {
    ensemble: TreeEnsemble,
    aggregation: Aggregation,
}

impl EnsembleModel {
    pub fn new(ensemble: TreeEnsemble, aggregation: Aggregation) -> Result<Self, ModelError> {
        ensemble.check()?;
        Ok(Self {
            ensemble,
            aggregation,
        })
    }
}

impl RegressionModel for EnsembleModel {
    fn output_name(&self) -> &str {
        &self.ensemble.output
    }

    fn predict(&self, features: &FeatureVector) -> Result<ModelOutput, ModelError> {
        let mut total = 0.0;
        for tree in &self.ensemble.trees {
            total += tree.evaluate(features)?;
        }

        let combined = match self.aggregation {
            Aggregation::Mean => total / self.ensemble.trees.len() as f64,
            Aggregation::Sum => total,
        };
        let value = self.ensemble.base_score + combined;

        Ok(ModelOutput::new().with_feature(self.ensemble.output.clone(), FeatureValue::Double(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::super::ModelDocument;
    use super::*;

    // Stumps on Duration (< 40 min) and Heart_Rate (< 120 bpm).
    const TREES: &str = r#"[
        {"nodes": [
            {"feature": 4, "threshold": 40.0, "left": 1, "right": 2},
            {"value": 100.0},
            {"value": 300.0}
        ]},
        {"nodes": [
            {"feature": 5, "threshold": 120.0, "left": 1, "right": 2},
            {"value": 50.0},
            {"value": 150.0}
        ]}
    ]"#;

    fn document(kind: &str, base_score: f64) -> String {
        format!(
            r#"{{
                "kind": "{kind}",
                "inputs": ["Gender", "Age", "Height", "Weight", "Duration", "Heart_Rate", "Body_Temp"],
                "output": "Calories",
                "base_score": {base_score},
                "trees": {TREES}
            }}"#
        )
    }

    fn features(duration: f64, heart_rate: f64) -> FeatureVector {
        FeatureVector([1.0, 30.0, 165.0, 60.0, duration, heart_rate, 37.0])
    }

    fn calories(model: &dyn RegressionModel, features: &FeatureVector) -> Option<f64> {
        model
            .predict(features)
            .unwrap()
            .feature("Calories")
            .and_then(FeatureValue::as_f64)
    }

    #[test]
    fn random_forest_averages_trees() {
        let model = ModelDocument::from_json(&document("random_forest", 0.0))
            .unwrap()
            .into_model()
            .unwrap();

        assert_eq!(calories(model.as_ref(), &features(45.0, 130.0)), Some(225.0));
        assert_eq!(calories(model.as_ref(), &features(30.0, 100.0)), Some(75.0));
    }

    #[test]
    fn boosted_trees_sum_onto_base_score() {
        let model = ModelDocument::from_json(&document("gradient_boosted_trees", 10.0))
            .unwrap()
            .into_model()
            .unwrap();

        assert_eq!(model.output_name(), "Calories");
        assert_eq!(calories(model.as_ref(), &features(45.0, 130.0)), Some(460.0));
        assert_eq!(calories(model.as_ref(), &features(30.0, 130.0)), Some(260.0));
    }

    #[test]
    fn xgboost_is_an_alias_for_boosted_trees() {
        let document = ModelDocument::from_json(&document("xgboost", 0.0)).unwrap();
        assert!(matches!(document, ModelDocument::GradientBoostedTrees(_)));
    }

    #[test]
    fn base_score_defaults_to_zero() {
        let json = document("gradient_boosted_trees", 0.0).replace(r#""base_score": 0,"#, "");
        let ModelDocument::GradientBoostedTrees(ensemble) = ModelDocument::from_json(&json).unwrap()
        else {
            panic!("expected boosted trees");
        };
        assert_eq!(ensemble.base_score, 0.0);
    }

    #[test]
    fn threshold_ties_go_right() {
        let tree: RegressionTree = serde_json::from_str(
            r#"{"nodes": [
                {"feature": 4, "threshold": 45.0, "left": 1, "right": 2},
                {"value": -1.0},
                {"value": 1.0}
            ]}"#,
        )
        .unwrap();

        assert_eq!(tree.evaluate(&features(45.0, 0.0)).unwrap(), 1.0);
        assert_eq!(tree.evaluate(&features(44.9, 0.0)).unwrap(), -1.0);
    }

    #[test]
    fn deeper_paths_are_followed() {
        let tree: RegressionTree = serde_json::from_str(
            r#"{"nodes": [
                {"feature": 0, "threshold": 0.5, "left": 1, "right": 2},
                {"value": 0.0},
                {"feature": 1, "threshold": 40.0, "left": 3, "right": 4},
                {"value": 10.0},
                {"value": 20.0}
            ]}"#,
        )
        .unwrap();
        tree.check(0).unwrap();

        assert_eq!(tree.evaluate(&features(45.0, 130.0)).unwrap(), 10.0);
    }

    #[test]
    fn empty_ensemble_is_rejected() {
        let json = document("random_forest", 0.0).replace(TREES, "[]");
        let result = ModelDocument::from_json(&json).unwrap().into_model();
        assert!(matches!(result, Err(ModelError::EmptyEnsemble)));
    }

    #[test]
    fn backward_child_is_rejected() {
        let json = document("random_forest", 0.0).replace(
            r#""threshold": 120.0, "left": 1"#,
            r#""threshold": 120.0, "left": 0"#,
        );
        let result = ModelDocument::from_json(&json).unwrap().into_model();
        assert!(matches!(
            result,
            Err(ModelError::MalformedTree { tree: 1, node: 0, .. })
        ));
    }

    #[test]
    fn unknown_split_feature_is_rejected() {
        let json = document("gradient_boosted_trees", 0.0).replace(r#""feature": 5"#, r#""feature": 7"#);
        let result = ModelDocument::from_json(&json).unwrap().into_model();
        assert!(matches!(
            result,
            Err(ModelError::MalformedTree { tree: 1, node: 0, .. })
        ));
    }

    #[test]
    fn unchecked_cycle_does_not_hang() {
        let tree = RegressionTree {
            nodes: vec![TreeNode::Split {
                feature: 0,
                threshold: 0.0,
                left: 0,
                right: 0,
            }],
        };
        assert!(matches!(
            tree.evaluate(&features(45.0, 130.0)),
            Err(ModelError::Inference(_))
        ));
    }
}
