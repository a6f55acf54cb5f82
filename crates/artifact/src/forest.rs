//! Random-forest artifact schema and evaluator.
//!
//! Trees are stored the way CART trainers export them: one flat array per
//! node attribute, indexed by node id, with node `0` as the root. A node whose
//! left child is [`TREE_LEAF`] is a leaf and carries a class weight
//! distribution in `value`.
use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::Classifier;

/// Artifact schema version understood by this crate.
pub const FORMAT_VERSION: u32 = 1;

/// Child index marking a leaf node.
pub const TREE_LEAF: i32 = -1;

/// Flat node arrays for a single decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeArrays {
    pub children_left: Vec<i32>,
    pub children_right: Vec<i32>,
    pub feature: Vec<i32>,
    pub threshold: Vec<f64>,
    /// Per-node class weights, one column per entry of [`ModelArtifact::classes`].
    pub value: Vec<Vec<f64>>,
}

impl TreeArrays {
    /// A single-node tree that always votes for `class_position`.
    pub fn constant(n_classes: usize, class_position: usize) -> Self {
        let mut weights = vec![0.0; n_classes];
        if let Some(slot) = weights.get_mut(class_position) {
            *slot = 1.0;
        }
        Self {
            children_left: vec![TREE_LEAF],
            children_right: vec![TREE_LEAF],
            feature: vec![-2],
            threshold: vec![-2.0],
            value: vec![weights],
        }
    }

    fn node_count(&self) -> usize {
        self.children_left.len()
    }

    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        let n = self.node_count();
        if n == 0 {
            return Err("tree has no nodes".into());
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err(format!(
                "node arrays disagree on length: left={}, right={}, feature={}, threshold={}, value={}",
                n,
                self.children_right.len(),
                self.feature.len(),
                self.threshold.len(),
                self.value.len()
            ));
        }

        for node in 0..n {
            let left = self.children_left[node];
            let right = self.children_right[node];
            let weights = &self.value[node];
            if weights.len() != n_classes {
                return Err(format!(
                    "node {node} has {} class weights, expected {n_classes}",
                    weights.len()
                ));
            }

            if left == TREE_LEAF {
                if right != TREE_LEAF {
                    return Err(format!("node {node} has a right child but no left child"));
                }
                if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                    return Err(format!("leaf {node} has a negative or non-finite weight"));
                }
                if weights.iter().sum::<f64>() <= 0.0 {
                    return Err(format!("leaf {node} carries no class weight"));
                }
                continue;
            }

            // Children must sit after their parent; this also rules out cycles.
            for child in [left, right] {
                if child <= node as i32 || child as usize >= n {
                    return Err(format!("node {node} points at invalid child {child}"));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(format!("node {node} splits on unknown feature {feature}"));
            }
            if !self.threshold[node].is_finite() {
                return Err(format!("node {node} has a non-finite threshold"));
            }
        }
        Ok(())
    }

    fn leaf_for(&self, row: ArrayView1<'_, f64>) -> usize {
        let mut node = 0usize;
        loop {
            let left = self.children_left[node];
            if left == TREE_LEAF {
                return node;
            }
            let feature = self.feature[node] as usize;
            node = if row[feature] <= self.threshold[node] {
                left as usize
            } else {
                self.children_right[node] as usize
            };
        }
    }
}

/// Serialized form of a trained random-forest classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub algorithm: String,
    pub producer: Option<String>,
    pub feature_names: Vec<String>,
    /// Output class ids; leaf weight column `i` votes for `classes[i]`.
    pub classes: Vec<i64>,
    pub trees: Vec<TreeArrays>,
}

impl ModelArtifact {
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Structural checks run after every successful decode.
    pub fn validate(&self) -> Result<(), String> {
        if self.format_version != FORMAT_VERSION {
            return Err(format!(
                "unsupported format version {} (expected {FORMAT_VERSION})",
                self.format_version
            ));
        }
        if self.feature_names.is_empty() {
            return Err("artifact declares no features".into());
        }
        if self.classes.is_empty() {
            return Err("artifact declares no classes".into());
        }
        if self.trees.is_empty() {
            return Err("artifact contains no trees".into());
        }
        for (idx, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features(), self.n_classes())
                .map_err(|e| format!("tree {idx}: {e}"))?;
        }
        Ok(())
    }
}

/// Descriptive fields of a loaded artifact, kept for display and readiness probes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelMetadata {
    pub algorithm: String,
    pub producer: Option<String>,
    pub feature_names: Vec<String>,
    pub n_trees: usize,
    pub n_classes: usize,
}

impl ModelMetadata {
    fn from_artifact(artifact: &ModelArtifact) -> Self {
        Self {
            algorithm: artifact.algorithm.clone(),
            producer: artifact.producer.clone(),
            feature_names: artifact.feature_names.clone(),
            n_trees: artifact.trees.len(),
            n_classes: artifact.n_classes(),
        }
    }
}

/// In-memory random forest. Immutable once built.
#[derive(Debug, Clone)]
pub struct RandomForest {
    n_features: usize,
    classes: Vec<i64>,
    trees: Vec<TreeArrays>,
    metadata: ModelMetadata,
}

impl RandomForest {
    /// Validate `artifact` and take ownership of its trees.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, String> {
        artifact.validate()?;
        let metadata = ModelMetadata::from_artifact(&artifact);
        Ok(Self {
            n_features: artifact.n_features(),
            classes: artifact.classes,
            trees: artifact.trees,
            metadata,
        })
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Mean of the per-tree leaf probabilities for one row.
    pub fn predict_proba_row(&self, row: ArrayView1<'_, f64>) -> Vec<f64> {
        let mut proba = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let weights = &tree.value[tree.leaf_for(row)];
            let total: f64 = weights.iter().sum();
            for (acc, w) in proba.iter_mut().zip(weights) {
                *acc += w / total;
            }
        }
        let n_trees = self.trees.len() as f64;
        for p in &mut proba {
            *p /= n_trees;
        }
        proba
    }

    fn predict_row(&self, row: ArrayView1<'_, f64>) -> i64 {
        let proba = self.predict_proba_row(row);
        // First maximum wins ties.
        let mut best = 0usize;
        for (idx, p) in proba.iter().enumerate().skip(1) {
            if *p > proba[best] {
                best = idx;
            }
        }
        self.classes[best]
    }
}

impl Classifier for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, batch: ArrayView2<'_, f64>) -> Result<Vec<i64>, ModelError> {
        if batch.ncols() != self.n_features {
            return Err(ModelError::FeatureCount {
                expected: self.n_features,
                actual: batch.ncols(),
            });
        }
        for (row_idx, row) in batch.outer_iter().enumerate() {
            if let Some(feature) = row.iter().position(|v| !v.is_finite()) {
                return Err(ModelError::NonFinite {
                    row: row_idx,
                    feature,
                });
            }
        }
        Ok(batch.outer_iter().map(|row| self.predict_row(row)).collect())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ndarray::{array, Array2};

    /// Two-feature forest: one stump on feature 0 at 10.0 (class 3 below, 7 above)
    /// and one constant tree voting for class 7.
    pub(crate) fn stump_artifact() -> ModelArtifact {
        ModelArtifact {
            format_version: FORMAT_VERSION,
            algorithm: "RandomForestClassifier".into(),
            producer: Some("unit-test".into()),
            feature_names: vec!["a".into(), "b".into()],
            classes: vec![3, 7],
            trees: vec![
                TreeArrays {
                    children_left: vec![1, TREE_LEAF, TREE_LEAF],
                    children_right: vec![2, TREE_LEAF, TREE_LEAF],
                    feature: vec![0, -2, -2],
                    threshold: vec![10.0, -2.0, -2.0],
                    value: vec![vec![5.0, 5.0], vec![5.0, 0.0], vec![0.0, 5.0]],
                },
                TreeArrays {
                    children_left: vec![1, TREE_LEAF, TREE_LEAF],
                    children_right: vec![2, TREE_LEAF, TREE_LEAF],
                    feature: vec![1, -2, -2],
                    threshold: vec![0.5, -2.0, -2.0],
                    value: vec![vec![4.0, 4.0], vec![3.0, 1.0], vec![1.0, 3.0]],
                },
            ],
        }
    }

    #[test]
    fn stump_artifact_validates() {
        assert!(stump_artifact().validate().is_ok());
    }

    #[test]
    fn predicts_by_averaged_probability() {
        let forest = RandomForest::from_artifact(stump_artifact()).unwrap();
        let batch: Array2<f64> = array![[5.0, 0.0], [20.0, 1.0], [5.0, 1.0]];
        // row 0: (1,0) + (.75,.25) -> class 3
        // row 1: (0,1) + (.25,.75) -> class 7
        // row 2: (1,0) + (.25,.75) -> 1.25 vs .75 -> class 3
        assert_eq!(forest.predict(batch.view()).unwrap(), vec![3, 7, 3]);
    }

    #[test]
    fn ties_go_to_first_class() {
        let mut artifact = stump_artifact();
        artifact.trees = vec![TreeArrays {
            children_left: vec![TREE_LEAF],
            children_right: vec![TREE_LEAF],
            feature: vec![-2],
            threshold: vec![-2.0],
            value: vec![vec![1.0, 1.0]],
        }];
        let forest = RandomForest::from_artifact(artifact).unwrap();
        let batch: Array2<f64> = array![[0.0, 0.0]];
        assert_eq!(forest.predict(batch.view()).unwrap(), vec![3]);
    }

    #[test]
    fn threshold_is_inclusive_on_the_left() {
        let forest = RandomForest::from_artifact(stump_artifact()).unwrap();
        let proba = forest.predict_proba_row(array![10.0, 0.0].view());
        assert!(proba[0] > proba[1]);
    }

    #[test]
    fn rejects_wrong_width() {
        let forest = RandomForest::from_artifact(stump_artifact()).unwrap();
        let batch: Array2<f64> = array![[1.0, 2.0, 3.0]];
        assert_eq!(
            forest.predict(batch.view()),
            Err(ModelError::FeatureCount {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn rejects_nan_input() {
        let forest = RandomForest::from_artifact(stump_artifact()).unwrap();
        let batch: Array2<f64> = array![[1.0, f64::NAN]];
        assert_eq!(
            forest.predict(batch.view()),
            Err(ModelError::NonFinite { row: 0, feature: 1 })
        );
    }

    #[test]
    fn validation_catches_backward_child() {
        let mut artifact = stump_artifact();
        artifact.trees[0].children_left[0] = 0;
        let err = artifact.validate().unwrap_err();
        assert!(err.contains("tree 0"));
        assert!(err.contains("invalid child"));
    }

    #[test]
    fn validation_catches_unknown_feature() {
        let mut artifact = stump_artifact();
        artifact.trees[1].feature[0] = 9;
        assert!(artifact.validate().unwrap_err().contains("unknown feature 9"));
    }

    #[test]
    fn validation_catches_length_mismatch() {
        let mut artifact = stump_artifact();
        artifact.trees[0].threshold.pop();
        assert!(artifact.validate().unwrap_err().contains("disagree"));
    }

    #[test]
    fn validation_catches_empty_leaf() {
        let mut artifact = stump_artifact();
        artifact.trees[0].value[1] = vec![0.0, 0.0];
        assert!(artifact.validate().unwrap_err().contains("no class weight"));
    }

    #[test]
    fn validation_catches_version() {
        let mut artifact = stump_artifact();
        artifact.format_version = 2;
        assert!(artifact.validate().unwrap_err().contains("format version 2"));
    }

    #[test]
    fn constant_tree_votes_for_its_class() {
        let mut artifact = stump_artifact();
        artifact.trees = vec![TreeArrays::constant(2, 1)];
        let forest = RandomForest::from_artifact(artifact).unwrap();
        let batch: Array2<f64> = array![[100.0, -4.0]];
        assert_eq!(forest.predict(batch.view()).unwrap(), vec![7]);
        assert_eq!(forest.metadata().n_trees, 1);
    }
}
