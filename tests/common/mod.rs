//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use croprec::{ModelArtifact, TreeArrays, FORMAT_VERSION, TREE_LEAF};

pub const FEATURE_NAMES: [&str; 7] = [
    "N",
    "P",
    "K",
    "temperature",
    "humidity",
    "ph",
    "rainfall",
];

/// Class ids voted for by [`crop_forest`]: Cotton, Jute, Maize, Rice.
pub const FOREST_CLASSES: [i64; 4] = [6, 8, 11, 20];

/// Two-tree forest over the seven crop features.
///
/// Tree A: rainfall <= 100 then temperature <= 22 gives Maize, else Cotton;
/// rainfall > 100 then humidity <= 70 gives Jute, else Rice.
/// Tree B: pH <= 7 splits its vote between Maize and Rice, else Cotton.
pub fn crop_forest() -> ModelArtifact {
    let internal = vec![1.0, 1.0, 1.0, 1.0];
    let tree_a = TreeArrays {
        children_left: vec![1, 3, 5, TREE_LEAF, TREE_LEAF, TREE_LEAF, TREE_LEAF],
        children_right: vec![2, 4, 6, TREE_LEAF, TREE_LEAF, TREE_LEAF, TREE_LEAF],
        feature: vec![6, 3, 4, -2, -2, -2, -2],
        threshold: vec![100.0, 22.0, 70.0, -2.0, -2.0, -2.0, -2.0],
        value: vec![
            internal.clone(),
            internal.clone(),
            internal.clone(),
            vec![0.0, 0.0, 9.0, 0.0],
            vec![3.0, 0.0, 0.0, 0.0],
            vec![0.0, 7.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 12.0],
        ],
    };
    let tree_b = TreeArrays {
        children_left: vec![1, TREE_LEAF, TREE_LEAF],
        children_right: vec![2, TREE_LEAF, TREE_LEAF],
        feature: vec![5, -2, -2],
        threshold: vec![7.0, -2.0, -2.0],
        value: vec![internal, vec![0.0, 0.0, 4.0, 4.0], vec![5.0, 0.0, 0.0, 0.0]],
    };
    ModelArtifact {
        format_version: FORMAT_VERSION,
        algorithm: "RandomForestClassifier".into(),
        producer: Some("croprec-tests".into()),
        feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        classes: FOREST_CLASSES.to_vec(),
        trees: vec![tree_a, tree_b],
    }
}

/// Readings that [`crop_forest`] maps to Maize.
pub fn maize_row() -> [f64; 7] {
    [90.0, 42.0, 43.0, 20.0, 82.0, 6.5, 80.0]
}

/// Readings that [`crop_forest`] maps to Rice.
pub fn rice_row() -> [f64; 7] {
    [80.0, 40.0, 40.0, 26.0, 85.0, 6.0, 220.0]
}

/// Encode `text` as ISO-8859-1. Panics on characters above U+00FF.
pub fn latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).expect("latin1 range"))
        .collect()
}

pub fn write_artifact(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).expect("write artifact");
    path
}

/// Structurally valid forest trained on only three features (N, P, K).
pub fn narrow_forest() -> ModelArtifact {
    ModelArtifact {
        feature_names: FEATURE_NAMES[..3].iter().map(|s| s.to_string()).collect(),
        trees: vec![TreeArrays {
            children_left: vec![1, TREE_LEAF, TREE_LEAF],
            children_right: vec![2, TREE_LEAF, TREE_LEAF],
            feature: vec![0, -2, -2],
            threshold: vec![60.0, -2.0, -2.0],
            value: vec![
                vec![1.0, 1.0, 1.0, 1.0],
                vec![0.0, 0.0, 3.0, 0.0],
                vec![0.0, 0.0, 0.0, 3.0],
            ],
        }],
        ..crop_forest()
    }
}
