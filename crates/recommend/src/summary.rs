//! Key/value echo of the submitted inputs.
use serde::Serialize;

use crate::features::{FeatureVector, Parameter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub parameter: &'static str,
    pub value: String,
}

/// Seven rows in model order, values suffixed with their units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SummaryTable {
    rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn from_features(features: &FeatureVector) -> Self {
        let rows = Parameter::ALL
            .iter()
            .map(|parameter| {
                let spec = parameter.spec();
                SummaryRow {
                    parameter: spec.summary_label,
                    value: spec.format_with_unit(features.get(*parameter)),
                }
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    pub fn get(&self, parameter: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.parameter == parameter)
            .map(|row| row.value.as_str())
    }
}
