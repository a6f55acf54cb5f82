use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use artifact::Classifier;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::PredictError;
use crate::features::FeatureVector;
use crate::labels::resolve;
use crate::summary::SummaryTable;

/// Run `model` on a single feature vector and return its class id.
///
/// Model errors and panics inside the model call both come back as
/// [`PredictError`]; nothing escapes to the caller.
pub fn predict(model: &dyn Classifier, features: &FeatureVector) -> Result<i64, PredictError> {
    let batch = features.to_batch();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| model.predict(batch.view())));
    let classes = match outcome {
        Ok(result) => result?,
        Err(payload) => return Err(PredictError::Panicked(panic_message(payload.as_ref()))),
    };
    classes.first().copied().ok_or(PredictError::EmptyOutput)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Everything a result page needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub class_index: i64,
    pub crop: &'static str,
    pub features: FeatureVector,
    pub summary: SummaryTable,
}

/// Predict, resolve the label and build the summary table.
pub fn recommend(
    model: &dyn Classifier,
    features: FeatureVector,
) -> Result<Recommendation, PredictError> {
    let start = Instant::now();
    match predict(model, &features) {
        Ok(class_index) => {
            let crop = resolve(class_index);
            info!(
                class_index,
                crop,
                elapsed_micros = start.elapsed().as_micros(),
                "prediction_success"
            );
            Ok(Recommendation {
                class_index,
                crop,
                summary: SummaryTable::from_features(&features),
                features,
            })
        }
        Err(err) => {
            warn!(
                error = %err,
                elapsed_micros = start.elapsed().as_micros(),
                "prediction_failure"
            );
            Err(err)
        }
    }
}
