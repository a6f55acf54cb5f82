//! Crop recommendation core
//!
//! The bits between a loaded model and a rendered page:
//!
//! - [`SLIDERS`] - bounds, defaults, steps and units for the seven inputs
//! - [`FeatureVector`] - the inputs in the order the model was trained on
//! - [`predict`] - one-row inference that never lets a model failure escape
//! - [`resolve`] - class id to crop name, with a placeholder for unknown ids
//! - [`SummaryTable`] - the inputs echoed back with units
//!
//! ## Example
//!
//! ```
//! use artifact::{Classifier, ModelError};
//! use ndarray::ArrayView2;
//! use recommend::{recommend, FeatureVector};
//!
//! struct AlwaysMaize;
//!
//! impl Classifier for AlwaysMaize {
//!     fn n_features(&self) -> usize { 7 }
//!     fn predict(&self, batch: ArrayView2<'_, f64>) -> Result<Vec<i64>, ModelError> {
//!         Ok(vec![11; batch.nrows()])
//!     }
//! }
//!
//! let rec = recommend(&AlwaysMaize, FeatureVector::defaults()).unwrap();
//! assert_eq!(rec.crop, "Maize");
//! assert_eq!(rec.summary.get("pH Level"), Some("6.5"));
//! ```

mod error;
mod features;
mod labels;
mod predict;
mod summary;

pub use crate::error::PredictError;
pub use crate::features::{
    FeatureVector, Parameter, SliderGroup, SliderInputs, SliderSpec, FEATURE_COUNT, SLIDERS,
};
pub use crate::labels::{resolve, CROP_LABELS, UNKNOWN_CROP};
pub use crate::predict::{predict, recommend, Recommendation};
pub use crate::summary::{SummaryRow, SummaryTable};
