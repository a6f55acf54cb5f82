//! Slider definitions and the fixed-order feature vector.
//!
//! The form shows soil inputs first and climate inputs second, but the model
//! was trained on `[N, P, K, temperature, humidity, pH, rainfall]`. Everything
//! that talks to the model goes through [`FeatureVector`], which only knows the
//! training order.
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Width of every feature vector.
pub const FEATURE_COUNT: usize = 7;

/// Finest slider step is 0.1; snapped values are exact to this many places.
const STEP_SCALE: f64 = 100.0;

/// One model input, declared in model order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    Nitrogen,
    Phosphorous,
    Potassium,
    Temperature,
    Humidity,
    Ph,
    Rainfall,
}

/// Column of the form a slider is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SliderGroup {
    Soil,
    Climate,
}

/// Bounds and presentation of one slider.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderSpec {
    pub parameter: Parameter,
    /// Form field name.
    pub key: &'static str,
    pub label: &'static str,
    /// Row header in the summary table.
    pub summary_label: &'static str,
    pub help: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
    /// Whole-number slider; values are rounded and printed without decimals.
    pub integral: bool,
    /// Appended verbatim to the value in the summary table.
    pub unit_suffix: &'static str,
    pub group: SliderGroup,
}

impl SliderSpec {
    /// Pin `value` to what this slider could have produced: the nearest step
    /// from `min`, inside the bounds. Non-finite readings fall back to the
    /// default.
    pub fn clamp(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.default;
        }
        let steps = ((value - self.min) / self.step).round();
        let snapped = self.min + steps * self.step;
        // Strip the binary noise of `steps * step` (3.0 * 0.1 = 0.30000000000000004).
        let snapped = (snapped * STEP_SCALE).round() / STEP_SCALE;
        snapped.clamp(self.min, self.max)
    }

    /// Value as printed in the summary table, without the unit.
    pub fn format_value(&self, value: f64) -> String {
        if self.integral {
            format!("{value:.0}")
        } else {
            format!("{value:.1}")
        }
    }

    /// Value with its unit suffix, e.g. `"25.0 °C"` or `"60.0%"`.
    pub fn format_with_unit(&self, value: f64) -> String {
        format!("{}{}", self.format_value(value), self.unit_suffix)
    }
}

/// Slider table, indexed by [`Parameter::index`].
pub static SLIDERS: [SliderSpec; FEATURE_COUNT] = [
    SliderSpec {
        parameter: Parameter::Nitrogen,
        key: "nitrogen",
        label: "Nitrogen (N) ratio",
        summary_label: "Nitrogen (N)",
        help: "Essential for leaf growth",
        min: 0.0,
        max: 150.0,
        default: 50.0,
        step: 1.0,
        integral: true,
        unit_suffix: " ppm",
        group: SliderGroup::Soil,
    },
    SliderSpec {
        parameter: Parameter::Phosphorous,
        key: "phosphorous",
        label: "Phosphorous (P) ratio",
        summary_label: "Phosphorous (P)",
        help: "Important for root development",
        min: 0.0,
        max: 150.0,
        default: 30.0,
        step: 1.0,
        integral: true,
        unit_suffix: " ppm",
        group: SliderGroup::Soil,
    },
    SliderSpec {
        parameter: Parameter::Potassium,
        key: "potassium",
        label: "Potassium (K) ratio",
        summary_label: "Potassium (K)",
        help: "Vital for overall plant health",
        min: 0.0,
        max: 200.0,
        default: 30.0,
        step: 1.0,
        integral: true,
        unit_suffix: " ppm",
        group: SliderGroup::Soil,
    },
    SliderSpec {
        parameter: Parameter::Temperature,
        key: "temperature",
        label: "Temperature (°C)",
        summary_label: "Temperature",
        help: "Average daily temperature",
        min: 0.0,
        max: 50.0,
        default: 25.0,
        step: 0.5,
        integral: false,
        unit_suffix: " °C",
        group: SliderGroup::Climate,
    },
    SliderSpec {
        parameter: Parameter::Humidity,
        key: "humidity",
        label: "Humidity (%)",
        summary_label: "Humidity",
        help: "Relative humidity level",
        min: 0.0,
        max: 100.0,
        default: 60.0,
        step: 0.5,
        integral: false,
        unit_suffix: "%",
        group: SliderGroup::Climate,
    },
    SliderSpec {
        parameter: Parameter::Ph,
        key: "ph",
        label: "pH Level",
        summary_label: "pH Level",
        help: "Soil acidity/alkalinity level",
        min: 0.0,
        max: 14.0,
        default: 6.5,
        step: 0.1,
        integral: false,
        unit_suffix: "",
        group: SliderGroup::Soil,
    },
    SliderSpec {
        parameter: Parameter::Rainfall,
        key: "rainfall",
        label: "Rainfall (mm)",
        summary_label: "Rainfall",
        help: "Annual rainfall amount",
        min: 0.0,
        max: 500.0,
        default: 150.0,
        step: 1.0,
        integral: false,
        unit_suffix: " mm",
        group: SliderGroup::Climate,
    },
];

impl Parameter {
    /// Model order.
    pub const ALL: [Parameter; FEATURE_COUNT] = [
        Parameter::Nitrogen,
        Parameter::Phosphorous,
        Parameter::Potassium,
        Parameter::Temperature,
        Parameter::Humidity,
        Parameter::Ph,
        Parameter::Rainfall,
    ];

    /// Order the form renders sliders in.
    pub const FORM_ORDER: [Parameter; FEATURE_COUNT] = [
        Parameter::Nitrogen,
        Parameter::Phosphorous,
        Parameter::Potassium,
        Parameter::Ph,
        Parameter::Temperature,
        Parameter::Humidity,
        Parameter::Rainfall,
    ];

    /// Column of this parameter in the feature vector.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn spec(self) -> &'static SliderSpec {
        &SLIDERS[self.index()]
    }

    pub fn key(self) -> &'static str {
        self.spec().key
    }
}

/// Raw slider readings as submitted by the form. Missing fields fall back to
/// the slider default.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SliderInputs {
    pub nitrogen: Option<f64>,
    pub phosphorous: Option<f64>,
    pub potassium: Option<f64>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub ph: Option<f64>,
    pub rainfall: Option<f64>,
}

impl SliderInputs {
    fn get(&self, parameter: Parameter) -> Option<f64> {
        match parameter {
            Parameter::Nitrogen => self.nitrogen,
            Parameter::Phosphorous => self.phosphorous,
            Parameter::Potassium => self.potassium,
            Parameter::Temperature => self.temperature,
            Parameter::Humidity => self.humidity,
            Parameter::Ph => self.ph,
            Parameter::Rainfall => self.rainfall,
        }
    }
}

/// Model input in training order. Always exactly [`FEATURE_COUNT`] values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Wrap values already in model order. No clamping.
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Every slider at its default position.
    pub fn defaults() -> Self {
        Self(std::array::from_fn(|idx| SLIDERS[idx].default))
    }

    /// Assemble from form readings: defaults for missing fields, then pinned
    /// to each slider's range.
    pub fn from_inputs(inputs: &SliderInputs) -> Self {
        Self(std::array::from_fn(|idx| {
            let spec = &SLIDERS[idx];
            let raw = inputs.get(spec.parameter).unwrap_or(spec.default);
            spec.clamp(raw)
        }))
    }

    pub fn get(&self, parameter: Parameter) -> f64 {
        self.0[parameter.index()]
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// Single-row batch (1 × 7) for a [`Classifier`](artifact::Classifier).
    pub fn to_batch(&self) -> Array2<f64> {
        Array2::from_shape_fn((1, FEATURE_COUNT), |(_, col)| self.0[col])
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::defaults()
    }
}
