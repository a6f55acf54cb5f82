//! Class index to crop name.

/// Label shown when the model emits a class the table doesn't know.
pub const UNKNOWN_CROP: &str = "Unknown Crop";

/// Crop names indexed by class id.
pub const CROP_LABELS: [&str; 22] = [
    "Apple",
    "Banana",
    "Blackgram",
    "Chickpea",
    "Coconut",
    "Coffee",
    "Cotton",
    "Grapes",
    "Jute",
    "Kidneybeans",
    "Lentil",
    "Maize",
    "Mango",
    "Mothbeans",
    "Mungbean",
    "Muskmelon",
    "Orange",
    "Papaya",
    "Pigeonpeas",
    "Pomegranate",
    "Rice",
    "Watermelon",
];

/// Resolve a model class id to a crop name. Never fails: ids outside the
/// table resolve to [`UNKNOWN_CROP`].
pub fn resolve(class_index: i64) -> &'static str {
    usize::try_from(class_index)
        .ok()
        .and_then(|idx| CROP_LABELS.get(idx))
        .copied()
        .unwrap_or(UNKNOWN_CROP)
}
