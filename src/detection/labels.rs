//! Object label lookup for detection class ids.
//!
//! Detectors publish numeric class ids as strings. Labels map them to human
//! readable names. The host keeps label maps in named variables so users can
//! swap in their own; [`resolve_labels`] implements that lookup with a
//! fallback to the built-in COCO names.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_OBJECT_LABEL_VAR_NAME;
use crate::detection::error::ConverterError;

/// COCO 2017 detection classes, indexed by class id.
const COCO_CLASSES: [&str; 80] = [
    "person",
    "bicycle",
    "car",
    "motorcycle",
    "airplane",
    "bus",
    "train",
    "truck",
    "boat",
    "traffic light",
    "fire hydrant",
    "stop sign",
    "parking meter",
    "bench",
    "bird",
    "cat",
    "dog",
    "horse",
    "sheep",
    "cow",
    "elephant",
    "bear",
    "zebra",
    "giraffe",
    "backpack",
    "umbrella",
    "handbag",
    "tie",
    "suitcase",
    "frisbee",
    "skis",
    "snowboard",
    "sports ball",
    "kite",
    "baseball bat",
    "baseball glove",
    "skateboard",
    "surfboard",
    "tennis racket",
    "bottle",
    "wine glass",
    "cup",
    "fork",
    "knife",
    "spoon",
    "bowl",
    "banana",
    "apple",
    "sandwich",
    "orange",
    "broccoli",
    "carrot",
    "hot dog",
    "pizza",
    "donut",
    "cake",
    "chair",
    "couch",
    "potted plant",
    "bed",
    "dining table",
    "toilet",
    "tv",
    "laptop",
    "mouse",
    "remote",
    "keyboard",
    "cell phone",
    "microwave",
    "oven",
    "toaster",
    "sink",
    "refrigerator",
    "book",
    "clock",
    "vase",
    "scissors",
    "teddy bear",
    "hair drier",
    "toothbrush",
];

/// Mapping from class id to display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectLabels(HashMap<String, String>);

impl ObjectLabels {
    /// An empty map; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in COCO class names keyed "0" to "79".
    pub fn coco() -> Self {
        Self(
            COCO_CLASSES
                .iter()
                .enumerate()
                .map(|(id, name)| (id.to_string(), name.to_string()))
                .collect(),
        )
    }

    /// Parse a JSON object of `"class_id": "name"` pairs.
    pub fn from_json(json: &str) -> Result<Self, ConverterError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Build labels from a JSON value, which must be an object of strings.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, ConverterError> {
        let object = value
            .as_object()
            .ok_or_else(|| ConverterError::invalid_labels("expected a JSON object"))?;

        let mut labels = HashMap::with_capacity(object.len());
        for (id, name) in object {
            let name = name.as_str().ok_or_else(|| {
                ConverterError::invalid_labels(format!("label for class '{}' is not a string", id))
            })?;
            labels.insert(id.clone(), name.to_string());
        }
        Ok(Self(labels))
    }

    /// Serialize as a JSON object value.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .map(|(id, name)| (id.clone(), serde_json::Value::String(name.clone())))
                .collect(),
        )
    }

    pub fn get(&self, class_id: &str) -> Option<&str> {
        self.0.get(class_id).map(String::as_str)
    }

    pub fn insert(&mut self, class_id: impl Into<String>, name: impl Into<String>) {
        self.0.insert(class_id.into(), name.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for ObjectLabels {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Host variables, keyed by variable name.
pub type Variables = HashMap<String, serde_json::Value>;

/// Store the built-in labels under the default variable name if it is unset.
///
/// Returns `true` if the variable was created.
pub fn ensure_default_label_variable(variables: &mut Variables) -> bool {
    if variables.contains_key(DEFAULT_OBJECT_LABEL_VAR_NAME) {
        return false;
    }
    log::info!(
        "Creating default object label variable '{}'",
        DEFAULT_OBJECT_LABEL_VAR_NAME
    );
    variables.insert(
        DEFAULT_OBJECT_LABEL_VAR_NAME.to_string(),
        ObjectLabels::coco().to_value(),
    );
    true
}

/// Resolve the labels for `variable_name`.
///
/// Falls back to the default label variable when the name is empty or not
/// set, and to an empty map when neither holds a valid label object.
pub fn resolve_labels(variables: &Variables, variable_name: Option<&str>) -> ObjectLabels {
    let value = variable_name
        .and_then(|name| variables.get(name))
        .or_else(|| variables.get(DEFAULT_OBJECT_LABEL_VAR_NAME));

    let Some(value) = value else {
        return ObjectLabels::empty();
    };

    match ObjectLabels::from_value(value) {
        Ok(labels) => labels,
        Err(e) => {
            log::warn!("Ignoring object label variable: {}", e);
            ObjectLabels::empty()
        }
    }
}
