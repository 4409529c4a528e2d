//! Topic listing and default selection.

use serde::{Deserialize, Serialize};

use crate::constants::PREFERRED_IMAGE_TOPIC;

/// A topic as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub name: String,
    pub schema_name: String,
}

impl Topic {
    pub fn new(name: impl Into<String>, schema_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema_name: schema_name.into(),
        }
    }
}

/// Keep the topics whose schema is one of `schema_names`, in host order.
pub fn filter_topics<'a>(topics: &'a [Topic], schema_names: &[&str]) -> Vec<&'a Topic> {
    topics
        .iter()
        .filter(|topic| schema_names.contains(&topic.schema_name.as_str()))
        .collect()
}

/// Default image topic: the preferred resized stream if present, else the first.
pub fn default_image_topic(image_topics: &[&Topic]) -> Option<String> {
    image_topics
        .iter()
        .find(|topic| topic.name == PREFERRED_IMAGE_TOPIC)
        .or_else(|| image_topics.first())
        .map(|topic| topic.name.clone())
}
