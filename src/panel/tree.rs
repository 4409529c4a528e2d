//! Settings tree handed to the host's settings editor.

use serde::{Deserialize, Serialize};

use crate::panel::topics::Topic;

/// Choice in a select field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl From<&Topic> for SelectOption {
    fn from(topic: &Topic) -> Self {
        Self {
            label: topic.name.clone(),
            value: topic.name.clone(),
        }
    }
}

/// Editor widget and current value of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "input", rename_all = "lowercase")]
pub enum FieldInput {
    Boolean {
        value: bool,
    },
    Number {
        value: f64,
    },
    #[serde(rename = "string")]
    Text {
        value: Option<String>,
    },
    Select {
        options: Vec<SelectOption>,
        value: Option<String>,
    },
}

/// One editable field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsTreeField {
    /// Key of the field within its node; the update path is `[node, key]`
    pub key: String,
    pub label: String,
    #[serde(flatten)]
    pub input: FieldInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl SettingsTreeField {
    pub fn new(key: &str, label: &str, input: FieldInput) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            input,
            help: None,
        }
    }

    pub fn help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }
}

/// Group of fields under one heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsTreeNode {
    /// Key of the node; the first path segment of its fields
    pub key: String,
    pub label: String,
    pub fields: Vec<SettingsTreeField>,
}

impl SettingsTreeNode {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: SettingsTreeField) -> Self {
        self.fields.push(field);
        self
    }
}

/// Complete settings editor content for a panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsTree {
    pub nodes: Vec<SettingsTreeNode>,
}

impl SettingsTree {
    pub fn node(mut self, node: SettingsTreeNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Look up a field by its update path.
    pub fn find(&self, node: &str, key: &str) -> Option<&SettingsTreeField> {
        self.nodes
            .iter()
            .find(|n| n.key == node)?
            .fields
            .iter()
            .find(|f| f.key == key)
    }
}

/// Select input listing `topics`.
pub fn topic_select(topics: &[&Topic], value: Option<&str>) -> FieldInput {
    FieldInput::Select {
        options: topics.iter().map(|topic| SelectOption::from(*topic)).collect(),
        value: value.map(str::to_string),
    }
}
