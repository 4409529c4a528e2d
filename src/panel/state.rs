//! Persisted state of the three panels.
//!
//! Field names follow the host's camelCase settings paths, e.g.
//! `["data", "linearSpeedMeter"]`. Every field has a serde default so a
//! partial saved state fills in the rest.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ANGULAR_SPEED_RAD, DEFAULT_LINEAR_SPEED_METER, DEFAULT_OBJECT_LABEL_VAR_NAME,
    DEFAULT_ORIENTATION_DEG_DELTA, DEFAULT_POSITION_METER_DELTA, schema,
};
use crate::detection::{ConverterOptions, DisplayOptions, Variables, resolve_labels};
use crate::panel::settings::PanelSettings;
use crate::panel::topics::{Topic, default_image_topic, filter_topics};
use crate::panel::tree::{FieldInput, SettingsTree, SettingsTreeField, SettingsTreeNode, topic_select};
use crate::teleop::{MapperConfig, PoseMapperConfig};

fn default_true() -> bool {
    true
}

fn default_object_label_data() -> Option<String> {
    Some(DEFAULT_OBJECT_LABEL_VAR_NAME.to_string())
}

/// Description toggle shared by the teleop panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionDisplay {
    #[serde(default = "default_true")]
    pub show_desc: bool,
}

impl Default for DescriptionDisplay {
    fn default() -> Self {
        Self { show_desc: true }
    }
}

impl DescriptionDisplay {
    fn node(&self) -> SettingsTreeNode {
        SettingsTreeNode::new("display", "Display").field(
            SettingsTreeField::new(
                "showDesc",
                "Show description",
                FieldInput::Boolean {
                    value: self.show_desc,
                },
            )
            .help("Show description text guide in the panel."),
        )
    }
}

// ---------------------------------------------------------------------------
// Detection panel
// ---------------------------------------------------------------------------

/// Topic and label selection of the detection panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionData {
    #[serde(default)]
    pub image_topic: Option<String>,
    #[serde(default)]
    pub detection_topic: Option<String>,
    /// Name of the host variable holding the label map
    #[serde(default = "default_object_label_data")]
    pub object_label_data: Option<String>,
}

impl Default for DetectionData {
    fn default() -> Self {
        Self {
            image_topic: None,
            detection_topic: None,
            object_label_data: default_object_label_data(),
        }
    }
}

/// State of the 2D detection overlay panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionPanelState {
    #[serde(default)]
    pub data: DetectionData,
    #[serde(default)]
    pub display: DisplayOptions,
}

impl DetectionPanelState {
    /// Fill unset topics from the available ones.
    ///
    /// The image topic prefers `/resize/image`; the detection topic takes
    /// the first match. Topics already chosen are kept. Returns whether
    /// anything was set.
    pub fn select_default_topics(&mut self, topics: &[Topic]) -> bool {
        let mut changed = false;

        if self.data.image_topic.is_none() {
            let images = filter_topics(topics, &[schema::IMAGE]);
            if let Some(topic) = default_image_topic(&images) {
                log::info!("Defaulting image topic to {}", topic);
                self.data.image_topic = Some(topic);
                changed = true;
            }
        }

        if self.data.detection_topic.is_none() {
            let detections = filter_topics(topics, &[schema::DETECTION_2D_ARRAY]);
            if let Some(topic) = detections.first() {
                log::info!("Defaulting detection topic to {}", topic.name);
                self.data.detection_topic = Some(topic.name.clone());
                changed = true;
            }
        }

        changed
    }

    /// Topics to subscribe to, image first.
    pub fn subscriptions(&self) -> Vec<String> {
        let topics: Vec<String> = [&self.data.image_topic, &self.data.detection_topic]
            .into_iter()
            .flatten()
            .filter(|topic| !topic.is_empty())
            .cloned()
            .collect();

        if topics.is_empty() {
            log::warn!("No topics selected for subscription");
        } else {
            log::info!("Subscribing to topics: {:?}", topics);
        }
        topics
    }

    /// Converter options for the current display toggles and label variable.
    pub fn converter_options(&self, variables: &Variables) -> ConverterOptions {
        ConverterOptions::new()
            .display(self.display)
            .labels(resolve_labels(
                variables,
                self.data.object_label_data.as_deref(),
            ))
    }
}

impl PanelSettings for DetectionPanelState {
    fn settings_tree(&self, topics: &[Topic]) -> SettingsTree {
        let images = filter_topics(topics, &[schema::IMAGE]);
        let detections = filter_topics(topics, &[schema::DETECTION_2D_ARRAY]);
        let toggle = |key: &str, label: &str, value: bool| {
            SettingsTreeField::new(key, label, FieldInput::Boolean { value })
        };

        SettingsTree::default()
            .node(
                SettingsTreeNode::new("data", "General")
                    .field(
                        SettingsTreeField::new(
                            "imageTopic",
                            "Image Topic",
                            topic_select(&images, self.data.image_topic.as_deref()),
                        )
                        .help("Topic to subscribe for image data. (sensor_msgs/msg/Image)"),
                    )
                    .field(
                        SettingsTreeField::new(
                            "detectionTopic",
                            "Detection Topic",
                            topic_select(&detections, self.data.detection_topic.as_deref()),
                        )
                        .help(
                            "Topic to subscribe for 2D detection data. (vision_msgs/msg/Detection2DArray)",
                        ),
                    )
                    .field(
                        SettingsTreeField::new(
                            "objectLabelData",
                            "Object Label Data",
                            FieldInput::Text {
                                value: self.data.object_label_data.clone(),
                            },
                        )
                        .help(
                            "Variable name holding the id to label mapping. Leave empty to use the default mapping.",
                        ),
                    ),
            )
            .node(
                SettingsTreeNode::new("display", "Display")
                    .field(toggle("boundingBox", "Bounding Box", self.display.bounding_box))
                    .field(toggle("id", "Id", self.display.id))
                    .field(toggle("score", "Score", self.display.score))
                    .field(toggle("objectLabel", "Object Label", self.display.object_label)),
            )
    }
}

// ---------------------------------------------------------------------------
// Velocity teleop panel
// ---------------------------------------------------------------------------

fn default_linear_speed() -> f64 {
    DEFAULT_LINEAR_SPEED_METER
}

fn default_angular_speed() -> f64 {
    DEFAULT_ANGULAR_SPEED_RAD
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeleopData {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub target_topic: Option<String>,
    /// Linear speed per held key (m/s)
    #[serde(default = "default_linear_speed")]
    pub linear_speed_meter: f64,
    /// Angular speed per held key (rad/s)
    #[serde(default = "default_angular_speed")]
    pub angular_speed_rad: f64,
}

impl Default for TeleopData {
    fn default() -> Self {
        Self {
            enabled: true,
            target_topic: None,
            linear_speed_meter: DEFAULT_LINEAR_SPEED_METER,
            angular_speed_rad: DEFAULT_ANGULAR_SPEED_RAD,
        }
    }
}

/// State of the Twist teleop panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeleopPanelState {
    #[serde(default)]
    pub data: TeleopData,
    #[serde(default)]
    pub display: DescriptionDisplay,
}

impl TeleopPanelState {
    pub fn mapper_config(&self) -> MapperConfig {
        MapperConfig::new()
            .speeds(self.data.linear_speed_meter, self.data.angular_speed_rad)
            .enabled(self.data.enabled)
    }
}

impl PanelSettings for TeleopPanelState {
    fn settings_tree(&self, topics: &[Topic]) -> SettingsTree {
        let twists = filter_topics(topics, &[schema::TWIST]);

        SettingsTree::default()
            .node(
                SettingsTreeNode::new("data", "General")
                    .field(SettingsTreeField::new(
                        "enabled",
                        "Enable",
                        FieldInput::Boolean {
                            value: self.data.enabled,
                        },
                    ))
                    .field(
                        SettingsTreeField::new(
                            "targetTopic",
                            "Topic",
                            topic_select(&twists, self.data.target_topic.as_deref()),
                        )
                        .help("Topic to publish Twist messages (geometry_msgs/msg/Twist)"),
                    )
                    .field(
                        SettingsTreeField::new(
                            "linearSpeedMeter",
                            "Linear speed (m/s)",
                            FieldInput::Number {
                                value: self.data.linear_speed_meter,
                            },
                        )
                        .help("Linear speed change in m/s."),
                    )
                    .field(
                        SettingsTreeField::new(
                            "angularSpeedRad",
                            "Angular speed (rad/s)",
                            FieldInput::Number {
                                value: self.data.angular_speed_rad,
                            },
                        )
                        .help("Angular speed change in rad/s."),
                    ),
            )
            .node(self.display.node())
    }
}

// ---------------------------------------------------------------------------
// Pose teleop panel
// ---------------------------------------------------------------------------

fn default_position_delta() -> f64 {
    DEFAULT_POSITION_METER_DELTA
}

fn default_orientation_delta() -> f64 {
    DEFAULT_ORIENTATION_DEG_DELTA
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseTeleopData {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub camera_control_topic: Option<String>,
    /// Position change per key press (m)
    #[serde(default = "default_position_delta")]
    pub position_meter_delta: f64,
    /// Orientation change per key press (degrees)
    #[serde(default = "default_orientation_delta")]
    pub orientation_deg_delta: f64,
}

impl Default for PoseTeleopData {
    fn default() -> Self {
        Self {
            enabled: true,
            camera_control_topic: None,
            position_meter_delta: DEFAULT_POSITION_METER_DELTA,
            orientation_deg_delta: DEFAULT_ORIENTATION_DEG_DELTA,
        }
    }
}

/// State of the camera pose teleop panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseTeleopPanelState {
    #[serde(default)]
    pub data: PoseTeleopData,
    #[serde(default)]
    pub display: DescriptionDisplay,
}

impl PoseTeleopPanelState {
    pub fn mapper_config(&self) -> PoseMapperConfig {
        PoseMapperConfig::new()
            .deltas(self.data.position_meter_delta, self.data.orientation_deg_delta)
            .enabled(self.data.enabled)
    }
}

impl PanelSettings for PoseTeleopPanelState {
    fn settings_tree(&self, topics: &[Topic]) -> SettingsTree {
        let poses = filter_topics(topics, &[schema::POSE]);

        SettingsTree::default()
            .node(
                SettingsTreeNode::new("data", "General")
                    .field(SettingsTreeField::new(
                        "enabled",
                        "Enable",
                        FieldInput::Boolean {
                            value: self.data.enabled,
                        },
                    ))
                    .field(
                        SettingsTreeField::new(
                            "cameraControlTopic",
                            "Topic",
                            topic_select(&poses, self.data.camera_control_topic.as_deref()),
                        )
                        .help("Topic to publish camera poses (geometry_msgs/msg/Pose)"),
                    )
                    .field(
                        SettingsTreeField::new(
                            "positionMeterDelta",
                            "Position delta (m)",
                            FieldInput::Number {
                                value: self.data.position_meter_delta,
                            },
                        )
                        .help("Position change in meters per key press."),
                    )
                    .field(
                        SettingsTreeField::new(
                            "orientationDegDelta",
                            "Orientation delta (deg)",
                            FieldInput::Number {
                                value: self.data.orientation_deg_delta,
                            },
                        )
                        .help("Orientation change in degrees per key press."),
                    ),
            )
            .node(self.display.node())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_defaults() {
        let detection = DetectionPanelState::default();
        assert_eq!(
            detection.data.object_label_data.as_deref(),
            Some("ipp_default_object_label")
        );
        assert_eq!(detection.data.image_topic, None);
        assert!(detection.display.bounding_box && detection.display.object_label);

        let teleop = TeleopPanelState::default();
        assert!(teleop.data.enabled);
        assert!(teleop.display.show_desc);
        assert!((teleop.data.linear_speed_meter - 0.2).abs() < 1e-12);
        assert!((teleop.data.angular_speed_rad - 0.0873).abs() < 1e-12);

        let pose = PoseTeleopPanelState::default();
        assert!((pose.data.position_meter_delta - 0.1).abs() < 1e-12);
        assert!((pose.data.orientation_deg_delta - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_initial_state_fills_defaults() {
        let initial = json!({
            "data": { "targetTopic": "/robot/cmd_vel", "linearSpeedMeter": 0.5 },
        });
        let state = TeleopPanelState::from_initial_state(Some(&initial));
        assert_eq!(state.data.target_topic.as_deref(), Some("/robot/cmd_vel"));
        assert!((state.data.linear_speed_meter - 0.5).abs() < 1e-12);
        assert!((state.data.angular_speed_rad - 0.0873).abs() < 1e-12);
        assert!(state.data.enabled);
        assert!(state.display.show_desc);

        let initial = json!({ "display": { "score": false } });
        let state = DetectionPanelState::from_initial_state(Some(&initial));
        assert!(!state.display.score);
        assert!(state.display.id);
        assert_eq!(
            state.data.object_label_data.as_deref(),
            Some("ipp_default_object_label")
        );
    }

    #[test]
    fn test_state_uses_host_field_names() {
        let json = serde_json::to_value(PoseTeleopPanelState::default()).unwrap();
        assert_eq!(json["data"]["positionMeterDelta"], 0.1);
        assert_eq!(json["data"]["cameraControlTopic"], serde_json::Value::Null);
        assert_eq!(json["display"]["showDesc"], true);

        let json = serde_json::to_value(DetectionPanelState::default()).unwrap();
        assert_eq!(json["display"]["boundingBox"], true);
        assert_eq!(json["data"]["objectLabelData"], "ipp_default_object_label");
    }

    fn topics() -> Vec<Topic> {
        vec![
            Topic::new("/camera/image", schema::IMAGE),
            Topic::new("/resize/image", schema::IMAGE),
            Topic::new("/detections", schema::DETECTION_2D_ARRAY),
            Topic::new("/detections_2", schema::DETECTION_2D_ARRAY),
        ]
    }

    #[test]
    fn test_select_default_topics() {
        let mut state = DetectionPanelState::default();
        assert!(state.select_default_topics(&topics()));
        assert_eq!(state.data.image_topic.as_deref(), Some("/resize/image"));
        assert_eq!(state.data.detection_topic.as_deref(), Some("/detections"));
        assert!(!state.select_default_topics(&topics()));
    }

    #[test]
    fn test_select_default_keeps_user_choice() {
        let mut state = DetectionPanelState::default();
        state.data.image_topic = Some("/camera/image".into());
        state.select_default_topics(&topics());
        assert_eq!(state.data.image_topic.as_deref(), Some("/camera/image"));

        let mut state = DetectionPanelState::default();
        assert!(!state.select_default_topics(&[]));
        assert_eq!(state.data.image_topic, None);
    }

    #[test]
    fn test_subscriptions() {
        let mut state = DetectionPanelState::default();
        assert!(state.subscriptions().is_empty());

        state.data.detection_topic = Some("/detections".into());
        assert_eq!(state.subscriptions(), vec!["/detections".to_string()]);

        state.data.image_topic = Some("/resize/image".into());
        assert_eq!(
            state.subscriptions(),
            vec!["/resize/image".to_string(), "/detections".to_string()]
        );
    }

    #[test]
    fn test_converter_options_follow_state() {
        let mut variables = Variables::new();
        variables.insert("custom".into(), json!({ "0": "robot" }));

        let mut state = DetectionPanelState::default();
        state.display.id = false;
        state.data.object_label_data = Some("custom".into());

        let options = state.converter_options(&variables);
        assert!(!options.display.id);
        assert_eq!(options.labels.get("0"), Some("robot"));
    }

    #[test]
    fn test_settings_tree_lists_matching_topics() {
        let mut all = topics();
        all.push(Topic::new("/cmd_vel", schema::TWIST));

        let tree = DetectionPanelState::default().settings_tree(&all);
        match &tree.find("data", "imageTopic").unwrap().input {
            FieldInput::Select { options, value } => {
                assert_eq!(options.len(), 2);
                assert_eq!(value, &None);
            }
            other => panic!("unexpected input {:?}", other),
        }
        assert!(tree.find("display", "objectLabel").is_some());

        let tree = TeleopPanelState::default().settings_tree(&all);
        match &tree.find("data", "targetTopic").unwrap().input {
            FieldInput::Select { options, .. } => {
                assert_eq!(options.len(), 1);
                assert_eq!(options[0].value, "/cmd_vel");
            }
            other => panic!("unexpected input {:?}", other),
        }
        assert!(tree.find("display", "showDesc").is_some());

        let tree = PoseTeleopPanelState::default().settings_tree(&all);
        match &tree.find("data", "cameraControlTopic").unwrap().input {
            FieldInput::Select { options, .. } => assert!(options.is_empty()),
            other => panic!("unexpected input {:?}", other),
        }
    }

    #[test]
    fn test_mapper_configs() {
        let mut state = TeleopPanelState::default();
        state.data.enabled = false;
        state.data.linear_speed_meter = 1.0;
        let config = state.mapper_config();
        assert!(!config.enabled);
        assert!((config.linear_speed - 1.0).abs() < 1e-12);

        let config = PoseTeleopPanelState::default().mapper_config();
        assert!(config.enabled);
        assert!((config.position_delta - 0.1).abs() < 1e-12);
    }
}
