//! Detection2DArray to ImageAnnotations conversion.
//!
//! Each detection becomes a closed green rectangle plus up to two text
//! labels: the object name under the box, and an `ID:<class> (<score>%)`
//! line just inside its top edge.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::constants::{
    BOUNDING_BOX_THICKNESS, DEFAULT_LABEL_FONT_SIZE, DEFAULT_LABEL_Y_OFFSET, schema,
};
use crate::detection::annotations::{
    Color, ImageAnnotations, Point2, PointsAnnotation, PointsAnnotationType, TextAnnotation,
    Timestamp,
};
use crate::detection::error::ConverterError;
use crate::detection::labels::ObjectLabels;
use crate::detection::types::{Detection2D, Detection2DArray};

/// Class id used when a detection carries no hypothesis.
const UNKNOWN_CLASS: &str = "unknown";

const BOX_FILL: Color = Color::rgba(0.0, 1.0, 0.0, 0.2);
const TEXT_BACKGROUND: Color = Color::rgba(0.0, 0.0, 0.0, 0.7);

/// Schema converter registered with the host.
pub trait MessageConverter {
    /// Message type consumed.
    type Input: DeserializeOwned;
    /// Message type produced.
    type Output: Serialize;

    /// Schema name of the input messages.
    fn from_schema_name(&self) -> &'static str;

    /// Schema name of the produced messages.
    fn to_schema_name(&self) -> &'static str;

    /// Convert one message.
    fn convert(&self, msg: &Self::Input) -> Self::Output;

    /// Parse a JSON message and convert it.
    fn convert_json(&self, json: &str) -> Result<Self::Output, ConverterError> {
        let msg: Self::Input = serde_json::from_str(json)?;
        Ok(self.convert(&msg))
    }
}

/// Which parts of a detection are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DisplayOptions {
    pub bounding_box: bool,
    pub id: bool,
    pub score: bool,
    pub object_label: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            bounding_box: true,
            id: true,
            score: true,
            object_label: true,
        }
    }
}

/// Options for [`Detection2DArrayConverter`].
#[derive(Debug, Clone)]
pub struct ConverterOptions {
    /// Text size for all labels
    pub font_size: f64,
    /// Offset of the id/score line below the box top edge
    pub y_offset: f64,
    /// Which parts to draw
    pub display: DisplayOptions,
    /// Class id to name lookup
    pub labels: ObjectLabels,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_LABEL_FONT_SIZE,
            y_offset: DEFAULT_LABEL_Y_OFFSET,
            display: DisplayOptions::default(),
            labels: ObjectLabels::coco(),
        }
    }
}

impl ConverterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label font size.
    pub fn font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Set the id/score text offset.
    pub fn y_offset(mut self, y_offset: f64) -> Self {
        self.y_offset = y_offset;
        self
    }

    /// Set display toggles.
    pub fn display(mut self, display: DisplayOptions) -> Self {
        self.display = display;
        self
    }

    /// Use a custom label map.
    pub fn labels(mut self, labels: ObjectLabels) -> Self {
        self.labels = labels;
        self
    }
}

/// Converts `vision_msgs/msg/Detection2DArray` into `foxglove.ImageAnnotations`.
#[derive(Debug, Clone, Default)]
pub struct Detection2DArrayConverter {
    pub options: ConverterOptions,
}

impl Detection2DArrayConverter {
    pub fn new(options: ConverterOptions) -> Self {
        Self { options }
    }

    fn bounding_box(&self, detection: &Detection2D, timestamp: Timestamp) -> PointsAnnotation {
        let bbox = &detection.bbox;
        let (left, right, top, bottom) = (bbox.left(), bbox.right(), bbox.top(), bbox.bottom());

        PointsAnnotation {
            timestamp,
            kind: PointsAnnotationType::LineLoop,
            points: vec![
                Point2::new(left, top),
                Point2::new(right, top),
                Point2::new(right, bottom),
                Point2::new(left, bottom),
            ],
            outline_color: Color::GREEN,
            outline_colors: Vec::new(),
            fill_color: BOX_FILL,
            thickness: BOUNDING_BOX_THICKNESS,
        }
    }

    fn text(&self, text: String, position: Point2, timestamp: Timestamp) -> TextAnnotation {
        TextAnnotation {
            timestamp,
            position,
            text,
            font_size: self.options.font_size,
            text_color: Color::WHITE,
            background_color: TEXT_BACKGROUND,
        }
    }

    fn texts(&self, detection: &Detection2D, timestamp: Timestamp, out: &mut Vec<TextAnnotation>) {
        let display = &self.options.display;
        let bbox = &detection.bbox;
        let hypothesis = detection.top_hypothesis();
        let class_id = hypothesis.map_or(UNKNOWN_CLASS, |h| h.class_id.as_str());

        if display.object_label {
            let name = self.options.labels.get(class_id).unwrap_or(UNKNOWN_CLASS);
            out.push(self.text(
                name.to_string(),
                Point2::new(bbox.left(), bbox.bottom()),
                timestamp,
            ));
        }

        let mut main_text = String::new();
        if display.id {
            main_text.push_str("ID:");
            main_text.push_str(class_id);
        }
        if display.score {
            let score = hypothesis.map_or(0.0, |h| h.score);
            if !main_text.is_empty() {
                main_text.push(' ');
            }
            main_text.push_str(&format_score(score));
        }

        if !main_text.is_empty() {
            out.push(self.text(
                main_text,
                Point2::new(bbox.left(), bbox.top() + self.options.y_offset),
                timestamp,
            ));
        }
    }
}

/// Format a [0, 1] score as a percentage with one decimal, e.g. `(87.5%)`.
///
/// A percentage exactly halfway between two tenths rounds away from zero,
/// so 12.25 prints as `12.3`.
pub fn format_score(score: f64) -> String {
    let percent = score * 100.0;
    // Exact x.x5 values are the odd multiples of 0.25.
    let halfway = (percent * 4.0).fract() == 0.0 && (percent * 2.0).fract() != 0.0;
    let percent = if halfway {
        (percent * 10.0).round() / 10.0
    } else {
        percent
    };
    format!("({:.1}%)", percent)
}

impl MessageConverter for Detection2DArrayConverter {
    type Input = Detection2DArray;
    type Output = ImageAnnotations;

    fn from_schema_name(&self) -> &'static str {
        schema::DETECTION_2D_ARRAY
    }

    fn to_schema_name(&self) -> &'static str {
        schema::IMAGE_ANNOTATIONS
    }

    fn convert(&self, msg: &Detection2DArray) -> ImageAnnotations {
        let timestamp = Timestamp::from(msg.header.stamp);
        let mut annotations = ImageAnnotations::default();

        for detection in &msg.detections {
            if self.options.display.bounding_box {
                annotations
                    .points
                    .push(self.bounding_box(detection, timestamp));
            }
            self.texts(detection, timestamp, &mut annotations.texts);
        }

        log::trace!(
            "Converted {} detections into {} boxes and {} texts",
            msg.detections.len(),
            annotations.points.len(),
            annotations.texts.len()
        );
        annotations
    }
}

/// Convert with the given options.
pub fn convert(msg: &Detection2DArray, options: &ConverterOptions) -> ImageAnnotations {
    Detection2DArrayConverter::new(options.clone()).convert(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::types::{
        BoundingBox2D, Header, ObjectHypothesis, ObjectHypothesisWithPose, Pose2D, Time, Vector2,
    };

    fn detection(class_id: Option<&str>, score: f64, cx: f64, cy: f64, w: f64, h: f64) -> Detection2D {
        Detection2D {
            results: class_id
                .map(|id| {
                    vec![ObjectHypothesisWithPose {
                        hypothesis: ObjectHypothesis {
                            class_id: id.to_string(),
                            score,
                        },
                        ..Default::default()
                    }]
                })
                .unwrap_or_default(),
            bbox: BoundingBox2D {
                center: Pose2D {
                    position: Vector2::new(cx, cy),
                    theta: 0.0,
                },
                size_x: w,
                size_y: h,
            },
            ..Default::default()
        }
    }

    fn message(detections: Vec<Detection2D>) -> Detection2DArray {
        Detection2DArray {
            header: Header {
                stamp: Time {
                    sec: 10,
                    nanosec: 500,
                },
                frame_id: "camera".into(),
            },
            detections,
        }
    }

    #[test]
    fn test_schema_names() {
        let converter = Detection2DArrayConverter::default();
        assert_eq!(converter.from_schema_name(), "vision_msgs/msg/Detection2DArray");
        assert_eq!(converter.to_schema_name(), "foxglove.ImageAnnotations");
    }

    #[test]
    fn test_bounding_box_corners() {
        let msg = message(vec![detection(Some("0"), 0.9, 100.0, 50.0, 40.0, 20.0)]);
        let annotations = convert(&msg, &ConverterOptions::default());

        assert_eq!(annotations.points.len(), 1);
        let points = &annotations.points[0];
        assert_eq!(points.kind, PointsAnnotationType::LineLoop);
        assert_eq!(
            points.points,
            vec![
                Point2::new(80.0, 40.0),
                Point2::new(120.0, 40.0),
                Point2::new(120.0, 60.0),
                Point2::new(80.0, 60.0),
            ]
        );
        assert_eq!(points.timestamp, Timestamp { sec: 10, nsec: 500 });
        assert_eq!(points.outline_color, Color::GREEN);
        assert_eq!(points.fill_color.a, 0.2);
        assert_eq!(points.thickness, 2.0);
        assert!(points.outline_colors.is_empty());
        assert!(annotations.circles.is_empty());
    }

    #[test]
    fn test_text_layout() {
        let msg = message(vec![detection(Some("2"), 0.875, 100.0, 50.0, 40.0, 20.0)]);
        let annotations = convert(&msg, &ConverterOptions::default());

        assert_eq!(annotations.texts.len(), 2);
        let label = &annotations.texts[0];
        assert_eq!(label.text, "car");
        assert_eq!(label.position, Point2::new(80.0, 60.0));
        assert_eq!(label.font_size, 12.0);
        assert_eq!(label.text_color, Color::WHITE);
        assert_eq!(label.background_color.a, 0.7);

        let main = &annotations.texts[1];
        assert_eq!(main.text, "ID:2 (87.5%)");
        assert_eq!(main.position, Point2::new(80.0, 52.0));
    }

    #[test]
    fn test_missing_results_fall_back_to_unknown() {
        let msg = message(vec![detection(None, 0.0, 0.0, 0.0, 2.0, 2.0)]);
        let annotations = convert(&msg, &ConverterOptions::default());

        let texts: Vec<&str> = annotations.texts.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["unknown", "ID:unknown (0.0%)"]);
    }

    #[test]
    fn test_unlabeled_class() {
        let options = ConverterOptions::new().labels(ObjectLabels::empty());
        let msg = message(vec![detection(Some("5"), 0.5, 0.0, 0.0, 2.0, 2.0)]);
        let annotations = convert(&msg, &options);
        assert_eq!(annotations.texts[0].text, "unknown");
    }

    #[test]
    fn test_display_toggles() {
        let msg = message(vec![detection(Some("0"), 0.25, 0.0, 0.0, 2.0, 2.0)]);

        let score_only = ConverterOptions::new().display(DisplayOptions {
            bounding_box: false,
            id: false,
            score: true,
            object_label: false,
        });
        let annotations = convert(&msg, &score_only);
        assert!(annotations.points.is_empty());
        assert_eq!(annotations.texts.len(), 1);
        assert_eq!(annotations.texts[0].text, "(25.0%)");

        let id_only = ConverterOptions::new().display(DisplayOptions {
            bounding_box: true,
            id: true,
            score: false,
            object_label: false,
        });
        let annotations = convert(&msg, &id_only);
        assert_eq!(annotations.points.len(), 1);
        assert_eq!(annotations.texts.len(), 1);
        assert_eq!(annotations.texts[0].text, "ID:0");

        let nothing = ConverterOptions::new().display(DisplayOptions {
            bounding_box: false,
            id: false,
            score: false,
            object_label: false,
        });
        assert!(convert(&msg, &nothing).is_empty());
    }

    #[test]
    fn test_custom_style() {
        let options = ConverterOptions::new().font_size(20.0).y_offset(0.0);
        let msg = message(vec![detection(Some("0"), 1.0, 10.0, 10.0, 4.0, 4.0)]);
        let annotations = convert(&msg, &options);

        assert!(annotations.texts.iter().all(|t| t.font_size == 20.0));
        assert_eq!(annotations.texts[1].position, Point2::new(8.0, 8.0));
        assert_eq!(annotations.texts[1].text, "ID:0 (100.0%)");
    }

    #[test]
    fn test_multiple_detections_keep_order() {
        let msg = message(vec![
            detection(Some("0"), 0.5, 0.0, 0.0, 2.0, 2.0),
            detection(Some("1"), 0.5, 10.0, 10.0, 2.0, 2.0),
        ]);
        let annotations = convert(&msg, &ConverterOptions::default());
        assert_eq!(annotations.points.len(), 2);
        let texts: Vec<&str> = annotations.texts.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["person", "ID:0 (50.0%)", "bicycle", "ID:1 (50.0%)"]
        );
    }

    #[test]
    fn test_empty_message() {
        let annotations = convert(&message(vec![]), &ConverterOptions::default());
        assert!(annotations.is_empty());
    }

    #[test]
    fn test_convert_json() {
        let converter = Detection2DArrayConverter::default();
        let json = r#"{
            "header": { "stamp": { "sec": 1, "nanosec": 2 }, "frame_id": "" },
            "detections": [{
                "results": [{ "hypothesis": { "class_id": "16", "score": 0.5 } }],
                "bbox": { "center": { "position": { "x": 10, "y": 10 }, "theta": 0 }, "size_x": 4, "size_y": 6 }
            }]
        }"#;
        let annotations = converter.convert_json(json).unwrap();
        assert_eq!(annotations.texts[0].text, "dog");

        let value = serde_json::to_value(&annotations).unwrap();
        assert_eq!(value["points"][0]["type"], 2);
        assert_eq!(value["points"][0]["points"][0]["x"], 8.0);
        assert_eq!(value["texts"][1]["text"], "ID:16 (50.0%)");
        assert_eq!(value["texts"][1]["timestamp"]["nsec"], 2);

        assert!(converter.convert_json("not json").is_err());
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0.0), "(0.0%)");
        assert_eq!(format_score(0.5), "(50.0%)");
        assert_eq!(format_score(0.123), "(12.3%)");
    }

    #[test]
    fn test_format_score_halfway_rounds_up() {
        assert_eq!(format_score(0.1225), "(12.3%)");
        assert_eq!(format_score(0.0025), "(0.3%)");
        assert_eq!(format_score(0.9875), "(98.8%)");
        assert_eq!(format_score(0.125), "(12.5%)");
        assert_eq!(format_score(0.12249), "(12.2%)");
    }
}
