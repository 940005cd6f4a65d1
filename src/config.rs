//! Configuration management for the push-up counter application

use crate::{
    alignment::FrameSize,
    constants::{
        DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_FIXED_LENGTH, DEFAULT_FIXED_Y, DEFAULT_FRAME_HEIGHT,
        DEFAULT_FRAME_WIDTH, DEFAULT_IOU_THRESHOLD, DEFAULT_KEYPOINT_CONFIDENCE, DEFAULT_MAX_ANGLE,
        DEFAULT_MIN_ANGLE, DEFAULT_MODEL_INPUT_SIZE, DEFAULT_PADDING,
    },
    profile::{Side, SideProfile},
    rep_counter::Thresholds,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pose model configuration
    pub model: ModelConfig,

    /// Video input configuration
    pub video: VideoConfig,

    /// Repetition counter thresholds
    pub counter: CounterConfig,

    /// Canonical placement of the reference line
    pub alignment: AlignmentConfig,

    /// Anatomical tables per side
    pub sides: SidesConfig,

    /// Display configuration
    pub display: DisplayConfig,
}

/// Pose model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the YOLOv8-pose ONNX model
    pub path: PathBuf,

    /// Square model input size in pixels
    pub input_size: i32,

    /// Minimum person score (0.0-1.0)
    pub confidence_threshold: f32,

    /// IOU threshold for non-maximum suppression (0.0-1.0)
    pub iou_threshold: f32,

    /// Keypoints below this confidence are treated as missing (0.0-1.0)
    pub keypoint_confidence: f32,
}

/// Video input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Root folder holding `L`, `R` and `F` sample subfolders
    pub directory: PathBuf,

    /// Frames are resized to this width before processing
    pub frame_width: i32,

    /// Frames are resized to this height before processing
    pub frame_height: i32,
}

/// Hysteresis thresholds in degrees
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    /// Below this angle the arms count as fully bent
    pub min_angle: f64,

    /// Above this angle the arms count as fully extended
    pub max_angle: f64,
}

/// Canonical placement of the reference line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Vertical position of the centered reference line
    pub fixed_y: f64,

    /// Length of the reference line after normalization
    pub fixed_length: f64,

    /// Margin kept free on every frame edge
    pub padding: f64,
}

/// Anatomical tables per side
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SidesConfig {
    pub left: SideProfile,
    pub right: SideProfile,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Window title
    pub window_name: String,

    /// Menu background image, a text menu is drawn when it cannot be read
    pub background: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("assets/yolov8n-pose.onnx"),
            input_size: DEFAULT_MODEL_INPUT_SIZE,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            keypoint_confidence: DEFAULT_KEYPOINT_CONFIDENCE,
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("Videos"),
            frame_width: DEFAULT_FRAME_WIDTH,
            frame_height: DEFAULT_FRAME_HEIGHT,
        }
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            min_angle: DEFAULT_MIN_ANGLE,
            max_angle: DEFAULT_MAX_ANGLE,
        }
    }
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            fixed_y: DEFAULT_FIXED_Y,
            fixed_length: DEFAULT_FIXED_LENGTH,
            padding: DEFAULT_PADDING,
        }
    }
}

impl Default for SidesConfig {
    fn default() -> Self {
        Self {
            left: SideProfile::left(),
            right: SideProfile::right(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            window_name: "PushUp Counter".to_string(),
            background: PathBuf::from("bg.png"),
        }
    }
}

impl SidesConfig {
    #[must_use]
    pub fn profile(&self, side: Side) -> &SideProfile {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Counter thresholds as a validated value
    pub fn thresholds(&self) -> Result<Thresholds> {
        Thresholds::new(self.counter.min_angle, self.counter.max_angle)
            .map_err(|e| Error::ConfigError(e.to_string()))
    }

    /// Processing frame size
    #[must_use]
    pub fn frame_size(&self) -> FrameSize {
        FrameSize::new(self.video.frame_width, self.video.frame_height)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        // Validate model thresholds
        for (name, value) in [
            ("Confidence threshold", self.model.confidence_threshold),
            ("IOU threshold", self.model.iou_threshold),
            ("Keypoint confidence", self.model.keypoint_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::ConfigError(format!("{name} must be between 0.0 and 1.0")));
            }
        }
        if self.model.input_size <= 0 || self.model.input_size % 32 != 0 {
            return Err(Error::ConfigError(
                "Model input size must be a positive multiple of 32".to_string(),
            ));
        }

        // Validate frame and placement
        if self.video.frame_width <= 0 || self.video.frame_height <= 0 {
            return Err(Error::ConfigError("Frame size must be positive".to_string()));
        }
        self.thresholds()?;
        if !(self.alignment.fixed_length.is_finite() && self.alignment.fixed_length > 0.0) {
            return Err(Error::ConfigError("Fixed length must be greater than 0".to_string()));
        }
        let padding = self.alignment.padding;
        if !(padding.is_finite() && padding >= 0.0)
            || 2.0 * padding > f64::from(self.video.frame_width)
            || 2.0 * padding > f64::from(self.video.frame_height)
        {
            return Err(Error::ConfigError(format!(
                "Padding {padding} does not fit a {}x{} frame",
                self.video.frame_width, self.video.frame_height
            )));
        }

        // Validate anatomical tables
        self.sides.left.validate("sides.left")?;
        self.sides.right.validate("sides.right")?;

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Push-up Counter Configuration

# Pose model
model:
  path: "assets/yolov8n-pose.onnx"
  input_size: 640
  confidence_threshold: 0.5
  iou_threshold: 0.45
  keypoint_confidence: 0.25

# Video input
video:
  directory: "Videos"
  frame_width: 1280
  frame_height: 720

# Elbow angle hysteresis (degrees)
counter:
  min_angle: 95.0
  max_angle: 130.0

# Reference line placement
alignment:
  fixed_y: 50.0
  fixed_length: 400.0
  padding: 15.0

# Anatomical tables (front sessions pin the anchor to fixed_start)
sides:
  left:
    body: [nose, left_shoulder, left_elbow, left_wrist, left_hip, left_knee, left_ankle]
    body_connections: [[1, 2], [2, 3], [1, 4], [4, 5], [5, 6], [1, 6]]
    relative: [nose, left_elbow, left_shoulder, left_hip, left_knee, left_ankle]
    relative_connections: [[2, 3], [3, 4], [4, 5], [2, 5]]
    anchor: left_shoulder
    end: left_ankle
    joint: [left_shoulder, left_elbow, left_wrist]
    fixed_start: [690.0, 50.0]
  right:
    body: [nose, right_shoulder, right_elbow, right_wrist, right_hip, right_knee, right_ankle]
    body_connections: [[1, 2], [2, 3], [1, 4], [4, 5], [5, 6], [1, 6]]
    relative: [nose, right_elbow, right_shoulder, right_hip, right_knee, right_ankle]
    relative_connections: [[2, 3], [3, 4], [4, 5], [2, 5]]
    anchor: right_ankle
    end: right_shoulder
    joint: [right_shoulder, right_elbow, right_wrist]
    fixed_start: [190.0, 50.0]

# Display settings
display:
  window_name: "PushUp Counter"
  background: "bg.png"
"#;
