//! Constants used throughout the application

/// Number of keypoints in the COCO body layout
pub const NUM_KEYPOINTS: usize = 17;

/// Values per keypoint in the pose model output (x, y, confidence)
pub const KEYPOINT_STRIDE: usize = 3;

/// Box values preceding the keypoints in each prediction (cx, cy, w, h, score)
pub const BOX_VALUES: usize = 5;

/// Default processing frame size
pub const DEFAULT_FRAME_WIDTH: i32 = 1280;
pub const DEFAULT_FRAME_HEIGHT: i32 = 720;

/// Default hysteresis thresholds in degrees
pub const DEFAULT_MIN_ANGLE: f64 = 95.0;
pub const DEFAULT_MAX_ANGLE: f64 = 130.0;

/// Default canonical placement
pub const DEFAULT_FIXED_LENGTH: f64 = 400.0;
pub const DEFAULT_FIXED_Y: f64 = 50.0;
pub const DEFAULT_PADDING: f64 = 15.0;
pub const DEFAULT_LEFT_FIXED_START: [f64; 2] = [690.0, 50.0];
pub const DEFAULT_RIGHT_FIXED_START: [f64; 2] = [190.0, 50.0];

/// Pose model defaults
pub const DEFAULT_MODEL_INPUT_SIZE: i32 = 640;
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;
pub const DEFAULT_IOU_THRESHOLD: f32 = 0.45;
pub const DEFAULT_KEYPOINT_CONFIDENCE: f32 = 0.25;

/// Letterbox padding value used by the YOLO family
pub const LETTERBOX_FILL: f64 = 114.0;

/// Key codes
pub const KEY_ESC: i32 = 27;

/// Numeric precision epsilon
pub const EPSILON: f64 = 1e-9;
