//! Push-up repetition counter driven by body keypoints.
//!
//! This library counts push-ups in recorded or live video:
//! - ONNX Runtime runs a YOLOv8-pose model to find body keypoints
//! - `OpenCV` handles video input, drawing and the menu window
//! - A hysteresis state machine on the elbow angle counts repetitions
//!
//! Each frame goes through:
//! 1. Pose detection, keeping the most confident person
//! 2. Elbow angle measurement from shoulder, elbow and wrist
//! 3. Normalization of the side skeleton onto a fixed reference line
//! 4. A counter update when both angle and normalization succeeded
//! 5. Overlay drawing: keypoints, skeleton, phase bar and count
//!
//! # Examples
//!
//! ## Counting from angles
//!
//! ```no_run
//! use pushup_counter::rep_counter::{RepCounter, Thresholds};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut counter = RepCounter::new(Thresholds::new(95.0, 130.0)?);
//!
//! for angle in [150.0, 90.0, 100.0, 140.0] {
//!     counter.update(angle);
//! }
//! println!("Push-ups: {}", counter.state().count);
//! # Ok(())
//! # }
//! ```
//!
//! ## Normalizing a skeleton
//!
//! ```no_run
//! use pushup_counter::alignment::{align, AlignmentTarget, FrameSize, Placement, ReferenceSegment};
//! use pushup_counter::skeleton::Point;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let segment = ReferenceSegment::new(Point::new(300.0, 400.0), Point::new(900.0, 600.0));
//! let target = AlignmentTarget {
//!     placement: Placement::Centered { y: 50.0 },
//!     length: 400.0,
//!     padding: 15.0,
//! };
//! let aligned = align(&[segment.anchor, segment.end], &segment, &target, FrameSize::new(1280, 720))?;
//! println!("{aligned:?}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Complete Pipeline Example
//!
//! ```no_run
//! use pushup_counter::{
//!     config::Config,
//!     pipeline::FramePipeline,
//!     pose_detection::{PoseModel, YoloPoseDetector},
//!     profile::BodySide,
//!     render::OverlayRenderer,
//! };
//! use opencv::{core::Mat, highgui, prelude::*, videoio};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let mut detector = YoloPoseDetector::new(&config.model)?;
//! let mut pipeline = FramePipeline::new(BodySide::Left, &config)?;
//! let renderer = OverlayRenderer::new(config.thresholds()?, config.sides.clone());
//!
//! let mut cap = videoio::VideoCapture::from_file("Videos/L/sample.mp4", videoio::CAP_ANY)?;
//! let mut frame = Mat::default();
//! while cap.read(&mut frame)? && !frame.empty() {
//!     let people = detector.detect(&frame)?;
//!     let report = pipeline.process(people.first());
//!     renderer.render(&mut frame, &report, pipeline.state())?;
//!
//!     highgui::imshow("PushUp Counter", &frame)?;
//!     if highgui::wait_key(1)? == 27 {
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

/// Similarity transform onto a canonical reference line
pub mod alignment;

/// Interior joint angles
pub mod angle;

/// Menu and session loops
pub mod app;

/// YAML configuration
pub mod config;

/// Shared default values
pub mod constants;

/// Error types
pub mod error;

/// Per-frame orchestration
pub mod pipeline;

/// Pose model trait and YOLOv8-pose detector
pub mod pose_detection;

/// Side tables and session views
pub mod profile;

/// Frame overlays
pub mod render;

/// Hysteresis repetition counter
pub mod rep_counter;

/// COCO keypoints
pub mod skeleton;

/// Conversion helpers
pub mod utils;

/// Video sources and sample selection
pub mod video;

pub use error::{Error, Result};
