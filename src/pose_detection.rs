use crate::{
    config::ModelConfig,
    constants::{BOX_VALUES, KEYPOINT_STRIDE, NUM_KEYPOINTS},
    skeleton::{Point, Skeleton},
    utils::image_conversion::{bgr_to_nchw, letterbox, LetterboxInfo},
    Error, Result,
};
use ndarray::{ArrayView2, Axis, CowArray, Ix3};
use opencv::core::Mat;
use opencv::prelude::*;
use ort::{Environment, Session, Value};
use std::cmp::Ordering;
use std::path::Path;
use std::sync::Arc;

/// Rows per prediction column in the YOLOv8-pose output
pub const PREDICTION_ROWS: usize = BOX_VALUES + NUM_KEYPOINTS * KEYPOINT_STRIDE;

/// Anything that turns a frame into detected people
///
/// People are ordered by descending confidence; the first one is the
/// person the counter follows.
pub trait PoseModel {
    /// Detect people in a BGR frame
    ///
    /// # Errors
    ///
    /// Returns an error if preprocessing or inference fails.
    fn detect(&mut self, frame: &Mat) -> Result<Vec<Skeleton>>;
}

/// Thresholds applied while decoding raw predictions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodeParams {
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
    pub keypoint_confidence: f32,
}

impl From<&ModelConfig> for DecodeParams {
    fn from(config: &ModelConfig) -> Self {
        Self {
            confidence_threshold: config.confidence_threshold,
            iou_threshold: config.iou_threshold,
            keypoint_confidence: config.keypoint_confidence,
        }
    }
}

/// One detected person in frame coordinates
#[derive(Debug, Clone)]
pub struct PersonDetection {
    /// Box corners `[x1, y1, x2, y2]`
    pub bbox: [f64; 4],
    pub score: f32,
    pub skeleton: Skeleton,
}

impl PersonDetection {
    fn area(&self) -> f64 {
        (self.bbox[2] - self.bbox[0]).max(0.0) * (self.bbox[3] - self.bbox[1]).max(0.0)
    }

    /// Intersection over union of two boxes
    #[must_use]
    pub fn iou(&self, other: &Self) -> f64 {
        let w = (self.bbox[2].min(other.bbox[2]) - self.bbox[0].max(other.bbox[0])).max(0.0);
        let h = (self.bbox[3].min(other.bbox[3]) - self.bbox[1].max(other.bbox[1])).max(0.0);
        let inter = w * h;
        let union = self.area() + other.area() - inter;
        if union > 0.0 {
            inter / union
        } else {
            0.0
        }
    }
}

/// Decode a `[56, N]` YOLOv8-pose prediction matrix
///
/// Each column holds `cx, cy, w, h, score` followed by 17 `(x, y, conf)`
/// triples in model input pixels. Columns below the confidence threshold
/// are dropped, overlapping boxes are suppressed greedily, and keypoints
/// below the keypoint threshold come back as NaN.
///
/// # Errors
///
/// Returns `Error::ModelOutputError` if the matrix has the wrong number of
/// rows.
pub fn decode_predictions(
    predictions: ArrayView2<f32>,
    params: &DecodeParams,
    letterbox: &LetterboxInfo,
) -> Result<Vec<PersonDetection>> {
    if predictions.nrows() != PREDICTION_ROWS {
        return Err(Error::ModelOutputError(format!(
            "Expected {PREDICTION_ROWS} rows per prediction, got {}",
            predictions.nrows()
        )));
    }

    let mut candidates: Vec<PersonDetection> = predictions
        .axis_iter(Axis(1))
        .filter(|column| column[4] > params.confidence_threshold)
        .map(|column| {
            let (cx, cy) = letterbox.to_frame(column[0], column[1]);
            let (w, h) = letterbox.to_frame(column[2], column[3]);

            let points = (0..NUM_KEYPOINTS)
                .map(|k| {
                    let base = BOX_VALUES + k * KEYPOINT_STRIDE;
                    if column[base + 2] < params.keypoint_confidence {
                        Point::new(f64::NAN, f64::NAN)
                    } else {
                        let (x, y) = letterbox.to_frame(column[base], column[base + 1]);
                        Point::new(x, y)
                    }
                })
                .collect();

            PersonDetection {
                bbox: [cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0],
                score: column[4],
                skeleton: Skeleton::new(points),
            }
        })
        .collect();

    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let mut kept: Vec<PersonDetection> = Vec::new();
    for candidate in candidates {
        if kept
            .iter()
            .all(|k| k.iou(&candidate) <= f64::from(params.iou_threshold))
        {
            kept.push(candidate);
        }
    }

    Ok(kept)
}

/// YOLOv8-pose detector running on `ONNX` Runtime
pub struct YoloPoseDetector {
    session: Session,
    input_size: i32,
    params: DecodeParams,
}

impl YoloPoseDetector {
    /// Load the pose model
    ///
    /// # Errors
    ///
    /// Returns `Error::ResourceUnavailable` if the model file is missing and
    /// an `ONNX` Runtime error if it cannot be loaded.
    pub fn new(config: &ModelConfig) -> Result<Self> {
        Self::from_file(&config.path, config.input_size, DecodeParams::from(config))
    }

    /// Load a pose model with explicit input size and thresholds
    ///
    /// # Errors
    ///
    /// See [`YoloPoseDetector::new`].
    pub fn from_file<P: AsRef<Path>>(model_path: P, input_size: i32, params: DecodeParams) -> Result<Self> {
        let model_path = model_path.as_ref();
        log::info!("Initializing YoloPoseDetector with model: {}", model_path.display());

        if !model_path.is_file() {
            return Err(Error::ResourceUnavailable(format!(
                "Pose model not found: {}",
                model_path.display()
            )));
        }

        let environment = Arc::new(
            Environment::builder()
                .with_name("pose_detector")
                .with_log_level(ort::LoggingLevel::Warning)
                .build()?,
        );

        let session = ort::SessionBuilder::new(&environment)?
            .with_optimization_level(ort::GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)?;

        let input = session
            .inputs
            .first()
            .ok_or_else(|| Error::ModelInputError("Model has no inputs".to_string()))?;
        log::debug!("Model input '{}' with dimensions {:?}", input.name, input.dimensions);

        if session.outputs.is_empty() {
            return Err(Error::ModelOutputError("Model has no outputs".to_string()));
        }

        Ok(Self {
            session,
            input_size,
            params,
        })
    }

    fn forward(&self, tensor: ndarray::Array4<f32>, info: &LetterboxInfo) -> Result<Vec<PersonDetection>> {
        let cow_array = CowArray::from(tensor.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;

        let outputs = self.session.run(vec![input_tensor])?;
        let output = outputs
            .first()
            .ok_or_else(|| Error::ModelOutputError("No output from model".to_string()))?;

        let extracted = output.try_extract::<f32>()?;
        let view = extracted
            .view()
            .into_dimensionality::<Ix3>()
            .map_err(|e| Error::ModelOutputError(format!("Unexpected output shape: {e}")))?;
        if view.shape()[0] == 0 {
            return Ok(Vec::new());
        }

        decode_predictions(view.index_axis(Axis(0), 0), &self.params, info)
    }
}

impl PoseModel for YoloPoseDetector {
    fn detect(&mut self, frame: &Mat) -> Result<Vec<Skeleton>> {
        if frame.empty() {
            return Err(Error::InvalidInput("Empty frame".to_string()));
        }

        let (padded, info) = letterbox(frame, self.input_size)?;
        let tensor = bgr_to_nchw(&padded)?;
        let people = self.forward(tensor, &info)?;

        Ok(people.into_iter().map(|p| p.skeleton).collect())
    }
}
