//! Body keypoints in the COCO 17-point layout.

use crate::{constants::NUM_KEYPOINTS, Error, Result};
use serde::{Deserialize, Serialize};

/// 2D point in frame pixel coordinates
pub type Point = nalgebra::Point2<f64>;

/// COCO keypoint indices produced by the pose model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(usize)]
pub enum KeypointIndex {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl KeypointIndex {
    pub const COUNT: usize = NUM_KEYPOINTS;

    pub const ALL: [Self; NUM_KEYPOINTS] = [
        Self::Nose,
        Self::LeftEye,
        Self::RightEye,
        Self::LeftEar,
        Self::RightEar,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Keypoints of one detected person.
///
/// The pose model may return fewer points than the full layout, and
/// undetected keypoints carry non-finite coordinates, so every lookup is
/// checked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skeleton {
    points: Vec<Point>,
}

impl Skeleton {
    #[must_use]
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Build a skeleton from raw `(x, y)` pairs
    #[must_use]
    pub fn from_xy(coords: &[(f64, f64)]) -> Self {
        Self::new(coords.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Get a keypoint, failing if it is absent or has non-finite coordinates
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingDetection` if the index is past the detected
    /// points or the point was not located.
    pub fn get(&self, index: KeypointIndex) -> Result<Point> {
        let point = self.points.get(index.index()).ok_or_else(|| {
            Error::MissingDetection(format!(
                "{index:?} not detected ({} keypoints available)",
                self.points.len()
            ))
        })?;

        if point.x.is_finite() && point.y.is_finite() {
            Ok(*point)
        } else {
            Err(Error::MissingDetection(format!("{index:?} has no finite position")))
        }
    }

    /// Gather keypoints in the given order
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingDetection` on the first absent keypoint.
    pub fn select(&self, indices: &[KeypointIndex]) -> Result<Vec<Point>> {
        indices.iter().map(|&index| self.get(index)).collect()
    }

    /// Number of keypoints with finite coordinates
    #[must_use]
    pub fn detected_count(&self) -> usize {
        self.points.iter().filter(|p| p.x.is_finite() && p.y.is_finite()).count()
    }
}
