//! Normalization of keypoints onto a canonical reference line.
//!
//! A reference segment (for example shoulder to ankle) is rotated to be
//! horizontal, scaled to a fixed length and moved to a fixed place on the
//! frame. The same similarity transform is applied to every other point so
//! the whole body keeps its shape relative to the segment.

use crate::{constants::EPSILON, skeleton::Point, Error, Result};
use nalgebra::{Rotation2, Vector2};

/// Frame dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    pub width: i32,
    pub height: i32,
}

impl FrameSize {
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Two keypoints defining the line used for normalization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceSegment {
    pub anchor: Point,
    pub end: Point,
}

impl ReferenceSegment {
    #[must_use]
    pub fn new(anchor: Point, end: Point) -> Self {
        Self { anchor, end }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end - self.anchor).norm()
    }

    #[must_use]
    pub fn midpoint(&self) -> Point {
        nalgebra::center(&self.anchor, &self.end)
    }
}

/// Where the normalized segment is placed on the frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// The anchor snaps to an absolute frame coordinate
    FixedPoint(Point),
    /// The segment midpoint snaps to the horizontal frame center at `y`
    Centered { y: f64 },
}

/// Canonical placement, length and edge padding of the reference segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentTarget {
    pub placement: Placement,
    pub length: f64,
    pub padding: f64,
}

/// Similarity transform solved from a reference segment and a target
#[derive(Debug, Clone, Copy)]
pub struct Alignment {
    pivot: Point,
    rotation: Rotation2<f64>,
    rotated_center: Point,
    scale: f64,
    shift: Vector2<f64>,
    frame: FrameSize,
    padding: f64,
}

impl Alignment {
    /// Solve the transform mapping `segment` onto `target`
    ///
    /// # Errors
    ///
    /// Returns `Error::DegenerateGeometry` if the segment has (near) zero or
    /// non-finite length, and `Error::InvalidInput` if the frame cannot
    /// hold the padding or the target length is not positive.
    pub fn solve(segment: &ReferenceSegment, target: &AlignmentTarget, frame: FrameSize) -> Result<Self> {
        check_frame(frame, target.padding)?;
        if !(target.length.is_finite() && target.length > 0.0) {
            return Err(Error::InvalidInput(format!(
                "Target length must be positive, got {}",
                target.length
            )));
        }

        let direction = segment.end - segment.anchor;
        let length = direction.norm();
        if !length.is_finite() || length < EPSILON {
            return Err(Error::DegenerateGeometry(format!(
                "reference segment from ({:.1}, {:.1}) to ({:.1}, {:.1}) has length {length}",
                segment.anchor.x, segment.anchor.y, segment.end.x, segment.end.y
            )));
        }

        let pivot = segment.midpoint();
        let rotation = Rotation2::new(-direction.y.atan2(direction.x));

        let rotated_anchor = rotate_about(segment.anchor, pivot, &rotation);
        let rotated_end = rotate_about(segment.end, pivot, &rotation);
        let rotated_center = nalgebra::center(&rotated_anchor, &rotated_end);

        let scale = target.length / length;

        let shift = match target.placement {
            Placement::FixedPoint(start) => {
                let scaled_anchor = scale_about(rotated_anchor, rotated_center, scale);
                start - scaled_anchor
            }
            Placement::Centered { y } => {
                Vector2::new(f64::from(frame.width) / 2.0 - rotated_center.x, y - rotated_center.y)
            }
        };

        Ok(Self {
            pivot,
            rotation,
            rotated_center,
            scale,
            shift,
            frame,
            padding: target.padding,
        })
    }

    /// Uniform scale factor applied after rotation
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Rotation angle in radians
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.rotation.angle()
    }

    /// Transform a point without clamping it to the frame
    #[must_use]
    pub fn apply(&self, point: Point) -> Point {
        let rotated = rotate_about(point, self.pivot, &self.rotation);
        scale_about(rotated, self.rotated_center, self.scale) + self.shift
    }

    /// Transform a point and clamp it inside the padded frame
    #[must_use]
    pub fn apply_clamped(&self, point: Point) -> Point {
        clamp_unchecked(self.apply(point), self.frame, self.padding)
    }
}

/// Align `points` so that `segment` lands on `target`
///
/// Output order matches input order and every output point lies within
/// `[padding, width - padding] x [padding, height - padding]`.
///
/// # Errors
///
/// See [`Alignment::solve`].
pub fn align(
    points: &[Point],
    segment: &ReferenceSegment,
    target: &AlignmentTarget,
    frame: FrameSize,
) -> Result<Vec<Point>> {
    let alignment = Alignment::solve(segment, target, frame)?;
    Ok(points.iter().map(|&p| alignment.apply_clamped(p)).collect())
}

/// Clamp a point inside the frame minus `padding` on every edge
///
/// # Errors
///
/// Returns `Error::InvalidInput` if the padding does not fit the frame.
pub fn clamp_to_frame(point: Point, frame: FrameSize, padding: f64) -> Result<Point> {
    check_frame(frame, padding)?;
    Ok(clamp_unchecked(point, frame, padding))
}

fn clamp_unchecked(point: Point, frame: FrameSize, padding: f64) -> Point {
    Point::new(
        point.x.clamp(padding, f64::from(frame.width) - padding),
        point.y.clamp(padding, f64::from(frame.height) - padding),
    )
}

fn check_frame(frame: FrameSize, padding: f64) -> Result<()> {
    if !(padding.is_finite() && padding >= 0.0) {
        return Err(Error::InvalidInput(format!("Padding must be non-negative, got {padding}")));
    }
    if 2.0 * padding > f64::from(frame.width) || 2.0 * padding > f64::from(frame.height) {
        return Err(Error::InvalidInput(format!(
            "Padding {padding} does not fit a {}x{} frame",
            frame.width, frame.height
        )));
    }
    Ok(())
}

fn rotate_about(point: Point, center: Point, rotation: &Rotation2<f64>) -> Point {
    center + rotation * (point - center)
}

fn scale_about(point: Point, center: Point, scale: f64) -> Point {
    center + (point - center) * scale
}
