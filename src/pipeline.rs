//! Per-frame orchestration: keypoints in, counter update and overlay data out.

use crate::{
    alignment::{align, AlignmentTarget, FrameSize, ReferenceSegment},
    angle::joint_angle,
    config::Config,
    profile::{BodySide, Side, SideProfile},
    rep_counter::{CounterState, RepCounter},
    skeleton::{Point, Skeleton},
    Result,
};
use log::{debug, info, warn};

/// Angle measured at a joint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointReading {
    pub vertex: Point,
    pub angle: f64,
}

/// Outcome of processing one side of the body
#[derive(Debug, Clone)]
pub struct SideReport {
    pub side: Side,
    /// Raw keypoints of the side, in profile order
    pub body: Option<Vec<Point>>,
    /// Elbow angle
    pub joint: Option<JointReading>,
    /// Relative keypoints after normalization
    pub aligned: Option<Vec<Point>>,
    /// Whether the angle reached the counter this frame
    pub counted: bool,
    /// Why counting was skipped
    pub skipped: Option<String>,
}

/// Outcome of processing one frame
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    /// Whether the pose model found a person
    pub detected: bool,
    pub sides: Vec<SideReport>,
}

impl FrameReport {
    /// Angle of the last side that produced one
    #[must_use]
    pub fn latest_angle(&self) -> Option<f64> {
        self.sides.iter().rev().find_map(|s| s.joint.map(|j| j.angle))
    }

    /// Whether any side fed the counter
    #[must_use]
    pub fn counted(&self) -> bool {
        self.sides.iter().any(|s| s.counted)
    }
}

struct SideStage {
    side: Side,
    profile: SideProfile,
    target: AlignmentTarget,
}

/// Frame pipeline for one session view
///
/// Owns the counter state shared by every side of the view.
pub struct FramePipeline {
    view: BodySide,
    stages: Vec<SideStage>,
    counter: RepCounter,
    frame: FrameSize,
}

impl FramePipeline {
    /// Build a pipeline, resolving side tables and placements once
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the configuration does not validate.
    pub fn new(view: BodySide, config: &Config) -> Result<Self> {
        config.validate()?;

        let stages = view
            .sides()
            .iter()
            .map(|&side| {
                let profile = config.sides.profile(side).clone();
                let target = profile.alignment_target(view, &config.alignment);
                SideStage { side, profile, target }
            })
            .collect();

        info!("Frame pipeline ready for {} view", view);

        Ok(Self {
            view,
            stages,
            counter: RepCounter::new(config.thresholds()?),
            frame: config.frame_size(),
        })
    }

    #[must_use]
    pub fn view(&self) -> BodySide {
        self.view
    }

    #[must_use]
    pub fn frame_size(&self) -> FrameSize {
        self.frame
    }

    #[must_use]
    pub fn state(&self) -> CounterState {
        self.counter.state()
    }

    #[must_use]
    pub fn counter(&self) -> &RepCounter {
        &self.counter
    }

    /// Back to zero repetitions in the up phase
    pub fn reset(&mut self) {
        self.counter.reset();
    }

    /// Process the most confident person of a frame, if any
    pub fn process(&mut self, skeleton: Option<&Skeleton>) -> FrameReport {
        let Some(skeleton) = skeleton else {
            debug!("No person detected, frame skipped for counting");
            return FrameReport::default();
        };

        let mut sides = Vec::with_capacity(self.stages.len());
        for stage in &self.stages {
            let mut report = evaluate_side(stage, skeleton, self.frame);
            if report.skipped.is_none() {
                if let Some(joint) = report.joint {
                    self.counter.update(joint.angle);
                    report.counted = true;
                }
            }
            sides.push(report);
        }

        FrameReport { detected: true, sides }
    }
}

fn evaluate_side(stage: &SideStage, skeleton: &Skeleton, frame: FrameSize) -> SideReport {
    let profile = &stage.profile;

    let body = skeleton.select(&profile.body);
    let joint = measure_joint(profile, skeleton);
    let aligned = normalize_side(profile, &stage.target, skeleton, frame);

    let failure = [joint.as_ref().err(), aligned.as_ref().err()].into_iter().flatten().next();
    if let Some(e) = failure {
        if e.is_frame_local() {
            debug!("{} side skipped for counting: {}", stage.side, e);
        } else {
            warn!("{} side skipped for counting: {}", stage.side, e);
        }
    }
    let skipped = failure.map(ToString::to_string);

    SideReport {
        side: stage.side,
        body: body.ok(),
        joint: joint.ok(),
        aligned: aligned.ok(),
        counted: false,
        skipped,
    }
}

fn measure_joint(profile: &SideProfile, skeleton: &Skeleton) -> Result<JointReading> {
    let [a, vertex, c] = profile.joint;
    let vertex = skeleton.get(vertex)?;
    let angle = joint_angle(skeleton.get(a)?, vertex, skeleton.get(c)?)?;
    Ok(JointReading { vertex, angle })
}

fn normalize_side(
    profile: &SideProfile,
    target: &AlignmentTarget,
    skeleton: &Skeleton,
    frame: FrameSize,
) -> Result<Vec<Point>> {
    let segment = ReferenceSegment::new(skeleton.get(profile.anchor)?, skeleton.get(profile.end)?);
    let relative = skeleton.select(&profile.relative)?;
    align(&relative, &segment, target, frame)
}
