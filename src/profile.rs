//! Per-side anatomical tables and session body side selection.

use crate::{
    alignment::{AlignmentTarget, Placement},
    config::AlignmentConfig,
    constants::{DEFAULT_LEFT_FIXED_START, DEFAULT_RIGHT_FIXED_START},
    skeleton::{KeypointIndex, Point},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One physical side of the body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

/// Camera view of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodySide {
    /// Filmed from the left, left arm counted
    Left,
    /// Filmed from the right, right arm counted
    Right,
    /// Filmed from the front, both arms feed one counter
    Front,
}

impl BodySide {
    /// Sides processed every frame
    #[must_use]
    pub fn sides(self) -> &'static [Side] {
        match self {
            Self::Left => &[Side::Left],
            Self::Right => &[Side::Right],
            Self::Front => &[Side::Left, Side::Right],
        }
    }

    /// Sample video subfolder for this view
    #[must_use]
    pub fn folder_name(self) -> &'static str {
        match self {
            Self::Left => "L",
            Self::Right => "R",
            Self::Front => "F",
        }
    }

    /// Front sessions pin each side to its own fixed start point, single
    /// side sessions center the reference line instead
    #[must_use]
    pub fn uses_fixed_points(self) -> bool {
        self == Self::Front
    }
}

impl fmt::Display for BodySide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
            Self::Front => f.write_str("front"),
        }
    }
}

impl FromStr for BodySide {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "l" | "left" => Ok(Self::Left),
            "r" | "right" => Ok(Self::Right),
            "f" | "front" => Ok(Self::Front),
            _ => Err(Error::InvalidInput(format!(
                "Unknown body side: {s} (expected left, right or front)"
            ))),
        }
    }
}

/// Keypoint tables for one side of the body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideProfile {
    /// Raw keypoints drawn on the frame
    pub body: Vec<KeypointIndex>,

    /// Lines between `body` entries (positions in `body`)
    pub body_connections: Vec<(usize, usize)>,

    /// Keypoints carried through alignment
    pub relative: Vec<KeypointIndex>,

    /// Lines between aligned `relative` entries; the last one is the
    /// reference line
    pub relative_connections: Vec<(usize, usize)>,

    /// Reference segment start
    pub anchor: KeypointIndex,

    /// Reference segment end
    pub end: KeypointIndex,

    /// Shoulder, elbow, wrist; the angle is measured at the middle one
    pub joint: [KeypointIndex; 3],

    /// Anchor position in front sessions
    pub fixed_start: [f64; 2],
}

impl SideProfile {
    #[must_use]
    pub fn left() -> Self {
        use KeypointIndex::*;
        Self {
            body: vec![Nose, LeftShoulder, LeftElbow, LeftWrist, LeftHip, LeftKnee, LeftAnkle],
            body_connections: vec![(1, 2), (2, 3), (1, 4), (4, 5), (5, 6), (1, 6)],
            relative: vec![Nose, LeftElbow, LeftShoulder, LeftHip, LeftKnee, LeftAnkle],
            relative_connections: vec![(2, 3), (3, 4), (4, 5), (2, 5)],
            anchor: LeftShoulder,
            end: LeftAnkle,
            joint: [LeftShoulder, LeftElbow, LeftWrist],
            fixed_start: DEFAULT_LEFT_FIXED_START,
        }
    }

    #[must_use]
    pub fn right() -> Self {
        use KeypointIndex::*;
        Self {
            body: vec![Nose, RightShoulder, RightElbow, RightWrist, RightHip, RightKnee, RightAnkle],
            body_connections: vec![(1, 2), (2, 3), (1, 4), (4, 5), (5, 6), (1, 6)],
            relative: vec![Nose, RightElbow, RightShoulder, RightHip, RightKnee, RightAnkle],
            relative_connections: vec![(2, 3), (3, 4), (4, 5), (2, 5)],
            anchor: RightAnkle,
            end: RightShoulder,
            joint: [RightShoulder, RightElbow, RightWrist],
            fixed_start: DEFAULT_RIGHT_FIXED_START,
        }
    }

    /// Check table consistency
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if a connection points past its table,
    /// the reference endpoints coincide, or the joint triple repeats a
    /// keypoint.
    pub fn validate(&self, name: &str) -> Result<()> {
        check_connections(name, "body", &self.body_connections, self.body.len())?;
        check_connections(name, "relative", &self.relative_connections, self.relative.len())?;

        if self.anchor == self.end {
            return Err(Error::ConfigError(format!(
                "{name}: reference anchor and end are both {:?}",
                self.anchor
            )));
        }

        let [a, vertex, c] = self.joint;
        if a == vertex || vertex == c || a == c {
            return Err(Error::ConfigError(format!(
                "{name}: joint keypoints must be distinct, got {:?}",
                self.joint
            )));
        }

        if !self.fixed_start.iter().all(|v| v.is_finite()) {
            return Err(Error::ConfigError(format!("{name}: fixed_start must be finite")));
        }

        Ok(())
    }

    /// Resolve the canonical placement for a session view
    #[must_use]
    pub fn alignment_target(&self, view: BodySide, alignment: &AlignmentConfig) -> AlignmentTarget {
        let placement = if view.uses_fixed_points() {
            Placement::FixedPoint(Point::new(self.fixed_start[0], self.fixed_start[1]))
        } else {
            Placement::Centered { y: alignment.fixed_y }
        };

        AlignmentTarget {
            placement,
            length: alignment.fixed_length,
            padding: alignment.padding,
        }
    }
}

fn check_connections(name: &str, table: &str, connections: &[(usize, usize)], len: usize) -> Result<()> {
    if let Some(&(i, j)) = connections.iter().find(|&&(i, j)| i >= len || j >= len) {
        return Err(Error::ConfigError(format!(
            "{name}: {table} connection ({i}, {j}) is out of range for {len} keypoints"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profiles_are_valid() {
        SideProfile::left().validate("left").unwrap();
        SideProfile::right().validate("right").unwrap();
    }

    #[test]
    fn test_out_of_range_connection_is_rejected() {
        let mut profile = SideProfile::left();
        profile.relative_connections.push((2, 6));
        match profile.validate("left") {
            Err(Error::ConfigError(msg)) => assert!(msg.contains("(2, 6)")),
            other => panic!("Expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn test_repeated_joint_is_rejected() {
        let mut profile = SideProfile::right();
        profile.joint[2] = profile.joint[1];
        assert!(profile.validate("right").is_err());
    }

    #[test]
    fn test_body_side_parsing() {
        assert_eq!("L".parse::<BodySide>().unwrap(), BodySide::Left);
        assert_eq!("right".parse::<BodySide>().unwrap(), BodySide::Right);
        assert_eq!("Front".parse::<BodySide>().unwrap(), BodySide::Front);
        assert!("back".parse::<BodySide>().is_err());
    }

    #[test]
    fn test_front_uses_both_sides_and_fixed_points() {
        assert_eq!(BodySide::Front.sides(), &[Side::Left, Side::Right]);
        assert!(BodySide::Front.uses_fixed_points());
        assert!(!BodySide::Left.uses_fixed_points());

        let alignment = AlignmentConfig::default();
        let target = SideProfile::right().alignment_target(BodySide::Front, &alignment);
        assert_eq!(target.placement, Placement::FixedPoint(Point::new(190.0, 50.0)));

        let target = SideProfile::right().alignment_target(BodySide::Right, &alignment);
        assert_eq!(target.placement, Placement::Centered { y: 50.0 });
    }
}
