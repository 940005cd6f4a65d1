//! Repetition counting from the elbow angle signal.
//!
//! Two thresholds form a hysteresis band: the phase only flips to
//! [`Phase::Down`] once the angle drops below `min_angle` and back to
//! [`Phase::Up`] once it rises above `max_angle`. Jitter inside the band
//! never changes the phase, so a repetition is counted exactly once per
//! full descent and extension.

use crate::{
    constants::{DEFAULT_MAX_ANGLE, DEFAULT_MIN_ANGLE},
    Error, Result,
};
use std::fmt;

/// Push-up phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Arms extended
    #[default]
    Up,
    /// Arms bent
    Down,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
        }
    }
}

/// Repetition count and current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterState {
    pub count: u32,
    pub phase: Phase,
}

/// Hysteresis thresholds in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    min_angle: f64,
    max_angle: f64,
}

impl Thresholds {
    /// Create thresholds, rejecting an empty or inverted band
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if either value is not finite or
    /// `min_angle >= max_angle`.
    pub fn new(min_angle: f64, max_angle: f64) -> Result<Self> {
        if !(min_angle.is_finite() && max_angle.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "Angle thresholds must be finite, got {min_angle} and {max_angle}"
            )));
        }
        if min_angle >= max_angle {
            return Err(Error::InvalidInput(format!(
                "min_angle ({min_angle}) must be below max_angle ({max_angle})"
            )));
        }
        Ok(Self { min_angle, max_angle })
    }

    #[must_use]
    pub fn min_angle(&self) -> f64 {
        self.min_angle
    }

    #[must_use]
    pub fn max_angle(&self) -> f64 {
        self.max_angle
    }

    /// Midpoint of the band
    #[must_use]
    pub fn mid(&self) -> f64 {
        (self.min_angle + self.max_angle) / 2.0
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_angle: DEFAULT_MIN_ANGLE,
            max_angle: DEFAULT_MAX_ANGLE,
        }
    }
}

/// Advance the state machine by one angle sample.
///
/// Non-finite angles leave the state untouched.
#[must_use]
pub fn step(state: CounterState, angle: f64, thresholds: &Thresholds) -> CounterState {
    if !angle.is_finite() {
        return state;
    }

    match state.phase {
        Phase::Up if angle < thresholds.min_angle => CounterState {
            count: state.count,
            phase: Phase::Down,
        },
        Phase::Down if angle > thresholds.max_angle => CounterState {
            count: state.count.saturating_add(1),
            phase: Phase::Up,
        },
        _ => state,
    }
}

/// Stateful wrapper around [`step`]
#[derive(Debug, Clone, Default)]
pub struct RepCounter {
    thresholds: Thresholds,
    state: CounterState,
}

impl RepCounter {
    #[must_use]
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            state: CounterState::default(),
        }
    }

    /// Feed one angle sample and return the updated state
    pub fn update(&mut self, angle: f64) -> CounterState {
        let next = step(self.state, angle, &self.thresholds);
        if next.count > self.state.count {
            log::info!("Repetition {} completed (angle {:.1})", next.count, angle);
        }
        self.state = next;
        next
    }

    #[must_use]
    pub fn state(&self) -> CounterState {
        self.state
    }

    #[must_use]
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Back to zero repetitions in the up phase
    pub fn reset(&mut self) {
        self.state = CounterState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(angles: &[f64]) -> (Vec<Phase>, u32) {
        let mut counter = RepCounter::default();
        let phases = angles.iter().map(|&a| counter.update(a).phase).collect();
        (phases, counter.state().count)
    }

    #[test]
    fn test_single_cycle() {
        let (phases, count) = run(&[130.0, 94.0, 95.0, 131.0]);
        assert_eq!(phases, vec![Phase::Up, Phase::Down, Phase::Down, Phase::Up]);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_two_cycles_with_jitter() {
        let (_, count) = run(&[130.0, 90.0, 100.0, 90.0, 131.0, 90.0, 131.0]);
        assert_eq!(count, 2);
    }

    #[test]
    fn test_band_oscillation_never_counts() {
        let angles: Vec<f64> = (0..50).map(|i| if i % 2 == 0 { 96.0 } else { 129.0 }).collect();
        let (phases, count) = run(&angles);
        assert_eq!(count, 0);
        assert!(phases.iter().all(|&p| p == Phase::Up));
    }

    #[test]
    fn test_thresholds_are_strict() {
        let (phases, count) = run(&[95.0, 130.0]);
        assert_eq!(phases, vec![Phase::Up, Phase::Up]);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_nan_does_not_mutate() {
        let thresholds = Thresholds::default();
        let down = CounterState { count: 3, phase: Phase::Down };
        assert_eq!(step(down, f64::NAN, &thresholds), down);
        assert_eq!(step(down, f64::INFINITY, &thresholds), down);
    }

    #[test]
    fn test_reset() {
        let mut counter = RepCounter::default();
        for angle in [90.0, 140.0, 90.0] {
            counter.update(angle);
        }
        assert_eq!(counter.state(), CounterState { count: 1, phase: Phase::Down });
        counter.reset();
        assert_eq!(counter.state(), CounterState::default());
    }

    #[test]
    fn test_threshold_validation() {
        assert!(Thresholds::new(95.0, 130.0).is_ok());
        assert!(Thresholds::new(130.0, 95.0).is_err());
        assert!(Thresholds::new(100.0, 100.0).is_err());
        assert!(Thresholds::new(f64::NAN, 100.0).is_err());
        assert!((Thresholds::default().mid() - 112.5).abs() < 1e-12);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Up.to_string(), "up");
        assert_eq!(Phase::Down.to_string(), "down");
    }
}
