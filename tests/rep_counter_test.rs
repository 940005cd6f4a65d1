//! Behavior of the hysteresis counter on angle sequences

use proptest::prelude::*;
use pushup_counter::rep_counter::{step, CounterState, Phase, RepCounter, Thresholds};

fn replay(angles: &[f64]) -> (Vec<Phase>, u32) {
    let mut counter = RepCounter::new(Thresholds::default());
    let phases = angles.iter().map(|&a| counter.update(a).phase).collect();
    (phases, counter.state().count)
}

#[test]
fn test_single_cycle() {
    let (phases, count) = replay(&[130.0, 94.0, 95.0, 131.0]);
    assert_eq!(phases, vec![Phase::Up, Phase::Down, Phase::Down, Phase::Up]);
    assert_eq!(count, 1);
}

#[test]
fn test_bounce_at_the_bottom_counts_once() {
    let (_, count) = replay(&[130.0, 90.0, 100.0, 90.0, 131.0, 90.0, 131.0]);
    assert_eq!(count, 2);
}

#[test]
fn test_thresholds_are_strict() {
    let (phases, count) = replay(&[95.0, 130.0, 95.0]);
    assert!(phases.iter().all(|&p| p == Phase::Up));
    assert_eq!(count, 0);

    let (phases, count) = replay(&[94.9, 130.0]);
    assert_eq!(phases, vec![Phase::Down, Phase::Down]);
    assert_eq!(count, 0);
}

#[test]
fn test_reset() {
    let mut counter = RepCounter::new(Thresholds::default());
    for angle in [150.0, 80.0, 150.0, 80.0] {
        counter.update(angle);
    }
    assert_eq!(
        counter.state(),
        CounterState {
            count: 1,
            phase: Phase::Down
        }
    );

    counter.reset();
    assert_eq!(counter.state(), CounterState::default());
}

#[test]
fn test_invalid_thresholds() {
    assert!(Thresholds::new(130.0, 95.0).is_err());
    assert!(Thresholds::new(100.0, 100.0).is_err());
    assert!(Thresholds::new(f64::NAN, 100.0).is_err());
}

proptest! {
    #[test]
    fn prop_jitter_inside_band_never_changes_state(
        angles in prop::collection::vec(95.0f64..=130.0, 0..200),
        down in any::<bool>(),
        count in 0u32..50,
    ) {
        let thresholds = Thresholds::default();
        let start = CounterState { count, phase: if down { Phase::Down } else { Phase::Up } };
        let end = angles.iter().fold(start, |s, &a| step(s, a, &thresholds));
        prop_assert_eq!(end, start);
    }

    #[test]
    fn prop_count_equals_completed_cycles(
        cycles in prop::collection::vec((10.0f64..94.9, 130.1f64..180.0, 0usize..4), 0..30),
    ) {
        let thresholds = Thresholds::default();
        let mut state = CounterState::default();

        for &(low, high, jitter) in &cycles {
            state = step(state, low, &thresholds);
            for i in 0..jitter {
                state = step(state, 100.0 + i as f64, &thresholds);
            }
            state = step(state, high, &thresholds);
            prop_assert_eq!(state.phase, Phase::Up);
        }

        prop_assert_eq!(state.count as usize, cycles.len());
    }

    #[test]
    fn prop_count_never_decreases(angles in prop::collection::vec(0.0f64..=180.0, 0..300)) {
        let thresholds = Thresholds::default();
        let mut state = CounterState::default();
        for &angle in &angles {
            let next = step(state, angle, &thresholds);
            prop_assert!(next.count >= state.count);
            prop_assert!(next.count <= state.count + 1);
            state = next;
        }
    }
}
