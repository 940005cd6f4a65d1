//! End-to-end tests of the frame pipeline and counting sessions


use pushup_counter::{
    app::{EndReason, Session},
    config::Config,
    pipeline::FramePipeline,
    profile::{BodySide, Side},
    render::OverlayRenderer,
    rep_counter::{CounterState, Phase},
    skeleton::{KeypointIndex, Point, Skeleton},
    Result,
};
use test_helpers::{create_test_image, pushup_angles, pushup_skeleton, without, ScriptedPoseModel};

fn run(view: BodySide, skeletons: &[Skeleton]) -> Result<FramePipeline> {
    let mut pipeline = FramePipeline::new(view, &Config::default())?;
    for skeleton in skeletons {
        pipeline.process(Some(skeleton));
    }
    Ok(pipeline)
}

#[test]
fn test_counts_side_view_pushups() -> Result<()> {
    let skeletons: Vec<Skeleton> = pushup_angles(3).into_iter().map(pushup_skeleton).collect();

    for view in [BodySide::Left, BodySide::Right] {
        let pipeline = run(view, &skeletons)?;
        assert_eq!(
            pipeline.state(),
            CounterState {
                count: 3,
                phase: Phase::Up
            },
            "{view} view"
        );
    }
    Ok(())
}

#[test]
fn test_front_view_shares_one_counter() -> Result<()> {
    let skeletons: Vec<Skeleton> = pushup_angles(2).into_iter().map(pushup_skeleton).collect();
    let pipeline = run(BodySide::Front, &skeletons)?;
    assert_eq!(pipeline.state().count, 2);
    Ok(())
}

#[test]
fn test_report_contents() -> Result<()> {
    let mut pipeline = FramePipeline::new(BodySide::Front, &Config::default())?;
    let report = pipeline.process(Some(&pushup_skeleton(100.0)));

    assert!(report.detected);
    assert!(report.counted());
    assert_eq!(report.sides.len(), 2);
    assert_eq!(report.sides[0].side, Side::Left);
    assert_eq!(report.sides[1].side, Side::Right);

    for side in &report.sides {
        assert_eq!(side.body.as_ref().map(Vec::len), Some(7));
        assert_eq!(side.aligned.as_ref().map(Vec::len), Some(6));
        let joint = side.joint.expect("joint reading");
        assert!((joint.angle - 100.0).abs() < 1e-6);
        assert_eq!(joint.vertex, Point::new(400.0, 400.0));
    }
    assert!((report.latest_angle().unwrap() - 100.0).abs() < 1e-6);
    Ok(())
}

#[test]
fn test_front_view_pins_each_side_to_its_start() -> Result<()> {
    let mut pipeline = FramePipeline::new(BodySide::Front, &Config::default())?;
    let report = pipeline.process(Some(&pushup_skeleton(150.0)));

    // Relative tables put the anchor at position 2 (left) and 5 (right)
    let left = report.sides[0].aligned.as_ref().unwrap();
    let right = report.sides[1].aligned.as_ref().unwrap();
    assert!((left[2] - Point::new(690.0, 50.0)).norm() < 1e-6);
    assert!((right[5] - Point::new(190.0, 50.0)).norm() < 1e-6);
    Ok(())
}

#[test]
fn test_missing_wrist_at_the_bottom_skips_the_rep() -> Result<()> {
    let skeletons = vec![
        pushup_skeleton(160.0),
        without(&pushup_skeleton(80.0), KeypointIndex::LeftWrist),
        pushup_skeleton(160.0),
    ];
    let pipeline = run(BodySide::Left, &skeletons)?;
    assert_eq!(pipeline.state(), CounterState::default());
    Ok(())
}

#[test]
fn test_degenerate_reference_on_crossing_frame_does_not_count() -> Result<()> {
    let mut pipeline = FramePipeline::new(BodySide::Left, &Config::default())?;
    pipeline.process(Some(&pushup_skeleton(80.0)));
    assert_eq!(pipeline.state().phase, Phase::Down);

    // Extended arm, but the ankle sits on the shoulder
    let mut points = pushup_skeleton(160.0).points().to_vec();
    points[KeypointIndex::LeftAnkle.index()] = points[KeypointIndex::LeftShoulder.index()];
    let report = pipeline.process(Some(&Skeleton::new(points)));

    assert!(!report.counted());
    assert_eq!(
        pipeline.state(),
        CounterState {
            count: 0,
            phase: Phase::Down
        }
    );

    pipeline.process(Some(&pushup_skeleton(160.0)));
    assert_eq!(pipeline.state().count, 1);
    Ok(())
}

#[test]
fn test_reset_restores_initial_state() -> Result<()> {
    let skeletons: Vec<Skeleton> = pushup_angles(1).into_iter().map(pushup_skeleton).collect();
    let mut pipeline = run(BodySide::Left, &skeletons)?;
    assert_eq!(pipeline.state().count, 1);

    pipeline.reset();
    assert_eq!(pipeline.state(), CounterState::default());
    Ok(())
}

#[test]
fn test_session_counts_and_resets() -> Result<()> {
    let config = Config::default();
    let angles = pushup_angles(2);
    let mut model = ScriptedPoseModel::from_angles(&angles);
    let renderer = OverlayRenderer::new(config.thresholds()?, config.sides.clone());

    let mut session = Session::new(BodySide::Left, &config)?;
    for _ in &angles {
        let mut frame = create_test_image(720, 1280)?;
        session.handle_frame(&mut model, &mut frame, Some(&renderer))?;
    }
    assert_eq!(session.state().count, 2);

    let summary = session.finish(EndReason::EndOfStream);
    assert_eq!(summary.repetitions, 2);
    assert_eq!(summary.frames, angles.len() as u64);
    assert_eq!(summary.skipped_frames, 0);
    assert_eq!(summary.end, EndReason::EndOfStream);
    Ok(())
}

#[test]
fn test_session_skips_frames_without_people() -> Result<()> {
    let config = Config::default();
    let mut model = ScriptedPoseModel::new(vec![vec![], vec![pushup_skeleton(90.0)], vec![]]);

    let mut session = Session::new(BodySide::Right, &config)?;
    for _ in 0..3 {
        let mut frame = create_test_image(720, 1280)?;
        let report = session.handle_frame(&mut model, &mut frame, None)?;
        assert_eq!(report.detected, report.counted());
    }
    assert_eq!(session.state().phase, Phase::Down);

    let summary = session.finish(EndReason::Aborted);
    assert_eq!(summary.frames, 3);
    assert_eq!(summary.skipped_frames, 2);
    assert_eq!(summary.repetitions, 0);
    Ok(())
}
