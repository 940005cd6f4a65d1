//! Geometric properties of skeleton normalization

use proptest::prelude::*;
use pushup_counter::{
    alignment::{align, clamp_to_frame, Alignment, AlignmentTarget, FrameSize, Placement, ReferenceSegment},
    angle::joint_angle,
    skeleton::Point,
    Error,
};

const FRAME: FrameSize = FrameSize {
    width: 1280,
    height: 720,
};

fn target(placement: Placement) -> AlignmentTarget {
    AlignmentTarget {
        placement,
        length: 400.0,
        padding: 15.0,
    }
}

#[test]
fn test_canonical_segment_is_left_in_place() {
    let segment = ReferenceSegment::new(Point::new(440.0, 50.0), Point::new(840.0, 50.0));
    let aligned = align(
        &[segment.anchor, segment.end],
        &segment,
        &target(Placement::Centered { y: 50.0 }),
        FRAME,
    )
    .unwrap();

    assert!((aligned[0] - segment.anchor).norm() < 1e-9);
    assert!((aligned[1] - segment.end).norm() < 1e-9);
}

#[test]
fn test_clamp_example() {
    let clamped = clamp_to_frame(Point::new(-50.0, 300.0), FrameSize::new(640, 480), 15.0).unwrap();
    assert_eq!(clamped, Point::new(15.0, 300.0));
}

#[test]
fn test_coincident_endpoints_are_degenerate() {
    let p = Point::new(100.0, 100.0);
    let result = align(
        &[p],
        &ReferenceSegment::new(p, p),
        &target(Placement::Centered { y: 50.0 }),
        FRAME,
    );
    assert!(matches!(result, Err(Error::DegenerateGeometry(_))));
}

fn finite_point() -> impl Strategy<Value = Point> {
    (0.0f64..1280.0, 0.0f64..720.0).prop_map(|(x, y)| Point::new(x, y))
}

proptest! {
    #[test]
    fn prop_reference_becomes_horizontal_with_fixed_length(
        anchor in finite_point(),
        length in 1.0f64..2000.0,
        theta in -std::f64::consts::PI..std::f64::consts::PI,
        fixed in any::<bool>(),
    ) {
        let end = anchor + nalgebra::Vector2::new(length * theta.cos(), length * theta.sin());
        let placement = if fixed {
            Placement::FixedPoint(Point::new(690.0, 50.0))
        } else {
            Placement::Centered { y: 50.0 }
        };

        let alignment = Alignment::solve(&ReferenceSegment::new(anchor, end), &target(placement), FRAME).unwrap();
        let a = alignment.apply(anchor);
        let b = alignment.apply(end);

        prop_assert!(((b - a).norm() - 400.0).abs() < 1e-6);
        prop_assert!((b.y - a.y).abs() < 1e-6);
        prop_assert!(b.x > a.x);
    }

    #[test]
    fn prop_alignment_preserves_joint_angles(
        anchor in finite_point(),
        end in finite_point(),
        p in finite_point(),
        q in finite_point(),
        r in finite_point(),
    ) {
        prop_assume!((end - anchor).norm() > 1.0);
        prop_assume!((p - q).norm() > 1.0 && (r - q).norm() > 1.0);

        let alignment = Alignment::solve(
            &ReferenceSegment::new(anchor, end),
            &target(Placement::Centered { y: 50.0 }),
            FRAME,
        ).unwrap();

        let before = joint_angle(p, q, r).unwrap();
        let after = joint_angle(alignment.apply(p), alignment.apply(q), alignment.apply(r)).unwrap();
        prop_assert!((before - after).abs() < 1e-4);
    }

    #[test]
    fn prop_aligned_points_stay_inside_padding(
        anchor in finite_point(),
        end in finite_point(),
        points in prop::collection::vec(finite_point(), 1..20),
    ) {
        prop_assume!((end - anchor).norm() > 1.0);

        let aligned = align(
            &points,
            &ReferenceSegment::new(anchor, end),
            &target(Placement::Centered { y: 50.0 }),
            FRAME,
        ).unwrap();

        prop_assert_eq!(aligned.len(), points.len());
        for point in aligned {
            prop_assert!((15.0..=1265.0).contains(&point.x));
            prop_assert!((15.0..=705.0).contains(&point.y));
        }
    }
}
