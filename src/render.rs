//! Overlay drawing: keypoints, skeleton lines, phase bar and counter.

use crate::{
    config::SidesConfig,
    pipeline::{FrameReport, SideReport},
    rep_counter::{CounterState, Phase, Thresholds},
    skeleton::Point,
    utils::{is_drawable, safe_cast::f64_to_i32_clamp, to_pixel},
    Result,
};
use opencv::{
    core::{Mat, Point as PixelPoint, Rect, Scalar},
    imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8},
    prelude::*,
};

const BAR_X: i32 = 30;
const BAR_WIDTH: i32 = 30;
const BAR_HEIGHT: i32 = 200;

fn green() -> Scalar {
    Scalar::new(0.0, 255.0, 0.0, 0.0)
}

fn magenta() -> Scalar {
    Scalar::new(255.0, 0.0, 255.0, 0.0)
}

fn white() -> Scalar {
    Scalar::new(255.0, 255.0, 255.0, 0.0)
}

fn red() -> Scalar {
    Scalar::new(0.0, 0.0, 255.0, 0.0)
}

/// Which half of the bar is filled and by how much
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarFill {
    /// `Down` fills the lower half, `Up` the upper half
    pub half: Phase,
    /// Fill ratio in `[0, 1]`
    pub ratio: f64,
}

/// Bar fill for an angle: below the band midpoint the lower half grows
/// towards `min_angle`, at or above it the upper half grows towards
/// `max_angle`. The angle is clamped to the band first.
#[must_use]
pub fn bar_fill(angle: f64, thresholds: &Thresholds) -> BarFill {
    let min = thresholds.min_angle();
    let max = thresholds.max_angle();
    let mid = thresholds.mid();
    let angle = if angle.is_finite() { angle.clamp(min, max) } else { mid };

    if angle < mid {
        BarFill {
            half: Phase::Down,
            ratio: ((mid - angle) / (mid - min)).clamp(0.0, 1.0),
        }
    } else {
        BarFill {
            half: Phase::Up,
            ratio: ((angle - mid) / (max - mid)).clamp(0.0, 1.0),
        }
    }
}

/// Draws frame overlays from pipeline reports
pub struct OverlayRenderer {
    thresholds: Thresholds,
    sides: SidesConfig,
}

impl OverlayRenderer {
    #[must_use]
    pub fn new(thresholds: Thresholds, sides: SidesConfig) -> Self {
        Self { thresholds, sides }
    }

    /// Draw everything for one processed frame
    pub fn render(&self, frame: &mut Mat, report: &FrameReport, state: CounterState) -> Result<()> {
        for side in &report.sides {
            self.draw_side(frame, side)?;
        }

        if let Some(angle) = report.latest_angle() {
            self.draw_progress_bar(frame, angle)?;
        }
        draw_counter(frame, state)?;

        Ok(())
    }

    fn draw_side(&self, frame: &mut Mat, report: &SideReport) -> Result<()> {
        let profile = self.sides.profile(report.side);

        if let Some(body) = &report.body {
            draw_points(frame, body)?;
            draw_connections(frame, body, &profile.body_connections)?;
        }

        if let Some(aligned) = &report.aligned {
            let mut used: Vec<usize> = profile
                .relative_connections
                .iter()
                .flat_map(|&(i, j)| [i, j])
                .collect();
            used.sort_unstable();
            used.dedup();
            let shown: Vec<Point> = used.iter().filter_map(|&i| aligned.get(i).copied()).collect();

            draw_points(frame, &shown)?;
            draw_connections(frame, aligned, &profile.relative_connections)?;
        }

        if let Some(joint) = &report.joint {
            draw_angle_label(frame, &joint.vertex, joint.angle)?;
        }

        Ok(())
    }

    /// Vertical bar split at the band midpoint
    pub fn draw_progress_bar(&self, frame: &mut Mat, angle: f64) -> Result<()> {
        let bar_y = (frame.rows() - BAR_HEIGHT) / 2;
        let half_h = BAR_HEIGHT / 2;

        imgproc::rectangle(
            frame,
            Rect::new(BAR_X, bar_y, BAR_WIDTH, BAR_HEIGHT),
            Scalar::new(230.0, 230.0, 230.0, 0.0),
            -1,
            LINE_8,
            0,
        )?;

        put_label(frame, "UP", PixelPoint::new(BAR_X, bar_y - 10), 0.6, red(), 2)?;
        put_label(
            frame,
            "DOWN",
            PixelPoint::new(BAR_X - 10, bar_y + BAR_HEIGHT + 25),
            0.6,
            green(),
            2,
        )?;

        let fill = bar_fill(angle, &self.thresholds);
        let fill_h = f64_to_i32_clamp(f64::from(half_h) * fill.ratio, 0, half_h);
        if fill_h > 0 {
            let (rect, color) = match fill.half {
                Phase::Down => (Rect::new(BAR_X, bar_y + half_h, BAR_WIDTH, fill_h), green()),
                Phase::Up => (Rect::new(BAR_X, bar_y + half_h - fill_h, BAR_WIDTH, fill_h), red()),
            };
            imgproc::rectangle(frame, rect, color, -1, LINE_8, 0)?;
        }

        imgproc::rectangle(
            frame,
            Rect::new(BAR_X, bar_y, BAR_WIDTH, BAR_HEIGHT),
            Scalar::new(50.0, 50.0, 50.0, 0.0),
            2,
            LINE_8,
            0,
        )?;

        Ok(())
    }
}

/// Filled dot with a ring for every finite point
pub fn draw_points(frame: &mut Mat, points: &[Point]) -> Result<()> {
    for point in points.iter().filter(|p| is_drawable(p)) {
        let center = to_pixel(point);
        imgproc::circle(frame, center, 7, green(), -1, LINE_8, 0)?;
        imgproc::circle(frame, center, 10, magenta(), 2, LINE_8, 0)?;
    }
    Ok(())
}

/// Lines between point pairs, the last pair highlighted
///
/// Pairs referring to absent or non-finite points are skipped.
pub fn draw_connections(frame: &mut Mat, points: &[Point], connections: &[(usize, usize)]) -> Result<()> {
    for (k, &(i, j)) in connections.iter().enumerate() {
        let (Some(from), Some(to)) = (points.get(i), points.get(j)) else {
            continue;
        };
        if !(is_drawable(from) && is_drawable(to)) {
            continue;
        }

        let color = if k + 1 == connections.len() { red() } else { white() };
        imgproc::line(frame, to_pixel(from), to_pixel(to), color, 4, LINE_8, 0)?;
    }
    Ok(())
}

/// Angle value next to the measured joint
pub fn draw_angle_label(frame: &mut Mat, vertex: &Point, angle: f64) -> Result<()> {
    if !is_drawable(vertex) {
        return Ok(());
    }
    let anchor = to_pixel(vertex);
    put_label(
        frame,
        &format!("{angle:.0} deg"),
        PixelPoint::new(anchor.x + 15, anchor.y - 15),
        0.7,
        Scalar::new(255.0, 255.0, 0.0, 0.0),
        2,
    )
}

/// Repetition count and phase in the bottom right corner, clear of the
/// aligned skeletons drawn along the top edge
pub fn draw_counter(frame: &mut Mat, state: CounterState) -> Result<()> {
    let box_width = 240;
    let box_height = 90;
    let origin_x = (frame.cols() - box_width - 20).max(0);
    let origin_y = (frame.rows() - box_height - 20).max(0);

    imgproc::rectangle(
        frame,
        Rect::new(origin_x, origin_y, box_width, box_height),
        Scalar::new(40.0, 40.0, 40.0, 0.0),
        -1,
        LINE_8,
        0,
    )?;
    put_label(
        frame,
        &format!("Push-ups: {}", state.count),
        PixelPoint::new(origin_x + 12, origin_y + 35),
        0.9,
        white(),
        2,
    )?;
    let stage_color = match state.phase {
        Phase::Up => red(),
        Phase::Down => green(),
    };
    put_label(
        frame,
        &format!("Stage: {}", state.phase),
        PixelPoint::new(origin_x + 12, origin_y + 75),
        0.8,
        stage_color,
        2,
    )
}

fn put_label(frame: &mut Mat, text: &str, origin: PixelPoint, scale: f64, color: Scalar, thickness: i32) -> Result<()> {
    imgproc::put_text(
        frame,
        text,
        origin,
        FONT_HERSHEY_SIMPLEX,
        scale,
        color,
        thickness,
        LINE_8,
        false,
    )?;
    Ok(())
}
