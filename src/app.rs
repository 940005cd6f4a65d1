//! Main application module: interactive menu and counting sessions.

use crate::{
    config::Config,
    constants::KEY_ESC,
    error::{Error, Result},
    pipeline::{FramePipeline, FrameReport},
    pose_detection::PoseModel,
    profile::BodySide,
    render::OverlayRenderer,
    rep_counter::CounterState,
    video::{fit_frame, open_capture, select_random_video, VideoSource},
};
use log::{debug, info, warn};
use opencv::{
    core::{Mat, Point, Scalar, CV_8UC3},
    highgui::{self, WINDOW_NORMAL},
    imgcodecs,
    imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8},
    prelude::*,
};

const MENU_HELP: &str = "Press L for a left side session, R for right side, F for front view. Press S or Esc to exit.";

/// GUI display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuiMode {
    /// Show the session window and poll keys
    Window,
    /// No GUI (headless)
    None,
}

/// Key press interpreted by the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Start(BodySide),
    Exit,
    Help,
}

impl MenuCommand {
    /// Interpret a `wait_key` result; `None` when no key was pressed
    #[must_use]
    pub fn from_key(key: i32) -> Option<Self> {
        if key < 0 {
            return None;
        }
        if is_abort_key(key) {
            return Some(Self::Exit);
        }
        Some(match char::from((key & 0xFF) as u8) {
            'l' | 'L' => Self::Start(BodySide::Left),
            'r' | 'R' => Self::Start(BodySide::Right),
            'f' | 'F' => Self::Start(BodySide::Front),
            _ => Self::Help,
        })
    }
}

/// Esc, `s` and `S` stop a running session
#[must_use]
pub fn is_abort_key(key: i32) -> bool {
    if key < 0 {
        return false;
    }
    let key = key & 0xFF;
    key == KEY_ESC || key == i32::from(b's') || key == i32::from(b'S')
}

/// Why a session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    EndOfStream,
    Aborted,
}

/// What a finished session did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub repetitions: u32,
    pub frames: u64,
    /// Frames that did not reach the counter
    pub skipped_frames: u64,
    pub end: EndReason,
}

/// One counting session over a frame stream
///
/// The counter starts at zero and is reset again when the session
/// finishes, whatever the reason.
pub struct Session {
    pipeline: FramePipeline,
    frames: u64,
    skipped_frames: u64,
}

impl Session {
    /// Start a session for a camera view
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the configuration does not validate.
    pub fn new(view: BodySide, config: &Config) -> Result<Self> {
        let mut pipeline = FramePipeline::new(view, config)?;
        pipeline.reset();
        Ok(Self {
            pipeline,
            frames: 0,
            skipped_frames: 0,
        })
    }

    /// Detect, count and optionally draw one frame
    ///
    /// # Errors
    ///
    /// Returns an error if inference or drawing fails. Frames without a
    /// usable pose are not errors; they are counted as skipped.
    pub fn handle_frame<M: PoseModel + ?Sized>(
        &mut self,
        model: &mut M,
        frame: &mut Mat,
        renderer: Option<&OverlayRenderer>,
    ) -> Result<FrameReport> {
        let people = model.detect(frame)?;
        let report = self.pipeline.process(people.first());

        self.frames += 1;
        if !report.counted() {
            self.skipped_frames += 1;
        }

        if let Some(renderer) = renderer {
            renderer.render(frame, &report, self.pipeline.state())?;
        }

        Ok(report)
    }

    #[must_use]
    pub fn state(&self) -> CounterState {
        self.pipeline.state()
    }

    #[must_use]
    pub fn view(&self) -> BodySide {
        self.pipeline.view()
    }

    /// Stop the session and reset the counter
    pub fn finish(mut self, end: EndReason) -> SessionSummary {
        let summary = SessionSummary {
            repetitions: self.pipeline.state().count,
            frames: self.frames,
            skipped_frames: self.skipped_frames,
            end,
        };
        self.pipeline.reset();
        info!(
            "Session ended ({:?}): {} push-ups over {} frames, {} skipped",
            end, summary.repetitions, summary.frames, summary.skipped_frames
        );
        summary
    }
}

/// Main application struct
pub struct PushUpApp<M: PoseModel> {
    config: Config,
    gui_mode: GuiMode,
    model: M,
    renderer: OverlayRenderer,
}

impl<M: PoseModel> PushUpApp<M> {
    /// Create the application around a pose model
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the window cannot
    /// be created.
    pub fn new(config: Config, gui_mode: GuiMode, model: M) -> Result<Self> {
        info!("Initializing PushUp Counter application");
        config.validate()?;

        let renderer = OverlayRenderer::new(config.thresholds()?, config.sides.clone());

        if gui_mode == GuiMode::Window {
            highgui::named_window(&config.display.window_name, WINDOW_NORMAL)?;
        }

        Ok(Self {
            config,
            gui_mode,
            model,
            renderer,
        })
    }

    /// Interactive menu: start sessions until the user exits
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` without a window, and OpenCV errors
    /// from the window itself. Session failures are logged and the menu
    /// keeps running.
    pub fn run_menu(&mut self) -> Result<()> {
        if self.gui_mode == GuiMode::None {
            return Err(Error::InvalidInput(
                "The interactive menu needs a window; pass --side in headless mode".to_string(),
            ));
        }

        info!("Entering menu");
        let menu = self.menu_frame()?;
        println!("{MENU_HELP}");

        loop {
            highgui::imshow(&self.config.display.window_name, &menu)?;
            let key = highgui::wait_key(0)?;

            match MenuCommand::from_key(key) {
                None => continue,
                Some(MenuCommand::Exit) => break,
                Some(MenuCommand::Help) => println!("{MENU_HELP}"),
                Some(MenuCommand::Start(view)) => match self.run_sample(view) {
                    Ok(summary) => println!("Push-ups: {}", summary.repetitions),
                    Err(e) => warn!("Session for {} view failed: {}", view, e),
                },
            }
        }

        info!("Application shutting down");
        highgui::destroy_all_windows()?;
        Ok(())
    }

    /// Run a session on a random sample video for the view
    ///
    /// # Errors
    ///
    /// Returns `Error::ResourceUnavailable` when no sample can be found or
    /// opened, and any error raised while processing frames.
    pub fn run_sample(&mut self, view: BodySide) -> Result<SessionSummary> {
        let video = select_random_video(&self.config.video.directory, view)?;
        self.run_session(view, &VideoSource::File(video))
    }

    /// Count push-ups on a source until it ends or the user aborts
    ///
    /// # Errors
    ///
    /// Returns `Error::ResourceUnavailable` if the source cannot be opened,
    /// and inference or OpenCV errors raised while processing frames.
    pub fn run_session(&mut self, view: BodySide, source: &VideoSource) -> Result<SessionSummary> {
        info!("Starting {} session on {}", view, source);
        let mut capture = open_capture(source)?;
        let mut session = Session::new(view, &self.config)?;

        let width = self.config.video.frame_width;
        let height = self.config.video.frame_height;
        let renderer = match self.gui_mode {
            GuiMode::Window => Some(&self.renderer),
            GuiMode::None => None,
        };

        let end = loop {
            let mut raw = Mat::default();
            if !capture.read(&mut raw)? || raw.empty() {
                debug!("No more frames from {}", source);
                break EndReason::EndOfStream;
            }

            let mut frame = fit_frame(&raw, width, height)?;
            if let Err(e) = session.handle_frame(&mut self.model, &mut frame, renderer) {
                session.finish(EndReason::Aborted);
                return Err(e);
            }

            if self.gui_mode == GuiMode::Window {
                highgui::imshow(&self.config.display.window_name, &frame)?;
                if is_abort_key(highgui::wait_key(1)?) {
                    info!("Session aborted by user");
                    break EndReason::Aborted;
                }
            }
        };

        Ok(session.finish(end))
    }

    /// Background image at frame size, or a plain text menu if it is missing
    fn menu_frame(&self) -> Result<Mat> {
        let width = self.config.video.frame_width;
        let height = self.config.video.frame_height;

        let background = self.config.display.background.to_string_lossy().into_owned();
        let image = imgcodecs::imread(&background, imgcodecs::IMREAD_COLOR)?;
        if !image.empty() {
            return fit_frame(&image, width, height);
        }

        warn!("Background {} not found, drawing a text menu", background);
        let mut frame = Mat::new_rows_cols_with_default(height, width, CV_8UC3, Scalar::all(30.0))?;
        let lines = [
            "PushUp Counter",
            "L - left side",
            "R - right side",
            "F - front view",
            "S / Esc - exit",
        ];
        for (i, line) in (0i32..).zip(lines) {
            imgproc::put_text(
                &mut frame,
                line,
                Point::new(80, 120 + 60 * i),
                FONT_HERSHEY_SIMPLEX,
                if i == 0 { 1.6 } else { 1.1 },
                Scalar::new(255.0, 255.0, 255.0, 0.0),
                2,
                LINE_8,
                false,
            )?;
        }
        Ok(frame)
    }
}
