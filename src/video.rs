//! Video sources: sample files picked per body side, or a camera.

use crate::{profile::BodySide, Error, Result};
use log::info;
use opencv::{
    core::{Mat, Size},
    imgproc::{self, InterpolationFlags},
    prelude::*,
    videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE},
};
use rand::seq::SliceRandom;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where session frames come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    /// Webcam index
    Camera(i32),
    /// Video file path
    File(PathBuf),
}

impl fmt::Display for VideoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Camera(index) => write!(f, "camera {index}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Regular files inside `<root>/<L|R|F>`, sorted by name
///
/// # Errors
///
/// Returns `Error::ResourceUnavailable` if the folder cannot be read.
pub fn list_videos(root: &Path, side: BodySide) -> Result<Vec<PathBuf>> {
    let folder = root.join(side.folder_name());
    let entries = std::fs::read_dir(&folder).map_err(|e| {
        Error::ResourceUnavailable(format!("Cannot read video folder {}: {e}", folder.display()))
    })?;

    let mut videos = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() {
            videos.push(path);
        }
    }
    videos.sort();
    Ok(videos)
}

/// Pick a random sample video for a body side
///
/// # Errors
///
/// Returns `Error::ResourceUnavailable` if the folder is missing or holds
/// no files.
pub fn select_random_video(root: &Path, side: BodySide) -> Result<PathBuf> {
    let videos = list_videos(root, side)?;
    videos.choose(&mut rand::thread_rng()).cloned().ok_or_else(|| {
        Error::ResourceUnavailable(format!(
            "No videos in {}",
            root.join(side.folder_name()).display()
        ))
    })
}

/// Open a capture for a source
///
/// # Errors
///
/// Returns `Error::ResourceUnavailable` if the device or file cannot be
/// opened.
pub fn open_capture(source: &VideoSource) -> Result<VideoCapture> {
    let capture = match source {
        VideoSource::Camera(index) => {
            info!("Opening camera {}", index);
            let mut cap = VideoCapture::new(*index, videoio::CAP_ANY)?;
            // Keep latency low on live input
            cap.set(CAP_PROP_BUFFERSIZE, 1.0)?;
            cap
        }
        VideoSource::File(path) => {
            info!("Opening video file: {}", path.display());
            let path = path.to_str().ok_or_else(|| {
                Error::ResourceUnavailable(format!("Video path is not valid UTF-8: {}", path.display()))
            })?;
            VideoCapture::from_file(path, videoio::CAP_ANY)?
        }
    };

    if !capture.is_opened()? {
        return Err(Error::ResourceUnavailable(format!("Cannot open {source}")));
    }
    Ok(capture)
}

/// Resize a frame to the processing size unless it already matches
///
/// # Errors
///
/// Returns an error if OpenCV fails.
pub fn fit_frame(frame: &Mat, width: i32, height: i32) -> Result<Mat> {
    if frame.cols() == width && frame.rows() == height {
        return Ok(frame.try_clone()?);
    }

    let mut resized = Mat::default();
    imgproc::resize(
        frame,
        &mut resized,
        Size::new(width, height),
        0.0,
        0.0,
        InterpolationFlags::INTER_LINEAR as i32,
    )?;
    Ok(resized)
}
