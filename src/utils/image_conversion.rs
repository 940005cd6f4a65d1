//! Image conversion utilities between OpenCV Mat and model tensors.

use crate::{
    constants::LETTERBOX_FILL,
    utils::safe_cast::f64_to_i32,
    Error, Result,
};
use ndarray::Array4;
use opencv::core::{self, Mat, Scalar, Size, Vec3f, BORDER_CONSTANT, CV_32F};
use opencv::imgproc::{self, InterpolationFlags};
use opencv::prelude::*;

/// Resize factor and padding applied by [`letterbox`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxInfo {
    /// Model pixels per frame pixel
    pub scale: f64,
    /// Columns of padding added on the right
    pub pad_right: i32,
    /// Rows of padding added at the bottom
    pub pad_bottom: i32,
}

impl LetterboxInfo {
    /// Compute the scale that fits `width` x `height` inside a square of `size`
    ///
    /// # Errors
    ///
    /// Returns an error if any dimension is not positive.
    pub fn for_frame(width: i32, height: i32, size: i32) -> Result<Self> {
        if width <= 0 || height <= 0 || size <= 0 {
            return Err(Error::InvalidInput(format!(
                "Cannot letterbox a {width}x{height} frame into {size}x{size}"
            )));
        }

        let scale = (f64::from(size) / f64::from(width)).min(f64::from(size) / f64::from(height));
        let new_width = f64_to_i32((f64::from(width) * scale).round())?.clamp(1, size);
        let new_height = f64_to_i32((f64::from(height) * scale).round())?.clamp(1, size);

        Ok(Self {
            scale,
            pad_right: size - new_width,
            pad_bottom: size - new_height,
        })
    }

    /// Map a model-space coordinate back to the frame
    #[must_use]
    pub fn to_frame(&self, x: f32, y: f32) -> (f64, f64) {
        (f64::from(x) / self.scale, f64::from(y) / self.scale)
    }
}

/// Resize keeping aspect ratio and pad to a `size` x `size` square
///
/// # Errors
///
/// Returns an error if the image is empty or OpenCV fails.
pub fn letterbox(image: &Mat, size: i32) -> Result<(Mat, LetterboxInfo)> {
    let info = LetterboxInfo::for_frame(image.cols(), image.rows(), size)?;

    let mut resized = Mat::default();
    imgproc::resize(
        image,
        &mut resized,
        Size::new(size - info.pad_right, size - info.pad_bottom),
        0.0,
        0.0,
        InterpolationFlags::INTER_LINEAR as i32,
    )?;

    let mut padded = Mat::default();
    core::copy_make_border(
        &resized,
        &mut padded,
        0,
        info.pad_bottom,
        0,
        info.pad_right,
        BORDER_CONSTANT,
        Scalar::all(LETTERBOX_FILL),
    )?;

    Ok((padded, info))
}

/// Convert a square BGR image into a `[1, 3, H, W]` RGB tensor in `[0, 1]`
///
/// # Errors
///
/// Returns an error if the image is not 3-channel or OpenCV fails.
#[allow(clippy::cast_sign_loss)] // OpenCV dimensions are positive
pub fn bgr_to_nchw(image: &Mat) -> Result<Array4<f32>> {
    if image.channels() != 3 {
        return Err(Error::InvalidInput(format!(
            "Expected a 3-channel image, got {} channels",
            image.channels()
        )));
    }

    let mut rgb = Mat::default();
    imgproc::cvt_color(image, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;

    let mut float_image = Mat::default();
    rgb.convert_to(&mut float_image, CV_32F, 1.0 / 255.0, 0.0)?;
    let float_image = if float_image.is_continuous() {
        float_image
    } else {
        float_image.try_clone()?
    };

    let rows = float_image.rows() as usize;
    let cols = float_image.cols() as usize;
    let pixels = float_image.data_typed::<Vec3f>()?;

    let mut tensor = Array4::<f32>::zeros((1, 3, rows, cols));
    for (idx, pixel) in pixels.iter().enumerate() {
        let (row, col) = (idx / cols, idx % cols);
        for ch in 0..3 {
            tensor[[0, ch, row, col]] = pixel[ch];
        }
    }

    Ok(tensor)
}
