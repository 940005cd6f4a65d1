//! Utility functions for image conversion and pixel coordinates.

pub mod image_conversion;
pub mod safe_cast;

use crate::skeleton::Point;
use safe_cast::f64_to_i32_clamp;

/// Largest coordinate handed to OpenCV drawing calls
const DRAW_LIMIT: i32 = 1 << 15;

/// Round a keypoint to an OpenCV pixel position
///
/// Non-finite coordinates land on the frame origin; callers skip such points
/// before drawing.
#[must_use]
pub fn to_pixel(point: &Point) -> opencv::core::Point {
    opencv::core::Point::new(
        f64_to_i32_clamp(point.x.round(), -DRAW_LIMIT, DRAW_LIMIT),
        f64_to_i32_clamp(point.y.round(), -DRAW_LIMIT, DRAW_LIMIT),
    )
}

/// Whether both coordinates are finite
#[must_use]
pub fn is_drawable(point: &Point) -> bool {
    point.x.is_finite() && point.y.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pixel_rounds() {
        let pixel = to_pixel(&Point::new(10.4, 20.6));
        assert_eq!((pixel.x, pixel.y), (10, 21));
    }

    #[test]
    fn test_to_pixel_limits_extremes() {
        let pixel = to_pixel(&Point::new(1e12, -1e12));
        assert_eq!((pixel.x, pixel.y), (DRAW_LIMIT, -DRAW_LIMIT));
    }

    #[test]
    fn test_is_drawable() {
        assert!(is_drawable(&Point::new(0.0, 0.0)));
        assert!(!is_drawable(&Point::new(f64::NAN, 0.0)));
    }
}
