//! Pure sizing helpers for the canvases. No DOM access so they can be tested
//! on the host.

use crate::constants::{
    LABEL_ALPHA_SCALE, LABEL_MAX_FONT_PX, LABEL_MIN_FONT_PX, MAX_DEVICE_PIXEL_RATIO,
    MIN_DEVICE_PIXEL_RATIO,
};

/// Browsers report 0 or NaN in some embedded views; treat that as 1x.
#[inline]
pub fn clamp_device_pixel_ratio(dpr: f64) -> f64 {
    if dpr.is_finite() {
        dpr.clamp(MIN_DEVICE_PIXEL_RATIO, MAX_DEVICE_PIXEL_RATIO)
    } else {
        MIN_DEVICE_PIXEL_RATIO
    }
}

/// Pixel size of a canvas backing store for a CSS box, never zero.
#[inline]
pub fn backing_size(css_width: f64, css_height: f64, dpr: f64) -> (u32, u32) {
    let dpr = clamp_device_pixel_ratio(dpr);
    let px = |css: f64| (css.max(0.0) * dpr).round() as u32;
    (px(css_width).max(1), px(css_height).max(1))
}

/// Font size to paint a projected label at, or `None` when it is too small to
/// read.
#[inline]
pub fn label_font_px(projected_px: f32) -> Option<f32> {
    if !projected_px.is_finite() || projected_px < LABEL_MIN_FONT_PX {
        None
    } else {
        Some(projected_px.min(LABEL_MAX_FONT_PX))
    }
}

#[inline]
pub fn label_alpha(opacity: f32) -> f64 {
    (opacity * LABEL_ALPHA_SCALE).clamp(0.0, 1.0) as f64
}
