/// DOM ids and presentation constants for the browser front-end.
///
/// Artistic scene parameters live in `cellnet_core::constants`; this file only
/// holds what the page and the 2D label overlay need.
pub const CANVAS_ID: &str = "app-canvas";
pub const LABEL_CANVAS_ID: &str = "label-canvas";
pub const HINT_ID: &str = "hint-overlay";

// Backing-store scale bounds; above 2x the fill cost outweighs the sharpness.
pub const MIN_DEVICE_PIXEL_RATIO: f64 = 1.0;
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0;

// Label text
pub const LABEL_FONT_FAMILY: &str = "ui-monospace, SFMono-Regular, Menlo, monospace";
pub const LABEL_MIN_FONT_PX: f32 = 7.0; // smaller labels are skipped
pub const LABEL_MAX_FONT_PX: f32 = 26.0;
pub const LABEL_ALPHA_SCALE: f32 = 0.85;

// Hint overlay refresh period (seconds)
pub const HINT_REFRESH_SECS: f32 = 1.0;
