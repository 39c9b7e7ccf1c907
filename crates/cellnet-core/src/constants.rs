use glam::Vec3;

// Shared visual tuning constants used by both web and native frontends.

// Ring layout
pub const BASE_RADIUS: f32 = 1.2; // radius of the innermost ring
pub const RING_INCREMENT: f32 = 0.35; // fixed growth between consecutive rings
pub const RING_JITTER: f32 = 0.15; // upper bound of the random extra growth
pub const RING_OPACITY_MIN: f32 = 0.18;
pub const RING_OPACITY_SPAN: f32 = 0.22;
pub const RING_CENTER_JITTER: [f32; 3] = [0.04, 0.02, 0.04];
pub const BLOOM_RING_EVERY: usize = 4; // every Nth ring gets a bloom duplicate
pub const BLOOM_RING_LIFT: f32 = 0.01; // y offset of the bloom duplicate
pub const BLOOM_RING_SCALE: f32 = 1.004;
pub const BLOOM_RING_OPACITY_BOOST: f32 = 0.35;

// Line field
pub const LINES_BASE: u32 = 8;
pub const LINES_PROGRESS_SPAN: f32 = 25.0;
pub const LINES_RANDOM_MAX: u32 = 10; // exclusive
pub const LINE_START_SPREAD: f32 = 0.25; // start radius in [r, r + spread)
pub const LINE_MIN_LENGTH: f32 = 0.2;
pub const LINE_MAX_LENGTH: f32 = 1.6;
pub const LINE_LENGTH_PROGRESS_FLOOR: f32 = 0.3; // inner rings still get 30% of max length
pub const SOLID_LINE_PROBABILITY: f64 = 0.6;
pub const BLOOM_TAG_PROBABILITY: f64 = 0.2;
pub const LINE_OPACITY_MIN: f32 = 0.35;
pub const LINE_OPACITY_SPAN: f32 = 0.5;

// Dashed variant
pub const DASH_MIN: f32 = 0.06;
pub const DASH_MAX: f32 = 0.22;
pub const DASH_GAP_MIN: f32 = 0.03;
pub const DASH_GAP_MAX: f32 = 0.1;
pub const MAX_DASH_SEGMENTS: usize = 24; // hard cap on the subdivision loop

// Pulse timing (time units are seconds at speed 1.0)
pub const PULSE_CYCLE: f32 = 4.0;
pub const PULSE_EXTEND_END: f32 = 1.5;
pub const PULSE_HOLD_END: f32 = 2.5;
pub const PULSE_SPEED_MIN: f32 = 0.6;
pub const PULSE_SPEED_SPAN: f32 = 0.8;

// Labels
pub const BASE_TEXT_DENSITY: f64 = 0.15;
pub const TEXT_DENSITY_GROWTH: f64 = 0.35;
pub const MIN_LABEL_SEPARATION: f32 = 0.35; // radians, shortest arc
pub const LABEL_RADIAL_OFFSET: f32 = 0.18; // distance past the line end
pub const LABEL_FONT_MIN: f32 = 0.14; // world units
pub const LABEL_FONT_SPAN: f32 = 0.14;
pub const LABEL_OPACITY_MIN: f32 = 0.4;
pub const LABEL_OPACITY_SPAN: f32 = 0.5;

// Camera choreography
pub const CAMERA_EYE: Vec3 = Vec3::new(0.0, 9.0, 18.0);
pub const CAMERA_TARGET: Vec3 = Vec3::ZERO;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 200.0;
pub const BASE_FOV_DEGREES: f32 = 45.0;
pub const FOV_AMPLITUDE_DEGREES: f32 = 12.0;
pub const ROTATION_SPEED: f32 = 0.1; // radians per second about +Y
pub const BREATH_FREQUENCY: f32 = 0.5; // shared by scale and fov
pub const SCALE_AMPLITUDE: f32 = 0.05;

// Palette (linear RGB, values above 1.0 feed the bloom pass)
pub const CLEAR_COLOR: [f32; 3] = [0.012, 0.018, 0.035];
pub const RING_COLOR: [f32; 3] = [0.25, 0.5, 0.9];
pub const BLOOM_RING_COLOR: [f32; 3] = [0.6, 1.1, 2.0];
pub const LINE_COLOR: [f32; 3] = [0.35, 0.75, 1.0];
pub const BLOOM_LINE_COLOR: [f32; 3] = [0.9, 1.6, 2.4];
pub const LABEL_COLOR: [f32; 3] = [0.7, 0.88, 1.0];
