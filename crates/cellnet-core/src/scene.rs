//! Procedural scene generation.
//!
//! The scene is plain data: concentric rings, their bloom duplicates, radial
//! line segments split into a normal and a bloom batch, and text labels. It is
//! generated once per quality selection and never mutated afterwards; the
//! per-frame path only reads it.
//!
//! All geometry lies in the XZ plane (y is up) around each ring's center.

use crate::bloom::{route, BloomPass};
use crate::constants::*;
use crate::quality::QualitySettings;
use glam::Vec3;
use rand::Rng;
use smallvec::SmallVec;
use std::f32::consts::TAU;

#[derive(Clone, Debug, PartialEq)]
pub struct Ring {
    pub index: usize,
    pub radius: f32,
    pub center_offset: Vec3,
    pub opacity: f32,
}

/// Slightly offset duplicate of a ring, drawn into the bloom batch.
#[derive(Clone, Debug, PartialEq)]
pub struct BloomCircle {
    pub ring_index: usize,
    pub radius: f32,
    pub center: Vec3,
    pub opacity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimPhase {
    pub phase_offset: f32,
    pub speed_multiplier: f32,
    pub delay: f32,
}

/// One radial segment in its fully extended rest pose.
///
/// `start_point`/`end_point` are never touched by the animator; it derives the
/// animated endpoints from `center`, `angle` and the two radii.
#[derive(Clone, Debug, PartialEq)]
pub struct LineSegment {
    pub start_point: Vec3,
    pub end_point: Vec3,
    pub angle: f32,
    pub ring_index: usize,
    pub base_opacity: f32,
    pub anim_phase: AnimPhase,
    pub bloom_tagged: bool,
    pub center: Vec3,
    pub start_radius: f32,
    pub end_radius: f32,
}

impl LineSegment {
    #[inline]
    pub fn length(&self) -> f32 {
        self.end_radius - self.start_radius
    }

    #[inline]
    pub fn point_at(&self, radius: f32) -> Vec3 {
        polar_point(self.center, self.angle, radius)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub position: Vec3,
    pub rotation_angle: f32,
    pub opacity: f32,
    pub font_size: f32,
    pub ring_index: usize,
    /// Polar angle of the slot this label occupies on its ring.
    pub angle: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub rings: Vec<Ring>,
    pub bloom_circles: Vec<BloomCircle>,
    pub line_segments: Vec<LineSegment>,
    pub bloom_line_segments: Vec<LineSegment>,
    pub text_labels: Vec<TextLabel>,
}

impl Scene {
    pub fn segment_count(&self) -> usize {
        self.line_segments.len() + self.bloom_line_segments.len()
    }
}

#[inline]
pub fn polar_point(center: Vec3, angle: f32, radius: f32) -> Vec3 {
    center + Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
}

/// Shortest arc between two angles, in `[0, PI]`.
#[inline]
pub fn angular_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(TAU);
    d.min(TAU - d)
}

/// Number of lines for a ring. `random_extra` is the draw from `0..10`.
pub fn line_count_for(
    ring_index: usize,
    ring_count: usize,
    line_density_multiplier: f32,
    random_extra: u32,
) -> usize {
    let progress = progress_of(ring_index, ring_count);
    let raw = LINES_BASE + (progress * LINES_PROGRESS_SPAN).floor() as u32 + random_extra;
    (raw as f32 * line_density_multiplier.max(0.0)).floor() as usize
}

#[inline]
fn progress_of(ring_index: usize, ring_count: usize) -> f32 {
    if ring_count == 0 {
        0.0
    } else {
        ring_index as f32 / ring_count as f32
    }
}

const LABEL_WORDS: [&str; 14] = [
    "gNB", "eNB", "NR", "LTE", "PCI", "RSRP", "SINR", "n78", "B3", "MIMO", "UE", "TAC", "X2",
    "S1",
];

fn label_text<R: Rng + ?Sized>(rng: &mut R) -> String {
    let word = LABEL_WORDS[rng.gen_range(0..LABEL_WORDS.len())];
    match rng.gen_range(0..3) {
        0 => word.to_string(),
        1 => format!("{word}-{}", rng.gen_range(1..1000)),
        _ => format!("0x{:04X}", rng.gen::<u16>()),
    }
}

/// Build a full scene. Deterministic for a seeded `rng`.
pub fn generate<R: Rng + ?Sized>(settings: &QualitySettings, rng: &mut R) -> Scene {
    let mut scene = Scene::default();
    let ring_count = settings.ring_count;
    let mut radius = BASE_RADIUS;

    for i in 0..ring_count {
        if i > 0 {
            radius += RING_INCREMENT + rng.gen::<f32>() * RING_JITTER;
        }
        let progress = progress_of(i, ring_count);
        let ring = Ring {
            index: i,
            radius,
            center_offset: Vec3::new(
                rng.gen_range(-1.0..=1.0) * RING_CENTER_JITTER[0],
                rng.gen_range(-1.0..=1.0) * RING_CENTER_JITTER[1],
                rng.gen_range(-1.0..=1.0) * RING_CENTER_JITTER[2],
            ),
            opacity: RING_OPACITY_MIN + rng.gen::<f32>() * RING_OPACITY_SPAN,
        };
        if i % BLOOM_RING_EVERY == 0 {
            scene.bloom_circles.push(BloomCircle {
                ring_index: i,
                radius: ring.radius * BLOOM_RING_SCALE,
                center: ring.center_offset + Vec3::Y * BLOOM_RING_LIFT,
                opacity: (ring.opacity + BLOOM_RING_OPACITY_BOOST).min(1.0),
            });
        }

        let line_count = line_count_for(
            i,
            ring_count,
            settings.line_density_multiplier,
            rng.gen_range(0..LINES_RANDOM_MAX),
        );
        let label_probability = ((BASE_TEXT_DENSITY + progress as f64 * TEXT_DENSITY_GROWTH)
            * settings.text_density_multiplier as f64)
            .clamp(0.0, 1.0);
        let mut taken_angles: SmallVec<[f32; 8]> = SmallVec::new();

        for _ in 0..line_count {
            let angle = rng.gen::<f32>() * TAU;
            let start_radius = ring.radius + rng.gen::<f32>() * LINE_START_SPREAD;
            let max_len = LINE_MAX_LENGTH
                * (LINE_LENGTH_PROGRESS_FLOOR + (1.0 - LINE_LENGTH_PROGRESS_FLOOR) * progress);
            let end_radius = start_radius + LINE_MIN_LENGTH + rng.gen::<f32>() * max_len;
            let base_opacity = LINE_OPACITY_MIN + rng.gen::<f32>() * LINE_OPACITY_SPAN;

            if rng.gen_bool(SOLID_LINE_PROBABILITY) {
                emit_segment(&mut scene, rng, &ring, angle, start_radius, end_radius, base_opacity);
            } else {
                emit_dashed(&mut scene, rng, &ring, angle, start_radius, end_radius, base_opacity);
            }

            if rng.gen_bool(label_probability) {
                try_place_label(
                    &mut scene,
                    rng,
                    &ring,
                    angle,
                    end_radius,
                    &mut taken_angles,
                );
            }
        }
        scene.rings.push(ring);
    }

    log::debug!(
        "[scene] rings={} bloom_circles={} lines={} bloom_lines={} labels={}",
        scene.rings.len(),
        scene.bloom_circles.len(),
        scene.line_segments.len(),
        scene.bloom_line_segments.len(),
        scene.text_labels.len()
    );
    scene
}

fn emit_segment<R: Rng + ?Sized>(
    scene: &mut Scene,
    rng: &mut R,
    ring: &Ring,
    angle: f32,
    start_radius: f32,
    end_radius: f32,
    base_opacity: f32,
) {
    let bloom_tagged = rng.gen_bool(BLOOM_TAG_PROBABILITY);
    let center = ring.center_offset;
    let segment = LineSegment {
        start_point: polar_point(center, angle, start_radius),
        end_point: polar_point(center, angle, end_radius),
        angle,
        ring_index: ring.index,
        base_opacity,
        anim_phase: AnimPhase {
            phase_offset: rng.gen::<f32>() * PULSE_CYCLE,
            speed_multiplier: PULSE_SPEED_MIN + rng.gen::<f32>() * PULSE_SPEED_SPAN,
            delay: rng.gen::<f32>() * PULSE_CYCLE,
        },
        bloom_tagged,
        center,
        start_radius,
        end_radius,
    };
    match route(bloom_tagged) {
        BloomPass::Normal => scene.line_segments.push(segment),
        BloomPass::Bloom => scene.bloom_line_segments.push(segment),
    }
}

/// Split `[start_radius, end_radius]` into dashes separated by gaps.
fn emit_dashed<R: Rng + ?Sized>(
    scene: &mut Scene,
    rng: &mut R,
    ring: &Ring,
    angle: f32,
    start_radius: f32,
    end_radius: f32,
    base_opacity: f32,
) {
    let mut cursor = start_radius;
    let mut emitted = 0;
    while cursor < end_radius && emitted < MAX_DASH_SEGMENTS {
        let dash = (DASH_MIN + rng.gen::<f32>() * (DASH_MAX - DASH_MIN)).min(end_radius - cursor);
        emit_segment(scene, rng, ring, angle, cursor, cursor + dash, base_opacity);
        emitted += 1;
        cursor += dash + DASH_GAP_MIN + rng.gen::<f32>() * (DASH_GAP_MAX - DASH_GAP_MIN);
    }
}

fn try_place_label<R: Rng + ?Sized>(
    scene: &mut Scene,
    rng: &mut R,
    ring: &Ring,
    angle: f32,
    end_radius: f32,
    taken_angles: &mut SmallVec<[f32; 8]>,
) {
    if taken_angles
        .iter()
        .any(|&a| angular_distance(a, angle) < MIN_LABEL_SEPARATION)
    {
        return;
    }
    taken_angles.push(angle);
    scene.text_labels.push(TextLabel {
        text: label_text(rng),
        position: polar_point(ring.center_offset, angle, end_radius + LABEL_RADIAL_OFFSET),
        rotation_angle: angle,
        opacity: LABEL_OPACITY_MIN + rng.gen::<f32>() * LABEL_OPACITY_SPAN,
        font_size: LABEL_FONT_MIN + rng.gen::<f32>() * LABEL_FONT_SPAN,
        ring_index: ring.index,
        angle,
    });
}

/// Memoizes a generated scene on the settings it was built from.
#[derive(Default)]
pub struct SceneCache {
    key: Option<QualitySettings>,
    scene: Scene,
}

impl SceneCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached scene, generating it only when `settings` differ from
    /// the ones the cache was filled with.
    pub fn get_or_generate<R: Rng + ?Sized>(
        &mut self,
        settings: &QualitySettings,
        rng: &mut R,
    ) -> &Scene {
        if self.key.as_ref() != Some(settings) {
            self.scene = generate(settings, rng);
            self.key = Some(*settings);
        }
        &self.scene
    }

    /// The scene from the last fill; empty before the first.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Forget the key so the next lookup draws a fresh layout even for the
    /// same settings.
    pub fn invalidate(&mut self) {
        self.key = None;
    }
}
