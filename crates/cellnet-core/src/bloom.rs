//! Bloom routing: which geometry goes through the selective glow pass.
//!
//! Routing happens once at generation time. The renderer then sees two
//! disjoint batches per geometry kind and only the bloom batch is fed to the
//! bright-pass/blur chain, whose parameters come from the tier's
//! [`BloomSettings`].

use crate::quality::BloomSettings;
use crate::scene::{BloomCircle, LineSegment, Ring, Scene};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BloomPass {
    Normal,
    Bloom,
}

#[inline]
pub fn route(bloom_tagged: bool) -> BloomPass {
    if bloom_tagged {
        BloomPass::Bloom
    } else {
        BloomPass::Normal
    }
}

/// Borrowed view of the scene split per pass.
#[derive(Clone, Copy, Debug)]
pub struct GeometryBatches<'a> {
    pub normal_lines: &'a [LineSegment],
    pub bloom_lines: &'a [LineSegment],
    pub rings: &'a [Ring],
    pub bloom_circles: &'a [BloomCircle],
}

impl<'a> GeometryBatches<'a> {
    pub fn lines(&self, pass: BloomPass) -> &'a [LineSegment] {
        match pass {
            BloomPass::Normal => self.normal_lines,
            BloomPass::Bloom => self.bloom_lines,
        }
    }
}

impl Scene {
    pub fn batches(&self) -> GeometryBatches<'_> {
        GeometryBatches {
            normal_lines: &self.line_segments,
            bloom_lines: &self.bloom_line_segments,
            rings: &self.rings,
            bloom_circles: &self.bloom_circles,
        }
    }
}

// Blur spread in texels at radius 1.0, and the number of separable passes
// used at the extremes of the radius range.
const MAX_BLUR_SPREAD: f32 = 3.0;
const MIN_BLUR_PASSES: u32 = 1;
const MAX_BLUR_PASSES: u32 = 3;

/// Post-processing parameters handed to the renderer once per session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BloomParams {
    pub intensity: f32,
    pub threshold: f32,
    pub smoothing: f32,
    pub blur_spread: f32,
    pub blur_passes: u32,
}

impl From<BloomSettings> for BloomParams {
    fn from(s: BloomSettings) -> Self {
        let radius = s.radius.clamp(0.0, 1.0);
        let passes = MIN_BLUR_PASSES
            + ((MAX_BLUR_PASSES - MIN_BLUR_PASSES) as f32 * radius).round() as u32;
        Self {
            intensity: s.intensity.max(0.0),
            threshold: s.luminance_threshold.clamp(0.0, 1.0),
            smoothing: s.luminance_smoothing.clamp(0.0, 1.0),
            blur_spread: (MAX_BLUR_SPREAD * radius).max(0.5),
            blur_passes: passes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::QualityTier;

    #[test]
    fn routing_is_a_pure_partition() {
        assert_eq!(route(true), BloomPass::Bloom);
        assert_eq!(route(false), BloomPass::Normal);
    }

    #[test]
    fn higher_tiers_blur_wider() {
        let low = BloomParams::from(QualityTier::Low.bloom());
        let high = BloomParams::from(QualityTier::High.bloom());
        assert!(high.blur_spread > low.blur_spread);
        assert!(high.blur_passes >= low.blur_passes);
        assert!(high.intensity > low.intensity);
        assert!((MIN_BLUR_PASSES..=MAX_BLUR_PASSES).contains(&low.blur_passes));
    }

    #[test]
    fn batches_split_lines_by_pass() {
        let scene = Scene::default();
        let b = scene.batches();
        assert!(b.lines(BloomPass::Normal).is_empty());
        assert!(b.lines(BloomPass::Bloom).is_empty());
    }
}
