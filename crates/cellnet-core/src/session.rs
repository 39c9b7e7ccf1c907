//! Session state: everything computed once at startup plus the per-frame path.
//!
//! A [`Session`] is built once from host capabilities and config, owns the
//! generated scene, both pulse animators and the instance sets, and is passed
//! by `&mut` to the frame loop. There is no global state.

use crate::bloom::{BloomParams, BloomPass};
use crate::camera::{choreograph, Camera, CameraPose};
use crate::clock::{FrameClock, FrameStats};
use crate::config::SessionConfig;
use crate::error::CoreError;
use crate::instances::InstanceSet;
use crate::pulse::{AnimationBuffers, PulseAnimator};
use crate::quality::{HostCapabilities, QualitySettings, QualityTier};
use crate::scene::{Scene, SceneCache};
use glam::Mat4;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// RNG for scene generation: seeded when a seed is configured, otherwise
/// drawn from the OS.
pub fn session_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// What the renderer needs to present one frame.
pub struct FrameOutput<'a> {
    pub elapsed: f32,
    pub pose: CameraPose,
    pub scene_transform: Mat4,
    pub view_projection: Mat4,
    pub lines: &'a AnimationBuffers,
    pub bloom_lines: &'a AnimationBuffers,
}

/// Per-frame state derived from one generated scene.
struct Playback {
    line_pulses: PulseAnimator,
    bloom_line_pulses: PulseAnimator,
    ring_instances: InstanceSet,
    bloom_circle_instances: InstanceSet,
}

impl Playback {
    fn build(scene: &Scene) -> Result<Self, CoreError> {
        let batches = scene.batches();
        let mut ring_instances = InstanceSet::with_capacity(batches.rings.len());
        ring_instances.sync_instances(batches.rings)?;
        let mut bloom_circle_instances = InstanceSet::with_capacity(batches.bloom_circles.len());
        bloom_circle_instances.sync_instances(batches.bloom_circles)?;
        Ok(Self {
            line_pulses: PulseAnimator::new(batches.lines(BloomPass::Normal)),
            bloom_line_pulses: PulseAnimator::new(batches.lines(BloomPass::Bloom)),
            ring_instances,
            bloom_circle_instances,
        })
    }

    fn advance(&mut self, scene: &Scene, elapsed: f32) -> Result<(), CoreError> {
        let batches = scene.batches();
        self.line_pulses
            .advance(batches.lines(BloomPass::Normal), elapsed)?;
        self.bloom_line_pulses
            .advance(batches.lines(BloomPass::Bloom), elapsed)
    }
}

pub struct Session {
    tier: QualityTier,
    settings: QualitySettings,
    bloom: BloomParams,
    config: SessionConfig,
    scenes: SceneCache,
    playback: Playback,
    camera: Camera,
    clock: FrameClock,
    stats: FrameStats,
    aborted: Option<CoreError>,
}

impl Session {
    pub fn new<R: Rng + ?Sized>(
        caps: HostCapabilities,
        config: SessionConfig,
        rng: &mut R,
        viewport: (u32, u32),
    ) -> Result<Self, CoreError> {
        let tier = config.quality_override.unwrap_or_else(|| caps.tier());
        let settings = tier.settings();
        let mut scenes = SceneCache::new();
        let playback = Playback::build(scenes.get_or_generate(&settings, rng))?;

        let mut camera = Camera::new(1.0);
        camera.set_viewport(viewport.0, viewport.1);

        let scene = scenes.scene();
        log::info!(
            "[session] tier={} (caps: cores={:?} mobile={}) rings={} lines={} ({} bloom) bloom circles={} labels={}",
            tier,
            caps.hardware_concurrency,
            caps.is_mobile_like,
            scene.rings.len(),
            scene.segment_count(),
            scene.bloom_line_segments.len(),
            scene.bloom_circles.len(),
            scene.text_labels.len()
        );

        Ok(Self {
            tier,
            settings,
            bloom: BloomParams::from(tier.bloom()),
            config,
            scenes,
            playback,
            camera,
            clock: FrameClock::new(),
            stats: FrameStats::default(),
            aborted: None,
        })
    }

    pub fn tier(&self) -> QualityTier {
        self.tier
    }

    pub fn settings(&self) -> &QualitySettings {
        &self.settings
    }

    pub fn bloom(&self) -> &BloomParams {
        &self.bloom
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        self.scenes.scene()
    }

    pub fn ring_instances(&self) -> &InstanceSet {
        &self.playback.ring_instances
    }

    pub fn bloom_circle_instances(&self) -> &InstanceSet {
        &self.playback.bloom_circle_instances
    }

    /// Current pulse state of the normal lines; sized once per scene.
    pub fn line_buffers(&self) -> &AnimationBuffers {
        self.playback.line_pulses.buffers()
    }

    pub fn bloom_line_buffers(&self) -> &AnimationBuffers {
        self.playback.bloom_line_pulses.buffers()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Rolling average over the recent frame window.
    pub fn fps(&self) -> f64 {
        self.stats.fps()
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.clock.toggle_pause()
    }

    pub fn toggle_labels(&mut self) -> bool {
        self.config.show_labels = !self.config.show_labels;
        self.config.show_labels
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }

    fn abort(&mut self, e: CoreError) -> CoreError {
        log::error!("[session] aborting: {e}");
        self.aborted = Some(e.clone());
        e
    }

    /// Advance by a wall-clock delta and animate.
    pub fn frame(&mut self, dt: Duration) -> Result<FrameOutput<'_>, CoreError> {
        self.clock.tick(dt);
        if let Some(fps) = self.stats.record(dt) {
            log::debug!("[frame] {:.1} fps", fps);
        }
        let elapsed = self.clock.elapsed_secs();
        self.frame_at(elapsed)
    }

    /// Animate for an absolute elapsed time. Once a contract violation has been
    /// seen the session stays aborted and every call returns that error.
    pub fn frame_at(&mut self, elapsed: f32) -> Result<FrameOutput<'_>, CoreError> {
        if let Some(e) = &self.aborted {
            return Err(e.clone());
        }
        if let Err(e) = self.playback.advance(self.scenes.scene(), elapsed) {
            return Err(self.abort(e));
        }

        let pose = choreograph(elapsed);
        self.camera.apply(&pose);
        Ok(FrameOutput {
            elapsed,
            pose,
            scene_transform: pose.scene_transform(),
            view_projection: self.camera.view_projection(),
            lines: self.playback.line_pulses.buffers(),
            bloom_lines: self.playback.bloom_line_pulses.buffers(),
        })
    }

    /// Replace the whole generated data set at once (tier change or reseed).
    /// An aborted session stays aborted and is not regenerated.
    pub fn regenerate<R: Rng + ?Sized>(
        &mut self,
        tier: QualityTier,
        rng: &mut R,
    ) -> Result<(), CoreError> {
        if let Some(e) = &self.aborted {
            return Err(e.clone());
        }
        let settings = tier.settings();
        self.scenes.invalidate();
        let built = Playback::build(self.scenes.get_or_generate(&settings, rng));
        self.playback = match built {
            Ok(p) => p,
            Err(e) => return Err(self.abort(e)),
        };
        self.tier = tier;
        self.settings = settings;
        self.bloom = BloomParams::from(tier.bloom());
        log::info!("[session] regenerated at tier={tier}");
        Ok(())
    }

    /// Test hook: animate against a foreign segment list to exercise the
    /// mismatch path.
    #[cfg(test)]
    fn advance_lines_with(
        &mut self,
        segments: &[crate::scene::LineSegment],
        elapsed: f32,
    ) -> Result<(), CoreError> {
        self.playback
            .line_pulses
            .advance(segments, elapsed)
            .map_err(|e| self.abort(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(tier: QualityTier) -> Session {
        let cfg = SessionConfig {
            quality_override: Some(tier),
            seed: Some(7),
            show_labels: true,
        };
        let mut rng = session_rng(cfg.seed);
        Session::new(HostCapabilities::default(), cfg, &mut rng, (1280, 720)).unwrap()
    }

    #[test]
    fn override_beats_capabilities() {
        let s = session(QualityTier::High);
        assert_eq!(s.tier(), QualityTier::High);
        assert_eq!(s.scene().rings.len(), QualityTier::High.settings().ring_count);
        assert_eq!(s.ring_instances().active_count(), s.scene().rings.len());
        assert_eq!(
            s.bloom_circle_instances().active_count(),
            s.scene().bloom_circles.len()
        );
    }

    #[test]
    fn capabilities_pick_tier_without_override() {
        let caps = HostCapabilities {
            hardware_concurrency: Some(2),
            is_mobile_like: false,
        };
        let mut rng = session_rng(Some(1));
        let s = Session::new(caps, SessionConfig::default(), &mut rng, (10, 10)).unwrap();
        assert_eq!(s.tier(), QualityTier::Low);
    }

    #[test]
    fn paused_frames_repeat_the_same_buffers() {
        let mut s = session(QualityTier::Low);
        let first = s.frame(Duration::from_millis(16)).unwrap().lines.clone();
        s.toggle_pause();
        let second = s.frame(Duration::from_millis(16)).unwrap().lines.clone();
        assert_eq!(first, second);
    }

    #[test]
    fn mismatch_aborts_the_session() {
        let mut s = session(QualityTier::Low);
        assert!(!s.scene().line_segments.is_empty());
        let segs = s.scene().line_segments.clone();
        let extra = [segs.clone(), segs].concat();
        let err = s.advance_lines_with(&extra, 1.0).unwrap_err();
        assert!(err.is_contract_violation());
        assert!(s.is_aborted());
        assert!(s.frame_at(2.0).is_err());
    }

    #[test]
    fn aborted_session_refuses_to_regenerate() {
        let mut s = session(QualityTier::Low);
        let segs = s.scene().line_segments.clone();
        let extra = [segs.clone(), segs].concat();
        let err = s.advance_lines_with(&extra, 0.5).unwrap_err();
        let mut rng = session_rng(Some(3));
        assert_eq!(s.regenerate(QualityTier::Low, &mut rng), Err(err));
        assert!(s.is_aborted());
        assert!(s.frame_at(1.0).is_err());
    }

    #[test]
    fn reseed_at_same_tier_draws_a_new_layout() {
        let mut s = session(QualityTier::Low);
        let before = s.scene().clone();
        let mut rng = session_rng(Some(1234));
        s.regenerate(QualityTier::Low, &mut rng).unwrap();
        assert_ne!(s.scene(), &before);
        assert_eq!(
            s.line_buffers().segment_count(),
            s.scene().line_segments.len()
        );
        assert_eq!(s.ring_instances().active_count(), s.scene().rings.len());
    }

    #[test]
    fn regenerate_replaces_everything() {
        let mut s = session(QualityTier::Low);
        let mut rng = session_rng(Some(99));
        s.regenerate(QualityTier::Medium, &mut rng).unwrap();
        assert_eq!(s.tier(), QualityTier::Medium);
        assert_eq!(
            s.scene().rings.len(),
            QualityTier::Medium.settings().ring_count
        );
        let expected = s.scene().line_segments.len();
        let out = s.frame_at(0.5).unwrap();
        assert_eq!(out.lines.segment_count(), expected);
    }

    #[test]
    fn exposed_buffers_follow_the_scene() {
        let mut s = session(QualityTier::Medium);
        let n = s.scene().line_segments.len();
        let b = s.scene().bloom_line_segments.len();
        assert_eq!(s.line_buffers().segment_count(), n);
        assert_eq!(s.bloom_line_buffers().segment_count(), b);
        let snapshot = s.frame_at(1.25).unwrap().lines.clone();
        assert_eq!(&snapshot, s.line_buffers());
    }
}
