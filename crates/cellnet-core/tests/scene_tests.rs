// Structural invariants of generated scenes, pinned with seeded RNGs.

use cellnet_core::{
    angular_distance, generate, route, BloomPass, QualitySettings, QualityTier, Scene, BASE_RADIUS,
    BLOOM_RING_EVERY, MIN_LABEL_SEPARATION,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn scene_for(tier: QualityTier, seed: u64) -> Scene {
    let mut rng = StdRng::seed_from_u64(seed);
    generate(&tier.settings(), &mut rng)
}

#[test]
fn ring_radii_strictly_increase_and_count_matches() {
    for tier in QualityTier::ALL {
        for seed in 0..8 {
            let scene = scene_for(tier, seed);
            assert_eq!(scene.rings.len(), tier.settings().ring_count);
            assert!((scene.rings[0].radius - BASE_RADIUS).abs() < 1e-6);
            for pair in scene.rings.windows(2) {
                assert!(
                    pair[1].radius > pair[0].radius,
                    "radii not increasing: {} -> {} (tier {tier}, seed {seed})",
                    pair[0].radius,
                    pair[1].radius
                );
                assert_eq!(pair[1].index, pair[0].index + 1);
            }
        }
    }
}

#[test]
fn every_fourth_ring_has_a_bloom_circle() {
    let scene = scene_for(QualityTier::High, 3);
    let bloom_rings: Vec<usize> = scene.bloom_circles.iter().map(|c| c.ring_index).collect();
    let expected: Vec<usize> = (0..scene.rings.len())
        .filter(|i| i % BLOOM_RING_EVERY == 0)
        .collect();
    assert_eq!(bloom_rings, expected);
    for c in &scene.bloom_circles {
        let ring = &scene.rings[c.ring_index];
        assert!(c.radius > ring.radius);
        assert!(c.center != ring.center_offset);
    }
}

#[test]
fn labels_on_a_ring_keep_their_distance() {
    for seed in 0..16 {
        let scene = scene_for(QualityTier::High, seed);
        for ring in &scene.rings {
            let angles: Vec<f32> = scene
                .text_labels
                .iter()
                .filter(|l| l.ring_index == ring.index)
                .map(|l| l.angle)
                .collect();
            for (i, a) in angles.iter().enumerate() {
                for b in &angles[i + 1..] {
                    assert!(
                        angular_distance(*a, *b) >= MIN_LABEL_SEPARATION,
                        "labels too close on ring {} (seed {seed})",
                        ring.index
                    );
                }
            }
        }
    }
}

#[test]
fn labels_sit_past_their_ring() {
    let scene = scene_for(QualityTier::Medium, 21);
    assert!(!scene.text_labels.is_empty());
    for label in &scene.text_labels {
        let ring = &scene.rings[label.ring_index];
        let r = (label.position - ring.center_offset).length();
        assert!(r > ring.radius);
        assert!(label.font_size > 0.0);
        assert!(label.opacity > 0.0 && label.opacity <= 1.0);
        assert!(!label.text.is_empty());
    }
}

#[test]
fn bloom_and_normal_segments_partition_the_set() {
    for seed in 0..8 {
        let scene = scene_for(QualityTier::Medium, seed);
        assert!(scene.line_segments.iter().all(|s| !s.bloom_tagged));
        assert!(scene.bloom_line_segments.iter().all(|s| s.bloom_tagged));
        let total = scene.line_segments.len() + scene.bloom_line_segments.len();
        assert_eq!(total, scene.segment_count());
        let batches = scene.batches();
        assert!(batches
            .lines(BloomPass::Bloom)
            .iter()
            .all(|s| route(s.bloom_tagged) == BloomPass::Bloom));
        assert_eq!(
            batches.lines(BloomPass::Normal).len() + batches.lines(BloomPass::Bloom).len(),
            total
        );
        assert_eq!(batches.rings.len(), scene.rings.len());
    }
}

#[test]
fn bloom_share_is_roughly_a_fifth() {
    let mut bloom = 0usize;
    let mut total = 0usize;
    for seed in 0..10 {
        let scene = scene_for(QualityTier::High, seed);
        bloom += scene.bloom_line_segments.len();
        total += scene.segment_count();
    }
    let share = bloom as f64 / total as f64;
    assert!(share > 0.12 && share < 0.28, "bloom share {share}");
}

#[test]
fn segments_are_radial_and_start_outside_their_ring() {
    let scene = scene_for(QualityTier::Low, 4);
    for s in scene.line_segments.iter().chain(&scene.bloom_line_segments) {
        let ring = &scene.rings[s.ring_index];
        assert!(s.start_radius >= ring.radius);
        assert!(s.end_radius > s.start_radius);
        assert!((s.start_point - s.point_at(s.start_radius)).length() < 1e-5);
        assert!((s.end_point - s.point_at(s.end_radius)).length() < 1e-5);
        assert!(s.anim_phase.speed_multiplier > 0.0);
        assert!(s.base_opacity > 0.0 && s.base_opacity <= 1.0);
    }
}

#[test]
fn same_seed_same_scene() {
    assert_eq!(scene_for(QualityTier::Medium, 42), scene_for(QualityTier::Medium, 42));
    assert_ne!(scene_for(QualityTier::Medium, 42), scene_for(QualityTier::Medium, 43));
}

#[test]
fn single_ring_scenario() {
    let settings = QualitySettings {
        ring_count: 1,
        ring_segment_count: 32,
        line_density_multiplier: 1.0,
        text_density_multiplier: 1.0,
    };
    for seed in 0..32 {
        let mut rng = StdRng::seed_from_u64(seed);
        let scene = generate(&settings, &mut rng);
        assert_eq!(scene.rings.len(), 1);
        assert!((scene.rings[0].radius - BASE_RADIUS).abs() < 1e-6);
        // dashed runs share their line's angle, so distinct angles count lines
        let lines: HashSet<u32> = scene
            .line_segments
            .iter()
            .chain(&scene.bloom_line_segments)
            .map(|s| s.angle.to_bits())
            .collect();
        assert!(lines.len() >= 8 && lines.len() <= 8 + 25 + 10);
    }
}

#[test]
fn zero_density_generates_empty_rings() {
    let settings = QualitySettings {
        ring_count: 5,
        ring_segment_count: 16,
        line_density_multiplier: 0.0,
        text_density_multiplier: 1.0,
    };
    let mut rng = StdRng::seed_from_u64(0);
    let scene = generate(&settings, &mut rng);
    assert_eq!(scene.rings.len(), 5);
    assert_eq!(scene.segment_count(), 0);
    assert!(scene.text_labels.is_empty());
}

#[test]
fn zero_rings_is_an_empty_scene() {
    let settings = QualitySettings {
        ring_count: 0,
        ring_segment_count: 16,
        line_density_multiplier: 1.0,
        text_density_multiplier: 1.0,
    };
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(generate(&settings, &mut rng), Scene::default());
}
