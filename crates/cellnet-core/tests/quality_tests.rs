// Table-driven checks for the quality tier lookups.

use cellnet_core::{
    bloom_settings, select_quality, tier_to_settings, BloomSettings, HostCapabilities,
    QualitySettings, QualityTier,
};

#[test]
fn settings_table_is_fixed() {
    let expected = [
        (
            QualityTier::Low,
            QualitySettings {
                ring_count: 12,
                ring_segment_count: 48,
                line_density_multiplier: 0.5,
                text_density_multiplier: 0.4,
            },
        ),
        (
            QualityTier::Medium,
            QualitySettings {
                ring_count: 20,
                ring_segment_count: 96,
                line_density_multiplier: 0.75,
                text_density_multiplier: 0.7,
            },
        ),
        (
            QualityTier::High,
            QualitySettings {
                ring_count: 28,
                ring_segment_count: 128,
                line_density_multiplier: 1.0,
                text_density_multiplier: 1.0,
            },
        ),
    ];
    for (tier, settings) in expected {
        assert_eq!(tier_to_settings(tier), settings, "settings for {tier}");
    }
}

#[test]
fn bloom_table_is_fixed() {
    let expected = [
        (QualityTier::Low, (0.8, 0.4, 0.35, 0.6)),
        (QualityTier::Medium, (1.2, 0.6, 0.25, 0.7)),
        (QualityTier::High, (1.6, 0.8, 0.18, 0.8)),
    ];
    for (tier, (intensity, radius, luminance_threshold, luminance_smoothing)) in expected {
        assert_eq!(
            bloom_settings(tier),
            BloomSettings {
                intensity,
                radius,
                luminance_threshold,
                luminance_smoothing,
            },
            "bloom for {tier}"
        );
    }
}

#[test]
fn lower_tiers_are_cheaper() {
    let [low, med, high] = QualityTier::ALL.map(tier_to_settings);
    assert!(low.ring_count < med.ring_count && med.ring_count < high.ring_count);
    assert!(low.ring_segment_count < med.ring_segment_count);
    assert!(med.ring_segment_count < high.ring_segment_count);
    assert!(low.line_density_multiplier < high.line_density_multiplier);
    let [bl, bm, bh] = QualityTier::ALL.map(bloom_settings);
    assert!(bl.intensity < bm.intensity && bm.intensity < bh.intensity);
    assert!(bl.radius < bh.radius);
}

#[test]
fn selection_covers_the_whole_core_range() {
    for cores in 1..=64u32 {
        let tier = select_quality(Some(cores), false);
        let expected = match cores {
            0..=4 => QualityTier::Low,
            5..=7 => QualityTier::Medium,
            _ => QualityTier::High,
        };
        assert_eq!(tier, expected, "cores={cores}");
        assert_eq!(select_quality(Some(cores), true), QualityTier::Low);
    }
}

#[test]
fn selection_is_pure() {
    let caps = HostCapabilities {
        hardware_concurrency: Some(6),
        is_mobile_like: false,
    };
    assert_eq!(caps.tier(), caps.tier());
    assert_eq!(caps.tier(), QualityTier::Medium);
}
