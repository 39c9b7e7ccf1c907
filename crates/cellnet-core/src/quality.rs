//! Device quality tiers and their fixed parameter tables.
//!
//! A tier is picked once at startup from host capability signals and never
//! changes for the session. Everything downstream (ring count, line density,
//! bloom strength) is a plain table lookup keyed on the tier.

use crate::error::CoreError;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QualityTier {
    Low,
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QualitySettings {
    pub ring_count: usize,
    pub ring_segment_count: u32,
    pub line_density_multiplier: f32,
    pub text_density_multiplier: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BloomSettings {
    pub intensity: f32,
    pub radius: f32,
    pub luminance_threshold: f32,
    pub luminance_smoothing: f32,
}

const SETTINGS_TABLE: [QualitySettings; 3] = [
    QualitySettings {
        ring_count: 12,
        ring_segment_count: 48,
        line_density_multiplier: 0.5,
        text_density_multiplier: 0.4,
    },
    QualitySettings {
        ring_count: 20,
        ring_segment_count: 96,
        line_density_multiplier: 0.75,
        text_density_multiplier: 0.7,
    },
    QualitySettings {
        ring_count: 28,
        ring_segment_count: 128,
        line_density_multiplier: 1.0,
        text_density_multiplier: 1.0,
    },
];

const BLOOM_TABLE: [BloomSettings; 3] = [
    BloomSettings {
        intensity: 0.8,
        radius: 0.4,
        luminance_threshold: 0.35,
        luminance_smoothing: 0.6,
    },
    BloomSettings {
        intensity: 1.2,
        radius: 0.6,
        luminance_threshold: 0.25,
        luminance_smoothing: 0.7,
    },
    BloomSettings {
        intensity: 1.6,
        radius: 0.8,
        luminance_threshold: 0.18,
        luminance_smoothing: 0.8,
    },
];

impl QualityTier {
    pub const ALL: [QualityTier; 3] = [QualityTier::Low, QualityTier::Medium, QualityTier::High];

    #[inline]
    fn table_index(self) -> usize {
        match self {
            QualityTier::Low => 0,
            QualityTier::Medium => 1,
            QualityTier::High => 2,
        }
    }

    #[inline]
    pub fn settings(self) -> QualitySettings {
        SETTINGS_TABLE[self.table_index()]
    }

    #[inline]
    pub fn bloom(self) -> BloomSettings {
        BLOOM_TABLE[self.table_index()]
    }

    pub fn name(self) -> &'static str {
        match self {
            QualityTier::Low => "low",
            QualityTier::Medium => "medium",
            QualityTier::High => "high",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QualityTier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" | "l" => Ok(QualityTier::Low),
            "medium" | "med" | "m" => Ok(QualityTier::Medium),
            "high" | "h" => Ok(QualityTier::High),
            _ => Err(CoreError::UnknownQualityTier(s.to_string())),
        }
    }
}

/// Pick a tier from host signals. Mobile hosts and anything with four or fewer
/// logical processors get `Low`; eight or more get `High`. An unknown (or zero)
/// processor count on a non-mobile host falls back to `Medium`.
pub fn select_quality(hardware_concurrency: Option<u32>, is_mobile_like: bool) -> QualityTier {
    if is_mobile_like {
        return QualityTier::Low;
    }
    match hardware_concurrency {
        None | Some(0) => QualityTier::Medium,
        Some(n) if n <= 4 => QualityTier::Low,
        Some(n) if n >= 8 => QualityTier::High,
        Some(_) => QualityTier::Medium,
    }
}

#[inline]
pub fn tier_to_settings(tier: QualityTier) -> QualitySettings {
    tier.settings()
}

#[inline]
pub fn bloom_settings(tier: QualityTier) -> BloomSettings {
    tier.bloom()
}

/// Host capability signals as probed by a front-end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostCapabilities {
    pub hardware_concurrency: Option<u32>,
    pub is_mobile_like: bool,
}

impl HostCapabilities {
    pub fn tier(&self) -> QualityTier {
        select_quality(self.hardware_concurrency, self.is_mobile_like)
    }
}

/// Rough mobile classification from a browser user agent string.
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    const MARKERS: [&str; 6] = ["Mobi", "Android", "iPhone", "iPad", "iPod", "IEMobile"];
    MARKERS.iter().any(|m| user_agent.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_thresholds() {
        assert_eq!(select_quality(Some(2), false), QualityTier::Low);
        assert_eq!(select_quality(Some(4), false), QualityTier::Low);
        assert_eq!(select_quality(Some(6), false), QualityTier::Medium);
        assert_eq!(select_quality(Some(8), false), QualityTier::High);
        assert_eq!(select_quality(Some(32), false), QualityTier::High);
    }

    #[test]
    fn mobile_flag_wins_over_core_count() {
        assert_eq!(select_quality(Some(16), true), QualityTier::Low);
        assert_eq!(select_quality(None, true), QualityTier::Low);
    }

    #[test]
    fn missing_capability_defaults_to_medium() {
        assert_eq!(select_quality(None, false), QualityTier::Medium);
        assert_eq!(select_quality(Some(0), false), QualityTier::Medium);
        assert_eq!(HostCapabilities::default().tier(), QualityTier::Medium);
    }

    #[test]
    fn parses_tier_names() {
        assert_eq!("HIGH".parse::<QualityTier>(), Ok(QualityTier::High));
        assert_eq!(" med ".parse::<QualityTier>(), Ok(QualityTier::Medium));
        assert!(matches!(
            "ultra".parse::<QualityTier>(),
            Err(CoreError::UnknownQualityTier(_))
        ));
        for tier in QualityTier::ALL {
            assert_eq!(tier.to_string().parse::<QualityTier>(), Ok(tier));
        }
    }

    #[test]
    fn user_agent_markers() {
        assert!(is_mobile_user_agent(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148"
        ));
        assert!(is_mobile_user_agent("Mozilla/5.0 (Linux; Android 14; Pixel 8)"));
        assert!(!is_mobile_user_agent(
            "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0"
        ));
    }
}
