use cellnet_core::{QualityTier, SessionConfig};
use clap::builder::BoolishValueParser;
use clap::Parser;

/// cellnet: procedural cellular network visualizer.
#[derive(Parser, Debug)]
#[command(name = "cellnet-native", version, about)]
pub struct Args {
    /// Force a quality tier (low, medium, high) instead of probing the host.
    #[arg(long, env = "CELLNET_QUALITY")]
    pub quality: Option<QualityTier>,

    /// Seed for a reproducible layout.
    #[arg(long, env = "CELLNET_SEED")]
    pub seed: Option<u64>,

    /// Show text labels (on/off, true/false, 1/0).
    #[arg(
        long,
        env = "CELLNET_LABELS",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub labels: Option<bool>,
}

impl Args {
    pub fn into_config(self) -> SessionConfig {
        let defaults = SessionConfig::default();
        SessionConfig {
            quality_override: self.quality,
            seed: self.seed,
            show_labels: self.labels.unwrap_or(defaults.show_labels),
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> SessionConfig {
        Args::try_parse_from(args).unwrap().into_config()
    }

    #[test]
    fn space_and_equals_forms_both_parse() {
        let cfg = config(&["cellnet-native", "--quality", "high", "--seed", "42"]);
        assert_eq!(cfg.quality_override, Some(QualityTier::High));
        assert_eq!(cfg.seed, Some(42));
        assert!(cfg.show_labels);

        let cfg = config(&["cellnet-native", "--quality=low", "--labels=off"]);
        assert_eq!(cfg.quality_override, Some(QualityTier::Low));
        assert!(!cfg.show_labels);
    }

    #[test]
    fn bare_labels_flag_means_on() {
        assert!(config(&["cellnet-native", "--labels"]).show_labels);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(Args::try_parse_from(["cellnet-native", "--quality", "ultra"]).is_err());
        assert!(Args::try_parse_from(["cellnet-native", "--seed", "-1"]).is_err());
        assert!(Args::try_parse_from(["cellnet-native", "stray"]).is_err());
    }

    #[test]
    fn help_is_generated() {
        let err = Args::try_parse_from(["cellnet-native", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
