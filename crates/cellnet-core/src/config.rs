//! Runtime session options.
//!
//! The web front-end reads `key=value` pairs from the URL query; the native
//! front-end parses flags with clap and fills the same struct.
//! Unknown keys are ignored; malformed values are reported and ignored so a
//! bad URL never prevents the visualization from starting.

use crate::error::CoreError;
use crate::quality::QualityTier;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub quality_override: Option<QualityTier>,
    pub seed: Option<u64>,
    pub show_labels: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            quality_override: None,
            seed: None,
            show_labels: true,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

impl SessionConfig {
    pub fn apply_pair(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        match key.trim().to_ascii_lowercase().as_str() {
            "quality" => {
                self.quality_override = Some(value.parse()?);
            }
            "seed" => {
                let seed = value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| CoreError::InvalidSeed(value.to_string()))?;
                self.seed = Some(seed);
            }
            "labels" => {
                if let Some(flag) = parse_flag(value) {
                    self.show_labels = flag;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Parse a URL query string such as `?quality=high&seed=7`. Keys and
    /// values are percent-decoded; bad pairs are logged and skipped.
    pub fn from_query(query: &str) -> Self {
        let mut cfg = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);
        for kv in query.split('&').filter(|kv| !kv.is_empty()) {
            let (k, v) = kv.split_once('=').unwrap_or((kv, ""));
            let (k, v) = match (urlencoding::decode(k), urlencoding::decode(v)) {
                (Ok(k), Ok(v)) => (k, v),
                _ => {
                    log::warn!("[config] ignoring {kv}: not valid UTF-8 once decoded");
                    continue;
                }
            };
            if let Err(e) = cfg.apply_pair(&k, &v) {
                log::warn!("[config] ignoring {kv}: {e}");
            }
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_string_roundtrip() {
        let cfg = SessionConfig::from_query("?quality=high&seed=42&labels=off");
        assert_eq!(cfg.quality_override, Some(QualityTier::High));
        assert_eq!(cfg.seed, Some(42));
        assert!(!cfg.show_labels);
    }

    #[test]
    fn bad_values_fall_back_to_defaults() {
        let cfg = SessionConfig::from_query("quality=ultra&seed=abc&labels=maybe&x=1");
        assert_eq!(cfg, SessionConfig::default());
    }

    #[test]
    fn empty_query_is_default() {
        assert_eq!(SessionConfig::from_query(""), SessionConfig::default());
        assert_eq!(SessionConfig::from_query("?"), SessionConfig::default());
    }

    #[test]
    fn apply_pair_reports_errors() {
        let mut cfg = SessionConfig::default();
        assert_eq!(
            cfg.apply_pair("seed", "-1"),
            Err(CoreError::InvalidSeed("-1".into()))
        );
        assert!(cfg.apply_pair("QUALITY", "Medium").is_ok());
        assert_eq!(cfg.quality_override, Some(QualityTier::Medium));
    }

    #[test]
    fn query_values_are_percent_decoded() {
        let cfg = SessionConfig::from_query("?quality=%68igh&seed=%34%32");
        assert_eq!(cfg.quality_override, Some(QualityTier::High));
        assert_eq!(cfg.seed, Some(42));
        let bad = SessionConfig::from_query("quality=%FF&seed=3");
        assert_eq!(bad.quality_override, None);
        assert_eq!(bad.seed, Some(3));
    }
}
