use thiserror::Error;

/// Failures surfaced by the core.
///
/// Generation itself is total; the buffer and instance variants are contract
/// violations between generation and the per-frame path and end the session.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("animation buffers sized for {expected} segments, got {actual}")]
    BufferLengthMismatch { expected: usize, actual: usize },
    #[error("instance set holds {capacity} circles, asked to sync {requested}")]
    InstanceCapacityExceeded { capacity: usize, requested: usize },
    #[error("unknown quality tier `{0}` (expected low, medium or high)")]
    UnknownQualityTier(String),
    #[error("invalid seed `{0}`")]
    InvalidSeed(String),
}

impl CoreError {
    /// True for errors that mean generated data and per-frame state disagree.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            CoreError::BufferLengthMismatch { .. } | CoreError::InstanceCapacityExceeded { .. }
        )
    }
}
