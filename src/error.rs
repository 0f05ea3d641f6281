//! Structural configuration errors.
//!
//! Only errors that make a bolt impossible to evaluate are surfaced here.
//! Purely aesthetic out-of-range values (negative thickness, swapped min/max
//! bounds) are clamped silently by [`BoltConfig::normalized`] instead.
//!
//! [`BoltConfig::normalized`]: crate::config::BoltConfig::normalized

use thiserror::Error;

/// Errors raised at construction or assignment time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoltError {
    /// `part_count` must be at least 1.
    #[error("part count must be >= 1, got {0}")]
    InvalidPartCount(u32),

    /// Gradient keyframes must have strictly increasing positions spanning
    /// exactly [0, 1].
    #[error("malformed color gradient: {0}")]
    MalformedGradient(&'static str),

    /// An attachment with a non-finite position or a zero / non-finite axis.
    #[error("invalid attachment: {0}")]
    InvalidAttachment(&'static str),
}
