//! Simulation error types.
//!
//! Everything that can reject input returns [`SimResult`]. The host bindings
//! in [`crate::bindings`] turn a [`SimError`] into a thrown JS error; the
//! native runner prints it.

use std::fmt;

/// Top-level error enum for the particle-life module.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A numeric argument is outside its accepted range.
    InvalidArgument {
        /// Name of the argument (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f64,
        /// Human-readable description of the accepted range.
        expected: &'static str,
    },

    /// A rules matrix or radii list does not match the number of colors.
    RuleShape {
        /// Which list was malformed (`"rules"` or `"radii"`).
        what: &'static str,
        /// Length implied by the color count.
        expected: usize,
        /// Actual length provided.
        got: usize,
    },

    /// A TOML configuration document failed to parse.
    Config(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidArgument {
                name,
                value,
                expected,
            } => write!(f, "invalid argument '{}' = {}: expected {}", name, value, expected),
            SimError::RuleShape {
                what,
                expected,
                got,
            } => write!(
                f,
                "{} has wrong length: got {}, need {}",
                what, got, expected
            ),
            SimError::Config(msg) => write!(f, "config parse error: {}", msg),
        }
    }
}

impl std::error::Error for SimError {}

impl From<toml::de::Error> for SimError {
    fn from(e: toml::de::Error) -> Self {
        SimError::Config(e.to_string())
    }
}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error if a host-supplied count is negative.
pub fn validate_count(name: &'static str, value: i64) -> SimResult<u32> {
    u32::try_from(value).map_err(|_| SimError::InvalidArgument {
        name,
        value: value as f64,
        expected: "an integer in [0, 2^32)",
    })
}

/// Returns an error if an extent is negative or not finite.
pub fn validate_extent(name: &'static str, value: f32) -> SimResult<f32> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SimError::InvalidArgument {
            name,
            value: value as f64,
            expected: "a finite value >= 0",
        })
    }
}

/// Returns an error if `value` is not finite or falls outside `[lo, hi]`.
pub fn validate_range(
    name: &'static str,
    value: f32,
    lo: f32,
    hi: f32,
    expected: &'static str,
) -> SimResult<f32> {
    if value.is_finite() && value >= lo && value <= hi {
        Ok(value)
    } else {
        Err(SimError::InvalidArgument {
            name,
            value: value as f64,
            expected,
        })
    }
}
