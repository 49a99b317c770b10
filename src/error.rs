//! Configuration errors
//!
//! The simulation refuses to start on any of these rather than produce
//! undefined geometry.

use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A length or duration that must be strictly positive
    NonPositive { field: &'static str, value: f32 },
    /// A spawn odds denominator of zero
    ZeroOdds { field: &'static str },
    /// A speed range with `min > max` or non-finite bounds
    InvalidRange { field: &'static str, min: f32, max: f32 },
    /// A ratio that must lie within its unit interval
    OutOfUnitRange { field: &'static str, value: f32 },
    /// Grid cells do not fit inside the scene
    GridLargerThanScene { grid_size: f32, width: f32, height: f32 },
    /// Settings file could not be read
    Io(String),
    /// Settings file is not valid JSON for [`crate::Settings`]
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::ZeroOdds { field } => write!(f, "{field} must be at least 1"),
            Self::InvalidRange { field, min, max } => {
                write!(f, "{field} range is invalid: min={min}, max={max}")
            }
            Self::OutOfUnitRange { field, value } => {
                write!(f, "{field} is out of range: {value}")
            }
            Self::GridLargerThanScene {
                grid_size,
                width,
                height,
            } => write!(
                f,
                "grid_size {grid_size} does not fit in a {width}x{height} scene"
            ),
            Self::Io(msg) => write!(f, "cannot read settings: {msg}"),
            Self::Parse(msg) => write!(f, "cannot parse settings: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
