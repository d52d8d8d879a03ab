use thiserror::Error;

/// A tuning value that would break one of the simulation's invariants
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be finite and greater than zero, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("{name} must be finite and not negative, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("{name} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("turbo top speed ({turbo}) must not be below the base top speed ({base})")]
    TurboSlowerThanBase { base: f32, turbo: f32 },
    #[error("lap line ({line}) and re-arm line ({rearm}) must differ")]
    LapLinesOverlap { line: f32, rearm: f32 },
}

/// Failure reported by an external collaborator (renderer, audio, asset loader)
///
/// The simulation only ever logs these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    #[error("asset \"{0}\" is unavailable")]
    AssetUnavailable(String),
    #[error("asset \"{key}\" could not be decoded: {reason}")]
    Decode { key: String, reason: String },
    #[error("playback of \"{0}\" was rejected")]
    PlaybackRejected(String),
    #[error("{0}")]
    Other(String),
}

pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

pub(crate) fn check_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

pub(crate) fn check_range(
    name: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}
