use thiserror::Error;

/// Result alias for configuration and parameter updates.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Rejected configuration. Raised at construction or parameter-update time,
/// never from inside a tick.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("grid size {n} is outside 1..={max}")]
    GridSize { n: usize, max: usize },

    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("{name} must be finite and positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("heat radius must be at least 1")]
    ZeroRadius,

    #[error("heat radius {radius} exceeds {max} cells")]
    RadiusTooLarge { radius: usize, max: usize },

    #[error("cooling rate must be within 0..=100, got {0}")]
    CoolingRate(f64),

    #[error("{name} must be at least 1")]
    ZeroCount { name: &'static str },
}

/// Reject NaN, infinities and negative values.
pub(crate) fn non_negative(name: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

/// Reject NaN, infinities, zero and negative values.
pub(crate) fn positive(name: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}
