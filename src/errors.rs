use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid configuration: {field} {reason} (got {value})")]
    InvalidConfiguration {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Integration error: {0}")]
    IntegrationError(String),

    #[error("Scenario error: {0}")]
    ScenarioError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("System error: {0}")]
    SystemError(String),
}

impl SimulationError {
    /// Name of the offending input field, if this is a configuration error.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            SimulationError::InvalidConfiguration { field, .. } => Some(*field),
            _ => None,
        }
    }
}

/// Fails unless `value` is finite and strictly positive.
pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<(), SimulationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimulationError::InvalidConfiguration {
            field,
            value,
            reason: "must be a positive finite number",
        })
    }
}

/// Fails unless `value` is finite and zero or greater.
pub(crate) fn require_non_negative(
    field: &'static str,
    value: f64,
) -> Result<(), SimulationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimulationError::InvalidConfiguration {
            field,
            value,
            reason: "must be a non-negative finite number",
        })
    }
}

/// Fails unless `value` lies in [0, 1].
pub(crate) fn require_fraction(field: &'static str, value: f64) -> Result<(), SimulationError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimulationError::InvalidConfiguration {
            field,
            value,
            reason: "must lie between 0 and 1",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_check_rejects_zero_and_nan() {
        assert!(require_positive("rider.power", 0.0).is_err());
        assert!(require_positive("rider.power", f64::NAN).is_err());
        assert!(require_positive("rider.power", f64::INFINITY).is_err());
        assert!(require_positive("rider.power", 1e-9).is_ok());
    }

    #[test]
    fn test_error_names_the_field() {
        let error = require_positive("bike.wheel_radius", -0.3).unwrap_err();
        assert_eq!(error.field(), Some("bike.wheel_radius"));
        assert!(error.to_string().contains("bike.wheel_radius"));
    }

    #[test]
    fn test_fraction_bounds() {
        assert!(require_fraction("terrain.climb_fraction", 0.0).is_ok());
        assert!(require_fraction("terrain.climb_fraction", 1.0).is_ok());
        assert!(require_fraction("terrain.climb_fraction", 1.01).is_err());
        assert!(require_non_negative("bike.moment_of_inertia", 0.0).is_ok());
        assert!(require_non_negative("bike.moment_of_inertia", -0.1).is_err());
    }
}
