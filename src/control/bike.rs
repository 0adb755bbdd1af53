use serde::{Deserialize, Serialize};

use crate::errors::{require_non_negative, require_positive, SimulationError};

/// Physical description of one bicycle. The rider is described separately
/// by [`RiderConfig`](crate::RiderConfig).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BikeConfig {
    pub name: String,
    pub moment_of_inertia: f64,         // kg·m², both wheels
    pub wheel_radius: f64,              // m
    pub bike_mass: f64,                 // kg
    pub rolling_resistance_coeff: f64,
    pub drag_area: f64,                 // m², Cd × A
}

impl BikeConfig {
    pub fn new(
        name: impl Into<String>,
        moment_of_inertia: f64,
        wheel_radius: f64,
        bike_mass: f64,
        rolling_resistance_coeff: f64,
        drag_area: f64,
    ) -> Self {
        BikeConfig {
            name: name.into(),
            moment_of_inertia,
            wheel_radius,
            bike_mass,
            rolling_resistance_coeff,
            drag_area,
        }
    }

    /// Heavier bike on small (0.29 m) wheels with a slightly lower drag area.
    pub fn preset_small_wheel() -> Self {
        BikeConfig::new("Bike 1", 0.096, 0.29, 11.0, 0.0029, 0.31)
    }

    /// Light bike on 0.34 m wheels.
    pub fn preset_large_wheel() -> Self {
        BikeConfig::new("Bike 2", 0.096, 0.34, 7.5, 0.0029, 0.33)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        require_non_negative("bike.moment_of_inertia", self.moment_of_inertia)?;
        require_positive("bike.wheel_radius", self.wheel_radius)?;
        require_positive("bike.bike_mass", self.bike_mass)?;
        require_non_negative("bike.rolling_resistance_coeff", self.rolling_resistance_coeff)?;
        require_positive("bike.drag_area", self.drag_area)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(BikeConfig::preset_small_wheel().validate().is_ok());
        assert!(BikeConfig::preset_large_wheel().validate().is_ok());
    }

    #[test]
    fn test_zero_inertia_is_allowed() {
        let mut bike = BikeConfig::preset_small_wheel();
        bike.moment_of_inertia = 0.0;
        assert!(bike.validate().is_ok());
    }

    #[test]
    fn test_zero_wheel_radius_is_rejected() {
        let mut bike = BikeConfig::preset_large_wheel();
        bike.wheel_radius = 0.0;
        let error = bike.validate().unwrap_err();
        assert_eq!(error.field(), Some("bike.wheel_radius"));
    }

    #[test]
    fn test_nan_drag_area_is_rejected() {
        let mut bike = BikeConfig::preset_large_wheel();
        bike.drag_area = f64::NAN;
        assert_eq!(bike.validate().unwrap_err().field(), Some("bike.drag_area"));
    }
}
