use serde::{Deserialize, Serialize};

use crate::errors::{require_positive, SimulationError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiderConfig {
    pub power: f64,      // W, held constant for the whole ride
    pub rider_mass: f64, // kg
}

impl RiderConfig {
    pub fn new(power: f64, rider_mass: f64) -> Self {
        RiderConfig { power, rider_mass }
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        require_positive("rider.power", self.power)?;
        require_positive("rider.rider_mass", self.rider_mass)?;
        Ok(())
    }
}

impl Default for RiderConfig {
    fn default() -> Self {
        RiderConfig::new(250.0, 85.0)
    }
}
