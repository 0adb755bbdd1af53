use serde::{Deserialize, Serialize};

use crate::constants::METERS_PER_KILOMETER;
use crate::errors::{require_fraction, require_non_negative, require_positive, SimulationError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub total_elevation_gain: f64, // m, climbed over the whole route
    pub total_distance: f64,       // km
    pub climb_fraction: f64,
    pub descent_fraction: f64,
    pub stop_spacing: f64, // m between stops
}

/// Route length per terrain class, in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassDistances {
    pub flat: f64,
    pub climb: f64,
    pub descent: f64,
}

impl TerrainConfig {
    pub fn new(
        total_elevation_gain: f64,
        total_distance: f64,
        climb_fraction: f64,
        descent_fraction: f64,
        stop_spacing: f64,
    ) -> Self {
        TerrainConfig {
            total_elevation_gain,
            total_distance,
            climb_fraction,
            descent_fraction,
            stop_spacing,
        }
    }

    /// Flat ground only.
    pub fn flat(total_distance: f64, stop_spacing: f64) -> Self {
        TerrainConfig::new(0.0, total_distance, 0.0, 0.0, stop_spacing)
    }

    /// Fractions summing above one are accepted here; the flat share is
    /// clamped to zero in [`class_distances`](Self::class_distances).
    pub fn validate(&self) -> Result<(), SimulationError> {
        require_non_negative("terrain.total_elevation_gain", self.total_elevation_gain)?;
        require_positive("terrain.total_distance", self.total_distance)?;
        require_fraction("terrain.climb_fraction", self.climb_fraction)?;
        require_fraction("terrain.descent_fraction", self.descent_fraction)?;
        require_positive("terrain.stop_spacing", self.stop_spacing)?;
        Ok(())
    }

    pub fn class_distances(&self) -> ClassDistances {
        let total = self.total_distance * METERS_PER_KILOMETER;
        let flat_fraction = 1.0 - self.climb_fraction - self.descent_fraction;
        ClassDistances {
            flat: (total * flat_fraction).max(0.0),
            climb: total * self.climb_fraction,
            descent: total * self.descent_fraction,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.climb_fraction + self.descent_fraction > 1.0
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig::new(7800.0, 1100.0, 0.33, 0.33, 2000.0)
    }
}
