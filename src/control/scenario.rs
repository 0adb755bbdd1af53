use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::control::{bike::BikeConfig, rider::RiderConfig, terrain::TerrainConfig};
use crate::errors::SimulationError;

/// Inputs of one two-bike comparison. Fields missing from a scenario file
/// fall back to the reference scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub rider: RiderConfig,
    pub bike_a: BikeConfig,
    pub bike_b: BikeConfig,
    pub terrain: TerrainConfig,
}

impl Scenario {
    pub fn new(
        rider: RiderConfig,
        bike_a: BikeConfig,
        bike_b: BikeConfig,
        terrain: TerrainConfig,
    ) -> Self {
        Scenario {
            rider,
            bike_a,
            bike_b,
            terrain,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, SimulationError> {
        let scenario: Scenario = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let contents = fs::read_to_string(path.as_ref())?;
        log::debug!("Loaded scenario from {}", path.as_ref().display());
        Self::from_json_str(&contents)
    }

    pub fn to_json(&self) -> Result<String, SimulationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        self.rider.validate()?;
        self.bike_a.validate()?;
        self.bike_b.validate()?;
        self.terrain.validate()
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Scenario {
            rider: RiderConfig::default(),
            bike_a: BikeConfig::preset_small_wheel(),
            bike_b: BikeConfig::preset_large_wheel(),
            terrain: TerrainConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_reference_scenario() {
        let scenario = Scenario::from_json_str("{}").unwrap();
        assert_eq!(scenario, Scenario::default());
    }

    #[test]
    fn test_partial_rider_keeps_other_defaults() {
        let scenario = Scenario::from_json_str(r#"{ "rider": { "power": 300.0 } }"#).unwrap();
        assert_eq!(scenario.rider.power, 300.0);
        assert_eq!(scenario.rider.rider_mass, 85.0);
        assert_eq!(scenario.terrain, TerrainConfig::default());
    }

    #[test]
    fn test_invalid_values_are_rejected_after_parsing() {
        let error = Scenario::from_json_str(r#"{ "terrain": { "stop_spacing": 0.0 } }"#)
            .unwrap_err();
        assert_eq!(error.field(), Some("terrain.stop_spacing"));
    }

    #[test]
    fn test_malformed_json_is_a_scenario_error() {
        let error = Scenario::from_json_str("{ rider: ").unwrap_err();
        assert!(matches!(error, SimulationError::ScenarioError(_)));
    }

    #[test]
    fn test_scenario_survives_json_export() {
        let scenario = Scenario::default();
        let json = scenario.to_json().unwrap();
        assert_eq!(Scenario::from_json_str(&json).unwrap(), scenario);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let error = Scenario::from_file("/nonexistent/scenario.json").unwrap_err();
        assert!(matches!(error, SimulationError::IoError(_)));
    }
}
