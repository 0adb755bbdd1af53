use serde::{Deserialize, Serialize};

use crate::constants::{
    CURVE_MAX_TIME, CURVE_SAMPLE_STEP, DEFAULT_MAX_TIME, MPS_TO_KMH, SECONDS_PER_MINUTE,
    STEADY_STATE_SAMPLE_STEP,
};
use crate::control::{bike::BikeConfig, rider::RiderConfig, terrain::TerrainConfig};
use crate::errors::SimulationError;
use crate::terrain_system::segmenter::compute_route_time;
use crate::trajectory_system::trajectory::simulate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BikeSummary {
    pub name: String,
    pub final_velocity: f64, // km/h, after a long flat run
    pub total_time: f64,     // s over the whole route
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub per_bike: [BikeSummary; 2],
    /// `(time_b - time_a) / 60`; positive when bike A is faster.
    pub time_difference_minutes: f64,
}

impl ComparisonResult {
    pub fn bike_a(&self) -> &BikeSummary {
        &self.per_bike[0]
    }

    pub fn bike_b(&self) -> &BikeSummary {
        &self.per_bike[1]
    }

    /// `None` on a tie.
    pub fn faster_bike(&self) -> Option<&BikeSummary> {
        if self.time_difference_minutes > 0.0 {
            Some(self.bike_a())
        } else if self.time_difference_minutes < 0.0 {
            Some(self.bike_b())
        } else {
            None
        }
    }
}

/// Both bikes accelerating from rest on flat ground, sampled together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub time: f64,           // s
    pub velocity_a_kmh: f64, // km/h
    pub velocity_b_kmh: f64, // km/h
    pub distance_a: f64,     // m
    pub distance_b: f64,     // m
}

/// Route time and steady-state speed of one bike.
pub fn evaluate_bike(
    rider: &RiderConfig,
    bike: &BikeConfig,
    terrain: &TerrainConfig,
) -> Result<BikeSummary, SimulationError> {
    let total_time = compute_route_time(rider, bike, terrain)?;
    let steady_state = simulate(rider, bike, 0.0, DEFAULT_MAX_TIME, STEADY_STATE_SAMPLE_STEP)?;
    let final_velocity = steady_state
        .last()
        .map_or(0.0, |point| point.velocity * MPS_TO_KMH);

    Ok(BikeSummary {
        name: bike.name.clone(),
        final_velocity,
        total_time,
    })
}

/// Rides the same route with both bikes, one thread per bike.
pub fn compare_bikes(
    rider: &RiderConfig,
    bike_a: &BikeConfig,
    bike_b: &BikeConfig,
    terrain: &TerrainConfig,
) -> Result<ComparisonResult, SimulationError> {
    let (summary_a, summary_b) = crossbeam::scope(|scope| {
        let worker = scope.spawn(|_| evaluate_bike(rider, bike_a, terrain));
        let summary_b = evaluate_bike(rider, bike_b, terrain);
        let summary_a = worker.join().map_err(|_| {
            SimulationError::SystemError(format!("evaluation of {} panicked", bike_a.name))
        })?;
        Ok::<_, SimulationError>((summary_a?, summary_b?))
    })
    .map_err(|_| SimulationError::SystemError("comparison worker panicked".to_string()))??;

    let time_difference_minutes =
        (summary_b.total_time - summary_a.total_time) / SECONDS_PER_MINUTE;
    log::info!(
        "{}: {:.1} s, {}: {:.1} s, difference {:+.2} min",
        summary_a.name,
        summary_a.total_time,
        summary_b.name,
        summary_b.total_time,
        time_difference_minutes
    );

    Ok(ComparisonResult {
        per_bike: [summary_a, summary_b],
        time_difference_minutes,
    })
}

/// Velocity and distance of both bikes on flat ground over `max_time`.
pub fn velocity_curves(
    rider: &RiderConfig,
    bike_a: &BikeConfig,
    bike_b: &BikeConfig,
    max_time: f64,
    sample_step: f64,
) -> Result<Vec<CurvePoint>, SimulationError> {
    let run_a = simulate(rider, bike_a, 0.0, max_time, sample_step)?;
    let run_b = simulate(rider, bike_b, 0.0, max_time, sample_step)?;

    Ok(run_a
        .iter()
        .zip(run_b.iter())
        .map(|(a, b)| CurvePoint {
            time: a.time,
            velocity_a_kmh: a.velocity * MPS_TO_KMH,
            velocity_b_kmh: b.velocity * MPS_TO_KMH,
            distance_a: a.distance,
            distance_b: b.distance,
        })
        .collect())
}

/// [`velocity_curves`] over the first five minutes at 5 s resolution.
pub fn default_velocity_curves(
    rider: &RiderConfig,
    bike_a: &BikeConfig,
    bike_b: &BikeConfig,
) -> Result<Vec<CurvePoint>, SimulationError> {
    velocity_curves(rider, bike_a, bike_b, CURVE_MAX_TIME, CURVE_SAMPLE_STEP)
}
