//! Route time for stop-and-go riding.
//!
//! The route is split into flat, climbing and descending shares. Each share
//! is ridden as `distance / stop_spacing` identical segments that all start
//! from rest, so one integration per terrain class gives the time of every
//! segment in that class.

use serde::Serialize;

use crate::constants::{DEFAULT_MAX_TIME, DEFAULT_SAMPLE_STEP};
use crate::control::{bike::BikeConfig, rider::RiderConfig, terrain::TerrainConfig};
use crate::errors::SimulationError;
use crate::trajectory_system::trajectory::{find_time_at_distance, simulate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TerrainClass {
    Flat,
    Climb,
    Descent,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassContribution {
    pub class: TerrainClass,
    pub grade_angle: f64,   // rad
    pub distance: f64,      // m
    pub segment_count: f64, // fractional
    pub segment_time: f64,  // s, one stop-to-stop segment
    pub total_time: f64,    // s
    /// False when the stop spacing lies beyond the simulated horizon and
    /// `segment_time` is an underestimate.
    pub reached: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteBreakdown {
    pub contributions: Vec<ClassContribution>,
    pub total_time: f64, // s
}

impl RouteBreakdown {
    pub fn contribution(&self, class: TerrainClass) -> Option<&ClassContribution> {
        self.contributions.iter().find(|c| c.class == class)
    }
}

/// Total time in seconds to ride `terrain` on `bike`.
pub fn compute_route_time(
    rider: &RiderConfig,
    bike: &BikeConfig,
    terrain: &TerrainConfig,
) -> Result<f64, SimulationError> {
    Ok(route_breakdown(rider, bike, terrain)?.total_time)
}

pub fn route_breakdown(
    rider: &RiderConfig,
    bike: &BikeConfig,
    terrain: &TerrainConfig,
) -> Result<RouteBreakdown, SimulationError> {
    route_breakdown_with(rider, bike, terrain, DEFAULT_MAX_TIME, DEFAULT_SAMPLE_STEP)
}

/// [`route_breakdown`] with an explicit simulation horizon and sample step.
pub fn route_breakdown_with(
    rider: &RiderConfig,
    bike: &BikeConfig,
    terrain: &TerrainConfig,
    max_time: f64,
    sample_step: f64,
) -> Result<RouteBreakdown, SimulationError> {
    rider.validate()?;
    bike.validate()?;
    terrain.validate()?;

    if terrain.is_degenerate() {
        log::debug!(
            "Climb and descent fractions sum to {:.3}; flat share clamped to zero",
            terrain.climb_fraction + terrain.descent_fraction
        );
    }

    let distances = terrain.class_distances();
    let classes = [
        (TerrainClass::Flat, distances.flat),
        (TerrainClass::Climb, distances.climb),
        (TerrainClass::Descent, distances.descent),
    ];

    let mut contributions = Vec::with_capacity(classes.len());
    for (class, distance) in classes {
        if distance <= 0.0 {
            continue;
        }
        let grade_angle = match class {
            TerrainClass::Flat => 0.0,
            TerrainClass::Climb => (terrain.total_elevation_gain / distance).atan(),
            TerrainClass::Descent => (-terrain.total_elevation_gain / distance).atan(),
        };
        contributions.push(class_contribution(
            rider,
            bike,
            terrain.stop_spacing,
            class,
            grade_angle,
            distance,
            max_time,
            sample_step,
        )?);
    }

    let total_time = contributions.iter().map(|c| c.total_time).sum();
    Ok(RouteBreakdown {
        contributions,
        total_time,
    })
}

#[allow(clippy::too_many_arguments)]
fn class_contribution(
    rider: &RiderConfig,
    bike: &BikeConfig,
    stop_spacing: f64,
    class: TerrainClass,
    grade_angle: f64,
    distance: f64,
    max_time: f64,
    sample_step: f64,
) -> Result<ClassContribution, SimulationError> {
    let points = simulate(rider, bike, grade_angle, max_time, sample_step)?;
    let (segment_time, reached) = match find_time_at_distance(&points, stop_spacing) {
        Some(time) => (time, true),
        None => {
            let last_time = points.last().map_or(0.0, |point| point.time);
            log::warn!(
                "{}: {:?} segment of {:.0} m not completed within {:.0} s; time underestimated",
                bike.name,
                class,
                stop_spacing,
                last_time
            );
            (last_time, false)
        }
    };

    let segment_count = distance / stop_spacing;
    let total_time = segment_count * segment_time;
    log::debug!(
        "{}: {:?} at {:.4} rad, {:.2} segments of {:.2} s = {:.1} s",
        bike.name,
        class,
        grade_angle,
        segment_count,
        segment_time,
        total_time
    );

    Ok(ClassContribution {
        class,
        grade_angle,
        distance,
        segment_count,
        segment_time,
        total_time,
        reached,
    })
}
