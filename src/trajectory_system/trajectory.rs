use serde::{Deserialize, Serialize};

use crate::constants::VELOCITY_FLOOR;
use crate::control::{bike::BikeConfig, rider::RiderConfig};
use crate::errors::{require_non_negative, require_positive, SimulationError};
use crate::utils::state::MotionState;

use super::integrator::{DormandPrince, OdeSystem, Tolerances};
use super::motion_model::MotionModel;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationPoint {
    pub time: f64,     // s
    pub velocity: f64, // m/s
    pub distance: f64, // m
}

impl SimulationPoint {
    pub fn new(time: f64, velocity: f64, distance: f64) -> Self {
        SimulationPoint {
            time,
            velocity,
            distance,
        }
    }
}

impl OdeSystem for MotionModel {
    /// At or below the velocity floor the rider cannot be pushed backwards:
    /// a net decelerating force holds the speed instead of reversing it.
    fn derivative(&self, _t: f64, state: &MotionState) -> MotionState {
        let acceleration = self.acceleration(state.velocity);
        if state.velocity <= VELOCITY_FLOOR && acceleration < 0.0 {
            MotionState::new(0.0, state.velocity.max(0.0))
        } else {
            MotionState::new(acceleration, state.velocity)
        }
    }
}

/// Accelerates the rider from (almost) rest on a constant grade and samples
/// time, velocity and distance every `sample_step` seconds up to `max_time`.
pub fn simulate(
    rider: &RiderConfig,
    bike: &BikeConfig,
    grade_angle: f64,
    max_time: f64,
    sample_step: f64,
) -> Result<Vec<SimulationPoint>, SimulationError> {
    rider.validate()?;
    bike.validate()?;
    validate_grade(grade_angle)?;
    require_non_negative("simulation.max_time", max_time)?;
    require_positive("simulation.sample_step", sample_step)?;

    let model = MotionModel::new(rider, bike, grade_angle);
    let mut solver = DormandPrince::new(Tolerances::default());
    let samples = solver.integrate(
        &model,
        0.0,
        MotionState::new(VELOCITY_FLOOR, 0.0),
        max_time,
        sample_step,
    )?;

    let stats = solver.stats();
    log::debug!(
        "Integrated {} at grade {:.4} rad: {} samples, {} steps accepted, {} rejected, {} evaluations",
        bike.name,
        grade_angle,
        samples.len(),
        stats.accepted_steps,
        stats.rejected_steps,
        stats.derivative_evaluations
    );

    Ok(samples
        .into_iter()
        .map(|(time, state)| SimulationPoint::new(time, state.velocity, state.distance))
        .collect())
}

fn validate_grade(grade_angle: f64) -> Result<(), SimulationError> {
    if grade_angle.is_finite() && grade_angle.abs() < std::f64::consts::FRAC_PI_2 {
        Ok(())
    } else {
        Err(SimulationError::InvalidConfiguration {
            field: "simulation.grade_angle",
            value: grade_angle,
            reason: "must lie strictly between -π/2 and π/2",
        })
    }
}

/// Time at which `target_distance` is first reached, interpolated linearly
/// between the bracketing samples. `None` if the samples never get there.
pub fn find_time_at_distance(points: &[SimulationPoint], target_distance: f64) -> Option<f64> {
    let first = points.first()?;
    if target_distance <= first.distance {
        return Some(first.time);
    }

    points.windows(2).find_map(|pair| {
        let (current, next) = (pair[0], pair[1]);
        if current.distance <= target_distance && next.distance >= target_distance {
            let span = next.distance - current.distance;
            if span <= 0.0 {
                return Some(current.time);
            }
            let ratio = (target_distance - current.distance) / span;
            Some(current.time + ratio * (next.time - current.time))
        } else {
            None
        }
    })
}

/// Like [`find_time_at_distance`], but falls back to the last sample's time
/// when the target lies beyond the simulated horizon (0 for no samples).
pub fn time_at_distance(points: &[SimulationPoint], target_distance: f64) -> f64 {
    find_time_at_distance(points, target_distance)
        .unwrap_or_else(|| points.last().map_or(0.0, |point| point.time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rider() -> RiderConfig {
        RiderConfig::new(250.0, 85.0)
    }

    fn straight_line() -> Vec<SimulationPoint> {
        (0..=10)
            .map(|i| SimulationPoint::new(i as f64, 5.0, 5.0 * i as f64))
            .collect()
    }

    #[test]
    fn test_interpolates_between_samples() {
        let points = straight_line();
        assert_relative_eq!(time_at_distance(&points, 12.5), 2.5, epsilon = 1e-12);
        assert_relative_eq!(time_at_distance(&points, 50.0), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_target_before_first_sample_returns_first_time() {
        let points = vec![
            SimulationPoint::new(1.0, 2.0, 3.0),
            SimulationPoint::new(2.0, 2.0, 5.0),
        ];
        assert_eq!(time_at_distance(&points, 3.0), 1.0);
        assert_eq!(time_at_distance(&points, 0.5), 1.0);
    }

    #[test]
    fn test_unreached_target_returns_last_time() {
        let points = straight_line();
        assert_eq!(time_at_distance(&points, 1_000.0), 10.0);
        assert_eq!(find_time_at_distance(&points, 1_000.0), None);
    }

    #[test]
    fn test_empty_samples() {
        assert_eq!(time_at_distance(&[], 10.0), 0.0);
        assert_eq!(find_time_at_distance(&[], 10.0), None);
    }

    #[test]
    fn test_flat_plateau_uses_first_bracketing_sample() {
        let points = vec![
            SimulationPoint::new(0.0, 0.0, 0.0),
            SimulationPoint::new(1.0, 0.0, 4.0),
            SimulationPoint::new(2.0, 0.0, 4.0),
            SimulationPoint::new(3.0, 0.0, 8.0),
        ];
        assert_eq!(time_at_distance(&points, 4.0), 1.0);
    }

    #[test]
    fn test_simulation_starts_at_the_velocity_floor() {
        let points = simulate(&rider(), &BikeConfig::preset_small_wheel(), 0.0, 10.0, 0.1).unwrap();
        assert_eq!(points.len(), 101);
        assert_eq!(points[0], SimulationPoint::new(0.0, VELOCITY_FLOOR, 0.0));
    }

    #[test]
    fn test_time_and_distance_are_monotonic() {
        let points = simulate(&rider(), &BikeConfig::preset_large_wheel(), 0.03, 120.0, 0.5).unwrap();
        for pair in points.windows(2) {
            assert_relative_eq!(pair[1].time - pair[0].time, 0.5, epsilon = 1e-9);
            assert!(pair[1].distance >= pair[0].distance);
            assert!(pair[1].velocity > 0.0);
        }
    }

    #[test]
    fn test_flat_run_settles_at_terminal_velocity() {
        let bike = BikeConfig::preset_small_wheel();
        let points = simulate(&rider(), &bike, 0.0, 600.0, 1.0).unwrap();
        let terminal = MotionModel::new(&rider(), &bike, 0.0).terminal_velocity();

        let last = points[points.len() - 1];
        assert_relative_eq!(last.velocity, terminal, max_relative = 1e-4);
        for pair in points.windows(2) {
            assert!(pair[1].velocity >= pair[0].velocity - 1e-6);
        }
        for point in &points {
            assert!(point.velocity <= terminal * (1.0 + 1e-5));
        }
    }

    #[test]
    fn test_weak_rider_on_steep_grade_holds_the_floor() {
        let points = simulate(
            &RiderConfig::new(0.1, 85.0),
            &BikeConfig::preset_small_wheel(),
            0.5,
            60.0,
            10.0,
        )
        .unwrap();

        assert_eq!(points.len(), 7);
        for point in &points {
            assert!(
                point.velocity >= 0.0 && point.distance >= 0.0,
                "Rider rolled backwards: {:?}",
                point
            );
            assert_relative_eq!(point.velocity, VELOCITY_FLOOR, epsilon = 1e-12);
        }
        for pair in points.windows(2) {
            assert!(pair[1].distance >= pair[0].distance);
        }
    }

    #[test]
    fn test_tiny_sample_step_is_an_error_not_a_panic() {
        let result = simulate(&rider(), &BikeConfig::preset_small_wheel(), 0.0, 1.0, 1e-300);
        assert!(matches!(result, Err(SimulationError::IntegrationError(_))));

        let result = simulate(&rider(), &BikeConfig::preset_small_wheel(), 0.0, 1e9, 0.1);
        assert!(matches!(result, Err(SimulationError::IntegrationError(_))));
    }

    #[test]
    fn test_zero_power_is_rejected() {
        let result = simulate(
            &RiderConfig::new(0.0, 85.0),
            &BikeConfig::preset_small_wheel(),
            0.0,
            10.0,
            0.1,
        );
        let error = result.unwrap_err();
        assert_eq!(error.field(), Some("rider.power"));
    }

    #[test]
    fn test_vertical_grade_is_rejected() {
        let result = simulate(
            &rider(),
            &BikeConfig::preset_small_wheel(),
            std::f64::consts::FRAC_PI_2,
            10.0,
            0.1,
        );
        assert_eq!(result.unwrap_err().field(), Some("simulation.grade_angle"));
    }

    #[test]
    fn test_zero_sample_step_is_rejected() {
        let result = simulate(&rider(), &BikeConfig::preset_small_wheel(), 0.0, 10.0, 0.0);
        assert_eq!(result.unwrap_err().field(), Some("simulation.sample_step"));
    }
}
