use crate::constants::{AIR_DENSITY, GRAVITY, VELOCITY_FLOOR};
use crate::control::{bike::BikeConfig, rider::RiderConfig};

const TERMINAL_VELOCITY_TOLERANCE: f64 = 1e-12; // m/s
const MAX_BRACKET_DOUBLINGS: usize = 64;
const MAX_BISECTIONS: usize = 200;

/// Net acceleration along the road of a bicycle and rider pushed by constant
/// power. `velocity` is floored to [`VELOCITY_FLOOR`] before the power term is
/// evaluated, so the result stays finite at a standstill.
#[allow(clippy::too_many_arguments)]
pub fn acceleration(
    power: f64,
    velocity: f64,
    total_mass: f64,
    moment_of_inertia: f64,
    wheel_radius: f64,
    rolling_resistance_coeff: f64,
    drag_area: f64,
    grade_angle: f64,
) -> f64 {
    let velocity = velocity.max(VELOCITY_FLOOR);
    let effective_mass = effective_mass(total_mass, moment_of_inertia, wheel_radius);

    let propulsion = power / velocity;
    let rolling = rolling_resistance_force(total_mass, rolling_resistance_coeff, grade_angle);
    let drag = aerodynamic_drag_force(drag_area, velocity);
    let gravity = gravity_force_along_road(total_mass, grade_angle);

    (propulsion - rolling - drag - gravity) / effective_mass
}

/// Translational mass plus the wheels' rotational inertia reflected through
/// the wheel radius.
pub fn effective_mass(total_mass: f64, moment_of_inertia: f64, wheel_radius: f64) -> f64 {
    total_mass + moment_of_inertia / wheel_radius.powi(2)
}

pub fn rolling_resistance_force(
    total_mass: f64,
    rolling_resistance_coeff: f64,
    grade_angle: f64,
) -> f64 {
    let normal_force = total_mass * GRAVITY * grade_angle.cos();
    rolling_resistance_coeff * normal_force
}

pub fn aerodynamic_drag_force(drag_area: f64, velocity: f64) -> f64 {
    0.5 * drag_area * AIR_DENSITY * velocity.powi(2)
}

/// Positive uphill, negative downhill.
pub fn gravity_force_along_road(total_mass: f64, grade_angle: f64) -> f64 {
    total_mass * GRAVITY * grade_angle.sin()
}

/// The motion model with one rider, one bike and one grade bound in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionModel {
    pub power: f64,
    pub total_mass: f64,
    pub moment_of_inertia: f64,
    pub wheel_radius: f64,
    pub rolling_resistance_coeff: f64,
    pub drag_area: f64,
    pub grade_angle: f64,
}

impl MotionModel {
    pub fn new(rider: &RiderConfig, bike: &BikeConfig, grade_angle: f64) -> Self {
        MotionModel {
            power: rider.power,
            total_mass: rider.rider_mass + bike.bike_mass,
            moment_of_inertia: bike.moment_of_inertia,
            wheel_radius: bike.wheel_radius,
            rolling_resistance_coeff: bike.rolling_resistance_coeff,
            drag_area: bike.drag_area,
            grade_angle,
        }
    }

    pub fn acceleration(&self, velocity: f64) -> f64 {
        acceleration(
            self.power,
            velocity,
            self.total_mass,
            self.moment_of_inertia,
            self.wheel_radius,
            self.rolling_resistance_coeff,
            self.drag_area,
            self.grade_angle,
        )
    }

    pub fn effective_mass(&self) -> f64 {
        effective_mass(self.total_mass, self.moment_of_inertia, self.wheel_radius)
    }

    /// Velocity at which the acceleration vanishes.
    ///
    /// Acceleration falls monotonically with velocity, so the root is
    /// bracketed by doubling an upper bound and then bisected. Returns the
    /// velocity floor when even a crawl cannot be sustained.
    pub fn terminal_velocity(&self) -> f64 {
        let mut low = VELOCITY_FLOOR;
        if self.acceleration(low) <= 0.0 {
            return low;
        }

        let mut high = 1.0_f64.max(low * 2.0);
        for _ in 0..MAX_BRACKET_DOUBLINGS {
            if self.acceleration(high) < 0.0 {
                break;
            }
            low = high;
            high *= 2.0;
        }

        for _ in 0..MAX_BISECTIONS {
            if high - low <= TERMINAL_VELOCITY_TOLERANCE {
                break;
            }
            let mid = 0.5 * (low + high);
            if self.acceleration(mid) > 0.0 {
                low = mid;
            } else {
                high = mid;
            }
        }
        0.5 * (low + high)
    }
}
