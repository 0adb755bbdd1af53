// Physical Constants
pub const GRAVITY: f64 = 9.81; // m/s²
pub const AIR_DENSITY: f64 = 1.2041; // kg/m³ (20 °C, sea level)

// Motion Model
pub const VELOCITY_FLOOR: f64 = 0.001; // m/s, also the initial velocity of every run

// Integrator Tolerances
pub const ABSOLUTE_TOLERANCE: f64 = 1e-8;
pub const RELATIVE_TOLERANCE: f64 = 1e-6;
pub const MAX_SOLVER_STEPS: usize = 2_000_000;
pub const MAX_SAMPLES: usize = 1_000_000;
pub const MIN_STEP_SIZE: f64 = 1e-14; // s, relative to max(1, |t|)

// Simulation Parameters
pub const DEFAULT_MAX_TIME: f64 = 600.0; // s
pub const DEFAULT_SAMPLE_STEP: f64 = 0.1; // s
pub const STEADY_STATE_SAMPLE_STEP: f64 = 1.0; // s
pub const CURVE_MAX_TIME: f64 = 300.0; // s
pub const CURVE_SAMPLE_STEP: f64 = 5.0; // s

// Unit Conversions
pub const MPS_TO_KMH: f64 = 3.6;
pub const METERS_PER_KILOMETER: f64 = 1_000.0;
pub const SECONDS_PER_MINUTE: f64 = 60.0;
