pub mod comparison;
pub mod constants;
pub mod control;
pub mod errors;
pub mod telemetry_system;
pub mod terrain_system;
pub mod trajectory_system;
pub mod utils;

pub use constants::*;
pub use control::bike::BikeConfig;
pub use control::rider::RiderConfig;
pub use control::scenario::Scenario;
pub use control::terrain::TerrainConfig;
pub use errors::SimulationError;

// Re-export the simulation entry points
pub use comparison::comparator::{
    compare_bikes, default_velocity_curves, velocity_curves, BikeSummary, ComparisonResult,
    CurvePoint,
};
pub use terrain_system::segmenter::{
    compute_route_time, route_breakdown, RouteBreakdown, TerrainClass,
};
pub use trajectory_system::motion_model::{acceleration, MotionModel};
pub use trajectory_system::trajectory::{simulate, time_at_distance, SimulationPoint};

// Re-export commonly used items from telemetry_system
pub use telemetry_system::telemetry::Report;

// Re-export commonly used utilities
pub use utils::wheel::{WheelInertia, COMMON_WHEEL_SIZES};
