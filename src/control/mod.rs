pub mod bike;
pub mod rider;
pub mod scenario;
pub mod terrain;
