pub mod integrator;
pub mod motion_model;
pub mod trajectory;
