pub mod state;
pub mod wheel;
