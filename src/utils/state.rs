use std::ops::{Add, Mul};

/// State vector of the one-dimensional equation of motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionState {
    pub velocity: f64, // m/s
    pub distance: f64, // m
}

impl MotionState {
    pub fn new(velocity: f64, distance: f64) -> Self {
        MotionState { velocity, distance }
    }

    pub fn is_finite(&self) -> bool {
        self.velocity.is_finite() && self.distance.is_finite()
    }

    pub fn components(&self) -> [f64; 2] {
        [self.velocity, self.distance]
    }
}

impl Add for MotionState {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        MotionState::new(self.velocity + other.velocity, self.distance + other.distance)
    }
}

impl Mul<MotionState> for f64 {
    type Output = MotionState;

    fn mul(self, state: MotionState) -> MotionState {
        MotionState::new(self * state.velocity, self * state.distance)
    }
}
