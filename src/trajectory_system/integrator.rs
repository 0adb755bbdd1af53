//! Embedded Runge-Kutta integration with step-size control.
//!
//! The Dormand-Prince 5(4) pair advances the solution with the fifth-order
//! weights and uses the difference to the embedded fourth-order result as
//! the local error estimate. Steps are clipped so that every requested
//! sample time is hit exactly.

use crate::constants::{
    ABSOLUTE_TOLERANCE, MAX_SAMPLES, MAX_SOLVER_STEPS, MIN_STEP_SIZE, RELATIVE_TOLERANCE,
};
use crate::errors::SimulationError;
use crate::utils::state::MotionState;

// Dormand-Prince tableau.
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;
const A71: f64 = 35.0 / 384.0;
const A73: f64 = 500.0 / 1113.0;
const A74: f64 = 125.0 / 192.0;
const A75: f64 = -2187.0 / 6784.0;
const A76: f64 = 11.0 / 84.0;

// Fifth-order minus fourth-order weights.
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

/// Right-hand side of `dy/dt = f(t, y)`.
pub trait OdeSystem {
    fn derivative(&self, t: f64, state: &MotionState) -> MotionState;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub absolute: f64,
    pub relative: f64,
}

impl Tolerances {
    pub fn new(absolute: f64, relative: f64) -> Self {
        Tolerances { absolute, relative }
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Tolerances::new(ABSOLUTE_TOLERANCE, RELATIVE_TOLERANCE)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegrationStats {
    pub accepted_steps: usize,
    pub rejected_steps: usize,
    pub derivative_evaluations: usize,
}

#[derive(Debug)]
pub struct DormandPrince {
    tolerances: Tolerances,
    max_steps: usize,
    stats: IntegrationStats,
}

struct StepResult {
    state: MotionState,
    error: f64,
    derivative_at_end: MotionState,
}

impl DormandPrince {
    pub fn new(tolerances: Tolerances) -> Self {
        DormandPrince {
            tolerances,
            max_steps: MAX_SOLVER_STEPS,
            stats: IntegrationStats::default(),
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn stats(&self) -> IntegrationStats {
        self.stats
    }

    /// Integrates from `t0` to `t_end` and returns the state at
    /// `t0, t0 + sample_step, ...`, up to and including `t_end` when it lies
    /// on the sample grid.
    pub fn integrate<S: OdeSystem>(
        &mut self,
        system: &S,
        t0: f64,
        y0: MotionState,
        t_end: f64,
        sample_step: f64,
    ) -> Result<Vec<(f64, MotionState)>, SimulationError> {
        if !(sample_step.is_finite() && sample_step > 0.0) {
            return Err(SimulationError::IntegrationError(format!(
                "sample step must be positive, got {}",
                sample_step
            )));
        }
        if !(t_end.is_finite() && t_end >= t0) {
            return Err(SimulationError::IntegrationError(format!(
                "end time {} lies before start time {}",
                t_end, t0
            )));
        }

        self.stats = IntegrationStats::default();
        // Tolerance keeps t_end on the grid despite rounding in the division.
        let sample_span = ((t_end - t0) / sample_step + 1e-9).floor();
        if !(sample_span.is_finite() && sample_span < MAX_SAMPLES as f64) {
            return Err(SimulationError::IntegrationError(format!(
                "{} s sampled every {:e} s exceeds the limit of {} samples",
                t_end - t0,
                sample_step,
                MAX_SAMPLES
            )));
        }
        let sample_count = sample_span as usize;
        let mut samples = Vec::with_capacity(sample_count + 1);
        samples.push((t0, y0));

        let mut t = t0;
        let mut y = y0;
        let mut k1 = self.evaluate(system, t, &y);
        let mut h = self.initial_step(&y, &k1, t_end - t0);

        for index in 1..=sample_count {
            let target = t0 + index as f64 * sample_step;
            while t < target {
                let remaining = target - t;
                if remaining <= MIN_STEP_SIZE * t.abs().max(1.0) {
                    // Rounding residue from the previous step.
                    t = target;
                    break;
                }
                let clipped = h >= remaining;
                let h_try = if clipped { remaining } else { h };

                if h_try < MIN_STEP_SIZE * t.abs().max(1.0) {
                    return Err(SimulationError::IntegrationError(format!(
                        "step size underflow ({:e} s) at t = {:.6} s",
                        h_try, t
                    )));
                }
                if self.stats.accepted_steps + self.stats.rejected_steps >= self.max_steps {
                    return Err(SimulationError::IntegrationError(format!(
                        "no convergence within {} steps (reached t = {:.6} s)",
                        self.max_steps, t
                    )));
                }

                let step = self.step(system, t, &y, &k1, h_try);
                let factor = if step.error == 0.0 {
                    MAX_FACTOR
                } else if step.error.is_finite() {
                    (SAFETY * step.error.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
                } else {
                    MIN_FACTOR
                };

                if step.error <= 1.0 && step.state.is_finite() {
                    self.stats.accepted_steps += 1;
                    t = if clipped { target } else { t + h_try };
                    y = step.state;
                    k1 = step.derivative_at_end;
                    let h_next = h_try * factor;
                    h = if clipped { h_next.max(h) } else { h_next };
                } else {
                    self.stats.rejected_steps += 1;
                    h = h_try * factor.min(1.0);
                }
            }
            samples.push((target, y));
        }

        Ok(samples)
    }

    fn evaluate<S: OdeSystem>(&mut self, system: &S, t: f64, y: &MotionState) -> MotionState {
        self.stats.derivative_evaluations += 1;
        system.derivative(t, y)
    }

    fn step<S: OdeSystem>(
        &mut self,
        system: &S,
        t: f64,
        y: &MotionState,
        k1: &MotionState,
        h: f64,
    ) -> StepResult {
        let k1 = *k1;
        let k2 = self.evaluate(system, t + C2 * h, &(*y + h * (A21 * k1)));
        let k3 = self.evaluate(system, t + C3 * h, &(*y + h * (A31 * k1 + A32 * k2)));
        let k4 = self.evaluate(
            system,
            t + C4 * h,
            &(*y + h * (A41 * k1 + A42 * k2 + A43 * k3)),
        );
        let k5 = self.evaluate(
            system,
            t + C5 * h,
            &(*y + h * (A51 * k1 + A52 * k2 + A53 * k3 + A54 * k4)),
        );
        let k6 = self.evaluate(
            system,
            t + h,
            &(*y + h * (A61 * k1 + A62 * k2 + A63 * k3 + A64 * k4 + A65 * k5)),
        );

        let state = *y + h * (A71 * k1 + A73 * k3 + A74 * k4 + A75 * k5 + A76 * k6);
        let k7 = self.evaluate(system, t + h, &state);

        let error_estimate = h * (E1 * k1 + E3 * k3 + E4 * k4 + E5 * k5 + E6 * k6 + E7 * k7);
        let error = self.error_norm(&error_estimate, y, &state);

        StepResult {
            state,
            error,
            derivative_at_end: k7,
        }
    }

    /// RMS of the error components, each scaled by `atol + rtol * |y|`.
    fn error_norm(&self, error: &MotionState, before: &MotionState, after: &MotionState) -> f64 {
        let error = error.components();
        let before = before.components();
        let after = after.components();

        let sum: f64 = (0..error.len())
            .map(|i| {
                let scale = self.tolerances.absolute
                    + self.tolerances.relative * before[i].abs().max(after[i].abs());
                (error[i] / scale).powi(2)
            })
            .sum();
        (sum / error.len() as f64).sqrt()
    }

    fn scaled_norm(&self, value: &MotionState, reference: &MotionState) -> f64 {
        let value = value.components();
        let reference = reference.components();
        let sum: f64 = (0..value.len())
            .map(|i| {
                let scale =
                    self.tolerances.absolute + self.tolerances.relative * reference[i].abs();
                (value[i] / scale).powi(2)
            })
            .sum();
        (sum / value.len() as f64).sqrt()
    }

    /// First guess from the size of the state relative to its derivative.
    fn initial_step(&self, y0: &MotionState, f0: &MotionState, span: f64) -> f64 {
        let d0 = self.scaled_norm(y0, y0);
        let d1 = self.scaled_norm(f0, y0);
        let h0 = if d0 < 1e-5 || d1 < 1e-5 || !d1.is_finite() {
            1e-6
        } else {
            0.01 * d0 / d1
        };
        if span > 0.0 {
            h0.min(span)
        } else {
            h0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// dv/dt = -v, dx/dt = v.
    struct Decay;

    impl OdeSystem for Decay {
        fn derivative(&self, _t: f64, state: &MotionState) -> MotionState {
            MotionState::new(-state.velocity, state.velocity)
        }
    }

    /// Constant acceleration of 2 m/s².
    struct ConstantPush;

    impl OdeSystem for ConstantPush {
        fn derivative(&self, _t: f64, state: &MotionState) -> MotionState {
            MotionState::new(2.0, state.velocity)
        }
    }

    struct Exploding;

    impl OdeSystem for Exploding {
        fn derivative(&self, _t: f64, _state: &MotionState) -> MotionState {
            MotionState::new(f64::NAN, f64::NAN)
        }
    }

    #[test]
    fn test_exponential_decay_matches_closed_form() {
        let mut solver = DormandPrince::new(Tolerances::default());
        let samples = solver
            .integrate(&Decay, 0.0, MotionState::new(1.0, 0.0), 5.0, 0.5)
            .unwrap();

        assert_eq!(samples.len(), 11);
        for (t, state) in samples {
            assert_relative_eq!(state.velocity, (-t).exp(), epsilon = 1e-5);
            assert_relative_eq!(state.distance, 1.0 - (-t).exp(), epsilon = 1e-5);
        }
    }

    #[test]
    fn test_polynomial_solution_is_exact() {
        let mut solver = DormandPrince::new(Tolerances::default());
        let samples = solver
            .integrate(&ConstantPush, 0.0, MotionState::new(0.0, 0.0), 10.0, 1.0)
            .unwrap();

        let (t, last) = samples[samples.len() - 1];
        assert_eq!(t, 10.0);
        assert_relative_eq!(last.velocity, 20.0, epsilon = 1e-9);
        assert_relative_eq!(last.distance, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_samples_sit_on_the_grid() {
        let mut solver = DormandPrince::new(Tolerances::default());
        let samples = solver
            .integrate(&Decay, 0.0, MotionState::new(1.0, 0.0), 600.0, 0.1)
            .unwrap();

        assert_eq!(samples.len(), 6001);
        for (index, (t, _)) in samples.iter().enumerate() {
            assert_relative_eq!(*t, index as f64 * 0.1, epsilon = 1e-9);
        }
        assert!(solver.stats().accepted_steps >= 6000);
    }

    #[test]
    fn test_zero_span_returns_initial_state() {
        let mut solver = DormandPrince::new(Tolerances::default());
        let y0 = MotionState::new(3.0, 1.0);
        let samples = solver.integrate(&Decay, 0.0, y0, 0.0, 0.1).unwrap();
        assert_eq!(samples, vec![(0.0, y0)]);
    }

    #[test]
    fn test_non_finite_derivative_is_an_error() {
        let mut solver = DormandPrince::new(Tolerances::default());
        let result = solver.integrate(&Exploding, 0.0, MotionState::new(1.0, 0.0), 1.0, 0.1);
        assert!(matches!(result, Err(SimulationError::IntegrationError(_))));
    }

    #[test]
    fn test_step_budget_is_enforced() {
        let mut solver = DormandPrince::new(Tolerances::default()).with_max_steps(10);
        let result = solver.integrate(&Decay, 0.0, MotionState::new(1.0, 0.0), 100.0, 0.1);
        assert!(matches!(result, Err(SimulationError::IntegrationError(_))));
    }

    #[test]
    fn test_sample_limit_is_enforced() {
        let mut solver = DormandPrince::new(Tolerances::default());
        let result = solver.integrate(&Decay, 0.0, MotionState::new(1.0, 0.0), 1.0, 1e-300);
        assert!(matches!(result, Err(SimulationError::IntegrationError(_))));
        assert_eq!(solver.stats().derivative_evaluations, 0);
    }

    #[test]
    fn test_evaluations_are_counted() {
        let mut solver = DormandPrince::new(Tolerances::default());
        solver
            .integrate(&Decay, 0.0, MotionState::new(1.0, 0.0), 1.0, 0.5)
            .unwrap();
        let stats = solver.stats();
        // One initial evaluation, then six per attempted step (FSAL).
        assert_eq!(
            stats.derivative_evaluations,
            1 + 6 * (stats.accepted_steps + stats.rejected_steps)
        );
    }

    #[test]
    fn test_invalid_sample_step_is_rejected() {
        let mut solver = DormandPrince::new(Tolerances::default());
        let result = solver.integrate(&Decay, 0.0, MotionState::new(1.0, 0.0), 1.0, 0.0);
        assert!(result.is_err());
    }
}
