// src/integration/dormand_prince.rs

use nalgebra::Vector4;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::integration::traits::{Integrator, Rhs};
use crate::model::state::StateVector;
use crate::simulation::trajectory::Trajectory;

type Vec4 = Vector4<f64>;

// Butcher tableau of the 5(4) pair.
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

// Fifth-order weights (also the last row of A).
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// Difference between the fifth- and fourth-order weights.
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

/// Dormand-Prince 5(4) adaptive Runge-Kutta integrator.
///
/// Internal steps are chosen by an embedded error estimate and clipped so that
/// every output time is hit exactly. Regime switches in the model coincide
/// with output times on the default grid, so discontinuities fall on step
/// boundaries there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DormandPrince {
    pub rtol: f64,
    pub atol: f64,
    pub initial_step: f64,
    /// Steps at or below this size are accepted even when the error test fails.
    pub min_step: f64,
    /// Attempts allowed per output interval before the rest of the interval
    /// is taken in one step.
    pub max_steps: usize,
}

impl Default for DormandPrince {
    fn default() -> Self {
        Self {
            rtol: 1.49012e-8,
            atol: 1.49012e-8,
            initial_step: 0.01,
            min_step: 1e-10,
            max_steps: 10_000,
        }
    }
}

/// Outcome of one trial step.
struct Trial {
    y: Vec4,
    error: f64,
}

impl DormandPrince {
    fn trial<F>(&self, f: &F, t: f64, y: &Vec4, h: f64) -> Trial
    where
        F: Fn(&Vec4, f64) -> Vec4,
    {
        let k1 = f(y, t);
        let k2 = f(&(y + k1 * (h * A21)), t + C2 * h);
        let k3 = f(&(y + (k1 * A31 + k2 * A32) * h), t + C3 * h);
        let k4 = f(&(y + (k1 * A41 + k2 * A42 + k3 * A43) * h), t + C4 * h);
        let k5 = f(&(y + (k1 * A51 + k2 * A52 + k3 * A53 + k4 * A54) * h), t + C5 * h);
        let k6 = f(
            &(y + (k1 * A61 + k2 * A62 + k3 * A63 + k4 * A64 + k5 * A65) * h),
            t + h,
        );
        let y_new = y + (k1 * B1 + k3 * B3 + k4 * B4 + k5 * B5 + k6 * B6) * h;
        let k7 = f(&y_new, t + h);

        let err = (k1 * E1 + k3 * E3 + k4 * E4 + k5 * E5 + k6 * E6 + k7 * E7) * h;

        // Max norm scaled by the mixed tolerance. NaN anywhere makes the
        // whole estimate NaN.
        let mut error = 0.0_f64;
        for i in 0..4 {
            let scale = self.atol + self.rtol * y[i].abs().max(y_new[i].abs());
            let e = (err[i] / scale).abs();
            if e.is_nan() {
                error = f64::NAN;
                break;
            }
            error = error.max(e);
        }

        Trial { y: y_new, error }
    }

    fn step_factor(error: f64) -> f64 {
        if error == 0.0 {
            return MAX_FACTOR;
        }
        (SAFETY * error.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
    }
}

impl Integrator for DormandPrince {
    fn integrate(&self, rhs: &Rhs<'_>, initial: StateVector, times: &[f64]) -> Trajectory {
        let f = |y: &Vec4, t: f64| rhs(&StateVector::from_vector(y), t).to_vector();

        let mut states = Vec::with_capacity(times.len());
        let Some(&t0) = times.first() else {
            return Trajectory::new(Vec::new(), states);
        };
        states.push(initial);

        let mut y = initial.to_vector();
        let mut t = t0;
        let mut h = self.initial_step.max(self.min_step);
        let mut accepted = 0usize;
        let mut rejected = 0usize;

        for &target in &times[1..] {
            let mut attempts = 0usize;
            while t < target {
                let remaining = target - t;

                // Degenerate state: no error control is possible, so cover
                // the interval in one step and let the values propagate.
                if !y.iter().all(|v| v.is_finite()) {
                    y = self.trial(&f, t, &y, remaining).y;
                    t = target;
                    break;
                }

                attempts += 1;
                let forced = attempts > self.max_steps;
                let clipped = forced || h >= remaining;
                let h_try = if clipped { remaining } else { h };
                let trial = self.trial(&f, t, &y, h_try);

                if trial.error.is_nan() || !trial.y.iter().all(|v| v.is_finite()) {
                    debug!(t, h = h_try, "state left the finite range, propagating");
                    y = trial.y;
                    t = if clipped { target } else { t + h_try };
                    accepted += 1;
                    continue;
                }

                let factor = Self::step_factor(trial.error);
                if trial.error <= 1.0 || h_try <= self.min_step || forced {
                    if trial.error > 1.0 {
                        warn!(
                            t,
                            h = h_try,
                            error = trial.error,
                            "accepting step above tolerance"
                        );
                    }
                    y = trial.y;
                    t = if clipped { target } else { t + h_try };
                    accepted += 1;
                    h = if clipped { h.max(h_try * factor) } else { h_try * factor };
                } else {
                    rejected += 1;
                    h = h_try * factor;
                }
                h = h.max(self.min_step);
            }
            states.push(StateVector::from_vector(&y));
        }

        debug!(accepted, rejected, "dormand-prince integration finished");
        Trajectory::new(times.to_vec(), states)
    }

    fn name(&self) -> &'static str {
        "dormand-prince"
    }
}
