// src/integration/euler.rs

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::integration::traits::{Integrator, Rhs};
use crate::model::state::StateVector;
use crate::simulation::trajectory::Trajectory;

/// Fixed-step explicit Euler: `y += h * f(y, t)`.
///
/// Each output interval is split into `substeps` equal steps. With one
/// substep this is the plain loop over the output grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwardEuler {
    pub substeps: usize,
}

impl Default for ForwardEuler {
    fn default() -> Self {
        Self { substeps: 1 }
    }
}

impl ForwardEuler {
    pub fn new(substeps: usize) -> Self {
        Self { substeps }
    }
}

impl Integrator for ForwardEuler {
    fn integrate(&self, rhs: &Rhs<'_>, initial: StateVector, times: &[f64]) -> Trajectory {
        let mut states = Vec::with_capacity(times.len());
        if times.is_empty() {
            return Trajectory::new(Vec::new(), states);
        }
        states.push(initial);

        let substeps = self.substeps.max(1);
        let mut y = initial.to_vector();
        for window in times.windows(2) {
            let (t0, t1) = (window[0], window[1]);
            let h = (t1 - t0) / substeps as f64;
            for k in 0..substeps {
                let t = t0 + k as f64 * h;
                let slope = rhs(&StateVector::from_vector(&y), t).to_vector();
                y += slope * h;
            }
            states.push(StateVector::from_vector(&y));
        }

        debug!(steps = (times.len() - 1) * substeps, "euler integration finished");
        Trajectory::new(times.to_vec(), states)
    }

    fn name(&self) -> &'static str {
        "euler"
    }
}
