// src/integration/traits.rs

use std::fmt::Debug;

use crate::model::state::StateVector;
use crate::simulation::trajectory::Trajectory;

/// Right-hand side of the ODE: `(state, t) -> d(state)/dt`.
///
/// Must be stateless: solvers evaluate it at interior stage times, out of
/// grid order, and after rejected steps.
pub type Rhs<'a> = dyn Fn(&StateVector, f64) -> StateVector + 'a;

/// Advances an initial state across a list of output times.
///
/// We require `Send` + `Sync` so one integrator can serve a parallel sweep.
pub trait Integrator: Debug + Send + Sync {
    /// Solves the system and reports the state at every time in `times`.
    ///
    /// `times` must be strictly increasing; `initial` is the state at
    /// `times[0]`. The result always has `times.len()` entries. Non-finite
    /// states are carried forward rather than reported as an error.
    fn integrate(&self, rhs: &Rhs<'_>, initial: StateVector, times: &[f64]) -> Trajectory;

    /// Short name for logs and reports.
    fn name(&self) -> &'static str;
}
