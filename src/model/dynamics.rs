// src/model/dynamics.rs

use crate::model::params::ParameterSet;
use crate::model::regime::RegimeSchedule;
use crate::model::state::StateVector;

/// Rates of change of the chain at time `t`.
///
/// The coefficients are those of `params` after the regime override for `t`.
/// `P` and `D` are divisors and are not guarded: a zero or sign-crossing level
/// yields non-finite rates, which the integrator lets propagate.
///
/// Stateless, so it can be evaluated at any interior solver stage.
pub fn derivative(
    state: &StateVector,
    t: f64,
    params: &ParameterSet,
    schedule: &RegimeSchedule,
) -> StateVector {
    let k = schedule.effective(*params, t);
    rates(state, &k)
}

/// The raw flow equations for a fixed set of coefficients.
pub fn rates(state: &StateVector, k: &ParameterSet) -> StateVector {
    let StateVector {
        production: p,
        inventory: i,
        demand: d,
        backlog: o,
    } = *state;
    let congestion = 1.0 + k.service_time;

    StateVector {
        production: k.alpha * (d / p) / congestion - k.beta * p,
        inventory: k.gamma * p - k.delta * i - k.epsilon * o,
        demand: k.rho * (i / d) / congestion - k.sigma * d,
        backlog: k.mu * d - k.nu * o / congestion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn distinct() -> ParameterSet {
        ParameterSet {
            alpha: 0.5,
            beta: 0.1,
            gamma: 0.8,
            delta: 0.05,
            epsilon: 0.02,
            rho: 0.7,
            sigma: 0.03,
            mu: 0.01,
            nu: 0.15,
            service_time: 0.5,
        }
    }

    fn state() -> StateVector {
        StateVector::new(2.0, 20.0, 4.0, 3.0)
    }

    #[test]
    fn closed_regime_leaves_only_decay() {
        let params = distinct();
        let d = derivative(&state(), 3.0, &params, &RegimeSchedule::default());
        assert_eq!(d.production, -params.beta * 2.0);
        assert_eq!(d.inventory, -params.epsilon * 3.0);
        assert_eq!(d.demand, 0.0);
        assert_eq!(d.backlog, 0.0);
    }

    #[test]
    fn peak_regime_uses_scaled_mu() {
        let params = distinct();
        let s = state();
        let d = derivative(&s, 12.0, &params, &RegimeSchedule::default());
        let mu = params.mu * 2.0;
        let t = params.service_time * 1.5;
        assert_relative_eq!(d.backlog, mu * s.demand - params.nu * s.backlog / (1.0 + t));
        let baseline_rate =
            params.mu * s.demand - params.nu * s.backlog / (1.0 + params.service_time);
        assert!(d.backlog != baseline_rate);
    }

    #[test]
    fn normal_regime_matches_raw_equations() {
        let params = distinct();
        let s = state();
        let d = derivative(&s, 16.0, &params, &RegimeSchedule::default());
        assert_eq!(d, rates(&s, &params));
        assert_relative_eq!(d.production, 0.5 * (4.0 / 2.0) / 1.5 - 0.1 * 2.0);
        assert_relative_eq!(d.inventory, 0.8 * 2.0 - 0.05 * 20.0 - 0.02 * 3.0);
        assert_relative_eq!(d.demand, 0.7 * (20.0 / 4.0) / 1.5 - 0.03 * 4.0);
        assert_relative_eq!(d.backlog, 0.01 * 4.0 - 0.15 * 3.0 / 1.5);
    }

    #[test]
    fn caller_parameters_are_untouched() {
        let params = distinct();
        let before = params;
        for t in [1.0, 7.0, 11.0, 12.5, 21.0] {
            derivative(&state(), t, &params, &RegimeSchedule::default());
        }
        assert_eq!(params, before);
    }

    #[test]
    fn zero_production_is_not_finite() {
        let s = StateVector::new(0.0, 20.0, 1.0, 0.0);
        let closed = derivative(&s, 0.0, &distinct(), &RegimeSchedule::default());
        assert!(!closed.production.is_finite());
        let open = derivative(&s, 8.0, &distinct(), &RegimeSchedule::default());
        assert!(!open.production.is_finite());
    }

    #[test]
    fn zero_demand_is_not_finite_while_open() {
        let s = StateVector::new(1.0, 20.0, 0.0, 0.0);
        let d = derivative(&s, 8.0, &distinct(), &RegimeSchedule::default());
        assert!(!d.demand.is_finite());
    }
}
