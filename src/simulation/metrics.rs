// src/simulation/metrics.rs

use serde::Serialize;

use crate::model::params::ParameterSet;
use crate::model::regime::{Regime, RegimeSchedule};
use crate::model::state::StateVector;
use crate::simulation::trajectory::Trajectory;

/// Scalar results of one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    pub final_production: f64,
    pub final_inventory: f64,
    pub final_demand: f64,
    pub final_backlog: f64,
    pub mean_wait_time: f64,
    pub max_queue_length: f64,
}

impl RunSummary {
    pub fn is_finite(&self) -> bool {
        [
            self.final_production,
            self.final_inventory,
            self.final_demand,
            self.final_backlog,
            self.mean_wait_time,
            self.max_queue_length,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Wait-time and queue-length statistics over the grid points of one regime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegimeStats {
    pub regime: Regime,
    pub points: usize,
    pub mean_wait_time: f64,
    pub max_queue_length: f64,
}

/// Queueing metrics derived from a solved trajectory.
///
/// Uses the caller's baseline `nu` and `T`: these are reporting quantities,
/// not part of the dynamics, so regime overrides do not apply.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetrics {
    pub times: Vec<f64>,
    pub regimes: Vec<Regime>,
    pub queue_length: Vec<f64>,
    pub wait_time: Vec<f64>,
    pub summary: RunSummary,
}

impl DerivedMetrics {
    pub fn compute(
        trajectory: &Trajectory,
        baseline: &ParameterSet,
        schedule: &RegimeSchedule,
    ) -> Self {
        let queue_length: Vec<f64> = trajectory
            .backlog()
            .iter()
            .map(|o| o / baseline.nu)
            .collect();
        let wait_time: Vec<f64> = queue_length
            .iter()
            .map(|q| q * baseline.service_time)
            .collect();
        let regimes = trajectory
            .times()
            .iter()
            .map(|&t| schedule.regime_at(t))
            .collect();

        let last = trajectory
            .final_state()
            .copied()
            .unwrap_or(StateVector::new(f64::NAN, f64::NAN, f64::NAN, f64::NAN));
        let summary = RunSummary {
            final_production: last.production,
            final_inventory: last.inventory,
            final_demand: last.demand,
            final_backlog: last.backlog,
            mean_wait_time: mean(&wait_time),
            max_queue_length: max_propagating_nan(&queue_length),
        };

        Self {
            times: trajectory.times().to_vec(),
            regimes,
            queue_length,
            wait_time,
            summary,
        }
    }

    /// Statistics per regime, in `Closed, Normal, Peak` order. Regimes with
    /// no grid points are omitted.
    pub fn regime_breakdown(&self) -> Vec<RegimeStats> {
        Regime::ALL
            .iter()
            .filter_map(|&regime| {
                let idx: Vec<usize> = (0..self.regimes.len())
                    .filter(|&i| self.regimes[i] == regime)
                    .collect();
                if idx.is_empty() {
                    return None;
                }
                let waits: Vec<f64> = idx.iter().map(|&i| self.wait_time[i]).collect();
                let queues: Vec<f64> = idx.iter().map(|&i| self.queue_length[i]).collect();
                Some(RegimeStats {
                    regime,
                    points: idx.len(),
                    mean_wait_time: mean(&waits),
                    max_queue_length: max_propagating_nan(&queues),
                })
            })
            .collect()
    }
}

/// Arithmetic mean; NaN for an empty slice.
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Maximum that returns NaN as soon as any value is NaN, unlike `f64::max`.
fn max_propagating_nan(values: &[f64]) -> f64 {
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        if v.is_nan() {
            return f64::NAN;
        }
        if v > max {
            max = v;
        }
    }
    if values.is_empty() {
        f64::NAN
    } else {
        max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn trajectory(backlogs: &[f64]) -> Trajectory {
        let times: Vec<f64> = (0..backlogs.len()).map(|k| k as f64 * 6.0).collect();
        let states = backlogs
            .iter()
            .map(|&o| StateVector::new(1.0, 2.0, 3.0, o))
            .collect();
        Trajectory::new(times, states)
    }

    #[test]
    fn wait_time_uses_baseline_nu_and_t() {
        let params = ParameterSet::default();
        let traj = trajectory(&[0.0, 0.3, 0.6, 0.15]);
        let m = DerivedMetrics::compute(&traj, &params, &RegimeSchedule::default());
        for (i, s) in traj.states().iter().enumerate() {
            assert_eq!(m.queue_length[i], s.backlog / params.nu);
            assert_eq!(m.wait_time[i], (s.backlog / params.nu) * params.service_time);
        }
        assert_relative_eq!(m.summary.max_queue_length, 4.0, epsilon = 1e-12);
        assert_relative_eq!(
            m.summary.mean_wait_time,
            (0.0 + 1.0 + 2.0 + 0.5) / 4.0,
            epsilon = 1e-12
        );
        assert_eq!(m.summary.final_backlog, 0.15);
        assert_eq!(m.summary.final_demand, 3.0);
    }

    #[test]
    fn nan_poisons_summary() {
        let traj = trajectory(&[0.0, f64::NAN, 0.3]);
        let m = DerivedMetrics::compute(
            &traj,
            &ParameterSet::default(),
            &RegimeSchedule::default(),
        );
        assert!(m.summary.mean_wait_time.is_nan());
        assert!(m.summary.max_queue_length.is_nan());
        assert!(!m.summary.is_finite());
    }

    #[test]
    fn breakdown_groups_by_regime() {
        // Times 0, 6, 12, 18: closed, normal, peak, normal.
        let traj = trajectory(&[0.15, 0.3, 0.6, 0.45]);
        let m = DerivedMetrics::compute(
            &traj,
            &ParameterSet::default(),
            &RegimeSchedule::default(),
        );
        let stats = m.regime_breakdown();
        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].regime, Regime::Closed);
        assert_eq!(stats[1].regime, Regime::Normal);
        assert_eq!(stats[1].points, 2);
        assert_eq!(stats[2].regime, Regime::Peak);
        assert_relative_eq!(stats[2].max_queue_length, 4.0, epsilon = 1e-12);
        assert_relative_eq!(stats[1].mean_wait_time, (1.0 + 1.5) / 2.0, epsilon = 1e-12);
    }
}
