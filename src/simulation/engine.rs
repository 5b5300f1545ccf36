// src/simulation/engine.rs

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ChainResult;
use crate::model::dynamics::derivative;
use crate::model::params::ParameterSet;
use crate::model::regime::Regime;
use crate::model::state::StateVector;
use crate::simulation::config::SimulationConfig;
use crate::simulation::metrics::{DerivedMetrics, RunSummary};
use crate::simulation::overlay::apply_demand_overlay;
use crate::simulation::trajectory::Trajectory;

/// One output row of a run, ready for CSV export.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryRecord {
    pub time: f64,
    pub regime: Regime,
    pub production: f64,
    pub inventory: f64,
    pub demand: f64,
    pub backlog: f64,
    pub queue_length: f64,
    pub wait_time: f64,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct SimulationRun {
    /// Solved states with the demand overlay (if enabled) applied.
    pub trajectory: Trajectory,
    pub metrics: DerivedMetrics,
}

impl SimulationRun {
    pub fn summary(&self) -> &RunSummary {
        &self.metrics.summary
    }

    /// Whether any grid point carries a non-finite value.
    pub fn is_degenerate(&self) -> bool {
        !self.trajectory.is_finite()
    }

    pub fn history(&self) -> Vec<HistoryRecord> {
        self.trajectory
            .iter()
            .enumerate()
            .map(|(i, (time, s))| HistoryRecord {
                time,
                regime: self.metrics.regimes[i],
                production: s.production,
                inventory: s.inventory,
                demand: s.demand,
                backlog: s.backlog,
                queue_length: self.metrics.queue_length[i],
                wait_time: self.metrics.wait_time[i],
            })
            .collect()
    }
}

/// Runs the chain model: integrate, overlay demand, derive metrics.
///
/// Holds no state between runs; the same simulation can be run repeatedly
/// or shared across threads.
#[derive(Debug, Clone)]
pub struct ChainSimulation {
    config: SimulationConfig,
}

impl ChainSimulation {
    pub fn new(config: SimulationConfig) -> ChainResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Runs with the coefficients stored in the configuration.
    pub fn run(&self) -> SimulationRun {
        self.run_with(&self.config.parameters)
    }

    /// Runs with caller-supplied coefficients. `params` is read, never written.
    pub fn run_with(&self, params: &ParameterSet) -> SimulationRun {
        let trajectory = self.integrate(params);
        self.post_process(trajectory, params)
    }

    /// Solves the ODE over the configured grid without any post-processing.
    pub fn integrate(&self, params: &ParameterSet) -> Trajectory {
        let config = &self.config;
        let grid = config.effective_grid();
        let times = grid.points();
        let integrator = config.method.build();
        let params = *params;
        let schedule = config.schedule;

        debug!(
            points = times.len(),
            integrator = integrator.name(),
            "integrating chain model"
        );
        let rhs = move |state: &StateVector, t: f64| derivative(state, t, &params, &schedule);
        let trajectory = integrator.integrate(&rhs, config.initial_state, &times);

        if let Some(index) = trajectory.first_non_finite() {
            warn!(
                index,
                time = trajectory.times()[index],
                "trajectory became non-finite; a divisor level reached zero"
            );
        }
        trajectory
    }

    fn post_process(&self, mut trajectory: Trajectory, params: &ParameterSet) -> SimulationRun {
        if self.config.demand_overlay {
            apply_demand_overlay(&mut trajectory);
        }
        let metrics = DerivedMetrics::compute(&trajectory, params, &self.config.schedule);
        info!(
            final_backlog = metrics.summary.final_backlog,
            mean_wait_time = metrics.summary.mean_wait_time,
            max_queue_length = metrics.summary.max_queue_length,
            "run complete"
        );
        SimulationRun { trajectory, metrics }
    }
}
