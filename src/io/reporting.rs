// src/io/reporting.rs

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::ChainResult;
use crate::simulation::engine::SimulationRun;
use crate::simulation::sweep::SweepResult;

/// Flat CSV row for one sweep member: coefficients then results.
#[derive(Debug, Clone, Serialize)]
struct SummaryRow {
    run: usize,
    alpha: f64,
    beta: f64,
    gamma: f64,
    delta: f64,
    epsilon: f64,
    rho: f64,
    sigma: f64,
    mu: f64,
    nu: f64,
    #[serde(rename = "T")]
    service_time: f64,
    final_production: f64,
    final_inventory: f64,
    final_demand: f64,
    final_backlog: f64,
    mean_wait_time: f64,
    max_queue_length: f64,
    degenerate: bool,
}

impl From<&SweepResult> for SummaryRow {
    fn from(r: &SweepResult) -> Self {
        let p = &r.parameters;
        let s = &r.summary;
        Self {
            run: r.run,
            alpha: p.alpha,
            beta: p.beta,
            gamma: p.gamma,
            delta: p.delta,
            epsilon: p.epsilon,
            rho: p.rho,
            sigma: p.sigma,
            mu: p.mu,
            nu: p.nu,
            service_time: p.service_time,
            final_production: s.final_production,
            final_inventory: s.final_inventory,
            final_demand: s.final_demand,
            final_backlog: s.final_backlog,
            mean_wait_time: s.mean_wait_time,
            max_queue_length: s.max_queue_length,
            degenerate: r.degenerate,
        }
    }
}

/// Writes one row per grid point of a run to a CSV file.
///
/// # Arguments
/// * `file_path` - Destination, e.g. `"results/day_1.csv"`.
/// * `run` - A completed simulation run.
pub fn write_trajectory_csv<P: AsRef<Path>>(file_path: P, run: &SimulationRun) -> ChainResult<()> {
    let path = file_path.as_ref();
    let mut wtr = csv::Writer::from_path(path)?;

    let history = run.history();
    for record in &history {
        wtr.serialize(record)?;
    }
    wtr.flush()?;

    info!(rows = history.len(), path = %path.display(), "trajectory exported");
    Ok(())
}

/// Writes one row per sweep member (coefficients and run summary).
pub fn write_summary_csv<P: AsRef<Path>>(file_path: P, results: &[SweepResult]) -> ChainResult<()> {
    let path = file_path.as_ref();
    let mut wtr = csv::Writer::from_path(path)?;

    for result in results {
        wtr.serialize(SummaryRow::from(result))?;
    }
    wtr.flush()?;

    info!(rows = results.len(), path = %path.display(), "run summaries exported");
    Ok(())
}
