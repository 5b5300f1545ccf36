use anyhow::Context;
use tracing_subscriber::EnvFilter;

use daily_chain::cli::{Options, USAGE};
use daily_chain::io::reporting;
use daily_chain::simulation::sweep::{mean_over_finite, perturbed_parameter_sets, run_sweep};
use daily_chain::{ChainSimulation, PARAMETER_TABLE};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let opts = Options::parse_from(std::env::args().skip(1))?;
    if opts.help {
        println!("{USAGE}");
        return Ok(());
    }

    println!("=== Daily Production / Demand Chain Simulation ===");

    // 1. SETUP CONFIGURATION
    let config = opts.simulation_config()?;
    let grid = config.effective_grid();
    println!(
        "Grid: {} to {} h, step {} h ({} points)",
        grid.start,
        grid.end,
        grid.step,
        grid.len()
    );
    for spec in PARAMETER_TABLE.iter() {
        let value = config.parameters.get(spec.name)?;
        println!("  {:<8} = {:<10} {}", spec.name, value, spec.description);
    }

    // 2. RUN BASELINE
    let sim = ChainSimulation::new(config)?;
    let run = sim.run();
    if let Some(index) = run.trajectory.first_non_finite() {
        println!(
            "Warning: trajectory is non-finite from t = {} h on",
            run.trajectory.times()[index]
        );
    }

    // 3. EXPORT RESULTS
    if let Some(path) = &opts.out {
        reporting::write_trajectory_csv(path, &run)
            .with_context(|| format!("writing trajectory to {}", path.display()))?;
        println!("Trajectory written to {}", path.display());
    }

    // 4. PRINT SUMMARY
    let summary = run.summary();
    println!("\n=== Final State ===");
    println!("Production:        {:.2}", summary.final_production);
    println!("Inventory:         {:.2}", summary.final_inventory);
    println!("Demand:            {:.2}", summary.final_demand);
    println!("Backlog:           {:.2}", summary.final_backlog);
    println!("Mean wait time:    {:.2}", summary.mean_wait_time);
    println!("Max queue length:  {:.2}", summary.max_queue_length);

    println!("\n=== By Regime ===");
    for stats in run.metrics.regime_breakdown() {
        println!(
            "{:<7} {:>3} points, mean wait {:.2}, max queue {:.2}",
            stats.regime.as_str(),
            stats.points,
            stats.mean_wait_time,
            stats.max_queue_length
        );
    }

    // 5. OPTIONAL SWEEP
    if let Some(runs) = opts.sweep_runs {
        let base = &sim.config().parameters;
        let sets = perturbed_parameter_sets(base, runs, opts.spread, opts.seed)?;
        let results = run_sweep(&sim, &sets);
        let degenerate = results.iter().filter(|r| r.degenerate).count();

        println!("\n=== Sweep ({} runs, spread {}) ===", runs, opts.spread);
        println!("Degenerate runs: {}", degenerate);
        if let Some(wait) = mean_over_finite(&results, |s| s.mean_wait_time) {
            println!("Mean of mean wait time:   {:.2}", wait);
        }
        if let Some(queue) = mean_over_finite(&results, |s| s.max_queue_length) {
            println!("Mean of max queue length: {:.2}", queue);
        }

        if let Some(path) = &opts.summary {
            reporting::write_summary_csv(path, &results)
                .with_context(|| format!("writing sweep summary to {}", path.display()))?;
            println!("Sweep summary written to {}", path.display());
        }
    }

    println!("\nSimulation Complete.");
    Ok(())
}
