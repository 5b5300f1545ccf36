// src/simulation/overlay.rs

use std::f64::consts::PI;

use crate::model::regime::time_of_day;
use crate::simulation::trajectory::Trajectory;

/// Baseline demand curve with a six-hour sinusoidal swing.
pub fn normal_demand(t: f64) -> f64 {
    20.0 + 5.0 * (PI * time_of_day(t) / 6.0).sin()
}

/// Demand curve during rush windows.
pub fn peak_demand(t: f64) -> f64 {
    40.0 + 10.0 * (PI * time_of_day(t) / 6.0).sin()
}

/// Morning ramp `[6, 8)` and lunchtime rush `[10, 14)`, by time of day.
pub fn in_demand_peak(t: f64) -> bool {
    let hour = time_of_day(t);
    (6.0..8.0).contains(&hour) || (10.0..14.0).contains(&hour)
}

/// Amount added to the solved demand at time `t`.
///
/// Outside the rush windows this is `normal - normal`, which is exactly `0.0`
/// for every finite `t`.
pub fn demand_adjustment(t: f64) -> f64 {
    if in_demand_peak(t) {
        peak_demand(t) - normal_demand(t)
    } else {
        normal_demand(t) - normal_demand(t)
    }
}

/// Adds the rush-hour demand differential to the demand series, once.
///
/// Only `D` changes; production, inventory and backlog are left as solved.
pub fn apply_demand_overlay(trajectory: &mut Trajectory) {
    let times = trajectory.times().to_vec();
    for (state, t) in trajectory.states_mut().iter_mut().zip(times) {
        state.demand += demand_adjustment(t);
    }
}
