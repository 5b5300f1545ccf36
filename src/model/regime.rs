// src/model/regime.rs

use serde::{Deserialize, Serialize};

use crate::model::params::ParameterSet;

pub const HOURS_PER_DAY: f64 = 24.0;

/// Wraps an absolute simulation time onto the hour of its day, in `[0, 24)`.
pub fn time_of_day(t: f64) -> f64 {
    t.rem_euclid(HOURS_PER_DAY)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// Facility shut: production, conversion and backlog flows stop.
    Closed,
    /// Regular operating hours.
    Normal,
    /// Midday surge in order generation and service congestion.
    Peak,
}

impl Regime {
    pub const ALL: [Regime; 3] = [Regime::Closed, Regime::Normal, Regime::Peak];

    pub fn as_str(&self) -> &'static str {
        match self {
            Regime::Closed => "closed",
            Regime::Normal => "normal",
            Regime::Peak => "peak",
        }
    }
}

/// How `mu` and `T` are replaced inside the peak window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeakOverride {
    /// Multiply the baseline values.
    Scale { mu: f64, service_time: f64 },
    /// Replace the baseline values with fixed literals.
    Fixed { mu: f64, service_time: f64 },
}

impl Default for PeakOverride {
    fn default() -> Self {
        PeakOverride::Scale {
            mu: 2.0,
            service_time: 1.5,
        }
    }
}

/// The daily operating schedule that decides which coefficients are live.
///
/// * closed: `h < open_hour || h >= close_hour`
/// * peak: `peak_start < h < peak_end` (both ends open)
/// * normal: everything else
///
/// `h` is the time of day, so multi-day runs repeat the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeSchedule {
    pub open_hour: f64,
    pub close_hour: f64,
    pub peak_start: f64,
    pub peak_end: f64,
    /// Value forced onto the suspended coefficients while closed.
    pub closed_value: f64,
    pub peak: PeakOverride,
}

impl Default for RegimeSchedule {
    fn default() -> Self {
        Self {
            open_hour: 6.0,
            close_hour: 20.0,
            peak_start: 10.0,
            peak_end: 14.0,
            closed_value: 0.0,
            peak: PeakOverride::default(),
        }
    }
}

impl RegimeSchedule {
    pub fn regime_at(&self, t: f64) -> Regime {
        let hour = time_of_day(t);
        if hour < self.open_hour || hour >= self.close_hour {
            Regime::Closed
        } else if hour > self.peak_start && hour < self.peak_end {
            Regime::Peak
        } else {
            Regime::Normal
        }
    }

    /// Returns the coefficients in force at time `t`.
    ///
    /// `baseline` is taken by value; the override is applied to that local
    /// copy only.
    pub fn effective(&self, baseline: ParameterSet, t: f64) -> ParameterSet {
        let mut params = baseline;
        match self.regime_at(t) {
            Regime::Closed => {
                // beta, epsilon and T stay at their configured values.
                let off = self.closed_value;
                params.alpha = off;
                params.gamma = off;
                params.delta = off;
                params.rho = off;
                params.sigma = off;
                params.mu = off;
                params.nu = off;
            }
            Regime::Peak => match self.peak {
                PeakOverride::Scale { mu, service_time } => {
                    params.mu *= mu;
                    params.service_time *= service_time;
                }
                PeakOverride::Fixed { mu, service_time } => {
                    params.mu = mu;
                    params.service_time = service_time;
                }
            },
            Regime::Normal => {}
        }
        params
    }
}
