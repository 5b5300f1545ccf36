// src/simulation/config.rs

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ChainError, ChainResult};
use crate::integration::{DormandPrince, ForwardEuler, Integrator};
use crate::model::params::ParameterSet;
use crate::model::regime::{RegimeSchedule, HOURS_PER_DAY};
use crate::model::state::StateVector;
use crate::simulation::grid::TimeGrid;

/// Which solver advances the state between output times.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationMethod {
    DormandPrince(DormandPrince),
    Euler(ForwardEuler),
}

impl Default for IntegrationMethod {
    fn default() -> Self {
        IntegrationMethod::DormandPrince(DormandPrince::default())
    }
}

impl IntegrationMethod {
    pub fn build(&self) -> Box<dyn Integrator> {
        match *self {
            IntegrationMethod::DormandPrince(solver) => Box::new(solver),
            IntegrationMethod::Euler(solver) => Box::new(solver),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub grid: TimeGrid,
    /// Number of consecutive days to simulate on the default one-day grid.
    pub days: u32,
    pub initial_state: StateVector,
    pub method: IntegrationMethod,
    pub schedule: RegimeSchedule,
    pub demand_overlay: bool,
    /// Coefficients to run with when the caller does not pass its own set.
    pub parameters: ParameterSet,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid: TimeGrid::default(),
            days: 1,
            initial_state: StateVector::default(),
            method: IntegrationMethod::default(),
            schedule: RegimeSchedule::default(),
            demand_overlay: true,
            parameters: ParameterSet::default(),
        }
    }
}

impl SimulationConfig {
    /// Reads a JSON configuration. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ChainResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> ChainResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// The grid actually integrated over.
    ///
    /// `days` only stretches the grid when it spans exactly one day; an
    /// explicit multi-day grid is used as given.
    pub fn effective_grid(&self) -> TimeGrid {
        let spans_one_day = (self.grid.end - self.grid.start - HOURS_PER_DAY).abs() < 1e-12;
        if self.days > 1 && spans_one_day {
            TimeGrid {
                end: self.grid.start + f64::from(self.days) * HOURS_PER_DAY,
                ..self.grid
            }
        } else {
            self.grid
        }
    }

    pub fn validate(&self) -> ChainResult<()> {
        if self.days == 0 {
            return Err(ChainError::Config("days must be at least 1".to_string()));
        }
        self.effective_grid().validate()?;

        match self.method {
            IntegrationMethod::DormandPrince(dp) => {
                if !(dp.rtol > 0.0 && dp.atol > 0.0) {
                    return Err(ChainError::Config(format!(
                        "tolerances must be positive (rtol {}, atol {})",
                        dp.rtol, dp.atol
                    )));
                }
                if !(dp.initial_step > 0.0 && dp.min_step > 0.0) {
                    return Err(ChainError::Config(format!(
                        "step sizes must be positive (initial {}, min {})",
                        dp.initial_step, dp.min_step
                    )));
                }
                if dp.max_steps == 0 {
                    return Err(ChainError::Config("max_steps must be at least 1".to_string()));
                }
            }
            IntegrationMethod::Euler(euler) => {
                if euler.substeps == 0 {
                    return Err(ChainError::Config("euler substeps must be at least 1".to_string()));
                }
            }
        }

        let s = &self.schedule;
        if !(s.open_hour <= s.close_hour && s.peak_start <= s.peak_end) {
            return Err(ChainError::Config(format!(
                "regime windows out of order (open {}..{}, peak {}..{})",
                s.open_hour, s.close_hour, s.peak_start, s.peak_end
            )));
        }
        Ok(())
    }
}
