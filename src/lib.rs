//! Production, inventory, demand and backlog of a four-stage chain, modelled
//! as a regime-switched ODE system over an operating day.
//!
//! The pipeline is parameters → regime-switched derivative → integrator →
//! demand overlay → queueing metrics. See [`ChainSimulation`] for the entry
//! point.

pub mod cli;
pub mod error;
pub mod integration;
pub mod io;
pub mod model;
pub mod simulation;

pub use error::{ChainError, ChainResult};
pub use model::dynamics::derivative;
pub use model::params::{ParameterSet, PARAMETER_TABLE};
pub use model::regime::{PeakOverride, Regime, RegimeSchedule};
pub use model::state::StateVector;
pub use simulation::config::{IntegrationMethod, SimulationConfig};
pub use simulation::engine::{ChainSimulation, SimulationRun};
pub use simulation::grid::TimeGrid;
pub use simulation::metrics::{DerivedMetrics, RunSummary};
pub use simulation::trajectory::Trajectory;
