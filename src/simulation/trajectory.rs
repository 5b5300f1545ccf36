// src/simulation/trajectory.rs

use crate::model::state::StateVector;

/// Solved states, one per output time, in time order.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    times: Vec<f64>,
    states: Vec<StateVector>,
}

impl Trajectory {
    /// Pairs output times with states. Both must have the same length.
    pub(crate) fn new(times: Vec<f64>, states: Vec<StateVector>) -> Self {
        debug_assert_eq!(times.len(), states.len());
        Self { times, states }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn states(&self) -> &[StateVector] {
        &self.states
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &StateVector)> + '_ {
        self.times.iter().copied().zip(self.states.iter())
    }

    pub fn final_state(&self) -> Option<&StateVector> {
        self.states.last()
    }

    /// Index of the first grid point carrying a NaN or infinite component.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.states.iter().position(|s| !s.is_finite())
    }

    pub fn is_finite(&self) -> bool {
        self.first_non_finite().is_none()
    }

    pub fn production(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.production).collect()
    }

    pub fn inventory(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.inventory).collect()
    }

    pub fn demand(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.demand).collect()
    }

    pub fn backlog(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.backlog).collect()
    }

    /// Mutable access for post-processing passes inside the crate.
    pub(crate) fn states_mut(&mut self) -> &mut [StateVector] {
        &mut self.states
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_follow_state_components() {
        let traj = Trajectory::new(
            vec![0.0, 0.25, 0.5],
            vec![
                StateVector::new(1.0, 20.0, 1.0, 0.0),
                StateVector::new(1.5, 19.0, 2.0, 0.1),
                StateVector::new(2.0, 18.0, 3.0, 0.2),
            ],
        );
        assert_eq!(traj.production(), vec![1.0, 1.5, 2.0]);
        assert_eq!(traj.inventory(), vec![20.0, 19.0, 18.0]);
        assert_eq!(traj.demand(), vec![1.0, 2.0, 3.0]);
        assert_eq!(traj.backlog(), vec![0.0, 0.1, 0.2]);
        for series in [traj.production(), traj.inventory(), traj.demand(), traj.backlog()] {
            assert_eq!(series.len(), traj.times().len());
        }
    }

    #[test]
    fn first_non_finite_points_at_the_bad_row() {
        let traj = Trajectory::new(
            vec![0.0, 1.0, 2.0],
            vec![
                StateVector::default(),
                StateVector::new(1.0, f64::NAN, 1.0, 0.0),
                StateVector::new(f64::INFINITY, 1.0, 1.0, 0.0),
            ],
        );
        assert_eq!(traj.first_non_finite(), Some(1));
        assert!(!traj.is_finite());
        assert!(traj.production()[2].is_infinite());
    }
}
