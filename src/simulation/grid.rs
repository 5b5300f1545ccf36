// src/simulation/grid.rs

use serde::{Deserialize, Serialize};

use crate::error::{ChainError, ChainResult};

/// Output times of a run: `start, start + step, ...` strictly below `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeGrid {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl Default for TimeGrid {
    /// One day in 15-minute intervals: 96 points.
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 24.0,
            step: 0.25,
        }
    }
}

impl TimeGrid {
    /// Upper bound on the number of output points of a single run.
    pub const MAX_POINTS: usize = 1_000_000;

    pub fn new(start: f64, end: f64, step: f64) -> ChainResult<Self> {
        let grid = Self { start, end, step };
        grid.validate()?;
        Ok(grid)
    }

    pub fn validate(&self) -> ChainResult<()> {
        if !(self.start.is_finite() && self.end.is_finite() && self.step.is_finite()) {
            return Err(ChainError::Config(format!(
                "time grid bounds must be finite (start {}, end {}, step {})",
                self.start, self.end, self.step
            )));
        }
        if self.step <= 0.0 {
            return Err(ChainError::Config(format!(
                "time step must be positive, got {}",
                self.step
            )));
        }
        if self.end <= self.start {
            return Err(ChainError::Config(format!(
                "time grid is empty: end {} is not after start {}",
                self.end, self.start
            )));
        }
        let points = ((self.end - self.start) / self.step).ceil();
        if points > Self::MAX_POINTS as f64 {
            return Err(ChainError::Config(format!(
                "time grid has {} points, limit is {}",
                points,
                Self::MAX_POINTS
            )));
        }
        Ok(())
    }

    /// Number of output points, `ceil((end - start) / step)`.
    pub fn len(&self) -> usize {
        ((self.end - self.start) / self.step).ceil().max(0.0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Materializes the grid. Each point is computed as `start + k * step`
    /// so rounding does not accumulate over long horizons.
    pub fn points(&self) -> Vec<f64> {
        (0..self.len())
            .map(|k| self.start + k as f64 * self.step)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_day_has_96_points() {
        let grid = TimeGrid::default();
        let points = grid.points();
        assert_eq!(points.len(), 96);
        assert_eq!(points[0], 0.0);
        assert_eq!(points[95], 23.75);
        assert!(points.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn end_is_excluded_when_step_divides_span() {
        let grid = TimeGrid::new(0.0, 1.0, 0.5).unwrap();
        assert_eq!(grid.points(), vec![0.0, 0.5]);
    }

    #[test]
    fn partial_last_interval_adds_a_point() {
        let grid = TimeGrid::new(0.0, 1.0, 0.3).unwrap();
        assert_eq!(grid.len(), 4);
    }

    #[test]
    fn rejects_bad_grids() {
        assert!(TimeGrid::new(0.0, 24.0, 0.0).is_err());
        assert!(TimeGrid::new(0.0, 24.0, -0.25).is_err());
        assert!(TimeGrid::new(5.0, 5.0, 0.25).is_err());
        assert!(TimeGrid::new(0.0, f64::INFINITY, 0.25).is_err());
        assert!(TimeGrid::new(0.0, 24.0, 1e-9).is_err());
    }
}
