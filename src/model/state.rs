// src/model/state.rs

use nalgebra::Vector4;
use serde::{Deserialize, Serialize};

/// Levels of the four stages at one instant: `(P, I, D, O)`.
///
/// The same type carries rates of change when returned by the derivative
/// function, in the same component order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateVector {
    pub production: f64,
    pub inventory: f64,
    pub demand: f64,
    pub backlog: f64,
}

impl Default for StateVector {
    /// The standard start of a day: `(1, 20, 1, 0)`.
    fn default() -> Self {
        Self::new(1.0, 20.0, 1.0, 0.0)
    }
}

impl StateVector {
    pub const fn new(production: f64, inventory: f64, demand: f64, backlog: f64) -> Self {
        Self {
            production,
            inventory,
            demand,
            backlog,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.production.is_finite()
            && self.inventory.is_finite()
            && self.demand.is_finite()
            && self.backlog.is_finite()
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.production, self.inventory, self.demand, self.backlog]
    }

    pub(crate) fn to_vector(self) -> Vector4<f64> {
        Vector4::from(self.to_array())
    }

    pub(crate) fn from_vector(v: &Vector4<f64>) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<[f64; 4]> for StateVector {
    fn from(values: [f64; 4]) -> Self {
        Self::new(values[0], values[1], values[2], values[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_start_of_day() {
        assert_eq!(StateVector::default().to_array(), [1.0, 20.0, 1.0, 0.0]);
    }

    #[test]
    fn vector_conversion_keeps_order() {
        let state = StateVector::new(1.5, 2.5, 3.5, 4.5);
        let v = state.to_vector();
        assert_eq!(v[2], 3.5);
        assert_eq!(StateVector::from_vector(&v), state);
        assert_eq!(StateVector::from([1.5, 2.5, 3.5, 4.5]), state);
    }

    #[test]
    fn finiteness_checks_every_component() {
        assert!(StateVector::default().is_finite());
        assert!(!StateVector::new(1.0, f64::NAN, 1.0, 0.0).is_finite());
        assert!(!StateVector::new(1.0, 1.0, 1.0, f64::INFINITY).is_finite());
    }
}
