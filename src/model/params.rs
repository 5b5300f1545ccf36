// src/model/params.rs

use serde::{Deserialize, Serialize};

use crate::error::{ChainError, ChainResult};

/// One row of the coefficient table shown to whoever edits parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub baseline: f64,
    pub description: &'static str,
}

/// The ten model coefficients with their baseline values, in display order.
pub const PARAMETER_TABLE: [ParameterSpec; 10] = [
    ParameterSpec {
        name: "alpha",
        baseline: 0.5,
        description: "Production gain",
    },
    ParameterSpec {
        name: "beta",
        baseline: 0.1,
        description: "Production decay rate",
    },
    ParameterSpec {
        name: "gamma",
        baseline: 0.8,
        description: "Inventory replenishment gain",
    },
    ParameterSpec {
        name: "delta",
        baseline: 0.05,
        description: "Inventory decay rate",
    },
    ParameterSpec {
        name: "epsilon",
        baseline: 0.02,
        description: "Backlog-driven inventory loss",
    },
    ParameterSpec {
        name: "rho",
        baseline: 0.7,
        description: "Demand gain from inventory",
    },
    ParameterSpec {
        name: "sigma",
        baseline: 0.03,
        description: "Demand saturation (decay) rate",
    },
    ParameterSpec {
        name: "mu",
        baseline: 0.01,
        description: "Backlog generation rate",
    },
    ParameterSpec {
        name: "nu",
        baseline: 0.15,
        description: "Backlog fulfillment rate",
    },
    ParameterSpec {
        name: "T",
        baseline: 0.5,
        description: "Mean queueing service time",
    },
];

/// Coefficients of the chain model.
///
/// The set is `Copy`: every derivative evaluation works on its own copy, so a
/// caller's value is never written through by the regime overrides and can be
/// shared freely between parallel runs.
///
/// No range checks are applied. Negative values are accepted and simply make
/// the trajectory non-physical.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub delta: f64,
    pub epsilon: f64,
    pub rho: f64,
    pub sigma: f64,
    pub mu: f64,
    pub nu: f64,
    /// Mean service time of the queue (`T`), a dimensionless multiplier.
    #[serde(rename = "T")]
    pub service_time: f64,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            beta: 0.1,
            gamma: 0.8,
            delta: 0.05,
            epsilon: 0.02,
            rho: 0.7,
            sigma: 0.03,
            mu: 0.01,
            nu: 0.15,
            service_time: 0.5,
        }
    }
}

impl ParameterSet {
    /// Looks a coefficient up by its table name (`"alpha"` .. `"T"`).
    pub fn get(&self, name: &str) -> ChainResult<f64> {
        let value = match name {
            "alpha" => self.alpha,
            "beta" => self.beta,
            "gamma" => self.gamma,
            "delta" => self.delta,
            "epsilon" => self.epsilon,
            "rho" => self.rho,
            "sigma" => self.sigma,
            "mu" => self.mu,
            "nu" => self.nu,
            "T" => self.service_time,
            other => return Err(ChainError::UnknownParameter(other.to_string())),
        };
        Ok(value)
    }

    pub fn set(&mut self, name: &str, value: f64) -> ChainResult<()> {
        let slot = match name {
            "alpha" => &mut self.alpha,
            "beta" => &mut self.beta,
            "gamma" => &mut self.gamma,
            "delta" => &mut self.delta,
            "epsilon" => &mut self.epsilon,
            "rho" => &mut self.rho,
            "sigma" => &mut self.sigma,
            "mu" => &mut self.mu,
            "nu" => &mut self.nu,
            "T" => &mut self.service_time,
            other => return Err(ChainError::UnknownParameter(other.to_string())),
        };
        *slot = value;
        Ok(())
    }

    /// Builds a set from textual `(name, value)` pairs on top of the baseline.
    ///
    /// This is the entry point for edited form fields or `name=value` command
    /// line overrides. A value that does not parse as a number is reported as
    /// [`ChainError::InvalidParameter`]; nothing is corrected on the caller's
    /// behalf.
    pub fn from_text_pairs<'a, I>(pairs: I) -> ChainResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut params = Self::default();
        params.apply_text_pairs(pairs)?;
        Ok(params)
    }

    /// Applies textual overrides to an existing set.
    pub fn apply_text_pairs<'a, I>(&mut self, pairs: I) -> ChainResult<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, text) in pairs {
            let name = name.trim();
            let value: f64 = text
                .trim()
                .parse()
                .map_err(|_| ChainError::InvalidParameter {
                    name: name.to_string(),
                    value: text.to_string(),
                })?;
            self.set(name, value)?;
        }
        Ok(())
    }

    /// `(name, value)` pairs in table order.
    pub fn entries(&self) -> [(&'static str, f64); 10] {
        [
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("gamma", self.gamma),
            ("delta", self.delta),
            ("epsilon", self.epsilon),
            ("rho", self.rho),
            ("sigma", self.sigma),
            ("mu", self.mu),
            ("nu", self.nu),
            ("T", self.service_time),
        ]
    }
}
