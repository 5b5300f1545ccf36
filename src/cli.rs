// src/cli.rs

//! Command-line options of the `daily-chain` binary.

use std::path::PathBuf;

use crate::error::{ChainError, ChainResult};
use crate::integration::ForwardEuler;
use crate::simulation::config::{IntegrationMethod, SimulationConfig};

pub const USAGE: &str = "\
Usage: daily-chain [options]

Options:
  --config <file.json>   Load simulation settings from a JSON file
  --set <name=value>     Override one coefficient (repeatable), e.g. --set mu=0.02
  --days <n>             Simulate n consecutive days
  --euler <substeps>     Use fixed-step Euler with n substeps per output step
  --no-overlay           Skip the rush-hour demand overlay
  --out <file.csv>       Write the trajectory of the baseline run
  --sweep <runs>         Run a Monte Carlo sweep of perturbed coefficients
  --spread <rel std>     Relative standard deviation of the sweep (default 0.1)
  --seed <u64>           Seed of the sweep (default 42)
  --summary <file.csv>   Write one summary row per sweep run
  -h, --help             Show this message";

#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub config_path: Option<PathBuf>,
    pub overrides: Vec<(String, String)>,
    pub days: Option<u32>,
    pub euler_substeps: Option<usize>,
    pub no_overlay: bool,
    pub out: Option<PathBuf>,
    pub sweep_runs: Option<usize>,
    pub spread: f64,
    pub seed: u64,
    pub summary: Option<PathBuf>,
    pub help: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            config_path: None,
            overrides: Vec::new(),
            days: None,
            euler_substeps: None,
            no_overlay: false,
            out: None,
            sweep_runs: None,
            spread: 0.1,
            seed: 42,
            summary: None,
            help: false,
        }
    }
}

impl Options {
    /// Parses arguments, program name excluded.
    ///
    /// Accepts any iterator of strings so it can be driven from tests.
    pub fn parse_from<I, S>(args: I) -> ChainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        let mut opts = Self::default();

        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            match flag {
                "-h" | "--help" => opts.help = true,
                "--no-overlay" => opts.no_overlay = true,
                "--config" => opts.config_path = Some(PathBuf::from(value_of(&args, i)?)),
                "--out" => opts.out = Some(PathBuf::from(value_of(&args, i)?)),
                "--summary" => opts.summary = Some(PathBuf::from(value_of(&args, i)?)),
                "--set" => {
                    let pair = value_of(&args, i)?;
                    let (name, value) = pair.split_once('=').ok_or_else(|| {
                        ChainError::Config(format!("--set expects name=value, got '{pair}'"))
                    })?;
                    opts.overrides.push((name.to_string(), value.to_string()));
                }
                "--days" => opts.days = Some(parse_number(flag, value_of(&args, i)?)?),
                "--euler" => opts.euler_substeps = Some(parse_number(flag, value_of(&args, i)?)?),
                "--sweep" => opts.sweep_runs = Some(parse_number(flag, value_of(&args, i)?)?),
                "--spread" => opts.spread = parse_number(flag, value_of(&args, i)?)?,
                "--seed" => opts.seed = parse_number(flag, value_of(&args, i)?)?,
                unknown => return Err(ChainError::Config(format!("unknown option '{unknown}'"))),
            }
            i += if takes_value(flag) { 2 } else { 1 };
        }
        Ok(opts)
    }

    /// Builds the run configuration: file (or defaults), then command line
    /// overrides on top.
    pub fn simulation_config(&self) -> ChainResult<SimulationConfig> {
        let mut config = match &self.config_path {
            Some(path) => SimulationConfig::from_json_file(path)?,
            None => SimulationConfig::default(),
        };
        config
            .parameters
            .apply_text_pairs(self.overrides.iter().map(|(n, v)| (n.as_str(), v.as_str())))?;
        if let Some(days) = self.days {
            config.days = days;
        }
        if let Some(substeps) = self.euler_substeps {
            config.method = IntegrationMethod::Euler(ForwardEuler::new(substeps));
        }
        if self.no_overlay {
            config.demand_overlay = false;
        }
        config.validate()?;
        Ok(config)
    }
}

fn takes_value(flag: &str) -> bool {
    !matches!(flag, "-h" | "--help" | "--no-overlay")
}

fn value_of(args: &[String], i: usize) -> ChainResult<&str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| ChainError::Config(format!("option '{}' needs a value", args[i])))
}

fn parse_number<T: std::str::FromStr>(flag: &str, text: &str) -> ChainResult<T> {
    text.parse()
        .map_err(|_| ChainError::Config(format!("option '{flag}' expects a number, got '{text}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_args_gives_defaults() {
        let opts = Options::parse_from(Vec::<String>::new()).unwrap();
        assert_eq!(opts, Options::default());
    }

    #[test]
    fn parses_all_options() {
        let opts = Options::parse_from([
            "--config", "day.json", "--set", "mu=0.02", "--set", "T=0.9", "--days", "3",
            "--euler", "10", "--no-overlay", "--out", "run.csv", "--sweep", "20", "--spread",
            "0.2", "--seed", "7", "--summary", "sweep.csv",
        ])
        .unwrap();
        assert_eq!(opts.config_path, Some(PathBuf::from("day.json")));
        assert_eq!(
            opts.overrides,
            vec![("mu".to_string(), "0.02".to_string()), ("T".to_string(), "0.9".to_string())]
        );
        assert_eq!(opts.days, Some(3));
        assert_eq!(opts.euler_substeps, Some(10));
        assert!(opts.no_overlay);
        assert_eq!(opts.out, Some(PathBuf::from("run.csv")));
        assert_eq!(opts.sweep_runs, Some(20));
        assert_eq!(opts.spread, 0.2);
        assert_eq!(opts.seed, 7);
        assert_eq!(opts.summary, Some(PathBuf::from("sweep.csv")));
    }

    #[test]
    fn help_flag() {
        assert!(Options::parse_from(["-h"]).unwrap().help);
        assert!(Options::parse_from(["--help"]).unwrap().help);
    }

    #[test]
    fn bad_arguments_are_errors() {
        assert!(Options::parse_from(["--days"]).is_err());
        assert!(Options::parse_from(["--days", "two"]).is_err());
        assert!(Options::parse_from(["--set", "mu"]).is_err());
        assert!(Options::parse_from(["--verbose"]).is_err());
    }

    #[test]
    fn overrides_flow_into_config() {
        let opts = Options::parse_from(["--set", "nu=0.3", "--days", "2", "--euler", "4"]).unwrap();
        let config = opts.simulation_config().unwrap();
        assert_eq!(config.parameters.nu, 0.3);
        assert_eq!(config.days, 2);
        assert_eq!(config.method, IntegrationMethod::Euler(ForwardEuler::new(4)));
    }

    #[test]
    fn non_numeric_override_fails_before_running() {
        let opts = Options::parse_from(["--set", "alpha=lots"]).unwrap();
        assert!(matches!(
            opts.simulation_config(),
            Err(ChainError::InvalidParameter { .. })
        ));
    }
}
