// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Prediction settings and the lattice strategy they select.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use context::MissingDataCompare;
use lattice::{BasicLattice, DistributedLattice, Lattice, StochasticLattice, DEFAULT_SAMPLES};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::AmError;

/// How lattice counts are turned into pointers.
#[derive(
    clap::ValueEnum, Serialize, Deserialize, Copy, Clone, Debug, Default, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum CountingMode {
    /// Each exemplar gets one pointer per point reaching it
    Linear,
    /// Each exemplar gets one pointer per point reaching it for every
    /// exemplar sharing the supracontext
    #[default]
    Quadratic,
}

impl Display for CountingMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CountingMode::Linear => write!(f, "linear"),
            CountingMode::Quadratic => write!(f, "quadratic"),
        }
    }
}

impl FromStr for CountingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(CountingMode::Linear),
            "quadratic" => Ok(CountingMode::Quadratic),
            _ => Err(format!("unknown counting mode {s}")),
        }
    }
}

fn default_samples() -> usize {
    DEFAULT_SAMPLES
}

/// Settings for the sampling lattice.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct StochasticConfig {
    /// Seed for the random number generator
    pub seed: u64,
    /// Random unions drawn per subcontext
    #[serde(default = "default_samples")]
    pub samples: usize,
}

impl Default for StochasticConfig {
    fn default() -> Self {
        StochasticConfig {
            seed: 0,
            samples: DEFAULT_SAMPLES,
        }
    }
}

/// Prediction settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// How unknown feature values compare
    pub missing_data_compare: MissingDataCompare,
    /// How lattice counts become pointers
    pub counting_mode: CountingMode,
    /// 1 for the exhaustive lattice, more to split it into that many parts
    pub num_lattices: usize,
    /// Leave features missing in the test item out of every label
    pub ignore_unknowns: bool,
    /// Drop training exemplars with the test item's exact feature values
    pub remove_test_exemplar: bool,
    /// Estimate counts by sampling instead of building a lattice
    pub stochastic: Option<StochasticConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            missing_data_compare: MissingDataCompare::default(),
            counting_mode: CountingMode::default(),
            num_lattices: 1,
            ignore_unknowns: false,
            remove_test_exemplar: false,
            stochastic: None,
        }
    }
}

/// The lattice construction chosen by a [`Config`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Visit every lattice point
    Exhaustive,
    /// Split labels into this many ranges and combine
    Distributed(usize),
    /// Estimate counts by sampling
    Stochastic(StochasticConfig),
}

impl Config {
    /// The strategy these settings select, checking that they are
    /// consistent.
    pub fn strategy(&self) -> Result<Strategy, AmError> {
        if self.num_lattices == 0 {
            return Err(AmError::InvalidConfig(
                "num_lattices must be at least 1".to_string(),
            ));
        }
        if let Some(stochastic) = self.stochastic {
            if stochastic.samples == 0 {
                return Err(AmError::InvalidConfig(
                    "stochastic sampling needs at least one sample".to_string(),
                ));
            }
            return Ok(Strategy::Stochastic(stochastic));
        }
        match self.num_lattices {
            1 => Ok(Strategy::Exhaustive),
            n => Ok(Strategy::Distributed(n)),
        }
    }
}

impl Strategy {
    /// A fresh lattice builder. Stochastic builders are seeded anew each time,
    /// so repeated predictions agree.
    pub fn lattice(&self) -> Result<Box<dyn Lattice>, AmError> {
        let lattice: Box<dyn Lattice> = match *self {
            Strategy::Exhaustive => Box::new(BasicLattice::new()),
            Strategy::Distributed(n) => Box::new(DistributedLattice::new(n)?),
            Strategy::Stochastic(StochasticConfig { seed, samples }) => Box::new(
                StochasticLattice::with_samples(ChaCha8Rng::seed_from_u64(seed), samples),
            ),
        };
        Ok(lattice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_selection() {
        let config = Config::default();
        assert_eq!(config.strategy(), Ok(Strategy::Exhaustive));
        let config = Config {
            num_lattices: 4,
            ..Config::default()
        };
        assert_eq!(config.strategy(), Ok(Strategy::Distributed(4)));
        let config = Config {
            num_lattices: 4,
            stochastic: Some(StochasticConfig::default()),
            ..Config::default()
        };
        assert_eq!(
            config.strategy(),
            Ok(Strategy::Stochastic(StochasticConfig {
                seed: 0,
                samples: 1000
            }))
        );
        let config = Config {
            num_lattices: 0,
            ..Config::default()
        };
        assert!(matches!(config.strategy(), Err(AmError::InvalidConfig(_))));
        let config = Config {
            num_lattices: 0,
            stochastic: Some(StochasticConfig::default()),
            ..Config::default()
        };
        assert!(matches!(config.strategy(), Err(AmError::InvalidConfig(_))));
        let config = Config {
            stochastic: Some(StochasticConfig {
                seed: 1,
                samples: 0,
            }),
            ..Config::default()
        };
        assert!(matches!(config.strategy(), Err(AmError::InvalidConfig(_))));
    }

    #[test]
    fn lattice_names() {
        let name = |s: Strategy| s.lattice().unwrap().name();
        assert_eq!(name(Strategy::Exhaustive), "exhaustive");
        assert_eq!(name(Strategy::Distributed(3)), "distributed");
        assert_eq!(
            name(Strategy::Stochastic(StochasticConfig::default())),
            "stochastic"
        );
    }

    #[test]
    fn deserialize_with_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"missing_data_compare": "match", "stochastic": {"seed": 9}}"#,
        )
        .unwrap();
        assert_eq!(config.missing_data_compare, MissingDataCompare::Match);
        assert_eq!(config.counting_mode, CountingMode::Quadratic);
        assert_eq!(config.num_lattices, 1);
        assert_eq!(
            config.stochastic,
            Some(StochasticConfig {
                seed: 9,
                samples: DEFAULT_SAMPLES
            })
        );
        insta::assert_display_snapshot!(
            serde_json::to_string(&Config::default()).unwrap(),
            @r###"{"missing_data_compare":"variable","counting_mode":"quadratic","num_lattices":1,"ignore_unknowns":false,"remove_test_exemplar":false,"stochastic":null}"###
        );
    }

    #[test]
    fn counting_mode_strings() {
        assert_eq!("Linear".parse(), Ok(CountingMode::Linear));
        assert_eq!(CountingMode::Quadratic.to_string(), "quadratic");
        assert!("cubic".parse::<CountingMode>().is_err());
    }
}
