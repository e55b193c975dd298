//! Control input: the structured configuration consumed once at startup.
//!
//! A control file is TOML:
//!
//! ```toml
//! network = "A-B-C"
//! mode = "train"
//! layer_sizes = [2, 5, 3]
//! case_file = "cases/or.txt"
//!
//! [weights.randomize]
//! low = -1.5
//! high = 1.5
//!
//! [checkpoint]
//! file = "weights.txt"
//! interval = 1000
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::topology::Topology;
use crate::truth_table::TruthTable;

/// Whether the program trains the network or only runs it.
///
/// Selected once at startup; nothing re-checks the mode per call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Train,
    Run,
}

/// Where the initial weights come from.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightSource {
    /// Load a flat weight file shaped exactly to the topology.
    Load { file: PathBuf },
    /// Fill every weight uniformly from `[low, high)`.
    Randomize { low: f64, high: f64 },
}

/// Periodic weight snapshots during training.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CheckpointConfig {
    pub file: PathBuf,
    /// Epochs between snapshots; 0 disables the periodic writes (the final
    /// snapshot still happens).
    #[serde(default)]
    pub interval: usize,
}

/// Everything the binary needs to run or train a network.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Display name for the topology, e.g. "A-B-C".
    pub network: String,
    pub mode: Mode,
    pub layer_sizes: Vec<usize>,
    /// File holding the truth-table rows.
    pub case_file: PathBuf,
    pub weights: WeightSource,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_error_threshold")]
    pub error_threshold: f64,
    pub checkpoint: Option<CheckpointConfig>,
}

fn default_learning_rate() -> f64 {
    0.3
}

fn default_max_iterations() -> usize {
    100_000
}

fn default_error_threshold() -> f64 {
    0.0002
}

impl Config {
    /// Loads and validates a control file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::io(path, source))?;
        Self::parse(&text).map_err(|err| match err {
            Error::Configuration(msg) => {
                Error::Configuration(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parses a control file from TOML text.
    pub fn parse(text: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(text).map_err(|err| Error::Configuration(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::Configuration(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.max_iterations == 0 {
            return Err(Error::Configuration(
                "max_iterations must be at least 1".into(),
            ));
        }
        if !self.error_threshold.is_finite() || self.error_threshold <= 0.0 {
            return Err(Error::Configuration(format!(
                "error threshold must be positive, got {}",
                self.error_threshold
            )));
        }
        if let WeightSource::Randomize { low, high } = &self.weights {
            if low >= high {
                return Err(Error::Configuration(format!(
                    "weight range [{}, {}) is empty",
                    low, high
                )));
            }
        }
        // Topology::new re-validates the layer sizes.
        Topology::new(&self.layer_sizes).map(|_| ())
    }

    /// Builds the validated topology for these layer sizes.
    pub fn topology(&self) -> Result<Topology> {
        Topology::new(&self.layer_sizes)
    }

    /// Prints the configuration and truth table the way the operator sees
    /// them before a run starts.
    pub fn echo(&self, table: &TruthTable) {
        println!("-----------------------------");
        println!("Network Configuration: {}", self.network);
        println!();
        let sizes: Vec<String> = self.layer_sizes.iter().map(|s| s.to_string()).collect();
        println!("Number of activations in each layer: {}", sizes.join(", "));
        println!("Number of layers: {}", self.layer_sizes.len() - 1);
        println!(
            "Training or running: {}",
            match self.mode {
                Mode::Train => "train",
                Mode::Run => "run",
            }
        );
        println!();
        println!("Truth table:");
        for case in table.cases() {
            let mut row: Vec<String> = case.input.iter().map(|v| v.to_string()).collect();
            row.extend(case.target.iter().map(|v| v.to_string()));
            println!("{}", row.join("  "));
        }
        if let Mode::Train = self.mode {
            println!();
            println!("Learning factor (lambda): {}", self.learning_rate);
            println!("Max number of training iterations: {}", self.max_iterations);
            println!("Error threshold: {}", self.error_threshold);
            match &self.weights {
                WeightSource::Load { file } => {
                    println!("Weights loaded from: {}", file.display())
                }
                WeightSource::Randomize { low, high } => {
                    println!("Weights randomized in: [{}, {})", low, high)
                }
            }
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_randomized_training_config() {
        let config = Config::parse(
            r#"
            network = "A-B-1"
            mode = "train"
            layer_sizes = [2, 2, 1]
            case_file = "or.txt"
            learning_rate = 0.3
            max_iterations = 100000
            error_threshold = 0.002

            [weights.randomize]
            low = -1.5
            high = 1.5

            [checkpoint]
            file = "weights.txt"
            interval = 500
            "#,
        )
        .unwrap();

        assert_eq!(config.mode, Mode::Train);
        assert_eq!(config.layer_sizes, vec![2, 2, 1]);
        assert_eq!(
            config.weights,
            WeightSource::Randomize {
                low: -1.5,
                high: 1.5
            }
        );
        let checkpoint = config.checkpoint.unwrap();
        assert_eq!(checkpoint.interval, 500);
    }

    #[test]
    fn parses_run_config_with_defaults() {
        let config = Config::parse(
            r#"
            network = "A-B-C-D"
            mode = "run"
            layer_sizes = [4, 3, 3, 2]
            case_file = "cases.txt"

            [weights.load]
            file = "trained.txt"
            "#,
        )
        .unwrap();

        assert_eq!(config.mode, Mode::Run);
        assert_eq!(config.learning_rate, 0.3);
        assert_eq!(config.max_iterations, 100_000);
        assert_eq!(config.error_threshold, 0.0002);
        assert!(config.checkpoint.is_none());
    }

    #[test]
    fn rejects_empty_weight_range() {
        let result = Config::parse(
            r#"
            network = "bad"
            mode = "train"
            layer_sizes = [2, 1]
            case_file = "cases.txt"

            [weights.randomize]
            low = 1.5
            high = 1.5
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_bad_topology() {
        let result = Config::parse(
            r#"
            network = "bad"
            mode = "run"
            layer_sizes = [2, 0, 1]
            case_file = "cases.txt"

            [weights.randomize]
            low = -1.0
            high = 1.0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_missing_fields() {
        assert!(Config::parse("mode = \"train\"").is_err());
    }
}
