//! Training loop and convergence control.
//!
//! # Example
//!
//! Train a small network to compute the OR function:
//!
//! ```
//! # use perceptron::network::Network;
//! # use perceptron::topology::Topology;
//! # use perceptron::trainer::{Logging, Outcome, Trainer};
//! # use perceptron::truth_table::TruthTable;
//! # use rand::SeedableRng;
//! let topology = Topology::new(&[2, 4, 1]).unwrap();
//! let cases = [
//!     vec![0.0, 0.0, 0.0],
//!     vec![0.0, 1.0, 1.0],
//!     vec![1.0, 0.0, 1.0],
//!     vec![1.0, 1.0, 1.0],
//! ];
//! let table = TruthTable::new(&cases, &topology).unwrap();
//!
//! let mut network = Network::new(topology);
//! network.randomize(-1.5, 1.5, &mut rand::rngs::StdRng::seed_from_u64(42));
//!
//! let summary = Trainer::new()
//!     .learning_rate(0.3)
//!     .error_threshold(0.002)
//!     .logging(Logging::Silent)
//!     .train(&mut network, &table)
//!     .unwrap();
//! assert_eq!(summary.outcome, Outcome::Converged);
//! ```

use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::network::Network;
use crate::persist::Checkpointer;
use crate::truth_table::TruthTable;

/// Why training stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The average error dropped to the configured threshold.
    Converged,
    /// The iteration cap was reached before the error threshold.
    IterationLimit,
}

/// The terminal training state reported to callers.
#[derive(Clone, Debug)]
pub struct Summary {
    pub outcome: Outcome,
    pub iterations: usize,
    pub error: f64,
    pub elapsed: Duration,
}

/// Logging frequency to use during training
#[derive(Copy, Clone, Debug)]
pub enum Logging {
    /// No logs will be printed
    Silent,
    /// A summary will be printed at completion
    Completion,
    /// A summary will be printed after every `n` training iterations
    Iterations(usize),
}

impl Logging {
    /// Performs logging at the current `iteration` of training.
    fn iteration(&self, iteration: usize, training_error: f64) {
        if let Logging::Iterations(freq) = self {
            if *freq > 0 && iteration % freq == 0 {
                println!("Iteration {}:\terror={}", iteration, training_error);
            }
        }
    }

    /// Performs logging at the end of training.
    fn completion(&self, summary: &Summary) {
        if let Logging::Silent = self {
            return;
        }
        match summary.outcome {
            Outcome::Converged => {
                println!("The error threshold has been reached.")
            }
            Outcome::IterationLimit => {
                println!("The maximum number of training iterations has been reached.")
            }
        }
        println!(
            "Ran {} iterations in {} ms.",
            summary.iterations,
            summary.elapsed.as_millis()
        );
        println!("Final error: {}", summary.error);
    }
}

/// Drives repeated forward and backward passes over the truth table until the
/// error threshold or the iteration cap is reached.
#[derive(Clone, Debug)]
pub struct Trainer {
    learning_rate: f64,
    max_iterations: usize,
    error_threshold: f64,
    logging: Logging,
    checkpointer: Option<Checkpointer>,
}

impl Trainer {
    /// Creates a new Trainer instance.
    ///
    /// The trainer is initialized with some default values. These defaults
    /// are:
    ///
    /// * A learning rate of 0.3.
    /// * An iteration cap of 100000.
    /// * An error threshold of 0.0002.
    /// * Logs on training completion.
    /// * No checkpointing.
    pub fn new() -> Self {
        Trainer {
            learning_rate: 0.3,
            max_iterations: 100_000,
            error_threshold: 0.0002,
            logging: Logging::Completion,
            checkpointer: None,
        }
    }

    /// Sets the learning rate (lambda) to use during steepest descent.
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Sets the iteration cap.
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Sets the average-error threshold at which training converges.
    pub fn error_threshold(mut self, threshold: f64) -> Self {
        self.error_threshold = threshold;
        self
    }

    /// Sets the type of logging to be emitted during training.
    pub fn logging(mut self, logging: Logging) -> Self {
        self.logging = logging;
        self
    }

    /// Sets a checkpointer to snapshot the weights during training.
    pub fn checkpointer(mut self, checkpointer: Checkpointer) -> Self {
        self.checkpointer = Some(checkpointer);
        self
    }

    /// Trains `network` on every case of `table`, in table order.
    ///
    /// Weight updates are applied per case, not per epoch: the weights used
    /// for a case already reflect the update from the previous one. After
    /// each update a plain forward pass re-measures the case so the reported
    /// error reflects the post-update network.
    ///
    /// Returns the terminal state: which stop condition fired, the iteration
    /// count, the final average error, and the elapsed wall-clock time.
    pub fn train(&self, network: &mut Network, table: &TruthTable) -> Result<Summary> {
        self.validate(network, table)?;

        let start = Instant::now();
        let mut iteration = 0;
        let mut current_error;
        let outcome = loop {
            current_error = 0.0;
            for case in table.cases() {
                network.run_for_training(&case.input);
                network.backpropagate(&case.target, self.learning_rate);

                let output = network.run(&case.input);
                for (&target, &output) in case.target.iter().zip(output) {
                    let omega = target - output;
                    current_error += 0.5 * omega * omega;
                }
            }
            current_error /= table.len() as f64;
            iteration += 1;

            self.logging.iteration(iteration, current_error);
            if let Some(checkpointer) = &self.checkpointer {
                checkpointer.epoch(iteration, network);
            }

            if current_error <= self.error_threshold {
                break Outcome::Converged;
            }
            if iteration >= self.max_iterations {
                break Outcome::IterationLimit;
            }
        };

        if let Some(checkpointer) = &self.checkpointer {
            checkpointer.finish(network);
        }

        let summary = Summary {
            outcome,
            iterations: iteration,
            error: current_error,
            elapsed: start.elapsed(),
        };
        self.logging.completion(&summary);
        Ok(summary)
    }

    /// Verifies the training parameters and that every case is shaped to the
    /// network before any weight is touched.
    fn validate(&self, network: &Network, table: &TruthTable) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::Configuration(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.max_iterations == 0 {
            return Err(Error::Configuration(
                "iteration cap must be at least 1".into(),
            ));
        }
        if table.is_empty() {
            return Err(Error::Configuration("truth table holds no cases".into()));
        }
        for case in table.cases() {
            if case.input.len() != network.topology().input_len() {
                return Err(Error::ShapeMismatch {
                    expected: network.topology().input_len(),
                    got: case.input.len(),
                });
            }
            if case.target.len() != network.topology().output_len() {
                return Err(Error::ShapeMismatch {
                    expected: network.topology().output_len(),
                    got: case.target.len(),
                });
            }
        }
        Ok(())
    }
}

impl Default for Trainer {
    fn default() -> Self {
        Trainer::new()
    }
}
