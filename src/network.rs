//! A fully-connected feedforward network trained by steepest descent.
//!
//! The network owns the weight tensor and the transient per-case buffers. A
//! plain forward pass computes outputs only; a training pass also retains the
//! pre-activation sums (thetas) that backpropagation needs, and the backward
//! sweep applies weight updates online, one case at a time.

use itertools::multizip;
use rand::Rng;

use crate::activator;
use crate::error::{Error, Result};
use crate::topology::Topology;
use crate::utils::Back;

/// A feedforward network of an arbitrary number of fully-connected layers.
#[derive(Clone, Debug)]
pub struct Network {
    topology: Topology,
    /// `weights[n][k][j]` connects unit `k` of layer `n` to unit `j` of layer
    /// `n + 1`.
    weights: Vec<Vec<Vec<f64>>>,
    /// Unit values for the current case; row 0 holds the raw input.
    activations: Vec<Vec<f64>>,
    /// Pre-activation sums captured by the last training pass. Row 0 is never
    /// written; the input layer has no incoming weights.
    theta: Vec<Vec<f64>>,
    /// Backpropagated error signals, recomputed per training case.
    psi: Vec<Vec<f64>>,
}

impl Network {
    /// Creates a network of the given shape with all weights zeroed.
    ///
    /// Call `randomize` or `load_external` before running it.
    pub fn new(topology: Topology) -> Self {
        let weights = (0..topology.num_layers())
            .map(|n| vec![vec![0.0; topology.layer_size(n + 1)]; topology.layer_size(n)])
            .collect();
        let unit_rows = || -> Vec<Vec<f64>> {
            topology
                .layer_sizes()
                .iter()
                .map(|&size| vec![0.0; size])
                .collect()
        };
        let activations = unit_rows();
        let theta = unit_rows();
        let psi = unit_rows();
        Network {
            topology,
            weights,
            activations,
            theta,
            psi,
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Fills every weight independently and uniformly from `[low, high)`.
    pub fn randomize<R: Rng>(&mut self, low: f64, high: f64, rng: &mut R) {
        for layer in &mut self.weights {
            for row in layer {
                for weight in row {
                    *weight = rng.gen_range(low..high);
                }
            }
        }
    }

    /// Overwrites all weights from a flat sequence in row-major
    /// `(layer, source unit, dest unit)` order.
    ///
    /// Fails with `ShapeMismatch` if the element count disagrees with the
    /// topology, leaving the existing weights untouched.
    pub fn load_external(&mut self, values: &[f64]) -> Result<()> {
        let expected = self.topology.weight_count();
        if values.len() != expected {
            return Err(Error::ShapeMismatch {
                expected,
                got: values.len(),
            });
        }
        let mut values = values.iter();
        for layer in &mut self.weights {
            for row in layer {
                for (weight, &value) in row.iter_mut().zip(&mut values) {
                    *weight = value;
                }
            }
        }
        Ok(())
    }

    /// Returns an immutable copy of the weight tensor.
    pub fn snapshot(&self) -> Vec<Vec<Vec<f64>>> {
        self.weights.clone()
    }

    /// Flattens the weight tensor in row-major `(layer, source unit,
    /// dest unit)` order, the order the weight-file format uses.
    pub fn flat_weights(&self) -> Vec<f64> {
        self.weights
            .iter()
            .flat_map(|layer| layer.iter())
            .flat_map(|row| row.iter().cloned())
            .collect()
    }

    /// Feeds `input` through the network, returning the output layer.
    pub fn run(&mut self, input: &[f64]) -> &[f64] {
        self.propagate(input, false);
        self.activations.back()
    }

    /// Training-mode forward pass: like `run`, but also stores each
    /// pre-activation sum before squashing, since backpropagation evaluates
    /// the activation derivative there.
    pub fn run_for_training(&mut self, input: &[f64]) -> &[f64] {
        self.propagate(input, true);
        self.activations.back()
    }

    fn propagate(&mut self, input: &[f64], record_theta: bool) {
        assert_eq!(input.len(), self.topology.input_len());
        self.activations[0].copy_from_slice(input);
        for n in 0..self.topology.num_layers() {
            let (sources, dests) = self.activations.split_at_mut(n + 1);
            let sources = sources.back();
            let dests = &mut dests[0];
            for j in 0..dests.len() {
                let mut sum = 0.0;
                for (k, &activation) in sources.iter().enumerate() {
                    sum += activation * self.weights[n][k][j];
                }
                if record_theta {
                    self.theta[n + 1][j] = sum;
                }
                dests[j] = activator::activate(sum);
            }
        }
    }

    /// Computes the output-layer error signal against `target`, then sweeps
    /// it backward layer by layer, updating every weight in place as it goes
    /// (online steepest descent).
    ///
    /// Must be called immediately after `run_for_training` for the same case:
    /// the sweep consumes the activation and theta buffers that pass
    /// captured.
    pub fn backpropagate(&mut self, target: &[f64], learning_rate: f64) {
        let last = self.topology.num_layers();
        assert_eq!(target.len(), self.topology.output_len());

        for (psi, &expected, &output, &theta) in multizip((
            self.psi[last].iter_mut(),
            target.iter(),
            self.activations[last].iter(),
            self.theta[last].iter(),
        )) {
            let omega = expected - output;
            *psi = omega * activator::activate_derivative(theta);
        }

        // Each sweep step reads the pre-update weight into big_omega before
        // applying the update for that same weight, then derives the error
        // signal the next (earlier) layer will consume. The signal computed
        // for layer 0 is never consumed.
        for n in (0..last).rev() {
            for j in 0..self.topology.layer_size(n) {
                let mut big_omega = 0.0;
                for i in 0..self.topology.layer_size(n + 1) {
                    big_omega += self.psi[n + 1][i] * self.weights[n][j][i];
                    self.weights[n][j][i] +=
                        learning_rate * self.activations[n][j] * self.psi[n + 1][i];
                }
                self.psi[n][j] = activator::activate_derivative(self.theta[n][j]) * big_omega;
            }
        }
    }
}
