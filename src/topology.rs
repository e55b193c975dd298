//! Network topology: the ordered layer sizes and the shapes derived from
//! them.

use crate::error::{Error, Result};
use crate::utils::{Back, Front};

/// The ordered sequence of layer sizes, from the input layer (index 0) to the
/// output layer.
///
/// Every fully-connected shape in the crate is derived from this: the weight
/// tensor has one slab per connectivity layer, and the activation, theta and
/// error-signal buffers all have one row per layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Topology {
    layer_sizes: Vec<usize>,
}

impl Topology {
    /// Creates a topology from the given layer sizes.
    ///
    /// Returns a `Configuration` error if fewer than two layers are given or
    /// if any layer is empty.
    pub fn new(layer_sizes: &[usize]) -> Result<Self> {
        if layer_sizes.len() < 2 {
            return Err(Error::Configuration(format!(
                "a network needs at least an input and an output layer, got {}",
                layer_sizes.len()
            )));
        }
        if layer_sizes.iter().any(|&size| size == 0) {
            return Err(Error::Configuration(
                "every layer must have at least one unit".into(),
            ));
        }
        Ok(Topology {
            layer_sizes: layer_sizes.to_vec(),
        })
    }

    /// Returns the number of connectivity layers (the depth of the weight
    /// tensor). One less than the number of unit layers.
    pub fn num_layers(&self) -> usize {
        self.layer_sizes.len() - 1
    }

    /// Returns the number of units in every layer, input to output.
    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    /// Returns the number of units in layer `n`.
    pub fn layer_size(&self, n: usize) -> usize {
        self.layer_sizes[n]
    }

    /// Returns the size of the input layer to the network.
    pub fn input_len(&self) -> usize {
        *self.layer_sizes.front()
    }

    /// Returns the size of the output layer from the network.
    pub fn output_len(&self) -> usize {
        *self.layer_sizes.back()
    }

    /// Returns the width of the widest layer.
    pub fn max_layer_size(&self) -> usize {
        self.layer_sizes.iter().cloned().max().unwrap_or(0)
    }

    /// Returns the total number of weights a network of this shape holds.
    pub fn weight_count(&self) -> usize {
        (0..self.num_layers())
            .map(|n| self.layer_sizes[n] * self.layer_sizes[n + 1])
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_few_layers() {
        assert!(Topology::new(&[3]).is_err());
        assert!(Topology::new(&[]).is_err());
    }

    #[test]
    fn empty_layer() {
        assert!(Topology::new(&[2, 0, 1]).is_err());
    }

    #[test]
    fn derived_shapes() {
        let topology = Topology::new(&[2, 3, 1]).unwrap();
        assert_eq!(topology.num_layers(), 2);
        assert_eq!(topology.input_len(), 2);
        assert_eq!(topology.output_len(), 1);
        assert_eq!(topology.max_layer_size(), 3);
        assert_eq!(topology.weight_count(), 2 * 3 + 3 * 1);
    }

    #[test]
    fn two_layer_network() {
        let topology = Topology::new(&[4, 2]).unwrap();
        assert_eq!(topology.num_layers(), 1);
        assert_eq!(topology.weight_count(), 8);
    }
}
