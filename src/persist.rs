//! Weight-file persistence.
//!
//! A weight file is a flat whitespace-delimited sequence of real numbers in
//! row-major `(layer, source unit, dest unit)` order; its length must equal
//! the total weight count for the topology. `Checkpointer` reuses the same
//! format for periodic snapshots during training.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::network::Network;

/// Reads a flat weight file into a value sequence.
///
/// The count is validated against the topology by `Network::load_external`,
/// not here; this only rejects unparseable tokens.
pub fn read_weight_file(path: &Path) -> Result<Vec<f64>> {
    let text = fs::read_to_string(path).map_err(|source| Error::io(path, source))?;
    text.split_whitespace()
        .map(|token| {
            token.parse::<f64>().map_err(|_| {
                Error::Configuration(format!(
                    "bad weight value {:?} in {}",
                    token,
                    path.display()
                ))
            })
        })
        .collect()
}

/// Writes the network's weights in the flat text format.
///
/// Values are formatted with the shortest representation that parses back to
/// the identical double, so a save/load round trip is bitwise exact.
pub fn write_weight_file(path: &Path, network: &Network) -> Result<()> {
    let mut text = String::new();
    for weight in network.flat_weights() {
        text.push_str(&weight.to_string());
        text.push(' ');
    }
    text.push('\n');
    fs::write(path, text).map_err(|source| Error::io(path, source))
}

/// Snapshots the weight tensor to a file at a fixed epoch interval.
///
/// Checkpoint failures are reported on stderr and never abort training; a run
/// that is converging keeps going without its snapshots.
#[derive(Clone, Debug)]
pub struct Checkpointer {
    path: PathBuf,
    interval: usize,
}

impl Checkpointer {
    pub fn new(path: PathBuf, interval: usize) -> Self {
        Checkpointer { path, interval }
    }

    /// Called once per completed epoch; writes on every `interval`-th one.
    pub fn epoch(&self, iteration: usize, network: &Network) {
        if self.interval > 0 && iteration % self.interval == 0 {
            self.write(network);
        }
    }

    /// Writes a final snapshot regardless of the interval.
    pub fn finish(&self, network: &Network) {
        self.write(network);
    }

    fn write(&self, network: &Network) {
        if let Err(err) = write_weight_file(&self.path, network) {
            eprintln!("checkpoint skipped: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Topology;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Write;

    fn random_network(layer_sizes: &[usize], seed: u64) -> Network {
        let mut net = Network::new(Topology::new(layer_sizes).unwrap());
        net.randomize(-1.5, 1.5, &mut StdRng::seed_from_u64(seed));
        net
    }

    #[test]
    fn save_load_round_trip_is_bitwise() {
        let net = random_network(&[3, 5, 2], 21);
        let file = tempfile::NamedTempFile::new().unwrap();
        write_weight_file(file.path(), &net).unwrap();

        let values = read_weight_file(file.path()).unwrap();
        let mut reloaded = Network::new(net.topology().clone());
        reloaded.load_external(&values).unwrap();

        let saved = net.flat_weights();
        let loaded = reloaded.flat_weights();
        assert_eq!(saved.len(), loaded.len());
        for (a, b) in saved.iter().zip(&loaded) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn rejects_unparseable_weight() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "0.5 oops 1.0").unwrap();
        assert!(read_weight_file(file.path()).is_err());
    }

    #[test]
    fn checkpointer_honors_interval() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.txt");
        let net = random_network(&[2, 2], 5);
        let checkpointer = Checkpointer::new(path.clone(), 3);

        checkpointer.epoch(1, &net);
        checkpointer.epoch(2, &net);
        assert!(!path.exists());
        checkpointer.epoch(3, &net);
        assert!(path.exists());
    }

    #[test]
    fn checkpointer_failure_does_not_panic() {
        let net = random_network(&[2, 2], 5);
        let checkpointer =
            Checkpointer::new(PathBuf::from("/no/such/dir/weights.txt"), 1);
        checkpointer.epoch(1, &net);
        checkpointer.finish(&net);
    }
}
