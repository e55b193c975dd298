//! The ordered collection of training cases.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::topology::Topology;

/// A single training case: an input vector and its target output vector.
#[derive(Clone, Debug, PartialEq)]
pub struct Case {
    pub input: Vec<f64>,
    pub target: Vec<f64>,
}

/// The training cases, loaded once before training and immutable afterwards.
///
/// Training visits cases in table order; with online weight updates the order
/// is part of the numerics, so no shuffling happens anywhere.
#[derive(Clone, Debug)]
pub struct TruthTable {
    cases: Vec<Case>,
}

impl TruthTable {
    /// Builds a table from rows holding `input_len + output_len` values each.
    pub fn new(rows: &[Vec<f64>], topology: &Topology) -> Result<Self> {
        let width = topology.input_len() + topology.output_len();
        let mut cases = Vec::with_capacity(rows.len());
        for row in rows {
            if row.len() != width {
                return Err(Error::ShapeMismatch {
                    expected: width,
                    got: row.len(),
                });
            }
            let (input, target) = row.split_at(topology.input_len());
            cases.push(Case {
                input: input.to_vec(),
                target: target.to_vec(),
            });
        }
        Ok(TruthTable { cases })
    }

    /// Loads a table from a text file of whitespace-delimited numeric rows,
    /// one case per line.
    pub fn from_path(path: &Path, topology: &Topology) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::io(path, source))?;
        let mut rows = Vec::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let row = line
                .split_whitespace()
                .map(|token| {
                    token.parse::<f64>().map_err(|_| {
                        Error::Configuration(format!(
                            "bad value {:?} in truth table {}",
                            token,
                            path.display()
                        ))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            rows.push(row);
        }
        if rows.is_empty() {
            return Err(Error::Configuration(format!(
                "truth table {} holds no cases",
                path.display()
            )));
        }
        Self::new(&rows, topology)
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn topology() -> Topology {
        Topology::new(&[2, 2, 1]).unwrap()
    }

    #[test]
    fn splits_inputs_from_targets() {
        let rows = vec![vec![0.0, 1.0, 1.0], vec![1.0, 1.0, 1.0]];
        let table = TruthTable::new(&rows, &topology()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.cases()[0].input, vec![0.0, 1.0]);
        assert_eq!(table.cases()[0].target, vec![1.0]);
    }

    #[test]
    fn rejects_short_rows() {
        let rows = vec![vec![0.0, 1.0]];
        let err = TruthTable::new(&rows, &topology()).unwrap_err();
        match err {
            Error::ShapeMismatch { expected, got } => {
                assert_eq!(expected, 3);
                assert_eq!(got, 2);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0 0  0").unwrap();
        writeln!(file, "0 1  1").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "1 0  1").unwrap();
        let table = TruthTable::from_path(file.path(), &topology()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.cases()[2].input, vec![1.0, 0.0]);
    }

    #[test]
    fn rejects_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(TruthTable::from_path(file.path(), &topology()).is_err());
    }

    #[test]
    fn rejects_bad_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0 x 1").unwrap();
        assert!(TruthTable::from_path(file.path(), &topology()).is_err());
    }
}
