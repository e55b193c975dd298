pub mod activator;
pub mod config;
pub mod error;
pub mod network;
pub mod persist;
pub mod topology;
pub mod trainer;
pub mod truth_table;

mod utils;
