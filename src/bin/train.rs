use std::env;
use std::path::Path;
use std::process;

use perceptron::config::{Config, Mode, WeightSource};
use perceptron::error::Result;
use perceptron::network::Network;
use perceptron::persist::{self, Checkpointer};
use perceptron::trainer::{Logging, Summary, Trainer};
use perceptron::truth_table::TruthTable;

fn main() {
    let path = env::args().nth(1).unwrap_or_else(|| "control.toml".into());
    if let Err(err) = run(Path::new(&path)) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

fn run(path: &Path) -> Result<()> {
    let config = Config::from_path(path)?;
    let topology = config.topology()?;
    let table = TruthTable::from_path(&config.case_file, &topology)?;

    let mut network = Network::new(topology);
    match &config.weights {
        WeightSource::Load { file } => {
            let values = persist::read_weight_file(file)?;
            network.load_external(&values)?;
        }
        WeightSource::Randomize { low, high } => {
            network.randomize(*low, *high, &mut rand::thread_rng());
        }
    }

    config.echo(&table);

    match config.mode {
        Mode::Train => {
            let mut trainer = Trainer::new()
                .learning_rate(config.learning_rate)
                .max_iterations(config.max_iterations)
                .error_threshold(config.error_threshold)
                .logging(Logging::Iterations(1000));
            if let Some(checkpoint) = &config.checkpoint {
                trainer = trainer
                    .checkpointer(Checkpointer::new(checkpoint.file.clone(), checkpoint.interval));
            }
            let summary = trainer.train(&mut network, &table)?;
            report(&mut network, &table, Some(&summary));
        }
        Mode::Run => report(&mut network, &table, None),
    }
    Ok(())
}

/// Prints every case's inputs alongside the outputs the network computes for
/// them, plus the elapsed training time when a training run preceded it.
fn report(network: &mut Network, table: &TruthTable, summary: Option<&Summary>) {
    println!("Calculated outputs:");
    for case in table.cases() {
        let mut row: Vec<String> = case.input.iter().map(|v| v.to_string()).collect();
        row.extend(network.run(&case.input).iter().map(|v| v.to_string()));
        println!("{}", row.join("  "));
    }
    if let Some(summary) = summary {
        println!();
        println!("Training took {} milliseconds", summary.elapsed.as_millis());
    }
}
