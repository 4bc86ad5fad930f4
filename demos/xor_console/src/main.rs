use std::env;

use gradnet::{
    dataset::Dataset,
    network::{
        trainer::{Hyperparams, TrainOutcome, Trainer},
        Network,
    },
    prelude::*,
};

const XOR_INPUTS: &str = "0 0\n0 1\n1 0\n1 1\n";
const XOR_TARGETS: &str = "0\n1\n1\n0\n";

fn main() -> Result<()> {
    // pass two file paths to train on your own flat-text dataset instead
    let args: Vec<String> = env::args().collect();
    let data = match args.as_slice() {
        [_, inputs, targets] => Dataset::load(inputs, targets, 4, 2, 1)?,
        _ => Dataset::parse(XOR_INPUTS, XOR_TARGETS, 4, 2, 1)?,
    };

    let hyper = Hyperparams::default();
    let mut net = Network::new(&[2, 2, 1], hyper.weight_range.clone())?;

    let trainer = Trainer::new(hyper)?.with_log(Some(1_000));
    let report = trainer.train(&mut net, &data)?;

    println!("------------------");
    match report.outcome {
        TrainOutcome::ConvergedByError => {
            println!("Converged below the error threshold")
        }
        TrainOutcome::StoppedByIterationLimit => {
            println!("Stopped at the iteration limit")
        }
    }
    println!("Iterations: {}", report.iterations);
    println!("Total error: {}", report.total_error);

    for (case, prediction) in report.predictions.iter().enumerate() {
        println!(
            "{:?} -> {:.6} (expected {})",
            data.input(case),
            prediction[0],
            data.target(case)[0]
        );
    }

    println!("\nWeights:");
    for (stage, table) in net.weights().iter().enumerate() {
        for start in 0..table.rows() {
            for end in 0..table.cols() {
                print!("w{stage}{start}{end}: {:.6}, ", table[(start, end)]);
            }
        }
        println!();
    }

    Ok(())
}
