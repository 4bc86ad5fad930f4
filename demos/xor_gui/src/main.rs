use gradnet::{
    dataset::Dataset,
    matrix::Matrix2,
    network::{
        trainer::{Hyperparams, Trainer},
        Network,
    },
    prelude::*,
    viz::TrainGui,
};

fn main() -> Result<()> {
    let data = Dataset::new(
        Matrix2::from_array([[0, 0], [0, 1], [1, 0], [1, 1]]).into(),
        Matrix2::from_array([[0], [1], [1], [0]]).into(),
    )?;

    let hyper = Hyperparams {
        max_iterations: 100_000,
        ..Hyperparams::default()
    };
    let mut net = Network::new(&[2, 2, 1], hyper.weight_range.clone())?;

    let trainer = Trainer::new(hyper)?.with_log(Some(100));
    let report = trainer.train_gui::<TrainGui>(&mut net, &data)?;

    println!("------------------");
    println!("Final error: {}", report.total_error);
    for (case, prediction) in report.predictions.iter().enumerate() {
        println!("{:?} -> {:.6}", data.input(case), prediction[0]);
    }

    Ok(())
}
