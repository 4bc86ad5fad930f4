use std::{ops::RangeInclusive, sync::mpsc};

use crate::{dataset::Dataset, network::Network, prelude::*, viz::Visualizer};

/// Hyperparameters fixed for the duration of one training run.
#[derive(Debug, Clone)]
pub struct Hyperparams {
    /// Learning rate scaling each gradient step.
    pub lambda: f64,
    /// Inclusive bounds for random weight initialization.
    pub weight_range: RangeInclusive<f64>,
    /// An iteration whose accumulated total error falls below this value
    /// converges.
    pub error_threshold: f64,
    /// Hard cap on training iterations.
    pub max_iterations: usize,
}

impl Default for Hyperparams {
    fn default() -> Self {
        Self {
            lambda: 5.0,
            weight_range: -2.0..=2.0,
            error_threshold: 0.01,
            max_iterations: 10_000,
        }
    }
}

impl Hyperparams {
    pub fn validate(&self) -> Result<()> {
        if self.weight_range.start() > self.weight_range.end() {
            return Err(Error::WeightRangeErr);
        }
        if self.max_iterations == 0 || !self.lambda.is_finite() || !(self.error_threshold >= 0.0) {
            return Err(Error::HyperparamErr);
        }
        Ok(())
    }
}

/// Terminal states of the training loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainOutcome {
    /// An iteration's accumulated total error fell below the threshold.
    ConvergedByError,
    /// The iteration counter reached the configured maximum.
    StoppedByIterationLimit,
}

/// Summary of a finished training run.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub outcome: TrainOutcome,
    /// Iterations actually run.
    pub iterations: usize,
    /// Accumulated total error of the last iteration.
    pub total_error: f64,
    /// Accumulated total error of every iteration, in order. Callers
    /// wanting a mean divide by the case count once at the end.
    pub error_trace: Vec<f64>,
    /// Final output vector for every training case, in dataset order.
    pub predictions: Vec<Vec<f64>>,
}

/// Steepest-descent training driver.
///
/// Each iteration runs every case in dataset order: forward pass, backward
/// pass, then a second forward pass so the reported per-case error
/// reflects the updated weights. The run ends when an iteration's total
/// error falls below the threshold or the iteration cap is reached,
/// whichever fires first; the threshold is checked first.
#[derive(Debug)]
pub struct Trainer {
    hyper: Hyperparams,
    iterations_per_log: Option<usize>,
}

impl Trainer {
    pub fn new(hyper: Hyperparams) -> Result<Self> {
        hyper.validate()?;
        Ok(Self {
            hyper,
            iterations_per_log: None,
        })
    }

    /// Print (and stream to a GUI, if one is attached) the total error
    /// every `iterations_per_log` iterations.
    pub fn with_log(mut self, iterations_per_log: Option<usize>) -> Self {
        self.iterations_per_log = iterations_per_log;
        self
    }

    pub fn hyperparams(&self) -> &Hyperparams {
        &self.hyper
    }

    pub fn train(&self, net: &mut Network, data: &Dataset) -> Result<TrainReport> {
        self.train_observed(net, data, |_, _| Ok(()))
    }

    /// Trains while rendering the error curve in a window. Training runs on
    /// a scoped thread and ships logged iteration states over a channel;
    /// the network itself is never shared.
    pub fn train_gui<Gui: Visualizer>(
        &self,
        net: &mut Network,
        data: &Dataset,
    ) -> Result<TrainReport> {
        std::thread::scope(|scope| -> Result<TrainReport> {
            let (tx, rx) = mpsc::channel();
            let handle = scope.spawn(move || -> Result<TrainReport> {
                self.train_observed(net, data, |iteration, error| {
                    tx.send((iteration, error)).map_err(|_| Error::ThreadErr)
                })
            });

            let _ = eframe::run_native(
                "gradnet",
                eframe::NativeOptions::default(),
                Box::new(|cc| Box::new(Gui::new(cc, rx))),
            );

            handle.join().map_err(|_| Error::ThreadErr)?
        })
    }

    fn train_observed(
        &self,
        net: &mut Network,
        data: &Dataset,
        mut observe: impl FnMut(usize, f64) -> Result<()>,
    ) -> Result<TrainReport> {
        data.validate_for(net.widths())?;

        let mut error_trace = Vec::new();
        let mut iteration = 0;

        let outcome = loop {
            iteration += 1;
            let mut total = 0.0;

            for case in 0..data.cases() {
                net.evaluate(data.input(case))?;
                net.train_step(data.target(case), self.hyper.lambda)?;
                net.evaluate(data.input(case))?;
                total += net.case_error(data.target(case))?;
            }
            error_trace.push(total);

            if self.iterations_per_log.is_some_and(|ipl| iteration % ipl == 0) {
                println!("Iteration {iteration} error: {total}");
                observe(iteration, total)?;
            }

            // threshold first, so a simultaneous cap hit reports convergence
            if total < self.hyper.error_threshold {
                break TrainOutcome::ConvergedByError;
            }
            if iteration >= self.hyper.max_iterations {
                break TrainOutcome::StoppedByIterationLimit;
            }
        };

        let mut predictions = Vec::with_capacity(data.cases());
        for case in 0..data.cases() {
            predictions.push(net.evaluate(data.input(case))?.to_vec());
        }

        Ok(TrainReport {
            outcome,
            iterations: iteration,
            total_error: error_trace.last().copied().unwrap_or(0.0),
            error_trace,
            predictions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Matrix2;

    fn xor_dataset() -> Dataset {
        Dataset::new(
            Matrix2::from_array([[0, 0], [0, 1], [1, 0], [1, 1]]).into(),
            Matrix2::from_array([[0], [1], [1], [0]]).into(),
        )
        .unwrap()
    }

    /// A 2-2-1 weight set that already solves XOR: both hidden nodes see
    /// the input sum at different gains, and the large opposed output
    /// weights turn that difference into the parity answer.
    fn xor_solution() -> Network {
        Network::from_weights(
            &[2, 2, 1],
            vec![
                Matrix2::from_array([[4.0, 2.0], [4.0, 2.0]]),
                Matrix2::from_array([[141.0], [-146.2]]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn rejects_unusable_hyperparams() {
        let zero_cap = Hyperparams {
            max_iterations: 0,
            ..Hyperparams::default()
        };
        assert_eq!(Trainer::new(zero_cap).unwrap_err(), Error::HyperparamErr);

        let inverted = Hyperparams {
            weight_range: 1.0..=-1.0,
            ..Hyperparams::default()
        };
        assert_eq!(Trainer::new(inverted).unwrap_err(), Error::WeightRangeErr);

        let negative_threshold = Hyperparams {
            error_threshold: -0.5,
            ..Hyperparams::default()
        };
        assert_eq!(
            Trainer::new(negative_threshold).unwrap_err(),
            Error::HyperparamErr
        );
    }

    #[test]
    fn rejects_dataset_not_matching_structure() {
        let mut net = Network::new(&[3, 2, 1], -1.0..=1.0).unwrap();
        let trainer = Trainer::new(Hyperparams::default()).unwrap();

        assert_eq!(
            trainer.train(&mut net, &xor_dataset()).unwrap_err(),
            Error::DimensionErr
        );
    }

    #[test]
    fn single_case_error_strictly_decreases_until_threshold() {
        let mut net = Network::from_weights(
            &[2, 1, 1],
            vec![
                Matrix2::from_array([[0.3], [0.4]]),
                Matrix2::from_array([[0.8]]),
            ],
        )
        .unwrap();
        let data = Dataset::new(
            Matrix2::from_array([[1, 1]]).into(),
            Matrix2::from_vec(vec![vec![0.8]]).unwrap(),
        )
        .unwrap();

        let hyper = Hyperparams {
            lambda: 0.5,
            error_threshold: 0.01,
            max_iterations: 10_000,
            ..Hyperparams::default()
        };
        let report = Trainer::new(hyper)
            .unwrap()
            .train(&mut net, &data)
            .unwrap();

        assert_eq!(report.outcome, TrainOutcome::ConvergedByError);
        assert!(report.total_error < 0.01);
        for pair in report.error_trace.windows(2) {
            assert!(pair[1] < pair[0], "error did not strictly decrease");
        }
    }

    #[test]
    fn xor_baseline_with_default_hyperparams() {
        let mut net = xor_solution();
        let data = xor_dataset();

        let report = Trainer::new(Hyperparams::default())
            .unwrap()
            .train(&mut net, &data)
            .unwrap();

        assert!(report.iterations <= 10_000);
        assert!(report.total_error < 0.01);

        // every prediction lands closer to its label than to the complement
        for (case, prediction) in report.predictions.iter().enumerate() {
            let label = data.target(case)[0];
            assert_eq!(
                prediction[0] > 0.5,
                label > 0.5,
                "case {case} predicted {} for label {label}",
                prediction[0]
            );
        }
    }

    #[test]
    fn xor_from_random_weights_terminates() {
        let hyper = Hyperparams::default();
        let mut net = Network::new(&[2, 2, 1], hyper.weight_range.clone()).unwrap();

        let report = Trainer::new(hyper).unwrap().train(&mut net, &xor_dataset()).unwrap();

        assert!(report.iterations <= 10_000);
        assert!(report.total_error.is_finite());
        assert_eq!(report.predictions.len(), 4);
        if report.outcome == TrainOutcome::ConvergedByError {
            for (case, prediction) in report.predictions.iter().enumerate() {
                let label = if case == 1 || case == 2 { 1.0 } else { 0.0 };
                assert_eq!(prediction[0] > 0.5, label > 0.5);
            }
        }
    }

    #[test]
    fn threshold_beats_iteration_limit_when_both_hold() {
        let mut net = xor_solution();
        let hyper = Hyperparams {
            max_iterations: 1,
            ..Hyperparams::default()
        };

        let report = Trainer::new(hyper)
            .unwrap()
            .train(&mut net, &xor_dataset())
            .unwrap();

        assert_eq!(report.outcome, TrainOutcome::ConvergedByError);
        assert_eq!(report.iterations, 1);
    }

    #[test]
    fn always_terminates_within_iteration_cap() {
        let mut net = Network::new(&[2, 3, 1], -2.0..=2.0).unwrap();
        let hyper = Hyperparams {
            error_threshold: 0.0,
            max_iterations: 25,
            ..Hyperparams::default()
        };

        let report = Trainer::new(hyper)
            .unwrap()
            .train(&mut net, &xor_dataset())
            .unwrap();

        assert_eq!(report.outcome, TrainOutcome::StoppedByIterationLimit);
        assert_eq!(report.iterations, 25);
        assert_eq!(report.error_trace.len(), 25);
    }
}
