pub mod threshold;
pub mod trainer;

use crate::matrix::Matrix2;
use crate::prelude::*;
use rand::distributions::{Distribution, Uniform};
use std::ops::RangeInclusive;

use self::threshold::{sigmoid, sigmoid_deriv};

/// An N-layer perceptron. Layer 0 is the input layer; every connection
/// stage n holds one weight per (source node, destination node) pair and
/// there are no bias terms.
///
/// The structure is fixed at construction. Activations and thetas are
/// overwritten by each call to [`Network::evaluate`] and stay readable
/// until the next call; psis are overwritten by each
/// [`Network::train_step`].
#[derive(Debug)]
pub struct Network {
    widths: Vec<usize>,
    /// One (source width) x (destination width) table per connection stage.
    weights: Vec<Matrix2<f64>>,
    activations: Vec<Vec<f64>>,
    /// Pre-activation weighted sums; thetas[0] stays empty since the input
    /// layer has none.
    thetas: Vec<Vec<f64>>,
    /// Backpropagated error signals, laid out like thetas.
    psis: Vec<Vec<f64>>,
}

impl Network {
    /// Builds a network for the given layer widths with every weight drawn
    /// independently from a uniform distribution over `init_range`.
    pub fn new(widths: &[usize], init_range: RangeInclusive<f64>) -> Result<Network> {
        validate_widths(widths)?;
        validate_range(&init_range)?;

        let mut rng = rand::thread_rng();
        let die = Uniform::from(init_range);

        let mut weights = Vec::with_capacity(widths.len() - 1);
        for stage in 0..widths.len() - 1 {
            let table = Matrix2::from_vec(
                (0..widths[stage])
                    .map(|_| {
                        (0..widths[stage + 1])
                            .map(|_| die.sample(&mut rng))
                            .collect::<Vec<_>>()
                    })
                    .collect(),
            )?;
            weights.push(table);
        }

        Ok(Self::assemble(widths, weights))
    }

    /// Builds a network from a caller-supplied weight set, one table per
    /// connection stage, for reproducible runs.
    pub fn from_weights(widths: &[usize], weights: Vec<Matrix2<f64>>) -> Result<Network> {
        validate_widths(widths)?;

        if weights.len() != widths.len() - 1 {
            return Err(Error::DimensionErr);
        }
        for (stage, table) in weights.iter().enumerate() {
            if table.dim() != (widths[stage], widths[stage + 1]) {
                return Err(Error::DimensionErr);
            }
        }

        Ok(Self::assemble(widths, weights))
    }

    fn assemble(widths: &[usize], weights: Vec<Matrix2<f64>>) -> Network {
        let activations = widths.iter().map(|&w| vec![0.0; w]).collect();
        let signals: Vec<Vec<f64>> = widths
            .iter()
            .enumerate()
            .map(|(n, &w)| if n == 0 { Vec::new() } else { vec![0.0; w] })
            .collect();

        Network {
            widths: widths.to_vec(),
            weights,
            activations,
            thetas: signals.clone(),
            psis: signals,
        }
    }

    /// Re-draws every weight from a uniform distribution over `range`.
    pub fn randomize(&mut self, range: RangeInclusive<f64>) -> Result<()> {
        validate_range(&range)?;

        let mut rng = rand::thread_rng();
        let die = Uniform::from(range);

        for table in self.weights.iter_mut() {
            for start in 0..table.rows() {
                for end in 0..table.cols() {
                    table[(start, end)] = die.sample(&mut rng);
                }
            }
        }
        Ok(())
    }

    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    /// The current weight tables, one per connection stage.
    pub fn weights(&self) -> &[Matrix2<f64>] {
        &self.weights
    }

    /// Activations of one layer as left by the last forward pass.
    pub fn activation(&self, layer: usize) -> &[f64] {
        &self.activations[layer]
    }

    /// Forward propagation. Copies `input` into the layer-0 activations,
    /// then fills every subsequent layer's thetas and activations in place
    /// and returns the final-layer activations.
    ///
    /// Non-finite inputs are not rejected; NaN propagates through per IEEE
    /// semantics.
    pub fn evaluate(&mut self, input: &[f64]) -> Result<&[f64]> {
        if input.len() != self.widths[0] {
            return Err(Error::DimensionErr);
        }
        self.activations[0].copy_from_slice(input);

        for n in 1..self.widths.len() {
            let (done, rest) = self.activations.split_at_mut(n);
            let previous = &done[n - 1];
            let current = &mut rest[0];
            let stage = &self.weights[n - 1];

            for end in 0..current.len() {
                let mut theta = 0.0;
                for (start, a) in previous.iter().enumerate() {
                    theta += a * stage[(start, end)];
                }
                self.thetas[n][end] = theta;
                current[end] = sigmoid(theta);
            }
        }

        Ok(&self.activations[self.widths.len() - 1])
    }

    /// Error of the last forward pass against an expected output vector:
    /// `0.5 * sum((T_i - F_i)^2)`. The 0.5 cancels the factor of two in the
    /// gradient and must not be dropped.
    pub fn case_error(&self, target: &[f64]) -> Result<f64> {
        let output = &self.activations[self.widths.len() - 1];
        if target.len() != output.len() {
            return Err(Error::DimensionErr);
        }

        let sum: f64 = output
            .iter()
            .zip(target.iter())
            .map(|(f, t)| (t - f) * (t - f))
            .sum();
        Ok(0.5 * sum)
    }

    /// One backpropagation step for the training case whose forward pass
    /// populated the current activations and thetas.
    ///
    /// Error signals are computed from the output layer back to layer 1, a
    /// layer's psis reading only the completed psis of the layer after it.
    /// Every weight delta is applied after all signals are known, so each
    /// update uses the activations and psis exactly as the preceding
    /// forward pass left them.
    pub fn train_step(&mut self, target: &[f64], lambda: f64) -> Result<()> {
        let last = self.widths.len() - 1;
        if target.len() != self.widths[last] {
            return Err(Error::DimensionErr);
        }

        for i in 0..self.widths[last] {
            let omega = target[i] - self.activations[last][i];
            self.psis[last][i] = omega * sigmoid_deriv(self.thetas[last][i]);
        }

        for n in (1..last).rev() {
            let (done, rest) = self.psis.split_at_mut(n + 1);
            let current = &mut done[n];
            let next = &rest[0];
            let stage = &self.weights[n];

            for start in 0..current.len() {
                let mut big_omega = 0.0;
                for (end, psi) in next.iter().enumerate() {
                    big_omega += psi * stage[(start, end)];
                }
                current[start] = big_omega * sigmoid_deriv(self.thetas[n][start]);
            }
        }

        for n in 0..last {
            let stage = &mut self.weights[n];
            for start in 0..self.widths[n] {
                for end in 0..self.widths[n + 1] {
                    stage[(start, end)] +=
                        lambda * self.activations[n][start] * self.psis[n + 1][end];
                }
            }
        }

        Ok(())
    }
}

fn validate_widths(widths: &[usize]) -> Result<()> {
    if widths.len() < 2 || widths.iter().any(|&w| w == 0) {
        return Err(Error::StructureErr);
    }
    Ok(())
}

fn validate_range(range: &RangeInclusive<f64>) -> Result<()> {
    if range.start() > range.end() {
        return Err(Error::WeightRangeErr);
    }
    Ok(())
}
