use std::{fs, path::Path};

use crate::matrix::Matrix2;
use crate::prelude::*;

/// Ordered training data, one input row and one expected-output row per
/// case. Fixed once constructed; the network only ever reads it.
#[derive(Debug)]
pub struct Dataset {
    inputs: Matrix2<f64>,
    targets: Matrix2<f64>,
}

impl Dataset {
    pub fn new(inputs: Matrix2<f64>, targets: Matrix2<f64>) -> Result<Dataset> {
        if inputs.rows() != targets.rows() {
            return Err(Error::DimensionErr);
        }
        Ok(Dataset { inputs, targets })
    }

    /// Parses whitespace-separated numeric text against declared counts.
    /// Every case contributes `input_len` values to `inputs` and
    /// `target_len` values to `targets`; any shortfall or surplus is a
    /// load failure, not a truncation.
    pub fn parse(
        inputs: &str,
        targets: &str,
        cases: usize,
        input_len: usize,
        target_len: usize,
    ) -> Result<Dataset> {
        let inputs = parse_table(inputs, cases, input_len)?;
        let targets = parse_table(targets, cases, target_len)?;
        Dataset::new(inputs, targets)
    }

    /// Reads two flat numeric text files, one for inputs and one for
    /// expected outputs.
    pub fn load<P: AsRef<Path>>(
        inputs_path: P,
        targets_path: P,
        cases: usize,
        input_len: usize,
        target_len: usize,
    ) -> Result<Dataset> {
        let inputs = read_text(inputs_path)?;
        let targets = read_text(targets_path)?;
        Dataset::parse(&inputs, &targets, cases, input_len, target_len)
    }

    pub fn cases(&self) -> usize {
        self.inputs.rows()
    }

    pub fn input(&self, case: usize) -> &[f64] {
        self.inputs.row(case)
    }

    pub fn target(&self, case: usize) -> &[f64] {
        self.targets.row(case)
    }

    /// Checks the per-case vector lengths against a network's layer
    /// widths before training starts.
    pub fn validate_for(&self, widths: &[usize]) -> Result<()> {
        if self.inputs.cols() != widths[0] || self.targets.cols() != widths[widths.len() - 1] {
            return Err(Error::DimensionErr);
        }
        Ok(())
    }
}

fn read_text<P: AsRef<Path>>(path: P) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::LoadErr(e.to_string()))
}

fn parse_table(text: &str, rows: usize, cols: usize) -> Result<Matrix2<f64>> {
    let mut values = Vec::with_capacity(rows * cols);
    for token in text.split_whitespace() {
        let value: f64 = token
            .parse()
            .map_err(|_| Error::ParseErr(format!("bad number {token:?}")))?;
        values.push(value);
    }

    if values.len() != rows * cols {
        return Err(Error::ParseErr(format!(
            "expected {} values, got {}",
            rows * cols,
            values.len()
        )));
    }
    if cols == 0 {
        return Matrix2::from_vec(Vec::new());
    }

    Matrix2::from_vec(values.chunks(cols).map(|row| row.to_vec()).collect())
}
