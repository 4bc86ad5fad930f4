/// Error type for gradnet
#[derive(Debug, PartialEq)]
pub enum Error {
    /// Indicates some vector or table dimension disagrees with the
    /// configured network structure.
    DimensionErr,
    /// A network structure with fewer than two layers or a zero-width layer.
    StructureErr,
    /// A random-weight range whose minimum exceeds its maximum.
    WeightRangeErr,
    /// Hyperparameters that cannot drive a training run.
    HyperparamErr,
    /// A numeric field could not be parsed while loading.
    ParseErr(String),
    /// A file or image could not be read.
    LoadErr(String),
    /// A worker thread died while feeding the GUI.
    ThreadErr,
}

pub type Result<T> = std::result::Result<T, Error>;
