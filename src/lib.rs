pub mod dataset;
pub mod matrix;
pub mod network;
pub mod pels;
pub mod prelude;
pub mod viz;
