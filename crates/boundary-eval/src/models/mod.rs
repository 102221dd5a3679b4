pub mod linear;
pub mod predictor_trait;

pub use linear::{format_result, LinearModel, Link};
pub use predictor_trait::{FnPredictor, Predictor};
