//! Numeric helpers shared by the evaluator and its tests.
pub mod compare;

pub use compare::{assert_all_close, max_abs_diff};
