//! boundary-cli: command line front end for `boundary-eval`.
pub mod evaluate;
