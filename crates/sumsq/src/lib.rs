//! SumSq-rs library: application logic for the `sumsq` binary.

pub mod app;
pub mod config;
pub mod errors;
pub mod version;
