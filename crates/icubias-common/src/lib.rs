//! Polars helpers shared by the icubias crates.

pub mod polars;

pub use polars::{column_f64_values, column_labels};
