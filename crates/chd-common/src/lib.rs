//! Shared utilities for the CHD risk crates.
//!
//! This crate provides the Polars `AnyValue` helpers every stage of the
//! reconciliation pipeline uses to read cells regardless of their dtype.

pub mod value;

pub use value::{any_to_f64, any_to_string, any_to_string_opt, format_numeric, parse_f64};
