//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the validated time series (`Series`, `Column`)
//! - dataset schema enums (`DatasetKind`, `DatasetVariant`)
//! - computed outputs (`Kpi`, `Peak`, `DerivedSeries`, `StackSlice`)

pub mod types;

pub use types::*;
