//! Data sources.
//!
//! The dashboard reads real datasets from CSV (`io::ingest`); this module only
//! hosts the seeded synthetic generator behind `covd sample`.

pub mod sample;

pub use sample::*;
