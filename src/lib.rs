//! ESOP exercise and sale strategy calculations for the Indian tax regime.
//!
//! [`core`] holds the pure calculation engine, [`input`] turns raw form text
//! into engine inputs.

pub mod core;
pub mod input;
