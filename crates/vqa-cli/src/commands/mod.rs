//! CLI command implementations.

pub mod common;
pub mod h2;
pub mod ising;
