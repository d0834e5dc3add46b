//! Shared utilities for Trellis.
//!
//! This crate provides cross-cutting concerns used by all other Trellis crates:
//! error types, filesystem helpers, content hashing, and Cargo-style status
//! output.

pub mod errors;
pub mod fs;
pub mod hash;
pub mod progress;
