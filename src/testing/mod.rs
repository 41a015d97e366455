//! Testing utilities and mock implementations
//!
//! Lets tests build a ready (or deliberately not ready) orchestrator and
//! script handler behavior without any platform credentials.

pub mod mocks;

pub use mocks::*;
