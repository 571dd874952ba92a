//! End-to-end tests for the Enlyn toolchain
//!
//! These tests parse, check, compile and execute whole programs, verifying
//! what they print through `IO.out`.

mod harness;
mod classes;
mod control_flow;
mod errors;
mod operators;
mod options;
mod overrides;
mod runtime;

pub use harness::*;
