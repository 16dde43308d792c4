//! Command surface and pipeline runner for `edu-stats`.
//!
//! The binary in `main.rs` only parses arguments and initialises logging;
//! everything it dispatches to lives here so it can be tested.

#![allow(async_fn_in_trait)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod probe;
pub mod steps;

pub use error::{Error, Result};

#[cfg(test)]
mod tests;
