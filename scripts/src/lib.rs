//! Scripts for deploying the FIAT guard suite and reattaching to a prior deployment.

#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod env;
pub mod errors;
pub mod logging;

/// Our deploy utils
pub mod deploy;

/// Our address record utils
pub mod output_writer;

pub mod tx;

#[cfg(test)]
mod test_utils;
