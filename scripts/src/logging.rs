//! Tracing subscriber setup

use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    fmt,
    prelude::*,
};

/// Tracing targets of the chain client crates
const CHAIN_CLIENT_TARGETS: &[&str] = &[
    "ethers_core",
    "ethers_contract",
    "ethers_middleware",
    "ethers_providers",
    "ethers_signers",
];

/// Verbosity of the scripts and, separately, of the chain client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    /// Level for the scripts themselves
    pub level: LevelFilter,
    /// Level for the chain client, kept quiet by default
    pub chain_client_level: LevelFilter,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            chain_client_level: LevelFilter::ERROR,
        }
    }
}

impl LogConfig {
    /// The per-target filter this configuration describes
    pub fn targets(&self) -> Targets {
        CHAIN_CLIENT_TARGETS
            .iter()
            .fold(Targets::new().with_default(self.level), |targets, target| {
                targets.with_target(*target, self.chain_client_level)
            })
    }
}

/// Install the global subscriber, once per process
pub fn init_logging(config: &LogConfig) {
    tracing_subscriber::registry()
        .with(fmt::layer().pretty())
        .with(config.targets())
        .init();
}
