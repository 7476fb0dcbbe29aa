//! Resolution of the script configuration from CLI arguments and environment

use std::{env, path::PathBuf};

use crate::{
    cli::Cli,
    constants::{DEFAULT_ADDRESSES_DIR, DEFAULT_ARTIFACTS_PATH, DEFAULT_RELAY_GAS_LIMIT, DEFAULT_RPC},
    errors::ScriptError,
    logging::LogConfig,
};

/// Environment variable holding the deployer private key
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

/// Environment variable holding the RPC endpoint
pub const RPC_URL_ENV: &str = "RPC_URL";

/// Everything a script needs to run
#[derive(Debug, Clone)]
pub struct ScriptConfig {
    /// Network RPC URL
    pub rpc_url: String,
    /// Hex private key of the deployer, only needed by commands that touch the chain
    pub private_key: Option<String>,
    /// Compiled contracts manifest
    pub artifacts_path: PathBuf,
    /// Directory of the `<chainId>.json` address records
    pub addresses_dir: PathBuf,
    /// Gas limit of `createVault` calls
    pub relay_gas_limit: u64,
    /// Log verbosity
    pub log: LogConfig,
}

impl ScriptConfig {
    /// Resolve the configuration, CLI arguments taking precedence over the environment
    pub fn from_cli(cli: &Cli) -> Self {
        Self::resolve(cli, |key| env::var(key).ok())
    }

    /// Resolve the configuration, looking up environment variables through `lookup`
    fn resolve(cli: &Cli, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let private_key = cli.priv_key.clone().or_else(|| lookup(PRIVATE_KEY_ENV));

        let rpc_url = cli
            .rpc_url
            .clone()
            .or_else(|| lookup(RPC_URL_ENV))
            .unwrap_or_else(|| DEFAULT_RPC.to_string());

        Self {
            rpc_url,
            private_key,
            artifacts_path: cli
                .artifacts
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACTS_PATH)),
            addresses_dir: cli
                .addresses_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ADDRESSES_DIR)),
            relay_gas_limit: cli.relay_gas_limit.unwrap_or(DEFAULT_RELAY_GAS_LIMIT),
            log: LogConfig {
                level: cli.log_level,
                chain_client_level: cli.chain_log_level,
            },
        }
    }

    /// The deployer private key, required to sign anything
    pub fn private_key(&self) -> Result<&str, ScriptError> {
        self.private_key.as_deref().ok_or_else(|| {
            ScriptError::ClientInitialization(format!(
                "no private key, pass --priv-key or set {PRIVATE_KEY_ENV}"
            ))
        })
    }
}
