//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

use crate::{
    commands::{deploy, deploy_vault, print_env, print_selector, save_address, send_call},
    config::ScriptConfig,
    errors::ScriptError,
};

/// Scripts for deploying the FIAT guard suite & interacting with a deployment
#[derive(Parser)]
pub struct Cli {
    /// Private key of the deployer, defaults to `PRIVATE_KEY`
    #[arg(short, long)]
    pub priv_key: Option<String>,

    /// Network RPC URL, defaults to `RPC_URL`
    #[arg(short, long)]
    pub rpc_url: Option<String>,

    /// Path of the compiled contracts manifest
    #[arg(long)]
    pub artifacts: Option<PathBuf>,

    /// Directory holding the `<chainId>.json` address records
    #[arg(long)]
    pub addresses_dir: Option<PathBuf>,

    /// Gas limit of vault factory deployments
    #[arg(long)]
    pub relay_gas_limit: Option<u64>,

    /// Log level of the scripts
    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,

    /// Log level of the chain client
    #[arg(long, default_value = "error")]
    pub chain_log_level: LevelFilter,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The possible CLI commands
#[derive(Subcommand)]
pub enum Command {
    /// Deploy a contract from its compiled artifact
    Deploy(DeployArgs),
    /// Deploy a vault through the vault factory
    DeployVault(DeployVaultArgs),
    /// Call a method of a recorded contract
    Send(SendArgs),
    /// Attach to every contract of the deployment and print their addresses
    Env,
    /// Record an address for the current network
    SaveAddress(SaveAddressArgs),
    /// Print the padded selector word of a function
    Selector(SelectorArgs),
}

impl Command {
    /// Run the command
    pub async fn run(self, config: &ScriptConfig) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => {
                info!("Deploying {}...", args.name);
                deploy(args, config).await
            }
            Command::DeployVault(args) => {
                info!("Deploying vault {}...", args.name);
                deploy_vault(args, config).await
            }
            Command::Send(args) => {
                info!("Calling {}.{}...", args.role, args.method);
                send_call(args, config).await
            }
            Command::Env => {
                info!("Setting up environment...");
                print_env(config).await
            }
            Command::SaveAddress(args) => save_address(args, config).await,
            Command::Selector(args) => print_selector(args, config),
        }
    }
}

/// Deploy a contract
#[derive(Args)]
pub struct DeployArgs {
    /// Name to record the contract under
    #[arg(short, long)]
    pub name: String,
    /// Source file of the contract artifact
    #[arg(short, long)]
    pub source: String,
    /// Contract name of the artifact
    #[arg(short, long)]
    pub contract: String,
    /// Constructor arguments
    pub args: Vec<String>,
}

/// Deploy a vault through the vault factory
#[derive(Args)]
pub struct DeployVaultArgs {
    /// Name to record the vault under
    #[arg(short, long)]
    pub name: String,
    /// Vault factory, as an address or a recorded name
    #[arg(long, default_value = "vaultFactory")]
    pub factory: String,
    /// Vault implementation to clone, as an address or a recorded name
    #[arg(short, long)]
    pub implementation: String,
    /// Source file of the implementation artifact
    #[arg(short, long)]
    pub source: String,
    /// Contract name of the implementation artifact
    #[arg(short, long)]
    pub contract: String,
    /// Hex encoded vault parameters
    #[arg(long, default_value = "0x")]
    pub params: String,
}

/// Call a method of a recorded contract
#[derive(Args)]
pub struct SendArgs {
    /// Role of the contract in the deployment
    #[arg(short, long)]
    pub role: String,
    /// Method to call
    #[arg(short, long)]
    pub method: String,
    /// Wait for the transaction to be mined
    #[arg(short, long)]
    pub wait: bool,
    /// Method arguments
    pub args: Vec<String>,
}

/// Record an address
#[derive(Args)]
pub struct SaveAddressArgs {
    /// Name to record the address under
    #[arg(short, long)]
    pub name: String,
    /// The address
    #[arg(short, long)]
    pub address: String,
}

/// Compute a selector word
#[derive(Args)]
pub struct SelectorArgs {
    /// Source file of the contract artifact
    #[arg(short, long)]
    pub source: String,
    /// Contract name of the artifact
    #[arg(short, long)]
    pub contract: String,
    /// Function name
    #[arg(short, long)]
    pub function: String,
}
