//! Implementations of the CLI commands

use ethers::{
    abi::Token,
    contract::Contract,
    types::{Address, Bytes, U256},
    utils::hex,
};
use tracing::info;

use crate::{
    artifacts::Artifacts,
    cli::{DeployArgs, DeployVaultArgs, SaveAddressArgs, SelectorArgs, SendArgs},
    config::ScriptConfig,
    deploy::{deploy_contract, deploy_via_vault_factory},
    env::Environment,
    errors::ScriptError,
    output_writer::{AddressRecord, AddressStore},
    tx::{
        abi::{constructor_params, encode_4byte, function_params, tokenize_args, vault_factory_abi},
        client::{chain_id, create_rpc_provider},
        sender::{send, send_and_wait},
    },
};

/// Deploy a single contract from its artifact
pub async fn deploy(args: DeployArgs, config: &ScriptConfig) -> Result<(), ScriptError> {
    let artifacts = Artifacts::load(&config.artifacts_path)?;
    let artifact = artifacts.lookup(&args.source, &args.contract)?;
    let constructor_args = tokenize_args(constructor_params(&artifact.abi), &args.args)?;

    let client = create_rpc_provider(config).await?;
    let store = AddressStore::new(&config.addresses_dir);

    deploy_contract(
        client,
        &store,
        &args.name,
        &artifact,
        Token::Tuple(constructor_args),
    )
    .await?;
    info!("Deployed with success");

    Ok(())
}

/// Deploy a vault through the recorded vault factory
pub async fn deploy_vault(args: DeployVaultArgs, config: &ScriptConfig) -> Result<(), ScriptError> {
    let artifacts = Artifacts::load(&config.artifacts_path)?;
    let artifact = artifacts.lookup(&args.source, &args.contract)?;
    let params = parse_hex_bytes(&args.params)?;

    let client = create_rpc_provider(config).await?;
    let store = AddressStore::new(&config.addresses_dir);
    let record = store.load_or_default(chain_id(client.as_ref()).await?)?;

    let vault_factory = Contract::new(
        resolve_address(&record, &args.factory)?,
        vault_factory_abi()?,
        client.clone(),
    );
    let implementation = artifact.attach(
        resolve_address(&record, &args.implementation)?,
        client.clone(),
    );

    deploy_via_vault_factory(
        client,
        &store,
        &vault_factory,
        &args.name,
        &implementation,
        params,
        U256::from(config.relay_gas_limit),
    )
    .await?;
    info!("Deployed with success");

    Ok(())
}

/// Call a method on one of the deployment's contracts
pub async fn send_call(args: SendArgs, config: &ScriptConfig) -> Result<(), ScriptError> {
    let artifacts = Artifacts::load(&config.artifacts_path)?;
    let client = create_rpc_provider(config).await?;
    let store = AddressStore::new(&config.addresses_dir);

    let env = Environment::setup(client, &artifacts, &store).await?;
    let contract = env.get(&args.role)?;
    let call_args = Token::Tuple(tokenize_args(
        function_params(contract.abi(), &args.method)?,
        &args.args,
    )?);

    if args.wait {
        let receipt = send_and_wait(contract, &args.method, call_args).await?;
        println!("txHash: {:?}", receipt.transaction_hash);
    } else {
        let pending_tx = send(contract, &args.method, call_args).await?;
        println!("txHash: {:?}", pending_tx.tx_hash());
    }

    Ok(())
}

/// Print the address of every contract of the deployment
pub async fn print_env(config: &ScriptConfig) -> Result<(), ScriptError> {
    let artifacts = Artifacts::load(&config.artifacts_path)?;
    let client = create_rpc_provider(config).await?;
    let store = AddressStore::new(&config.addresses_dir);

    let env = Environment::setup(client, &artifacts, &store).await?;
    for (role, contract) in env.iter() {
        println!("{role}: {:?}", contract.address());
    }

    Ok(())
}

/// Record an address for the network of the configured RPC
pub async fn save_address(args: SaveAddressArgs, config: &ScriptConfig) -> Result<(), ScriptError> {
    let address = parse_address(&args.address)?;
    let client = create_rpc_provider(config).await?;
    let store = AddressStore::new(&config.addresses_dir);

    let chain_id = chain_id(client.as_ref()).await?;
    store.save(chain_id, &args.name, address)?;
    info!("Saved {} as {:?} on chain {}", args.name, address, chain_id);

    Ok(())
}

/// Print the padded selector word of a function
pub fn print_selector(args: SelectorArgs, config: &ScriptConfig) -> Result<(), ScriptError> {
    let artifacts = Artifacts::load(&config.artifacts_path)?;
    let artifact = artifacts.lookup(&args.source, &args.contract)?;

    println!("{:?}", encode_4byte(&artifact.abi, &args.function)?);

    Ok(())
}

/// Interpret `value` as an address, or as a name recorded in `record`
fn resolve_address(record: &AddressRecord, value: &str) -> Result<Address, ScriptError> {
    if value.starts_with("0x") {
        return parse_address(value);
    }

    record
        .get(value)
        .copied()
        .ok_or_else(|| ScriptError::RoleNotFound(value.to_string()))
}

/// Parse a `0x` prefixed address
fn parse_address(value: &str) -> Result<Address, ScriptError> {
    value
        .parse::<Address>()
        .map_err(|e| ScriptError::InvalidArgument(format!("`{value}` is not an address: {e}")))
}

/// Parse hex data, with or without `0x` prefix
fn parse_hex_bytes(value: &str) -> Result<Bytes, ScriptError> {
    hex::decode(value.strip_prefix("0x").unwrap_or(value))
        .map(Bytes::from)
        .map_err(|e| ScriptError::InvalidArgument(format!("`{value}` is not hex data: {e}")))
}
