use std::sync::Arc;

use ethers::{abi::Tokenize, contract::Contract, providers::Middleware};
use tracing::{debug, info};

use crate::{
    artifacts::Artifact, deploy::record_deployment, errors::ScriptError,
    output_writer::AddressStore,
    tx::{client::chain_id, sender::succeeded},
};

/// Deploy `artifact` with `args` as constructor arguments, recording it under `name`
pub async fn deploy_contract<M: Middleware, T: Tokenize>(
    client: Arc<M>,
    store: &AddressStore,
    name: &str,
    artifact: &Artifact,
    args: T,
) -> Result<Contract<M>, ScriptError> {
    if artifact.bytecode.is_empty() {
        return Err(ScriptError::ContractDeployment(format!(
            "{} has no bytecode",
            artifact.contract_name
        )));
    }

    let chain_id = chain_id(client.as_ref()).await?;
    info!("Deploying {} to chain {}", name, chain_id);
    debug!("Bytecode length: {} bytes", artifact.bytecode.len());

    let (contract, receipt) = artifact
        .factory(client)
        .deploy(args)
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?
        .send_with_receipt()
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

    if !succeeded(&receipt) {
        return Err(ScriptError::ContractDeployment(format!(
            "{} creation reverted in {:?}",
            name, receipt.transaction_hash
        )));
    }

    record_deployment(
        store,
        chain_id,
        name,
        contract.address(),
        receipt.transaction_hash,
    )?;

    Ok(contract)
}
