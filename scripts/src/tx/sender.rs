//! Contract calls submitted with a padded gas estimate.
//!
//! Gas is estimated right before submission and the limit is set to 130% of
//! the estimate, so small state or price changes between the two do not make
//! the transaction run out of gas. Errors from estimation or submission are
//! returned as-is, nothing is retried.

use ethers::{
    abi::{Token, Tokenize},
    contract::{Contract, ContractCall},
    providers::{Middleware, PendingTransaction},
    types::{TransactionReceipt, U256, U64},
};
use tracing::{debug, info};

use crate::{
    constants::{GAS_MARGIN_DENOMINATOR, GAS_MARGIN_NUMERATOR},
    errors::ScriptError,
};

/// Scale a gas estimate by the safety margin, rounding down
pub fn pad_gas(estimate: U256) -> U256 {
    estimate * U256::from(GAS_MARGIN_NUMERATOR) / U256::from(GAS_MARGIN_DENOMINATOR)
}

/// Build the call to `method`, with its gas limit set from a padded estimate
async fn padded_call<M: Middleware, T: Tokenize>(
    contract: &Contract<M>,
    method: &str,
    args: T,
) -> Result<ContractCall<M, Token>, ScriptError> {
    let call = contract
        .method::<_, Token>(method, args)
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    let estimate = call
        .estimate_gas()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    let gas_limit = pad_gas(estimate);
    debug!("Gas for {}: estimated {}, limit {}", method, estimate, gas_limit);

    Ok(call.gas(gas_limit))
}

/// Whether a mined transaction executed successfully
pub fn succeeded(receipt: &TransactionReceipt) -> bool {
    receipt.status == Some(U64::one())
}

/// Send a call to `method`, returning once the node accepted the transaction.
///
/// The returned transaction can be awaited for its receipt later on.
pub async fn send<'a, M: Middleware, T: Tokenize>(
    contract: &'a Contract<M>,
    method: &str,
    args: T,
) -> Result<PendingTransaction<'a, M::Provider>, ScriptError> {
    let call = padded_call(contract, method, args).await?;

    let tx_hash = call
        .send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
        .tx_hash();
    info!("Pending {} transaction... {:?}", method, tx_hash);

    Ok(PendingTransaction::new(
        tx_hash,
        contract.client_ref().provider(),
    ))
}

/// Send a call to `method` and wait for it to be mined, failing if it reverted
pub async fn send_and_wait<M: Middleware, T: Tokenize>(
    contract: &Contract<M>,
    method: &str,
    args: T,
) -> Result<TransactionReceipt, ScriptError> {
    let pending_tx = send(contract, method, args).await?;

    // Wait for the transaction to be included.
    let receipt = pending_tx
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
        .ok_or_else(|| {
            ScriptError::ContractInteraction(format!("{} transaction dropped from mempool", method))
        })?;

    if !succeeded(&receipt) {
        return Err(ScriptError::ContractInteraction(format!(
            "{} reverted in {:?}",
            method, receipt.transaction_hash
        )));
    }
    info!(
        "{} tx done on block: {:?}",
        method,
        receipt.block_number.unwrap_or_default()
    );

    Ok(receipt)
}
