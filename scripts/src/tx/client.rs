use std::{str::FromStr, sync::Arc};

use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
};
use tracing::info;

use crate::{config::ScriptConfig, errors::ScriptError};

/// An Ethers provider that uses a `LocalWallet` to generate signatures
/// & interfaces with the RPC endpoint over HTTP
pub type RpcProvider = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Sets up the signer-bound client used by every script, from the resolved configuration.
/// The wallet is bound to the chain id reported by the node.
pub async fn create_rpc_provider(config: &ScriptConfig) -> Result<Arc<RpcProvider>, ScriptError> {
    let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    // Create the wallet from priv key
    let wallet = LocalWallet::from_str(config.private_key()?.trim_start_matches("0x"))
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    // Fetch chain id
    let chain_id = chain_id(&provider)
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    info!(
        "Build client for {:?} on chain ID: {}",
        wallet.address(),
        chain_id
    );

    // Bound the wallet to the provider, via a middleware
    Ok(Arc::new(SignerMiddleware::new(
        provider,
        wallet.with_chain_id(chain_id),
    )))
}

/// The chain id of the network `client` is connected to
pub async fn chain_id<M: Middleware>(client: &M) -> Result<u64, ScriptError> {
    let chain_id = client
        .get_chainid()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    Ok(chain_id.as_u64())
}
