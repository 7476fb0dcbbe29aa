//! Contract deployment, either directly or relayed through the vault factory.
//!
//! Both paths report the same three operator lines and record the new address
//! in the address store of the signer's network.

use ethers::{
    types::{Address, TxHash},
    utils::to_checksum,
};
use tracing::info;

use crate::{errors::ScriptError, output_writer::AddressStore};

mod direct;
mod relay;

pub use direct::deploy_contract;
pub use relay::{deploy_via_vault_factory, find_vault_instance};

/// Report a deployment on stdout and record its address
fn record_deployment(
    store: &AddressStore,
    chain_id: u64,
    name: &str,
    address: Address,
    tx_hash: TxHash,
) -> Result<(), ScriptError> {
    let checksummed = to_checksum(&address, None);
    println!("{name}: {checksummed}");
    println!("  address: {checksummed}");
    println!("  txHash:  {tx_hash:?}");
    info!(contract = name, chain_id, "Recording deployment at {}", checksummed);

    store.save(chain_id, name, address)
}
