//! Reattach to every contract of a prior deployment.
//!
//! The deployment topology is the [`TOPOLOGY`] table: each role name maps to
//! the artifact its contract was compiled into. Setting up an environment
//! binds every role to the address recorded for it on the current network, or
//! fails as a whole.

use std::{collections::BTreeMap, sync::Arc};

use ethers::{contract::Contract, providers::Middleware};
use tracing::info;

use crate::{
    artifacts::Artifacts,
    errors::ScriptError,
    output_writer::{AddressRecord, AddressStore},
    tx::client::chain_id,
};

/// A named contract of the deployment and where its artifact lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Role {
    /// Name the contract is recorded under
    pub name: &'static str,
    /// Source file of its artifact
    pub source_path: &'static str,
    /// Contract name of its artifact
    pub contract_name: &'static str,
}

impl Role {
    /// Shorthand for table entries
    const fn new(name: &'static str, source_path: &'static str, contract_name: &'static str) -> Self {
        Self {
            name,
            source_path,
            contract_name,
        }
    }
}

/// Every contract of a full deployment
pub const TOPOLOGY: &[Role] = &[
    Role::new("deployer", "src/Deployer.sol", "Deployer"),
    Role::new("tokenGov", "src/test/utils/TestERC20.sol", "TestERC20"),
    Role::new("fiat", "lib/fiat/src/FIAT.sol", "FIAT"),
    Role::new("codex", "lib/fiat/src/Codex.sol", "Codex"),
    Role::new("moneta", "lib/fiat/src/Moneta.sol", "Moneta"),
    Role::new("collybus", "lib/fiat/src/Collybus.sol", "Collybus"),
    Role::new("publican", "lib/fiat/src/Publican.sol", "Publican"),
    Role::new("limes", "lib/fiat/src/Limes.sol", "Limes"),
    Role::new(
        "collateralAuction",
        "lib/fiat/src/auctions/NoLossCollateralAuction.sol",
        "NoLossCollateralAuction",
    ),
    Role::new("debtAuction", "lib/fiat/src/auctions/DebtAuction.sol", "DebtAuction"),
    Role::new(
        "surplusAuction",
        "lib/fiat/src/auctions/SurplusAuction.sol",
        "SurplusAuction",
    ),
    Role::new("aer", "lib/fiat/src/Aer.sol", "Aer"),
    Role::new("tokenA", "src/test/utils/TestERC20.sol", "TestERC20"),
    Role::new("auctionGuard", "src/AuctionGuard.sol", "AuctionGuard"),
    Role::new("codexGuard", "src/CodexGuard.sol", "CodexGuard"),
    Role::new("collybusGuard", "src/CollybusGuard.sol", "CollybusGuard"),
    Role::new("vaultGuard", "src/VaultGuard.sol", "VaultGuard"),
];

/// Live handles to every contract of a deployment, by role name
pub struct Environment<M> {
    /// Role name => bound contract
    contracts: BTreeMap<&'static str, Contract<M>>,
}

impl<M: Middleware> Environment<M> {
    /// Bind the full [`TOPOLOGY`] on the network `client` is connected to
    pub async fn setup(
        client: Arc<M>,
        artifacts: &Artifacts,
        store: &AddressStore,
    ) -> Result<Self, ScriptError> {
        let chain_id = chain_id(client.as_ref()).await?;
        let record = store.load(chain_id)?;
        info!("Setting up environment on chain {}", chain_id);

        Self::from_record(client, artifacts, &record, TOPOLOGY)
    }

    /// Bind every role of `roles` to its address in `record`
    pub fn from_record(
        client: Arc<M>,
        artifacts: &Artifacts,
        record: &AddressRecord,
        roles: &[Role],
    ) -> Result<Self, ScriptError> {
        let contracts = roles
            .iter()
            .map(|role| -> Result<_, ScriptError> {
                let address = record
                    .get(role.name)
                    .ok_or_else(|| ScriptError::RoleNotFound(role.name.to_string()))?;
                let artifact = artifacts.lookup(role.source_path, role.contract_name)?;

                Ok((role.name, artifact.attach(*address, client.clone())))
            })
            .collect::<Result<_, ScriptError>>()?;

        Ok(Self { contracts })
    }

    /// The contract bound to `role`
    pub fn get(&self, role: &str) -> Result<&Contract<M>, ScriptError> {
        self.contracts
            .get(role)
            .ok_or_else(|| ScriptError::RoleNotFound(role.to_string()))
    }

    /// All bound contracts, ordered by role name
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Contract<M>)> {
        self.contracts.iter().map(|(role, contract)| (*role, contract))
    }

    /// Number of bound roles
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// Whether no role is bound
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}
