use std::sync::Arc;

use ethers::{
    abi::{Abi, RawLog, Token},
    contract::Contract,
    providers::Middleware,
    types::{Address, Bytes, TransactionReceipt, U256},
};
use tracing::info;

use crate::{
    constants::{CREATE_VAULT_METHOD, VAULT_CREATED_EVENT, VAULT_INSTANCE_FIELD},
    deploy::record_deployment,
    errors::ScriptError,
    output_writer::AddressStore,
    tx::{client::chain_id, sender::succeeded},
};

/// Deploy a vault by asking `vault_factory` to clone `implementation`, recording it under `name`.
///
/// `encoded_args` are the ABI encoded initialization parameters of the vault.
/// The call is sent with the fixed `gas_limit` rather than an estimate. The new
/// vault address is read from the `VaultCreated` event of the receipt, and
/// nothing is recorded when the call reverted or that event is missing.
pub async fn deploy_via_vault_factory<M: Middleware>(
    client: Arc<M>,
    store: &AddressStore,
    vault_factory: &Contract<M>,
    name: &str,
    implementation: &Contract<M>,
    encoded_args: Bytes,
    gas_limit: U256,
) -> Result<Contract<M>, ScriptError> {
    let chain_id = chain_id(client.as_ref()).await?;
    info!(
        "Creating {} from implementation {:?} through vault factory {:?}",
        name,
        implementation.address(),
        vault_factory.address()
    );

    let call = vault_factory
        .method::<_, Token>(CREATE_VAULT_METHOD, (implementation.address(), encoded_args))
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
        .gas(gas_limit);

    let pending_tx = call
        .send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    let receipt = pending_tx
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
        .ok_or_else(|| {
            ScriptError::ContractInteraction(String::from(
                "createVault transaction dropped from mempool",
            ))
        })?;

    if !succeeded(&receipt) {
        return Err(ScriptError::ContractInteraction(format!(
            "{} reverted in {:?}",
            CREATE_VAULT_METHOD, receipt.transaction_hash
        )));
    }

    let instance = find_vault_instance(vault_factory.abi(), vault_factory.address(), &receipt)?;
    record_deployment(store, chain_id, name, instance, receipt.transaction_hash)?;

    Ok(Contract::new(
        instance,
        implementation.abi().clone(),
        client,
    ))
}

/// Address of the vault announced by the first `VaultCreated` event `factory` emitted in `receipt`
pub fn find_vault_instance(
    factory_abi: &Abi,
    factory: Address,
    receipt: &TransactionReceipt,
) -> Result<Address, ScriptError> {
    let event = factory_abi
        .event(VAULT_CREATED_EVENT)
        .map_err(|e| ScriptError::DeploymentRelay(e.to_string()))?;
    let signature = event.signature();

    let log = receipt
        .logs
        .iter()
        .find(|log| log.address == factory && log.topics.first() == Some(&signature))
        .ok_or_else(|| {
            ScriptError::DeploymentRelay(format!(
                "no {} event in transaction {:?}",
                VAULT_CREATED_EVENT, receipt.transaction_hash
            ))
        })?;

    let decoded = event
        .parse_log(RawLog {
            topics: log.topics.clone(),
            data: log.data.to_vec(),
        })
        .map_err(|e| ScriptError::DeploymentRelay(e.to_string()))?;

    decoded
        .params
        .into_iter()
        .find(|param| param.name == VAULT_INSTANCE_FIELD)
        .and_then(|param| param.value.into_address())
        .ok_or_else(|| {
            ScriptError::DeploymentRelay(format!(
                "{} event carries no `{}` address",
                VAULT_CREATED_EVENT, VAULT_INSTANCE_FIELD
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::{
        abi::{encode, parse_abi},
        providers::MockProvider,
        types::{Log, H256},
    };
    use serde_json::Value;
    use tempfile::TempDir;

    use crate::{
        test_utils::{
            artifacts, fee_estimation, mining, mocked_client_with, queue_responses,
            receipt_with_status, MockClient, ERC20_PATH,
        },
        tx::abi::vault_factory_abi,
    };

    const CHAIN_ID: u64 = 1337;

    fn factory() -> Address {
        Address::repeat_byte(0xfa)
    }

    /// A `VaultCreated` log for `instance`, emitted by `emitter`
    fn vault_created_log(emitter: Address, instance: Address) -> Log {
        let abi = vault_factory_abi().unwrap();
        let event = abi.event(VAULT_CREATED_EVENT).unwrap();

        Log {
            address: emitter,
            topics: vec![
                event.signature(),
                H256::from(instance),
                H256::from(Address::repeat_byte(0xde)),
            ],
            data: encode(&[Token::Bytes(vec![0x01, 0x02])]).into(),
            ..Default::default()
        }
    }

    fn receipt_with(logs: Vec<Log>) -> TransactionReceipt {
        TransactionReceipt {
            transaction_hash: H256::repeat_byte(0x77),
            logs,
            ..Default::default()
        }
    }

    #[test]
    fn test_finds_instance() {
        let instance = Address::repeat_byte(0xab);
        let receipt = receipt_with(vec![vault_created_log(factory(), instance)]);

        let found = find_vault_instance(&vault_factory_abi().unwrap(), factory(), &receipt).unwrap();
        assert_eq!(found, instance);
    }

    #[test]
    fn test_skips_unrelated_logs() {
        let instance = Address::repeat_byte(0xab);
        let unrelated = Log {
            address: factory(),
            topics: vec![H256::repeat_byte(0x01)],
            ..Default::default()
        };
        // Same event shape, but emitted by another contract
        let foreign = vault_created_log(Address::repeat_byte(0x05), Address::repeat_byte(0x06));
        let receipt = receipt_with(vec![
            unrelated,
            foreign,
            vault_created_log(factory(), instance),
        ]);

        let found = find_vault_instance(&vault_factory_abi().unwrap(), factory(), &receipt).unwrap();
        assert_eq!(found, instance);
    }

    #[test]
    fn test_missing_event_is_relay_error() {
        let receipt = receipt_with(vec![]);

        let err = find_vault_instance(&vault_factory_abi().unwrap(), factory(), &receipt).unwrap_err();
        assert!(matches!(err, ScriptError::DeploymentRelay(_)));
    }

    #[test]
    fn test_event_without_instance_field() {
        let abi = parse_abi(&["event VaultCreated(address indexed vault)"]).unwrap();
        let event = abi.event(VAULT_CREATED_EVENT).unwrap();
        let receipt = receipt_with(vec![Log {
            address: factory(),
            topics: vec![event.signature(), H256::from(Address::repeat_byte(0xab))],
            ..Default::default()
        }]);

        let err = find_vault_instance(&abi, factory(), &receipt).unwrap_err();
        assert!(matches!(err, ScriptError::DeploymentRelay(_)));
    }

    #[test]
    fn test_factory_abi_without_event() {
        let abi = parse_abi(&["function createVault(address impl, bytes params)"]).unwrap();
        let receipt = receipt_with(vec![vault_created_log(factory(), Address::repeat_byte(0xab))]);

        let err = find_vault_instance(&abi, factory(), &receipt).unwrap_err();
        assert!(matches!(err, ScriptError::DeploymentRelay(_)));
    }

    /// Queue a `createVault` call with a fixed gas limit, mined into `receipt`
    fn queue_relay(mock: &MockProvider, receipt: &TransactionReceipt) {
        let mut responses: Vec<Value> = vec![serde_json::to_value(U256::from(CHAIN_ID)).unwrap()];
        responses.extend(fee_estimation());
        responses.extend(mining(receipt));

        queue_responses(mock, responses);
    }

    /// Relay a `TestERC20` vault through the mocked factory
    async fn relay(
        client: Arc<MockClient>,
        store: &AddressStore,
    ) -> Result<Contract<MockClient>, ScriptError> {
        let vault_factory = Contract::new(factory(), vault_factory_abi().unwrap(), client.clone());
        let implementation = artifacts()
            .lookup(ERC20_PATH, "TestERC20")
            .unwrap()
            .attach(Address::repeat_byte(0x11), client.clone());

        deploy_via_vault_factory(
            client,
            store,
            &vault_factory,
            "vaultA",
            &implementation,
            Bytes::from(vec![0x01, 0x02]),
            U256::from(2_000_000u64),
        )
        .await
    }

    #[tokio::test]
    async fn test_relay_returns_instance_handle() {
        let temp_dir = TempDir::new().unwrap();
        let store = AddressStore::new(temp_dir.path());
        let instance = Address::repeat_byte(0xab);

        let (client, mock) = mocked_client_with();
        let receipt = TransactionReceipt {
            logs: vec![vault_created_log(factory(), instance)],
            ..receipt_with_status(1)
        };
        queue_relay(&mock, &receipt);

        let vault = relay(client, &store).await.unwrap();
        assert_eq!(vault.address(), instance);
        assert!(vault.abi().function("transfer").is_ok());
        assert_eq!(store.load(CHAIN_ID).unwrap()["vaultA"], instance);
    }

    #[tokio::test]
    async fn test_relay_without_event_is_not_recorded() {
        let temp_dir = TempDir::new().unwrap();
        let store = AddressStore::new(temp_dir.path());

        let (client, mock) = mocked_client_with();
        queue_relay(&mock, &receipt_with_status(1));

        let err = relay(client, &store).await.err().unwrap();
        assert!(matches!(err, ScriptError::DeploymentRelay(_)));
        assert!(!store.path_for(CHAIN_ID).exists());
    }

    #[tokio::test]
    async fn test_reverted_relay_is_not_recorded() {
        let temp_dir = TempDir::new().unwrap();
        let store = AddressStore::new(temp_dir.path());

        let (client, mock) = mocked_client_with();
        // Logs are ignored once the call reverted
        let receipt = TransactionReceipt {
            logs: vec![vault_created_log(factory(), Address::repeat_byte(0xab))],
            ..receipt_with_status(0)
        };
        queue_relay(&mock, &receipt);

        let err = relay(client, &store).await.err().unwrap();
        assert!(
            matches!(err, ScriptError::ContractInteraction(msg) if msg.starts_with("createVault reverted"))
        );
        assert!(!store.path_for(CHAIN_ID).exists());
    }
}
