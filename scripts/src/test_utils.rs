//! Fixtures shared by the unit tests

use std::{sync::Arc, time::Duration};

use ethers::{
    providers::{MockProvider, Provider},
    types::{Address, Block, Transaction, TransactionReceipt, TxHash, U256, U64},
};
use serde_json::{json, Value};

use crate::{artifacts::Artifacts, env::TOPOLOGY, output_writer::AddressRecord};

/// Source path of the test token
pub const ERC20_PATH: &str = "src/test/utils/TestERC20.sol";

/// Chain client answered by a [`MockProvider`]
pub type MockClient = Provider<MockProvider>;

/// A chain client that never reaches a node
pub fn mocked_client() -> Arc<MockClient> {
    mocked_client_with().0
}

/// A chain client and the mock feeding its responses
pub fn mocked_client_with() -> (Arc<MockClient>, MockProvider) {
    let (provider, mock) = Provider::mocked();
    // Pending transactions poll at this pace
    let provider = provider.interval(Duration::from_millis(5));
    (Arc::new(provider), mock)
}

/// Queue `responses` so the mock answers them in order.
///
/// The mock answers the most recently pushed response first.
pub fn queue_responses(mock: &MockProvider, responses: Vec<Value>) {
    for response in responses.into_iter().rev() {
        mock.push::<Value, _>(response).unwrap();
    }
}

/// Answers to the EIP-1559 fee estimation done before sending: latest block, fee history
pub fn fee_estimation() -> Vec<Value> {
    let latest = Block::<TxHash> {
        number: Some(U64::from(1)),
        base_fee_per_gas: Some(U256::from(1_000_000_000u64)),
        ..Default::default()
    };
    let fee_history = json!({
        "baseFeePerGas": ["0x3b9aca00", "0x3b9aca00"],
        "gasUsedRatio": [0.5],
        "oldestBlock": "0x1",
        "reward": [["0x3b9aca00"]]
    });

    vec![serde_json::to_value(latest).unwrap(), fee_history]
}

/// Answers from submission to mining: transaction hash, transaction, receipt
pub fn mining(receipt: &TransactionReceipt) -> Vec<Value> {
    let transaction = Transaction {
        hash: receipt.transaction_hash,
        block_number: receipt.block_number,
        ..Default::default()
    };

    vec![
        serde_json::to_value(receipt.transaction_hash).unwrap(),
        serde_json::to_value(transaction).unwrap(),
        serde_json::to_value(receipt).unwrap(),
    ]
}

/// Queue everything a gas estimated contract call needs to get mined into `receipt`
pub fn queue_mined_call(mock: &MockProvider, estimate: Option<U256>, receipt: TransactionReceipt) {
    let mut responses: Vec<Value> = estimate
        .map(|gas| serde_json::to_value(gas).unwrap())
        .into_iter()
        .collect();
    responses.extend(fee_estimation());
    responses.extend(mining(&receipt));

    queue_responses(mock, responses);
}

/// A mined receipt with the given execution status
pub fn receipt_with_status(status: u64) -> TransactionReceipt {
    TransactionReceipt {
        transaction_hash: TxHash::repeat_byte(0x77),
        block_number: Some(U64::from(1)),
        status: Some(U64::from(status)),
        ..Default::default()
    }
}

/// Compiled output of a contract with a single `transfer` function
fn compiled_contract() -> Value {
    json!({
        "abi": [
            {
                "type": "function",
                "name": "transfer",
                "inputs": [
                    { "name": "to", "type": "address", "internalType": "address" },
                    { "name": "amount", "type": "uint256", "internalType": "uint256" }
                ],
                "outputs": [{ "name": "", "type": "bool", "internalType": "bool" }],
                "stateMutability": "nonpayable"
            }
        ],
        "evm": { "bytecode": { "object": "60806040", "sourceMap": "" } }
    })
}

/// A manifest holding an artifact for every role of the topology
pub fn manifest_json() -> String {
    let mut contracts = serde_json::Map::new();
    for role in TOPOLOGY {
        let source = contracts
            .entry(role.source_path)
            .or_insert_with(|| json!({}));
        source[role.contract_name] = compiled_contract();
    }

    json!({ "contracts": contracts, "sources": {} }).to_string()
}

/// Parsed [`manifest_json`]
pub fn artifacts() -> Artifacts {
    Artifacts::from_json(&manifest_json()).unwrap()
}

/// An address record covering every role, with distinct addresses
pub fn full_record() -> AddressRecord {
    TOPOLOGY
        .iter()
        .enumerate()
        .map(|(i, role)| (role.name.to_string(), Address::repeat_byte(i as u8 + 1)))
        .collect()
}
