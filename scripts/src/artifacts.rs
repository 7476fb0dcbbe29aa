//! Loading of the compiled contracts manifest.
//!
//! The manifest is the standard solc JSON output produced by the contracts
//! build: `{ contracts: { <source path>: { <contract name>: { abi, evm: { bytecode } } } } }`.
//! It is read once per process and never mutated.

use std::{collections::BTreeMap, fs, path::Path, sync::Arc};

use ethers::{
    abi::Abi,
    contract::{Contract, ContractFactory},
    providers::Middleware,
    types::{Address, Bytes},
    utils::hex,
};
use serde::Deserialize;
use tracing::debug;

use crate::errors::ScriptError;

/// Raw shape of the manifest, only the fields we need
#[derive(Debug, Clone, Deserialize)]
struct Manifest {
    /// Source path => contract name => compiled output
    contracts: BTreeMap<String, BTreeMap<String, CompiledContract>>,
}

/// Compiler output for a single contract
#[derive(Debug, Clone, Deserialize)]
struct CompiledContract {
    /// The contract interface
    abi: Abi,
    /// EVM specific output
    evm: EvmOutput,
}

/// The `evm` section of a compiled contract
#[derive(Debug, Clone, Deserialize)]
struct EvmOutput {
    /// Creation bytecode
    bytecode: BytecodeObject,
}

/// The `evm.bytecode` section of a compiled contract.
///
/// Hex is encoded with or without `0x` prefix.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum BytecodeObject {
    /// solc standard JSON: `{ "object": "..." }`
    Object {
        /// Hex encoded creation code
        object: String,
    },
    /// Flattened outputs: the creation code string itself
    Hex(String),
}

impl BytecodeObject {
    /// The hex encoded creation code
    fn hex(&self) -> &str {
        match self {
            Self::Object { object } | Self::Hex(object) => object,
        }
    }
}

/// A compiled contract: its interface and creation bytecode
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Source file the contract was compiled from
    pub source_path: String,
    /// Name of the contract in that file
    pub contract_name: String,
    /// The contract interface
    pub abi: Abi,
    /// Creation bytecode, empty for interfaces and abstract contracts
    pub bytecode: Bytes,
}

impl Artifact {
    /// Build a deployment factory for this artifact bound to `client`
    pub fn factory<M: Middleware>(&self, client: Arc<M>) -> ContractFactory<M> {
        ContractFactory::new(self.abi.clone(), self.bytecode.clone(), client)
    }

    /// Bind this artifact's interface to an already deployed `address`
    pub fn attach<M: Middleware>(&self, address: Address, client: Arc<M>) -> Contract<M> {
        Contract::new(address, self.abi.clone(), client)
    }
}

/// The whole compiled contracts manifest
#[derive(Debug, Clone)]
pub struct Artifacts {
    /// Parsed manifest
    manifest: Manifest,
}

impl Artifacts {
    /// Read and parse the manifest at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        debug!("Loading artifacts from {}", path.display());

        let contents = fs::read_to_string(path).map_err(|e| {
            ScriptError::ArtifactLoading(format!("cannot read {}: {}", path.display(), e))
        })?;

        Self::from_json(&contents)
    }

    /// Parse a manifest from its JSON text
    pub fn from_json(contents: &str) -> Result<Self, ScriptError> {
        let manifest = serde_json::from_str(contents)
            .map_err(|e| ScriptError::ArtifactLoading(e.to_string()))?;

        Ok(Self { manifest })
    }

    /// Find the artifact compiled from `source_path` under `contract_name`
    pub fn lookup(&self, source_path: &str, contract_name: &str) -> Result<Artifact, ScriptError> {
        let compiled = self
            .manifest
            .contracts
            .get(source_path)
            .and_then(|contracts| contracts.get(contract_name))
            .ok_or_else(|| ScriptError::ArtifactNotFound {
                source_path: source_path.to_string(),
                contract_name: contract_name.to_string(),
            })?;

        let object = compiled.evm.bytecode.hex();
        let bytecode = hex::decode(object.strip_prefix("0x").unwrap_or(object)).map_err(|e| {
            ScriptError::ArtifactLoading(format!(
                "invalid bytecode for {} in {}: {}",
                contract_name, source_path, e
            ))
        })?;

        Ok(Artifact {
            source_path: source_path.to_string(),
            contract_name: contract_name.to_string(),
            abi: compiled.abi.clone(),
            bytecode: bytecode.into(),
        })
    }
}
