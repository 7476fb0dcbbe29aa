use ethers::{
    abi::{
        parse_abi,
        token::{LenientTokenizer, Tokenizer},
        Abi, Param, Token,
    },
    types::H256,
};

use crate::errors::ScriptError;

/// Interface of the on-chain vault factory used for relayed deployments
const VAULT_FACTORY_ABI: &[&str] = &[
    "function createVault(address impl, bytes params) external returns (address)",
    "event VaultCreated(address indexed instance, address indexed creator, bytes params)",
];

/// Parsed interface of the vault factory
pub fn vault_factory_abi() -> Result<Abi, ScriptError> {
    parse_abi(VAULT_FACTORY_ABI).map_err(|e| ScriptError::ArtifactLoading(e.to_string()))
}

/// The 4-byte selector of `function`, right-padded with zeros to a full word.
///
/// Guards key their per-function permissions by this word.
pub fn encode_4byte(abi: &Abi, function: &str) -> Result<H256, ScriptError> {
    let function = abi
        .function(function)
        .map_err(|e| ScriptError::InvalidArgument(e.to_string()))?;

    let mut word = [0u8; 32];
    word[..4].copy_from_slice(&function.short_signature());
    Ok(H256::from(word))
}

/// Parse textual arguments against the parameter types they are passed as
pub fn tokenize_args(params: &[Param], args: &[String]) -> Result<Vec<Token>, ScriptError> {
    if params.len() != args.len() {
        return Err(ScriptError::InvalidArgument(format!(
            "expected {} arguments, got {}",
            params.len(),
            args.len()
        )));
    }

    params
        .iter()
        .zip(args)
        .map(|(param, arg)| {
            LenientTokenizer::tokenize(&param.kind, arg).map_err(|e| {
                ScriptError::InvalidArgument(format!("`{}` as {}: {}", arg, param.kind, e))
            })
        })
        .collect()
}

/// Arguments of the constructor of `abi`, none if it declares no constructor
pub fn constructor_params(abi: &Abi) -> &[Param] {
    abi.constructor()
        .map(|constructor| constructor.inputs.as_slice())
        .unwrap_or_default()
}

/// Arguments of `function` in `abi`
pub fn function_params<'a>(abi: &'a Abi, function: &str) -> Result<&'a [Param], ScriptError> {
    abi.function(function)
        .map(|function| function.inputs.as_slice())
        .map_err(|e| ScriptError::InvalidArgument(e.to_string()))
}
