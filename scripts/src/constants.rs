//! Constants used in the deploy scripts

/// Default RPC endpoint, a local development node
pub const DEFAULT_RPC: &str = "http://127.0.0.1:8545";

/// Default location of the compiled contracts manifest
pub const DEFAULT_ARTIFACTS_PATH: &str = "out/dapp.sol.json";

/// Default directory holding the `<chainId>.json` address records
pub const DEFAULT_ADDRESSES_DIR: &str = ".";

/// Gas limit attached to `createVault` calls instead of an estimate
pub const DEFAULT_RELAY_GAS_LIMIT: u64 = 2_000_000;

/// Gas estimates are scaled by `GAS_MARGIN_NUMERATOR / GAS_MARGIN_DENOMINATOR`
pub const GAS_MARGIN_NUMERATOR: u64 = 130;

/// See [`GAS_MARGIN_NUMERATOR`]
pub const GAS_MARGIN_DENOMINATOR: u64 = 100;

/// Creation entry point of the vault factory
pub const CREATE_VAULT_METHOD: &str = "createVault";

/// Event emitted by the vault factory once a vault is deployed
pub const VAULT_CREATED_EVENT: &str = "VaultCreated";

/// Field of [`VAULT_CREATED_EVENT`] carrying the new instance address
pub const VAULT_INSTANCE_FIELD: &str = "instance";
