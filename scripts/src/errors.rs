//! Definitions of errors that can occur during the execution of the deployment scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    path::PathBuf,
};

/// Errors that can occur during the execution of the deployment scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Error when reading or writing an address record file
    JsonOutputError(String),
    /// The address record for a chain was required but does not exist
    MissingAddressFile(PathBuf),
    /// No artifact for the given `(source path, contract name)` pair
    ArtifactNotFound {
        /// Source file the contract was compiled from
        source_path: String,
        /// Name of the contract inside that source file
        contract_name: String,
    },
    /// Error when reading or parsing the compiled artifacts manifest
    ArtifactLoading(String),
    /// A role expected by the environment is absent from the address record
    RoleNotFound(String),
    /// Error when creating the client
    ClientInitialization(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// The vault factory receipt did not carry the expected creation event
    DeploymentRelay(String),
    /// Error calling a contract method, estimating its gas or awaiting its receipt
    ContractInteraction(String),
    /// Error when a user supplied value cannot be interpreted
    InvalidArgument(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::JsonOutputError(s) => write!(f, "error with json address record: {}", s),
            ScriptError::MissingAddressFile(path) => {
                write!(f, "address record not found: {}", path.display())
            }
            ScriptError::ArtifactNotFound {
                source_path,
                contract_name,
            } => write!(
                f,
                "no compiled artifact for {} in {}",
                contract_name, source_path
            ),
            ScriptError::ArtifactLoading(s) => write!(f, "error loading artifacts: {}", s),
            ScriptError::RoleNotFound(role) => {
                write!(f, "no address recorded for role `{}`", role)
            }
            ScriptError::ClientInitialization(s) => write!(f, "error during client init: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::DeploymentRelay(s) => {
                write!(f, "error relaying deployment through vault factory: {}", s)
            }
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::InvalidArgument(s) => write!(f, "invalid argument: {}", s),
        }
    }
}

impl Error for ScriptError {}

impl ScriptError {
    /// Whether this error means something asked for does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ScriptError::ArtifactNotFound { .. } | ScriptError::RoleNotFound(_)
        )
    }
}
