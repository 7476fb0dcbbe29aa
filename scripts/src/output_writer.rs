//! Per-network record of deployed contract addresses.
//!
//! Each network gets one `<chainId>.json` file holding a flat mapping of
//! contract name to address. Writes merge into the existing record and always
//! emit keys in ascending order with two-space indentation, so the files diff
//! cleanly between runs.
//!
//! Saving is a whole-file read-modify-write without locking: two scripts
//! writing the same chain id at once can lose an update (last writer wins).
//! Scripts must run one at a time against a given record.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use ethers::{types::Address, utils::to_checksum};
use json::{object::Object, JsonValue};
use tracing::debug;

use crate::errors::ScriptError;

/// Contract name => deployed address, for a single network
pub type AddressRecord = BTreeMap<String, Address>;

/// Directory of address records, one file per chain id
#[derive(Debug, Clone)]
pub struct AddressStore {
    /// Directory the `<chainId>.json` files live in
    dir: PathBuf,
}

impl AddressStore {
    /// Use `dir` as the address records directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the record file for `chain_id`
    pub fn path_for(&self, chain_id: u64) -> PathBuf {
        self.dir.join(format!("{chain_id}.json"))
    }

    /// Read the record of `chain_id`, failing if none was ever written
    pub fn load(&self, chain_id: u64) -> Result<AddressRecord, ScriptError> {
        let path = self.path_for(chain_id);
        if !path.exists() {
            return Err(ScriptError::MissingAddressFile(path));
        }

        read_record(&path)
    }

    /// Read the record of `chain_id`, an absent file being an empty record
    pub fn load_or_default(&self, chain_id: u64) -> Result<AddressRecord, ScriptError> {
        match self.load(chain_id) {
            Err(ScriptError::MissingAddressFile(_)) => Ok(AddressRecord::new()),
            other => other,
        }
    }

    /// Record `address` under `name` for `chain_id`, keeping every other entry
    pub fn save(&self, chain_id: u64, name: &str, address: Address) -> Result<(), ScriptError> {
        let mut record = self.load_or_default(chain_id)?;
        record.insert(name.to_string(), address);

        self.write(chain_id, &record)
    }

    /// Replace the record file of `chain_id` with `record`
    pub fn write(&self, chain_id: u64, record: &AddressRecord) -> Result<(), ScriptError> {
        fs::create_dir_all(&self.dir).map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;

        let path = self.path_for(chain_id);
        debug!("Writing {} addresses to {}", record.len(), path.display());

        // Write next to the target then rename, a crash never leaves a truncated record
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, render_record(record))
            .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;
        fs::rename(&tmp_path, &path).map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;

        Ok(())
    }
}

/// Parses the record file at the given path
fn read_record(path: &Path) -> Result<AddressRecord, ScriptError> {
    let contents =
        fs::read_to_string(path).map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;

    parse_record(&contents)
        .map_err(|e| ScriptError::JsonOutputError(format!("{}: {}", path.display(), e)))
}

/// Parses record JSON text into its name => address entries
fn parse_record(contents: &str) -> Result<AddressRecord, String> {
    let parsed = json::parse(contents).map_err(|e| e.to_string())?;
    let JsonValue::Object(entries) = parsed else {
        return Err(String::from("address record must be a JSON object"));
    };

    entries
        .iter()
        .map(|(name, value)| {
            let address = value
                .as_str()
                .ok_or_else(|| format!("address of `{name}` is not a string"))?
                .parse::<Address>()
                .map_err(|e| format!("address of `{name}` is invalid: {e}"))?;
            Ok((name.to_string(), address))
        })
        .collect()
}

/// Renders a record with sorted keys and two-space indentation
fn render_record(record: &AddressRecord) -> String {
    let mut entries = Object::with_capacity(record.len());
    // BTreeMap iteration is ordered, and `Object` keeps insertion order
    for (name, address) in record {
        entries.insert(name, JsonValue::String(to_checksum(address, None)));
    }

    json::stringify_pretty(JsonValue::Object(entries), 2)
}
