// Per-network address book of deployed contract ids and uploaded WASM hashes
// Persisted as `<base>/<network>.contracts.json`

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::logging::VerboseLogger;
use crate::utils::expand_path;

/// Errors that can occur during address book lookups and writes
#[derive(Error, Debug)]
pub enum AddressBookError {
    #[error("Unable to find contractId for key: {key} in {path}")]
    ContractIdNotFound { key: String, path: String },

    #[error("Unable to find wasmHash for key: {key} in {path}")]
    WasmHashNotFound { key: String, path: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Whether an entry has been observed on-chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// Recorded before submission; the transaction outcome is not known yet
    Pending,
    /// Recorded after a successful transaction, or set explicitly
    Confirmed,
}

/// Keys present in each mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableKeys {
    pub contract_keys: Vec<String>,
    pub wasm_keys: Vec<String>,
}

/// On-disk file format
#[derive(Debug, Serialize, Deserialize)]
struct AddressBookFile {
    ids: BTreeMap<String, String>,
    hashes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "PendingEntries::is_empty")]
    pending: PendingEntries,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PendingEntries {
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    ids: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    hashes: BTreeSet<String>,
}

impl PendingEntries {
    fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.hashes.is_empty()
    }
}

/// Contract name → contract id and contract name → WASM hash, bound to one file
#[derive(Debug, Clone)]
pub struct AddressBook {
    ids: BTreeMap<String, String>,
    hashes: BTreeMap<String, String>,
    pending: PendingEntries,
    file_path: PathBuf,
    logger: VerboseLogger,
}

impl AddressBook {
    /// Empty book bound to `file_path`
    pub fn new(file_path: impl Into<PathBuf>, logger: VerboseLogger) -> Self {
        Self {
            ids: BTreeMap::new(),
            hashes: BTreeMap::new(),
            pending: PendingEntries::default(),
            file_path: file_path.into(),
            logger,
        }
    }

    /// Path of the file for `network` under `base_path`
    pub fn file_path_for(network: &str, base_path: &Path) -> PathBuf {
        expand_path(base_path).join(format!("{}.contracts.json", network))
    }

    /// Load the book for `network`, or start an empty one if the file is missing or unreadable
    pub fn load_from_file(network: &str, base_path: &Path, logger: &VerboseLogger) -> Self {
        let file_path = Self::file_path_for(network, base_path);

        let loaded = std::fs::read_to_string(&file_path)
            .map_err(AddressBookError::from)
            .and_then(|content| {
                serde_json::from_str::<AddressBookFile>(&content).map_err(AddressBookError::from)
            });

        match loaded {
            Ok(file) => {
                logger.full(format!("Loaded address book from: {}", file_path.display()));
                Self {
                    ids: file.ids,
                    hashes: file.hashes,
                    pending: file.pending,
                    file_path,
                    logger: logger.clone(),
                }
            }
            Err(e) => {
                logger.warn(format!(
                    "Unable to load address book for network: {}. Creating a new one.",
                    network
                ));
                logger.full(format!("Address book load error: {}", e));
                Self::new(file_path, logger.clone())
            }
        }
    }

    /// Write both mappings to the bound file, creating parent directories as needed
    pub fn write_to_file(&self) -> Result<(), AddressBookError> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = AddressBookFile {
            ids: self.ids.clone(),
            hashes: self.hashes.clone(),
            pending: self.pending.clone(),
        };
        let content = serde_json::to_string_pretty(&file)?;
        std::fs::write(&self.file_path, content)?;

        self.logger
            .some(format!("Address book saved to: {}", self.file_path.display()));
        Ok(())
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn get_contract_id(&self, contract_key: &str) -> Result<&str, AddressBookError> {
        self.ids
            .get(contract_key)
            .filter(|id| !id.is_empty())
            .map(String::as_str)
            .ok_or_else(|| AddressBookError::ContractIdNotFound {
                key: contract_key.to_string(),
                path: self.file_path.display().to_string(),
            })
    }

    /// Upsert a contract id as confirmed
    pub fn set_contract_id(&mut self, contract_key: &str, contract_id: &str) {
        self.ids.insert(contract_key.to_string(), contract_id.to_string());
        self.pending.ids.remove(contract_key);
    }

    /// Upsert a contract id whose deployment has not been confirmed yet
    pub fn stage_contract_id(&mut self, contract_key: &str, contract_id: &str) {
        self.ids.insert(contract_key.to_string(), contract_id.to_string());
        self.pending.ids.insert(contract_key.to_string());
    }

    /// Mark a staged contract id as confirmed; returns false if the key is absent
    pub fn confirm_contract_id(&mut self, contract_key: &str) -> bool {
        self.pending.ids.remove(contract_key);
        self.ids.contains_key(contract_key)
    }

    pub fn contract_id_status(&self, contract_key: &str) -> Option<EntryStatus> {
        self.ids.get(contract_key).map(|_| {
            if self.pending.ids.contains(contract_key) {
                EntryStatus::Pending
            } else {
                EntryStatus::Confirmed
            }
        })
    }

    pub fn remove_contract_id(&mut self, contract_key: &str) -> Option<String> {
        self.pending.ids.remove(contract_key);
        self.ids.remove(contract_key)
    }

    pub fn get_wasm_hash(&self, wasm_key: &str) -> Result<&str, AddressBookError> {
        self.hashes
            .get(wasm_key)
            .filter(|hash| !hash.is_empty())
            .map(String::as_str)
            .ok_or_else(|| AddressBookError::WasmHashNotFound {
                key: wasm_key.to_string(),
                path: self.file_path.display().to_string(),
            })
    }

    /// Upsert a WASM hash as confirmed
    pub fn set_wasm_hash(&mut self, wasm_key: &str, wasm_hash: &str) {
        self.hashes.insert(wasm_key.to_string(), wasm_hash.to_string());
        self.pending.hashes.remove(wasm_key);
    }

    /// Upsert a WASM hash whose upload has not been confirmed yet
    pub fn stage_wasm_hash(&mut self, wasm_key: &str, wasm_hash: &str) {
        self.hashes.insert(wasm_key.to_string(), wasm_hash.to_string());
        self.pending.hashes.insert(wasm_key.to_string());
    }

    /// Mark a staged WASM hash as confirmed; returns false if the key is absent
    pub fn confirm_wasm_hash(&mut self, wasm_key: &str) -> bool {
        self.pending.hashes.remove(wasm_key);
        self.hashes.contains_key(wasm_key)
    }

    pub fn wasm_hash_status(&self, wasm_key: &str) -> Option<EntryStatus> {
        self.hashes.get(wasm_key).map(|_| {
            if self.pending.hashes.contains(wasm_key) {
                EntryStatus::Pending
            } else {
                EntryStatus::Confirmed
            }
        })
    }

    pub fn remove_wasm_hash(&mut self, wasm_key: &str) -> Option<String> {
        self.pending.hashes.remove(wasm_key);
        self.hashes.remove(wasm_key)
    }

    pub fn get_available_keys(&self) -> AvailableKeys {
        AvailableKeys {
            contract_keys: self.ids.keys().cloned().collect(),
            wasm_keys: self.hashes.keys().cloned().collect(),
        }
    }
}
