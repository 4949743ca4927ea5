// Crate-level error type for toolkit operations

use std::path::PathBuf;
use thiserror::Error;

use crate::address_book::AddressBookError;
use crate::keys::KeyError;
use crate::rpc::RpcError;

/// Errors that can occur while configuring a toolkit or running a contract operation
#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("Admin secret key is required.")]
    MissingAdminSecret,

    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    #[error("Contract path for key '{0}' is not defined.")]
    ContractPathNotDefined(String),

    #[error(transparent)]
    AddressBook(#[from] AddressBookError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Simulation error")]
    Simulation,

    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("Transaction {hash} did not reach a terminal status after {attempts} polling attempts")]
    PollTimeout { hash: String, attempts: u32 },

    #[error("XDR error: {0}")]
    Xdr(#[from] stellar_xdr::curr::Error),

    #[error("Failed to read WASM file {path}: {source}")]
    WasmRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("The operation has no result.")]
    NoResult,

    #[error("Unexpected value: {0}")]
    UnexpectedValue(String),
}

pub type Result<T> = std::result::Result<T, ToolkitError>;
