// Soroban Toolkit Library
// Deploy, invoke and maintain Soroban contracts with a per-network address book

pub mod account;
pub mod address_book;
pub mod config;
pub mod error;
pub mod keys;
pub mod logging;
pub mod managers;
pub mod rpc;
pub mod toolkit;
pub mod utils;

// Re-export commonly used types for convenience
pub use account::{airdrop_account, get_token_balance};
pub use address_book::{AddressBook, AddressBookError, AvailableKeys, EntryStatus};
pub use config::{NetworkRegistry, PollConfig, StellarNetworkConfig, ToolkitConfig};
pub use error::{Result, ToolkitError};
pub use keys::{KeyError, Keypair};
pub use logging::{LogCapture, RecordLevel, VerboseLogger, Verbosity};
pub use managers::{TransactionBuilder, TransactionOutcome, SubmittedTransaction};
pub use rpc::{RpcClient, RpcError, SorobanRpc};
pub use toolkit::{create_toolkit, SorobanToolkit, ToolkitFactory, ToolkitOptions};
