// Soroban RPC provider interface and wire types
// The toolkit talks to the network only through `SorobanRpc`

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use stellar_xdr::curr::{
    Limits, ReadXdr, ScVal, SorobanAuthorizationEntry, SorobanTransactionData,
    TransactionEnvelope, WriteXdr,
};
use thiserror::Error;

pub mod horizon;
pub mod soroban;

pub use horizon::{HorizonAccount, HorizonBalance, HorizonClient};
pub use soroban::RpcClient;

/// Errors returned by RPC, Horizon and faucet calls
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("JSON-RPC error {code}: {message}")]
    JsonRpc { code: i64, message: String },

    #[error("Empty result for {0}")]
    EmptyResult(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("No friendbot URL configured for this network")]
    NoFriendbot,

    #[error("XDR error: {0}")]
    Xdr(#[from] stellar_xdr::curr::Error),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl RpcError {
    /// HTTP status of the failed request, when there was one
    pub fn http_status(&self) -> Option<u16> {
        match self {
            RpcError::Http { status, .. } => Some(*status),
            RpcError::Transport(e) => e.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}

/// On-chain account state needed to build a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountState {
    pub account_id: String,
    pub sequence: i64,
}

/// Per-host-function simulation result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulateHostFunctionResult {
    #[serde(default)]
    pub auth: Vec<String>,
    pub xdr: String,
}

/// `simulateTransaction` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateTransactionResponse {
    #[serde(default)]
    pub latest_ledger: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_resource_fee: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<SimulateHostFunctionResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<String>,
}

impl SimulateTransactionResponse {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Resource footprint and fee to attach before submission
    pub fn soroban_data(&self) -> Result<Option<SorobanTransactionData>, RpcError> {
        self.transaction_data
            .as_deref()
            .filter(|data| !data.is_empty())
            .map(|data| decode_xdr(data))
            .transpose()
    }

    pub fn min_resource_fee(&self) -> Result<u64, RpcError> {
        match self.min_resource_fee.as_deref() {
            None | Some("") => Ok(0),
            Some(fee) => fee
                .parse()
                .map_err(|_| RpcError::InvalidResponse(format!("minResourceFee '{}'", fee))),
        }
    }

    /// Authorization entries recorded for the first host function
    pub fn auth_entries(&self) -> Result<Vec<SorobanAuthorizationEntry>, RpcError> {
        match self.results.first() {
            Some(result) => result.auth.iter().map(|entry| decode_xdr(entry)).collect(),
            None => Ok(vec![]),
        }
    }

    /// Return value of the first host function, if the simulation produced one
    pub fn result_value(&self) -> Result<Option<ScVal>, RpcError> {
        self.results
            .first()
            .filter(|result| !result.xdr.is_empty())
            .map(|result| decode_xdr(&result.xdr))
            .transpose()
    }
}

/// Status returned by `sendTransaction`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SendTransactionStatus {
    Pending,
    Duplicate,
    TryAgainLater,
    Error,
}

/// `sendTransaction` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTransactionResponse {
    pub status: SendTransactionStatus,
    pub hash: String,
    #[serde(default)]
    pub latest_ledger: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_result_xdr: Option<String>,
}

/// Status returned by `getTransaction`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GetTransactionStatus {
    Success,
    NotFound,
    Failed,
}

impl GetTransactionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GetTransactionStatus::Success | GetTransactionStatus::Failed)
    }
}

/// `getTransaction` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTransactionResponse {
    pub status: GetTransactionStatus,
    #[serde(default)]
    pub latest_ledger: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envelope_xdr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_xdr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_meta_xdr: Option<String>,
}

/// Network provider used by the transaction helpers
#[async_trait]
pub trait SorobanRpc: Send + Sync {
    /// Current sequence number of an account
    async fn get_account(&self, account_id: &str) -> Result<AccountState, RpcError>;

    /// Dry-run a transaction
    async fn simulate_transaction(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<SimulateTransactionResponse, RpcError>;

    /// Submit a signed transaction
    async fn send_transaction(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<SendTransactionResponse, RpcError>;

    /// Fetch the status of a submitted transaction
    async fn get_transaction(&self, hash: &str) -> Result<GetTransactionResponse, RpcError>;

    /// Fund an account through the network faucet
    async fn request_airdrop(
        &self,
        account_id: &str,
        friendbot_url: Option<&str>,
    ) -> Result<(), RpcError>;
}

/// Base64 XDR encoding as used on the wire
pub fn encode_xdr<T: WriteXdr>(value: &T) -> Result<String, RpcError> {
    Ok(general_purpose::STANDARD.encode(value.to_xdr(Limits::none())?))
}

pub fn decode_xdr<T: ReadXdr>(encoded: &str) -> Result<T, RpcError> {
    let bytes = general_purpose::STANDARD.decode(encoded)?;
    Ok(T::from_xdr(bytes, Limits::none())?)
}
