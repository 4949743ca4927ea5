use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use stellar_xdr::curr::{
    AccountId, LedgerEntryData, LedgerKey, LedgerKeyAccount, PublicKey, TransactionEnvelope,
    Uint256,
};
use tracing::debug;

use super::{
    decode_xdr, encode_xdr, AccountState, GetTransactionResponse, RpcError,
    SendTransactionResponse, SimulateTransactionResponse, SorobanRpc,
};
use crate::keys::decode_account_id;

/// Soroban RPC client speaking JSON-RPC 2.0 over HTTP
pub struct RpcClient {
    endpoint: String,
    friendbot_url: Option<String>,
    client: reqwest::Client,
    next_id: AtomicU64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LedgerEntryResult {
    xdr: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetLedgerEntriesResponse {
    #[serde(default)]
    entries: Option<Vec<LedgerEntryResult>>,
}

impl RpcClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            friendbot_url: None,
            client: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Faucet used when `request_airdrop` is called without an explicit URL
    pub fn with_friendbot(mut self, friendbot_url: Option<String>) -> Self {
        self.friendbot_url = friendbot_url;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Issue a JSON-RPC request and decode its `result` member
    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!("Soroban RPC {} (id {})", method, id);

        let request_body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RpcError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let mut response_json: Value = response.json().await?;

        if let Some(error) = response_json.get("error") {
            return Err(RpcError::JsonRpc {
                code: error.get("code").and_then(Value::as_i64).unwrap_or_default(),
                message: error
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
                    .to_string(),
            });
        }

        match response_json.get_mut("result").map(Value::take) {
            Some(Value::Null) | None => Err(RpcError::EmptyResult(method.to_string())),
            Some(result) => serde_json::from_value(result)
                .map_err(|e| RpcError::InvalidResponse(format!("{}: {}", method, e))),
        }
    }
}

#[async_trait]
impl SorobanRpc for RpcClient {
    async fn get_account(&self, account_id: &str) -> Result<AccountState, RpcError> {
        let key_bytes = decode_account_id(account_id)
            .map_err(|e| RpcError::InvalidResponse(e.to_string()))?;
        let key = LedgerKey::Account(LedgerKeyAccount {
            account_id: AccountId(PublicKey::PublicKeyTypeEd25519(Uint256(key_bytes))),
        });

        let response: GetLedgerEntriesResponse = self
            .call("getLedgerEntries", json!({ "keys": [encode_xdr(&key)?] }))
            .await?;

        let entry = response
            .entries
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| RpcError::AccountNotFound(account_id.to_string()))?;

        match decode_xdr::<LedgerEntryData>(&entry.xdr)? {
            LedgerEntryData::Account(account) => Ok(AccountState {
                account_id: account_id.to_string(),
                sequence: account.seq_num.0,
            }),
            other => Err(RpcError::InvalidResponse(format!(
                "expected an account entry, got {}",
                other.name()
            ))),
        }
    }

    async fn simulate_transaction(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<SimulateTransactionResponse, RpcError> {
        self.call(
            "simulateTransaction",
            json!({ "transaction": encode_xdr(envelope)? }),
        )
        .await
    }

    async fn send_transaction(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<SendTransactionResponse, RpcError> {
        self.call(
            "sendTransaction",
            json!({ "transaction": encode_xdr(envelope)? }),
        )
        .await
    }

    async fn get_transaction(&self, hash: &str) -> Result<GetTransactionResponse, RpcError> {
        self.call("getTransaction", json!({ "hash": hash })).await
    }

    async fn request_airdrop(
        &self,
        account_id: &str,
        friendbot_url: Option<&str>,
    ) -> Result<(), RpcError> {
        let url = friendbot_url
            .or(self.friendbot_url.as_deref())
            .ok_or(RpcError::NoFriendbot)?;

        debug!("Requesting airdrop for {} from {}", account_id, url);
        let response = self
            .client
            .get(url)
            .query(&[("addr", account_id)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RpcError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
