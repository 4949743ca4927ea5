// Minimal Horizon REST client for classic account lookups

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::RpcError;

/// One entry of a Horizon account's `balances` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizonBalance {
    pub balance: String,
    pub asset_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_issuer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizonAccount {
    pub id: String,
    /// Horizon encodes the sequence number as a decimal string
    pub sequence: String,
    #[serde(default)]
    pub balances: Vec<HorizonBalance>,
}

impl HorizonAccount {
    pub fn sequence_number(&self) -> Result<i64, RpcError> {
        self.sequence
            .parse()
            .map_err(|_| RpcError::InvalidResponse(format!("sequence '{}'", self.sequence)))
    }

    /// Native XLM balance as reported by Horizon
    pub fn native_balance(&self) -> Option<&str> {
        self.balances
            .iter()
            .find(|balance| balance.asset_type == "native")
            .map(|balance| balance.balance.as_str())
    }
}

#[derive(Clone)]
pub struct HorizonClient {
    base_url: String,
    client: reqwest::Client,
}

impl HorizonClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_account(&self, account_id: &str) -> Result<HorizonAccount, RpcError> {
        let url = format!("{}/accounts/{}", self.base_url.trim_end_matches('/'), account_id);
        debug!("Horizon GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RpcError::AccountNotFound(account_id.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RpcError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}
