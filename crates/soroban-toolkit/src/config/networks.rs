// Built-in network presets and the injectable network registry

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";
pub const FUTURENET_PASSPHRASE: &str = "Test SDF Future Network ; October 2022";

/// Endpoints and passphrase of one Stellar network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StellarNetworkConfig {
    /// Registry key (e.g. "testnet")
    pub network: String,
    /// Faucet for funding test accounts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendbot_url: Option<String>,
    pub horizon_rpc_url: String,
    pub soroban_rpc_url: String,
    pub network_passphrase: String,
}

pub fn testnet() -> StellarNetworkConfig {
    StellarNetworkConfig {
        network: "testnet".to_string(),
        friendbot_url: Some("https://friendbot.stellar.org/".to_string()),
        horizon_rpc_url: "https://horizon-testnet.stellar.org".to_string(),
        soroban_rpc_url: "https://soroban-testnet.stellar.org/".to_string(),
        network_passphrase: TESTNET_PASSPHRASE.to_string(),
    }
}

pub fn futurenet() -> StellarNetworkConfig {
    StellarNetworkConfig {
        network: "futurenet".to_string(),
        friendbot_url: Some("https://friendbot-futurenet.stellar.org/".to_string()),
        horizon_rpc_url: "https://horizon-futurenet.stellar.org".to_string(),
        soroban_rpc_url: "https://rpc-futurenet.stellar.org/".to_string(),
        network_passphrase: FUTURENET_PASSPHRASE.to_string(),
    }
}

/// Immutable table of networks keyed by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkRegistry {
    networks: BTreeMap<String, StellarNetworkConfig>,
}

impl NetworkRegistry {
    /// The `testnet` and `futurenet` presets
    pub fn builtin() -> Self {
        Self::from_networks(vec![testnet(), futurenet()])
    }

    /// Later entries win when two share a name
    pub fn from_networks(networks: impl IntoIterator<Item = StellarNetworkConfig>) -> Self {
        let networks = networks
            .into_iter()
            .map(|network| (network.network.clone(), network))
            .collect();
        Self { networks }
    }

    /// New registry with `custom` layered over this one
    pub fn merged_with(&self, custom: &[StellarNetworkConfig]) -> Self {
        let mut networks = self.networks.clone();
        for network in custom {
            networks.insert(network.network.clone(), network.clone());
        }
        Self { networks }
    }

    pub fn get(&self, name: &str) -> Option<&StellarNetworkConfig> {
        self.networks.get(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.networks.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom(name: &str, passphrase: &str) -> StellarNetworkConfig {
        StellarNetworkConfig {
            network: name.to_string(),
            friendbot_url: None,
            horizon_rpc_url: "http://localhost:8000".to_string(),
            soroban_rpc_url: "http://localhost:8000/soroban/rpc".to_string(),
            network_passphrase: passphrase.to_string(),
        }
    }

    #[test]
    fn test_builtin_presets() {
        let registry = NetworkRegistry::builtin();
        assert_eq!(registry.names(), vec!["futurenet", "testnet"]);
        assert_eq!(registry.get("testnet").unwrap().network_passphrase, TESTNET_PASSPHRASE);
        assert_eq!(registry.get("futurenet").unwrap().network_passphrase, FUTURENET_PASSPHRASE);
    }

    #[test]
    fn test_custom_network_overrides_builtin() {
        let registry = NetworkRegistry::builtin()
            .merged_with(&[custom("testnet", "Local"), custom("standalone", "Standalone")]);

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("testnet").unwrap().network_passphrase, "Local");
        assert!(registry.get("standalone").is_some());

        // The base registry is untouched
        assert_eq!(
            NetworkRegistry::builtin().get("testnet").unwrap().network_passphrase,
            TESTNET_PASSPHRASE
        );
    }

    #[test]
    fn test_camel_case_serialization() {
        let json = serde_json::to_value(testnet()).unwrap();
        assert_eq!(json["horizonRpcUrl"], "https://horizon-testnet.stellar.org");
        assert_eq!(json["networkPassphrase"], TESTNET_PASSPHRASE);

        let parsed: StellarNetworkConfig = serde_json::from_value(serde_json::json!({
            "network": "local",
            "horizonRpcUrl": "http://localhost:8000",
            "sorobanRpcUrl": "http://localhost:8000/soroban/rpc",
            "networkPassphrase": "Standalone Network ; February 2017"
        }))
        .unwrap();
        assert_eq!(parsed.friendbot_url, None);
    }
}
