// Per-network toolkit handle: RPC clients, admin signer, contract paths and address book

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod factory;

pub use factory::{create_toolkit, ToolkitFactory};

use crate::address_book::AddressBook;
use crate::config::{PollConfig, StellarNetworkConfig, ToolkitConfig, DEFAULT_ADDRESS_BOOK_PATH};
use crate::error::{Result, ToolkitError};
use crate::keys::Keypair;
use crate::logging::{VerboseLogger, Verbosity};
use crate::rpc::{HorizonClient, RpcClient, SorobanRpc};

/// Inputs shared by every toolkit a factory creates
#[derive(Debug, Clone)]
pub struct ToolkitOptions {
    pub admin_secret: String,
    pub contract_paths: HashMap<String, PathBuf>,
    pub custom_networks: Vec<StellarNetworkConfig>,
    pub address_book_path: PathBuf,
    pub verbosity: Verbosity,
    pub polling: PollConfig,
    logger: Option<VerboseLogger>,
}

impl ToolkitOptions {
    pub fn new(admin_secret: impl Into<String>) -> Self {
        Self {
            admin_secret: admin_secret.into(),
            contract_paths: HashMap::new(),
            custom_networks: vec![],
            address_book_path: PathBuf::from(DEFAULT_ADDRESS_BOOK_PATH),
            verbosity: Verbosity::None,
            polling: PollConfig::default(),
            logger: None,
        }
    }

    /// Options from a loaded config file; the secret comes from the file or the environment
    pub fn from_config(config: &ToolkitConfig) -> Self {
        Self {
            admin_secret: config.resolve_admin_secret().unwrap_or_default(),
            contract_paths: config.contract_paths.clone(),
            custom_networks: config.networks.clone(),
            address_book_path: config.address_book_path.clone(),
            verbosity: config.verbosity,
            polling: config.polling,
            logger: None,
        }
    }

    pub fn with_contract_path(mut self, key: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.contract_paths.insert(key.into(), path.into());
        self
    }

    pub fn with_contract_paths(mut self, contract_paths: HashMap<String, PathBuf>) -> Self {
        self.contract_paths = contract_paths;
        self
    }

    pub fn with_custom_networks(mut self, networks: Vec<StellarNetworkConfig>) -> Self {
        self.custom_networks = networks;
        self
    }

    pub fn with_address_book_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.address_book_path = path.into();
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_polling(mut self, polling: PollConfig) -> Self {
        self.polling = polling;
        self
    }

    /// Use this logger (and its capture sink, if any) instead of one built from `verbosity`
    pub fn with_logger(mut self, logger: VerboseLogger) -> Self {
        self.verbosity = logger.verbosity();
        self.logger = Some(logger);
        self
    }

    fn logger(&self) -> VerboseLogger {
        self.logger
            .clone()
            .unwrap_or_else(|| VerboseLogger::new(self.verbosity))
    }
}

/// Client handle bound to one network
pub struct SorobanToolkit {
    rpc: Arc<dyn SorobanRpc>,
    horizon: HorizonClient,
    passphrase: String,
    friendbot_url: Option<String>,
    admin: Keypair,
    contract_paths: HashMap<String, PathBuf>,
    address_book: AddressBook,
    logger: VerboseLogger,
    polling: PollConfig,
    network: StellarNetworkConfig,
}

impl SorobanToolkit {
    /// Build a toolkit for `network`, loading its address book from disk
    pub fn new(options: &ToolkitOptions, network: StellarNetworkConfig) -> Result<Self> {
        if options.admin_secret.trim().is_empty() {
            return Err(ToolkitError::MissingAdminSecret);
        }

        let admin = Keypair::from_secret(&options.admin_secret)?;
        let logger = options.logger();

        let rpc = RpcClient::new(network.soroban_rpc_url.clone())
            .with_friendbot(network.friendbot_url.clone());
        let horizon = HorizonClient::new(network.horizon_rpc_url.clone());
        let address_book =
            AddressBook::load_from_file(&network.network, &options.address_book_path, &logger);

        logger.full(format!(
            "Toolkit ready for network {} with admin {}",
            network.network,
            admin.public_key()
        ));

        Ok(Self {
            rpc: Arc::new(rpc),
            horizon,
            passphrase: network.network_passphrase.clone(),
            friendbot_url: network.friendbot_url.clone(),
            admin,
            contract_paths: options.contract_paths.clone(),
            address_book,
            logger,
            polling: options.polling,
            network,
        })
    }

    /// Replace the RPC provider
    pub fn with_rpc(mut self, rpc: Arc<dyn SorobanRpc>) -> Self {
        self.rpc = rpc;
        self
    }

    pub fn get_contract_path(&self, key: &str) -> Result<&Path> {
        self.contract_paths
            .get(key)
            .filter(|path| !path.as_os_str().is_empty())
            .map(PathBuf::as_path)
            .ok_or_else(|| ToolkitError::ContractPathNotDefined(key.to_string()))
    }

    /// Parse a secret seed into a signer
    pub fn create_keypair(&self, secret: &str) -> Result<Keypair> {
        Ok(Keypair::from_secret(secret)?)
    }

    pub fn rpc(&self) -> &dyn SorobanRpc {
        self.rpc.as_ref()
    }

    pub fn horizon(&self) -> &HorizonClient {
        &self.horizon
    }

    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    pub fn friendbot_url(&self) -> Option<&str> {
        self.friendbot_url.as_deref()
    }

    pub fn admin(&self) -> &Keypair {
        &self.admin
    }

    pub fn contract_paths(&self) -> &HashMap<String, PathBuf> {
        &self.contract_paths
    }

    pub fn address_book(&self) -> &AddressBook {
        &self.address_book
    }

    pub fn address_book_mut(&mut self) -> &mut AddressBook {
        &mut self.address_book
    }

    pub fn logger(&self) -> &VerboseLogger {
        &self.logger
    }

    pub fn polling(&self) -> PollConfig {
        self.polling
    }

    pub fn network(&self) -> &StellarNetworkConfig {
        &self.network
    }
}
