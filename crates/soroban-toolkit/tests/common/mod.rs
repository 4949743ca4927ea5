// Shared fixtures: an in-process SorobanRpc and toolkit construction
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};
use stellar_xdr::curr::{
    LedgerFootprint, Operation, ScVal, SorobanResources, SorobanTransactionData,
    SorobanTransactionDataExt, Transaction, TransactionEnvelope, VecM,
};

use soroban_toolkit::config::{testnet, PollConfig};
use soroban_toolkit::rpc::{
    encode_xdr, AccountState, GetTransactionResponse, GetTransactionStatus, RpcError,
    SendTransactionResponse, SendTransactionStatus, SimulateHostFunctionResult,
    SimulateTransactionResponse, SorobanRpc,
};
use soroban_toolkit::{Keypair, LogCapture, SorobanToolkit, ToolkitOptions, VerboseLogger, Verbosity};

pub const ACCOUNT_SEQUENCE: i64 = 1_000;
pub const MIN_RESOURCE_FEE: u32 = 1_000;
pub const TX_HASH_LEN: usize = 64;

/// Scripted RPC provider that records every call
pub struct MockRpc {
    simulation: Mutex<SimulateTransactionResponse>,
    send_status: Mutex<SendTransactionStatus>,
    statuses: Mutex<VecDeque<GetTransactionStatus>>,
    airdrop_failure: Mutex<Option<u16>>,
    pub accounts_fetched: Mutex<Vec<String>>,
    pub simulated: Mutex<Vec<TransactionEnvelope>>,
    pub sent: Mutex<Vec<TransactionEnvelope>>,
    pub polled: Mutex<Vec<String>>,
    pub airdrops: Mutex<Vec<(String, Option<String>)>>,
}

impl MockRpc {
    /// Successful simulations, PENDING submissions and an immediate SUCCESS
    pub fn new() -> Self {
        Self {
            simulation: Mutex::new(simulation_returning(ScVal::Void)),
            send_status: Mutex::new(SendTransactionStatus::Pending),
            statuses: Mutex::new(VecDeque::from(vec![GetTransactionStatus::Success])),
            airdrop_failure: Mutex::new(None),
            accounts_fetched: Mutex::new(vec![]),
            simulated: Mutex::new(vec![]),
            sent: Mutex::new(vec![]),
            polled: Mutex::new(vec![]),
            airdrops: Mutex::new(vec![]),
        }
    }

    pub fn with_simulation(self, simulation: SimulateTransactionResponse) -> Self {
        *self.simulation.lock().unwrap() = simulation;
        self
    }

    pub fn with_send_status(self, status: SendTransactionStatus) -> Self {
        *self.send_status.lock().unwrap() = status;
        self
    }

    /// Statuses returned by successive `getTransaction` calls; NOT_FOUND once exhausted
    pub fn with_statuses(self, statuses: Vec<GetTransactionStatus>) -> Self {
        *self.statuses.lock().unwrap() = VecDeque::from(statuses);
        self
    }

    pub fn with_airdrop_failure(self, status: u16) -> Self {
        *self.airdrop_failure.lock().unwrap() = Some(status);
        self
    }

    pub fn sent_transactions(&self) -> Vec<Transaction> {
        self.sent.lock().unwrap().iter().map(envelope_tx).collect()
    }

    pub fn simulated_transactions(&self) -> Vec<Transaction> {
        self.simulated.lock().unwrap().iter().map(envelope_tx).collect()
    }

    pub fn poll_count(&self) -> usize {
        self.polled.lock().unwrap().len()
    }
}

#[async_trait]
impl SorobanRpc for MockRpc {
    async fn get_account(&self, account_id: &str) -> Result<AccountState, RpcError> {
        self.accounts_fetched.lock().unwrap().push(account_id.to_string());
        Ok(AccountState {
            account_id: account_id.to_string(),
            sequence: ACCOUNT_SEQUENCE,
        })
    }

    async fn simulate_transaction(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<SimulateTransactionResponse, RpcError> {
        self.simulated.lock().unwrap().push(envelope.clone());
        Ok(self.simulation.lock().unwrap().clone())
    }

    async fn send_transaction(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<SendTransactionResponse, RpcError> {
        self.sent.lock().unwrap().push(envelope.clone());
        Ok(SendTransactionResponse {
            status: *self.send_status.lock().unwrap(),
            hash: "00".repeat(32),
            latest_ledger: 10,
            error_result_xdr: None,
        })
    }

    async fn get_transaction(&self, hash: &str) -> Result<GetTransactionResponse, RpcError> {
        self.polled.lock().unwrap().push(hash.to_string());
        let status = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(GetTransactionStatus::NotFound);
        Ok(GetTransactionResponse {
            status,
            latest_ledger: 11,
            ledger: None,
            envelope_xdr: None,
            result_xdr: None,
            result_meta_xdr: None,
        })
    }

    async fn request_airdrop(
        &self,
        account_id: &str,
        friendbot_url: Option<&str>,
    ) -> Result<(), RpcError> {
        self.airdrops
            .lock()
            .unwrap()
            .push((account_id.to_string(), friendbot_url.map(str::to_string)));
        match *self.airdrop_failure.lock().unwrap() {
            Some(status) => Err(RpcError::Http {
                status,
                body: "friendbot error".to_string(),
            }),
            None => Ok(()),
        }
    }
}

pub fn envelope_tx(envelope: &TransactionEnvelope) -> Transaction {
    match envelope {
        TransactionEnvelope::Tx(v1) => v1.tx.clone(),
        other => panic!("unexpected envelope {:?}", other),
    }
}

pub fn first_operation(transaction: &Transaction) -> Operation {
    transaction.operations[0].clone()
}

pub fn simulated_data() -> SorobanTransactionData {
    SorobanTransactionData {
        ext: SorobanTransactionDataExt::V0,
        resources: SorobanResources {
            footprint: LedgerFootprint {
                read_only: VecM::default(),
                read_write: VecM::default(),
            },
            instructions: 5_000,
            disk_read_bytes: 100,
            write_bytes: 50,
        },
        resource_fee: MIN_RESOURCE_FEE as i64,
    }
}

/// Successful simulation whose first result is `value`
pub fn simulation_returning(value: ScVal) -> SimulateTransactionResponse {
    SimulateTransactionResponse {
        latest_ledger: 10,
        error: None,
        transaction_data: Some(encode_xdr(&simulated_data()).unwrap()),
        min_resource_fee: Some(MIN_RESOURCE_FEE.to_string()),
        results: vec![SimulateHostFunctionResult {
            auth: vec![],
            xdr: encode_xdr(&value).unwrap(),
        }],
        events: vec![],
    }
}

pub fn failed_simulation() -> SimulateTransactionResponse {
    SimulateTransactionResponse {
        latest_ledger: 10,
        error: Some("HostError: Error(WasmVm, InvalidAction)".to_string()),
        ..Default::default()
    }
}

/// Fast polling so timeouts resolve immediately
pub fn fast_polling() -> PollConfig {
    PollConfig {
        interval_ms: 0,
        max_attempts: 5,
    }
}

pub struct TestToolkit {
    pub toolkit: SorobanToolkit,
    pub rpc: Arc<MockRpc>,
    pub capture: LogCapture,
    pub admin: Keypair,
}

pub fn test_toolkit(rpc: MockRpc, address_book_dir: &Path, verbosity: Verbosity) -> TestToolkit {
    test_toolkit_with_options(rpc, address_book_dir, verbosity, |options| options)
}

pub fn test_toolkit_with_options(
    rpc: MockRpc,
    address_book_dir: &Path,
    verbosity: Verbosity,
    configure: impl FnOnce(ToolkitOptions) -> ToolkitOptions,
) -> TestToolkit {
    let admin = Keypair::from_seed(&[11; 32]);
    let (logger, capture) = VerboseLogger::capturing(verbosity);
    let options = configure(
        ToolkitOptions::new(admin.secret())
            .with_address_book_path(address_book_dir)
            .with_polling(fast_polling())
            .with_logger(logger),
    );

    let rpc = Arc::new(rpc);
    let toolkit = SorobanToolkit::new(&options, testnet())
        .unwrap()
        .with_rpc(rpc.clone());

    TestToolkit {
        toolkit,
        rpc,
        capture,
        admin,
    }
}
