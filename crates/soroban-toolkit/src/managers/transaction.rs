// Transaction building, simulation, assembly, signing and submission

use std::time::{SystemTime, UNIX_EPOCH};
use stellar_xdr::curr::{
    Limits, Memo, MuxedAccount, Operation, OperationBody, Preconditions, SequenceNumber,
    SorobanTransactionData, TimeBounds, TimePoint, Transaction, TransactionEnvelope,
    TransactionExt, TransactionSignaturePayload, TransactionSignaturePayloadTaggedTransaction,
    TransactionV1Envelope, VecM, WriteXdr,
};

use crate::error::{Result, ToolkitError};
use crate::keys::Keypair;
use crate::rpc::{
    decode_xdr, encode_xdr, GetTransactionResponse, GetTransactionStatus,
    SendTransactionStatus, SimulateTransactionResponse,
};
use crate::toolkit::SorobanToolkit;
use crate::utils::crypto::{network_id, sha256};

/// Fee per operation in stroops
pub const BASE_FEE: u32 = 100;

/// Builds a transaction for one source account
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    source: MuxedAccount,
    sequence: i64,
    fee_per_operation: u32,
    time_bounds: TimeBounds,
    memo: Memo,
    operations: Vec<Operation>,
    soroban_data: Option<SorobanTransactionData>,
}

impl TransactionBuilder {
    /// `sequence` is the account's current sequence; the built transaction uses the next one
    pub fn new(source: MuxedAccount, sequence: i64) -> Self {
        Self {
            source,
            sequence,
            fee_per_operation: BASE_FEE,
            time_bounds: TimeBounds {
                min_time: TimePoint(0),
                max_time: TimePoint(0),
            },
            memo: Memo::None,
            operations: vec![],
            soroban_data: None,
        }
    }

    pub fn set_fee(mut self, fee_per_operation: u32) -> Self {
        self.fee_per_operation = fee_per_operation;
        self
    }

    /// Valid from now until `seconds` from now; zero means no upper bound
    pub fn set_timeout(mut self, seconds: u64) -> Self {
        let max_time = if seconds == 0 {
            0
        } else {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|now| now.as_secs())
                .unwrap_or_default()
                .saturating_add(seconds)
        };
        self.time_bounds.max_time = TimePoint(max_time);
        self
    }

    pub fn set_time_bounds(mut self, min_time: u64, max_time: u64) -> Self {
        self.time_bounds = TimeBounds {
            min_time: TimePoint(min_time),
            max_time: TimePoint(max_time),
        };
        self
    }

    pub fn set_memo(mut self, memo: Memo) -> Self {
        self.memo = memo;
        self
    }

    pub fn set_soroban_data(mut self, soroban_data: SorobanTransactionData) -> Self {
        self.soroban_data = Some(soroban_data);
        self
    }

    pub fn add_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn build(self) -> Result<Transaction> {
        if self.operations.is_empty() {
            return Err(ToolkitError::InvalidArgument(
                "Transaction has no operations".to_string(),
            ));
        }

        let operation_count = u32::try_from(self.operations.len()).map_err(|_| {
            ToolkitError::InvalidArgument("Too many operations".to_string())
        })?;
        let mut fee = self.fee_per_operation.saturating_mul(operation_count);

        let ext = match self.soroban_data {
            Some(data) => {
                fee = add_resource_fee(fee, data.resource_fee)?;
                TransactionExt::V1(data)
            }
            None => TransactionExt::V0,
        };

        Ok(Transaction {
            source_account: self.source,
            fee,
            seq_num: SequenceNumber(self.sequence + 1),
            cond: Preconditions::Time(self.time_bounds),
            memo: self.memo,
            operations: self.operations.try_into()?,
            ext,
        })
    }
}

fn add_resource_fee(fee: u32, resource_fee: i64) -> Result<u32> {
    u32::try_from(resource_fee)
        .ok()
        .and_then(|resource_fee| fee.checked_add(resource_fee))
        .ok_or_else(|| {
            ToolkitError::UnexpectedValue(format!(
                "Fee {} plus resource fee {} does not fit in a transaction fee",
                fee, resource_fee
            ))
        })
}

/// An operation given either as XDR or as its base64 encoding
#[derive(Debug, Clone)]
pub enum OperationInput {
    Xdr(Operation),
    Base64(String),
}

impl OperationInput {
    pub fn into_operation(self) -> Result<Operation> {
        match self {
            OperationInput::Xdr(operation) => Ok(operation),
            OperationInput::Base64(encoded) => Ok(decode_xdr(&encoded)?),
        }
    }
}

impl From<Operation> for OperationInput {
    fn from(operation: Operation) -> Self {
        OperationInput::Xdr(operation)
    }
}

impl From<String> for OperationInput {
    fn from(encoded: String) -> Self {
        OperationInput::Base64(encoded)
    }
}

impl From<&str> for OperationInput {
    fn from(encoded: &str) -> Self {
        OperationInput::Base64(encoded.to_string())
    }
}

/// A transaction that reached the network
#[derive(Debug, Clone)]
pub struct SubmittedTransaction {
    /// Hex transaction hash
    pub hash: String,
    pub send_status: SendTransactionStatus,
    pub error_result_xdr: Option<String>,
    /// Terminal status; `None` when the submission was not accepted as pending
    pub final_status: Option<GetTransactionResponse>,
}

impl SubmittedTransaction {
    pub fn is_success(&self) -> bool {
        matches!(
            &self.final_status,
            Some(response) if response.status == GetTransactionStatus::Success
        )
    }
}

/// Result of `send_transaction`
#[derive(Debug, Clone)]
pub enum TransactionOutcome {
    Simulated(SimulateTransactionResponse),
    Submitted(SubmittedTransaction),
}

impl TransactionOutcome {
    pub fn is_success(&self) -> bool {
        match self {
            TransactionOutcome::Simulated(response) => !response.is_error(),
            TransactionOutcome::Submitted(submitted) => submitted.is_success(),
        }
    }

    pub fn simulation(&self) -> Option<&SimulateTransactionResponse> {
        match self {
            TransactionOutcome::Simulated(response) => Some(response),
            TransactionOutcome::Submitted(_) => None,
        }
    }

    pub fn submitted(&self) -> Option<&SubmittedTransaction> {
        match self {
            TransactionOutcome::Simulated(_) => None,
            TransactionOutcome::Submitted(submitted) => Some(submitted),
        }
    }
}

/// Builder sourced from `signer` (or the admin) at its current on-chain sequence
pub async fn create_transaction_builder(
    toolkit: &SorobanToolkit,
    signer: Option<&Keypair>,
) -> Result<TransactionBuilder> {
    let source = signer.unwrap_or_else(|| toolkit.admin());
    let account = toolkit.rpc().get_account(&source.public_key()).await?;
    toolkit
        .logger()
        .full(format!("Source {} at sequence {}", account.account_id, account.sequence));
    Ok(TransactionBuilder::new(source.muxed_account(), account.sequence))
}

/// Wrap one operation in a transaction and send it
pub async fn create_transaction(
    toolkit: &SorobanToolkit,
    operation: impl Into<OperationInput>,
    simulate_only: bool,
    signer: Option<&Keypair>,
) -> Result<TransactionOutcome> {
    let operation = operation.into().into_operation()?;
    let transaction = create_transaction_builder(toolkit, signer)
        .await?
        .add_operation(operation)
        .build()?;
    send_transaction(toolkit, transaction, simulate_only, signer).await
}

/// Simulate, then (unless `simulate_only`) assemble, sign, submit and poll to a terminal status
pub async fn send_transaction(
    toolkit: &SorobanToolkit,
    transaction: Transaction,
    simulate_only: bool,
    signer: Option<&Keypair>,
) -> Result<TransactionOutcome> {
    let logger = toolkit.logger();
    let unsigned = TransactionEnvelope::Tx(TransactionV1Envelope {
        tx: transaction.clone(),
        signatures: VecM::default(),
    });

    let simulation = toolkit.rpc().simulate_transaction(&unsigned).await?;

    if simulation.is_error() {
        logger.full(format!("simulationResponse: {:?}", simulation));
        return Err(ToolkitError::Simulation);
    }
    if simulate_only {
        return Ok(TransactionOutcome::Simulated(simulation));
    }

    let assembled = assemble(transaction, &simulation)?;
    let source = signer.unwrap_or_else(|| toolkit.admin());
    let hash = hex::encode(transaction_hash(&assembled, toolkit.passphrase())?);
    let envelope = sign_transaction(toolkit, &assembled, source)?;

    logger.some(format!("Transaction Hash: {}", hash));
    logger.full(format!("SIGNED TX: {}", encode_xdr(&envelope)?));
    logger.full("submitting tx...");

    let sent = toolkit.rpc().send_transaction(&envelope).await?;

    let final_status = if sent.status == SendTransactionStatus::Pending {
        Some(poll_transaction(toolkit, &hash).await?)
    } else {
        logger.warn(format!(
            "Transaction {} was not accepted: {:?}",
            hash, sent.status
        ));
        None
    };

    Ok(TransactionOutcome::Submitted(SubmittedTransaction {
        hash,
        send_status: sent.status,
        error_result_xdr: sent.error_result_xdr,
        final_status,
    }))
}

/// Fetch the transaction status until it is terminal or the attempts run out
async fn poll_transaction(toolkit: &SorobanToolkit, hash: &str) -> Result<GetTransactionResponse> {
    let logger = toolkit.logger();
    let polling = toolkit.polling();

    for _ in 0..polling.max_attempts {
        tokio::time::sleep(polling.interval()).await;
        logger.some("waiting for tx...");

        let response = toolkit.rpc().get_transaction(hash).await?;
        match response.status {
            GetTransactionStatus::Success => {
                logger.some("Transaction successful");
                return Ok(response);
            }
            GetTransactionStatus::Failed => {
                logger.warn(format!("Transaction {} failed", hash));
                return Ok(response);
            }
            GetTransactionStatus::NotFound => {}
        }
    }

    Err(ToolkitError::PollTimeout {
        hash: hash.to_string(),
        attempts: polling.max_attempts,
    })
}

/// Apply simulation results: soroban data, resource fee and recorded authorizations
pub fn assemble(
    mut transaction: Transaction,
    simulation: &SimulateTransactionResponse,
) -> Result<Transaction> {
    if let Some(data) = simulation.soroban_data()? {
        transaction.ext = TransactionExt::V1(data);
    }

    let min_resource_fee = simulation.min_resource_fee()?;
    transaction.fee = u32::try_from(min_resource_fee)
        .ok()
        .and_then(|resource_fee| transaction.fee.checked_add(resource_fee))
        .ok_or_else(|| {
            ToolkitError::UnexpectedValue(format!(
                "Fee {} plus minimum resource fee {} does not fit in a transaction fee",
                transaction.fee, min_resource_fee
            ))
        })?;

    let auth = simulation.auth_entries()?;
    if !auth.is_empty() {
        let mut operations = transaction.operations.to_vec();
        if let Some(Operation {
            body: OperationBody::InvokeHostFunction(op),
            ..
        }) = operations.first_mut()
        {
            if op.auth.is_empty() {
                op.auth = auth.try_into()?;
            }
        }
        transaction.operations = operations.try_into()?;
    }

    Ok(transaction)
}

/// Hash signed by every signer: SHA-256 of the network id and tagged transaction
pub fn transaction_hash(transaction: &Transaction, passphrase: &str) -> Result<[u8; 32]> {
    let payload = TransactionSignaturePayload {
        network_id: network_id(passphrase),
        tagged_transaction: TransactionSignaturePayloadTaggedTransaction::Tx(transaction.clone()),
    };
    Ok(sha256(&payload.to_xdr(Limits::none())?))
}

/// Envelope carrying `signer`'s signature for the toolkit's network
pub fn sign_transaction(
    toolkit: &SorobanToolkit,
    transaction: &Transaction,
    signer: &Keypair,
) -> Result<TransactionEnvelope> {
    let hash = transaction_hash(transaction, toolkit.passphrase())?;
    let signature = signer.sign_decorated(&hash)?;
    Ok(TransactionEnvelope::Tx(TransactionV1Envelope {
        tx: transaction.clone(),
        signatures: vec![signature].try_into()?,
    }))
}
