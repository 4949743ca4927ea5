// Contract, token and transaction managers built on a `SorobanToolkit`

pub mod contract;
pub mod token;
pub mod transaction;

pub use contract::{
    bump_contract_code, bump_contract_instance, compute_contract_id, deploy_contract,
    deploy_contract_with_salt, install_contract, invoke_contract, invoke_custom_contract,
};
pub use token::{deploy_soroban_token, SOROBAN_TOKEN_WASM_KEY};
pub use transaction::{
    assemble, create_transaction, create_transaction_builder, send_transaction, sign_transaction,
    transaction_hash, OperationInput, SubmittedTransaction, TransactionBuilder,
    TransactionOutcome,
};
