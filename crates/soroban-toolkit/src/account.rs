// Account helpers: faucet funding and token balance reads

use stellar_xdr::curr::ScVal;

use crate::error::{Result, ToolkitError};
use crate::keys::Keypair;
use crate::managers::contract::invoke_operation;
use crate::managers::transaction::create_transaction;
use crate::toolkit::SorobanToolkit;
use crate::utils::scval::{address_to_scval, scval_to_i128};

/// Fund `account_id` from the network faucet. Failures are logged, never returned.
pub async fn airdrop_account(toolkit: &SorobanToolkit, account_id: &str) {
    let logger = toolkit.logger();
    logger.full(format!("Start funding account: {}", account_id));

    match toolkit
        .rpc()
        .request_airdrop(account_id, toolkit.friendbot_url())
        .await
    {
        Ok(()) => logger.some(format!("Funded account: {}", account_id)),
        Err(e) => {
            if e.http_status() == Some(502) {
                logger.warn("Couldnt fund account, Friendbot is unavailable.");
            }
            logger.full(format!("Airdrop error: {}", e));
            logger.some(format!("Account {} is already funded", account_id));
        }
    }
}

/// Token balance of `owner`, read through a simulated `balance` call
pub async fn get_token_balance(
    toolkit: &SorobanToolkit,
    contract_id: &str,
    owner: &str,
    signer: Option<&Keypair>,
) -> Result<i128> {
    let operation = invoke_operation(contract_id, "balance", vec![address_to_scval(owner)?])?;
    let outcome = create_transaction(toolkit, operation, true, signer).await?;

    let value = match outcome.simulation() {
        Some(simulation) => simulation.result_value()?,
        None => None,
    };

    match value {
        None | Some(ScVal::Void) => Err(ToolkitError::NoResult),
        Some(value) => scval_to_i128(&value),
    }
}
