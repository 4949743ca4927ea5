// Soroban token deployment

use super::contract::{deploy_contract, install_contract};
use crate::error::Result;
use crate::keys::Keypair;
use crate::toolkit::SorobanToolkit;
use crate::utils::scval::{address_to_scval, string_to_scval, u32_to_scval};

/// Contract path and address book key of the token WASM
pub const SOROBAN_TOKEN_WASM_KEY: &str = "soroban_token";

/// Install the token WASM unless its hash is already recorded, then deploy it keyed by `symbol`
pub async fn deploy_soroban_token(
    toolkit: &mut SorobanToolkit,
    name: &str,
    symbol: &str,
    decimals: u32,
    signer: Option<&Keypair>,
) -> Result<String> {
    toolkit
        .logger()
        .some(format!("Deploying Token: {} {}", name, symbol));

    if toolkit.address_book().get_wasm_hash(SOROBAN_TOKEN_WASM_KEY).is_ok() {
        toolkit.logger().full("WASM is already installed");
    } else {
        toolkit
            .logger()
            .full("WASM not found in AddressBook, proceeding with installation");
        install_contract(toolkit, SOROBAN_TOKEN_WASM_KEY, None, signer).await?;
    }

    let admin = signer.unwrap_or_else(|| toolkit.admin()).public_key();
    let args = vec![
        address_to_scval(&admin)?,
        u32_to_scval(decimals),
        string_to_scval(name)?,
        string_to_scval(symbol)?,
    ];

    deploy_contract(toolkit, SOROBAN_TOKEN_WASM_KEY, symbol, args, signer).await
}
