// Contract lifecycle: upload WASM, deploy, invoke and extend TTLs

use stellar_xdr::curr::{
    ContractDataDurability, ContractExecutable, ContractIdPreimage, ContractIdPreimageFromAddress,
    CreateContractArgsV2, ExtendFootprintTtlOp, ExtensionPoint, Hash, HashIdPreimage,
    HashIdPreimageContractId, HostFunction, InvokeContractArgs, InvokeHostFunctionOp,
    LedgerFootprint, LedgerKey, LedgerKeyContractCode, LedgerKeyContractData, Limits, Operation,
    OperationBody, ScAddress, ScVal, SorobanResources, SorobanTransactionData,
    SorobanTransactionDataExt, Uint256, VecM, WriteXdr,
};

use super::transaction::{
    create_transaction, create_transaction_builder, send_transaction, TransactionOutcome,
};
use crate::error::{Result, ToolkitError};
use crate::keys::Keypair;
use crate::toolkit::SorobanToolkit;
use crate::utils::crypto::{decode_hash_hex, network_id, sha256};
use crate::utils::expand_path;
use crate::utils::scval::{contract_address, encode_contract_id, symbol};

/// Ledgers an extended entry stays live for, roughly one year
pub const BUMP_LEDGERS: u32 = 535_670;

/// Upload WASM bytes (given, or read from the configured path) and record its hash
pub async fn install_contract(
    toolkit: &mut SorobanToolkit,
    wasm_key: &str,
    wasm: Option<&[u8]>,
    signer: Option<&Keypair>,
) -> Result<TransactionOutcome> {
    let contract_wasm = match wasm {
        Some(bytes) => bytes.to_vec(),
        None => {
            let path = expand_path(toolkit.get_contract_path(wasm_key)?);
            std::fs::read(&path).map_err(|source| ToolkitError::WasmRead { path, source })?
        }
    };
    let wasm_hash = hex::encode(sha256(&contract_wasm));

    toolkit.logger().full(format!("Installing contract: {}", wasm_key));
    toolkit.logger().full(format!("WASM hash: {}", wasm_hash));

    toolkit.address_book_mut().stage_wasm_hash(wasm_key, &wasm_hash);
    toolkit.address_book().write_to_file()?;

    let operation = host_function_operation(HostFunction::UploadContractWasm(
        contract_wasm.try_into()?,
    ));
    let outcome = create_transaction(toolkit, operation, false, signer).await?;

    if outcome.is_success() {
        toolkit.address_book_mut().confirm_wasm_hash(wasm_key);
        toolkit.address_book().write_to_file()?;
    } else {
        toolkit
            .logger()
            .warn(format!("WASM upload for {} was not confirmed", wasm_key));
    }

    Ok(outcome)
}

/// Deploy an installed WASM under a random salt; returns the new contract id
pub async fn deploy_contract(
    toolkit: &mut SorobanToolkit,
    wasm_key: &str,
    contract_key: &str,
    constructor_args: Vec<ScVal>,
    signer: Option<&Keypair>,
) -> Result<String> {
    let salt: [u8; 32] = rand::random();
    deploy_contract_with_salt(toolkit, wasm_key, contract_key, constructor_args, salt, signer).await
}

/// Deploy with a caller-chosen salt, giving a predictable contract id
pub async fn deploy_contract_with_salt(
    toolkit: &mut SorobanToolkit,
    wasm_key: &str,
    contract_key: &str,
    constructor_args: Vec<ScVal>,
    salt: [u8; 32],
    signer: Option<&Keypair>,
) -> Result<String> {
    let deployer = signer.unwrap_or_else(|| toolkit.admin()).sc_address();
    let preimage = contract_id_preimage(deployer, salt);
    let contract_id = contract_id_from_preimage(toolkit.passphrase(), &preimage)?;

    toolkit.address_book_mut().stage_contract_id(contract_key, &contract_id);
    toolkit.address_book().write_to_file()?;

    let wasm_hash = decode_hash_hex(toolkit.address_book().get_wasm_hash(wasm_key)?)
        .map_err(ToolkitError::InvalidArgument)?;

    toolkit
        .logger()
        .some(format!("Deploying contract: {}", contract_key));

    let operation = host_function_operation(HostFunction::CreateContractV2(CreateContractArgsV2 {
        contract_id_preimage: preimage,
        executable: ContractExecutable::Wasm(Hash(wasm_hash)),
        constructor_args: constructor_args.try_into()?,
    }));
    let outcome = create_transaction(toolkit, operation, false, signer).await?;

    if outcome.is_success() {
        toolkit.address_book_mut().confirm_contract_id(contract_key);
        toolkit.address_book().write_to_file()?;
    } else {
        toolkit
            .logger()
            .warn(format!("Deployment of {} was not confirmed", contract_key));
    }

    Ok(contract_id)
}

/// Contract id (`C...`) that `deployer` gets for `salt` on the network with `passphrase`
pub fn compute_contract_id(passphrase: &str, deployer: &ScAddress, salt: &[u8; 32]) -> Result<String> {
    contract_id_from_preimage(passphrase, &contract_id_preimage(deployer.clone(), *salt))
}

fn contract_id_preimage(deployer: ScAddress, salt: [u8; 32]) -> ContractIdPreimage {
    ContractIdPreimage::Address(ContractIdPreimageFromAddress {
        address: deployer,
        salt: Uint256(salt),
    })
}

fn contract_id_from_preimage(passphrase: &str, preimage: &ContractIdPreimage) -> Result<String> {
    let hash_preimage = HashIdPreimage::ContractId(HashIdPreimageContractId {
        network_id: network_id(passphrase),
        contract_id_preimage: preimage.clone(),
    });
    Ok(encode_contract_id(sha256(&hash_preimage.to_xdr(Limits::none())?)))
}

/// Invoke a method on a contract recorded in the address book
pub async fn invoke_contract(
    toolkit: &SorobanToolkit,
    contract_key: &str,
    method: &str,
    args: Vec<ScVal>,
    simulate_only: bool,
    signer: Option<&Keypair>,
) -> Result<TransactionOutcome> {
    let contract_id = toolkit.address_book().get_contract_id(contract_key)?;
    let operation = invoke_operation(contract_id, method, args)?;

    toolkit
        .logger()
        .some(format!("Invoking contract {}: {}", contract_key, method));
    create_transaction(toolkit, operation, simulate_only, signer).await
}

/// Invoke a method on any contract by id
pub async fn invoke_custom_contract(
    toolkit: &SorobanToolkit,
    contract_id: &str,
    method: &str,
    args: Vec<ScVal>,
    simulate_only: bool,
    signer: Option<&Keypair>,
) -> Result<TransactionOutcome> {
    let operation = invoke_operation(contract_id, method, args)?;

    toolkit
        .logger()
        .some(format!("Invoking contract {}: {}", contract_id, method));
    create_transaction(toolkit, operation, simulate_only, signer).await
}

/// `InvokeHostFunction` operation calling `method` on `contract_id`
pub fn invoke_operation(contract_id: &str, method: &str, args: Vec<ScVal>) -> Result<Operation> {
    Ok(host_function_operation(HostFunction::InvokeContract(
        InvokeContractArgs {
            contract_address: contract_address(contract_id)?,
            function_name: symbol(method)?,
            args: args.try_into()?,
        },
    )))
}

fn host_function_operation(host_function: HostFunction) -> Operation {
    Operation {
        source_account: None,
        body: OperationBody::InvokeHostFunction(InvokeHostFunctionOp {
            host_function,
            auth: VecM::default(),
        }),
    }
}

/// Extend the TTL of a contract's instance entry
pub async fn bump_contract_instance(
    toolkit: &SorobanToolkit,
    contract_id: &str,
    signer: Option<&Keypair>,
) -> Result<TransactionOutcome> {
    toolkit
        .logger()
        .some(format!("Bumping contract instance: {}", contract_id));

    let instance_key = LedgerKey::ContractData(LedgerKeyContractData {
        contract: contract_address(contract_id)?,
        key: ScVal::LedgerKeyContractInstance,
        durability: ContractDataDurability::Persistent,
    });
    bump_ledger_key(toolkit, instance_key, signer).await
}

/// Extend the TTL of an uploaded WASM's code entry
pub async fn bump_contract_code(
    toolkit: &SorobanToolkit,
    wasm_hash: &str,
    signer: Option<&Keypair>,
) -> Result<TransactionOutcome> {
    let hash = decode_hash_hex(wasm_hash).map_err(ToolkitError::InvalidArgument)?;
    toolkit
        .logger()
        .some(format!("Bumping contract code: {}", wasm_hash));

    let code_key = LedgerKey::ContractCode(LedgerKeyContractCode { hash: Hash(hash) });
    bump_ledger_key(toolkit, code_key, signer).await
}

async fn bump_ledger_key(
    toolkit: &SorobanToolkit,
    key: LedgerKey,
    signer: Option<&Keypair>,
) -> Result<TransactionOutcome> {
    let transaction = create_transaction_builder(toolkit, signer)
        .await?
        .add_operation(extend_ttl_operation())
        .set_soroban_data(read_only_footprint(key)?)
        .build()?;
    send_transaction(toolkit, transaction, false, signer).await
}

fn extend_ttl_operation() -> Operation {
    Operation {
        source_account: None,
        body: OperationBody::ExtendFootprintTtl(ExtendFootprintTtlOp {
            ext: ExtensionPoint::V0,
            extend_to: BUMP_LEDGERS,
        }),
    }
}

/// Soroban data declaring `key` read-only with zero resources and fee
fn read_only_footprint(key: LedgerKey) -> Result<SorobanTransactionData> {
    Ok(SorobanTransactionData {
        ext: SorobanTransactionDataExt::V0,
        resources: SorobanResources {
            footprint: LedgerFootprint {
                read_only: vec![key].try_into()?,
                read_write: VecM::default(),
            },
            instructions: 0,
            disk_read_bytes: 0,
            write_bytes: 0,
        },
        resource_fee: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::networks::{FUTURENET_PASSPHRASE, TESTNET_PASSPHRASE};

    #[test]
    fn test_contract_id_is_deterministic() {
        let deployer = Keypair::from_seed(&[5; 32]).sc_address();
        let salt = [8u8; 32];

        let first = compute_contract_id(TESTNET_PASSPHRASE, &deployer, &salt).unwrap();
        let second = compute_contract_id(TESTNET_PASSPHRASE, &deployer, &salt).unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with('C'));
        assert_eq!(first.len(), 56);
    }

    #[test]
    fn test_contract_id_depends_on_inputs() {
        let deployer = Keypair::from_seed(&[5; 32]).sc_address();
        let other = Keypair::from_seed(&[6; 32]).sc_address();
        let salt = [8u8; 32];

        let base = compute_contract_id(TESTNET_PASSPHRASE, &deployer, &salt).unwrap();
        assert_ne!(base, compute_contract_id(FUTURENET_PASSPHRASE, &deployer, &salt).unwrap());
        assert_ne!(base, compute_contract_id(TESTNET_PASSPHRASE, &other, &salt).unwrap());
        assert_ne!(base, compute_contract_id(TESTNET_PASSPHRASE, &deployer, &[9; 32]).unwrap());
    }

    #[test]
    fn test_read_only_footprint() {
        let key = LedgerKey::ContractCode(LedgerKeyContractCode { hash: Hash([1; 32]) });
        let data = read_only_footprint(key.clone()).unwrap();

        assert_eq!(data.resource_fee, 0);
        assert_eq!(data.resources.instructions, 0);
        assert_eq!(data.resources.footprint.read_only.to_vec(), vec![key]);
        assert!(data.resources.footprint.read_write.is_empty());
    }

    #[test]
    fn test_invoke_operation() {
        let contract_id = encode_contract_id([4; 32]);
        let operation = invoke_operation(&contract_id, "balance", vec![ScVal::U32(1)]).unwrap();

        match operation.body {
            OperationBody::InvokeHostFunction(InvokeHostFunctionOp {
                host_function: HostFunction::InvokeContract(args),
                auth,
            }) => {
                assert_eq!(args.function_name, symbol("balance").unwrap());
                assert_eq!(args.args.to_vec(), vec![ScVal::U32(1)]);
                assert!(auth.is_empty());
            }
            other => panic!("unexpected operation {:?}", other),
        }

        assert!(invoke_operation("GNOTACONTRACT", "balance", vec![]).is_err());
    }
}
