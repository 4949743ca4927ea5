// Conversions between native values, strkey addresses and ScVal arguments

use stellar_strkey::Strkey;
use stellar_xdr::curr::{
    AccountId, ContractId, Hash, Int128Parts, PublicKey, ScAddress, ScString, ScSymbol, ScVal,
    StringM, UInt128Parts, Uint256,
};

use crate::error::{Result, ToolkitError};

/// Parse a `G...` account or `C...` contract strkey into an ScAddress
pub fn parse_address(address: &str) -> Result<ScAddress> {
    match Strkey::from_string(address.trim()) {
        Ok(Strkey::PublicKeyEd25519(key)) => Ok(ScAddress::Account(AccountId(
            PublicKey::PublicKeyTypeEd25519(Uint256(key.0)),
        ))),
        Ok(Strkey::Contract(contract)) => Ok(ScAddress::Contract(ContractId(Hash(contract.0)))),
        Ok(_) => Err(ToolkitError::InvalidAddress(format!(
            "{} is neither an account nor a contract address",
            address
        ))),
        Err(e) => Err(ToolkitError::InvalidAddress(format!("{}: {}", address, e))),
    }
}

/// Parse a `C...` contract id into its raw 32 bytes
pub fn decode_contract_id(contract_id: &str) -> Result<[u8; 32]> {
    stellar_strkey::Contract::from_string(contract_id.trim())
        .map(|contract| contract.0)
        .map_err(|e| ToolkitError::InvalidAddress(format!("{}: {}", contract_id, e)))
}

/// Encode raw contract id bytes as a `C...` strkey
pub fn encode_contract_id(contract_id: [u8; 32]) -> String {
    stellar_strkey::Contract(contract_id).to_string()
}

pub fn contract_address(contract_id: &str) -> Result<ScAddress> {
    Ok(ScAddress::Contract(ContractId(Hash(decode_contract_id(contract_id)?))))
}

pub fn address_to_scval(address: &str) -> Result<ScVal> {
    Ok(ScVal::Address(parse_address(address)?))
}

pub fn u32_to_scval(value: u32) -> ScVal {
    ScVal::U32(value)
}

pub fn i128_to_scval(value: i128) -> ScVal {
    ScVal::I128(Int128Parts {
        hi: (value >> 64) as i64,
        lo: value as u64,
    })
}

pub fn string_to_scval(value: &str) -> Result<ScVal> {
    let string: StringM = value.try_into()?;
    Ok(ScVal::String(ScString(string)))
}

pub fn symbol_to_scval(value: &str) -> Result<ScVal> {
    Ok(ScVal::Symbol(symbol(value)?))
}

pub fn symbol(value: &str) -> Result<ScSymbol> {
    let symbol: StringM<32> = value
        .try_into()
        .map_err(|_| ToolkitError::InvalidArgument(format!("Invalid symbol '{}'", value)))?;
    Ok(ScSymbol(symbol))
}

/// Decode an integer ScVal into an i128, the native width of Soroban token amounts
pub fn scval_to_i128(value: &ScVal) -> Result<i128> {
    match value {
        ScVal::I128(Int128Parts { hi, lo }) => Ok(((*hi as i128) << 64) | (*lo as i128)),
        ScVal::U128(UInt128Parts { hi, lo }) => {
            let value = ((*hi as u128) << 64) | (*lo as u128);
            i128::try_from(value)
                .map_err(|_| ToolkitError::UnexpectedValue(format!("u128 {} exceeds i128", value)))
        }
        ScVal::I64(v) => Ok(*v as i128),
        ScVal::U64(v) => Ok(*v as i128),
        ScVal::I32(v) => Ok(*v as i128),
        ScVal::U32(v) => Ok(*v as i128),
        other => Err(ToolkitError::UnexpectedValue(format!(
            "expected an integer, got {:?}",
            other
        ))),
    }
}

/// Parse a `type:value` command-line argument into an ScVal
pub fn parse_typed_arg(arg: &str) -> Result<ScVal> {
    let (kind, value) = arg.split_once(':').ok_or_else(|| {
        ToolkitError::InvalidArgument(format!("Expected 'type:value', got '{}'", arg))
    })?;

    let invalid = |e: std::num::ParseIntError| {
        ToolkitError::InvalidArgument(format!("Invalid {} value '{}': {}", kind, value, e))
    };

    match kind {
        "u32" => Ok(ScVal::U32(value.parse().map_err(invalid)?)),
        "i32" => Ok(ScVal::I32(value.parse().map_err(invalid)?)),
        "u64" => Ok(ScVal::U64(value.parse().map_err(invalid)?)),
        "i64" => Ok(ScVal::I64(value.parse().map_err(invalid)?)),
        "i128" => Ok(i128_to_scval(value.parse().map_err(invalid)?)),
        "bool" => match value {
            "true" => Ok(ScVal::Bool(true)),
            "false" => Ok(ScVal::Bool(false)),
            _ => Err(ToolkitError::InvalidArgument(format!("Invalid bool value '{}'", value))),
        },
        "string" => string_to_scval(value),
        "symbol" => symbol_to_scval(value),
        "address" => address_to_scval(value),
        other => Err(ToolkitError::InvalidArgument(format!(
            "Unsupported argument type '{}'",
            other
        ))),
    }
}
