// Cryptographic utilities

use sha2::{Digest, Sha256};
use stellar_xdr::curr::Hash;

/// Calculate SHA256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Network id used in signature payloads and contract id preimages
pub fn network_id(passphrase: &str) -> Hash {
    Hash(sha256(passphrase.as_bytes()))
}

/// Parse a hex-encoded 32-byte hash (WASM hashes in the address book)
pub fn decode_hash_hex(hash_hex: &str) -> Result<[u8; 32], String> {
    let bytes = hex::decode(hash_hex.trim()).map_err(|e| format!("Invalid hex '{}': {}", hash_hex, e))?;
    bytes
        .try_into()
        .map_err(|bytes: Vec<u8>| format!("Expected 32 bytes, got {}", bytes.len()))
}
